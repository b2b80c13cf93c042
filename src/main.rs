use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  if let Err(e) = swimlog::run().await {
    error!("{}", e);
    std::process::exit(1);
  }
}
