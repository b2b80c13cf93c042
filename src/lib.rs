//! swimlog: pulls swim workouts from the Zepp cloud API and writes one
//! sectioned CSV report per workout.
//!
//! The pipeline per workout: fetch detail -> decode series -> compute
//! metrics -> assemble report -> export CSV. A failure anywhere in that
//! chain skips the workout and the batch moves on.

pub mod analysis;
pub mod config;
pub mod export;
pub mod report;
pub mod series;
pub mod zepp;

#[cfg(test)]
pub mod test_utils;

use crate::analysis::DerivedMetrics;
use crate::config::Config;
use crate::report::Report;
use crate::series::DecodedSeries;
use crate::zepp::{WorkoutSummary, ZeppClient};
use std::path::PathBuf;
use tracing::{info, warn};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

/// A per-workout failure. The batch loop logs these and continues; none of
/// them aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum WorkoutError {
  #[error(transparent)]
  Fetch(#[from] zepp::ZeppError),

  #[error(transparent)]
  Decode(#[from] series::MalformedSeries),

  #[error(transparent)]
  Assemble(#[from] report::IncompleteReport),

  #[error(transparent)]
  Export(#[from] export::ExportError),
}

/// A failure before any workout is processed
#[derive(Debug, thiserror::Error)]
pub enum RunError {
  #[error(transparent)]
  Config(#[from] config::ConfigError),

  #[error(transparent)]
  Fetch(#[from] zepp::ZeppError),
}

/// ---------------------------------------------------------------------------
/// Batch Pipeline
/// ---------------------------------------------------------------------------

pub async fn run() -> Result<(), RunError> {
  let config = Config::from_env()?;
  let client = ZeppClient::new(config.token.clone());

  info!("Retrieving workouts...");
  let workouts = client.fetch_workout_history().await?;

  let swims: Vec<WorkoutSummary> = workouts.into_iter().filter(|w| w.is_swim()).collect();
  if swims.is_empty() {
    warn!("No swim workouts found");
    return Ok(());
  }
  info!("Found {} swim workout(s). Retrieving details...", swims.len());

  let mut exported = 0usize;
  for workout in &swims {
    match process_workout(&client, workout, &config).await {
      Ok(path) => {
        exported += 1;
        info!("Exported workout {} to {}", workout.track_id, path.display());
      }
      Err(e) => warn!("Skipping workout {}: {}", workout.track_id, e),
    }
  }

  info!("Done: {}/{} workout(s) exported", exported, swims.len());
  Ok(())
}

/// Process one workout end-to-end and return the path of its CSV report.
pub async fn process_workout(
  client: &ZeppClient,
  summary: &WorkoutSummary,
  config: &Config,
) -> Result<PathBuf, WorkoutError> {
  let detail = client
    .fetch_workout_detail(&summary.track_id, &summary.source)
    .await?;

  let series = DecodedSeries::decode(&detail.heart_rate, &detail.pace, &detail.time)?;
  if series.truncated {
    warn!(
      "Workout {}: series lengths disagreed, truncated to {} samples",
      summary.track_id,
      series.len()
    );
  }

  let metrics = DerivedMetrics::compute(summary, &series, &config.analysis);
  let report = Report::assemble(summary, Some(metrics), Some(series))?;
  let path = export::export_report(&report, &config.output_dir)?;

  Ok(path)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{detail_body, swim_summary};

  fn test_config(output_dir: &std::path::Path) -> Config {
    Config {
      token: "secret".into(),
      output_dir: output_dir.to_path_buf(),
      analysis: Default::default(),
    }
  }

  #[tokio::test]
  async fn test_process_workout_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/v1/sport/run/detail.json")
      .match_query(mockito::Matcher::Any)
      .with_status(200)
      .with_body(detail_body())
      .create_async()
      .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = ZeppClient::with_base_url("secret", server.url());

    let path = process_workout(&client, &swim_summary(), &test_config(dir.path()))
      .await
      .expect("process");

    let content = std::fs::read_to_string(&path).expect("read report");
    assert!(content.contains("# Section: Basic Workout Info"));
    assert!(content.contains("# Section: Time Series Data"));
  }

  #[tokio::test]
  async fn test_process_workout_skips_on_malformed_series() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/v1/sport/run/detail.json")
      .match_query(mockito::Matcher::Any)
      .with_status(200)
      .with_body(
        r#"{"data": {"heart_rate": "1,80;2,junk", "pace": "1;1", "time": "0;1"}}"#,
      )
      .create_async()
      .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = ZeppClient::with_base_url("secret", server.url());

    let err = process_workout(&client, &swim_summary(), &test_config(dir.path()))
      .await
      .unwrap_err();
    assert!(matches!(err, WorkoutError::Decode(_)));

    // Nothing was written for the failed workout
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
  }
}
