use crate::analysis::AnalysisConfig;
use std::env;
use std::path::PathBuf;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_OUTPUT_DIR: &str = "workouts";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Missing configuration: {0}")]
  MissingVar(String),

  #[error("Invalid value for {name}: '{value}'")]
  InvalidVar { name: String, value: String },
}

/// ---------------------------------------------------------------------------
/// Runtime Configuration
/// ---------------------------------------------------------------------------

/// Everything the batch run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
  /// Bearer token for the Zepp cloud API (`ZEPP_TOKEN`)
  pub token: String,

  /// Directory CSV reports are written into (`SWIMLOG_OUTPUT_DIR`)
  pub output_dir: PathBuf,

  /// Parameters for the metric calculator
  pub analysis: AnalysisConfig,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    let token =
      env::var("ZEPP_TOKEN").map_err(|_| ConfigError::MissingVar("ZEPP_TOKEN".into()))?;

    let output_dir = env::var("SWIMLOG_OUTPUT_DIR")
      .map(PathBuf::from)
      .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let mut analysis = AnalysisConfig::default();
    if let Ok(raw) = env::var("SWIMLOG_HR_MAX") {
      let hr_max: f64 = raw.parse().map_err(|_| ConfigError::InvalidVar {
        name: "SWIMLOG_HR_MAX".into(),
        value: raw.clone(),
      })?;
      analysis.hr_max_theoretical = hr_max;
    }

    Ok(Self {
      token,
      output_dir,
      analysis,
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
