use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const ZEPP_API_BASE: &str = "https://api-mifit.huami.com";
const HISTORY_PATH: &str = "/v1/sport/run/history.json";
const DETAIL_PATH: &str = "/v1/sport/run/detail.json";

/// Headers the Mi Fit web client sends on every request
const APP_PLATFORM: &str = "web";
const APP_NAME: &str = "com.xiaomi.hm.health";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ZeppError {
  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Zepp API error: {0}")]
  Api(String),

  #[error("Not authenticated with the Zepp API")]
  NotAuthenticated,
}

/// ---------------------------------------------------------------------------
/// API Payloads
/// ---------------------------------------------------------------------------

/// Workout summary from the history endpoint.
/// Field names mirror the Zepp wire format; `trackid` doubles as the
/// workout start timestamp in unix seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkoutSummary {
  #[serde(rename = "trackid")]
  pub track_id: String,

  #[serde(default)]
  pub source: String,

  /// Workout category code as reported upstream
  #[serde(rename = "type", default)]
  pub category: Option<i64>,

  #[serde(default)]
  pub calorie: Option<f64>,

  #[serde(default)]
  pub exercise_load: Option<f64>,

  /// Raw elapsed-time value as encoded by the API
  #[serde(default)]
  pub run_time: Option<String>,

  #[serde(default)]
  pub avg_heart_rate: Option<f64>,

  /// Lap count (pool lengths swum)
  #[serde(default)]
  pub total_trips: Option<f64>,

  #[serde(default)]
  pub swim_pool_length: Option<f64>,

  #[serde(default)]
  pub swolf: Option<f64>,

  #[serde(default)]
  pub total_strokes: Option<f64>,

  #[serde(default)]
  pub avg_stroke_speed: Option<f64>,

  #[serde(default)]
  pub max_stroke_speed: Option<f64>,

  #[serde(default)]
  pub avg_distance_per_stroke: Option<f64>,

  #[serde(rename = "te", default)]
  pub training_effect: Option<f64>,

  #[serde(default)]
  pub swim_style: Option<String>,
}

impl WorkoutSummary {
  /// Pool swims carry a positive pool length; everything else does not.
  pub fn is_swim(&self) -> bool {
    self.swim_pool_length.map_or(false, |len| len > 0.0)
  }

  /// Workout start time, decoded from `trackid`
  pub fn start_time(&self) -> Option<DateTime<Utc>> {
    let secs: i64 = self.track_id.parse().ok()?;
    DateTime::from_timestamp(secs, 0)
  }
}

/// Raw per-workout series strings from the detail endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WorkoutDetail {
  #[serde(default)]
  pub heart_rate: String,

  #[serde(default)]
  pub pace: String,

  #[serde(default)]
  pub time: String,
}

#[derive(Debug, Default, Deserialize)]
struct HistoryData {
  #[serde(default)]
  summary: Vec<WorkoutSummary>,
}

#[derive(Debug, Default, Deserialize)]
struct HistoryResponse {
  #[serde(default)]
  data: HistoryData,
}

#[derive(Debug, Default, Deserialize)]
struct DetailResponse {
  #[serde(default)]
  data: WorkoutDetail,
}

/// ---------------------------------------------------------------------------
/// API Client
/// ---------------------------------------------------------------------------

pub struct ZeppClient {
  http: Client,
  base_url: String,
  token: String,
}

impl ZeppClient {
  pub fn new(token: impl Into<String>) -> Self {
    Self::with_base_url(token, ZEPP_API_BASE)
  }

  /// Point the client at an alternate host (used by tests)
  pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
    Self {
      http: Client::new(),
      base_url: base_url.into(),
      token: token.into(),
    }
  }

  fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ZeppError> {
    let base = Url::parse(&self.base_url).map_err(|e| ZeppError::Api(e.to_string()))?;
    let mut url = base.join(path).map_err(|e| ZeppError::Api(e.to_string()))?;

    for (key, value) in query {
      url.query_pairs_mut().append_pair(key, value);
    }

    Ok(url)
  }

  async fn get_json<T: serde::de::DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, &str)],
  ) -> Result<T, ZeppError> {
    let url = self.endpoint(path, query)?;

    let response = self
      .http
      .get(url)
      .header("apptoken", &self.token)
      .header("appPlatform", APP_PLATFORM)
      .header("appname", APP_NAME)
      .send()
      .await?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
      return Err(ZeppError::NotAuthenticated);
    }

    if !response.status().is_success() {
      let status = response.status();
      let error_text = response.text().await.unwrap_or_default();
      return Err(ZeppError::Api(format!(
        "{} returned {}: {}",
        path, status, error_text
      )));
    }

    // Get raw text first so parse failures can be diagnosed
    let response_text = response.text().await?;

    serde_json::from_str(&response_text).map_err(|e| {
      tracing::error!(
        "Failed to parse {} response: {} (first 500 chars: {})",
        path,
        e,
        &response_text[..response_text.len().min(500)]
      );
      ZeppError::Api(format!("Failed to parse {} response: {}", path, e))
    })
  }

  /// Fetch the full workout history listing
  pub async fn fetch_workout_history(&self) -> Result<Vec<WorkoutSummary>, ZeppError> {
    let response: HistoryResponse = self.get_json(HISTORY_PATH, &[]).await?;
    Ok(response.data.summary)
  }

  /// Fetch the raw series strings for one workout
  pub async fn fetch_workout_detail(
    &self,
    track_id: &str,
    source: &str,
  ) -> Result<WorkoutDetail, ZeppError> {
    let response: DetailResponse = self
      .get_json(DETAIL_PATH, &[("trackid", track_id), ("source", source)])
      .await?;
    Ok(response.data)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
