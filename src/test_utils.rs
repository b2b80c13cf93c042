//! Shared test fixtures: canned API payloads and mock data factories.

use crate::analysis::{AnalysisConfig, DerivedMetrics};
use crate::report::Report;
use crate::series::DecodedSeries;
use crate::zepp::WorkoutSummary;

/// ---------------------------------------------------------------------------
/// API Payload Factories
/// ---------------------------------------------------------------------------

/// History listing with one pool swim and one open workout
pub fn history_body() -> &'static str {
  r#"{
    "data": {
      "summary": [
        {
          "trackid": "1714406400",
          "source": "run.watch",
          "type": 14,
          "calorie": 320.0,
          "total_trips": 20.0,
          "swim_pool_length": 25.0,
          "swolf": 42.0,
          "swim_style": "freestyle"
        },
        {
          "trackid": "1714300000",
          "source": "run.watch",
          "type": 1,
          "calorie": 410.0
        }
      ]
    }
  }"#
}

/// Detail payload for the swim above: heart rate as timestamp,delta pairs,
/// pace with decimal commas, cumulative time in seconds
pub fn detail_body() -> &'static str {
  r#"{
    "data": {
      "heart_rate": "1714406400,80;1714406401,2;1714406402,-1;1714406403,3",
      "pace": "0;1,2;1,1;0,9",
      "time": "0;10;25;40"
    }
  }"#
}

/// ---------------------------------------------------------------------------
/// Model Factories
/// ---------------------------------------------------------------------------

pub fn swim_summary() -> WorkoutSummary {
  serde_json::from_value(serde_json::json!({
    "trackid": "1714406400",
    "source": "run.watch",
    "type": 14,
    "calorie": 320.0,
    "exercise_load": 55.0,
    "run_time": "1800",
    "avg_heart_rate": 118.0,
    "total_trips": 20.0,
    "swim_pool_length": 25.0,
    "swolf": 42.0,
    "total_strokes": 300.0,
    "avg_stroke_speed": 28.5,
    "max_stroke_speed": 35.2,
    "avg_distance_per_stroke": 1.6,
    "te": 2.4,
    "swim_style": "freestyle"
  }))
  .expect("valid summary fixture")
}

pub fn series_from(heart_rate: &[f64], pace: &[f64], time: &[f64]) -> DecodedSeries {
  DecodedSeries {
    heart_rate: heart_rate.to_vec(),
    pace: pace.to_vec(),
    time: time.to_vec(),
    truncated: false,
  }
}

/// A fully assembled report: 20 laps of a 25 m pool, 3 of 4 samples moving
pub fn sample_report() -> Report {
  let summary = swim_summary();
  let series = series_from(
    &[100.0, 105.0, 103.0, 110.0],
    &[0.0, 1.2, 1.1, 0.9],
    &[0.0, 10.0, 25.0, 40.0],
  );
  let metrics = DerivedMetrics::compute(&summary, &series, &AnalysisConfig::default());

  Report::assemble(&summary, Some(metrics), Some(series)).expect("sample report")
}
