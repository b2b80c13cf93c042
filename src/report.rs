//! Report assembly: the pure merge of summary fields, derived metrics, and
//! the decoded series into the flat structure the CSV exporter writes.
//!
//! Field ordering here is the section ordering of the exported file; nothing
//! is computed beyond presence checks.

use crate::analysis::{DerivedMetrics, ZoneDistribution};
use crate::series::DecodedSeries;
use crate::zepp::WorkoutSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IncompleteReport {
  #[error("workout {0}: derived metrics are missing")]
  MissingMetrics(String),

  #[error("workout {0}: decoded series is missing")]
  MissingSeries(String),
}

/// ---------------------------------------------------------------------------
/// Report Sections
/// ---------------------------------------------------------------------------

/// Section 1: Basic Workout Info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicInfo {
  pub total_distance_m: f64,
  pub laps: Option<f64>,
  pub calories: Option<f64>,
  pub exercise_load: Option<f64>,

  /// Total workout seconds (formatted HH:MM:SS by the exporter)
  pub run_time_secs: f64,

  pub start_time: Option<DateTime<Utc>>,
  pub avg_heart_rate: Option<f64>,
  pub average_pace: f64,
  pub swolf: Option<f64>,
  pub percentage_moving: f64,
  pub percentage_idle: f64,
  pub track_id: String,
  pub pool_length_m: Option<f64>,
}

/// Section 2: Global Metrics (upstream stroke-level summary fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalMetrics {
  pub total_strokes: Option<f64>,
  pub avg_stroke_speed: Option<f64>,
  pub max_stroke_speed: Option<f64>,
  pub avg_distance_per_stroke: Option<f64>,
  pub training_effect: Option<f64>,
  pub swim_style: Option<String>,
}

/// Section 3: HR Metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HrMetrics {
  pub hr_max: f64,
  pub hr_min: f64,
  pub hr_mean: f64,
  pub hr_variance: f64,
  pub zones: ZoneDistribution,
}

/// Section 4: Effort/Rest Durations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Durations {
  pub effort_secs: f64,
  pub rest_secs: f64,
}

/// ---------------------------------------------------------------------------
/// Report
/// ---------------------------------------------------------------------------

/// The complete per-workout report, sections in export order. Section 5
/// (Time Series) is the decoded series itself.
#[derive(Debug, Clone)]
pub struct Report {
  pub basic: BasicInfo,
  pub global: GlobalMetrics,
  pub hr: HrMetrics,
  pub durations: Durations,
  pub series: DecodedSeries,
}

impl Report {
  /// Merge one workout's pieces. Fails when the computed half of the report
  /// never materialized; summary fields alone are not a report.
  pub fn assemble(
    summary: &WorkoutSummary,
    metrics: Option<DerivedMetrics>,
    series: Option<DecodedSeries>,
  ) -> Result<Self, IncompleteReport> {
    let metrics =
      metrics.ok_or_else(|| IncompleteReport::MissingMetrics(summary.track_id.clone()))?;
    let series =
      series.ok_or_else(|| IncompleteReport::MissingSeries(summary.track_id.clone()))?;

    Ok(Self {
      basic: BasicInfo {
        total_distance_m: metrics.total_distance_m,
        laps: summary.total_trips,
        calories: summary.calorie,
        exercise_load: summary.exercise_load,
        run_time_secs: series.duration_secs(),
        start_time: summary.start_time(),
        avg_heart_rate: summary.avg_heart_rate,
        average_pace: metrics.average_pace,
        swolf: metrics.swolf,
        percentage_moving: metrics.percentage_moving,
        percentage_idle: metrics.percentage_idle,
        track_id: summary.track_id.clone(),
        pool_length_m: summary.swim_pool_length,
      },
      global: GlobalMetrics {
        total_strokes: summary.total_strokes,
        avg_stroke_speed: summary.avg_stroke_speed,
        max_stroke_speed: summary.max_stroke_speed,
        avg_distance_per_stroke: summary.avg_distance_per_stroke,
        training_effect: summary.training_effect,
        swim_style: summary.swim_style.clone(),
      },
      hr: HrMetrics {
        hr_max: metrics.hr_max,
        hr_min: metrics.hr_min,
        hr_mean: metrics.hr_mean,
        hr_variance: metrics.hr_variance,
        zones: metrics.zones,
      },
      durations: Durations {
        effort_secs: metrics.effort_secs,
        rest_secs: metrics.rest_secs,
      },
      series,
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
