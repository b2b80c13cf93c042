//! Deterministic metric layer for decoded workouts.
//!
//! Pure functions from decoded series + summary fields to derived metrics.
//! No I/O happens here; callers parameterize everything through
//! `AnalysisConfig`.

use crate::series::DecodedSeries;
use crate::zepp::WorkoutSummary;
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Analysis Configuration
/// ---------------------------------------------------------------------------

/// Fractions of theoretical max HR where each zone begins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ZoneBounds {
  pub z2: f64,
  pub z3: f64,
  pub z4: f64,
  pub z5: f64,
}

impl Default for ZoneBounds {
  fn default() -> Self {
    Self {
      z2: 0.60,
      z3: 0.70,
      z4: 0.80,
      z5: 0.90,
    }
  }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalysisConfig {
  /// Theoretical max heart rate (e.g., 220 - age)
  pub hr_max_theoretical: f64,

  /// Pace above this counts as moving; at or below is idle
  pub movement_threshold: f64,

  pub zone_bounds: ZoneBounds,
}

impl Default for AnalysisConfig {
  fn default() -> Self {
    Self {
      hr_max_theoretical: 196.0,
      movement_threshold: 0.0,
      zone_bounds: ZoneBounds::default(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// HR Zones
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HrZone {
  Z1, // Recovery: below the z2 bound
  Z2, // Aerobic
  Z3, // Tempo
  Z4, // Threshold
  Z5, // VO2max
}

impl HrZone {
  pub const ALL: [HrZone; 5] = [HrZone::Z1, HrZone::Z2, HrZone::Z3, HrZone::Z4, HrZone::Z5];

  pub fn from_hr(hr: f64, config: &AnalysisConfig) -> Self {
    let pct = hr / config.hr_max_theoretical;
    let bounds = &config.zone_bounds;
    match pct {
      p if p < bounds.z2 => HrZone::Z1,
      p if p < bounds.z3 => HrZone::Z2,
      p if p < bounds.z4 => HrZone::Z3,
      p if p < bounds.z5 => HrZone::Z4,
      _ => HrZone::Z5,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      HrZone::Z1 => "Z1",
      HrZone::Z2 => "Z2",
      HrZone::Z3 => "Z3",
      HrZone::Z4 => "Z4",
      HrZone::Z5 => "Z5",
    }
  }
}

/// Seconds spent in each HR zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneDistribution {
  pub z1_secs: f64,
  pub z2_secs: f64,
  pub z3_secs: f64,
  pub z4_secs: f64,
  pub z5_secs: f64,
}

impl ZoneDistribution {
  fn add(&mut self, zone: HrZone, secs: f64) {
    match zone {
      HrZone::Z1 => self.z1_secs += secs,
      HrZone::Z2 => self.z2_secs += secs,
      HrZone::Z3 => self.z3_secs += secs,
      HrZone::Z4 => self.z4_secs += secs,
      HrZone::Z5 => self.z5_secs += secs,
    }
  }

  pub fn secs(&self, zone: HrZone) -> f64 {
    match zone {
      HrZone::Z1 => self.z1_secs,
      HrZone::Z2 => self.z2_secs,
      HrZone::Z3 => self.z3_secs,
      HrZone::Z4 => self.z4_secs,
      HrZone::Z5 => self.z5_secs,
    }
  }

  pub fn total_secs(&self) -> f64 {
    self.z1_secs + self.z2_secs + self.z3_secs + self.z4_secs + self.z5_secs
  }

  /// Share of total zone time, as a percentage
  pub fn share_pct(&self, zone: HrZone) -> f64 {
    let total = self.total_secs();
    if total > 0.0 {
      self.secs(zone) / total * 100.0
    } else {
      0.0
    }
  }
}

/// ---------------------------------------------------------------------------
/// Derived Metrics
/// ---------------------------------------------------------------------------

/// Per-workout computed metrics. Built once from a decoded series plus the
/// summary header; a zero-sample series yields the zeroed default rather
/// than an error so one short record cannot abort a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
  /// Laps x pool length, in meters
  pub total_distance_m: f64,

  /// Distance over active (moving) seconds
  pub average_pace: f64,

  pub percentage_moving: f64,
  pub percentage_idle: f64,

  pub hr_max: f64,
  pub hr_min: f64,
  pub hr_mean: f64,

  /// Population variance over the absolute HR sequence
  pub hr_variance: f64,

  pub zones: ZoneDistribution,

  /// Seconds per lap + strokes per lap; swim workouts only
  pub swolf: Option<f64>,

  /// Total seconds across all contiguous effort runs
  pub effort_secs: f64,

  /// Total seconds across all contiguous rest runs
  pub rest_secs: f64,
}

impl DerivedMetrics {
  pub fn compute(
    summary: &WorkoutSummary,
    series: &DecodedSeries,
    config: &AnalysisConfig,
  ) -> Self {
    if series.is_empty() {
      return Self::default();
    }

    let n = series.len();
    let hr = &series.heart_rate;

    // HR statistics over the full sequence
    let hr_max = hr.iter().cloned().fold(f64::MIN, f64::max);
    let hr_min = hr.iter().cloned().fold(f64::MAX, f64::min);
    let hr_mean = hr.iter().sum::<f64>() / n as f64;
    let hr_variance = hr.iter().map(|v| (v - hr_mean).powi(2)).sum::<f64>() / n as f64;

    // Movement classification per sample
    let moving: Vec<bool> = series
      .pace
      .iter()
      .map(|&p| p > config.movement_threshold)
      .collect();
    let moving_count = moving.iter().filter(|&&m| m).count();
    let percentage_moving = moving_count as f64 / n as f64 * 100.0;
    let percentage_idle = 100.0 - percentage_moving;

    // Attribute each inter-sample interval to the sample that closes it:
    // effort vs rest by movement, and an HR zone bucket either way
    let mut zones = ZoneDistribution::default();
    let mut effort_secs = 0.0;
    let mut rest_secs = 0.0;

    for i in 0..n {
      let dt = if i == 0 {
        0.0
      } else {
        (series.time[i] - series.time[i - 1]).max(0.0)
      };

      zones.add(HrZone::from_hr(hr[i], config), dt);

      if i > 0 {
        if moving[i] {
          effort_secs += dt;
        } else {
          rest_secs += dt;
        }
      }
    }

    // Distance and pace from the summary header
    let laps = summary.total_trips.unwrap_or(0.0);
    let pool_length = summary.swim_pool_length.unwrap_or(0.0);
    let total_distance_m = laps * pool_length;

    let average_pace = if effort_secs > 0.0 {
      total_distance_m / effort_secs
    } else {
      0.0
    };

    let swolf = if summary.is_swim() && laps > 0.0 {
      let strokes = summary.total_strokes.unwrap_or(0.0);
      Some(series.duration_secs() / laps + strokes / laps)
    } else {
      None
    };

    Self {
      total_distance_m,
      average_pace,
      percentage_moving,
      percentage_idle,
      hr_max,
      hr_min,
      hr_mean,
      hr_variance,
      zones,
      swolf,
      effort_secs,
      rest_secs,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{series_from, swim_summary};

  #[test]
  fn test_hr_zones_default_bounds() {
    let config = AnalysisConfig::default(); // max 196
    assert_eq!(HrZone::from_hr(100.0, &config), HrZone::Z1); // 51%
    assert_eq!(HrZone::from_hr(125.0, &config), HrZone::Z2); // 64%
    assert_eq!(HrZone::from_hr(145.0, &config), HrZone::Z3); // 74%
    assert_eq!(HrZone::from_hr(170.0, &config), HrZone::Z4); // 87%
    assert_eq!(HrZone::from_hr(190.0, &config), HrZone::Z5); // 97%
  }

  #[test]
  fn test_hr_statistics() {
    let series = series_from(
      &[100.0, 105.0, 103.0, 110.0],
      &[1.0, 1.0, 1.0, 1.0],
      &[0.0, 1.0, 2.0, 3.0],
    );
    let metrics = DerivedMetrics::compute(&swim_summary(), &series, &AnalysisConfig::default());

    assert_eq!(metrics.hr_mean, 104.5);
    assert_eq!(metrics.hr_max, 110.0);
    assert_eq!(metrics.hr_min, 100.0);
    // Population variance: ((4.5)^2 + (0.5)^2 + (1.5)^2 + (5.5)^2) / 4
    assert!((metrics.hr_variance - 13.25).abs() < 1e-9);
  }

  #[test]
  fn test_movement_percentages() {
    let series = series_from(
      &[100.0, 100.0, 100.0, 100.0],
      &[0.0, 1.2, 1.1, 0.9],
      &[0.0, 1.0, 2.0, 3.0],
    );
    let metrics = DerivedMetrics::compute(&swim_summary(), &series, &AnalysisConfig::default());

    assert_eq!(metrics.percentage_moving, 75.0);
    assert_eq!(metrics.percentage_idle, 25.0);
  }

  #[test]
  fn test_effort_and_rest_totals() {
    // Samples 2 and 3 close effort intervals; sample 1 closes the initial rest
    let series = series_from(
      &[100.0, 102.0, 110.0, 112.0],
      &[0.0, 0.0, 1.4, 1.3],
      &[0.0, 10.0, 25.0, 40.0],
    );
    let metrics = DerivedMetrics::compute(&swim_summary(), &series, &AnalysisConfig::default());

    assert_eq!(metrics.effort_secs, 30.0);
    assert_eq!(metrics.rest_secs, 10.0);
  }

  #[test]
  fn test_zone_time_attribution() {
    let config = AnalysisConfig::default();
    // 100 bpm -> Z1, 145 bpm -> Z3; intervals of 10 and 20 seconds
    let series = series_from(
      &[100.0, 100.0, 145.0],
      &[1.0, 1.0, 1.0],
      &[0.0, 10.0, 30.0],
    );
    let metrics = DerivedMetrics::compute(&swim_summary(), &series, &config);

    assert_eq!(metrics.zones.z1_secs, 10.0);
    assert_eq!(metrics.zones.z3_secs, 20.0);
    assert_eq!(metrics.zones.total_secs(), 30.0);
    assert!((metrics.zones.share_pct(HrZone::Z3) - 66.6666).abs() < 0.001);
  }

  #[test]
  fn test_empty_series_yields_zeroed_metrics() {
    let metrics = DerivedMetrics::compute(
      &swim_summary(),
      &DecodedSeries::default(),
      &AnalysisConfig::default(),
    );

    assert_eq!(metrics, DerivedMetrics::default());
    assert_eq!(metrics.percentage_moving, 0.0);
    assert!(metrics.swolf.is_none());
  }

  #[test]
  fn test_swolf_for_swims_only() {
    // 20 laps over 600 s with 300 strokes: 30 s/lap + 15 strokes/lap
    let series = series_from(&[100.0, 100.0], &[1.0, 1.0], &[0.0, 600.0]);
    let mut summary = swim_summary();
    summary.total_trips = Some(20.0);
    summary.total_strokes = Some(300.0);

    let metrics = DerivedMetrics::compute(&summary, &series, &AnalysisConfig::default());
    assert_eq!(metrics.swolf, Some(45.0));

    // A workout without a pool length is not a swim
    summary.swim_pool_length = None;
    let metrics = DerivedMetrics::compute(&summary, &series, &AnalysisConfig::default());
    assert!(metrics.swolf.is_none());
  }

  #[test]
  fn test_average_pace_uses_active_time() {
    // 500 m over 100 effort seconds, with a 50 s rest that must not count
    let series = series_from(
      &[100.0, 100.0, 100.0],
      &[0.0, 0.0, 1.0],
      &[0.0, 50.0, 150.0],
    );
    let mut summary = swim_summary();
    summary.total_trips = Some(20.0);
    summary.swim_pool_length = Some(25.0);

    let metrics = DerivedMetrics::compute(&summary, &series, &AnalysisConfig::default());
    assert_eq!(metrics.total_distance_m, 500.0);
    assert_eq!(metrics.effort_secs, 100.0);
    assert_eq!(metrics.average_pace, 5.0);
  }
}
