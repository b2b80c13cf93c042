//! Sectioned CSV export, one file per workout.
//!
//! The layout mirrors the report sections: a `# Section:` marker row, a
//! header row and value row(s), and a blank separator line between sections.
//! Rows vary in width, so the writer runs in flexible mode.

use crate::analysis::HrZone;
use crate::report::Report;
use chrono::{DateTime, Local, Utc};
use csv::WriterBuilder;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),
}

/// ---------------------------------------------------------------------------
/// File Export
/// ---------------------------------------------------------------------------

/// Write one report into `output_dir`, creating the directory if needed.
/// Returns the path of the written file.
pub fn export_report(report: &Report, output_dir: &Path) -> Result<PathBuf, ExportError> {
  fs::create_dir_all(output_dir)?;

  let path = output_dir.join(report_filename(report));
  let file = File::create(&path)?;
  let mut writer = WriterBuilder::new().flexible(true).from_writer(file);

  write_report(report, &mut writer)?;
  writer.flush()?;

  Ok(path)
}

/// Report files are named after the workout start time in local time, the
/// same scheme the watch app uses for manual exports.
pub fn report_filename(report: &Report) -> String {
  match report.basic.start_time {
    Some(start) => format!(
      "{}.csv",
      start.with_timezone(&Local).format("%Y-%m-%d_%H-%M-%S")
    ),
    None => format!("workout_{}.csv", report.basic.track_id),
  }
}

/// ---------------------------------------------------------------------------
/// Section Writers
/// ---------------------------------------------------------------------------

pub fn write_report<W: Write>(
  report: &Report,
  writer: &mut csv::Writer<W>,
) -> Result<(), ExportError> {
  write_basic_info(report, writer)?;
  write_global_metrics(report, writer)?;
  write_hr_metrics(report, writer)?;
  write_durations(report, writer)?;
  write_time_series(report, writer)?;
  Ok(())
}

fn write_basic_info<W: Write>(
  report: &Report,
  writer: &mut csv::Writer<W>,
) -> Result<(), ExportError> {
  let basic = &report.basic;

  writer.write_record(["# Section: Basic Workout Info"])?;
  writer.write_record([
    "total_distance",
    "laps",
    "calories",
    "exercise_load",
    "run_time (HH:MM:SS)",
    "workout_start_time",
    "avg_heart_rate",
    "average_pace",
    "swolf",
    "percentage_moving",
    "percentage_idle",
    "track_id",
    "pool_length",
  ])?;
  writer.write_record([
    format!("{:.1}", basic.total_distance_m),
    fmt_opt(basic.laps, 0),
    fmt_opt(basic.calories, 0),
    fmt_opt(basic.exercise_load, 0),
    fmt_hms(basic.run_time_secs),
    fmt_start_time(basic.start_time),
    fmt_opt(basic.avg_heart_rate, 0),
    format!("{:.2}", basic.average_pace),
    basic.swolf.map_or(String::from("n/a"), |s| format!("{:.1}", s)),
    format!("{:.2}%", basic.percentage_moving),
    format!("{:.2}%", basic.percentage_idle),
    basic.track_id.clone(),
    fmt_opt(basic.pool_length_m, 1),
  ])?;
  write_blank(writer)
}

fn write_global_metrics<W: Write>(
  report: &Report,
  writer: &mut csv::Writer<W>,
) -> Result<(), ExportError> {
  let global = &report.global;

  writer.write_record(["# Section: Global Metrics"])?;
  writer.write_record([
    "total_strokes",
    "avg_stroke_speed",
    "max_stroke_speed",
    "avg_distance_per_stroke",
    "training_effect",
    "swim_style",
  ])?;
  writer.write_record([
    fmt_opt(global.total_strokes, 0),
    fmt_opt(global.avg_stroke_speed, 2),
    fmt_opt(global.max_stroke_speed, 2),
    fmt_opt(global.avg_distance_per_stroke, 2),
    fmt_opt(global.training_effect, 1),
    global.swim_style.clone().unwrap_or_default(),
  ])?;
  write_blank(writer)
}

fn write_hr_metrics<W: Write>(
  report: &Report,
  writer: &mut csv::Writer<W>,
) -> Result<(), ExportError> {
  let hr = &report.hr;

  writer.write_record(["# Section: HR Metrics"])?;
  writer.write_record(["hr_max", "hr_min", "hr_mean", "hr_variance"])?;
  writer.write_record([
    format!("{:.0}", hr.hr_max),
    format!("{:.0}", hr.hr_min),
    format!("{:.2}", hr.hr_mean),
    format!("{:.2}", hr.hr_variance),
  ])?;
  write_blank(writer)?;

  writer.write_record(["Zone", "Seconds", "Share"])?;
  for zone in HrZone::ALL {
    writer.write_record([
      zone.as_str().to_string(),
      format!("{:.0}", hr.zones.secs(zone)),
      format!("{:.2}%", hr.zones.share_pct(zone)),
    ])?;
  }
  write_blank(writer)
}

fn write_durations<W: Write>(
  report: &Report,
  writer: &mut csv::Writer<W>,
) -> Result<(), ExportError> {
  writer.write_record(["# Section: Effort/Rest Durations"])?;
  writer.write_record(["effort_duration_s", "rest_duration_s"])?;
  writer.write_record([
    format!("{:.2}", report.durations.effort_secs),
    format!("{:.2}", report.durations.rest_secs),
  ])?;
  write_blank(writer)
}

fn write_time_series<W: Write>(
  report: &Report,
  writer: &mut csv::Writer<W>,
) -> Result<(), ExportError> {
  let series = &report.series;

  writer.write_record(["# Section: Time Series Data"])?;
  writer.write_record([
    "timestamp",
    "relative (s)",
    "elapsed_time",
    "hr_variation",
    "current_hr",
    "pace",
  ])?;

  for i in 0..series.len() {
    let relative = series.time[i];
    let variation = if i == 0 {
      0.0
    } else {
      series.heart_rate[i] - series.heart_rate[i - 1]
    };

    writer.write_record([
      fmt_sample_clock(report.basic.start_time, relative),
      format!("{:.0}", relative),
      fmt_elapsed(relative),
      format!("{:.0}", variation),
      format!("{:.0}", series.heart_rate[i]),
      format!("{:.2}", series.pace[i]),
    ])?;
  }

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Formatting Helpers
/// ---------------------------------------------------------------------------

fn write_blank<W: Write>(writer: &mut csv::Writer<W>) -> Result<(), ExportError> {
  writer.write_record([""])?;
  Ok(())
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
  value.map_or(String::new(), |v| format!("{:.*}", decimals, v))
}

fn fmt_hms(total_secs: f64) -> String {
  let secs = total_secs.max(0.0).round() as u64;
  format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn fmt_elapsed(secs: f64) -> String {
  let secs = secs.max(0.0).round() as u64;
  format!("{}m{}s", secs / 60, secs % 60)
}

fn fmt_start_time(start: Option<DateTime<Utc>>) -> String {
  start.map_or(String::new(), |s| {
    s.with_timezone(&Local).format("%H:%M:%S").to_string()
  })
}

fn fmt_sample_clock(start: Option<DateTime<Utc>>, relative_secs: f64) -> String {
  match start {
    Some(start) => {
      let at = start + chrono::Duration::seconds(relative_secs.round() as i64);
      at.with_timezone(&Local).format("%H:%M:%S").to_string()
    }
    None => String::new(),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
