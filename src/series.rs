//! Decoding of the Zepp detail-payload string encodings.
//!
//! The detail endpoint ships three `;`-delimited series per workout:
//! heart rate as `timestamp,value` pairs (first value absolute, the rest
//! signed deltas), pace samples (decimal commas), and cumulative elapsed
//! seconds. All three decode into one aligned `DecodedSeries`.

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

/// Reconstructed heart rates above this are corrupted input, not biology.
pub const HR_CEILING: f64 = 250.0;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MalformedSeries {
  #[error("non-numeric {stream} token '{token}'")]
  NonNumericToken { stream: &'static str, token: String },

  #[error("reconstructed heart rate fell to {0} bpm")]
  NegativeHeartRate(f64),

  #[error("reconstructed heart rate {bpm} bpm exceeds the {ceiling} bpm ceiling")]
  ImplausibleHeartRate { bpm: f64, ceiling: f64 },
}

/// ---------------------------------------------------------------------------
/// Decoded Series
/// ---------------------------------------------------------------------------

/// Three aligned per-sample sequences for one workout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedSeries {
  /// Absolute heart rate per sample (bpm)
  pub heart_rate: Vec<f64>,

  /// Pace per sample; 0.0 marks an idle gap
  pub pace: Vec<f64>,

  /// Cumulative elapsed seconds per sample
  pub time: Vec<f64>,

  /// Set when the three streams disagreed on length and were cut to the
  /// shortest one (a known upstream data-quality issue)
  pub truncated: bool,
}

impl DecodedSeries {
  /// Decode the three raw strings from a workout detail payload.
  pub fn decode(heart_rate: &str, pace: &str, time: &str) -> Result<Self, MalformedSeries> {
    let mut hr = decode_heart_rate(heart_rate)?;
    let mut pace = decode_numeric(pace, "pace")?;
    let mut time = decode_numeric(time, "time")?;

    let shortest = hr.len().min(pace.len()).min(time.len());
    let truncated = hr.len() != shortest || pace.len() != shortest || time.len() != shortest;

    hr.truncate(shortest);
    pace.truncate(shortest);
    time.truncate(shortest);

    Ok(Self {
      heart_rate: hr,
      pace,
      time,
      truncated,
    })
  }

  pub fn len(&self) -> usize {
    self.heart_rate.len()
  }

  pub fn is_empty(&self) -> bool {
    self.heart_rate.is_empty()
  }

  /// Total workout seconds: the last cumulative time value when the time
  /// stream carries real data, else sample count at the 1 Hz default.
  pub fn duration_secs(&self) -> f64 {
    match self.time.last() {
      Some(&last) if last > 0.0 => last,
      _ => self.len().saturating_sub(1) as f64,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Stream Decoders
/// ---------------------------------------------------------------------------

/// Reconstruct absolute heart rates from the cumulative-delta encoding in a
/// single linear pass, guarding against physiologically invalid output.
fn decode_heart_rate(raw: &str) -> Result<Vec<f64>, MalformedSeries> {
  let mut values: Vec<f64> = Vec::new();
  let mut current = 0.0;

  for segment in raw.trim_matches(';').split(';') {
    if segment.is_empty() {
      continue;
    }

    // Segments are "timestamp,value" pairs; the value part is what counts
    let token = segment.rsplit(',').next().unwrap_or(segment).trim();

    let delta: f64 = token.parse().map_err(|_| MalformedSeries::NonNumericToken {
      stream: "heart_rate",
      token: token.to_string(),
    })?;

    current = if values.is_empty() { delta } else { current + delta };

    if current < 0.0 {
      return Err(MalformedSeries::NegativeHeartRate(current));
    }
    if current > HR_CEILING {
      return Err(MalformedSeries::ImplausibleHeartRate {
        bpm: current,
        ceiling: HR_CEILING,
      });
    }

    values.push(current);
  }

  Ok(values)
}

/// Decode a plain numeric stream. Empty tokens are padding for gaps and
/// decode to 0.0; decimal commas are normalized to points.
fn decode_numeric(raw: &str, stream: &'static str) -> Result<Vec<f64>, MalformedSeries> {
  let trimmed = raw.trim_matches(';');
  if trimmed.is_empty() {
    return Ok(Vec::new());
  }

  trimmed
    .split(';')
    .map(|token| {
      let token = token.trim().replace(',', ".");
      if token.is_empty() {
        return Ok(0.0);
      }
      token.parse().map_err(|_| MalformedSeries::NonNumericToken {
        stream,
        token: token.to_string(),
      })
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
