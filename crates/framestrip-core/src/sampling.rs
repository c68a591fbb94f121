// crates/framestrip-core/src/sampling.rs
//
// Timestamp planning: (duration, policy) → the ordered sample points for
// one file. Pure and deterministic — the only inputs are the arguments.

use serde::{Deserialize, Serialize};

use crate::error::PreviewError;

/// How sample timestamps are chosen within a video's duration.
///
/// Equality is structural: two policies are the same iff same variant and
/// same parameter, which is what `regenerate()` relies on when deciding
/// nothing changed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SamplingPolicy {
    /// `count` evenly spaced frames, excluding the exact start and end.
    #[serde(rename = "fixed")]
    FixedCount { count: u32 },
    /// One frame every `minutes` minutes, starting at the first mark.
    #[serde(rename = "interval")]
    Interval { minutes: f64 },
}

impl SamplingPolicy {
    /// Reject invalid parameters before any run starts. Never clamps.
    pub fn validate(&self) -> Result<(), PreviewError> {
        match *self {
            SamplingPolicy::FixedCount { .. } => Ok(()),
            SamplingPolicy::Interval { minutes } => {
                if minutes > 0.0 {
                    Ok(())
                } else {
                    Err(PreviewError::Policy(format!(
                        "interval must be positive, got {minutes} min"
                    )))
                }
            }
        }
    }
}

/// Plan the sample timestamps for one file.
///
/// `FixedCount { count }` divides the duration into `count + 1` equal
/// segments and returns the `count` interior boundaries — even coverage
/// that skips the start/end frames, which are often black or degenerate.
/// `Interval { minutes }` returns every whole interval mark strictly below
/// the duration.
///
/// All returned timestamps lie in `[0, duration_secs)` and are strictly
/// increasing.
pub fn plan_timestamps(
    duration_secs: f64,
    policy: SamplingPolicy,
) -> Result<Vec<f64>, PreviewError> {
    policy.validate()?;
    match policy {
        SamplingPolicy::FixedCount { count } => {
            if count == 0 {
                return Ok(Vec::new());
            }
            let step = duration_secs / (count as f64 + 1.0);
            Ok((1..=count).map(|i| step * i as f64).collect())
        }
        SamplingPolicy::Interval { minutes } => {
            let interval = minutes * 60.0;
            let mut timestamps = Vec::new();
            let mut t = interval;
            while t < duration_secs {
                timestamps.push(t);
                t += interval;
            }
            Ok(timestamps)
        }
    }
}
