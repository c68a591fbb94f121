// crates/framestrip-core/src/error.rs

use thiserror::Error;

/// Failure taxonomy for a preview run.
///
/// In single-file mode any variant terminates the run and lands in the
/// top-level `error` field. In folder mode `Probe` and `Extract` are caught
/// per entry; only `List` (or an empty listing) reaches the top level.
/// `Policy` is rejected before a run ever starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreviewError {
    #[error("probe failed: {0}")]
    Probe(String),

    #[error("frame extraction failed at {timestamp_secs:.1}s: {msg}")]
    Extract { timestamp_secs: f64, msg: String },

    #[error("folder listing failed: {0}")]
    List(String),

    #[error("invalid sampling policy: {0}")]
    Policy(String),
}
