//! User-facing error classes that callers are expected to match on.
//!
//! Everything else in the crate flows as `anyhow::Error` with context;
//! these variants cover the precondition failures a frontend has to
//! present differently from a plain database error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A profile-scoped operation was requested with no active profile set.
    /// Writing without a profile would corrupt profile isolation, so this
    /// is a hard error rather than a silent no-op.
    #[error("no active profile selected")]
    NoActiveProfile,

    /// The rounded score fell outside the accepted 0..=10 range.
    /// Out-of-range scores are rejected, not clamped.
    #[error("score {0} is out of range (expected 0..=10)")]
    InvalidScore(i64),

    /// Snapshot export was requested for a profile with zero ratings.
    #[error("profile '{0}' has no ratings to export")]
    NothingToExport(String),
}
