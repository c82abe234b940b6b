mod document;
mod transfer;

pub use document::{SnapshotDocument, SnapshotRating};
pub use transfer::{export_profile, import_snapshot, ImportOutcome};
