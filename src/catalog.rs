//! External catalog collaborator.
//!
//! The engine only consumes plain records from the catalog; how they are
//! retrieved (remote API, local index) is the implementor's business.

use crate::profile_store::{AlbumSummary, Song};
use anyhow::Result;
use chrono::Utc;

/// Lookup interface for song and album metadata. Used after a snapshot
/// import to backfill album identifiers the snapshot did not carry.
pub trait CatalogProvider: Send + Sync {
    /// Resolve a song by its catalog id. Ok(None) means the catalog does
    /// not know the id (deleted, region-locked, or plain wrong).
    fn lookup_song(&self, song_id: &str) -> Result<Option<Song>>;

    fn lookup_album(&self, album_id: &str) -> Result<Option<AlbumSummary>>;
}

/// Synthesize an id for a user-entered song that has no catalog identity.
/// The `custom-` prefix is load-bearing: custom songs are excluded from
/// catalog backfill and counted by the creator achievements.
pub fn custom_song_id() -> String {
    format!("custom-{}", Utc::now().timestamp_millis())
}
