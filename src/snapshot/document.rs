//! The portable snapshot document.
//!
//! `profileName`, `songs` and `ratings` are required; every other section
//! is optional and defaults to empty, so documents written by older
//! versions still import.

use crate::profile_store::{
    AchievementUnlock, AlbumSummary, GameHighscore, ProfileData, Song, WatchlistEntry,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRating {
    pub song_id: String,
    pub score: u8,
    pub created_at: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(rename = "profileName")]
    pub profile_name: String,
    pub songs: Vec<Song>,
    pub ratings: Vec<SnapshotRating>,
    #[serde(default)]
    pub achievements: Vec<AchievementUnlock>,
    #[serde(default)]
    pub profiledata: Vec<ProfileData>,
    #[serde(default)]
    pub game_highscores: Vec<GameHighscore>,
    #[serde(default)]
    pub watchlist: Vec<WatchlistEntry>,
    #[serde(default)]
    pub albums: Vec<AlbumSummary>,
    #[serde(default)]
    pub global_watchlist_notes: Vec<String>,
    #[serde(default)]
    pub ignored_songs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_sections_default_to_empty() {
        let doc: SnapshotDocument = serde_json::from_str(
            r#"{
                "profileName": "alice",
                "songs": [],
                "ratings": [{"song_id": "s1", "score": 8, "created_at": 1700000000}]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.profile_name, "alice");
        assert_eq!(doc.ratings[0].notes, None);
        assert!(doc.achievements.is_empty());
        assert!(doc.ignored_songs.is_empty());
    }

    #[test]
    fn missing_required_section_fails() {
        let result = serde_json::from_str::<SnapshotDocument>(
            r#"{"profileName": "alice", "songs": []}"#,
        );
        assert!(result.is_err());
    }
}
