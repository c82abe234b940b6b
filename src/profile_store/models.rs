//! Data models for the profile store.

use serde::{Deserialize, Serialize};

/// A song as cached locally. The identity comes from the external catalog,
/// or is synthesized (`custom-<timestamp>`) for user-entered songs.
/// Attributes may be overwritten on re-insert; the id never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_id: Option<String>,
    pub album_track_count: Option<i64>,
    pub duration_secs: i64,
    pub artwork_url: Option<String>,
}

/// A rating row for one (song, profile) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub song_id: String,
    pub score: u8,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// A rating joined with its song, as returned by rating listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedSong {
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_id: Option<String>,
    pub album_track_count: Option<i64>,
    pub artwork_url: Option<String>,
    pub score: u8,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// An unlocked achievement for a profile. Append-only: once a row exists
/// the achievement never flips back to locked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementUnlock {
    pub name: String,
    pub unlocked_at: i64,
}

/// Feature-usage counters tracked per profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageCounter {
    LinksOpened,
    ArtistStatsOpened,
    TopTracksOpened,
    SongsSearched,
    ArtistModeOpened,
}

impl UsageCounter {
    /// Column name in the profile_data table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::LinksOpened => "links_opened",
            Self::ArtistStatsOpened => "artist_stats_opened",
            Self::TopTracksOpened => "top_tracks_opened",
            Self::SongsSearched => "songs_searched",
            Self::ArtistModeOpened => "artist_mode_opened",
        }
    }
}

/// Per-profile usage counters and display preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub profile_name: String,
    pub links_opened: i64,
    pub artist_stats_opened: i64,
    pub top_tracks_opened: i64,
    pub songs_searched: i64,
    pub artist_mode_opened: i64,
    pub top_artists_limit: i64,
    pub top_albums_limit: i64,
    pub show_incomplete_albums: bool,
}

impl ProfileData {
    /// Zero-valued counters and default display preferences for a profile
    /// that has no row yet.
    pub fn defaults(profile_name: &str) -> Self {
        Self {
            profile_name: profile_name.to_string(),
            links_opened: 0,
            artist_stats_opened: 0,
            top_tracks_opened: 0,
            songs_searched: 0,
            artist_mode_opened: 0,
            top_artists_limit: 5,
            top_albums_limit: 10,
            show_incomplete_albums: true,
        }
    }
}

/// Best score reached in the guessing mini-game for one artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameHighscore {
    pub artist_id: String,
    pub best_score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchlistItemType {
    Track,
    Album,
}

impl WatchlistItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Album => "album",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "track" => Some(Self::Track),
            "album" => Some(Self::Album),
            _ => None,
        }
    }
}

/// A watchlist entry; `item_id` references a song or a cached album summary
/// depending on `item_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub item_id: String,
    pub item_type: WatchlistItemType,
    pub created_at: i64,
}

/// Album metadata cached locally when an album lands on a watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub artwork_url: Option<String>,
    pub total_tracks: Option<i64>,
    pub release_date: Option<String>,
}
