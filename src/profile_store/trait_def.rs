//! Store trait definitions.
//!
//! Every operation takes the profile explicitly; resolving the active
//! profile happens once per user action at the application boundary.

use super::filters::{RatingFilter, RatingSort};
use super::models::{
    AchievementUnlock, AlbumSummary, GameHighscore, ProfileData, RatedSong, Rating, Song,
    UsageCounter, WatchlistEntry, WatchlistItemType,
};
use anyhow::Result;

pub trait RatingStore: Send + Sync {
    /// Insert a song or overwrite its attributes if the id already exists.
    fn upsert_song(&self, song: &Song) -> Result<()>;

    /// Get a song by id. Returns Ok(None) if it was never stored.
    fn get_song(&self, song_id: &str) -> Result<Option<Song>>;

    /// Insert or replace the rating for (song_id, profile). The score is
    /// rounded to the nearest integer first; a rounded value outside 0..=10
    /// is rejected. The song row must exist already.
    fn upsert_rating(
        &self,
        profile: &str,
        song_id: &str,
        score: f64,
        notes: Option<&str>,
    ) -> Result<Rating>;

    /// Get the rating for (song_id, profile). Returns Ok(None) if unrated.
    fn get_rating(&self, profile: &str, song_id: &str) -> Result<Option<Rating>>;

    /// List the profile's ratings joined with their songs, filtered and
    /// sorted. Filters and sort never see another profile's rows.
    fn list_ratings(
        &self,
        profile: &str,
        filter: &RatingFilter,
        sort: &RatingSort,
    ) -> Result<Vec<RatedSong>>;

    /// Delete the rating for (song_id, profile). The song row is kept so
    /// the song can be re-rated later. Returns true if a row was removed.
    fn delete_rating(&self, profile: &str, song_id: &str) -> Result<bool>;
}

pub trait WatchlistStore: Send + Sync {
    /// Add an item to the profile's watchlist. Adding the same item twice
    /// is a no-op.
    fn add_watchlist_entry(
        &self,
        profile: &str,
        item_id: &str,
        item_type: WatchlistItemType,
    ) -> Result<()>;

    /// Remove an item from the profile's watchlist. Returns true if a row
    /// was removed.
    fn remove_watchlist_entry(&self, profile: &str, item_id: &str) -> Result<bool>;

    fn get_watchlist(&self, profile: &str) -> Result<Vec<WatchlistEntry>>;

    /// Cache or refresh an album summary (albums are cached only when they
    /// are put on a watchlist).
    fn upsert_album_summary(&self, album: &AlbumSummary) -> Result<()>;

    fn get_album_summary(&self, album_id: &str) -> Result<Option<AlbumSummary>>;

    /// The profile's single free-text watchlist note, if any.
    fn get_watchlist_note(&self, profile: &str) -> Result<Option<String>>;

    fn set_watchlist_note(&self, profile: &str, note: &str) -> Result<()>;
}

pub trait IgnoredSongStore: Send + Sync {
    /// Suppress a song from future search results for this profile.
    /// Ignoring an already-ignored song is a no-op. The song row must
    /// exist already.
    fn ignore_song(&self, profile: &str, song_id: &str) -> Result<()>;

    /// Returns true if a row was removed.
    fn unignore_song(&self, profile: &str, song_id: &str) -> Result<bool>;

    /// The profile's ignored songs joined with their song rows.
    fn get_ignored_songs(&self, profile: &str) -> Result<Vec<Song>>;
}

pub trait ProfileDataStore: Send + Sync {
    /// Increment a feature-usage counter, creating the profile row on first
    /// touch.
    fn increment_usage(&self, profile: &str, counter: UsageCounter) -> Result<()>;

    /// Usage counters and display preferences; zero-valued defaults when
    /// the profile has no row yet.
    fn get_profile_data(&self, profile: &str) -> Result<ProfileData>;

    /// Update the profile's display preferences.
    fn set_display_preferences(
        &self,
        profile: &str,
        top_artists_limit: i64,
        top_albums_limit: i64,
        show_incomplete_albums: bool,
    ) -> Result<()>;
}

pub trait HighscoreStore: Send + Sync {
    /// Record a mini-game result. Keeps the best score per (profile,
    /// artist); returns true if the stored highscore improved.
    fn record_highscore(&self, profile: &str, artist_id: &str, score: i64) -> Result<bool>;

    fn get_highscore(&self, profile: &str, artist_id: &str) -> Result<Option<i64>>;

    fn get_highscores(&self, profile: &str) -> Result<Vec<GameHighscore>>;
}

/// Unlock bookkeeping plus the typed counting queries the achievement
/// catalog's strategies map onto.
pub trait AchievementStore: Send + Sync {
    /// Insert an unlock row if none exists yet; unlocking twice is a no-op.
    /// Returns true if the row was newly inserted. `unlocked_at` defaults
    /// to now.
    fn unlock_achievement(
        &self,
        profile: &str,
        name: &str,
        unlocked_at: Option<i64>,
    ) -> Result<bool>;

    fn get_achievement_unlocks(&self, profile: &str) -> Result<Vec<AchievementUnlock>>;

    fn count_ratings(&self, profile: &str) -> Result<i64>;

    /// Ratings with a perfect score of 10.
    fn count_perfect_ratings(&self, profile: &str) -> Result<i64>;

    /// Ratings with a score of 2 or below.
    fn count_low_ratings(&self, profile: &str) -> Result<i64>;

    fn count_distinct_artists(&self, profile: &str) -> Result<i64>;

    /// Distinct rated songs with a synthesized `custom-` id.
    fn count_custom_songs(&self, profile: &str) -> Result<i64>;

    /// Distinct calendar days on which the profile rated something.
    fn count_distinct_rating_days(&self, profile: &str) -> Result<i64>;

    /// Unlocked achievements whose name ends with the given tier suffix.
    fn count_unlocked_with_suffix(&self, profile: &str, suffix: &str) -> Result<i64>;

    fn usage_counter_value(&self, profile: &str, counter: UsageCounter) -> Result<i64>;
}

/// Combined trait for the full profile-scoped store.
pub trait FullProfileStore:
    RatingStore
    + WatchlistStore
    + IgnoredSongStore
    + ProfileDataStore
    + HighscoreStore
    + AchievementStore
{
}

impl<T> FullProfileStore for T where
    T: RatingStore
        + WatchlistStore
        + IgnoredSongStore
        + ProfileDataStore
        + HighscoreStore
        + AchievementStore
{
}
