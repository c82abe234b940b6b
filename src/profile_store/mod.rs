mod filters;
mod models;
mod schema;
mod store;
mod trait_def;

pub use filters::{RatingFilter, RatingSort, SortKey, SortOrder};
pub use models::{
    AchievementUnlock, AlbumSummary, GameHighscore, ProfileData, RatedSong, Rating, Song,
    UsageCounter, WatchlistEntry, WatchlistItemType,
};
pub use schema::PROFILE_STORE_TABLES;
pub use store::SqliteProfileStore;
pub use trait_def::{
    AchievementStore, FullProfileStore, HighscoreStore, IgnoredSongStore, ProfileDataStore,
    RatingStore, WatchlistStore,
};
