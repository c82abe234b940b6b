//! SQLite schema for the profile store.
//!
//! Every profile-scoped table carries a `profile_name` column and a unique
//! constraint pairing it with the entity key, so one local database holds
//! any number of isolated profiles.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ForeignKey, SqlType, Table, DEFAULT_TIMESTAMP};

const SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "song",
    foreign_column: "id",
};

const SONG_TABLE: Table = Table {
    name: "song",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("album", &SqlType::Text, non_null = true),
        sqlite_column!("album_id", &SqlType::Text),
        sqlite_column!("album_track_count", &SqlType::Integer),
        sqlite_column!("duration_secs", &SqlType::Integer, non_null = true),
        sqlite_column!("artwork_url", &SqlType::Text),
    ],
    unique_constraints: &[],
    indices: &[("idx_song_artist", "artist"), ("idx_song_album", "album")],
};

const RATING_TABLE: Table = Table {
    name: "rating",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&SONG_FK)
        ),
        sqlite_column!("profile_name", &SqlType::Text, non_null = true),
        sqlite_column!("score", &SqlType::Integer, non_null = true),
        sqlite_column!("notes", &SqlType::Text),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[&["song_id", "profile_name"]],
    indices: &[("idx_rating_profile", "profile_name")],
};

const ACHIEVEMENT_UNLOCK_TABLE: Table = Table {
    name: "achievement_unlock",
    columns: &[
        sqlite_column!("profile_name", &SqlType::Text, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "unlocked_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[&["profile_name", "name"]],
    indices: &[("idx_achievement_unlock_profile", "profile_name")],
};

const PROFILE_DATA_TABLE: Table = Table {
    name: "profile_data",
    columns: &[
        sqlite_column!("profile_name", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "links_opened",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "artist_stats_opened",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "top_tracks_opened",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "songs_searched",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "artist_mode_opened",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "top_artists_limit",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("5")
        ),
        sqlite_column!(
            "top_albums_limit",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("10")
        ),
        sqlite_column!(
            "show_incomplete_albums",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("1")
        ),
    ],
    unique_constraints: &[],
    indices: &[],
};

const GAME_HIGHSCORE_TABLE: Table = Table {
    name: "game_highscore",
    columns: &[
        sqlite_column!("profile_name", &SqlType::Text, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("best_score", &SqlType::Integer, non_null = true),
    ],
    unique_constraints: &[&["profile_name", "artist_id"]],
    indices: &[],
};

// item_id is polymorphic (song or album summary depending on item_type),
// so no foreign key here.
const WATCHLIST_ENTRY_TABLE: Table = Table {
    name: "watchlist_entry",
    columns: &[
        sqlite_column!("item_id", &SqlType::Text, non_null = true),
        sqlite_column!("profile_name", &SqlType::Text, non_null = true),
        sqlite_column!("item_type", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[&["item_id", "profile_name"]],
    indices: &[("idx_watchlist_entry_profile", "profile_name")],
};

const ALBUM_SUMMARY_TABLE: Table = Table {
    name: "album_summary",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("artwork_url", &SqlType::Text),
        sqlite_column!("total_tracks", &SqlType::Integer),
        sqlite_column!("release_date", &SqlType::Text),
    ],
    unique_constraints: &[],
    indices: &[],
};

const IGNORED_SONG_TABLE: Table = Table {
    name: "ignored_song",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&SONG_FK)
        ),
        sqlite_column!("profile_name", &SqlType::Text, non_null = true),
    ],
    unique_constraints: &[&["song_id", "profile_name"]],
    indices: &[("idx_ignored_song_profile", "profile_name")],
};

const WATCHLIST_NOTE_TABLE: Table = Table {
    name: "watchlist_note",
    columns: &[
        sqlite_column!("profile_name", &SqlType::Text, is_primary_key = true),
        sqlite_column!("note", &SqlType::Text, non_null = true),
    ],
    unique_constraints: &[],
    indices: &[],
};

pub const PROFILE_STORE_TABLES: &[Table] = &[
    SONG_TABLE,
    RATING_TABLE,
    ACHIEVEMENT_UNLOCK_TABLE,
    PROFILE_DATA_TABLE,
    GAME_HIGHSCORE_TABLE,
    WATCHLIST_ENTRY_TABLE,
    ALBUM_SUMMARY_TABLE,
    IGNORED_SONG_TABLE,
    WATCHLIST_NOTE_TABLE,
];
