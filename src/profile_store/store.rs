//! SQLite-backed profile store implementation.

use super::filters::{RatingFilter, RatingSort};
use super::models::{
    AchievementUnlock, AlbumSummary, GameHighscore, ProfileData, RatedSong, Rating, Song,
    UsageCounter, WatchlistEntry, WatchlistItemType,
};
use super::schema::PROFILE_STORE_TABLES;
use super::trait_def::{
    AchievementStore, HighscoreStore, IgnoredSongStore, ProfileDataStore, RatingStore,
    WatchlistStore,
};
use crate::error::CoreError;
use crate::snapshot::SnapshotDocument;
use crate::sqlite_persistence::apply_schema;
use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// SQLite-backed store for all profile-scoped data.
///
/// There is exactly one lazily-opened connection per store; the first
/// access creates the schema idempotently. `reset` drops the connection
/// and deletes the database file, so the next access starts empty.
#[derive(Clone)]
pub struct SqliteProfileStore {
    db_path: PathBuf,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteProfileStore {
    /// Create a handle without touching the filesystem yet.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a handle and open the database eagerly, so initialization
    /// failures surface immediately instead of on the first operation.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let store = Self::new(db_path);
        store.with_conn(|_| Ok(()))?;
        Ok(store)
    }

    fn open_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open rating database at {:?}", db_path))?;
        apply_schema(&conn, PROFILE_STORE_TABLES)
            .context("Failed to initialize rating database schema")?;
        info!("Rating database ready at {:?}", db_path);
        Ok(conn)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut guard = self.conn.lock().unwrap();
        if guard.is_none() {
            *guard = Some(Self::open_connection(&self.db_path)?);
        }
        f(guard.as_ref().unwrap())
    }

    /// Destructive reset: close the handle and delete the database file.
    /// Irreversible; the caller is expected to have confirmed with the user.
    pub fn reset(&self) -> Result<()> {
        let mut guard = self.conn.lock().unwrap();
        guard.take();
        if self.db_path.exists() {
            std::fs::remove_file(&self.db_path)
                .with_context(|| format!("Failed to delete database file {:?}", self.db_path))?;
        }
        info!("Rating database at {:?} was reset", self.db_path);
        Ok(())
    }

    /// Rated songs whose album identifier is still unknown (candidates for
    /// catalog backfill). Custom songs are excluded, they never have one.
    pub fn rated_songs_missing_album_info(&self, profile: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT DISTINCT song.id FROM song
                 JOIN rating ON rating.song_id = song.id
                 WHERE rating.profile_name = ?1
                   AND song.album_id IS NULL
                   AND song.id NOT LIKE 'custom-%'",
            )?;
            let ids = stmt
                .query_map(params![profile], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(ids)
        })
    }

    /// Fill in album metadata resolved through the external catalog.
    pub fn set_song_album_info(
        &self,
        song_id: &str,
        album_id: &str,
        album_track_count: Option<i64>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE song SET album_id = ?1,
                        album_track_count = COALESCE(?2, album_track_count)
                 WHERE id = ?3",
                params![album_id, album_track_count, song_id],
            )?;
            Ok(())
        })
    }

    /// Apply a snapshot document as one transaction: songs first, then
    /// ratings, then the remaining tables, each as an explicit upsert on
    /// the table's unique key. Any failure rolls the whole import back.
    pub fn apply_snapshot(&self, doc: &SnapshotDocument) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            let profile = doc.profile_name.as_str();
            {
                let mut song_stmt = tx.prepare_cached(
                    "INSERT INTO song (id, title, artist, album, album_id, album_track_count, duration_secs, artwork_url)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(id) DO UPDATE SET
                        title = excluded.title,
                        artist = excluded.artist,
                        album = excluded.album,
                        album_id = excluded.album_id,
                        album_track_count = excluded.album_track_count,
                        duration_secs = excluded.duration_secs,
                        artwork_url = excluded.artwork_url",
                )?;
                for song in &doc.songs {
                    song_stmt.execute(params![
                        song.id,
                        song.title,
                        song.artist,
                        song.album,
                        song.album_id,
                        song.album_track_count,
                        song.duration_secs,
                        song.artwork_url,
                    ])?;
                }

                let mut rating_stmt = tx.prepare_cached(
                    "INSERT INTO rating (song_id, profile_name, score, notes, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(song_id, profile_name) DO UPDATE SET
                        score = excluded.score,
                        notes = excluded.notes,
                        created_at = excluded.created_at",
                )?;
                for rating in &doc.ratings {
                    rating_stmt.execute(params![
                        rating.song_id,
                        profile,
                        rating.score,
                        rating.notes,
                        rating.created_at,
                    ])?;
                }

                let mut unlock_stmt = tx.prepare_cached(
                    "INSERT OR IGNORE INTO achievement_unlock (profile_name, name, unlocked_at)
                     VALUES (?1, ?2, ?3)",
                )?;
                for unlock in &doc.achievements {
                    unlock_stmt.execute(params![profile, unlock.name, unlock.unlocked_at])?;
                }

                let mut profile_data_stmt = tx.prepare_cached(
                    "INSERT INTO profile_data (profile_name, links_opened, artist_stats_opened,
                        top_tracks_opened, songs_searched, artist_mode_opened,
                        top_artists_limit, top_albums_limit, show_incomplete_albums)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                     ON CONFLICT(profile_name) DO UPDATE SET
                        links_opened = excluded.links_opened,
                        artist_stats_opened = excluded.artist_stats_opened,
                        top_tracks_opened = excluded.top_tracks_opened,
                        songs_searched = excluded.songs_searched,
                        artist_mode_opened = excluded.artist_mode_opened,
                        top_artists_limit = excluded.top_artists_limit,
                        top_albums_limit = excluded.top_albums_limit,
                        show_incomplete_albums = excluded.show_incomplete_albums",
                )?;
                for data in &doc.profiledata {
                    profile_data_stmt.execute(params![
                        profile,
                        data.links_opened,
                        data.artist_stats_opened,
                        data.top_tracks_opened,
                        data.songs_searched,
                        data.artist_mode_opened,
                        data.top_artists_limit,
                        data.top_albums_limit,
                        data.show_incomplete_albums as i64,
                    ])?;
                }

                let mut highscore_stmt = tx.prepare_cached(
                    "INSERT INTO game_highscore (profile_name, artist_id, best_score)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(profile_name, artist_id) DO UPDATE SET
                        best_score = MAX(best_score, excluded.best_score)",
                )?;
                for highscore in &doc.game_highscores {
                    highscore_stmt.execute(params![
                        profile,
                        highscore.artist_id,
                        highscore.best_score,
                    ])?;
                }

                let mut album_stmt = tx.prepare_cached(
                    "INSERT INTO album_summary (id, title, artist, artwork_url, total_tracks, release_date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT(id) DO UPDATE SET
                        title = excluded.title,
                        artist = excluded.artist,
                        artwork_url = excluded.artwork_url,
                        total_tracks = excluded.total_tracks,
                        release_date = excluded.release_date",
                )?;
                for album in &doc.albums {
                    album_stmt.execute(params![
                        album.id,
                        album.title,
                        album.artist,
                        album.artwork_url,
                        album.total_tracks,
                        album.release_date,
                    ])?;
                }

                let mut watchlist_stmt = tx.prepare_cached(
                    "INSERT INTO watchlist_entry (item_id, profile_name, item_type, created_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(item_id, profile_name) DO UPDATE SET
                        item_type = excluded.item_type,
                        created_at = excluded.created_at",
                )?;
                for entry in &doc.watchlist {
                    watchlist_stmt.execute(params![
                        entry.item_id,
                        profile,
                        entry.item_type.as_str(),
                        entry.created_at,
                    ])?;
                }

                let mut note_stmt = tx.prepare_cached(
                    "INSERT INTO watchlist_note (profile_name, note) VALUES (?1, ?2)
                     ON CONFLICT(profile_name) DO UPDATE SET note = excluded.note",
                )?;
                for note in &doc.global_watchlist_notes {
                    note_stmt.execute(params![profile, note])?;
                }

                let mut ignored_stmt = tx.prepare_cached(
                    "INSERT OR IGNORE INTO ignored_song (song_id, profile_name) VALUES (?1, ?2)",
                )?;
                for song_id in &doc.ignored_songs {
                    ignored_stmt.execute(params![song_id, profile])?;
                }
            }
            tx.commit().context("Failed to commit snapshot import")?;
            Ok(())
        })
    }
}

fn song_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        album: row.get(3)?,
        album_id: row.get(4)?,
        album_track_count: row.get(5)?,
        duration_secs: row.get(6)?,
        artwork_url: row.get(7)?,
    })
}

impl RatingStore for SqliteProfileStore {
    fn upsert_song(&self, song: &Song) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO song (id, title, artist, album, album_id, album_track_count, duration_secs, artwork_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    artist = excluded.artist,
                    album = excluded.album,
                    album_id = excluded.album_id,
                    album_track_count = excluded.album_track_count,
                    duration_secs = excluded.duration_secs,
                    artwork_url = excluded.artwork_url",
                params![
                    song.id,
                    song.title,
                    song.artist,
                    song.album,
                    song.album_id,
                    song.album_track_count,
                    song.duration_secs,
                    song.artwork_url,
                ],
            )
            .with_context(|| format!("Failed to upsert song {}", song.id))?;
            Ok(())
        })
    }

    fn get_song(&self, song_id: &str) -> Result<Option<Song>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, title, artist, album, album_id, album_track_count, duration_secs, artwork_url
                 FROM song WHERE id = ?1",
            )?;
            Ok(stmt
                .query_row(params![song_id], song_from_row)
                .optional()?)
        })
    }

    fn upsert_rating(
        &self,
        profile: &str,
        song_id: &str,
        score: f64,
        notes: Option<&str>,
    ) -> Result<Rating> {
        // In-progress UI values can be fractional; rounding happens here at
        // the write boundary. Out-of-range values are rejected, not clamped.
        let rounded = score.round() as i64;
        if !(0..=10).contains(&rounded) {
            return Err(CoreError::InvalidScore(rounded).into());
        }
        let created_at = now_unix();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO rating (song_id, profile_name, score, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(song_id, profile_name) DO UPDATE SET
                    score = excluded.score,
                    notes = excluded.notes,
                    created_at = excluded.created_at",
                params![song_id, profile, rounded, notes, created_at],
            )
            .with_context(|| format!("Failed to upsert rating for song {}", song_id))?;
            debug!("upsert_rating({profile}, {song_id}) -> {rounded}");
            Ok(Rating {
                song_id: song_id.to_string(),
                score: rounded as u8,
                notes: notes.map(|n| n.to_string()),
                created_at,
            })
        })
    }

    fn get_rating(&self, profile: &str, song_id: &str) -> Result<Option<Rating>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT score, notes, created_at FROM rating
                 WHERE song_id = ?1 AND profile_name = ?2",
            )?;
            Ok(stmt
                .query_row(params![song_id, profile], |row| {
                    Ok(Rating {
                        song_id: song_id.to_string(),
                        score: row.get(0)?,
                        notes: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })
                .optional()?)
        })
    }

    fn list_ratings(
        &self,
        profile: &str,
        filter: &RatingFilter,
        sort: &RatingSort,
    ) -> Result<Vec<RatedSong>> {
        let mut sql = String::from(
            "SELECT rating.song_id, song.title, song.artist, song.album, song.album_id,
                    song.album_track_count, song.artwork_url, rating.score, rating.notes,
                    rating.created_at
             FROM rating JOIN song ON rating.song_id = song.id
             WHERE rating.profile_name = ?",
        );
        let mut values: Vec<Value> = vec![Value::Text(profile.to_string())];

        if let Some(title) = &filter.title {
            sql.push_str(" AND song.title LIKE '%' || ? || '%'");
            values.push(Value::Text(title.clone()));
        }
        if let Some(artist) = &filter.artist {
            sql.push_str(" AND song.artist LIKE '%' || ? || '%'");
            values.push(Value::Text(artist.clone()));
        }
        if let Some(album) = &filter.album {
            sql.push_str(" AND song.album LIKE '%' || ? || '%'");
            values.push(Value::Text(album.clone()));
        }
        if filter.min_score.is_some() || filter.max_score.is_some() {
            sql.push_str(" AND rating.score BETWEEN ? AND ?");
            values.push(Value::Integer(filter.min_score.unwrap_or(0) as i64));
            values.push(Value::Integer(filter.max_score.unwrap_or(10) as i64));
        }
        sql.push(' ');
        sql.push_str(&sort.order_by_sql());

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), |row| {
                    Ok(RatedSong {
                        song_id: row.get(0)?,
                        title: row.get(1)?,
                        artist: row.get(2)?,
                        album: row.get(3)?,
                        album_id: row.get(4)?,
                        album_track_count: row.get(5)?,
                        artwork_url: row.get(6)?,
                        score: row.get(7)?,
                        notes: row.get(8)?,
                        created_at: row.get(9)?,
                    })
                })?
                .collect::<Result<Vec<RatedSong>, _>>()?;
            Ok(rows)
        })
    }

    fn delete_rating(&self, profile: &str, song_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM rating WHERE song_id = ?1 AND profile_name = ?2",
                params![song_id, profile],
            )?;
            Ok(deleted > 0)
        })
    }
}

impl WatchlistStore for SqliteProfileStore {
    fn add_watchlist_entry(
        &self,
        profile: &str,
        item_id: &str,
        item_type: WatchlistItemType,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO watchlist_entry (item_id, profile_name, item_type)
                 VALUES (?1, ?2, ?3)",
                params![item_id, profile, item_type.as_str()],
            )?;
            Ok(())
        })
    }

    fn remove_watchlist_entry(&self, profile: &str, item_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM watchlist_entry WHERE item_id = ?1 AND profile_name = ?2",
                params![item_id, profile],
            )?;
            Ok(deleted > 0)
        })
    }

    fn get_watchlist(&self, profile: &str) -> Result<Vec<WatchlistEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT item_id, item_type, created_at FROM watchlist_entry
                 WHERE profile_name = ?1 ORDER BY created_at",
            )?;
            let entries = stmt
                .query_map(params![profile], |row| {
                    let type_str: String = row.get(1)?;
                    Ok((row.get::<_, String>(0)?, type_str, row.get::<_, i64>(2)?))
                })?
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .filter_map(|(item_id, type_str, created_at)| {
                    WatchlistItemType::parse(&type_str).map(|item_type| WatchlistEntry {
                        item_id,
                        item_type,
                        created_at,
                    })
                })
                .collect();
            Ok(entries)
        })
    }

    fn upsert_album_summary(&self, album: &AlbumSummary) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO album_summary (id, title, artist, artwork_url, total_tracks, release_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    artist = excluded.artist,
                    artwork_url = excluded.artwork_url,
                    total_tracks = excluded.total_tracks,
                    release_date = excluded.release_date",
                params![
                    album.id,
                    album.title,
                    album.artist,
                    album.artwork_url,
                    album.total_tracks,
                    album.release_date,
                ],
            )?;
            Ok(())
        })
    }

    fn get_album_summary(&self, album_id: &str) -> Result<Option<AlbumSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, title, artist, artwork_url, total_tracks, release_date
                 FROM album_summary WHERE id = ?1",
            )?;
            Ok(stmt
                .query_row(params![album_id], |row| {
                    Ok(AlbumSummary {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        artist: row.get(2)?,
                        artwork_url: row.get(3)?,
                        total_tracks: row.get(4)?,
                        release_date: row.get(5)?,
                    })
                })
                .optional()?)
        })
    }

    fn get_watchlist_note(&self, profile: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare_cached("SELECT note FROM watchlist_note WHERE profile_name = ?1")?;
            Ok(stmt.query_row(params![profile], |row| row.get(0)).optional()?)
        })
    }

    fn set_watchlist_note(&self, profile: &str, note: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO watchlist_note (profile_name, note) VALUES (?1, ?2)
                 ON CONFLICT(profile_name) DO UPDATE SET note = excluded.note",
                params![profile, note],
            )?;
            Ok(())
        })
    }
}

impl IgnoredSongStore for SqliteProfileStore {
    fn ignore_song(&self, profile: &str, song_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO ignored_song (song_id, profile_name) VALUES (?1, ?2)",
                params![song_id, profile],
            )
            .with_context(|| format!("Failed to ignore song {}", song_id))?;
            Ok(())
        })
    }

    fn unignore_song(&self, profile: &str, song_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM ignored_song WHERE song_id = ?1 AND profile_name = ?2",
                params![song_id, profile],
            )?;
            Ok(deleted > 0)
        })
    }

    fn get_ignored_songs(&self, profile: &str) -> Result<Vec<Song>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT song.id, song.title, song.artist, song.album, song.album_id,
                        song.album_track_count, song.duration_secs, song.artwork_url
                 FROM ignored_song JOIN song ON song.id = ignored_song.song_id
                 WHERE ignored_song.profile_name = ?1 ORDER BY song.title",
            )?;
            let songs = stmt
                .query_map(params![profile], song_from_row)?
                .collect::<Result<Vec<Song>, _>>()?;
            Ok(songs)
        })
    }
}

impl ProfileDataStore for SqliteProfileStore {
    fn increment_usage(&self, profile: &str, counter: UsageCounter) -> Result<()> {
        let column = counter.column();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO profile_data (profile_name) VALUES (?1)",
                params![profile],
            )?;
            conn.execute(
                &format!(
                    "UPDATE profile_data SET {} = {} + 1 WHERE profile_name = ?1",
                    column, column
                ),
                params![profile],
            )?;
            Ok(())
        })
    }

    fn get_profile_data(&self, profile: &str) -> Result<ProfileData> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT links_opened, artist_stats_opened, top_tracks_opened, songs_searched,
                        artist_mode_opened, top_artists_limit, top_albums_limit,
                        show_incomplete_albums
                 FROM profile_data WHERE profile_name = ?1",
            )?;
            let row = stmt
                .query_row(params![profile], |row| {
                    Ok(ProfileData {
                        profile_name: profile.to_string(),
                        links_opened: row.get(0)?,
                        artist_stats_opened: row.get(1)?,
                        top_tracks_opened: row.get(2)?,
                        songs_searched: row.get(3)?,
                        artist_mode_opened: row.get(4)?,
                        top_artists_limit: row.get(5)?,
                        top_albums_limit: row.get(6)?,
                        show_incomplete_albums: row.get::<_, i64>(7)? != 0,
                    })
                })
                .optional()?;
            Ok(row.unwrap_or_else(|| ProfileData::defaults(profile)))
        })
    }

    fn set_display_preferences(
        &self,
        profile: &str,
        top_artists_limit: i64,
        top_albums_limit: i64,
        show_incomplete_albums: bool,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO profile_data (profile_name) VALUES (?1)",
                params![profile],
            )?;
            conn.execute(
                "UPDATE profile_data SET top_artists_limit = ?1, top_albums_limit = ?2,
                        show_incomplete_albums = ?3
                 WHERE profile_name = ?4",
                params![
                    top_artists_limit,
                    top_albums_limit,
                    show_incomplete_albums as i64,
                    profile
                ],
            )?;
            Ok(())
        })
    }
}

impl HighscoreStore for SqliteProfileStore {
    fn record_highscore(&self, profile: &str, artist_id: &str, score: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let previous: Option<i64> = conn
                .query_row(
                    "SELECT best_score FROM game_highscore
                     WHERE profile_name = ?1 AND artist_id = ?2",
                    params![profile, artist_id],
                    |row| row.get(0),
                )
                .optional()?;
            conn.execute(
                "INSERT INTO game_highscore (profile_name, artist_id, best_score)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(profile_name, artist_id) DO UPDATE SET
                    best_score = MAX(best_score, excluded.best_score)",
                params![profile, artist_id, score],
            )?;
            Ok(previous.map(|best| score > best).unwrap_or(true))
        })
    }

    fn get_highscore(&self, profile: &str, artist_id: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT best_score FROM game_highscore
                     WHERE profile_name = ?1 AND artist_id = ?2",
                    params![profile, artist_id],
                    |row| row.get(0),
                )
                .optional()?)
        })
    }

    fn get_highscores(&self, profile: &str) -> Result<Vec<GameHighscore>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT artist_id, best_score FROM game_highscore
                 WHERE profile_name = ?1 ORDER BY best_score DESC",
            )?;
            let highscores = stmt
                .query_map(params![profile], |row| {
                    Ok(GameHighscore {
                        artist_id: row.get(0)?,
                        best_score: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(highscores)
        })
    }
}

impl AchievementStore for SqliteProfileStore {
    fn unlock_achievement(
        &self,
        profile: &str,
        name: &str,
        unlocked_at: Option<i64>,
    ) -> Result<bool> {
        let unlocked_at = unlocked_at.unwrap_or_else(now_unix);
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO achievement_unlock (profile_name, name, unlocked_at)
                 VALUES (?1, ?2, ?3)",
                params![profile, name, unlocked_at],
            )?;
            Ok(inserted > 0)
        })
    }

    fn get_achievement_unlocks(&self, profile: &str) -> Result<Vec<AchievementUnlock>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT name, unlocked_at FROM achievement_unlock
                 WHERE profile_name = ?1 ORDER BY unlocked_at",
            )?;
            let unlocks = stmt
                .query_map(params![profile], |row| {
                    Ok(AchievementUnlock {
                        name: row.get(0)?,
                        unlocked_at: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(unlocks)
        })
    }

    fn count_ratings(&self, profile: &str) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM rating WHERE profile_name = ?1",
                params![profile],
                |row| row.get(0),
            )?)
        })
    }

    fn count_perfect_ratings(&self, profile: &str) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM rating WHERE profile_name = ?1 AND score = 10",
                params![profile],
                |row| row.get(0),
            )?)
        })
    }

    fn count_low_ratings(&self, profile: &str) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM rating WHERE profile_name = ?1 AND score <= 2",
                params![profile],
                |row| row.get(0),
            )?)
        })
    }

    fn count_distinct_artists(&self, profile: &str) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(DISTINCT song.artist) FROM rating
                 JOIN song ON rating.song_id = song.id
                 WHERE rating.profile_name = ?1",
                params![profile],
                |row| row.get(0),
            )?)
        })
    }

    fn count_custom_songs(&self, profile: &str) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(DISTINCT song_id) FROM rating
                 WHERE profile_name = ?1 AND song_id LIKE 'custom-%'",
                params![profile],
                |row| row.get(0),
            )?)
        })
    }

    fn count_distinct_rating_days(&self, profile: &str) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(DISTINCT date(created_at, 'unixepoch')) FROM rating
                 WHERE profile_name = ?1",
                params![profile],
                |row| row.get(0),
            )?)
        })
    }

    fn count_unlocked_with_suffix(&self, profile: &str, suffix: &str) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM achievement_unlock
                 WHERE profile_name = ?1 AND name LIKE ?2",
                params![profile, format!("%{}", suffix)],
                |row| row.get(0),
            )?)
        })
    }

    fn usage_counter_value(&self, profile: &str, counter: UsageCounter) -> Result<i64> {
        self.with_conn(|conn| {
            let value: Option<i64> = conn
                .query_row(
                    &format!(
                        "SELECT {} FROM profile_data WHERE profile_name = ?1",
                        counter.column()
                    ),
                    params![profile],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value.unwrap_or(0))
        })
    }
}
