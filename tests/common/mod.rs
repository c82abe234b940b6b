//! Common test infrastructure
//!
//! A `TestEnv` bundles a fresh store, a profile register and the temp
//! directory both live in. Tests drive full user flows through the public
//! API only.

use tempfile::TempDir;
use trackrater::profile_register::ActiveProfileRegister;
use trackrater::profile_store::{RatingStore, Song, SqliteProfileStore};

pub struct TestEnv {
    pub store: SqliteProfileStore,
    pub register: ActiveProfileRegister,
    // dropping this deletes the database, keep it alive for the test
    _tmp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let store = SqliteProfileStore::open(tmp.path().join("ratings.db")).unwrap();
        let register = ActiveProfileRegister::new(tmp.path().join("active_profile.json"));
        Self {
            store,
            register,
            _tmp: tmp,
        }
    }

    pub fn with_active_profile(profile: &str) -> Self {
        let env = Self::new();
        env.register.set_active(profile).unwrap();
        env
    }

    /// Store a song and rate it for the given profile in one step.
    pub fn rate(&self, profile: &str, song: &Song, score: f64) {
        self.store.upsert_song(song).unwrap();
        self.store
            .upsert_rating(profile, &song.id, score, None)
            .unwrap();
    }
}

pub fn song(id: &str, title: &str, artist: &str, album: &str) -> Song {
    Song {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        album_id: None,
        album_track_count: None,
        duration_secs: 180,
        artwork_url: None,
    }
}

// not every test binary uses every fixture
#[allow(dead_code)]
pub fn album_song(
    id: &str,
    title: &str,
    artist: &str,
    album: &str,
    album_track_count: i64,
) -> Song {
    Song {
        album_track_count: Some(album_track_count),
        ..song(id, title, artist, album)
    }
}
