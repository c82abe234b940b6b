//! End-to-end tests for snapshot export and import.

mod common;

use common::{song, TestEnv};
use trackrater::profile_store::{
    AchievementStore, HighscoreStore, IgnoredSongStore, ProfileDataStore, RatingStore,
    UsageCounter, WatchlistItemType, WatchlistStore,
};
use trackrater::snapshot::{export_profile, import_snapshot, SnapshotDocument};

fn populated_env() -> TestEnv {
    let env = TestEnv::with_active_profile("alice");
    env.rate("alice", &song("s1", "Aurora", "Nova", "First"), 10.0);
    env.rate("alice", &song("s2", "Borealis", "Nova", "First"), 6.0);
    env.rate("alice", &song("s3", "Cascade", "Tide", "Second"), 3.0);
    env.store.ignore_song("alice", "s3").unwrap();
    env.store
        .add_watchlist_entry("alice", "s2", WatchlistItemType::Track)
        .unwrap();
    env.store
        .set_watchlist_note("alice", "check the new single")
        .unwrap();
    env.store.record_highscore("alice", "nova", 120).unwrap();
    env.store
        .increment_usage("alice", UsageCounter::SongsSearched)
        .unwrap();
    env.store
        .unlock_achievement("alice", "pioneer", Some(1_700_000_000))
        .unwrap();
    env
}

#[test]
fn test_round_trip_into_empty_store() {
    let source = populated_env();
    let doc = export_profile(&source.store, "alice").unwrap();

    let target = TestEnv::new();
    let outcome = import_snapshot(&target.store, &target.register, None, &doc).unwrap();

    assert_eq!(outcome.profile_name, "alice");
    assert_eq!(target.register.require_active().unwrap(), "alice");

    let reexported = export_profile(&target.store, "alice").unwrap();
    assert_eq!(reexported.songs, doc.songs);
    assert_eq!(reexported.ratings, doc.ratings);
    assert_eq!(reexported.watchlist, doc.watchlist);
    assert_eq!(reexported.game_highscores, doc.game_highscores);
    assert_eq!(reexported.ignored_songs, doc.ignored_songs);
    assert_eq!(reexported.global_watchlist_notes, doc.global_watchlist_notes);
    assert_eq!(reexported.profiledata, doc.profiledata);
}

#[test]
fn test_document_survives_json_serialization() {
    let source = populated_env();
    let doc = export_profile(&source.store, "alice").unwrap();

    let json = serde_json::to_string_pretty(&doc).unwrap();
    let parsed: SnapshotDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, doc);
    assert!(json.contains("\"profileName\""));
}

#[test]
fn test_reimport_is_idempotent() {
    let env = populated_env();
    let doc = export_profile(&env.store, "alice").unwrap();

    import_snapshot(&env.store, &env.register, None, &doc).unwrap();
    import_snapshot(&env.store, &env.register, None, &doc).unwrap();

    assert_eq!(env.store.count_ratings("alice").unwrap(), 3);
    assert_eq!(env.store.get_watchlist("alice").unwrap().len(), 1);
    // the original unlock timestamp is kept across re-imports
    let unlocks = env.store.get_achievement_unlocks("alice").unwrap();
    let pioneer = unlocks.iter().find(|u| u.name == "pioneer").unwrap();
    assert_eq!(pioneer.unlocked_at, 1_700_000_000);
}

#[test]
fn test_import_merges_with_existing_data() {
    let source = populated_env();
    let doc = export_profile(&source.store, "alice").unwrap();

    // the target already has its own rating for s1 and one extra song
    let target = TestEnv::with_active_profile("alice");
    target.rate("alice", &song("s1", "Aurora", "Nova", "First"), 2.0);
    target.rate("alice", &song("s9", "Local Only", "Tide", "Third"), 8.0);

    import_snapshot(&target.store, &target.register, None, &doc).unwrap();

    // imported rating wins on the shared key, local-only data survives
    assert_eq!(
        target.store.get_rating("alice", "s1").unwrap().unwrap().score,
        10
    );
    assert_eq!(
        target.store.get_rating("alice", "s9").unwrap().unwrap().score,
        8
    );
    assert_eq!(target.store.count_ratings("alice").unwrap(), 4);
}

#[test]
fn test_failed_import_rolls_back_everything() {
    let env = TestEnv::with_active_profile("bob");
    env.rate("bob", &song("s1", "Keep", "Me", "Around"), 7.0);

    let mut doc = export_profile(&env.store, "bob").unwrap();
    doc.profile_name = "alice".to_string();
    doc.songs.push(song("s2", "New Song", "Artist", "Album"));
    // a rating referencing a song that exists nowhere breaks the import
    doc.ratings.push(trackrater::snapshot::SnapshotRating {
        song_id: "missing".to_string(),
        score: 5,
        created_at: 1_700_000_000,
        notes: None,
    });

    assert!(import_snapshot(&env.store, &env.register, None, &doc).is_err());

    // nothing from the document landed, the register still points at bob
    assert!(env.store.get_song("s2").unwrap().is_none());
    assert_eq!(env.store.count_ratings("alice").unwrap(), 0);
    assert_eq!(env.register.require_active().unwrap(), "bob");
}

#[test]
fn test_import_of_minimal_document() {
    let json = r#"{
        "profileName": "carol",
        "songs": [
            {"id": "s1", "title": "Solo", "artist": "One", "album": "Single",
             "album_id": null, "album_track_count": null,
             "duration_secs": 200, "artwork_url": null}
        ],
        "ratings": [
            {"song_id": "s1", "score": 10, "created_at": 1700000000, "notes": null}
        ]
    }"#;
    let doc: SnapshotDocument = serde_json::from_str(json).unwrap();

    let env = TestEnv::new();
    let outcome = import_snapshot(&env.store, &env.register, None, &doc).unwrap();

    assert_eq!(outcome.ratings_imported, 1);
    assert!(outcome.newly_unlocked.contains(&"pioneer"));
    assert!(outcome.newly_unlocked.contains(&"perfection_first"));
    assert_eq!(env.register.require_active().unwrap(), "carol");
}
