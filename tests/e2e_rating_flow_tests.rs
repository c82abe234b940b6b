//! End-to-end tests for the rate-evaluate-aggregate flow.

mod common;

use common::{album_song, song, TestEnv};
use trackrater::achievements;
use trackrater::error::CoreError;
use trackrater::profile_store::{
    AchievementStore, IgnoredSongStore, RatingFilter, RatingSort, RatingStore,
};
use trackrater::stats;

#[test]
fn test_rating_requires_active_profile() {
    let env = TestEnv::new();
    let err = env.register.require_active().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CoreError>(),
        Some(CoreError::NoActiveProfile)
    ));
}

#[test]
fn test_rate_then_evaluate_then_aggregate() {
    let env = TestEnv::with_active_profile("alice");
    let profile = env.register.require_active().unwrap();

    for i in 0..25 {
        env.rate(
            &profile,
            &song(
                &format!("s{}", i),
                &format!("Song {}", i),
                &format!("Artist {}", i % 12),
                "Album",
            ),
            10.0,
        );
    }

    let unlocked: Vec<&str> = achievements::evaluate(&env.store, &profile)
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert!(unlocked.contains(&"pioneer"));
    assert!(unlocked.contains(&"rating_bronze"));
    assert!(unlocked.contains(&"perfection_silver"));
    assert!(unlocked.contains(&"explorer_bronze"));

    let stats = stats::overall_stats(&env.store, &profile).unwrap();
    assert_eq!(stats.total_rated, 25);
    assert_eq!(stats.perfect_count, 25);
    assert_eq!(stats.average_score, 10.0);
}

#[test]
fn test_achievements_survive_rating_deletion() {
    let env = TestEnv::with_active_profile("alice");
    env.rate("alice", &song("s1", "Only Song", "Artist", "Album"), 9.0);
    achievements::evaluate(&env.store, "alice").unwrap();

    env.store.delete_rating("alice", "s1").unwrap();
    achievements::evaluate(&env.store, "alice").unwrap();

    let unlocks = env.store.get_achievement_unlocks("alice").unwrap();
    assert!(unlocks.iter().any(|u| u.name == "pioneer"));
    assert_eq!(env.store.count_ratings("alice").unwrap(), 0);
}

#[test]
fn test_profiles_never_see_each_other() {
    let env = TestEnv::new();
    env.rate("alice", &song("s1", "Song", "Artist", "Album"), 8.0);
    env.store
        .upsert_rating("bob", "s1", 2.0, Some("disagree"))
        .unwrap();
    achievements::evaluate(&env.store, "alice").unwrap();

    assert_eq!(
        env.store.get_rating("alice", "s1").unwrap().unwrap().score,
        8
    );
    assert_eq!(env.store.get_rating("bob", "s1").unwrap().unwrap().score, 2);
    assert!(env.store.get_achievement_unlocks("bob").unwrap().is_empty());

    let bob_stats = stats::overall_stats(&env.store, "bob").unwrap();
    assert_eq!(bob_stats.total_rated, 1);
    assert_eq!(bob_stats.perfect_count, 0);
}

#[test]
fn test_album_completion_with_ignored_tracks() {
    let env = TestEnv::with_active_profile("alice");
    // 12-track album: 10 rated, 2 ignored
    for i in 0..10 {
        env.rate(
            "alice",
            &album_song(&format!("t{}", i), &format!("Track {}", i), "Nova", "Full", 12),
            7.0,
        );
    }
    for i in 10..12 {
        let track = album_song(&format!("t{}", i), &format!("Track {}", i), "Nova", "Full", 12);
        env.store.upsert_song(&track).unwrap();
        env.store.ignore_song("alice", &track.id).unwrap();
    }

    let stats = stats::overall_stats(&env.store, "alice").unwrap();
    assert_eq!(stats.completed_albums.len(), 1);
    assert_eq!(stats.completed_albums[0].album, "Full");
    assert!(stats.incomplete_albums.is_empty());
}

#[test]
fn test_score_boundaries_through_the_full_path() {
    let env = TestEnv::with_active_profile("alice");
    env.store
        .upsert_song(&song("s1", "Song", "Artist", "Album"))
        .unwrap();

    assert!(env.store.upsert_rating("alice", "s1", 0.0, None).is_ok());
    assert!(env.store.upsert_rating("alice", "s1", 10.0, None).is_ok());
    assert!(env.store.upsert_rating("alice", "s1", 10.4, None).is_ok());

    let err = env
        .store
        .upsert_rating("alice", "s1", 10.6, None)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CoreError>(),
        Some(CoreError::InvalidScore(11))
    ));
    assert!(env.store.upsert_rating("alice", "s1", -1.0, None).is_err());
}

#[test]
fn test_list_ratings_filter_sort_and_fallback() {
    let env = TestEnv::with_active_profile("alice");
    env.rate("alice", &song("s1", "Aurora", "Nova", "First"), 9.0);
    env.rate("alice", &song("s2", "Borealis", "Nova", "Second"), 5.0);
    env.rate("alice", &song("s3", "Cascade", "Tide", "Third"), 7.0);

    let filter = RatingFilter {
        artist: Some("Nova".to_string()),
        min_score: Some(6),
        ..Default::default()
    };
    let results = env
        .store
        .list_ratings("alice", &filter, &RatingSort::from_user_input("score", true))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Aurora");

    // unknown sort key falls back to newest-first over everything
    let all = env
        .store
        .list_ratings(
            "alice",
            &RatingFilter::default(),
            &RatingSort::from_user_input("bogus", false),
        )
        .unwrap();
    assert_eq!(all.len(), 3);
}
