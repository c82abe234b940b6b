//! Statistics aggregation over a profile's ratings.
//!
//! Aggregates are pure functions of the store's current state and degrade
//! to zero-valued results when the profile has no ratings.

use super::models::{AlbumAverage, AlbumCompletion, ArtistAverage, ArtistStats, OverallStats};
use crate::profile_store::{
    IgnoredSongStore, ProfileDataStore, RatedSong, RatingFilter, RatingSort, RatingStore,
};
use anyhow::Result;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct ScoreAccumulator {
    sum: i64,
    count: usize,
}

impl ScoreAccumulator {
    fn push(&mut self, score: u8) {
        self.sum += score as i64;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }
}

/// Sort by average descending; ties go to the larger sample, then the name.
fn rank<T>(items: &mut [T], avg: impl Fn(&T) -> f64, count: impl Fn(&T) -> usize, name: impl Fn(&T) -> String) {
    items.sort_by(|a, b| {
        avg(b)
            .partial_cmp(&avg(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| count(b).cmp(&count(a)))
            .then_with(|| name(a).cmp(&name(b)))
    });
}

fn album_key(rating: &RatedSong) -> (String, String) {
    (rating.album.clone(), rating.artist.clone())
}

pub fn overall_stats<S>(store: &S, profile: &str) -> Result<OverallStats>
where
    S: RatingStore + IgnoredSongStore + ProfileDataStore + ?Sized,
{
    let ratings = store.list_ratings(profile, &RatingFilter::default(), &RatingSort::default())?;
    if ratings.is_empty() {
        return Ok(OverallStats::empty());
    }
    let prefs = store.get_profile_data(profile)?;
    let ignored = store.get_ignored_songs(profile)?;
    let ignored_ids: HashSet<&str> = ignored.iter().map(|s| s.id.as_str()).collect();
    let mut ignored_per_album: HashMap<(String, String), i64> = HashMap::new();
    for song in &ignored {
        *ignored_per_album
            .entry((song.album.clone(), song.artist.clone()))
            .or_default() += 1;
    }

    let total_rated = ratings.len();
    let average_score = ratings.iter().map(|r| r.score as i64).sum::<i64>() as f64
        / total_rated as f64;
    let perfect_count = ratings.iter().filter(|r| r.score == 10).count();

    let mut per_artist: HashMap<String, ScoreAccumulator> = HashMap::new();
    let mut per_album: HashMap<(String, String), ScoreAccumulator> = HashMap::new();
    // the album's declared track count, where any rated song carries one
    let mut album_track_counts: HashMap<(String, String), i64> = HashMap::new();
    let mut rated_non_ignored: HashMap<(String, String), usize> = HashMap::new();

    for rating in &ratings {
        per_artist
            .entry(rating.artist.clone())
            .or_default()
            .push(rating.score);
        let key = album_key(rating);
        per_album.entry(key.clone()).or_default().push(rating.score);
        if let Some(track_count) = rating.album_track_count {
            album_track_counts.entry(key.clone()).or_insert(track_count);
        }
        if !ignored_ids.contains(rating.song_id.as_str()) {
            *rated_non_ignored.entry(key).or_default() += 1;
        }
    }

    let mut top_artists: Vec<ArtistAverage> = per_artist
        .into_iter()
        .map(|(artist, acc)| ArtistAverage {
            artist,
            average_score: acc.average(),
            rating_count: acc.count,
        })
        .collect();
    rank(
        &mut top_artists,
        |a| a.average_score,
        |a| a.rating_count,
        |a| a.artist.clone(),
    );
    top_artists.truncate(prefs.top_artists_limit.max(0) as usize);

    let mut top_albums: Vec<AlbumAverage> = per_album
        .iter()
        .map(|((album, artist), acc)| AlbumAverage {
            album: album.clone(),
            artist: artist.clone(),
            average_score: acc.average(),
            rating_count: acc.count,
        })
        .collect();
    rank(
        &mut top_albums,
        |a| a.average_score,
        |a| a.rating_count,
        |a| a.album.clone(),
    );
    top_albums.truncate(prefs.top_albums_limit.max(0) as usize);

    // Ignored songs do not count toward completion in either direction:
    // they are subtracted from the album's track total and never counted
    // as rated.
    let mut completed_albums = Vec::new();
    let mut incomplete_albums = Vec::new();
    for (key, &track_count) in &album_track_counts {
        let countable_tracks =
            track_count - ignored_per_album.get(key).copied().unwrap_or(0);
        if countable_tracks <= 0 {
            continue;
        }
        let rated_tracks = rated_non_ignored.get(key).copied().unwrap_or(0);
        let completion = AlbumCompletion {
            album: key.0.clone(),
            artist: key.1.clone(),
            rated_tracks,
            countable_tracks,
        };
        if rated_tracks as i64 >= countable_tracks {
            completed_albums.push(completion);
        } else if rated_tracks > 0 {
            incomplete_albums.push(completion);
        }
    }
    completed_albums.sort_by(|a, b| a.album.cmp(&b.album));
    incomplete_albums.sort_by(|a, b| a.album.cmp(&b.album));
    if !prefs.show_incomplete_albums {
        incomplete_albums.clear();
    }

    Ok(OverallStats {
        total_rated,
        average_score,
        perfect_count,
        top_artists,
        top_albums,
        completed_albums,
        incomplete_albums,
    })
}

/// Case-insensitive aggregate for one artist, with a per-album breakdown.
pub fn artist_stats<S>(store: &S, profile: &str, artist_name: &str) -> Result<ArtistStats>
where
    S: RatingStore + ?Sized,
{
    let wanted = artist_name.to_lowercase();
    let ratings: Vec<RatedSong> = store
        .list_ratings(profile, &RatingFilter::default(), &RatingSort::default())?
        .into_iter()
        .filter(|r| r.artist.to_lowercase() == wanted)
        .collect();

    let mut overall = ScoreAccumulator::default();
    let mut per_album: HashMap<String, ScoreAccumulator> = HashMap::new();
    // keep the artist's spelling from the data, not from the query
    let mut display_name = artist_name.to_string();
    for rating in &ratings {
        overall.push(rating.score);
        per_album
            .entry(rating.album.clone())
            .or_default()
            .push(rating.score);
        display_name = rating.artist.clone();
    }

    let mut albums: Vec<AlbumAverage> = per_album
        .into_iter()
        .map(|(album, acc)| AlbumAverage {
            album,
            artist: display_name.clone(),
            average_score: acc.average(),
            rating_count: acc.count,
        })
        .collect();
    rank(
        &mut albums,
        |a| a.average_score,
        |a| a.rating_count,
        |a| a.album.clone(),
    );

    Ok(ArtistStats {
        artist: display_name,
        average_score: overall.average(),
        rating_count: overall.count,
        albums,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile_store::{IgnoredSongStore, ProfileDataStore, Song, SqliteProfileStore};
    use tempfile::TempDir;

    fn create_test_store() -> (SqliteProfileStore, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = SqliteProfileStore::open(tmp.path().join("ratings.db")).unwrap();
        (store, tmp)
    }

    fn add_rated_song(
        store: &SqliteProfileStore,
        id: &str,
        artist: &str,
        album: &str,
        track_count: Option<i64>,
        score: f64,
    ) {
        store
            .upsert_song(&Song {
                id: id.to_string(),
                title: format!("Title {}", id),
                artist: artist.to_string(),
                album: album.to_string(),
                album_id: None,
                album_track_count: track_count,
                duration_secs: 180,
                artwork_url: None,
            })
            .unwrap();
        store.upsert_rating("alice", id, score, None).unwrap();
    }

    #[test]
    fn empty_profile_yields_zeroes() {
        let (store, _tmp) = create_test_store();
        let stats = overall_stats(&store, "alice").unwrap();
        assert_eq!(stats, OverallStats::empty());

        let artist = artist_stats(&store, "alice", "Nobody").unwrap();
        assert_eq!(artist.rating_count, 0);
        assert_eq!(artist.average_score, 0.0);
        assert!(artist.albums.is_empty());
    }

    #[test]
    fn overall_totals_and_top_lists() {
        let (store, _tmp) = create_test_store();
        add_rated_song(&store, "s1", "Nova", "First", None, 10.0);
        add_rated_song(&store, "s2", "Nova", "First", None, 8.0);
        add_rated_song(&store, "s3", "Tide", "Second", None, 4.0);

        let stats = overall_stats(&store, "alice").unwrap();
        assert_eq!(stats.total_rated, 3);
        assert_eq!(stats.perfect_count, 1);
        assert!((stats.average_score - 22.0 / 3.0).abs() < 1e-9);

        assert_eq!(stats.top_artists.len(), 2);
        assert_eq!(stats.top_artists[0].artist, "Nova");
        assert_eq!(stats.top_artists[0].rating_count, 2);
        assert!((stats.top_artists[0].average_score - 9.0).abs() < 1e-9);

        assert_eq!(stats.top_albums[0].album, "First");
    }

    #[test]
    fn album_completion_accounts_for_ignored_tracks() {
        let (store, _tmp) = create_test_store();
        // 12-track album: 10 rated, 2 ignored and unrated
        for i in 0..10 {
            add_rated_song(&store, &format!("t{}", i), "Nova", "Full", Some(12), 7.0);
        }
        for i in 10..12 {
            let id = format!("t{}", i);
            store
                .upsert_song(&Song {
                    id: id.clone(),
                    title: format!("Title {}", id),
                    artist: "Nova".to_string(),
                    album: "Full".to_string(),
                    album_id: None,
                    album_track_count: Some(12),
                    duration_secs: 180,
                    artwork_url: None,
                })
                .unwrap();
            store.ignore_song("alice", &id).unwrap();
        }

        let stats = overall_stats(&store, "alice").unwrap();
        assert_eq!(stats.completed_albums.len(), 1);
        let completion = &stats.completed_albums[0];
        assert_eq!(completion.album, "Full");
        assert_eq!(completion.rated_tracks, 10);
        assert_eq!(completion.countable_tracks, 10);
        assert!(stats.incomplete_albums.is_empty());
    }

    #[test]
    fn partially_rated_album_is_incomplete() {
        let (store, _tmp) = create_test_store();
        add_rated_song(&store, "s1", "Nova", "First", Some(10), 8.0);
        add_rated_song(&store, "s2", "Nova", "First", Some(10), 6.0);

        let stats = overall_stats(&store, "alice").unwrap();
        assert!(stats.completed_albums.is_empty());
        assert_eq!(stats.incomplete_albums.len(), 1);
        assert_eq!(stats.incomplete_albums[0].rated_tracks, 2);
        assert_eq!(stats.incomplete_albums[0].countable_tracks, 10);
    }

    #[test]
    fn incomplete_albums_hidden_by_preference() {
        let (store, _tmp) = create_test_store();
        add_rated_song(&store, "s1", "Nova", "First", Some(10), 8.0);
        store.set_display_preferences("alice", 5, 10, false).unwrap();

        let stats = overall_stats(&store, "alice").unwrap();
        assert!(stats.incomplete_albums.is_empty());
    }

    #[test]
    fn top_lists_respect_profile_limits() {
        let (store, _tmp) = create_test_store();
        for i in 0..6 {
            add_rated_song(
                &store,
                &format!("s{}", i),
                &format!("Artist {}", i),
                &format!("Album {}", i),
                None,
                (i + 4) as f64,
            );
        }
        store.set_display_preferences("alice", 2, 3, true).unwrap();

        let stats = overall_stats(&store, "alice").unwrap();
        assert_eq!(stats.top_artists.len(), 2);
        assert_eq!(stats.top_albums.len(), 3);
        assert_eq!(stats.top_artists[0].artist, "Artist 5");
    }

    #[test]
    fn artist_lookup_is_case_insensitive() {
        let (store, _tmp) = create_test_store();
        add_rated_song(&store, "s1", "Nova Skyline", "First", None, 10.0);
        add_rated_song(&store, "s2", "Nova Skyline", "Second", None, 6.0);
        add_rated_song(&store, "s3", "Other", "Third", None, 2.0);

        let stats = artist_stats(&store, "alice", "nova skyline").unwrap();
        assert_eq!(stats.artist, "Nova Skyline");
        assert_eq!(stats.rating_count, 2);
        assert!((stats.average_score - 8.0).abs() < 1e-9);
        assert_eq!(stats.albums.len(), 2);
        assert_eq!(stats.albums[0].album, "First");
    }
}
