//! Derived statistics views. Everything here is computed on demand from
//! the store; nothing is persisted.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistAverage {
    pub artist: String,
    pub average_score: f64,
    pub rating_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumAverage {
    pub album: String,
    pub artist: String,
    pub average_score: f64,
    pub rating_count: usize,
}

/// Completion state of one album: how many of its non-ignored tracks the
/// profile has rated so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumCompletion {
    pub album: String,
    pub artist: String,
    pub rated_tracks: usize,
    pub countable_tracks: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    pub total_rated: usize,
    pub average_score: f64,
    pub perfect_count: usize,
    pub top_artists: Vec<ArtistAverage>,
    pub top_albums: Vec<AlbumAverage>,
    pub completed_albums: Vec<AlbumCompletion>,
    pub incomplete_albums: Vec<AlbumCompletion>,
}

impl OverallStats {
    /// The zero-valued result for a profile without any ratings.
    pub fn empty() -> Self {
        Self {
            total_rated: 0,
            average_score: 0.0,
            perfect_count: 0,
            top_artists: Vec::new(),
            top_albums: Vec::new(),
            completed_albums: Vec::new(),
            incomplete_albums: Vec::new(),
        }
    }
}

/// Case-insensitive per-artist view with an album breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistStats {
    pub artist: String,
    pub average_score: f64,
    pub rating_count: usize,
    pub albums: Vec<AlbumAverage>,
}
