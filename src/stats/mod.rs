mod aggregator;
mod models;

pub use aggregator::{artist_stats, overall_stats};
pub use models::{AlbumAverage, AlbumCompletion, ArtistAverage, ArtistStats, OverallStats};
