//! The static achievement catalog.
//!
//! Tier names follow a suffix convention (`_bronze`, `_silver`, `_gold`,
//! `_diamond`); the collector achievements count unlocks by that suffix,
//! so their thresholds must match the number of definitions per tier.

use crate::profile_store::UsageCounter;

/// How an achievement's current count is computed for a profile. Each
/// variant maps to one typed store query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountStrategy {
    /// Total ratings.
    Ratings,
    /// Ratings with a perfect score of 10.
    PerfectRatings,
    /// Ratings with a score of 2 or below.
    LowRatings,
    /// Distinct artists among rated songs.
    DistinctArtists,
    /// Distinct rated songs with a synthesized `custom-` id.
    CustomSongs,
    /// Distinct calendar days with at least one rating.
    DistinctRatingDays,
    /// Already-unlocked achievements whose name ends with the suffix.
    UnlockedWithSuffix(&'static str),
    /// A feature-usage counter from profile data.
    Usage(UsageCounter),
}

impl CountStrategy {
    /// Collector strategies count other unlocks, so they are evaluated
    /// after everything else within one engine pass.
    pub fn is_collector(&self) -> bool {
        matches!(self, Self::UnlockedWithSuffix(_))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub strategy: CountStrategy,
    pub threshold: i64,
}

const fn def(
    name: &'static str,
    title: &'static str,
    description: &'static str,
    strategy: CountStrategy,
    threshold: i64,
) -> AchievementDef {
    AchievementDef {
        name,
        title,
        description,
        strategy,
        threshold,
    }
}

pub const ACHIEVEMENT_CATALOG: &[AchievementDef] = &[
    // rating volume
    def("pioneer", "First Step", "Submitted the first rating", CountStrategy::Ratings, 1),
    def("rating_bronze", "Apprentice Rater", "Rated 25 songs", CountStrategy::Ratings, 25),
    def("rating_silver", "Journeyman Rater", "Rated 100 songs", CountStrategy::Ratings, 100),
    def("rating_gold", "Master Rater", "Rated 250 songs", CountStrategy::Ratings, 250),
    def("rating_diamond", "Rating Legend", "Rated 500 songs", CountStrategy::Ratings, 500),
    // perfect scores
    def("perfection_first", "First Hit", "Gave a perfect 10/10 rating", CountStrategy::PerfectRatings, 1),
    def("perfection_bronze", "Bronze Perfection", "5 perfect ratings", CountStrategy::PerfectRatings, 5),
    def("perfection_silver", "Silver Precision", "20 perfect ratings", CountStrategy::PerfectRatings, 20),
    def("perfection_gold", "Golden Excellence", "50 perfect ratings", CountStrategy::PerfectRatings, 50),
    // artist variety
    def("explorer_bronze", "Music Explorer", "Rated songs by 10 different artists", CountStrategy::DistinctArtists, 10),
    def("explorer_silver", "Genre Pioneer", "Rated songs by 25 different artists", CountStrategy::DistinctArtists, 25),
    def("explorer_gold", "Music Archivist", "Rated songs by 50 different artists", CountStrategy::DistinctArtists, 50),
    def("explorer_diamond", "Artist Deity", "Rated songs by 75 different artists", CountStrategy::DistinctArtists, 75),
    // low scores
    def("disappointment_first", "First Disappointment", "Rated a song 2 points or below", CountStrategy::LowRatings, 1),
    def("disappointment_bronze", "Bronze Letdown", "5 low-rated songs", CountStrategy::LowRatings, 5),
    def("disappointment_silver", "Silver Frustration", "10 low-rated songs", CountStrategy::LowRatings, 10),
    def("disappointment_gold", "Golden Grudge", "20 low-rated songs", CountStrategy::LowRatings, 20),
    // custom songs
    def("custom_pioneer", "Custom Pioneer", "Rated the first custom song", CountStrategy::CustomSongs, 1),
    def("custom_creator_bronze", "Bronze Creator", "Created and rated 5 custom songs", CountStrategy::CustomSongs, 5),
    def("custom_creator_silver", "Silver Creator", "Created and rated 10 custom songs", CountStrategy::CustomSongs, 10),
    def("custom_creator_gold", "Gold Creator", "Created and rated 20 custom songs", CountStrategy::CustomSongs, 20),
    // rating days
    def("daily_rater_7_bronze", "Weekly Routine", "Rated on 7 different days", CountStrategy::DistinctRatingDays, 7),
    def("daily_rater_30_silver", "Monthly Practice", "Rated on 30 different days", CountStrategy::DistinctRatingDays, 30),
    def("daily_rater_100_gold", "The Hundred", "Rated on 100 different days", CountStrategy::DistinctRatingDays, 100),
    def("daily_rater_365_diamond", "Year-long Challenge", "Rated on 365 different days", CountStrategy::DistinctRatingDays, 365),
    // collectors; thresholds equal the number of achievements per tier
    def("bronze_collector", "Bronze Collector", "Unlocked every bronze achievement", CountStrategy::UnlockedWithSuffix("_bronze"), 9),
    def("silver_collector", "Silver Collector", "Unlocked every silver achievement", CountStrategy::UnlockedWithSuffix("_silver"), 9),
    def("gold_collector", "Gold Collector", "Unlocked every gold achievement", CountStrategy::UnlockedWithSuffix("_gold"), 9),
    def("diamond_collector", "Diamond Collector", "Unlocked every diamond achievement", CountStrategy::UnlockedWithSuffix("_diamond"), 3),
    // feature usage
    def("link", "Link Follower", "Opened 25 external links", CountStrategy::Usage(UsageCounter::LinksOpened), 25),
    def("artist_stats_bronze", "Curious About Stats", "Looked up artist statistics 5 times", CountStrategy::Usage(UsageCounter::ArtistStatsOpened), 5),
    def("artist_stats_silver", "Analyst", "Looked up artist statistics 20 times", CountStrategy::Usage(UsageCounter::ArtistStatsOpened), 20),
    def("artist_stats_gold", "Detective", "Looked up artist statistics 50 times", CountStrategy::Usage(UsageCounter::ArtistStatsOpened), 50),
    def("top_tracks_bronze", "Hit Listener", "Used top-tracks mode 5 times", CountStrategy::Usage(UsageCounter::TopTracksOpened), 5),
    def("top_tracks_silver", "Charts Junkie", "Used top-tracks mode 15 times", CountStrategy::Usage(UsageCounter::TopTracksOpened), 15),
    def("top_tracks_gold", "Hit Archivist", "Used top-tracks mode 30 times", CountStrategy::Usage(UsageCounter::TopTracksOpened), 30),
    def("search", "Search Engine", "Searched for songs 50 times", CountStrategy::Usage(UsageCounter::SongsSearched), 50),
    def("artist_mode_bronze", "Mode Explorer", "Used artist search 5 times", CountStrategy::Usage(UsageCounter::ArtistModeOpened), 5),
    def("artist_mode_silver", "Artist Fan", "Used artist search 15 times", CountStrategy::Usage(UsageCounter::ArtistModeOpened), 15),
    def("artist_mode_gold", "Artist Purist", "Used artist search 30 times", CountStrategy::Usage(UsageCounter::ArtistModeOpened), 30),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_names_are_unique() {
        let names: HashSet<_> = ACHIEVEMENT_CATALOG.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), ACHIEVEMENT_CATALOG.len());
    }

    #[test]
    fn collector_thresholds_match_tier_counts() {
        for collector in ACHIEVEMENT_CATALOG
            .iter()
            .filter(|d| d.strategy.is_collector())
        {
            let CountStrategy::UnlockedWithSuffix(suffix) = collector.strategy else {
                unreachable!()
            };
            let tier_count = ACHIEVEMENT_CATALOG
                .iter()
                .filter(|d| !d.strategy.is_collector() && d.name.ends_with(suffix))
                .count() as i64;
            assert_eq!(
                collector.threshold, tier_count,
                "collector {} threshold does not match its tier",
                collector.name
            );
        }
    }

    #[test]
    fn thresholds_are_positive() {
        assert!(ACHIEVEMENT_CATALOG.iter().all(|d| d.threshold >= 1));
    }
}
