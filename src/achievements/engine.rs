//! Achievement evaluation.
//!
//! Evaluation is monotonic: an unlock row is inserted the first time a
//! count meets its threshold and is never removed, even if the count later
//! drops (a deleted rating does not revoke anything).

use super::catalog::{AchievementDef, CountStrategy, ACHIEVEMENT_CATALOG};
use crate::profile_store::AchievementStore;
use anyhow::Result;
use std::collections::HashMap;
use tracing::info;

/// One achievement with its live evaluation state, for display.
#[derive(Debug, Clone)]
pub struct AchievementProgress {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub threshold: i64,
    pub current_count: i64,
    pub unlocked: bool,
    pub unlocked_at: Option<i64>,
    pub progress_percent: u8,
}

fn current_count(
    store: &dyn AchievementStore,
    profile: &str,
    strategy: CountStrategy,
) -> Result<i64> {
    match strategy {
        CountStrategy::Ratings => store.count_ratings(profile),
        CountStrategy::PerfectRatings => store.count_perfect_ratings(profile),
        CountStrategy::LowRatings => store.count_low_ratings(profile),
        CountStrategy::DistinctArtists => store.count_distinct_artists(profile),
        CountStrategy::CustomSongs => store.count_custom_songs(profile),
        CountStrategy::DistinctRatingDays => store.count_distinct_rating_days(profile),
        CountStrategy::UnlockedWithSuffix(suffix) => {
            store.count_unlocked_with_suffix(profile, suffix)
        }
        CountStrategy::Usage(counter) => store.usage_counter_value(profile, counter),
    }
}

fn evaluate_defs<'a>(
    store: &dyn AchievementStore,
    profile: &str,
    defs: impl Iterator<Item = &'a AchievementDef>,
) -> Result<Vec<&'a AchievementDef>> {
    let mut newly_unlocked = Vec::new();
    for def in defs {
        if current_count(store, profile, def.strategy)? >= def.threshold
            && store.unlock_achievement(profile, def.name, None)?
        {
            info!("Profile {} unlocked achievement {}", profile, def.name);
            newly_unlocked.push(def);
        }
    }
    Ok(newly_unlocked)
}

/// Evaluate the whole catalog for a profile and unlock everything whose
/// count meets its threshold. Returns the definitions unlocked by this
/// call.
///
/// Collectors run as a second pass so that tier achievements unlocked
/// moments earlier are already counted. A collector completed only by
/// another collector still lands on the next call; repeated evaluation
/// converges.
pub fn evaluate(
    store: &dyn AchievementStore,
    profile: &str,
) -> Result<Vec<&'static AchievementDef>> {
    let mut newly_unlocked = evaluate_defs(
        store,
        profile,
        ACHIEVEMENT_CATALOG.iter().filter(|d| !d.strategy.is_collector()),
    )?;
    newly_unlocked.extend(evaluate_defs(
        store,
        profile,
        ACHIEVEMENT_CATALOG.iter().filter(|d| d.strategy.is_collector()),
    )?);
    Ok(newly_unlocked)
}

/// The full catalog with per-definition progress for a profile, in catalog
/// order. Never errors on an empty profile; everything is just at zero.
pub fn list_with_progress(
    store: &dyn AchievementStore,
    profile: &str,
) -> Result<Vec<AchievementProgress>> {
    let unlocks: HashMap<String, i64> = store
        .get_achievement_unlocks(profile)?
        .into_iter()
        .map(|u| (u.name, u.unlocked_at))
        .collect();

    ACHIEVEMENT_CATALOG
        .iter()
        .map(|def| {
            let unlocked_at = unlocks.get(def.name).copied();
            let current_count = current_count(store, profile, def.strategy)?;
            let progress_percent = if unlocked_at.is_some() {
                100
            } else {
                (current_count * 100 / def.threshold).min(100) as u8
            };
            Ok(AchievementProgress {
                name: def.name,
                title: def.title,
                description: def.description,
                threshold: def.threshold,
                current_count,
                unlocked: unlocked_at.is_some(),
                unlocked_at,
                progress_percent,
            })
        })
        .collect()
}
