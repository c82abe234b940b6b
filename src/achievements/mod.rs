mod catalog;
mod engine;

pub use catalog::{AchievementDef, CountStrategy, ACHIEVEMENT_CATALOG};
pub use engine::{evaluate, list_with_progress, AchievementProgress};
