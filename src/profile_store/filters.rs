//! Filter and sort parameters for rating listings.

use serde::{Deserialize, Serialize};

/// Substring and score-range filters for `list_ratings`.
/// All fields are optional; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingFilter {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub min_score: Option<u8>,
    pub max_score: Option<u8>,
}

/// Sort keys are a closed whitelist; anything else falls back to the
/// default ordering at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    Artist,
    Album,
    Score,
    CreatedAt,
}

impl SortKey {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Title => "song.title",
            Self::Artist => "song.artist",
            Self::Album => "song.album",
            Self::Score => "rating.score",
            Self::CreatedAt => "rating.created_at",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "artist" => Some(Self::Artist),
            "album" => Some(Self::Album),
            "score" => Some(Self::Score),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSort {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for RatingSort {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl RatingSort {
    /// Resolve user-supplied sort parameters. An unrecognized key or order
    /// falls back to created_at descending.
    pub fn from_user_input(key: &str, descending: bool) -> Self {
        match SortKey::parse(key) {
            Some(key) => Self {
                key,
                order: if descending {
                    SortOrder::Desc
                } else {
                    SortOrder::Asc
                },
            },
            None => Self::default(),
        }
    }

    pub fn order_by_sql(&self) -> String {
        format!("ORDER BY {} {}", self.key.column(), self.order.sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_key_falls_back_to_default() {
        let sort = RatingSort::from_user_input("rating_id", false);
        assert_eq!(sort, RatingSort::default());
        assert_eq!(sort.key, SortKey::CreatedAt);
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn known_sort_keys_are_accepted() {
        let sort = RatingSort::from_user_input("artist", true);
        assert_eq!(sort.key, SortKey::Artist);
        assert_eq!(sort.order, SortOrder::Desc);
        assert_eq!(sort.order_by_sql(), "ORDER BY song.artist DESC");
    }

    #[test]
    fn default_filter_is_empty() {
        let filter = RatingFilter::default();
        assert!(filter.title.is_none());
        assert!(filter.min_score.is_none());
        assert!(filter.max_score.is_none());
    }
}
