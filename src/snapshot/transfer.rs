//! Snapshot export and import orchestration.

use super::document::{SnapshotDocument, SnapshotRating};
use crate::achievements;
use crate::catalog::CatalogProvider;
use crate::error::CoreError;
use crate::profile_register::ActiveProfileRegister;
use crate::profile_store::{
    AchievementStore, HighscoreStore, IgnoredSongStore, ProfileDataStore, RatingFilter,
    RatingSort, RatingStore, SqliteProfileStore, WatchlistItemType, WatchlistStore,
};
use anyhow::{bail, Result};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Serialize everything the profile owns into one portable document.
/// A profile with zero ratings has nothing worth exporting and fails.
pub fn export_profile(store: &SqliteProfileStore, profile: &str) -> Result<SnapshotDocument> {
    let rated = store.list_ratings(profile, &RatingFilter::default(), &RatingSort::default())?;
    if rated.is_empty() {
        return Err(CoreError::NothingToExport(profile.to_string()).into());
    }

    let ignored = store.get_ignored_songs(profile)?;
    let watchlist = store.get_watchlist(profile)?;

    // songs referenced anywhere in the document travel with it
    let mut song_ids: BTreeSet<String> = rated.iter().map(|r| r.song_id.clone()).collect();
    song_ids.extend(ignored.iter().map(|s| s.id.clone()));
    song_ids.extend(
        watchlist
            .iter()
            .filter(|e| e.item_type == WatchlistItemType::Track)
            .map(|e| e.item_id.clone()),
    );
    let mut songs = Vec::with_capacity(song_ids.len());
    for song_id in &song_ids {
        match store.get_song(song_id)? {
            Some(song) => songs.push(song),
            None => warn!("Song {} is referenced but not stored, skipping", song_id),
        }
    }

    let mut albums = Vec::new();
    for entry in &watchlist {
        if entry.item_type == WatchlistItemType::Album {
            if let Some(album) = store.get_album_summary(&entry.item_id)? {
                albums.push(album);
            }
        }
    }

    let ratings = rated
        .into_iter()
        .map(|r| SnapshotRating {
            song_id: r.song_id,
            score: r.score,
            created_at: r.created_at,
            notes: r.notes,
        })
        .collect();

    Ok(SnapshotDocument {
        profile_name: profile.to_string(),
        songs,
        ratings,
        achievements: store.get_achievement_unlocks(profile)?,
        profiledata: vec![store.get_profile_data(profile)?],
        game_highscores: store.get_highscores(profile)?,
        watchlist,
        albums,
        global_watchlist_notes: store.get_watchlist_note(profile)?.into_iter().collect(),
        ignored_songs: ignored.into_iter().map(|s| s.id).collect(),
    })
}

/// What an import did, for reporting back to the user.
#[derive(Debug)]
pub struct ImportOutcome {
    pub profile_name: String,
    pub songs_imported: usize,
    pub ratings_imported: usize,
    pub newly_unlocked: Vec<&'static str>,
    pub albums_backfilled: usize,
}

fn validate(doc: &SnapshotDocument) -> Result<()> {
    if doc.profile_name.trim().is_empty() {
        bail!("Snapshot document has an empty profile name");
    }
    for rating in &doc.ratings {
        if rating.score > 10 {
            return Err(CoreError::InvalidScore(rating.score as i64).into());
        }
    }
    Ok(())
}

/// Merge a snapshot document into the store.
///
/// The bulk write runs as one transaction; only after it commits is the
/// active-profile register re-bound to the document's profile, so a failed
/// import leaves both store and register untouched. Achievement
/// re-evaluation and catalog backfill run afterwards as non-transactional
/// follow-ups; a crash between commit and follow-up is recovered by the
/// next evaluation.
pub fn import_snapshot(
    store: &SqliteProfileStore,
    register: &ActiveProfileRegister,
    catalog: Option<&dyn CatalogProvider>,
    doc: &SnapshotDocument,
) -> Result<ImportOutcome> {
    validate(doc)?;
    store.apply_snapshot(doc)?;
    register.set_active(&doc.profile_name)?;
    info!(
        "Imported snapshot for profile {}: {} songs, {} ratings",
        doc.profile_name,
        doc.songs.len(),
        doc.ratings.len()
    );

    let newly_unlocked = achievements::evaluate(store, &doc.profile_name)?
        .into_iter()
        .map(|def| def.name)
        .collect();

    let mut albums_backfilled = 0;
    if let Some(catalog) = catalog {
        for song_id in store.rated_songs_missing_album_info(&doc.profile_name)? {
            match catalog.lookup_song(&song_id) {
                Ok(Some(song)) => {
                    if let Some(album_id) = song.album_id {
                        store.set_song_album_info(&song_id, &album_id, song.album_track_count)?;
                        albums_backfilled += 1;
                    }
                }
                Ok(None) => {}
                Err(err) => warn!("Catalog lookup for {} failed: {:#}", song_id, err),
            }
        }
    }

    Ok(ImportOutcome {
        profile_name: doc.profile_name.clone(),
        songs_imported: doc.songs.len(),
        ratings_imported: doc.ratings.len(),
        newly_unlocked,
        albums_backfilled,
    })
}
