use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trackrater::achievements;
use trackrater::catalog::custom_song_id;
use trackrater::config::{AppConfig, CliConfig, FileConfig};
use trackrater::profile_register::ActiveProfileRegister;
use trackrater::profile_store::{
    HighscoreStore, IgnoredSongStore, ProfileDataStore, RatingFilter, RatingSort, RatingStore,
    Song, SqliteProfileStore, UsageCounter, WatchlistItemType, WatchlistStore,
};
use trackrater::snapshot::{export_profile, import_snapshot, SnapshotDocument};
use trackrater::stats;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[clap(name = "trackrater", about = "Local song-rating database")]
struct CliArgs {
    /// Directory holding the rating database and the profile register.
    #[clap(long, value_parser = parse_path)]
    data_dir: Option<PathBuf>,

    /// Path to a TOML config file; its values override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the active profile.
    Profile {
        #[clap(subcommand)]
        action: ProfileCommand,
    },
    /// Rate a song (0-10). Creates or updates the rating for the active
    /// profile. Song metadata flags register the song on first rating.
    Rate {
        song_id: String,
        score: f64,
        #[clap(long)]
        notes: Option<String>,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        artist: Option<String>,
        #[clap(long)]
        album: Option<String>,
        #[clap(long, default_value_t = 0)]
        duration_secs: i64,
    },
    /// Rate a song that is not in any catalog; an id is synthesized.
    RateCustom {
        title: String,
        artist: String,
        album: String,
        score: f64,
        #[clap(long)]
        notes: Option<String>,
    },
    /// List the active profile's ratings.
    Ratings {
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        artist: Option<String>,
        #[clap(long)]
        album: Option<String>,
        #[clap(long)]
        min_score: Option<u8>,
        #[clap(long)]
        max_score: Option<u8>,
        /// Sort key: title, artist, album, score or created_at.
        #[clap(long, default_value = "created_at")]
        sort: String,
        #[clap(long)]
        desc: bool,
    },
    /// Delete a rating; the song stays known.
    DeleteRating { song_id: String },
    /// Overall statistics for the active profile.
    Stats,
    /// Statistics for one artist (case-insensitive).
    ArtistStats { artist: String },
    /// Achievement progress for the active profile.
    Achievements,
    /// Manage the active profile's watchlist.
    Watchlist {
        #[clap(subcommand)]
        action: WatchlistCommand,
    },
    /// Hide a song from future searches for the active profile.
    Ignore { song_id: String },
    Unignore { song_id: String },
    /// Record a feature-usage event (some achievements count these).
    RecordUsage {
        /// One of: links, artist-stats, top-tracks, search, artist-mode.
        counter: String,
    },
    /// Record a guessing-game result; only the best score per artist is
    /// kept.
    Highscore {
        artist_id: String,
        score: i64,
    },
    /// List the active profile's game highscores.
    Highscores,
    /// Export the active profile to a snapshot file.
    Export { output: PathBuf },
    /// Import a snapshot file; the document's profile becomes active.
    Import { input: PathBuf },
    /// Delete the whole database. Requires --confirm.
    Reset {
        #[clap(long)]
        confirm: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Select the profile all further commands act on.
    Set { name: String },
    Show,
    Clear,
}

#[derive(Subcommand, Debug)]
enum WatchlistCommand {
    Add {
        item_id: String,
        /// The item is an album rather than a track.
        #[clap(long)]
        album: bool,
    },
    Remove {
        item_id: String,
    },
    List,
    Note {
        text: String,
    },
}

fn parse_usage_counter(s: &str) -> Result<UsageCounter> {
    Ok(match s {
        "links" => UsageCounter::LinksOpened,
        "artist-stats" => UsageCounter::ArtistStatsOpened,
        "top-tracks" => UsageCounter::TopTracksOpened,
        "search" => UsageCounter::SongsSearched,
        "artist-mode" => UsageCounter::ArtistModeOpened,
        other => bail!("Unknown usage counter: {}", other),
    })
}

fn report_unlocks(names: &[&str]) {
    for name in names {
        println!("Achievement unlocked: {}", name);
    }
}

fn rate_and_evaluate(
    store: &SqliteProfileStore,
    profile: &str,
    song_id: &str,
    score: f64,
    notes: Option<&str>,
) -> Result<()> {
    let rating = store.upsert_rating(profile, song_id, score, notes)?;
    println!("Rated {} with {}/10", song_id, rating.score);
    let unlocked: Vec<&str> = achievements::evaluate(store, profile)?
        .into_iter()
        .map(|d| d.name)
        .collect();
    report_unlocks(&unlocked);
    Ok(())
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(
        &CliConfig {
            data_dir: cli_args.data_dir.clone(),
        },
        file_config,
    )?;

    let store = SqliteProfileStore::open(&config.db_path)?;
    let register = ActiveProfileRegister::new(&config.register_path);

    match cli_args.command {
        Command::Profile { action } => match action {
            ProfileCommand::Set { name } => {
                register.set_active(&name)?;
                println!("Active profile: {}", name);
            }
            ProfileCommand::Show => match register.get_active()? {
                Some(name) => println!("Active profile: {}", name),
                None => println!("No active profile"),
            },
            ProfileCommand::Clear => register.clear()?,
        },
        Command::Rate {
            song_id,
            score,
            notes,
            title,
            artist,
            album,
            duration_secs,
        } => {
            let profile = register.require_active()?;
            if let (Some(title), Some(artist), Some(album)) = (title, artist, album) {
                store.upsert_song(&Song {
                    id: song_id.clone(),
                    title,
                    artist,
                    album,
                    album_id: None,
                    album_track_count: None,
                    duration_secs,
                    artwork_url: None,
                })?;
            } else if store.get_song(&song_id)?.is_none() {
                bail!(
                    "Unknown song {}; pass --title, --artist and --album to register it",
                    song_id
                );
            }
            rate_and_evaluate(&store, &profile, &song_id, score, notes.as_deref())?;
        }
        Command::RateCustom {
            title,
            artist,
            album,
            score,
            notes,
        } => {
            let profile = register.require_active()?;
            let song_id = custom_song_id();
            store.upsert_song(&Song {
                id: song_id.clone(),
                title,
                artist,
                album,
                album_id: None,
                album_track_count: None,
                duration_secs: 0,
                artwork_url: None,
            })?;
            rate_and_evaluate(&store, &profile, &song_id, score, notes.as_deref())?;
        }
        Command::Ratings {
            title,
            artist,
            album,
            min_score,
            max_score,
            sort,
            desc,
        } => {
            let profile = register.require_active()?;
            let filter = RatingFilter {
                title,
                artist,
                album,
                min_score,
                max_score,
            };
            let sort = RatingSort::from_user_input(&sort, desc);
            for rated in store.list_ratings(&profile, &filter, &sort)? {
                println!(
                    "{:>2}/10  {} - {} ({})  [{}]",
                    rated.score, rated.artist, rated.title, rated.album, rated.song_id
                );
            }
        }
        Command::DeleteRating { song_id } => {
            let profile = register.require_active()?;
            if store.delete_rating(&profile, &song_id)? {
                println!("Deleted rating for {}", song_id);
            } else {
                println!("No rating for {}", song_id);
            }
        }
        Command::Stats => {
            let profile = register.require_active()?;
            let stats = stats::overall_stats(&store, &profile)?;
            println!("Ratings: {}", stats.total_rated);
            println!("Average score: {:.2}", stats.average_score);
            println!("Perfect scores: {}", stats.perfect_count);
            println!("Top artists:");
            for artist in &stats.top_artists {
                println!(
                    "  {:.2}  {} ({} ratings)",
                    artist.average_score, artist.artist, artist.rating_count
                );
            }
            println!("Top albums:");
            for album in &stats.top_albums {
                println!(
                    "  {:.2}  {} - {} ({} ratings)",
                    album.average_score, album.artist, album.album, album.rating_count
                );
            }
            println!("Completed albums:");
            for album in &stats.completed_albums {
                println!("  {} - {}", album.artist, album.album);
            }
            if !stats.incomplete_albums.is_empty() {
                println!("Incomplete albums:");
                for album in &stats.incomplete_albums {
                    println!(
                        "  {} - {} ({}/{})",
                        album.artist, album.album, album.rated_tracks, album.countable_tracks
                    );
                }
            }
        }
        Command::ArtistStats { artist } => {
            let profile = register.require_active()?;
            store.increment_usage(&profile, UsageCounter::ArtistStatsOpened)?;
            let stats = stats::artist_stats(&store, &profile, &artist)?;
            println!(
                "{}: {:.2} average over {} ratings",
                stats.artist, stats.average_score, stats.rating_count
            );
            for album in &stats.albums {
                println!(
                    "  {:.2}  {} ({} ratings)",
                    album.average_score, album.album, album.rating_count
                );
            }
            report_unlocks(
                &achievements::evaluate(&store, &profile)?
                    .into_iter()
                    .map(|d| d.name)
                    .collect::<Vec<_>>(),
            );
        }
        Command::Achievements => {
            let profile = register.require_active()?;
            for progress in achievements::list_with_progress(&store, &profile)? {
                let marker = if progress.unlocked { "x" } else { " " };
                println!(
                    "[{}] {:<24} {:>3}%  {}",
                    marker, progress.name, progress.progress_percent, progress.description
                );
            }
        }
        Command::Watchlist { action } => {
            let profile = register.require_active()?;
            match action {
                WatchlistCommand::Add { item_id, album } => {
                    let item_type = if album {
                        WatchlistItemType::Album
                    } else {
                        WatchlistItemType::Track
                    };
                    store.add_watchlist_entry(&profile, &item_id, item_type)?;
                }
                WatchlistCommand::Remove { item_id } => {
                    store.remove_watchlist_entry(&profile, &item_id)?;
                }
                WatchlistCommand::List => {
                    for entry in store.get_watchlist(&profile)? {
                        println!("{:<6} {}", entry.item_type.as_str(), entry.item_id);
                    }
                    if let Some(note) = store.get_watchlist_note(&profile)? {
                        println!("Note: {}", note);
                    }
                }
                WatchlistCommand::Note { text } => {
                    store.set_watchlist_note(&profile, &text)?;
                }
            }
        }
        Command::Ignore { song_id } => {
            let profile = register.require_active()?;
            store.ignore_song(&profile, &song_id)?;
        }
        Command::Unignore { song_id } => {
            let profile = register.require_active()?;
            store.unignore_song(&profile, &song_id)?;
        }
        Command::RecordUsage { counter } => {
            let profile = register.require_active()?;
            store.increment_usage(&profile, parse_usage_counter(&counter)?)?;
            report_unlocks(
                &achievements::evaluate(&store, &profile)?
                    .into_iter()
                    .map(|d| d.name)
                    .collect::<Vec<_>>(),
            );
        }
        Command::Highscore { artist_id, score } => {
            let profile = register.require_active()?;
            if store.record_highscore(&profile, &artist_id, score)? {
                println!("New best score for {}: {}", artist_id, score);
            } else {
                println!("No improvement for {}", artist_id);
            }
        }
        Command::Highscores => {
            let profile = register.require_active()?;
            for highscore in store.get_highscores(&profile)? {
                println!("{:>6}  {}", highscore.best_score, highscore.artist_id);
            }
        }
        Command::Export { output } => {
            let profile = register.require_active()?;
            let doc = export_profile(&store, &profile)?;
            let content = serde_json::to_string_pretty(&doc)?;
            std::fs::write(&output, content)
                .with_context(|| format!("Failed to write snapshot to {:?}", output))?;
            println!("Exported profile {} to {:?}", profile, output);
        }
        Command::Import { input } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read snapshot from {:?}", input))?;
            let doc: SnapshotDocument =
                serde_json::from_str(&content).context("Malformed snapshot document")?;
            let outcome = import_snapshot(&store, &register, None, &doc)?;
            println!(
                "Imported {} songs and {} ratings into profile {}",
                outcome.songs_imported, outcome.ratings_imported, outcome.profile_name
            );
            report_unlocks(&outcome.newly_unlocked);
        }
        Command::Reset { confirm } => {
            if !confirm {
                bail!("Refusing to delete the database without --confirm");
            }
            store.reset()?;
            register.clear()?;
            info!("Database and profile register cleared");
            println!("Database reset");
        }
    }

    Ok(())
}
