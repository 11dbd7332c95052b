use std::collections::HashSet;
use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, Subcommand};
use time_humanize::{Accuracy, HumanTime, Tense};
use tracing_subscriber::EnvFilter;

use snapquiz::config::{Config, ConfigStore, FileConfigStore};
use snapquiz::frame::Frame;
use snapquiz::leaderboard::{Leaderboard, ScoreEntry, SqliteLeaderboard};
use snapquiz::manifest::{self, DEMO_TEST_ID};
use snapquiz::player::{Phase, Player};
use snapquiz::replay::{load_script_file, run_script};
use snapquiz::session_log::{SessionLog, SessionRecord};

/// headless driver for screenshot-quiz bundles
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Inspect screenshot-quiz bundles, replay recorded sessions against them, and browse the local leaderboard. Rendering and input capture belong to a frontend; this binary drives the game-state engine."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// summarize a bundle manifest (defaults to the embedded demo)
    Info {
        manifest: Option<PathBuf>,

        /// directory holding the bundle's unpacked image assets
        #[arg(long)]
        assets: Option<PathBuf>,
    },
    /// replay a recorded session script and print the resulting score
    Replay {
        script: PathBuf,

        /// bundle manifest to play (defaults to the embedded demo)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// directory holding the bundle's unpacked image assets
        #[arg(long)]
        assets: Option<PathBuf>,

        /// submit the result to the local leaderboard
        #[arg(long)]
        submit: bool,

        /// email to submit under (falls back to the configured default)
        #[arg(long)]
        email: Option<String>,
    },
    /// list leaderboard entries for a test, best score first
    Board {
        test_id: String,

        /// leaderboard database path (falls back to config, then the default)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn asset_listing(dir: &Path) -> io::Result<HashSet<String>> {
    let mut names = HashSet::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Resolve the frames and the test identifier for an optional manifest path.
fn load_frames(
    manifest_path: Option<&Path>,
    assets_dir: Option<&Path>,
) -> Result<(Vec<Frame>, String), Box<dyn Error>> {
    match manifest_path {
        Some(path) => {
            let listing = assets_dir.map(asset_listing).transpose()?;
            let frames = manifest::load_manifest_file(path, listing.as_ref())?;
            let test_id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEMO_TEST_ID.to_string());
            Ok((frames, test_id))
        }
        None => Ok((manifest::demo_frames(), DEMO_TEST_ID.to_string())),
    }
}

fn print_info(frames: &[Frame], test_id: &str) {
    println!("test: {test_id}");
    println!("frames: {}", frames.len());
    for frame in frames {
        let hotspots = frame.hotspot_count();
        let inputs = frame.boxes.len() - hotspots;
        let mode = if frame.is_sequential() {
            " (sequential)"
        } else {
            ""
        };
        println!(
            "  {} [{}x{}] image={} hotspots={} inputs={}{}",
            frame.id, frame.width, frame.height, frame.image_ref, hotspots, inputs, mode
        );
    }
    let possible: usize = frames.iter().map(|f| f.boxes.len()).sum();
    println!("total boxes: {possible}");
}

fn run_replay(
    script_path: &Path,
    manifest_path: Option<&Path>,
    assets_dir: Option<&Path>,
    submit: bool,
    email: Option<String>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let (frames, test_id) = load_frames(manifest_path, assets_dir)?;
    let script = load_script_file(script_path)?;

    let mut player = Player::with_advance_delay(frames, config.advance_delay_ms);
    run_script(&mut player, &script);

    if player.phase != Phase::Review {
        println!(
            "session did not reach review (stopped on frame {} of {})",
            player.current + 1,
            player.frames.len()
        );
        return Ok(());
    }

    let report = player
        .report
        .clone()
        .expect("review mode always carries a report");
    println!(
        "score: {}/{} ({} correct, -{} mistakes) in {}s",
        report.points,
        report.possible,
        report.correct_boxes,
        report.deductions(),
        player.elapsed_secs()
    );

    let log_path = config
        .results_log
        .clone()
        .or_else(snapquiz::app_dirs::AppDirs::results_log_path);
    if let Some(path) = log_path {
        let record = SessionRecord::from_report(&test_id, &report, player.elapsed_secs());
        SessionLog::new(&path).append(&record)?;
    }

    if submit {
        let email = email
            .or_else(|| config.default_email.clone())
            .ok_or("--submit needs --email or a configured default_email")?;
        let db_path = config
            .leaderboard_db
            .clone()
            .unwrap_or_else(SqliteLeaderboard::default_path);
        let board = SqliteLeaderboard::open(&db_path)?;
        board.submit(&ScoreEntry {
            email,
            score: report.points,
            total: report.possible,
            elapsed_secs: player.elapsed_secs(),
            test_id: test_id.clone(),
            submitted_at: Local::now(),
        })?;
        println!("submitted to {}", db_path.display());
    }

    Ok(())
}

fn print_board(test_id: &str, db: Option<PathBuf>, config: &Config) -> Result<(), Box<dyn Error>> {
    let db_path = db
        .or_else(|| config.leaderboard_db.clone())
        .unwrap_or_else(SqliteLeaderboard::default_path);
    let board = SqliteLeaderboard::open(&db_path)?;
    let entries = board.entries_for(test_id)?;

    if entries.is_empty() {
        println!("no scores for `{test_id}` yet");
        return Ok(());
    }

    for (rank, entry) in entries.iter().enumerate() {
        let age = (Local::now() - entry.submitted_at)
            .to_std()
            .unwrap_or_default();
        println!(
            "{:>3}. {:<30} {:>3}/{:<3} {:>5}s  {}",
            rank + 1,
            entry.email,
            entry.score,
            entry.total,
            entry.elapsed_secs,
            HumanTime::from(age).to_text_en(Accuracy::Rough, Tense::Past)
        );
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = FileConfigStore::new().load();

    match cli.command {
        Command::Info { manifest, assets } => {
            let (frames, test_id) = load_frames(manifest.as_deref(), assets.as_deref())?;
            print_info(&frames, &test_id);
        }
        Command::Replay {
            script,
            manifest,
            assets,
            submit,
            email,
        } => {
            run_replay(
                &script,
                manifest.as_deref(),
                assets.as_deref(),
                submit,
                email,
                &config,
            )?;
        }
        Command::Board { test_id, db } => {
            print_board(&test_id, db, &config)?;
        }
    }

    Ok(())
}
