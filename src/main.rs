use advent_board::member_score::{readable_time, MemberScore};
use advent_board::{board, config, ranking, server, source, views};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use chrono::Local;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use board::{Board, BoardState, Refresher, REFRESH_INTERVAL};
use config::BoardConfig;
use source::{EventSource, LeaderboardClient};

#[derive(Parser)]
#[command(name = "advent_board")]
#[command(about = "Private puzzle leaderboard with per-day rankings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the leaderboard (default)
    Serve,
    /// Write a .env template
    CreateEnv {
        #[arg(short, long, default_value = ".env")]
        path: PathBuf,
    },
    /// Refresh once and print the latest day and totals
    Snapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup tracing with both stdout and file output
    let log_dir = PathBuf::from("logs");
    fs::create_dir_all(&log_dir)?;

    let log_file = log_dir.join(format!("advent_board_{}.log", Local::now().format("%Y%m%d")));

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(Arc::new(file))
        .with_target(true)
        .with_ansi(false)
        .with_line_number(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::CreateEnv { path }) => {
            config::create_env_template(&path)?;
            info!("Env template created at {}", path.display());
            Ok(())
        }
        Some(Commands::Snapshot) => snapshot().await,
        Some(Commands::Serve) | None => serve().await,
    }
}

fn load_config() -> Result<BoardConfig> {
    BoardConfig::from_env().context("Failed to load configuration")
}

fn event_source(config: &BoardConfig) -> Result<EventSource> {
    if config.debug {
        warn!("Debug mode: serving the embedded sample leaderboard");
        return Ok(EventSource::Sample);
    }

    let client = LeaderboardClient::new(config.session_cookie.clone(), config.base_url.clone())
        .context("Failed to build HTTP client")?;
    Ok(EventSource::Remote(client))
}

async fn serve() -> Result<()> {
    let config = load_config()?;
    info!(
        "Starting leaderboard {} year {}",
        config.leaderboard_id, config.year
    );

    let state = Arc::new(BoardState::new(Board::empty(config.year, config.leaderboard_id)));
    let refresher = Refresher::new(
        event_source(&config)?,
        state.clone(),
        config.year,
        config.leaderboard_id,
    );

    // the first tick fires immediately, so pages fill in as soon as it lands
    let refresh_handle = refresher.spawn(REFRESH_INTERVAL);

    let result = server::serve(state, config.port, &config.css_dir).await;
    refresh_handle.abort();

    if let Err(e) = &result {
        error!("Server stopped: {}", e);
    }
    result.context("HTTP server failed")
}

async fn snapshot() -> Result<()> {
    let config = load_config()?;
    let state = Arc::new(BoardState::new(Board::empty(config.year, config.leaderboard_id)));

    Refresher::new(
        event_source(&config)?,
        state.clone(),
        config.year,
        config.leaderboard_id,
    )
    .refresh()
    .await
    .context("Failed to refresh leaderboard")?;

    let board = state.snapshot().await;
    if let Some(day) = board.latest_day() {
        println!("Day {} - {}", day.day, board.year);
        print_table(&ranking::ranked(day.member_scores.values(), ranking::SortKey::default()));
        println!();
    }

    println!("Totals - {}", board.year);
    print_table(&ranking::ranked(board.totals.values(), ranking::SortKey::default()));

    println!();
    println!("Top scores");
    print_table(&board.top_scores[..board.top_scores.len().min(views::EMBED_LIMIT)]);

    Ok(())
}

fn print_table(scores: &[MemberScore]) {
    println!(
        "{:>3}  {:<30} {:>9} {:>9} {:>9} {:>9} {:>5}",
        "#", "Name", "Part 1", "Part 2", "Diff", "Weighted", "Days"
    );
    for (i, ms) in scores.iter().enumerate() {
        let cell = |secs: i64, present: bool| {
            if present {
                readable_time(secs)
            } else {
                "-".to_string()
            }
        };
        println!(
            "{:>3}  {:<30} {:>9} {:>9} {:>9} {:>9} {:>5}",
            i + 1,
            ms.name.chars().take(30).collect::<String>(),
            cell(ms.part1, ms.part1 != 0),
            cell(ms.part2, ms.is_complete()),
            cell(ms.part2_diff(), ms.is_complete()),
            cell(ms.w_time, ms.is_complete()),
            ms.count
        );
    }
}
