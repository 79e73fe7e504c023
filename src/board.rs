use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::error::Result;
use crate::member_score::MemberScore;
use crate::models::Event;
use crate::scoring::{compute_standings, Day};
use crate::source::EventSource;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Immutable snapshot of the leaderboard as of one refresh.
#[derive(Debug, Clone)]
pub struct Board {
    pub year: i32,
    pub leaderboard_id: i64,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub max_day: u32,
    pub days: BTreeMap<u32, Day>,
    pub totals: BTreeMap<i64, MemberScore>,
    pub top_scores: Vec<MemberScore>,
}

impl Board {
    /// Placeholder served until the first refresh succeeds.
    pub fn empty(year: i32, leaderboard_id: i64) -> Self {
        Self {
            year,
            leaderboard_id,
            last_synced_at: None,
            max_day: 0,
            days: BTreeMap::new(),
            totals: BTreeMap::new(),
            top_scores: Vec::new(),
        }
    }

    pub fn from_event(
        event: &Event,
        year: i32,
        leaderboard_id: i64,
        synced_at: DateTime<Utc>,
    ) -> Self {
        let standings = compute_standings(event, year);
        Self {
            year,
            leaderboard_id,
            last_synced_at: Some(synced_at),
            max_day: standings.max_day,
            days: standings.days,
            totals: standings.totals,
            top_scores: standings.top_scores,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.last_synced_at.is_some()
    }

    pub fn day(&self, day: u32) -> Option<&Day> {
        self.days.get(&day)
    }

    pub fn latest_day(&self) -> Option<&Day> {
        self.days.get(&self.max_day)
    }
}

/// Holds the current board. Refreshes publish a whole new snapshot; readers
/// get an `Arc` they can keep for the rest of their request.
pub struct BoardState {
    current: RwLock<Arc<Board>>,
}

impl BoardState {
    pub fn new(initial: Board) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    pub async fn snapshot(&self) -> Arc<Board> {
        self.current.read().await.clone()
    }

    pub async fn publish(&self, board: Board) {
        *self.current.write().await = Arc::new(board);
    }
}

/// The single writer of a `BoardState`.
pub struct Refresher {
    source: EventSource,
    state: Arc<BoardState>,
    year: i32,
    leaderboard_id: i64,
}

impl Refresher {
    pub fn new(
        source: EventSource,
        state: Arc<BoardState>,
        year: i32,
        leaderboard_id: i64,
    ) -> Self {
        Self {
            source,
            state,
            year,
            leaderboard_id,
        }
    }

    /// Fetches, scores and publishes. On error the previous board stays.
    pub async fn refresh(&self) -> Result<()> {
        let event = self.source.load(self.year, self.leaderboard_id).await?;
        let members = event.members.len();
        let board = Board::from_event(&event, self.year, self.leaderboard_id, Utc::now());

        info!(
            year = self.year,
            leaderboard_id = self.leaderboard_id,
            members,
            max_day = board.max_day,
            totals = board.totals.len(),
            "Board refreshed"
        );

        self.state.publish(board).await;
        Ok(())
    }

    /// Refreshes on a fixed tick until the task is dropped. A slow refresh
    /// delays the next tick instead of overlapping it.
    pub async fn run(self, period: Duration) {
        let mut tick = tokio::time::interval(period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tick.tick().await;
            if let Err(e) = self.refresh().await {
                error!("Refresh failed, keeping last board: {}", e);
            }
        }
    }

    pub fn spawn(self, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(period))
    }
}
