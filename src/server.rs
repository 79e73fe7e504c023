use axum::extract::{MatchedPath, Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::board::{Board, BoardState};
use crate::member_score::{MemberScore, TOTALS_DAY};
use crate::ranking::{ranked, SortKey};
use crate::views;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("invalid day '{0}'")]
    InvalidDay(String),

    #[error("no results for day {0}")]
    UnknownDay(u32),

    #[error("leaderboard not loaded yet")]
    NotLoaded(Arc<Board>),
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        match self {
            ViewError::NotLoaded(board) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(views::render_not_loaded(&board)),
            )
                .into_response(),
            ViewError::InvalidDay(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            ViewError::UnknownDay(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
        }
    }
}

type ViewResult = Result<Html<String>, ViewError>;

async fn loaded(state: &BoardState) -> Result<Arc<Board>, ViewError> {
    let board = state.snapshot().await;
    if board.is_loaded() {
        Ok(board)
    } else {
        Err(ViewError::NotLoaded(board))
    }
}

fn parse_day(raw: &str) -> Result<u32, ViewError> {
    raw.parse::<u32>()
        .map_err(|_| ViewError::InvalidDay(raw.to_string()))
}

fn day_scores(board: &Board, day: u32) -> Result<Vec<&MemberScore>, ViewError> {
    if day == TOTALS_DAY {
        return Ok(board.totals.values().collect());
    }
    board
        .day(day)
        .map(|d| d.member_scores.values().collect())
        .ok_or(ViewError::UnknownDay(day))
}

fn render_day(board: &Board, day: u32, order: SortKey) -> ViewResult {
    let scores = ranked(day_scores(board, day)?, order);
    Ok(Html(views::render_day(board, day, &scores, order)))
}

#[instrument(skip(state))]
pub async fn latest_day(State(state): State<Arc<BoardState>>) -> ViewResult {
    let board = loaded(&state).await?;
    render_day(&board, board.max_day, SortKey::default())
}

#[instrument(skip(state))]
pub async fn day(State(state): State<Arc<BoardState>>, Path(day): Path<String>) -> ViewResult {
    let day = parse_day(&day)?;
    let board = loaded(&state).await?;
    render_day(&board, day, SortKey::default())
}

#[instrument(skip(state))]
pub async fn day_ordered(
    State(state): State<Arc<BoardState>>,
    Path((day, order_by)): Path<(String, String)>,
) -> ViewResult {
    let day = parse_day(&day)?;
    let board = loaded(&state).await?;
    render_day(&board, day, SortKey::parse_or_default(&order_by))
}

#[instrument(skip(state))]
pub async fn embed(State(state): State<Arc<BoardState>>) -> ViewResult {
    let board = loaded(&state).await?;

    // before the first star there is no latest day, only an empty table
    let mut day_scores = board
        .latest_day()
        .map(|latest| ranked(latest.member_scores.values(), SortKey::WeightedTime))
        .unwrap_or_default();
    let mut totals = ranked(board.totals.values(), SortKey::WeightedTime);
    day_scores.truncate(views::EMBED_LIMIT);
    totals.truncate(views::EMBED_LIMIT);

    Ok(Html(views::render_embed(&board, board.max_day, &day_scores, &totals)))
}

#[instrument(skip(state))]
pub async fn top_scores(State(state): State<Arc<BoardState>>) -> ViewResult {
    let board = loaded(&state).await?;
    Ok(Html(views::render_top_scores(&board)))
}

pub async fn health(State(state): State<Arc<BoardState>>) -> (StatusCode, String) {
    let board = state.snapshot().await;
    match board.last_synced_at {
        Some(at) => (StatusCode::OK, format!("ok {}", at.to_rfc3339())),
        None => (StatusCode::SERVICE_UNAVAILABLE, "loading".to_string()),
    }
}

pub fn router(state: Arc<BoardState>, css_dir: &str) -> Router {
    Router::new()
        .route("/", get(latest_day))
        .route("/day", get(latest_day))
        .route("/day/{day}", get(day))
        .route("/day/{day}/", get(day))
        .route("/day/{day}/{order_by}", get(day_ordered))
        .route("/embed", get(embed))
        .route("/topscores", get(top_scores))
        .route("/health", get(health))
        .nest_service("/css", ServeDir::new(css_dir))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                let method = req.method();
                let uri = req.uri();
                let matched_path = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|matched| matched.as_str());

                tracing::info_span!("request", ?method, ?uri, ?matched_path)
            }),
        )
        .with_state(state)
}

pub async fn serve(state: Arc<BoardState>, port: u16, css_dir: &str) -> std::io::Result<()> {
    let app = router(state, css_dir);
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Listening on port {}", port);
    axum::serve(listener, app).await
}
