use reqwest::header::COOKIE;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use crate::error::{BoardError, Result};
use crate::models::Event;

pub const DEFAULT_BASE_URL: &str = "https://adventofcode.com";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Payload served instead of the live leaderboard in debug mode.
pub const SAMPLE_EVENT: &str = include_str!("../data/sample_event.json");

pub struct LeaderboardClient {
    session_cookie: String,
    base_url: String,
    client: Client,
}

impl LeaderboardClient {
    pub fn new(session_cookie: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|source| BoardError::Http {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            session_cookie,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn leaderboard_url(&self, year: i32, leaderboard_id: i64) -> String {
        format!(
            "{}/{}/leaderboard/private/view/{}.json",
            self.base_url, year, leaderboard_id
        )
    }

    /// Raw response body of the private leaderboard.
    pub async fn fetch_raw(&self, year: i32, leaderboard_id: i64) -> Result<String> {
        let url = self.leaderboard_url(year, leaderboard_id);
        info!("Updating from {}", url);

        let response = self
            .client
            .get(&url)
            .header(COOKIE, format!("session={}", self.session_cookie))
            .send()
            .await
            .map_err(|source| BoardError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(BoardError::UnexpectedStatus { url, status });
        }

        response
            .text()
            .await
            .map_err(|source| BoardError::Http { url, source })
    }

    pub async fn fetch_event(&self, year: i32, leaderboard_id: i64) -> Result<Event> {
        let body = self.fetch_raw(year, leaderboard_id).await?;
        Event::from_json(&body)
    }
}

/// Where refreshes get their payload from.
pub enum EventSource {
    Remote(LeaderboardClient),
    Sample,
}

impl EventSource {
    pub async fn load(&self, year: i32, leaderboard_id: i64) -> Result<Event> {
        match self {
            EventSource::Remote(client) => client.fetch_event(year, leaderboard_id).await,
            EventSource::Sample => {
                info!("Fake updating from embedded sample data");
                Event::from_json(SAMPLE_EVENT)
            }
        }
    }
}
