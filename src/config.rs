use chrono::{Datelike, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{BoardError, Result};
use crate::source::DEFAULT_BASE_URL;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CSS_DIR: &str = "css";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub session_cookie: String,
    pub year: i32,
    pub leaderboard_id: i64,
    pub debug: bool,
    pub port: u16,
    pub base_url: String,
    pub css_dir: String,
}

impl BoardConfig {
    /// Reads the process environment, after loading a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();

        let session_cookie = vars.get("AOC_SESSION_COOKIE").cloned().unwrap_or_default();
        let leaderboard_id = parse_var::<i64>(&vars, "AOC_LEADERBOARD_ID")?.unwrap_or(0);

        if session_cookie.is_empty() || leaderboard_id == 0 {
            return Err(BoardError::Config(
                "AOC_SESSION_COOKIE and AOC_LEADERBOARD_ID env variables required".to_string(),
            ));
        }

        let year = parse_var::<i32>(&vars, "AOC_YEAR")?.unwrap_or_else(|| Utc::now().year());
        let debug = match vars.get("AOC_DEBUG").map(|v| v.trim().to_lowercase()) {
            None => false,
            Some(v) => match v.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(BoardError::Config(format!(
                        "AOC_DEBUG must be 0 or 1, got '{}'",
                        v
                    )))
                }
            },
        };
        let port = parse_var::<u16>(&vars, "HTTP_PORT")?.unwrap_or(DEFAULT_PORT);

        Ok(Self {
            session_cookie,
            year,
            leaderboard_id,
            debug,
            port,
            base_url: vars
                .get("AOC_BASE_URL")
                .cloned()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            css_dir: vars
                .get("CSS_DIR")
                .cloned()
                .unwrap_or_else(|| DEFAULT_CSS_DIR.to_string()),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>> {
    match vars.get(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            BoardError::Config(format!("Error getting env {} as numeric: '{}'", key, raw))
        }),
    }
}

pub fn create_env_template(path: &Path) -> Result<()> {
    let template = format!(
        "# Session cookie copied from a logged in browser\n\
         AOC_SESSION_COOKIE=your-session-cookie\n\
         # Numeric id of the private leaderboard\n\
         AOC_LEADERBOARD_ID=123456\n\
         AOC_YEAR={}\n\
         # 1 serves the embedded sample payload instead of fetching\n\
         AOC_DEBUG=0\n\
         HTTP_PORT={}\n\
         AOC_BASE_URL={}\n\
         CSS_DIR={}\n",
        Utc::now().year(),
        DEFAULT_PORT,
        DEFAULT_BASE_URL,
        DEFAULT_CSS_DIR
    );

    fs::write(path, template)?;
    Ok(())
}
