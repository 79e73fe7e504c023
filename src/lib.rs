pub mod board;
pub mod config;
pub mod error;
pub mod member_score;
pub mod models;
pub mod ranking;
pub mod scoring;
pub mod server;
pub mod source;
pub mod views;

#[cfg(test)]
mod tests;
