use anyhow::Context;
use reqwest::Client;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::Result;

/// Factory for the HTTP client shared by the page fetcher and the FAQ service.
pub fn create_client(timeout_secs: u64, user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(user_agent)
        .build()
        .context("Failed to build reqwest client")?;
    Ok(client)
}

pub fn create_fetch_client(config: &FetchConfig) -> Result<Client> {
    create_client(config.timeout_secs, &config.user_agent)
}
