//! Page fetcher: turns a user-entered URL (plus optional proxy template) into
//! HTML text for the report assembler.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::FetchConfig;
use crate::error::{AppError, Result};
use crate::service::http::create_fetch_client;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Apply a proxy template to a target URL.
///
/// - empty template: the target itself
/// - contains `{url}`: placeholder replaced by the encoded target
/// - contains `?`: encoded target appended as a query value
/// - otherwise a path prefix: `template/target`
pub fn proxied_url(target: &str, template: &str) -> String {
    let template = template.trim();
    if template.is_empty() {
        return target.to_string();
    }
    if template.contains("{url}") {
        return template.replace("{url}", &encode_uri_component(target));
    }
    if template.contains('?') {
        return format!("{}{}", template, encode_uri_component(target));
    }
    if template.ends_with('/') {
        format!("{}{}", template, target)
    } else {
        format!("{}/{}", template, target)
    }
}

/// Normalize what a user typed into an absolute http(s) URL.
pub fn normalize_target(input: &str) -> Result<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::InvalidUrl("empty URL".into()));
    }
    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };
    let url = Url::parse(&candidate).map_err(|e| AppError::InvalidUrl(format!("{}: {}", input, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::InvalidUrl(format!("unsupported scheme {:?}", other))),
    }
}

pub struct PageFetcher {
    client: Client,
    proxy_template: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            client: create_fetch_client(config)?,
            proxy_template: config.proxy_template.clone(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    pub fn with_proxy(mut self, template: impl Into<String>) -> Self {
        self.proxy_template = template.into();
        self
    }

    /// Fetch the page HTML. Transport errors and 5xx answers are retried;
    /// other HTTP failures surface immediately.
    pub async fn fetch(&self, target: &str, cancel: &CancellationToken) -> Result<String> {
        let url = normalize_target(target)?;
        let request_url = proxied_url(url.as_str(), &self.proxy_template);
        log::info!("Fetching {} via {}", url, request_url);

        let mut attempt = 0;
        loop {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AppError::Cancelled),
                result = self.fetch_once(&request_url) => result,
            };

            match result {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    log::warn!("Fetch attempt {} for {} failed: {}; retrying", attempt, url, e);
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(AppError::Cancelled),
                        _ = tokio::time::sleep(self.retry_backoff * attempt) => {}
                    }
                }
                other => return other,
            }
        }
    }

    async fn fetch_once(&self, request_url: &str) -> Result<String> {
        let response = self.client.get(request_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: request_url.to_string(),
            });
        }
        let html = response.text().await?;
        log::debug!("Fetched {} bytes from {}", html.len(), request_url);
        Ok(html)
    }
}
