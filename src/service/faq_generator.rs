//! Client for the optional FAQ generation service.
//!
//! The endpoint accepts `{url, title, h1, description, headings, bodyPreview}`
//! and answers `{"faqs": [{"question": ..., "answer": ...}]}`. Anything else is
//! a malformed response. Without a configured endpoint the feature is off and
//! the rest of the audit is unaffected.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{FaqConfig, FetchConfig};
use crate::domain::models::{FaqItem, Report};
use crate::error::{AppError, Result};
use crate::service::http::create_client;

const SERVICE: &str = "faq-service";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqRequest {
    pub url: String,
    pub title: String,
    pub h1: String,
    pub description: String,
    pub headings: Vec<String>,
    pub body_preview: String,
}

impl FaqRequest {
    pub fn from_report(report: &Report) -> Self {
        Self {
            url: report.url.clone(),
            title: report.title.clone().unwrap_or_default(),
            h1: report.h1.clone().unwrap_or_default(),
            description: report.description.clone().unwrap_or_default(),
            headings: report.headings(),
            body_preview: report.body_preview.clone(),
        }
    }
}

/// Strategy trait for FAQ generation.
#[async_trait]
pub trait FaqGenerator: Send + Sync {
    async fn generate(&self, request: &FaqRequest) -> Result<Vec<FaqItem>>;

    /// Human-readable name for this generator.
    fn name(&self) -> &'static str;
}

/// Generator backed by an HTTP POST endpoint.
pub struct HttpFaqGenerator {
    client: Client,
    endpoint: String,
}

impl HttpFaqGenerator {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// `Ok(None)` when no endpoint is configured.
    pub fn from_config(faq: &FaqConfig, fetch: &FetchConfig) -> Result<Option<Self>> {
        let Some(endpoint) = faq.endpoint() else {
            log::debug!("FAQ generation disabled: no endpoint configured");
            return Ok(None);
        };
        let client = create_client(faq.timeout_secs, &fetch.user_agent)?;
        Ok(Some(Self::new(endpoint, client)))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FaqGenerator for HttpFaqGenerator {
    async fn generate(&self, request: &FaqRequest) -> Result<Vec<FaqItem>> {
        log::info!("Requesting FAQs for {} from {}", request.url, self.endpoint);

        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::malformed(SERVICE, format!("invalid JSON: {}", e)))?;
        let faqs = parse_faqs(body)?;
        log::info!("FAQ service returned {} entries", faqs.len());
        Ok(faqs)
    }

    fn name(&self) -> &'static str {
        "HTTP FAQ service"
    }
}

fn parse_faqs(mut body: Value) -> Result<Vec<FaqItem>> {
    let faqs = match body.get_mut("faqs").map(Value::take) {
        Some(faqs @ Value::Array(_)) => faqs,
        Some(_) => return Err(AppError::malformed(SERVICE, "`faqs` is not an array")),
        None => return Err(AppError::malformed(SERVICE, "response has no `faqs` array")),
    };
    serde_json::from_value(faqs)
        .map_err(|e| AppError::malformed(SERVICE, format!("bad FAQ entry: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_faq_array() {
        let faqs = parse_faqs(json!({
            "faqs": [{"question": "What is it?", "answer": "A thing."}]
        }))
        .unwrap();
        assert_eq!(
            faqs,
            vec![FaqItem {
                question: "What is it?".into(),
                answer: "A thing.".into()
            }]
        );
    }

    #[test]
    fn rejects_missing_or_wrong_faqs() {
        assert!(matches!(parse_faqs(json!({"items": []})), Err(AppError::MalformedResponse { .. })));
        assert!(matches!(parse_faqs(json!({"faqs": "nope"})), Err(AppError::MalformedResponse { .. })));
        assert!(matches!(
            parse_faqs(json!({"faqs": [{"question": 1}]})),
            Err(AppError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = FaqRequest {
            url: "https://example.com".into(),
            title: "t".into(),
            h1: "h".into(),
            description: "d".into(),
            headings: vec!["a".into()],
            body_preview: "b".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["bodyPreview"], "b");
        assert!(value.get("body_preview").is_none());
    }

    #[test]
    fn unconfigured_endpoint_disables_generator() {
        let generator = HttpFaqGenerator::from_config(&FaqConfig::default(), &FetchConfig::default()).unwrap();
        assert!(generator.is_none());
    }
}
