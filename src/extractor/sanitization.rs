//! Detects HTML that has been stripped down (reader mode, copy/paste of the
//! rendered article) rather than the page source. Such input lacks most of the
//! head-level signals, so the technical scores it produces are misleading.
//!
//! The heuristic leans toward flagging thin pages rather than missing stripped ones.

use super::document::DocumentModel;
use super::structured_data::JSON_LD_SELECTOR;

const MIN_BODY_CHARS: usize = 200;
const LONG_BODY_CHARS: usize = 800;
const MIN_REASONS: usize = 4;

pub const LONG_TEXT_FEW_TAGS: &str =
    "Long body text but few SEO tags (typical of a reader-mode or copied rendering)";

/// Presence checks, each paired with the reason emitted when it fails.
const CHECKS: [(&str, &str); 7] = [
    ("title", "No <title> tag found"),
    ("meta[name='description']", "No meta description found"),
    ("link[rel='canonical']", "No canonical link found"),
    ("meta[property^='og:']", "No Open Graph (og:) meta tags found"),
    (JSON_LD_SELECTOR, "No JSON-LD structured data blocks found"),
    ("img", "No images found"),
    ("nav, header", "No <nav> or <header> elements found"),
];

const EMPTY_HEAD: &str = "Document <head> is empty";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizationVerdict {
    pub is_sanitized: bool,
    pub reasons: Vec<String>,
}

impl SanitizationVerdict {
    pub fn detect(doc: &impl DocumentModel, body_text: &str) -> Self {
        let mut reasons: Vec<String> = CHECKS
            .iter()
            .filter(|(selector, _)| !doc.exists(selector))
            .map(|(_, reason)| reason.to_string())
            .collect();

        if !doc.exists("head > *") {
            reasons.push(EMPTY_HEAD.to_string());
        }

        let body_len = body_text.chars().count();
        let failed = reasons.len();
        if body_len > LONG_BODY_CHARS && failed >= MIN_REASONS {
            reasons.push(LONG_TEXT_FEW_TAGS.to_string());
        }

        let is_sanitized = body_len > MIN_BODY_CHARS && failed >= MIN_REASONS;
        if is_sanitized {
            log::debug!("Input looks sanitized ({} failed presence checks)", failed);
        }

        Self {
            is_sanitized,
            reasons,
        }
    }
}
