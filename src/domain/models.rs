//! Report types handed to callers.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::CommandError;
pub use crate::extractor::headings::FaqItem;

// ====== Enums ======

/// The seven scoring categories. Declaration order is the serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    ContentClarity,
    StructuredData,
    Readability,
    TechnicalSEO,
    EATTrust,
    MediaAlt,
    InternalLinks,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::ContentClarity,
        Category::StructuredData,
        Category::Readability,
        Category::TechnicalSEO,
        Category::EATTrust,
        Category::MediaAlt,
        Category::InternalLinks,
    ];

    /// Contribution of this category to the total score. Weights sum to 1.0.
    pub fn weight(&self) -> f64 {
        match self {
            Category::ContentClarity => 0.22,
            Category::StructuredData => 0.24,
            Category::Readability => 0.12,
            Category::TechnicalSEO => 0.16,
            Category::EATTrust => 0.14,
            Category::MediaAlt => 0.06,
            Category::InternalLinks => 0.06,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ContentClarity => "ContentClarity",
            Category::StructuredData => "StructuredData",
            Category::Readability => "Readability",
            Category::TechnicalSEO => "TechnicalSEO",
            Category::EATTrust => "EATTrust",
            Category::MediaAlt => "MediaAlt",
            Category::InternalLinks => "InternalLinks",
        }
    }
}

// ====== Simple Entities ======

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub total: usize,
    pub with_alt: usize,
}

/// Audit result for one HTML snapshot. Built once by the report assembler and
/// never mutated; re-run the assembler for an updated report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub url: String,

    pub title: Option<String>,
    pub description: Option<String>,
    pub lang: Option<String>,
    pub has_viewport: bool,
    pub has_canonical: bool,
    #[serde(rename = "hasOG")]
    pub has_og: bool,

    pub h1: Option<String>,
    pub h2s: Vec<String>,
    pub h3s: Vec<String>,
    pub word_count: usize,
    pub reading_ease: f64,

    pub jsonld_types: Vec<String>,
    pub faqs_detected: bool,
    pub how_to_detected: bool,
    pub article_detected: bool,
    pub breadcrumb_detected: bool,
    pub author_detected: bool,
    pub updated_detected: bool,

    pub qa_headings: Vec<String>,

    pub images: ImageStats,
    pub internal_links: usize,
    pub external_links: usize,

    pub subscores: BTreeMap<Category, f64>,
    pub subscore_reasons: BTreeMap<Category, Vec<String>>,
    pub total_score: u8,

    pub suggestions: Vec<String>,
    #[serde(rename = "suggestedFAQs")]
    pub suggested_faqs: Vec<FaqItem>,
    #[serde(rename = "faqJsonLD")]
    pub faq_json_ld: String,
    pub notes: Vec<String>,

    pub body_preview: String,
    pub is_sanitized: bool,
    pub sanitized_reasons: Vec<String>,
}

impl Report {
    pub fn subscore(&self, category: Category) -> f64 {
        self.subscores.get(&category).copied().unwrap_or(0.0)
    }

    pub fn reasons(&self, category: Category) -> &[String] {
        self.subscore_reasons
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// h2 headings followed by h3 headings.
    pub fn headings(&self) -> Vec<String> {
        self.h2s.iter().chain(&self.h3s).cloned().collect()
    }
}

// ====== Session state ======

/// What a front end renders: nothing yet, a request in flight, a finished
/// report, or the error from the last attempt.
#[derive(Debug, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "camelCase")]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Ready(Box<Report>),
    Failed(CommandError),
}

impl AnalysisState {
    pub fn report(&self) -> Option<&Report> {
        match self {
            AnalysisState::Ready(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CommandError> {
        match self {
            AnalysisState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading)
    }
}
