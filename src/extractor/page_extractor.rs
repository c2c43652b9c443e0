//! Signal scanner: one pass over a parsed page collecting everything the
//! scoring engine needs. Schema types are detected from JSON-LD first and
//! from microdata/class fallbacks second.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use super::document::DocumentModel;
use super::structured_data::StructuredData;
use super::text::{flesch_reading_ease, tokenize};

const FAQ_TYPES: [&str; 1] = ["FAQPage"];
const HOWTO_TYPES: [&str; 1] = ["HowTo"];
const ARTICLE_TYPES: [&str; 3] = ["Article", "NewsArticle", "BlogPosting"];
const BREADCRUMB_TYPES: [&str; 1] = ["BreadcrumbList"];
const AUTHOR_TYPES: [&str; 2] = ["Person", "Organization"];

const FAQ_FALLBACK: &str = "[itemtype*='FAQPage'], #faq, .faq, [class*='faq']";
const HOWTO_FALLBACK: &str = "[itemtype*='HowTo']";
const ARTICLE_FALLBACK: &str = "article, [itemtype*='Article']";
const BREADCRUMB_FALLBACK: &str = "[itemtype*='BreadcrumbList'], .breadcrumb, .breadcrumbs, \
     nav[aria-label*='breadcrumb'], nav[aria-label*='Breadcrumb']";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractedImages {
    pub total: usize,
    pub with_alt: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
}

/// Trust-related link signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrustLinks {
    pub about: bool,
    pub contact: bool,
    pub sources: bool,
}

/// Raw signals gathered from one parsed page.
#[derive(Debug, Clone, Default)]
pub struct PageSignals {
    pub title: Option<String>,
    pub description: Option<String>,
    pub lang: Option<String>,
    pub has_viewport: bool,
    pub has_canonical: bool,
    pub has_og: bool,
    pub h1: Option<String>,
    pub h2s: Vec<String>,
    pub h3s: Vec<String>,
    pub body_text: String,
    pub word_count: usize,
    pub reading_ease: f64,
    pub images: ExtractedImages,
    pub links: LinkCounts,
    pub trust_links: TrustLinks,
    pub structured_data: StructuredData,
    pub faq_detected: bool,
    pub howto_detected: bool,
    pub article_detected: bool,
    pub breadcrumb_detected: bool,
    pub author_detected: bool,
    pub updated_detected: bool,
}

fn author_markup() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)author|byline").unwrap())
}

fn updated_text() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)updated|last updated|modified").unwrap())
}

fn source_text() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)source|reference|learn more").unwrap())
}

pub struct PageExtractor;

impl PageExtractor {
    /// Scan a parsed page. `base_url` may be empty or invalid, in which case no
    /// link is classified.
    pub fn scan(doc: &impl DocumentModel, base_url: &str) -> PageSignals {
        let structured_data = StructuredData::extract(doc);
        let body_text = doc.body_text();
        let word_count = tokenize(&body_text).len();
        let reading_ease = flesch_reading_ease(&body_text);

        let faq_detected = structured_data.has_any_type(&FAQ_TYPES) || doc.exists(FAQ_FALLBACK);
        let howto_detected =
            structured_data.has_any_type(&HOWTO_TYPES) || doc.exists(HOWTO_FALLBACK);
        let article_detected =
            structured_data.has_any_type(&ARTICLE_TYPES) || doc.exists(ARTICLE_FALLBACK);
        let breadcrumb_detected =
            structured_data.has_any_type(&BREADCRUMB_TYPES) || doc.exists(BREADCRUMB_FALLBACK);
        let author_detected = author_markup().is_match(&doc.body_markup())
            || structured_data.has_any_type(&AUTHOR_TYPES);
        let updated_detected =
            updated_text().is_match(&body_text) || Self::has_machine_readable_time(doc);

        PageSignals {
            title: Self::extract_title(doc),
            description: Self::extract_meta_description(doc),
            lang: doc.first_attr("html", "lang"),
            has_viewport: doc.exists("meta[name='viewport']"),
            has_canonical: doc.exists("link[rel='canonical']"),
            has_og: doc.exists("meta[property^='og:']"),
            h1: doc.first_text("h1"),
            h2s: Self::extract_headings(doc, "h2"),
            h3s: Self::extract_headings(doc, "h3"),
            word_count,
            reading_ease,
            images: Self::extract_images(doc),
            links: Self::extract_links(doc, base_url),
            trust_links: Self::extract_trust_links(doc),
            faq_detected,
            howto_detected,
            article_detected,
            breadcrumb_detected,
            author_detected,
            updated_detected,
            structured_data,
            body_text,
        }
    }

    pub fn extract_title(doc: &impl DocumentModel) -> Option<String> {
        doc.first_text("title")
    }

    pub fn extract_meta_description(doc: &impl DocumentModel) -> Option<String> {
        doc.first_attr("meta[name='description']", "content")
    }

    pub fn extract_headings(doc: &impl DocumentModel, tag: &str) -> Vec<String> {
        doc.select(tag)
            .iter()
            .map(|el| el.clean_text())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn extract_images(doc: &impl DocumentModel) -> ExtractedImages {
        let images = doc.select("img");
        let with_alt = images
            .iter()
            .filter(|img| img.attr("alt").is_some_and(|a| !a.trim().is_empty()))
            .count();

        ExtractedImages {
            total: images.len(),
            with_alt,
        }
    }

    pub fn extract_links(doc: &impl DocumentModel, base_url: &str) -> LinkCounts {
        let mut counts = LinkCounts::default();
        let base = match Url::parse(base_url.trim()) {
            Ok(base) => base,
            Err(e) => {
                log::debug!("Skipping link classification, base URL {:?}: {}", base_url, e);
                return counts;
            }
        };
        let base_host = base.host_str();

        for anchor in doc.select("a[href]") {
            let Some(href) = anchor.attr("href") else {
                continue;
            };
            let Ok(resolved) = base.join(href.trim()) else {
                continue;
            };

            if resolved.host_str() == base_host {
                counts.internal += 1;
            } else {
                counts.external += 1;
            }
        }

        counts
    }

    pub fn extract_trust_links(doc: &impl DocumentModel) -> TrustLinks {
        let mut trust = TrustLinks::default();
        for anchor in doc.select("a") {
            if let Some(href) = anchor.attr("href") {
                let href = href.to_lowercase();
                trust.about |= href.contains("about");
                trust.contact |= href.contains("contact");
            }
            trust.sources |= source_text().is_match(&anchor.clean_text());
        }
        trust
    }

    fn has_machine_readable_time(doc: &impl DocumentModel) -> bool {
        doc.select("time[datetime]")
            .iter()
            .any(|t| t.attr("datetime").is_some_and(|d| !d.trim().is_empty()))
    }
}
