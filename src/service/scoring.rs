//! Scoring engine: turns page signals into seven category sub-scores with
//! the reasons each check failed, plus the weighted total.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::domain::models::Category;
use crate::extractor::headings::HeadingAnalysis;
use crate::extractor::page_extractor::PageSignals;

pub const TITLE_LEN: (usize, usize) = (15, 65);
pub const DESCRIPTION_LEN: (usize, usize) = (80, 170);
pub const TARGET_WORDS: usize = 400;
pub const TARGET_INTERNAL_LINKS: usize = 8;

fn guide_content() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)steps|guide|setup|install|configure").unwrap())
}

/// Whether body copy reads like step-by-step instructions.
pub fn looks_like_guide(body_text: &str) -> bool {
    guide_content().is_match(body_text)
}

/// Running total for one category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryScore {
    pub score: f64,
    pub reasons: Vec<String>,
}

impl CategoryScore {
    fn check(&mut self, passed: bool, points: f64, reason: impl FnOnce() -> String) {
        if passed {
            self.score += points;
        } else {
            self.reasons.push(reason());
        }
    }

    fn finish(mut self) -> Self {
        self.score = self.score.clamp(0.0, 100.0);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    pub subscores: BTreeMap<Category, f64>,
    pub reasons: BTreeMap<Category, Vec<String>>,
    pub total: u8,
}

pub struct ScoringEngine;

impl ScoringEngine {
    pub fn score(signals: &PageSignals, headings: &HeadingAnalysis) -> Scorecard {
        let categories = [
            (Category::ContentClarity, Self::content_clarity(signals, headings)),
            (Category::StructuredData, Self::structured_data(signals)),
            (Category::Readability, Self::readability(signals.reading_ease)),
            (Category::TechnicalSEO, Self::technical_seo(signals)),
            (Category::EATTrust, Self::eat_trust(signals)),
            (Category::MediaAlt, Self::media_alt(signals.images.total, signals.images.with_alt)),
            (Category::InternalLinks, Self::internal_links(signals.links.internal)),
        ];

        let mut subscores = BTreeMap::new();
        let mut reasons = BTreeMap::new();
        for (category, result) in categories {
            subscores.insert(category, result.score);
            reasons.insert(category, result.reasons);
        }

        let total = Self::total(&subscores);
        log::debug!("Scored page: total {} from {:?}", total, subscores);

        Scorecard {
            subscores,
            reasons,
            total,
        }
    }

    /// round(sum of weight * subscore), clamped to 0-100.
    pub fn total(subscores: &BTreeMap<Category, f64>) -> u8 {
        let weighted: f64 = Category::ALL
            .iter()
            .map(|c| c.weight() * subscores.get(c).copied().unwrap_or(0.0))
            .sum();
        weighted.round().clamp(0.0, 100.0) as u8
    }

    pub fn content_clarity(signals: &PageSignals, headings: &HeadingAnalysis) -> CategoryScore {
        let mut s = CategoryScore::default();

        s.check(signals.h1.is_some(), 25.0, || "Missing H1 heading".to_string());

        let title_len = signals.title.as_deref().map_or(0, |t| t.chars().count());
        s.check(
            (TITLE_LEN.0..=TITLE_LEN.1).contains(&title_len),
            25.0,
            || format!(
                "Title length {} is outside the recommended {}-{} characters",
                title_len, TITLE_LEN.0, TITLE_LEN.1
            ),
        );

        let desc_len = signals.description.as_deref().map_or(0, |d| d.chars().count());
        s.check(
            (DESCRIPTION_LEN.0..=DESCRIPTION_LEN.1).contains(&desc_len),
            20.0,
            || format!(
                "Meta description length {} is outside the recommended {}-{} characters",
                desc_len, DESCRIPTION_LEN.0, DESCRIPTION_LEN.1
            ),
        );

        if signals.word_count >= TARGET_WORDS {
            s.score += 20.0;
        } else {
            s.score += (signals.word_count as f64 / TARGET_WORDS as f64 * 20.0).min(20.0);
            s.reasons.push(format!(
                "Only {} words of content (aim for {}+)",
                signals.word_count, TARGET_WORDS
            ));
        }

        s.check(!headings.qa_headings.is_empty(), 10.0, || {
            "No question-style H2/H3 headings".to_string()
        });

        s.finish()
    }

    pub fn structured_data(signals: &PageSignals) -> CategoryScore {
        let mut s = CategoryScore::default();

        s.check(signals.faq_detected, 35.0, || "No FAQPage structured data or FAQ section".to_string());

        // HowTo only counts against the page when its copy looks like a guide
        if signals.howto_detected {
            s.score += 15.0;
        } else if looks_like_guide(&signals.body_text) {
            s.reasons.push("Step-by-step content without HowTo structured data".to_string());
        }

        s.check(signals.article_detected, 15.0, || "No Article structured data".to_string());
        s.check(signals.breadcrumb_detected, 15.0, || "No BreadcrumbList structured data".to_string());
        s.check(signals.author_detected, 20.0, || "No author or organization signal".to_string());

        s.finish()
    }

    /// Tiered, not additive.
    pub fn readability(reading_ease: f64) -> CategoryScore {
        let (score, reason) = if reading_ease > 80.0 {
            (95.0, None)
        } else if reading_ease >= 60.0 {
            (85.0, None)
        } else if reading_ease >= 45.0 {
            (
                65.0,
                Some(format!("Reading ease {:.1} is fairly difficult (aim for 60+)", reading_ease)),
            )
        } else {
            (
                40.0,
                Some(format!("Reading ease {:.1} is difficult (aim for 60+)", reading_ease)),
            )
        };

        CategoryScore {
            score,
            reasons: reason.into_iter().collect(),
        }
        .finish()
    }

    pub fn technical_seo(signals: &PageSignals) -> CategoryScore {
        let mut s = CategoryScore::default();
        s.check(signals.lang.is_some(), 20.0, || "Missing lang attribute on <html>".to_string());
        s.check(signals.has_viewport, 25.0, || "Missing viewport meta tag".to_string());
        s.check(signals.has_canonical, 25.0, || "Missing canonical link".to_string());
        s.check(signals.has_og, 15.0, || "Missing Open Graph tags".to_string());
        s.check(signals.updated_detected, 15.0, || "No last-updated date signal".to_string());
        s.finish()
    }

    pub fn eat_trust(signals: &PageSignals) -> CategoryScore {
        let mut s = CategoryScore::default();
        s.check(signals.author_detected, 35.0, || "No visible author or organization".to_string());
        s.check(signals.trust_links.about, 20.0, || "No link to an About page".to_string());
        s.check(signals.trust_links.contact, 20.0, || "No link to a Contact page".to_string());
        s.check(signals.trust_links.sources, 25.0, || "No links to sources or references".to_string());
        s.finish()
    }

    pub fn media_alt(total: usize, with_alt: usize) -> CategoryScore {
        if total == 0 {
            return CategoryScore {
                score: 100.0,
                reasons: Vec::new(),
            };
        }

        let mut reasons = Vec::new();
        if with_alt < total {
            reasons.push(format!("{} of {} images missing alt text", total - with_alt, total));
        }
        CategoryScore {
            score: with_alt as f64 / total as f64 * 100.0,
            reasons,
        }
        .finish()
    }

    pub fn internal_links(internal: usize) -> CategoryScore {
        let mut reasons = Vec::new();
        if internal < TARGET_INTERNAL_LINKS {
            reasons.push(format!(
                "Only {} internal links (aim for {}+)",
                internal, TARGET_INTERNAL_LINKS
            ));
        }
        CategoryScore {
            score: (internal as f64 / TARGET_INTERNAL_LINKS as f64 * 100.0).min(100.0),
            reasons,
        }
        .finish()
    }
}
