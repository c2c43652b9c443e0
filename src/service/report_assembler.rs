//! ReportAssembler - runs the extractors and the scoring engine over one HTML
//! snapshot and packages the result as an immutable [`Report`].
//!
//! Pure: no network, no clock, no randomness. Identical input always yields an
//! identical report.

use serde::Serialize;

use crate::domain::models::{ImageStats, Report};
use crate::extractor::document::{DocumentModel, HtmlDocument};
use crate::extractor::headings::{FaqItem, HeadingAnalysis, MAX_SUGGESTED_FAQS};
use crate::extractor::page_extractor::{PageExtractor, PageSignals};
use crate::extractor::sanitization::SanitizationVerdict;
use crate::service::scoring::{
    looks_like_guide, ScoringEngine, DESCRIPTION_LEN, TARGET_INTERNAL_LINKS, TARGET_WORDS, TITLE_LEN,
};

pub const BODY_PREVIEW_CHARS: usize = 4000;

pub const SANITIZED_NOTE: &str = "This HTML looks sanitized (reader mode or copied text). \
     Head tags, structured data and media were probably stripped, so technical and \
     structured-data scores are likely understated. Paste the full page source for an accurate audit.";

const GENERAL_NOTES: [&str; 3] = [
    "Scores are heuristics based on on-page signals only; they do not predict rankings or answer-engine citations.",
    "Suggested FAQs are drafted from your headings. Replace the placeholder answers with concise, factual responses before publishing.",
    "Only mark up questions and answers that are visible on the page; structured data must match on-page content.",
];

// ====== FAQ JSON-LD ======

#[derive(Serialize)]
struct FaqPageLd<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "mainEntity")]
    main_entity: Vec<QuestionLd<'a>>,
}

#[derive(Serialize)]
struct QuestionLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    name: &'a str,
    #[serde(rename = "acceptedAnswer")]
    accepted_answer: AnswerLd<'a>,
}

#[derive(Serialize)]
struct AnswerLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    text: &'a str,
}

/// Pretty-printed schema.org FAQPage block for at most eight entries.
pub fn faq_json_ld(faqs: &[FaqItem]) -> String {
    let page = FaqPageLd {
        context: "https://schema.org",
        kind: "FAQPage",
        main_entity: faqs
            .iter()
            .take(MAX_SUGGESTED_FAQS)
            .map(|faq| QuestionLd {
                kind: "Question",
                name: &faq.question,
                accepted_answer: AnswerLd {
                    kind: "Answer",
                    text: &faq.answer,
                },
            })
            .collect(),
    };
    // Only string fields: serialization cannot fail
    serde_json::to_string_pretty(&page).unwrap_or_default()
}

pub struct ReportAssembler;

impl ReportAssembler {
    /// Parse `html` once and build the report. `base_url` is used for link
    /// classification only and may be empty.
    pub fn assemble(html: &str, base_url: &str) -> Report {
        let document = HtmlDocument::parse(html);
        Self::assemble_document(&document, base_url)
    }

    pub fn assemble_document(doc: &impl DocumentModel, base_url: &str) -> Report {
        let signals = PageExtractor::scan(doc, base_url);
        let headings = HeadingAnalysis::classify(&signals.h2s, &signals.h3s);
        let sanitization = SanitizationVerdict::detect(doc, &signals.body_text);
        let scorecard = ScoringEngine::score(&signals, &headings);

        let suggestions = Self::suggestions(&signals, &headings);
        let faq_json_ld = faq_json_ld(&headings.suggested_faqs);
        let notes = Self::notes(sanitization.is_sanitized);

        log::info!(
            "Assembled report for {:?}: score {}, {} words, sanitized: {}",
            base_url,
            scorecard.total,
            signals.word_count,
            sanitization.is_sanitized
        );

        Report {
            url: base_url.to_string(),
            title: signals.title,
            description: signals.description,
            lang: signals.lang,
            has_viewport: signals.has_viewport,
            has_canonical: signals.has_canonical,
            has_og: signals.has_og,
            h1: signals.h1,
            h2s: signals.h2s,
            h3s: signals.h3s,
            word_count: signals.word_count,
            reading_ease: signals.reading_ease,
            jsonld_types: signals.structured_data.types,
            faqs_detected: signals.faq_detected,
            how_to_detected: signals.howto_detected,
            article_detected: signals.article_detected,
            breadcrumb_detected: signals.breadcrumb_detected,
            author_detected: signals.author_detected,
            updated_detected: signals.updated_detected,
            qa_headings: headings.qa_headings,
            images: ImageStats {
                total: signals.images.total,
                with_alt: signals.images.with_alt,
            },
            internal_links: signals.links.internal,
            external_links: signals.links.external,
            subscores: scorecard.subscores,
            subscore_reasons: scorecard.reasons,
            total_score: scorecard.total,
            suggestions,
            suggested_faqs: headings.suggested_faqs,
            faq_json_ld,
            notes,
            body_preview: signals.body_text.chars().take(BODY_PREVIEW_CHARS).collect(),
            is_sanitized: sanitization.is_sanitized,
            sanitized_reasons: sanitization.reasons,
        }
    }

    /// One line per failed check, in fixed priority order.
    pub fn suggestions(signals: &PageSignals, headings: &HeadingAnalysis) -> Vec<String> {
        let title_len = signals.title.as_deref().map_or(0, |t| t.chars().count());
        let desc_len = signals.description.as_deref().map_or(0, |d| d.chars().count());

        let checklist: [(bool, String); 21] = [
            (signals.h1.is_none(), "Add a single, descriptive H1 that states the page's main topic.".into()),
            (
                !(TITLE_LEN.0..=TITLE_LEN.1).contains(&title_len),
                format!("Write a <title> between {} and {} characters.", TITLE_LEN.0, TITLE_LEN.1),
            ),
            (
                !(DESCRIPTION_LEN.0..=DESCRIPTION_LEN.1).contains(&desc_len),
                format!(
                    "Add a meta description of {}-{} characters that answers the main query.",
                    DESCRIPTION_LEN.0, DESCRIPTION_LEN.1
                ),
            ),
            (
                signals.word_count < TARGET_WORDS,
                format!("Expand the content to at least {} words of useful, specific information.", TARGET_WORDS),
            ),
            (
                headings.qa_headings.is_empty(),
                "Phrase some H2/H3 headings as the questions your readers ask.".into(),
            ),
            (
                !signals.faq_detected,
                "Add an FAQ section with FAQPage structured data (a generated block is included below).".into(),
            ),
            (
                !signals.howto_detected && looks_like_guide(&signals.body_text),
                "Mark up step-by-step instructions with HowTo structured data.".into(),
            ),
            (!signals.article_detected, "Add Article (or BlogPosting) structured data.".into()),
            (!signals.breadcrumb_detected, "Add breadcrumb navigation with BreadcrumbList structured data.".into()),
            (
                !signals.author_detected,
                "Show an author byline and add Person or Organization structured data.".into(),
            ),
            (
                signals.reading_ease < 60.0,
                "Shorten sentences and prefer plain words to raise reading ease above 60.".into(),
            ),
            (signals.lang.is_none(), "Declare the page language with <html lang=\"...\">.".into()),
            (!signals.has_viewport, "Add a responsive viewport meta tag.".into()),
            (!signals.has_canonical, "Add a canonical link to the preferred URL.".into()),
            (!signals.has_og, "Add Open Graph tags (og:title, og:description, og:image).".into()),
            (
                !signals.updated_detected,
                "Show a last-updated date, ideally in a <time datetime=\"...\"> element.".into(),
            ),
            (!signals.trust_links.about, "Link to an About page.".into()),
            (!signals.trust_links.contact, "Link to a Contact page.".into()),
            (
                !signals.trust_links.sources,
                "Cite sources or references with descriptive outbound links.".into(),
            ),
            (
                signals.images.with_alt < signals.images.total,
                "Add descriptive alt text to every meaningful image.".into(),
            ),
            (
                signals.links.internal < TARGET_INTERNAL_LINKS,
                format!("Add internal links to related pages (aim for {}+).", TARGET_INTERNAL_LINKS),
            ),
        ];

        checklist
            .into_iter()
            .filter(|(failed, _)| *failed)
            .map(|(_, suggestion)| suggestion)
            .collect()
    }

    pub fn notes(is_sanitized: bool) -> Vec<String> {
        let mut notes = Vec::with_capacity(GENERAL_NOTES.len() + 1);
        if is_sanitized {
            notes.push(SANITIZED_NOTE.to_string());
        }
        notes.extend(GENERAL_NOTES.iter().map(|n| n.to_string()));
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faq_json_ld_matches_schema_shape() {
        let faqs = vec![FaqItem {
            question: "What is AEO?".into(),
            answer: "Answer engine optimization.".into(),
        }];
        let expected = r#"{
  "@context": "https://schema.org",
  "@type": "FAQPage",
  "mainEntity": [
    {
      "@type": "Question",
      "name": "What is AEO?",
      "acceptedAnswer": {
        "@type": "Answer",
        "text": "Answer engine optimization."
      }
    }
  ]
}"#;
        assert_eq!(faq_json_ld(&faqs), expected);
    }

    #[test]
    fn faq_json_ld_caps_entries() {
        let faqs: Vec<FaqItem> = (0..12)
            .map(|i| FaqItem {
                question: format!("Question {i}?"),
                answer: "a".into(),
            })
            .collect();
        let value: serde_json::Value = serde_json::from_str(&faq_json_ld(&faqs)).unwrap();
        assert_eq!(value["mainEntity"].as_array().unwrap().len(), MAX_SUGGESTED_FAQS);
    }

    #[test]
    fn sanitized_note_comes_first() {
        let notes = ReportAssembler::notes(true);
        assert_eq!(notes.len(), 4);
        assert_eq!(notes[0], SANITIZED_NOTE);
        assert_eq!(ReportAssembler::notes(false).len(), 3);
    }

    #[test]
    fn suggestions_follow_failed_checks() {
        let html = r#"<html lang="en"><head><title>Widget buying guide!</title></head>
            <body><h1>Widget</h1><p>Short copy.</p></body></html>"#;
        let report = ReportAssembler::assemble(html, "https://example.com/");
        assert!(!report.suggestions.iter().any(|s| s.contains("H1")));
        assert!(!report.suggestions.iter().any(|s| s.contains("<title>")));
        assert!(!report.suggestions.iter().any(|s| s.contains("lang=")));
        assert!(report.suggestions[0].contains("meta description"));
        assert!(report.suggestions.iter().any(|s| s.contains("internal links")));
    }
}
