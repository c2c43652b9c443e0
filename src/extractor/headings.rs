//! Heading classification: question detection, marketing/navigation filtering
//! and statement-to-question rewriting for FAQ suggestions.
//!
//! Rewrite rules are order sensitive; the first matching rule wins.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::document::collapse_whitespace;

/// Maximum number of FAQ suggestions derived from headings.
pub const MAX_SUGGESTED_FAQS: usize = 8;

pub const PLACEHOLDER_ANSWER: &str =
    "Add a concise, factual answer (2-3 sentences) that directly resolves this question.";

/// Navigation, commerce and boilerplate headings that never make good FAQ entries.
const MARKETING_PATTERNS: [&str; 28] = [
    r"\breviews?\b",
    r"\bratings?\b",
    r"\btestimonials?\b",
    r"\bcart\b",
    r"\bbasket\b",
    r"\bcheckout\b",
    r"\blog\s?in\b",
    r"\bsign\s?(in|up)\b",
    r"\bregister\b",
    r"\bmy account\b",
    r"\bwish\s?list\b",
    r"\bnewsletter\b",
    r"\bsubscribe\b",
    r"\bview all\b",
    r"\bshop (now|all)\b",
    r"\bbuy now\b",
    r"\badd to (cart|bag)\b",
    r"\brelated (products|posts|articles)\b",
    r"\byou may also like\b",
    r"\brecently viewed\b",
    r"\bbest\s?sellers?\b",
    r"\bnew arrivals\b",
    r"\bfollow us\b",
    r"\bshare (this|on)\b",
    r"\bcookies?\b",
    r"^(main )?menu$",
    r"^(search|navigation|footer|categories)$",
    r"\bcopyright\b|©",
];

fn question_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(what|why|how|when|where|who|which|can|do|does|is|are|should|could|will|won['’]t|can['’]t|may)\b",
        )
        .unwrap()
    })
}

fn marketing_patterns() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        MARKETING_PATTERNS
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
            .collect()
    })
}

fn get_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^get\s+(.+)$").unwrap())
}

fn offer_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)offer").unwrap())
}

fn free_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bfree\b").unwrap())
}

fn product_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(product|bundle|kit|plan|subscription|tester|analy[sz]er|manifold|set)s?\b",
        )
        .unwrap()
    })
}

fn collection_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*\bcollection\b\s*").unwrap())
}

pub fn is_question_like(text: &str) -> bool {
    let text = text.trim();
    text.ends_with('?') || question_start().is_match(text)
}

pub fn is_marketing_heading(heading: &str) -> bool {
    let heading = heading.trim();
    if heading.chars().count() < 5 {
        return true;
    }
    marketing_patterns().iter().any(|re| re.is_match(heading))
}

pub fn heading_to_question(raw: &str) -> String {
    let text = collapse_whitespace(raw);

    if is_question_like(&text) {
        return if text.ends_with('?') {
            text
        } else {
            format!("{}?", text)
        };
    }

    let subject = text.trim_end_matches(['.', ':', '!', ';', ',']).trim();

    if let Some(caps) = get_rule().captures(subject) {
        return format!("How can I {}?", caps[1].trim());
    }
    if offer_rule().is_match(subject) {
        return format!("What offer is available for {}?", subject);
    }
    if free_rule().is_match(subject) {
        return format!("What free gifts or bonuses are included with {}?", subject);
    }
    if product_rule().is_match(subject) {
        return format!("What should I know about the {}?", subject);
    }
    if collection_rule().is_match(subject) {
        let name = collection_rule().replace_all(subject, " ");
        return format!("What is included in the {} collection?", name.trim());
    }
    format!("What should I know about {}?", subject)
}

/// A question/answer pair, as suggested from headings or returned by the FAQ service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default)]
pub struct HeadingAnalysis {
    /// Non-marketing h2/h3 headings, de-duplicated, first-seen order.
    pub candidates: Vec<String>,
    /// Candidates that already read as questions.
    pub qa_headings: Vec<String>,
    pub suggested_faqs: Vec<FaqItem>,
}

impl HeadingAnalysis {
    pub fn classify(h2s: &[String], h3s: &[String]) -> Self {
        let mut candidates: Vec<String> = Vec::new();
        for heading in h2s.iter().chain(h3s) {
            let heading = collapse_whitespace(heading);
            if heading.is_empty() || is_marketing_heading(&heading) {
                continue;
            }
            let key = heading.to_lowercase();
            if !candidates.iter().any(|c| c.to_lowercase() == key) {
                candidates.push(heading);
            }
        }

        let qa_headings = candidates
            .iter()
            .filter(|h| is_question_like(h))
            .cloned()
            .collect();

        let suggested_faqs = candidates
            .iter()
            .take(MAX_SUGGESTED_FAQS)
            .map(|h| FaqItem {
                question: heading_to_question(h),
                answer: PLACEHOLDER_ANSWER.to_string(),
            })
            .collect();

        Self {
            candidates,
            qa_headings,
            suggested_faqs,
        }
    }
}
