//! End-to-end tests for the report pipeline.
//!
//! These run whole HTML documents through `aeo_audit::analyze` and check the
//! report-level properties callers rely on.

use aeo_audit::{analyze, Category, Report};
use serde_json::Value;

const RICH_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <title>How to Test Pool Water at Home</title>
  <meta name="description" content="A practical walkthrough of testing pool water chemistry at home, what the readings mean, and how often to test.">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="canonical" href="https://pools.example.com/guides/testing">
  <meta property="og:title" content="How to Test Pool Water at Home">
  <script type="application/ld+json">
  {"@context":"https://schema.org","@graph":[
    {"@type":"Article","headline":"How to Test Pool Water"},
    {"@type":"BreadcrumbList","itemListElement":[]},
    {"@type":"Organization","name":"Pools Co"}
  ]}
  </script>
  <script type="application/ld+json">{"@type":"FAQPage","mainEntity":[]}</script>
  <script type="application/ld+json">{"@type":"HowTo","name":"Testing"}</script>
</head>
<body>
  <header><nav><a href="/">Home</a><a href="/about">About us</a><a href="/contact">Contact</a></nav></header>
  <h1>How to Test Pool Water at Home</h1>
  <p class="byline">By Sam Rivera. Last updated <time datetime="2024-06-01">June 1, 2024</time>.</p>
  <h2>What should the pH be?</h2>
  <h2>Customer Reviews</h2>
  <h3>How often should I test?</h3>
  <img src="kit.jpg" alt="A pool test kit">
  <p>PARAGRAPH</p>
  <a href="/guides/chlorine">Chlorine</a><a href="/guides/ph">pH</a><a href="/guides/alkalinity">Alkalinity</a>
  <a href="/guides/shock">Shock</a><a href="/guides/filters">Filters</a>
  <a href="https://www.cdc.gov/healthy-swimming/">Source: CDC guidance</a>
</body>
</html>"#;

fn rich_page() -> String {
    let paragraph = "Test the water once a week. Dip the strip and wait. Read the color and write it down. "
        .repeat(25);
    RICH_PAGE.replace("PARAGRAPH", &paragraph)
}

fn assert_bounds(report: &Report) {
    for category in Category::ALL {
        let score = report.subscore(category);
        assert!((0.0..=100.0).contains(&score), "{:?} = {}", category, score);
    }
    assert!(report.total_score <= 100);
    assert!(report.suggested_faqs.len() <= 8);
}

#[test]
fn identical_input_gives_identical_report() {
    let html = rich_page();
    let a = analyze(&html, "https://pools.example.com/guides/testing");
    let b = analyze(&html, "https://pools.example.com/guides/testing");
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn rich_page_scores_well() {
    let report = analyze(&rich_page(), "https://pools.example.com/guides/testing");
    assert_bounds(&report);

    assert!(report.faqs_detected && report.how_to_detected && report.article_detected);
    assert!(report.breadcrumb_detected && report.author_detected && report.updated_detected);
    assert_eq!(
        report.jsonld_types,
        vec!["Article", "BreadcrumbList", "Organization", "FAQPage", "HowTo"]
    );
    assert_eq!(report.internal_links, 8);
    assert_eq!(report.external_links, 1);
    assert_eq!(report.images.total, 1);
    assert_eq!(report.images.with_alt, 1);

    assert_eq!(report.subscore(Category::StructuredData), 100.0);
    assert_eq!(report.subscore(Category::TechnicalSEO), 100.0);
    assert_eq!(report.subscore(Category::EATTrust), 100.0);
    assert_eq!(report.subscore(Category::InternalLinks), 100.0);
    assert!(report.reasons(Category::StructuredData).is_empty());

    assert_eq!(
        report.qa_headings,
        vec!["What should the pH be?", "How often should I test?"]
    );
    assert!(!report.is_sanitized);
    assert_eq!(report.notes.len(), 3);
    assert!(report.total_score >= 85, "total {}", report.total_score);
}

#[test]
fn total_is_weighted_sum_of_subscores() {
    for html in [rich_page(), String::new(), "<p>just text</p>".to_string()] {
        let report = analyze(&html, "https://example.com/");
        let weighted: f64 = Category::ALL
            .iter()
            .map(|c| c.weight() * report.subscore(*c))
            .sum();
        assert_eq!(report.total_score, weighted.round() as u8);
        assert_eq!(report.subscores.len(), 7);
        assert_eq!(report.subscore_reasons.len(), 7);
    }
}

#[test]
fn thin_widget_page_matches_hand_computed_scores() {
    let filler = "word ".repeat(96);
    let html = format!(
        r#"<html><head><title>Widget buying guide!</title></head><body>
        <h1>Widget</h1>
        <p>{}</p>
        <a href="/docs">Docs</a> <a href="/pricing">Pricing</a> <a href="/blog">Blog</a>
        </body></html>"#,
        filler
    );
    let report = analyze(&html, "https://example.com/");

    assert_eq!(report.word_count, 100);
    assert_eq!(report.internal_links, 3);
    // 25 (H1) + 25 (title) + 0 (description) + 100/400*20 + 0 (no question heading)
    assert_eq!(report.subscore(Category::ContentClarity), 55.0);
    assert_eq!(report.subscore(Category::StructuredData), 0.0);
    // no guide-like copy, so no HowTo reason
    assert_eq!(report.reasons(Category::StructuredData).len(), 4);
    assert_eq!(report.subscore(Category::MediaAlt), 100.0);
    assert!(report.reasons(Category::MediaAlt).is_empty());
    assert_eq!(report.subscore(Category::InternalLinks), 37.5);
    assert_eq!(report.reasons(Category::InternalLinks).len(), 1);
}

#[test]
fn reader_mode_text_is_flagged_sanitized() {
    let text = "This article was copied out of a reader view, so only the prose survived. ".repeat(5);
    let report = analyze(&format!("<body>{}</body>", text), "");
    assert!(report.is_sanitized);
    assert!(report.sanitized_reasons.len() >= 4);
    assert_eq!(report.notes.len(), 4);
    assert!(report.notes[0].contains("sanitized"));
}

#[test]
fn heading_rewrites_and_marketing_filter() {
    let html = r#"<body>
        <h2>Get 20% Off Your First Order</h2>
        <h2>Customer Reviews</h2>
        <h3>Customer Reviews?</h3>
        <h3>Why choose us</h3>
    </body>"#;
    let report = analyze(html, "");

    let questions: Vec<&str> = report
        .suggested_faqs
        .iter()
        .map(|f| f.question.as_str())
        .collect();
    assert_eq!(
        questions,
        vec!["How can I 20% Off Your First Order?", "Why choose us?"]
    );
    assert_eq!(report.qa_headings, vec!["Why choose us"]);
    assert!(!report.faq_json_ld.contains("Reviews"));
}

#[test]
fn faq_suggestions_are_capped_at_eight() {
    let headings: String = (1..=12)
        .map(|i| format!("<h2>Topic number {}</h2>", i))
        .collect();
    let report = analyze(&format!("<body>{}</body>", headings), "");
    assert_eq!(report.suggested_faqs.len(), 8);

    let ld: Value = serde_json::from_str(&report.faq_json_ld).unwrap();
    assert_eq!(ld["@type"], "FAQPage");
    assert_eq!(ld["mainEntity"].as_array().unwrap().len(), 8);
    assert_eq!(ld["mainEntity"][0]["name"], "What should I know about Topic number 1?");
}

#[test]
fn empty_and_garbage_input_degrade_gracefully() {
    for html in ["", "<<<>>>", "<html><body><div><p>unclosed", "\u{0}\u{1}binary"] {
        let report = analyze(html, "not a url");
        assert_bounds(&report);
        assert_eq!(report.internal_links + report.external_links, 0);
        assert!(report.h1.is_none());
    }
}

#[test]
fn report_serializes_with_contract_field_names() {
    let report = analyze(&rich_page(), "https://pools.example.com/");
    let value = serde_json::to_value(&report).unwrap();
    for key in [
        "url",
        "title",
        "description",
        "lang",
        "hasViewport",
        "hasCanonical",
        "hasOG",
        "h1",
        "h2s",
        "h3s",
        "wordCount",
        "readingEase",
        "jsonldTypes",
        "faqsDetected",
        "howToDetected",
        "articleDetected",
        "breadcrumbDetected",
        "authorDetected",
        "updatedDetected",
        "qaHeadings",
        "images",
        "internalLinks",
        "externalLinks",
        "subscores",
        "subscoreReasons",
        "totalScore",
        "suggestions",
        "suggestedFAQs",
        "faqJsonLD",
        "notes",
        "bodyPreview",
        "isSanitized",
        "sanitizedReasons",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert!(value["images"].get("withAlt").is_some());
    assert!(value["subscores"].get("EATTrust").is_some());
}

#[test]
fn body_preview_is_truncated() {
    let long = "abcdefghij ".repeat(1000);
    let report = analyze(&format!("<body><p>{}</p></body>", long), "");
    assert_eq!(report.body_preview.chars().count(), 4000);
}

#[test]
fn inline_markup_keeps_words_whole() {
    let report = analyze(
        "<body><p>un<b>believ</b>able price $<span>19</span>.99</p></body>",
        "",
    );
    assert_eq!(report.word_count, 3);
    assert_eq!(report.body_preview, "unbelievable price $19.99");
}
