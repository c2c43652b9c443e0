use tokio_util::sync::CancellationToken;

use crate::domain::models::{AnalysisState, FaqItem, Report};
use crate::error::{AppError, CommandError};
use crate::service::faq_generator::{FaqGenerator, FaqRequest};
use crate::service::fetcher::{normalize_target, PageFetcher};
use crate::service::report_assembler::ReportAssembler;

/// Holds the state a front end renders. Every analyze call starts by dropping
/// the previous report; a failed attempt leaves `Failed`, never a partial report.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: AnalysisState,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn report(&self) -> Option<&Report> {
        self.state.report()
    }

    /// Analyze HTML the caller already has (pasted source or a saved file).
    pub fn analyze_html(&mut self, html: &str, base_url: &str) -> &AnalysisState {
        self.state = AnalysisState::Loading;
        let report = ReportAssembler::assemble(html, base_url);
        self.state = AnalysisState::Ready(Box::new(report));
        &self.state
    }

    /// Fetch `url` and analyze it. Links are classified against the normalized
    /// URL, so `example.com/page` behaves like `https://example.com/page`.
    pub async fn analyze_url(
        &mut self,
        fetcher: &PageFetcher,
        url: &str,
        cancel: &CancellationToken,
    ) -> &AnalysisState {
        self.state = AnalysisState::Loading;
        log::info!("Starting analysis: {}", url);

        let target = match normalize_target(url) {
            Ok(target) => target,
            Err(e) => {
                log::error!("Analysis of {} failed: {}", url, e);
                self.state = AnalysisState::Failed(CommandError::from(e));
                return &self.state;
            }
        };

        self.state = match fetcher.fetch(target.as_str(), cancel).await {
            Ok(html) => AnalysisState::Ready(Box::new(ReportAssembler::assemble(&html, target.as_str()))),
            Err(e) => {
                log::error!("Analysis of {} failed: {}", url, e);
                AnalysisState::Failed(CommandError::from(e))
            }
        };
        &self.state
    }

    /// Ask the FAQ service for answers based on the current report. The stored
    /// report is left untouched whatever the outcome.
    pub async fn generate_faqs(
        &self,
        generator: Option<&dyn FaqGenerator>,
    ) -> Result<Vec<FaqItem>, CommandError> {
        let generator = generator.ok_or(AppError::FaqServiceNotConfigured)?;
        let report = self.report().ok_or(AppError::NoReport)?;

        log::info!("Generating FAQs with {}", generator.name());
        let request = FaqRequest::from_report(report);
        generator.generate(&request).await.map_err(|e| {
            log::error!("FAQ generation failed: {}", e);
            CommandError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedGenerator(Option<Vec<FaqItem>>);

    #[async_trait]
    impl FaqGenerator for CannedGenerator {
        async fn generate(&self, _request: &FaqRequest) -> crate::error::Result<Vec<FaqItem>> {
            self.0
                .clone()
                .ok_or_else(|| AppError::malformed("canned", "response has no `faqs` array"))
        }

        fn name(&self) -> &'static str {
            "canned"
        }
    }

    #[test]
    fn analyze_html_ends_ready() {
        let mut session = AnalysisSession::new();
        assert!(matches!(session.state(), AnalysisState::Idle));
        session.analyze_html("<h1>Hi</h1>", "https://example.com/");
        assert_eq!(session.report().and_then(|r| r.h1.as_deref()), Some("Hi"));
    }

    #[tokio::test]
    async fn unsupported_url_fails_without_fetching() {
        let fetcher = PageFetcher::new(&crate::config::FetchConfig::default()).unwrap();
        let mut session = AnalysisSession::new();
        session.analyze_html("<h1>Old</h1>", "");

        session
            .analyze_url(&fetcher, "ftp://example.com/file", &CancellationToken::new())
            .await;
        assert!(session.report().is_none());
        assert!(session.state().error().unwrap().to_string().contains("Invalid URL"));
    }

    #[tokio::test]
    async fn faq_generation_requires_endpoint_and_report() {
        let session = AnalysisSession::new();
        let err = session.generate_faqs(None).await.unwrap_err();
        assert!(err.to_string().contains("not configured"));

        let generator = CannedGenerator(Some(vec![]));
        let err = session.generate_faqs(Some(&generator)).await.unwrap_err();
        assert!(err.to_string().contains("No report"));
    }

    #[tokio::test]
    async fn failed_generation_keeps_report() {
        let mut session = AnalysisSession::new();
        session.analyze_html("<h1>Hi</h1><h2>What is AEO?</h2>", "");
        let before = session.report().cloned();

        let generator = CannedGenerator(None);
        assert!(session.generate_faqs(Some(&generator)).await.is_err());
        assert_eq!(session.report().cloned(), before);

        let faq = FaqItem {
            question: "What is AEO?".into(),
            answer: "Optimizing for answer engines.".into(),
        };
        let generator = CannedGenerator(Some(vec![faq.clone()]));
        assert_eq!(session.generate_faqs(Some(&generator)).await.unwrap(), vec![faq]);
    }
}
