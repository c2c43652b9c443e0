pub mod faq_generator;
pub mod fetcher;
pub mod http;
pub mod report_assembler;
pub mod scoring;

pub use faq_generator::{FaqGenerator, FaqRequest, HttpFaqGenerator};
pub use fetcher::PageFetcher;
pub use report_assembler::ReportAssembler;
pub use scoring::ScoringEngine;
