// src/lib.rs

pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod lifecycle;
pub mod service;

pub use domain::models::{AnalysisState, Category, Report};
pub use service::report_assembler::ReportAssembler;

/// Build a report from one HTML snapshot. See [`ReportAssembler::assemble`].
pub fn analyze(html: &str, base_url: &str) -> Report {
    ReportAssembler::assemble(html, base_url)
}
