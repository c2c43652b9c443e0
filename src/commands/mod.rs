pub mod analysis;

pub use analysis::AnalysisSession;
