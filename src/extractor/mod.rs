//! Signal extraction from a parsed page.

pub mod document;
pub mod headings;
pub mod page_extractor;
pub mod sanitization;
pub mod structured_data;
pub mod text;

pub use document::{DocumentModel, ElementSnapshot, HtmlDocument};
pub use page_extractor::{PageExtractor, PageSignals};
