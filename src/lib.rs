//! Field report engine
//!
//! Turns a field inspection payload into a paginated PDF: an info table with a
//! numbered observation list, a media table whose header repeats on every page
//! it spans, and a logo/footer overlay drawn identically on each page.
//!
//! Pipeline: compositor → paginator → decorator → emitter.

pub mod blocks;
mod canvas;
pub mod compositor;
pub mod config;
pub mod decorator;
pub mod emitter;
mod encoding;
pub mod error;
pub mod fonts;
pub mod image_fit;
pub mod image_registry;
pub mod observations;
pub mod page;
pub mod paginator;
pub mod payload;
pub mod report;
pub mod text_layout;
pub mod types;

pub use config::ReportConfig;
pub use error::{ReportError, ReportResult};
pub use page::{Document, Page};
pub use payload::{MediaItem, ReportPayload, ScopeOfWork};
pub use report::ReportEngine;
pub use types::PageGeometry;

/// Render `payload` with the default configuration.
pub fn generate_report(payload: &ReportPayload) -> ReportResult<Vec<u8>> {
    ReportEngine::default().generate(payload)
}
