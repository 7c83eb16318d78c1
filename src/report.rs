//! Report engine: payload in, PDF bytes out

use log::info;

use crate::compositor::Compositor;
use crate::config::ReportConfig;
use crate::decorator::PageDecorator;
use crate::emitter;
use crate::error::ReportResult;
use crate::page::Document;
use crate::paginator::Paginator;
use crate::payload::ReportPayload;

/// Holds only immutable configuration; each call builds its own layout state.
#[derive(Debug, Clone, Default)]
pub struct ReportEngine {
    config: ReportConfig,
}

impl ReportEngine {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Compose, paginate and decorate, without serializing.
    pub fn layout(&self, payload: &ReportPayload) -> ReportResult<Document> {
        self.config.validate()?;

        let composition = Compositor::new(&self.config).compose(payload);
        let mut pages = Paginator::new(&self.config).paginate(&composition.blocks);
        PageDecorator::new(&self.config, composition.logo, &payload.footer_address).decorate_all(&mut pages);

        Ok(Document {
            title: payload.document_title(),
            pages,
            images: composition.images,
        })
    }

    /// Render `payload` to PDF bytes.
    pub fn generate(&self, payload: &ReportPayload) -> ReportResult<Vec<u8>> {
        let document = self.layout(payload)?;
        info!(
            "Laid out \"{}\": {} page(s), {} image(s)",
            document.title,
            document.page_count(),
            document.images.len()
        );
        emitter::emit(&document, &self.config.geometry)
    }
}
