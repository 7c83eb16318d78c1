//! PDF emitter: serializes a paginated, decorated document in one pass

use log::{debug, info};
use pdf_writer::{Filter, Pdf, Rect as PdfRect, Ref, TextStr};

use crate::canvas::PdfCanvas;
use crate::error::{ReportError, ReportResult};
use crate::fonts::FontRegistry;
use crate::image_registry::{ImageId, ImageRegistry};
use crate::page::{Document, Page};
use crate::types::PageGeometry;

/// Object id allocator; 1 and 2 are the catalog and the page tree.
struct RefAllocator {
    next: i32,
}

impl RefAllocator {
    fn new() -> Self {
        Self { next: 3 }
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next);
        self.next += 1;
        id
    }
}

/// Serialize `document` to PDF bytes.
///
/// Every failure is fatal: nothing is returned unless the whole document was written.
pub fn emit(document: &Document, geometry: &PageGeometry) -> ReportResult<Vec<u8>> {
    geometry.validate()?;
    if document.pages.is_empty() {
        return Err(ReportError::Serialization("document has no pages".into()));
    }
    for page in &document.pages {
        check_finite(page)?;
    }

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let mut refs = RefAllocator::new();
    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);

    let fonts = FontRegistry::register_all(&mut pdf, || refs.alloc());
    let image_refs = document.images.write_xobjects(&mut pdf, || refs.alloc());
    debug!("Wrote {} image XObject(s)", image_refs.len());

    let media_box = PdfRect::new(0.0, 0.0, geometry.size.width as f32, geometry.size.height as f32);
    let mut page_ids = Vec::with_capacity(document.pages.len());

    for page in &document.pages {
        let page_id = refs.alloc();
        let content_id = refs.alloc();
        page_ids.push(page_id);

        let mut canvas = PdfCanvas::new();
        for op in &page.ops {
            canvas.draw(op);
        }
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&canvas.finish(), 6);
        pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

        let mut used: Vec<ImageId> = page.images().map(|(id, _)| id).collect();
        used.sort();
        used.dedup();

        {
            let mut page_writer = pdf.page(page_id);
            page_writer.media_box(media_box);
            page_writer.parent(page_tree_id);
            page_writer.contents(content_id);
            let mut resources = page_writer.resources();
            fonts.write_resources(&mut resources);
            ImageRegistry::write_resources(&used, &image_refs, &mut resources)?;
        }

        debug!(
            "Emitted page {}: {} ops, {} image(s), {} content bytes",
            page.number,
            page.ops.len(),
            used.len(),
            compressed.len()
        );
    }

    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    pdf.document_info(refs.alloc()).title(TextStr(&document.title));

    let bytes = pdf.finish();
    info!(
        "PDF generated: {} page(s), {} bytes ({:.2} MB)",
        page_ids.len(),
        bytes.len(),
        bytes.len() as f64 / 1_048_576.0
    );
    Ok(bytes)
}

fn check_finite(page: &Page) -> ReportResult<()> {
    match page.ops.iter().find(|op| !op.is_finite()) {
        Some(op) => Err(ReportError::Serialization(format!(
            "non-finite coordinates on page {}: {:?}",
            page.number, op
        ))),
        None => Ok(()),
    }
}
