//! Page decorations
//!
//! Runs after pagination: every page gets the same corner logo and footer
//! (disclaimer, address line, page number). Placement depends only on the
//! configuration and the page number, never on the flowing content.

use log::warn;

use crate::config::ReportConfig;
use crate::fonts::FontFace;
use crate::image_registry::ImageId;
use crate::page::{DrawOp, Page};
use crate::text_layout::{LineBreaker, TextLine, TextStyle};
use crate::types::{Color, Rect};

/// A logo registered with the document's image registry, at display size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Logo {
    pub id: ImageId,
    pub width: f64,
    pub height: f64,
}

/// Draws the fixed overlay onto pages
pub struct PageDecorator<'a> {
    config: &'a ReportConfig,
    logo: Option<Logo>,
    disclaimer: Vec<TextLine>,
    address: Vec<TextLine>,
}

impl<'a> PageDecorator<'a> {
    /// `address` falls back to the configured default when blank.
    pub fn new(config: &'a ReportConfig, logo: Option<Logo>, address: &str) -> Self {
        let footer = &config.footer;
        let address = if address.trim().is_empty() {
            footer.default_address.as_str()
        } else {
            address.trim()
        };
        let breaker = LineBreaker::new(config.geometry.content_width());
        let decorator = Self {
            config,
            logo,
            disclaimer: breaker.break_text(&footer.disclaimer, FontFace::Regular, footer.disclaimer_size),
            address: breaker.break_text(address, FontFace::Bold, footer.address_size),
        };
        let top = decorator.footer_top();
        if top > config.geometry.margins.bottom {
            warn!(
                "Footer reaches {:.1}pt above the page edge, past the {:.1}pt bottom margin",
                top, config.geometry.margins.bottom
            );
        }
        decorator
    }

    pub fn decorate_all(&self, pages: &mut [Page]) {
        for page in pages.iter_mut() {
            self.decorate(page);
        }
    }

    pub fn decorate(&self, page: &mut Page) {
        if let Some(logo) = self.logo {
            page.ops.push(self.logo_op(logo));
        }
        page.ops.extend(self.footer_ops(page.number));
    }

    /// Logo at a fixed padding from the top-right corner
    fn logo_op(&self, logo: Logo) -> DrawOp {
        let size = self.config.geometry.size;
        let padding = self.config.footer.logo_padding;
        DrawOp::Image {
            id: logo.id,
            rect: Rect::new(
                size.width - padding - logo.width,
                size.height - padding - logo.height,
                logo.width,
                logo.height,
            ),
        }
    }

    /// Baseline of the topmost address line; wrapped lines stack upward
    /// so the last one sits on the footer baseline.
    fn address_top(&self) -> f64 {
        let footer = &self.config.footer;
        footer.baseline + self.address.len().saturating_sub(1) as f64 * footer.address_leading
    }

    /// Height above the bottom edge reached by the disclaimer block
    pub fn footer_top(&self) -> f64 {
        let footer = &self.config.footer;
        self.address_top() + footer.disclaimer_gap + self.disclaimer.len() as f64 * footer.disclaimer_leading
    }

    fn footer_ops(&self, page_number: u32) -> Vec<DrawOp> {
        let footer = &self.config.footer;
        let geometry = &self.config.geometry;
        let left = geometry.margins.left;
        let width = geometry.content_width();
        let mut ops = Vec::new();

        let disclaimer_style =
            TextStyle::new(FontFace::Regular, footer.disclaimer_size, footer.disclaimer_leading).with_color(footer.color);
        let block_bottom = self.address_top() + footer.disclaimer_gap;
        let line_count = self.disclaimer.len();
        for (i, line) in self.disclaimer.iter().enumerate() {
            let line_bottom = block_bottom + (line_count - 1 - i) as f64 * disclaimer_style.leading;
            ops.push(centered_text(
                line,
                left,
                width,
                line_bottom + (disclaimer_style.leading - disclaimer_style.baseline_offset()),
                &disclaimer_style,
            ));
        }

        let address_style = TextStyle::new(FontFace::Bold, footer.address_size, footer.address_leading).with_color(footer.color);
        let address_top = self.address_top();
        for (i, line) in self.address.iter().enumerate() {
            let y = address_top - i as f64 * address_style.leading;
            ops.push(centered_text(line, left, width, y, &address_style));
        }

        let number = page_number.to_string();
        let number_width = FontFace::Regular.text_width(&number, footer.page_number_size);
        ops.push(DrawOp::Text {
            x: left + width - number_width,
            y: footer.baseline,
            face: FontFace::Regular,
            size: footer.page_number_size,
            color: Color::black(),
            text: number,
            word_spacing: 0.0,
        });
        ops
    }
}

fn centered_text(line: &TextLine, left: f64, width: f64, baseline: f64, style: &TextStyle) -> DrawOp {
    DrawOp::Text {
        x: left + ((width - line.width) / 2.0).max(0.0),
        y: baseline,
        face: style.face,
        size: style.size,
        color: style.color,
        text: line.text.clone(),
        word_spacing: 0.0,
    }
}
