//! Block/table compositor: turns a payload into the report's block sequence
//!
//! Page 1 carries the title, the info table and the sign-off. The media table
//! starts on its own page and is only present when there is media.

use log::debug;

use crate::blocks::{
    Block, Cell, Column, FlowItem, KeyValueRow, NumberedListBlock, Table, TableStyle, TextBlock, VAlign,
};
use crate::config::ReportConfig;
use crate::decorator::Logo;
use crate::image_fit::{fit, fit_logo};
use crate::image_registry::ImageRegistry;
use crate::observations;
use crate::payload::{MediaItem, ReportPayload};
use crate::text_layout::{Align, TextStyle};

/// Blocks plus the images they reference
#[derive(Debug)]
pub struct Composition {
    pub blocks: Vec<Block>,
    pub images: ImageRegistry,
    pub logo: Option<Logo>,
}

pub struct Compositor<'a> {
    config: &'a ReportConfig,
}

impl<'a> Compositor<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    pub fn compose(&self, payload: &ReportPayload) -> Composition {
        let mut images = ImageRegistry::new();
        let logo = self.logo(payload, &mut images);

        let mut blocks = vec![Block::Text(TextBlock::new(
            self.config.title.clone(),
            self.config.title_style,
        ))];
        blocks.extend(self.info_rows(payload).into_iter().map(Block::KeyValue));
        blocks.extend(self.sign_off(payload));

        if payload.media.is_empty() {
            debug!("No media, media table omitted");
        } else {
            blocks.push(Block::PageBreak);
            blocks.push(Block::Table(self.media_table(&payload.media, &mut images)));
        }

        Composition { blocks, images, logo }
    }

    fn logo(&self, payload: &ReportPayload, images: &mut ImageRegistry) -> Option<Logo> {
        let bytes = payload.logo_bytes.as_deref()?;
        let footer = &self.config.footer;
        let fitted = fit_logo(bytes, footer.logo_width, footer.logo_max_height)?;
        Some(Logo {
            id: images.register(fitted.resource),
            width: fitted.width,
            height: fitted.height,
        })
    }

    /// Info table rows, in their fixed order
    pub fn info_rows(&self, payload: &ReportPayload) -> Vec<KeyValueRow> {
        let body = self.config.body_style;
        vec![
            KeyValueRow::text("Project:", payload.project_line(), body),
            KeyValueRow::text("Address:", payload.project_address.trim(), body),
            KeyValueRow::text("Client:", payload.client_name.trim(), body),
            KeyValueRow::text("Scope of Work:", payload.scope_of_work.display_text(), body),
            KeyValueRow::text("Date of Visit:", payload.visit_line(), body),
            KeyValueRow::text("Date of Report:", payload.report_date_line(), body),
            KeyValueRow::text("Present:", payload.present_line(), body),
            KeyValueRow::new("Observations:", self.observations_flow(payload)),
            KeyValueRow::text("Remarks:", payload.remarks.trim(), body),
        ]
    }

    fn observations_flow(&self, payload: &ReportPayload) -> Vec<FlowItem> {
        let style = self
            .config
            .body_style
            .with_align(Align::Justify)
            .with_spacing(0.0, 4.0);
        let list = observations::build(
            &payload.observations_template,
            &payload.non_blank_items(),
            &payload.media,
        );

        let mut flow = vec![FlowItem::Paragraph(TextBlock::new(list.lead, style))];
        if !payload.observation_notes.trim().is_empty() {
            flow.push(FlowItem::Paragraph(TextBlock::new(
                payload.observation_notes.trim(),
                style,
            )));
        }
        if !list.entries.is_empty() {
            flow.push(FlowItem::List(NumberedListBlock {
                entries: list.entries,
                style,
            }));
        }
        flow
    }

    fn sign_off(&self, payload: &ReportPayload) -> Vec<Block> {
        let name = payload.prepared_by.trim();
        if name.is_empty() {
            return Vec::new();
        }
        let style = self.config.signature_style;
        let first = TextStyle {
            space_before: style.space_before + self.config.section_gap,
            ..style
        };
        std::iter::once(Block::Text(TextBlock::new(name, first)))
            .chain(
                self.config
                    .sign_off_lines
                    .iter()
                    .map(|line| Block::Text(TextBlock::new(line.clone(), style))),
            )
            .collect()
    }

    /// Media table; registers every decodable photo with `images`.
    pub fn media_table(&self, media: &[MediaItem], images: &mut ImageRegistry) -> Table {
        let config = self.config;
        let body = config.body_style;
        let centered = body.with_align(Align::Center);
        let bold = TextStyle {
            face: crate::fonts::FontFace::Bold,
            ..body
        };
        let (max_width, max_height) = config.photo_box();

        let header = vec![
            Cell::text("Item Number", bold.with_align(Align::Center)),
            Cell::text("Photo", bold),
            Cell::text("Comment/Action", bold),
        ];

        let rows = media
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let photo = item
                    .image_bytes
                    .as_deref()
                    .and_then(|bytes| fit(bytes, max_width, max_height))
                    .map(|fitted| Cell::Image {
                        id: images.register(fitted.resource),
                        width: fitted.width,
                        height: fitted.height,
                    })
                    .unwrap_or_else(|| Cell::text(config.placeholder.clone(), centered));
                vec![
                    Cell::text(format!("Figure {}", index + 1), centered),
                    photo,
                    Cell::text(item.description.trim(), body),
                ]
            })
            .collect();

        Table {
            columns: vec![
                Column { width: config.columns.media_item, align: Align::Center },
                Column { width: config.columns.media_photo, align: Align::Center },
                Column { width: config.columns.media_comment, align: Align::Left },
            ],
            header: Some(header),
            rows,
            style: TableStyle {
                grid: Some((config.grid_color, config.grid_width)),
                header_background: Some(config.header_background),
                padding: config.padding,
                valign: VAlign::Middle,
            },
        }
    }
}
