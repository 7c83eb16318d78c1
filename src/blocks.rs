//! Logical blocks and their measurement
//!
//! A block is pure data until the paginator asks it to lay itself out at the
//! available width. Layout yields slabs (unsplittable strips: a text line, a
//! key/value line, a table row) plus a placement policy telling the paginator
//! where it may split.

use crate::config::{CellPadding, ReportConfig};
use crate::fonts::{FontFace, SQUARE_BULLET};
use crate::image_registry::ImageId;
use crate::page::{DrawOp, Slab};
use crate::text_layout::{layout_paragraph, Align, TextStyle};
use crate::types::{Color, Rect};

/// A paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub style: TextStyle,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self { text: text.into(), style }
    }
}

/// Already-numbered entries, one paragraph each
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedListBlock {
    pub entries: Vec<String>,
    pub style: TextStyle,
}

/// Content of a flow region (a value cell, a table cell)
#[derive(Debug, Clone, PartialEq)]
pub enum FlowItem {
    Paragraph(TextBlock),
    List(NumberedListBlock),
}

/// Label with a bullet on the left, flow region on the right
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueRow {
    pub label: String,
    pub value: Vec<FlowItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub width: f64,
    /// Horizontal placement of images in this column
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Flow(Vec<FlowItem>),
    Image { id: ImageId, width: f64, height: f64 },
}

impl Cell {
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        Cell::Flow(vec![FlowItem::Paragraph(TextBlock::new(text, style))])
    }

    fn layout(&self, width: f64, align: Align) -> Slab {
        match self {
            Cell::Flow(items) => Slab::stack(layout_flow(items, width)),
            Cell::Image { id, width: w, height: h } => {
                let x = match align {
                    Align::Center => ((width - w) / 2.0).max(0.0),
                    Align::Right => (width - w).max(0.0),
                    Align::Left | Align::Justify => 0.0,
                };
                Slab::new(
                    *h,
                    vec![DrawOp::Image {
                        id: *id,
                        rect: Rect::new(x, -h, *w, *h),
                    }],
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    /// Line color and width of the cell grid
    pub grid: Option<(Color, f64)>,
    pub header_background: Option<Color>,
    pub padding: CellPadding,
    pub valign: VAlign,
}

/// Table with an optional header row repeated on every page it spans
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub header: Option<Vec<Cell>>,
    pub rows: Vec<Vec<Cell>>,
    pub style: TableStyle,
}

impl Table {
    pub fn width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    fn layout_row(&self, cells: &[Cell], background: Option<Color>) -> Slab {
        let pad = self.style.padding;
        let contents: Vec<Slab> = self
            .columns
            .iter()
            .zip(cells)
            .map(|(column, cell)| cell.layout(column.width - pad.horizontal(), column.align))
            .collect();
        let inner = contents.iter().map(|s| s.height).fold(0.0, f64::max);
        let height = inner + pad.vertical();

        let mut ops = Vec::new();
        if let Some(fill) = background {
            ops.push(DrawOp::Rect {
                rect: Rect::new(0.0, -height, self.width(), height),
                fill: Some(fill),
                stroke: None,
            });
        }

        let mut x = 0.0;
        for (column, content) in self.columns.iter().zip(contents) {
            let dy = match self.style.valign {
                VAlign::Top => pad.top,
                VAlign::Middle => pad.top + (inner - content.height) / 2.0,
            };
            ops.extend(content.placed_at(x + pad.left, -dy));
            x += column.width;
        }

        if let Some(stroke) = self.style.grid {
            let mut x = 0.0;
            for column in &self.columns {
                ops.push(DrawOp::Rect {
                    rect: Rect::new(x, -height, column.width, height),
                    fill: None,
                    stroke: Some(stroke),
                });
                x += column.width;
            }
        }

        Slab::new(height, ops)
    }

    fn layout(&self, available_width: f64) -> LaidOut {
        let offset = ((available_width - self.width()) / 2.0).max(0.0);
        let header = self
            .header
            .as_ref()
            .map(|cells| self.layout_row(cells, self.style.header_background).shifted(offset));
        let slabs = self
            .rows
            .iter()
            .map(|cells| self.layout_row(cells, None).shifted(offset))
            .collect();
        LaidOut {
            slabs,
            placement: Placement::Rows { header },
            space_before: 0.0,
            space_after: 0.0,
        }
    }
}

/// Unit of the report's logical structure
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    KeyValue(KeyValueRow),
    NumberedList(NumberedListBlock),
    Table(Table),
    /// Ends the current page
    PageBreak,
}

/// Where the paginator may split a laid-out block
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// Between any two slabs
    Flow,
    /// Nowhere, unless the block is taller than a fresh page
    Keep,
    /// Between rows; the header is reprinted on every page the rows reach
    Rows { header: Option<Slab> },
}

/// A block measured at a given width
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOut {
    pub slabs: Vec<Slab>,
    pub placement: Placement,
    /// Dropped when the block starts a page
    pub space_before: f64,
    pub space_after: f64,
}

impl LaidOut {
    fn empty() -> Self {
        Self {
            slabs: Vec::new(),
            placement: Placement::Flow,
            space_before: 0.0,
            space_after: 0.0,
        }
    }
}

impl Block {
    /// Measure and lay out the block at `width`.
    pub fn layout(&self, width: f64, config: &ReportConfig) -> LaidOut {
        match self {
            Block::Text(paragraph) => LaidOut {
                slabs: layout_paragraph(&paragraph.text, &paragraph.style, width),
                placement: Placement::Flow,
                space_before: paragraph.style.space_before,
                space_after: paragraph.style.space_after,
            },
            Block::NumberedList(list) => LaidOut {
                slabs: layout_flow(&[FlowItem::List(list.clone())], width),
                placement: Placement::Flow,
                space_before: list.style.space_before,
                space_after: list.style.space_after,
            },
            Block::KeyValue(row) => row.layout(width, config),
            Block::Table(table) => table.layout(width),
            Block::PageBreak => LaidOut::empty(),
        }
    }
}

impl KeyValueRow {
    pub fn new(label: impl Into<String>, value: Vec<FlowItem>) -> Self {
        Self { label: label.into(), value }
    }

    /// Row with a single paragraph as its value
    pub fn text(label: impl Into<String>, value: impl Into<String>, style: TextStyle) -> Self {
        Self::new(label, vec![FlowItem::Paragraph(TextBlock::new(value, style))])
    }

    /// Bullet + bold label lines, wrapped to the label column
    fn label_lines(&self, config: &ReportConfig) -> Vec<Slab> {
        let style = TextStyle {
            face: FontFace::Bold,
            space_before: 0.0,
            space_after: 0.0,
            ..config.body_style
        };
        let bullet_width = FontFace::Symbol.text_width(SQUARE_BULLET, config.bullet_size);
        let indent = bullet_width + FontFace::Bold.text_width("  ", style.size);
        let width = config.columns.info_label - config.padding.horizontal() - indent;

        let mut lines: Vec<Slab> = layout_paragraph(&self.label, &style, width)
            .into_iter()
            .map(|line| line.shifted(indent))
            .collect();
        if lines.is_empty() {
            lines.push(Slab::spacer(style.leading));
        }
        lines[0].ops.insert(
            0,
            DrawOp::Text {
                x: 0.0,
                y: -style.baseline_offset(),
                face: FontFace::Symbol,
                size: config.bullet_size,
                color: style.color,
                text: SQUARE_BULLET.to_string(),
                word_spacing: 0.0,
            },
        );
        lines
    }

    /// One slab per line pair; the label travels with the first lines.
    fn layout(&self, available_width: f64, config: &ReportConfig) -> LaidOut {
        let columns = &config.columns;
        let pad = config.padding;
        let offset = ((available_width - columns.info_total()) / 2.0).max(0.0);
        let label_x = offset + pad.left;
        let value_x = offset + columns.info_label + pad.left;
        let value_width = columns.info_value - pad.horizontal();

        let mut labels = self.label_lines(config).into_iter();
        let mut values = layout_flow(&self.value, value_width).into_iter();
        let mut slabs = Vec::new();
        loop {
            let (label, value) = match (labels.next(), values.next()) {
                (None, None) => break,
                pair => pair,
            };
            let height = label
                .as_ref()
                .map_or(0.0, |s| s.height)
                .max(value.as_ref().map_or(0.0, |s| s.height));
            let mut ops = Vec::new();
            if let Some(label) = label {
                ops.extend(label.placed_at(label_x, 0.0));
            }
            if let Some(value) = value {
                ops.extend(value.placed_at(value_x, 0.0));
            }
            slabs.push(Slab::new(height, ops));
        }

        if let Some(first) = slabs.first_mut() {
            *first = std::mem::take(first).padded_top(pad.top);
        }
        if let Some(last) = slabs.last_mut() {
            last.height += config.info_row_gap;
        }

        LaidOut {
            slabs,
            placement: Placement::Keep,
            space_before: 0.0,
            space_after: 0.0,
        }
    }
}

/// Lay out a flow region, one slab per line, paragraphs separated by the larger
/// of the neighbouring spacings.
pub fn layout_flow(items: &[FlowItem], width: f64) -> Vec<Slab> {
    let mut slabs = Vec::new();
    let mut pending_gap = 0.0_f64;
    let mut push_paragraph = |text: &str, style: &TextStyle, slabs: &mut Vec<Slab>| {
        let lines = layout_paragraph(text, style, width);
        if lines.is_empty() {
            return;
        }
        let gap = pending_gap.max(style.space_before);
        if !slabs.is_empty() && gap > 0.0 {
            slabs.push(Slab::spacer(gap));
        }
        slabs.extend(lines);
        pending_gap = style.space_after;
    };

    for item in items {
        match item {
            FlowItem::Paragraph(paragraph) => push_paragraph(&paragraph.text, &paragraph.style, &mut slabs),
            FlowItem::List(list) => {
                for entry in &list.entries {
                    push_paragraph(entry, &list.style, &mut slabs);
                }
            }
        }
    }
    slabs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ReportConfig {
        ReportConfig::default()
    }

    fn texts(slab: &Slab) -> Vec<&str> {
        slab.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn media_table(rows: usize) -> Table {
        let style = TextStyle::body();
        Table {
            columns: vec![
                Column { width: 79.2, align: Align::Center },
                Column { width: 180.0, align: Align::Left },
                Column { width: 244.8, align: Align::Left },
            ],
            header: Some(vec![
                Cell::text("Item Number", style),
                Cell::text("Photo", style),
                Cell::text("Comment/Action", style),
            ]),
            rows: (1..=rows)
                .map(|i| {
                    vec![
                        Cell::text(format!("Figure {}", i), style),
                        Cell::text("\u{2014}", style),
                        Cell::text("desc", style),
                    ]
                })
                .collect(),
            style: TableStyle {
                grid: Some((Color::grey(), 0.3)),
                header_background: Some(Color::white_smoke()),
                padding: CellPadding::default(),
                valign: VAlign::Middle,
            },
        }
    }

    #[test]
    fn test_flow_collapses_adjacent_spacing() {
        let style = TextStyle::body().with_spacing(4.0, 6.0);
        let items = vec![
            FlowItem::Paragraph(TextBlock::new("one", style)),
            FlowItem::Paragraph(TextBlock::new("two", style)),
        ];
        let slabs = layout_flow(&items, 300.0);
        let heights: Vec<f64> = slabs.iter().map(|s| s.height).collect();
        assert_eq!(heights, vec![14.0, 6.0, 14.0]);
    }

    #[test]
    fn test_flow_skips_blank_paragraphs() {
        let items = vec![
            FlowItem::Paragraph(TextBlock::new("", TextStyle::body())),
            FlowItem::Paragraph(TextBlock::new("kept", TextStyle::body())),
        ];
        assert_eq!(layout_flow(&items, 300.0).len(), 1);
    }

    #[test]
    fn test_numbered_list_lays_out_entries_in_order() {
        let list = NumberedListBlock {
            entries: vec![
                "1. Add chairs under bottom bars".into(),
                "2. Clean debris from excavation".into(),
                "3. Tie stirrups at GB-4".into(),
            ],
            style: TextStyle::body().with_spacing(2.0, 5.0),
        };
        let laid = Block::NumberedList(list).layout(300.0, &config());
        assert_eq!(laid.placement, Placement::Flow);
        assert_eq!(laid.space_before, 2.0);
        assert_eq!(laid.space_after, 5.0);

        // entry, gap, entry, gap, entry
        let heights: Vec<f64> = laid.slabs.iter().map(|s| s.height).collect();
        assert_eq!(heights, vec![14.0, 5.0, 14.0, 5.0, 14.0]);
        let lines: Vec<&str> = laid.slabs.iter().flat_map(texts).collect();
        assert_eq!(
            lines,
            vec![
                "1. Add chairs under bottom bars",
                "2. Clean debris from excavation",
                "3. Tie stirrups at GB-4"
            ]
        );
    }

    #[test]
    fn test_key_value_label_has_bullet_and_bold_text() {
        let row = KeyValueRow::text("Project:", "24-118 Garage", TextStyle::body());
        let laid = Block::KeyValue(row).layout(504.0, &config());
        assert_eq!(laid.placement, Placement::Keep);
        assert_eq!(laid.slabs.len(), 1);
        let first = &laid.slabs[0];
        assert_eq!(texts(first), vec![SQUARE_BULLET, "Project:", "24-118 Garage"]);
        let faces: Vec<FontFace> = first
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { face, .. } => Some(*face),
                _ => None,
            })
            .collect();
        assert_eq!(faces, vec![FontFace::Symbol, FontFace::Bold, FontFace::Regular]);
        // top padding + one line + row gap
        assert!((first.height - (3.0 + 14.0 + 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_key_value_with_blank_value_keeps_label() {
        let row = KeyValueRow::text("Remarks:", "", TextStyle::body());
        let laid = Block::KeyValue(row).layout(504.0, &config());
        assert_eq!(laid.slabs.len(), 1);
        assert!(texts(&laid.slabs[0]).contains(&"Remarks:"));
    }

    #[test]
    fn test_key_value_multiline_value() {
        let row = KeyValueRow::text("Present:", "a\nb\nc", TextStyle::body());
        let laid = Block::KeyValue(row).layout(504.0, &config());
        assert_eq!(laid.slabs.len(), 3);
        assert_eq!(texts(&laid.slabs[2]), vec!["c"]);
    }

    #[test]
    fn test_info_rows_are_centered() {
        let row = KeyValueRow::text("Client:", "ACME", TextStyle::body());
        let laid = Block::KeyValue(row).layout(504.0, &config());
        match &laid.slabs[0].ops[0] {
            // (504 - 489.6) / 2 + left padding
            DrawOp::Text { x, .. } => assert!((x - 13.2).abs() < 1e-9),
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_table_rows_and_header() {
        let laid = Block::Table(media_table(3)).layout(504.0, &config());
        let header = match &laid.placement {
            Placement::Rows { header: Some(header) } => header.clone(),
            other => panic!("unexpected placement {:?}", other),
        };
        assert_eq!(texts(&header), vec!["Item Number", "Photo", "Comment/Action"]);
        assert!(matches!(
            header.ops[0],
            DrawOp::Rect { fill: Some(_), stroke: None, .. }
        ));
        assert_eq!(laid.slabs.len(), 3);
        assert_eq!(texts(&laid.slabs[1])[0], "Figure 2");
        let grid = laid.slabs[0]
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { stroke: Some(_), .. }))
            .count();
        assert_eq!(grid, 3);
    }

    #[test]
    fn test_row_height_follows_tallest_cell_and_centers_others() {
        let mut table = media_table(1);
        table.rows[0][1] = Cell::Image {
            id: crate::image_registry::ImageRegistry::new().register(crate::image_fit::ImageResource::Flate {
                rgb: vec![0; 3],
                alpha: None,
                pixel_width: 1,
                pixel_height: 1,
            }),
            width: 100.0,
            height: 100.0,
        };
        let laid = Block::Table(table).layout(504.0, &config());
        let row = &laid.slabs[0];
        assert!((row.height - 106.0).abs() < 1e-9);
        let figure_y = row
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { text, y, .. } if text == "Figure 1" => Some(*y),
                _ => None,
            })
            .unwrap();
        // line box of 14 centered in 100 of inner height
        let expected = -(3.0 + 43.0 + TextStyle::body().baseline_offset());
        assert!((figure_y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_page_break_lays_out_empty() {
        assert!(Block::PageBreak.layout(504.0, &config()).slabs.is_empty());
    }
}
