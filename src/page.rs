//! Page model produced by the paginator and decorator, consumed by the emitter
//!
//! Draw operations are plain data in PDF space. Layout code builds them in a local
//! frame whose origin is the top-left corner of the slab being laid out (y grows
//! upward, so content sits at negative y) and translates them on placement.

use crate::fonts::FontFace;
use crate::image_registry::{ImageId, ImageRegistry};
use crate::types::{Color, Rect};

/// A single drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// One line of text; `y` is the baseline
    Text {
        x: f64,
        y: f64,
        face: FontFace,
        size: f64,
        color: Color,
        text: String,
        /// Extra space added to every ASCII space, for justification
        word_spacing: f64,
    },
    Rect {
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
    },
    Image {
        id: ImageId,
        rect: Rect,
    },
}

impl DrawOp {
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        match self {
            DrawOp::Text { x, y, face, size, color, text, word_spacing } => DrawOp::Text {
                x: x + dx,
                y: y + dy,
                face,
                size,
                color,
                text,
                word_spacing,
            },
            DrawOp::Rect { rect, fill, stroke } => DrawOp::Rect {
                rect: rect.translated(dx, dy),
                fill,
                stroke,
            },
            DrawOp::Image { id, rect } => DrawOp::Image {
                id,
                rect: rect.translated(dx, dy),
            },
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            DrawOp::Text { x, y, size, word_spacing, .. } => {
                x.is_finite() && y.is_finite() && size.is_finite() && word_spacing.is_finite()
            }
            DrawOp::Rect { rect, stroke, .. } => {
                rect.is_finite() && stroke.map_or(true, |(_, w)| w.is_finite())
            }
            DrawOp::Image { rect, .. } => rect.is_finite(),
        }
    }
}

/// A measured, unsplittable strip of content: one text line, one table row.
/// Ops are in the slab's local frame (origin at its top-left corner).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slab {
    pub height: f64,
    pub ops: Vec<DrawOp>,
}

impl Slab {
    pub fn new(height: f64, ops: Vec<DrawOp>) -> Self {
        Self { height, ops }
    }

    pub fn spacer(height: f64) -> Self {
        Self { height, ops: Vec::new() }
    }

    /// Ops moved so the slab's top-left corner lands on (x, top).
    pub fn placed_at(self, x: f64, top: f64) -> Vec<DrawOp> {
        self.ops.into_iter().map(|op| op.translated(x, top)).collect()
    }

    /// Same slab, content moved right by `dx`.
    pub fn shifted(self, dx: f64) -> Slab {
        Slab {
            height: self.height,
            ops: self.ops.into_iter().map(|op| op.translated(dx, 0.0)).collect(),
        }
    }

    /// Same slab, content moved down by `extra` and the height grown to match.
    pub fn padded_top(self, extra: f64) -> Slab {
        Slab {
            height: self.height + extra,
            ops: self.ops.into_iter().map(|op| op.translated(0.0, -extra)).collect(),
        }
    }

    /// Stack `slabs` vertically into one slab.
    pub fn stack(slabs: Vec<Slab>) -> Slab {
        let mut height = 0.0;
        let mut ops = Vec::new();
        for slab in slabs {
            ops.extend(slab.ops.into_iter().map(|op| op.translated(0.0, -height)));
            height += slab.height;
        }
        Slab { height, ops }
    }
}

/// One laid-out page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn new(number: u32) -> Self {
        Self { number, ops: Vec::new() }
    }

    /// Text runs on this page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Text runs with their baselines
    pub fn text_positions(&self) -> impl Iterator<Item = (&str, f64, f64)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, x, y, .. } => Some((text.as_str(), *x, *y)),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = (ImageId, Rect)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image { id, rect } => Some((*id, *rect)),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

/// A fully paginated and decorated document, ready for emission
#[derive(Debug)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
    pub images: ImageRegistry,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
