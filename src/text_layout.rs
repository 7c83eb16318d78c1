//! Text layout and line breaking
//!
//! This module provides:
//! - Line breaking (greedy word wrapping, hard `\n` breaks)
//! - Justification (word spacing adjustment)
//! - Turning a paragraph into one slab per line

use serde::{Deserialize, Serialize};

use crate::fonts::FontFace;
use crate::page::{DrawOp, Slab};
use crate::types::Color;

/// Horizontal alignment of lines within their box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
}

/// Paragraph style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f64,
    pub leading: f64,
    pub color: Color,
    pub align: Align,
    #[serde(default)]
    pub space_before: f64,
    #[serde(default)]
    pub space_after: f64,
}

impl TextStyle {
    pub fn new(face: FontFace, size: f64, leading: f64) -> Self {
        Self {
            face,
            size,
            leading,
            color: Color::black(),
            align: Align::Left,
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    /// Helvetica 10/14, the report's body text
    pub fn body() -> Self {
        Self::new(FontFace::Regular, 10.0, 14.0)
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_spacing(mut self, before: f64, after: f64) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    /// Offset from the top of a line box down to the baseline
    pub fn baseline_offset(&self) -> f64 {
        (self.leading + self.size * 0.6) / 2.0
    }
}

/// One broken line of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f64,
    /// Last line of a hard-broken segment; never stretched when justifying
    pub ends_segment: bool,
}

impl TextLine {
    fn space_count(&self) -> usize {
        self.text.chars().filter(|c| *c == ' ').count()
    }
}

/// Line breaker for wrapping text
pub struct LineBreaker {
    max_width: f64,
}

impl LineBreaker {
    pub fn new(max_width: f64) -> Self {
        Self { max_width: max_width.max(1.0) }
    }

    /// Break text into lines using greedy word wrapping.
    ///
    /// Whitespace-only text yields no lines. Blank segments between hard breaks yield
    /// empty lines so the vertical gap is preserved.
    pub fn break_text(&self, text: &str, face: FontFace, size: f64) -> Vec<TextLine> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let space_width = face.text_width(" ", size);
        let mut lines = Vec::new();

        for segment in text.lines() {
            let mut current = String::new();
            let mut current_width = 0.0;

            for word in segment.split_whitespace() {
                let word_width = face.text_width(word, size);

                if word_width > self.max_width {
                    if !current.is_empty() {
                        lines.push(TextLine {
                            text: std::mem::take(&mut current),
                            width: current_width,
                            ends_segment: false,
                        });
                        current_width = 0.0;
                    }
                    let mut pieces = self.split_long_word(word, face, size);
                    if let Some((last, last_width)) = pieces.pop() {
                        lines.extend(pieces.into_iter().map(|(text, width)| TextLine {
                            text,
                            width,
                            ends_segment: false,
                        }));
                        current = last;
                        current_width = last_width;
                    }
                    continue;
                }

                let needed = if current.is_empty() {
                    word_width
                } else {
                    current_width + space_width + word_width
                };

                if needed <= self.max_width || current.is_empty() {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                    current_width = needed;
                } else {
                    lines.push(TextLine {
                        text: std::mem::replace(&mut current, word.to_string()),
                        width: current_width,
                        ends_segment: false,
                    });
                    current_width = word_width;
                }
            }

            lines.push(TextLine {
                text: current,
                width: current_width,
                ends_segment: true,
            });
        }

        lines
    }

    /// Split a word wider than the line into chunks that fit.
    fn split_long_word(&self, word: &str, face: FontFace, size: f64) -> Vec<(String, f64)> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut piece_width = 0.0;
        for ch in word.chars() {
            let mut buf = [0u8; 4];
            let ch_width = face.text_width(ch.encode_utf8(&mut buf), size);
            if !piece.is_empty() && piece_width + ch_width > self.max_width {
                pieces.push((std::mem::take(&mut piece), piece_width));
                piece_width = 0.0;
            }
            piece.push(ch);
            piece_width += ch_width;
        }
        if !piece.is_empty() {
            pieces.push((piece, piece_width));
        }
        pieces
    }
}

/// Justification calculator for word spacing adjustment
pub struct Justifier {
    line_width: f64,
    content_width: f64,
}

impl Justifier {
    pub fn new(line_width: f64, content_width: f64) -> Self {
        Self {
            line_width,
            content_width,
        }
    }

    /// Spacing to add to each space so the line fills its box
    pub fn calculate_spacing(&self, space_count: usize) -> f64 {
        if space_count == 0 {
            return 0.0;
        }
        ((self.line_width - self.content_width) / space_count as f64).max(0.0)
    }
}

/// Lay out a paragraph at `width`, one slab per line.
///
/// Slabs do not include the style's space before/after; callers add those.
pub fn layout_paragraph(text: &str, style: &TextStyle, width: f64) -> Vec<Slab> {
    let lines = LineBreaker::new(width).break_text(text, style.face, style.size);
    let baseline = -style.baseline_offset();

    lines
        .into_iter()
        .map(|line| {
            let (x, word_spacing) = match style.align {
                Align::Left => (0.0, 0.0),
                Align::Center => (((width - line.width) / 2.0).max(0.0), 0.0),
                Align::Right => ((width - line.width).max(0.0), 0.0),
                Align::Justify if !line.ends_segment => {
                    let spacing = Justifier::new(width, line.width).calculate_spacing(line.space_count());
                    (0.0, spacing)
                }
                Align::Justify => (0.0, 0.0),
            };
            let ops = if line.text.is_empty() {
                Vec::new()
            } else {
                vec![DrawOp::Text {
                    x,
                    y: baseline,
                    face: style.face,
                    size: style.size,
                    color: style.color,
                    text: line.text,
                    word_spacing,
                }]
            };
            Slab::new(style.leading, ops)
        })
        .collect()
}
