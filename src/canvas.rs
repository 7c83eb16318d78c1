//! Canvas-like wrapper over a pdf-writer content stream
//!
//! Replays the page model's draw operations as PDF operators.

use pdf_writer::{Content, Name, Str};

use crate::fonts::FontFace;
use crate::page::DrawOp;
use crate::types::{Color, Rect};

/// Graphics state mirrored on the Rust side
#[derive(Debug, Clone, Copy)]
pub struct CanvasState {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_width: f64,
    pub font: FontFace,
    pub font_size: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            fill_color: Color::black(),
            stroke_color: Color::black(),
            line_width: 1.0,
            font: FontFace::Regular,
            font_size: 10.0,
        }
    }
}

/// One page's content stream
pub struct PdfCanvas {
    content: Content,
    state: CanvasState,
    state_stack: Vec<CanvasState>,
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            content: Content::new(),
            state: CanvasState::default(),
            state_stack: Vec::new(),
        }
    }

    /// Encoded content stream
    pub fn finish(self) -> Vec<u8> {
        self.content.finish()
    }

    // ===== State Management =====

    pub fn save_state(&mut self) {
        self.state_stack.push(self.state);
        self.content.save_state();
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
            self.content.restore_state();
        }
    }

    // ===== Colors =====

    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill_color = color;
        self.content.set_fill_rgb(color.r as f32, color.g as f32, color.b as f32);
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke_color = color;
        self.content.set_stroke_rgb(color.r as f32, color.g as f32, color.b as f32);
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
        self.content.set_line_width(width as f32);
    }

    // ===== Drawing =====

    pub fn rect(&mut self, rect: Rect, fill: bool, stroke: bool) {
        self.content
            .rect(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32);
        match (fill, stroke) {
            (true, true) => {
                self.content.fill_nonzero_and_stroke();
            }
            (true, false) => {
                self.content.fill_nonzero();
            }
            (false, true) => {
                self.content.stroke();
            }
            (false, false) => {
                self.content.end_path();
            }
        }
    }

    // ===== Text =====

    pub fn set_font(&mut self, font: FontFace, size: f64) {
        self.state.font = font;
        self.state.font_size = size;
    }

    /// Show `text` with its baseline starting at (x, y), in the current font.
    pub fn draw_string(&mut self, x: f64, y: f64, text: &str, word_spacing: f64) {
        let bytes = self.state.font.encode(text);
        self.content.begin_text();
        self.content
            .set_font(self.state.font.resource_name(), self.state.font_size as f32);
        if word_spacing != 0.0 {
            self.content.set_word_spacing(word_spacing as f32);
        }
        self.content.next_line(x as f32, y as f32);
        self.content.show(Str(&bytes));
        self.content.end_text();
    }

    // ===== Images =====

    /// Draw an XObject scaled into `rect` (bottom-left origin).
    pub fn draw_image(&mut self, image_name: Name<'_>, rect: Rect) {
        self.content.save_state();
        self.content.transform([
            rect.width as f32,
            0.0,
            0.0,
            rect.height as f32,
            rect.x as f32,
            rect.y as f32,
        ]);
        self.content.x_object(image_name);
        self.content.restore_state();
    }

    /// Replay one draw operation.
    pub fn draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Text { x, y, face, size, color, text, word_spacing } => {
                self.save_state();
                self.set_fill_color(*color);
                self.set_font(*face, *size);
                self.draw_string(*x, *y, text, *word_spacing);
                self.restore_state();
            }
            DrawOp::Rect { rect, fill, stroke } => {
                self.save_state();
                if let Some(color) = fill {
                    self.set_fill_color(*color);
                }
                if let Some((color, width)) = stroke {
                    self.set_stroke_color(*color);
                    self.set_line_width(*width);
                }
                self.rect(*rect, fill.is_some(), stroke.is_some());
                self.restore_state();
            }
            DrawOp::Image { id, rect } => {
                let name = id.resource_name();
                self.draw_image(Name(name.as_bytes()), *rect);
            }
        }
    }
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(ops: &[DrawOp]) -> String {
        let mut canvas = PdfCanvas::new();
        ops.iter().for_each(|op| canvas.draw(op));
        String::from_utf8_lossy(&canvas.finish()).into_owned()
    }

    #[test]
    fn test_text_uses_font_resource_and_winansi() {
        let out = stream(&[DrawOp::Text {
            x: 54.0,
            y: 700.0,
            face: FontFace::Bold,
            size: 10.0,
            color: Color::black(),
            text: "Café".into(),
            word_spacing: 0.0,
        }]);
        assert!(out.contains("/F2 10 Tf"));
        assert!(out.contains("BT") && out.contains("ET"));
        assert!(!out.contains("Tw"));
    }

    #[test]
    fn test_justified_text_sets_word_spacing() {
        let out = stream(&[DrawOp::Text {
            x: 0.0,
            y: 0.0,
            face: FontFace::Regular,
            size: 10.0,
            color: Color::black(),
            text: "a b".into(),
            word_spacing: 1.5,
        }]);
        assert!(out.contains("1.5 Tw"));
    }

    #[test]
    fn test_grid_rect_strokes_without_fill() {
        let out = stream(&[DrawOp::Rect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            fill: None,
            stroke: Some((Color::grey(), 0.3)),
        }]);
        assert!(out.contains("re"));
        assert!(out.contains("0.3 w"));
        assert!(out.contains("\nS"));
        assert!(!out.contains("\nf"));
    }

    #[test]
    fn test_state_stack_is_balanced() {
        let mut canvas = PdfCanvas::new();
        canvas.restore_state();
        canvas.save_state();
        canvas.set_fill_color(Color::brand_blue());
        canvas.restore_state();
        assert_eq!(canvas.state.fill_color, Color::black());
        assert!(canvas.state_stack.is_empty());
    }
}
