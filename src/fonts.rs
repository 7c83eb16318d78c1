//! Standard PDF fonts used by the report and their metrics
//!
//! Only the base-14 faces are used, so nothing is embedded. Advance widths come
//! from the Adobe AFM files (units of 1/1000 em).

use pdf_writer::{Name, Pdf, Ref};
use serde::{Deserialize, Serialize};

use crate::encoding::winansi_byte;

/// Font faces available to layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Regular,
    Bold,
    /// ZapfDingbats, used for the label bullet
    Symbol,
}

impl FontFace {
    pub const ALL: [FontFace; 3] = [FontFace::Regular, FontFace::Bold, FontFace::Symbol];

    /// Resource name inside page resources
    pub fn resource_name(self) -> Name<'static> {
        match self {
            FontFace::Regular => Name(b"F1"),
            FontFace::Bold => Name(b"F2"),
            FontFace::Symbol => Name(b"F3"),
        }
    }

    pub fn base_font(self) -> Name<'static> {
        match self {
            FontFace::Regular => Name(b"Helvetica"),
            FontFace::Bold => Name(b"Helvetica-Bold"),
            FontFace::Symbol => Name(b"ZapfDingbats"),
        }
    }

    /// Symbol fonts carry their own built-in encoding.
    pub fn uses_winansi(self) -> bool {
        !matches!(self, FontFace::Symbol)
    }

    /// Bytes to show for `text` in this face.
    pub fn encode(self, text: &str) -> Vec<u8> {
        if self.uses_winansi() {
            crate::encoding::unicode_to_winansi(text)
        } else {
            text.chars()
                .map(|ch| if ch.is_ascii() { ch as u8 } else { b' ' })
                .collect()
        }
    }

    /// Advance width of one encoded byte, in 1/1000 em.
    pub fn glyph_width(self, byte: u8) -> u16 {
        match self {
            FontFace::Regular => helvetica_width(&HELVETICA_ASCII, byte, 556),
            FontFace::Bold => helvetica_width(&HELVETICA_BOLD_ASCII, byte, 611),
            FontFace::Symbol => match byte {
                b' ' => 278,
                b'n' => 762,
                _ => 788,
            },
        }
    }

    /// Width of `text` at `size` points.
    pub fn text_width(self, text: &str, size: f64) -> f64 {
        let units: u32 = if self.uses_winansi() {
            text.chars().map(|ch| self.glyph_width(winansi_byte(ch)) as u32).sum()
        } else {
            self.encode(text).into_iter().map(|b| self.glyph_width(b) as u32).sum()
        };
        units as f64 * size / 1000.0
    }
}

/// Glyph in ZapfDingbats that renders as a filled square
pub const SQUARE_BULLET: &str = "n";

fn helvetica_width(ascii: &[u16; 95], byte: u8, fallback: u16) -> u16 {
    match byte {
        0x20..=0x7E => ascii[(byte - 0x20) as usize],
        0x91 | 0x92 => 222,
        0x93 | 0x94 => 333,
        0x95 => 350,
        0x96 => 556,
        0x97 | 0x85 | 0x89 => 1000,
        0xA0 => 278,
        0xB0 => 400,
        _ => fallback,
    }
}

/// Helvetica, codes 0x20..=0x7E
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Helvetica-Bold, codes 0x20..=0x7E
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Registers the report fonts in a PDF and writes them into page resources
pub struct FontRegistry {
    fonts: Vec<(FontFace, Ref)>,
}

impl FontRegistry {
    /// Write one font dictionary per face, taking refs from `next_ref`.
    pub fn register_all(pdf: &mut Pdf, mut next_ref: impl FnMut() -> Ref) -> Self {
        let mut fonts = Vec::with_capacity(FontFace::ALL.len());
        for face in FontFace::ALL {
            let id = next_ref();
            let mut font = pdf.type1_font(id);
            font.base_font(face.base_font());
            if face.uses_winansi() {
                font.encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            fonts.push((face, id));
        }
        Self { fonts }
    }

    /// Write all fonts into page Resources
    pub fn write_resources(&self, resources: &mut pdf_writer::writers::Resources<'_>) {
        let mut dict = resources.fonts();
        for (face, id) in &self.fonts {
            dict.pair(face.resource_name(), *id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_tables_cover_printable_ascii() {
        assert_eq!(HELVETICA_ASCII.len(), 0x7E - 0x20 + 1);
        assert_eq!(FontFace::Regular.glyph_width(b'A'), 667);
        assert_eq!(FontFace::Regular.glyph_width(b'i'), 222);
        assert_eq!(FontFace::Bold.glyph_width(b'i'), 278);
        assert_eq!(FontFace::Regular.glyph_width(b'~'), 584);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let w10 = FontFace::Regular.text_width("Figure 1", 10.0);
        let w20 = FontFace::Regular.text_width("Figure 1", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-9);
        // F(611) i(222) g(556) u(556) r(333) e(556) space(278) 1(556)
        assert!((w10 - 36.68).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider() {
        let text = "Observations:";
        assert!(FontFace::Bold.text_width(text, 10.0) > FontFace::Regular.text_width(text, 10.0));
    }

    #[test]
    fn test_symbol_bullet_width() {
        assert!((FontFace::Symbol.text_width(SQUARE_BULLET, 10.0) - 7.62).abs() < 1e-9);
    }
}
