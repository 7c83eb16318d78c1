//! Unicode to WinAnsiEncoding conversion for the standard Helvetica faces
//!
//! WinAnsiEncoding agrees with Latin-1 for 0xA0..=0xFF and fills 0x80..=0x9F with
//! typographic punctuation. Characters outside the encoding become '?'.

/// Replacement byte for characters the encoding cannot express
pub const REPLACEMENT: u8 = b'?';

/// Map a single character to its WinAnsiEncoding byte.
pub fn winansi_byte(ch: char) -> u8 {
    let code = ch as u32;
    match code {
        0x20..=0x7E => code as u8,
        // Tabs and other controls render as spaces
        0x09 => b' ',
        0xA0..=0xFF => code as u8,
        _ => match ch {
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => REPLACEMENT,
        },
    }
}

/// Convert a string to WinAnsiEncoding bytes, one byte per character.
pub fn unicode_to_winansi(text: &str) -> Vec<u8> {
    text.chars().map(winansi_byte).collect()
}
