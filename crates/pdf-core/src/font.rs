//! Standard Type1 fonts (Helvetica family) with WinAnsi encoding
//!
//! The standard 14 fonts are available in every PDF viewer, so nothing is
//! embedded. Glyph widths come from the Adobe AFM metrics and are needed for
//! center and right alignment.

/// Font weight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Font style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// One of the Helvetica standard fonts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

/// Helvetica widths for ' ' (32) through '~' (126), in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold widths for ' ' (32) through '~' (126), in 1/1000 em
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // {..~
];

impl StandardFont {
    /// Pick the font for a weight/style combination
    pub fn from_variant(weight: FontWeight, style: FontStyle) -> Self {
        match (weight, style) {
            (FontWeight::Regular, FontStyle::Normal) => StandardFont::Helvetica,
            (FontWeight::Bold, FontStyle::Normal) => StandardFont::HelveticaBold,
            (FontWeight::Regular, FontStyle::Italic) => StandardFont::HelveticaOblique,
            (FontWeight::Bold, FontStyle::Italic) => StandardFont::HelveticaBoldOblique,
        }
    }

    /// PostScript name used as `/BaseFont`
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Page resource name (`/F1` .. `/F4`)
    pub fn resource_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F1",
            StandardFont::HelveticaBold => "F2",
            StandardFont::HelveticaOblique => "F3",
            StandardFont::HelveticaBoldOblique => "F4",
        }
    }

    fn is_bold(&self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique
        )
    }

    /// Advance width of a WinAnsi byte in 1/1000 em
    pub fn byte_width(&self, byte: u8) -> u16 {
        let table = if self.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };

        match byte {
            32..=126 => table[(byte - 32) as usize],
            0x91 | 0x92 => {
                if self.is_bold() {
                    278
                } else {
                    222
                }
            }
            0x93 | 0x94 => {
                if self.is_bold() {
                    500
                } else {
                    333
                }
            }
            0x95 => 350,
            0x96 => 556,
            0x97 => 1000,
            _ => 556,
        }
    }

    /// Width of a string in points at the given size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f64 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|b| self.byte_width(b) as u32)
            .sum();
        units as f64 * font_size as f64 / 1000.0
    }

    /// Encode text as a PDF hex string (`<48656C6C6F>`)
    pub fn encode_text_hex(&self, text: &str) -> String {
        let mut hex = String::with_capacity(text.len() * 2 + 2);
        hex.push('<');
        for byte in encode_win_ansi(text) {
            hex.push_str(&format!("{byte:02X}"));
        }
        hex.push('>');
        hex
    }
}

/// Encode a string as WinAnsi (CP1252) bytes
///
/// Characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_variant() {
        assert_eq!(
            StandardFont::from_variant(FontWeight::Bold, FontStyle::Normal),
            StandardFont::HelveticaBold
        );
        assert_eq!(
            StandardFont::from_variant(FontWeight::Regular, FontStyle::Italic),
            StandardFont::HelveticaOblique
        );
    }

    #[test]
    fn test_text_width() {
        // "Hello" = 722 + 556 + 222 + 222 + 556 = 2278 units
        let width = StandardFont::Helvetica.text_width_points("Hello", 10.0);
        assert!((width - 22.78).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = StandardFont::Helvetica.text_width_points("Voucher", 12.0);
        let bold = StandardFont::HelveticaBold.text_width_points("Voucher", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Rs."), b"Rs.".to_vec());
        assert_eq!(encode_win_ansi("\u{2022} GRN"), vec![0x95, b' ', b'G', b'R', b'N']);
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(encode_win_ansi("සිංහල"), vec![b'?'; 5]);
    }

    #[test]
    fn test_encode_text_hex() {
        assert_eq!(StandardFont::Helvetica.encode_text_hex("AB"), "<4142>");
        assert_eq!(StandardFont::Helvetica.encode_text_hex(""), "<>");
    }
}
