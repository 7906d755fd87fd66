//! Built-in 5x7 pixel glyphs for ID badges.
//!
//! Element IDs only ever contain the eight prefix letters and digits, so a
//! tiny fixed bitmap set covers every badge without pulling in a font
//! rasterizer. Each glyph row is a 5-bit mask, most significant bit on the
//! left.

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;

/// Glyph bitmap for one badge character, or `None` for anything outside
/// the ID alphabet.
pub fn glyph(c: char) -> Option<&'static [u8; 7]> {
    let bitmap: &'static [u8; 7] = match c {
        '0' => &[0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => &[0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => &[0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => &[0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => &[0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => &[0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => &[0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => &[0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => &[0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => &[0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'B' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'T' => &[0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'C' => &[0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'L' => &[0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'S' => &[0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'R' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'M' => &[0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'G' => &[0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        _ => return None,
    };
    Some(bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_alphabet_is_covered() {
        for c in "BTCLSRMG0123456789".chars() {
            assert!(glyph(c).is_some(), "missing glyph for {}", c);
        }
    }

    #[test]
    fn test_outside_alphabet_is_none() {
        assert!(glyph('a').is_none());
        assert!(glyph('X').is_none());
        assert!(glyph(' ').is_none());
    }

    #[test]
    fn test_rows_fit_width() {
        for c in "BTCLSRMG0123456789".chars() {
            for row in glyph(c).unwrap() {
                assert!(*row < (1 << GLYPH_WIDTH));
            }
        }
    }
}
