//! WinAnsi encoding and advance widths for the built-in Helvetica faces.
//!
//! Widths are in 1/1000 em, taken from the standard Adobe AFM files. Codes
//! that WinAnsi leaves undefined have width 0 and are never produced by
//! [`winansi_byte`].

const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32..47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48..63
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64..79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80..95
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96..111
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 112..126
];

const HELVETICA_HIGH: [u16; 128] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0, // 0x80
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32..47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 48..63
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 64..79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 80..95
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 96..111
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 112..126
];

const HELVETICA_BOLD_HIGH: [u16; 128] = [
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0, // 0x80
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // 0xF0
];

/// WinAnsi byte for a character; anything outside the encoding becomes `?`.
///
/// Latin-1 maps onto itself. The 0x80..=0x9F block holds typographic
/// punctuation and a few Latin Extended letters.
pub fn winansi_byte(ch: char) -> u8 {
    match ch as u32 {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => b'?',
    }
}

/// Advance width of `ch` in 1/1000 em after WinAnsi substitution.
pub fn helvetica_width(ch: char, bold: bool) -> u16 {
    let (low, high) = if bold {
        (&HELVETICA_BOLD, &HELVETICA_BOLD_HIGH)
    } else {
        (&HELVETICA, &HELVETICA_HIGH)
    };
    match winansi_byte(ch) {
        byte @ 32..=126 => low[(byte - 32) as usize],
        byte @ 0x80..=0xFF => high[(byte - 0x80) as usize],
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(winansi_byte('A'), b'A');
        assert_eq!(winansi_byte(' '), b' ');
        assert_eq!(winansi_byte('é'), 0xE9);
    }

    #[test]
    fn non_latin_becomes_question_mark() {
        assert_eq!(winansi_byte('स'), b'?');
        assert_eq!(winansi_byte('→'), b'?');
        assert_eq!(helvetica_width('स', false), helvetica_width('?', false));
    }

    #[test]
    fn typographic_punctuation_uses_the_high_block() {
        assert_eq!(winansi_byte('\u{2019}'), 0x92);
        assert_eq!(winansi_byte('\u{201C}'), 0x93);
        assert_eq!(winansi_byte('\u{201D}'), 0x94);
        assert_eq!(winansi_byte('\u{2013}'), 0x96);
        assert_eq!(winansi_byte('\u{2014}'), 0x97);
        assert_eq!(winansi_byte('\u{2026}'), 0x85);
        assert_eq!(winansi_byte('€'), 0x80);
        assert_eq!(winansi_byte('\u{2022}'), 0x95);
        assert_eq!(winansi_byte('Ÿ'), 0x9F);
    }

    #[test]
    fn every_mapped_character_has_a_width() {
        for code in (0x20..=0x7Eu32).chain(0xA0..=0xFF) {
            let ch = char::from_u32(code).unwrap();
            assert!(helvetica_width(ch, false) > 0, "{ch:?}");
            assert!(helvetica_width(ch, true) > 0, "{ch:?}");
        }
        for ch in ['€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž'] {
            assert!(helvetica_width(ch, false) > 0, "{ch:?}");
        }
        for ch in ['‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ'] {
            assert!(helvetica_width(ch, true) > 0, "{ch:?}");
        }
    }

    #[test]
    fn known_widths() {
        assert_eq!(helvetica_width(' ', false), 278);
        assert_eq!(helvetica_width('W', false), 944);
        assert_eq!(helvetica_width('i', false), 222);
        assert_eq!(helvetica_width('i', true), 278);
        assert_eq!(helvetica_width('~', true), 584);
        assert_eq!(helvetica_width('—', false), 1000);
        assert_eq!(helvetica_width('’', false), 222);
        assert_eq!(helvetica_width('“', true), 500);
        assert_eq!(helvetica_width('é', false), 556);
        assert_eq!(helvetica_width('é', true), 556);
        assert_eq!(helvetica_width('ß', true), 611);
        assert_eq!(helvetica_width('Æ', false), 1000);
    }
}
