use pdf_writer::{Name, Pdf, Ref};

/// Base-14 faces used by the report. Nothing is embedded; viewers supply them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Face {
    Regular,
    Bold,
}

impl Face {
    pub(crate) const ALL: [Face; 2] = [Face::Regular, Face::Bold];

    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }

    fn base_font(self) -> &'static [u8] {
        match self {
            Face::Regular => b"Helvetica",
            Face::Bold => b"Helvetica-Bold",
        }
    }

    pub(crate) fn for_weight(bold: bool) -> Self {
        if bold { Face::Bold } else { Face::Regular }
    }
}

pub(crate) fn register_font(pdf: &mut Pdf, face: Face, font_ref: Ref) {
    pdf.type1_font(font_ref)
        .base_font(Name(face.base_font()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Unmappable characters are replaced with '?'.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c as u32 {
            0x0020..=0x007E => c as u8,
            0x00A0..=0x00FF => c as u8, // Latin-1 supplement maps directly, incl. U+00D7 '×'
            0x20AC => 0x80,
            0x201A => 0x82,
            0x201E => 0x84,
            0x2026 => 0x85,
            0x2030 => 0x89,
            0x0160 => 0x8A,
            0x0152 => 0x8C,
            0x017D => 0x8E,
            0x2018 => 0x91,
            0x2019 => 0x92,
            0x201C => 0x93,
            0x201D => 0x94,
            0x2022 => 0x95,
            0x2013 => 0x96,
            0x2014 => 0x97,
            0x2122 => 0x99,
            0x0161 => 0x9A,
            0x0153 => 0x9C,
            0x017E => 0x9E,
            0x0178 => 0x9F,
            _ => b'?',
        })
        .collect()
}
