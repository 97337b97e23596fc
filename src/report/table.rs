use crate::model::{LineItem, Position};

use super::{Cursor, DrawOp, LayoutConfig, PageSink, Region};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    Packed,
    Unpacked,
}

impl TableKind {
    pub fn title(self) -> &'static str {
        match self {
            TableKind::Packed => "Packed Items",
            TableKind::Unpacked => "Unpacked Items",
        }
    }

    pub fn headers(self) -> &'static [&'static str] {
        match self {
            TableKind::Packed => &["Name", "Dimensions (cm)", "Weight", "Position", "Color"],
            TableKind::Unpacked => &["Name", "Dimensions (cm)", "Weight", "Color"],
        }
    }

    fn columns(self, config: &LayoutConfig) -> &[f32] {
        match self {
            TableKind::Packed => &config.packed_columns,
            TableKind::Unpacked => &config.unpacked_columns,
        }
    }
}

pub(crate) fn fmt_dims(l: f64, w: f64, h: f64) -> String {
    format!("{l} \u{d7} {w} \u{d7} {h}")
}

pub(crate) fn fmt_weight(kg: f64) -> String {
    format!("{kg:.1} kg")
}

pub(crate) fn fmt_percent(p: f64) -> String {
    format!("{p:.1}%")
}

fn fmt_position(p: &Position) -> String {
    format!("({}, {}, {})", p.x, p.y, p.z)
}

/// `#rrggbb` or `#rgb`.
fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().strip_prefix('#')?;
    let channel = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    match hex.len() {
        6 => Some([channel(0, 2)?, channel(2, 2)?, channel(4, 2)?]),
        3 => {
            let [r, g, b] = [channel(0, 1)?, channel(1, 1)?, channel(2, 1)?];
            Some([r * 17, g * 17, b * 17])
        }
        _ => None,
    }
}

/// Lay out one table: section title once, then column headers and rows,
/// breaking pages before any row that would cross `page_bottom`. The title
/// moves to a new page unless its header and first row fit below it.
pub(super) fn layout_table(
    sink: &mut PageSink,
    cursor: Cursor,
    kind: TableKind,
    items: &[LineItem],
    config: &LayoutConfig,
) -> Cursor {
    let mut cursor = Cursor {
        region: Region::Table(kind),
        ..cursor
    };
    if cursor.y + config.section_lead() > config.page_bottom && cursor.y > config.top_margin {
        cursor = sink.break_page(cursor, config);
    }

    sink.push(
        cursor,
        DrawOp::Text {
            x: config.margin_x,
            y: cursor.y,
            size: config.section_title_size,
            bold: true,
            text: kind.title().to_string(),
        },
    );
    cursor.y += config.section_title_advance;
    cursor = column_header(sink, cursor, kind, config);

    for item in items {
        if cursor.y + config.row_height > config.page_bottom {
            cursor = sink.break_page(cursor, config);
            if config.repeat_column_headers {
                cursor = column_header(sink, cursor, kind, config);
            }
        }
        row(sink, cursor, kind, item, config);
        cursor.y += config.row_height;
    }
    cursor
}

fn column_header(sink: &mut PageSink, cursor: Cursor, kind: TableKind, config: &LayoutConfig) -> Cursor {
    for (&x, &label) in kind.columns(config).iter().zip(kind.headers()) {
        sink.push(
            cursor,
            DrawOp::Text {
                x,
                y: cursor.y,
                size: config.column_header_size,
                bold: true,
                text: label.to_string(),
            },
        );
    }
    let rule_y = cursor.y + config.header_rule_offset;
    sink.push(
        cursor,
        DrawOp::Rule {
            x1: config.margin_x,
            x2: config.page_width - config.margin_x,
            y: rule_y,
        },
    );
    Cursor {
        y: rule_y + config.rule_advance,
        ..cursor
    }
}

fn row(sink: &mut PageSink, cursor: Cursor, kind: TableKind, item: &LineItem, config: &LayoutConfig) {
    let color = item.color.as_deref().unwrap_or(config.default_color.as_str());

    let mut cells = vec![
        item.name.clone(),
        fmt_dims(item.length, item.width, item.height),
        fmt_weight(item.weight),
    ];
    if kind == TableKind::Packed {
        // Packed rows always carry the position column, even if unset.
        cells.push(item.position.as_ref().map(fmt_position).unwrap_or_default());
    }

    let columns = kind.columns(config);
    for (&x, text) in columns.iter().zip(cells) {
        sink.push(
            cursor,
            DrawOp::Text {
                x,
                y: cursor.y,
                size: config.row_size,
                bold: false,
                text,
            },
        );
    }

    let Some(&color_x) = columns.last() else {
        return;
    };
    let mut text_x = color_x;
    if let Some(rgb) = parse_hex_color(color) {
        sink.push(
            cursor,
            DrawOp::Swatch {
                x: color_x,
                y: cursor.y - config.swatch_size,
                size: config.swatch_size,
                rgb,
            },
        );
        text_x += config.swatch_size + config.swatch_gap;
    }
    sink.push(
        cursor,
        DrawOp::Text {
            x: text_x,
            y: cursor.y,
            size: config.row_size,
            bold: false,
            text: color.to_string(),
        },
    );
}
