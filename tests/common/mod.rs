#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use cargo_report::capture::{self, CaptureConfig, CapturedImage, ImageSurface};
use cargo_report::model::{
    CargoItem, Container, LineItem, PackedItem, PackedResult, Position, ReportData, Rotation,
};
use cargo_report::report::{DrawOp, LayoutConfig, Page, TableKind};
use chrono::NaiveDate;
use image::{Rgba, RgbaImage};

pub fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

pub fn standard_20ft() -> Container {
    Container {
        name: "20ft Standard".to_string(),
        length: 589.0,
        width: 235.0,
        height: 239.0,
        max_weight: 28000.0,
    }
}

pub fn packed_item(name: &str, x: f64, y: f64, z: f64) -> PackedItem {
    PackedItem {
        name: name.to_string(),
        length: 120.0,
        width: 80.0,
        height: 100.0,
        weight: 4500.0,
        color: Some("#3b82f6".to_string()),
        position: Position { x, y, z },
        rotation: Rotation::default(),
    }
}

/// 3 packed pallets, 1 crate that did not fit.
pub fn scenario_result() -> PackedResult {
    PackedResult {
        packed_items: vec![
            packed_item("Pallet A", 0.0, 0.0, 0.0),
            packed_item("Pallet B", 120.0, 0.0, 0.0),
            packed_item("Pallet C", 240.0, 0.0, 0.0),
        ],
        unpacked_items: vec![CargoItem {
            name: "Oversize Crate".to_string(),
            length: 600.0,
            width: 100.0,
            height: 100.0,
            weight: 1400.0,
            quantity: 1,
            color: None,
            position: None,
        }],
        volume_utilization: 72.4,
        weight_utilization: 53.2,
        total_weight: 14900.0,
    }
}

pub fn scenario_data() -> ReportData {
    ReportData::new(&standard_20ft(), &scenario_result(), report_date())
}

/// `count` rows named "{prefix} 1" ..= "{prefix} count".
pub fn line_items(prefix: &str, count: usize, with_position: bool) -> Vec<LineItem> {
    (1..=count)
        .map(|i| LineItem {
            name: format!("{prefix} {i}"),
            length: 50.0,
            width: 40.0,
            height: 30.0,
            weight: 12.5,
            position: with_position.then(|| Position {
                x: i as f64,
                y: 0.0,
                z: 0.0,
            }),
            color: None,
        })
        .collect()
}

pub fn report_data(packed: Vec<LineItem>, unpacked: Vec<LineItem>) -> ReportData {
    let mut data = scenario_data();
    data.metadata.packed_count = packed.len();
    data.metadata.total_count = packed.len() + unpacked.len();
    data.packed = packed;
    data.unpacked = unpacked;
    data
}

pub fn solid_surface(w: u32, h: u32, rgba: [u8; 4]) -> ImageSurface {
    ImageSurface::new(RgbaImage::from_pixel(w, h, Rgba(rgba)))
}

pub fn small_capture() -> CapturedImage {
    let surface = solid_surface(8, 6, [20, 40, 60, 255]);
    futures::executor::block_on(capture::capture(&surface, &CaptureConfig::default()))
        .expect("capture")
}

/// Rows that fit on a page when the first row baseline is at `first_row_y`.
pub fn rows_fitting(first_row_y: f32, config: &LayoutConfig) -> usize {
    let mut y = first_row_y;
    let mut n = 0;
    while y + config.row_height <= config.page_bottom {
        n += 1;
        y += config.row_height;
    }
    n
}

pub fn first_row_y_on_page_one(config: &LayoutConfig) -> f32 {
    config.table_top() + config.section_title_advance + config.header_rule_offset + config.rule_advance
}

pub fn first_row_y_on_continuation(config: &LayoutConfig) -> f32 {
    config.top_margin + config.header_rule_offset + config.rule_advance
}

/// Data-row names on a page, in draw order, for rows whose name starts with `prefix`.
pub fn row_names<'a>(page: &'a Page, prefix: &str) -> Vec<&'a str> {
    page.texts().filter(|t| t.starts_with(prefix)).collect()
}

/// True when the page's first drawn texts are exactly the table's column
/// headers followed by the separator rule.
pub fn starts_with_column_header(page: &Page, kind: TableKind) -> bool {
    let headers = kind.headers();
    let leading: Vec<&DrawOp> = page.ops.iter().take(headers.len() + 1).collect();
    if leading.len() != headers.len() + 1 {
        return false;
    }
    let labels_match = leading[..headers.len()]
        .iter()
        .zip(headers)
        .all(|(op, label)| matches!(op, DrawOp::Text { text, bold: true, .. } if text == label));
    labels_match && matches!(leading[headers.len()], DrawOp::Rule { .. })
}

pub fn count_text(page: &Page, needle: &str) -> usize {
    page.texts().filter(|t| *t == needle).count()
}

/// Inflate every Flate stream in a PDF and concatenate the ones that are
/// content streams (contain text operators).
pub fn pdf_content_text(pdf: &[u8]) -> String {
    let mut out = String::new();
    let mut pos = 0;
    while let Some(off) = find(&pdf[pos..], b"stream") {
        let kw = pos + off;
        pos = kw + b"stream".len();
        if kw >= 3 && &pdf[kw - 3..kw] == b"end" {
            continue;
        }
        let mut start = pos;
        if pdf.get(start) == Some(&b'\r') {
            start += 1;
        }
        if pdf.get(start) == Some(&b'\n') {
            start += 1;
        }
        let Some(len) = find(&pdf[start..], b"endstream") else {
            break;
        };
        let mut end = start + len;
        while end > start && matches!(pdf[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(&pdf[start..end]) {
            if find(&raw, b"Tj").is_some() {
                out.push_str(&String::from_utf8_lossy(&raw));
                out.push('\n');
            }
        }
        pos = start + len;
    }
    out
}

pub fn pdf_page_count(pdf: &[u8]) -> Option<usize> {
    let text = String::from_utf8_lossy(pdf);
    let idx = text.find("/Count ")?;
    text[idx + 7..]
        .split(|c: char| !c.is_ascii_digit())
        .next()?
        .parse()
        .ok()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("cargo-report-{name}-{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
