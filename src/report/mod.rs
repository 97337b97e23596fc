//! Page layout for the load-plan report.
//!
//! Layout works in millimetres with `y` growing downwards from the top edge of
//! the sheet. The result is a [`Document`]: a display list per page, which the
//! `pdf` module serializes. Page-break state is carried in an explicit
//! [`Cursor`] value that every layout step takes and returns.

mod table;

use serde::Deserialize;

use crate::capture::CapturedImage;
use crate::model::{ReportData, ReportMetadata};

pub use table::TableKind;
use table::{fmt_dims, fmt_percent, fmt_weight};

/// Every constant the layout uses. Defaults reproduce the landscape A4 report;
/// tests override row pitch and margins to get small page capacities.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_x: f32,
    /// Cursor position at the top of a continuation page.
    pub top_margin: f32,
    /// No row may extend below this offset.
    pub page_bottom: f32,

    pub title_y: f32,
    pub title_size: f32,
    /// Date, container, volume, weight, item-count lines.
    pub info_line_ys: [f32; 5],
    pub info_size: f32,

    pub image_y: f32,
    pub image_height: f32,

    /// Gap between the image block and the packed-items title.
    pub table_gap: f32,
    pub section_title_size: f32,
    /// Advance from a section title to its column-header row.
    pub section_title_advance: f32,
    pub column_header_size: f32,
    /// Advance from the column-header baseline to the separator rule.
    pub header_rule_offset: f32,
    /// Advance from the separator rule to the first row baseline.
    pub rule_advance: f32,
    pub row_height: f32,
    pub row_size: f32,

    pub packed_columns: [f32; 5],
    pub unpacked_columns: [f32; 4],
    pub swatch_size: f32,
    /// Space between a swatch and its color text.
    pub swatch_gap: f32,

    /// Spacing before the unpacked section when it stays on the same page.
    pub section_gap: f32,
    /// Below this much remaining space the unpacked section starts a new page.
    pub min_section_band: f32,
    pub repeat_column_headers: bool,
    /// Shown in the color column when an item has none.
    pub default_color: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 297.0,
            page_height: 210.0,
            margin_x: 15.0,
            top_margin: 15.0,
            page_bottom: 195.0,

            title_y: 15.0,
            title_size: 18.0,
            info_line_ys: [23.0, 29.0, 35.0, 41.0, 47.0],
            info_size: 11.0,

            image_y: 52.0,
            image_height: 70.0,

            table_gap: 8.0,
            section_title_size: 14.0,
            section_title_advance: 7.0,
            column_header_size: 10.0,
            header_rule_offset: 2.0,
            rule_advance: 6.0,
            row_height: 6.0,
            row_size: 9.0,

            packed_columns: [15.0, 80.0, 140.0, 175.0, 240.0],
            unpacked_columns: [15.0, 80.0, 140.0, 175.0],
            swatch_size: 3.0,
            swatch_gap: 1.5,

            section_gap: 8.0,
            min_section_band: 30.0,
            repeat_column_headers: true,
            default_color: "#cccccc".to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn table_top(&self) -> f32 {
        self.image_y + self.image_height + self.table_gap
    }

    /// Height from a section title to the bottom of its first row.
    pub fn section_lead(&self) -> f32 {
        self.section_title_advance + self.header_rule_offset + self.rule_advance + self.row_height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        text: String,
    },
    /// Horizontal separator.
    Rule { x1: f32, x2: f32, y: f32 },
    /// The captured image, stretched into the box whose top-left is (x, y).
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Filled square whose top-left is (x, y).
    Swatch {
        x: f32,
        y: f32,
        size: f32,
        rgb: [u8; 3],
    },
}

#[derive(Clone, Debug, Default)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }
}

/// Finished report: fixed-size pages plus the image embedded by value.
#[derive(Clone, Debug)]
pub struct Document {
    page_width: f32,
    page_height: f32,
    pages: Vec<Page>,
    image: CapturedImage,
}

impl Document {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_size(&self) -> (f32, f32) {
        (self.page_width, self.page_height)
    }

    pub fn image(&self) -> &CapturedImage {
        &self.image
    }
}

/// Where layout is inside the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Header,
    Table(TableKind),
}

/// Layout accumulator: current page index (0 = page 1) and vertical offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub y: f32,
    pub region: Region,
}

/// Append-only page sequence under construction.
pub(crate) struct PageSink {
    pages: Vec<Page>,
}

impl PageSink {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
        }
    }

    pub(crate) fn push(&mut self, cursor: Cursor, op: DrawOp) {
        debug_assert_eq!(cursor.page + 1, self.pages.len());
        if let Some(page) = self.pages.get_mut(cursor.page) {
            page.ops.push(op);
        }
    }

    /// Start a fresh page and move the cursor to its top margin.
    pub(crate) fn break_page(&mut self, cursor: Cursor, config: &LayoutConfig) -> Cursor {
        self.pages.push(Page::default());
        log::debug!(
            "page break at y={:.1} in {:?}: now {} pages",
            cursor.y,
            cursor.region,
            self.pages.len()
        );
        Cursor {
            page: cursor.page + 1,
            y: config.top_margin,
            region: cursor.region,
        }
    }
}

pub fn build_report(data: &ReportData, image: CapturedImage, config: &LayoutConfig) -> Document {
    let t0 = std::time::Instant::now();
    let mut sink = PageSink::new();

    let cursor = Cursor {
        page: 0,
        y: config.title_y,
        region: Region::Header,
    };
    let cursor = layout_header(&mut sink, cursor, &data.metadata, config);
    let cursor = layout_image(&mut sink, cursor, config);

    let mut cursor = cursor;
    if !data.packed.is_empty() {
        cursor = table::layout_table(&mut sink, cursor, TableKind::Packed, &data.packed, config);
    }
    if !data.unpacked.is_empty() {
        if !data.packed.is_empty() {
            cursor = section_transition(&mut sink, cursor, config);
        }
        cursor = table::layout_table(&mut sink, cursor, TableKind::Unpacked, &data.unpacked, config);
    }

    log::info!(
        "layout: {} packed + {} unpacked rows on {} pages in {:.1}ms (ended at y={:.1})",
        data.packed.len(),
        data.unpacked.len(),
        sink.pages.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
        cursor.y,
    );

    Document {
        page_width: config.page_width,
        page_height: config.page_height,
        pages: sink.pages,
        image,
    }
}

fn layout_header(
    sink: &mut PageSink,
    cursor: Cursor,
    meta: &ReportMetadata,
    config: &LayoutConfig,
) -> Cursor {
    let (l, w, h) = meta.container_dims;
    let title = DrawOp::Text {
        x: config.margin_x,
        y: config.title_y,
        size: config.title_size,
        bold: true,
        text: "Container Loading Report".to_string(),
    };
    sink.push(cursor, title);

    let lines = [
        format!("Generated: {}", meta.generated_on.format("%Y-%m-%d")),
        format!("Container: {} ({} cm)", meta.container_name, fmt_dims(l, w, h)),
        format!("Volume Utilization: {}", fmt_percent(meta.volume_utilization)),
        format!(
            "Weight Utilization: {} ({} / {})",
            fmt_percent(meta.weight_utilization),
            fmt_weight(meta.total_weight),
            fmt_weight(meta.max_weight),
        ),
        format!("Items Packed: {} / {}", meta.packed_count, meta.total_count),
    ];
    for (text, &y) in lines.into_iter().zip(config.info_line_ys.iter()) {
        sink.push(
            cursor,
            DrawOp::Text {
                x: config.margin_x,
                y,
                size: config.info_size,
                bold: false,
                text,
            },
        );
    }

    Cursor {
        y: config.info_line_ys[4],
        ..cursor
    }
}

/// Page 1 only; never repaginates.
fn layout_image(sink: &mut PageSink, cursor: Cursor, config: &LayoutConfig) -> Cursor {
    sink.push(
        cursor,
        DrawOp::Image {
            x: config.margin_x,
            y: config.image_y,
            width: config.page_width - 2.0 * config.margin_x,
            height: config.image_height,
        },
    );
    Cursor {
        y: config.table_top(),
        ..cursor
    }
}

/// Between the packed and unpacked tables: break if less than
/// `min_section_band` remains, otherwise leave `section_gap`.
fn section_transition(sink: &mut PageSink, cursor: Cursor, config: &LayoutConfig) -> Cursor {
    let remaining = config.page_bottom - cursor.y;
    if remaining < config.min_section_band {
        sink.break_page(cursor, config)
    } else {
        Cursor {
            y: cursor.y + config.section_gap,
            ..cursor
        }
    }
}
