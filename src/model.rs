use chrono::NaiveDate;
use serde::Deserialize;

/// Cargo container as supplied by the catalog. Dimensions in centimetres,
/// weights in kilograms.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub max_weight: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Per-axis rotation in degrees as reported by the optimizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One cargo entry from the manifest. Unpacked items come back from the
/// optimizer in this shape; some optimizers leave a stale `position` on them.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoItem {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedItem {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    #[serde(default)]
    pub color: Option<String>,
    pub position: Position,
    #[serde(default)]
    pub rotation: Rotation,
}

/// Response of the external bin-packing optimizer, consumed verbatim.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedResult {
    #[serde(default)]
    pub packed_items: Vec<PackedItem>,
    #[serde(default)]
    pub unpacked_items: Vec<CargoItem>,
    /// Percentage, 0-100.
    pub volume_utilization: f64,
    /// Percentage, 0-100.
    pub weight_utilization: f64,
    pub total_weight: f64,
}

/// A table row. `position` is only ever rendered by the packed-items table.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub position: Option<Position>,
    pub color: Option<String>,
}

impl From<&PackedItem> for LineItem {
    fn from(item: &PackedItem) -> Self {
        Self {
            name: item.name.clone(),
            length: item.length,
            width: item.width,
            height: item.height,
            weight: item.weight,
            position: Some(item.position),
            color: item.color.clone(),
        }
    }
}

impl From<&CargoItem> for LineItem {
    fn from(item: &CargoItem) -> Self {
        Self {
            name: item.name.clone(),
            length: item.length,
            width: item.width,
            height: item.height,
            weight: item.weight,
            position: item.position,
            color: item.color.clone(),
        }
    }
}

/// Cover-block data for the report. Read-only input to layout.
#[derive(Clone, Debug)]
pub struct ReportMetadata {
    pub generated_on: NaiveDate,
    pub container_name: String,
    pub container_dims: (f64, f64, f64),
    pub max_weight: f64,
    pub volume_utilization: f64,
    pub weight_utilization: f64,
    pub packed_count: usize,
    pub total_count: usize,
    pub total_weight: f64,
}

impl ReportMetadata {
    pub fn new(container: &Container, result: &PackedResult, generated_on: NaiveDate) -> Self {
        Self {
            generated_on,
            container_name: container.name.clone(),
            container_dims: (container.length, container.width, container.height),
            max_weight: container.max_weight,
            volume_utilization: result.volume_utilization,
            weight_utilization: result.weight_utilization,
            packed_count: result.packed_items.len(),
            total_count: result.packed_items.len() + result.unpacked_items.len(),
            total_weight: result.total_weight,
        }
    }
}

/// Everything the report engine needs besides the captured image.
#[derive(Clone, Debug)]
pub struct ReportData {
    pub metadata: ReportMetadata,
    pub packed: Vec<LineItem>,
    pub unpacked: Vec<LineItem>,
}

impl ReportData {
    pub fn new(container: &Container, result: &PackedResult, generated_on: NaiveDate) -> Self {
        Self {
            metadata: ReportMetadata::new(container, result, generated_on),
            packed: result.packed_items.iter().map(LineItem::from).collect(),
            unpacked: result.unpacked_items.iter().map(LineItem::from).collect(),
        }
    }
}

/// Input file shape for the CLI: the chosen container plus the optimizer's
/// response.
#[derive(Clone, Debug, Deserialize)]
pub struct LoadPlan {
    pub container: Container,
    pub result: PackedResult,
}
