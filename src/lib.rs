pub mod capture;
mod error;
mod fonts;
pub mod model;
mod pdf;
pub mod report;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;

use capture::{CaptureConfig, CapturedImage, RenderSurface};
use model::ReportData;
use report::{Document, LayoutConfig};

const EXPORT_STEM: &str = "cargo-loading-plan";

/// `cargo-loading-plan-YYYY-MM-DD.<extension>`
pub fn export_file_name(date: NaiveDate, extension: &str) -> String {
    format!("{EXPORT_STEM}-{}.{extension}", date.format("%Y-%m-%d"))
}

/// Lay out and serialize the report in memory.
pub fn render_report(data: &ReportData, image: CapturedImage, layout: &LayoutConfig) -> Result<Vec<u8>> {
    let doc: Document = report::build_report(data, image, layout);
    pdf::render(&doc)
}

/// Capture the surface and write it as a PNG into `out_dir`.
/// Without a surface nothing is written and `Ok(None)` is returned.
pub async fn export_image<S: RenderSurface>(
    surface: Option<&S>,
    out_dir: &Path,
    date: NaiveDate,
    config: &CaptureConfig,
) -> Result<Option<PathBuf>> {
    let Some(surface) = surface else {
        log::debug!("image export skipped: no render surface");
        return Ok(None);
    };

    let image = capture::capture(surface, config).await?;
    let output = out_dir.join(export_file_name(date, "png"));
    image.write_to(&output)?;
    log::info!("wrote {} ({} bytes)", output.display(), image.png.len());
    Ok(Some(output))
}

/// Capture the surface, then lay out and write the PDF report into `out_dir`.
/// Capture completes before layout starts; the image is embedded by value.
pub async fn export_report<S: RenderSurface>(
    surface: Option<&S>,
    data: &ReportData,
    out_dir: &Path,
    capture_config: &CaptureConfig,
    layout: &LayoutConfig,
) -> Result<Option<PathBuf>> {
    let Some(surface) = surface else {
        log::debug!("report export skipped: no render surface");
        return Ok(None);
    };

    let t0 = Instant::now();
    let image = capture::capture(surface, capture_config).await?;
    let t_capture = t0.elapsed();

    let bytes = render_report(data, image, layout)?;
    let t_render = t0.elapsed();

    let output = out_dir.join(export_file_name(data.metadata.generated_on, "pdf"));
    std::fs::write(&output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: capture={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_capture.as_secs_f64() * 1000.0,
        (t_render - t_capture).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(Some(output))
}
