//! Settled, upscaled still captures of a live render surface.
//!
//! A capture waits for the host's next paint boundary, drains the GPU command
//! queue when the surface is hardware-backed, and only then reads pixels back.
//! The readback is composited over opaque white at `scale`× and PNG-encoded.

use std::future::Future;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use base64::Engine as _;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Command queue of a hardware-accelerated rendering context.
pub trait CommandQueue {
    /// Block until every submitted command has executed.
    fn finish(&self);
}

/// A drawable owned by an external rendering subsystem.
///
/// Implementors expose the two-step "next committed frame" protocol:
/// [`next_frame`](RenderSurface::next_frame) resolves once the current frame's
/// draw commands are queued, and [`command_queue`](RenderSurface::command_queue)
/// hands out the queue to drain before readback.
pub trait RenderSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resolves after the host's next paint/animation boundary.
    fn next_frame(&self) -> impl Future<Output = ()>;

    /// `None` for plain raster surfaces.
    fn command_queue(&self) -> Option<&dyn CommandQueue> {
        None
    }

    /// Read back the current pixels. Called only once the frame is settled.
    fn read_pixels(&self) -> RgbaImage;
}

/// A raster surface holding a fixed frame. Used for frames dumped to disk by
/// a viewer and as a stand-in surface in tests.
pub struct ImageSurface {
    pixels: RgbaImage,
}

impl ImageSurface {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let pixels = image::open(path)?.to_rgba8();
        Ok(Self { pixels })
    }

    pub fn from_png_bytes(data: &[u8]) -> Result<Self> {
        let pixels = image::load_from_memory_with_format(data, image::ImageFormat::Png)?.to_rgba8();
        Ok(Self { pixels })
    }
}

impl RenderSurface for ImageSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn next_frame(&self) -> impl Future<Output = ()> {
        std::future::ready(())
    }

    fn read_pixels(&self) -> RgbaImage {
        self.pixels.clone()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CaptureConfig {
    /// Integer upscale factor applied to both axes.
    pub scale: u32,
    /// Largest destination buffer (in pixels) we are willing to allocate.
    /// Anything bigger takes the 1× fallback.
    pub max_pixels: u64,
}

impl CaptureConfig {
    pub const DEFAULT_SCALE: u32 = 2;
    pub const DEFAULT_MAX_PIXELS: u64 = 16384 * 16384;
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
            max_pixels: Self::DEFAULT_MAX_PIXELS,
        }
    }
}

/// PNG-encoded snapshot. Owned by the caller; the surface is not referenced.
#[derive(Clone, Debug)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    /// Factor actually applied; 1 when the fallback path was taken.
    pub scale: u32,
    pub png: Vec<u8>,
}

impl CapturedImage {
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.png).map_err(Error::Io)
    }
}

pub async fn capture<S: RenderSurface>(surface: &S, config: &CaptureConfig) -> Result<CapturedImage> {
    let (w, h) = (surface.width(), surface.height());
    if w == 0 || h == 0 {
        return Err(Error::EmptySurface {
            width: w,
            height: h,
        });
    }

    surface.next_frame().await;
    if let Some(queue) = surface.command_queue() {
        queue.finish();
    }

    let t0 = Instant::now();
    let source = surface.read_pixels();
    if source.dimensions() != (w, h) {
        return Err(Error::Readback {
            expected: (w, h),
            got: source.dimensions(),
        });
    }

    let captured = match upscale_onto_white(&source, config) {
        Some(dest) => CapturedImage {
            width: dest.width(),
            height: dest.height(),
            scale: config.scale,
            png: encode_png(&dest)?,
        },
        None => {
            log::warn!(
                "capture: cannot allocate {}x scale buffer for {w}x{h}, encoding at 1x",
                config.scale
            );
            CapturedImage {
                width: w,
                height: h,
                scale: 1,
                png: encode_png(&source)?,
            }
        }
    };

    log::info!(
        "capture: {w}x{h} -> {}x{} in {:.1}ms ({} bytes)",
        captured.width,
        captured.height,
        t0.elapsed().as_secs_f64() * 1000.0,
        captured.png.len(),
    );
    Ok(captured)
}

/// Allocate the destination, fill it opaque white, then draw the source
/// stretched to cover it. `None` when the destination cannot be allocated.
fn upscale_onto_white(source: &RgbaImage, config: &CaptureConfig) -> Option<RgbaImage> {
    if config.scale == 0 {
        return None;
    }
    let dw = source.width().checked_mul(config.scale)?;
    let dh = source.height().checked_mul(config.scale)?;
    if u64::from(dw) * u64::from(dh) > config.max_pixels {
        return None;
    }

    let mut dest = RgbaImage::from_pixel(dw, dh, Rgba([255, 255, 255, 255]));
    let scaled = imageops::resize(source, dw, dh, FilterType::Triangle);
    imageops::overlay(&mut dest, &scaled, 0, 0);
    Some(dest)
}

fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive);
    encoder.write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)?;
    Ok(buf.into_inner())
}
