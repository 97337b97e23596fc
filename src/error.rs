use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid input: {0}")]
    Json(#[from] serde_json::Error),

    /// Capture was requested for a surface with no pixels.
    #[error("render surface is empty ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    /// The surface handed back a frame of a different size than it reported.
    #[error("surface readback was {got:?}, expected {expected:?}")]
    Readback {
        expected: (u32, u32),
        got: (u32, u32),
    },
}
