// error.rs — 核心库错误类型

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("degenerate viewport {width}x{height}: width and height must be positive")]
    DegenerateViewport { width: u32, height: u32 },

    #[error("field of view {0}° is outside (0°, 180°)")]
    InvalidFieldOfView(f64),

    #[error("lookup table accuracy factor must be at least 1 (got {0})")]
    InvalidAccuracy(usize),

    #[error("smoothing factor {0} is outside (0, 1]")]
    InvalidSmoothing(f64),

    #[error("time-based smoothing reference rate {0} fps must be positive")]
    InvalidReferenceFps(f64),

    #[error("rotation sensitivity {0} must be finite")]
    InvalidSensitivity(f64),

    #[error("rows per parallel task must be at least 1")]
    InvalidRowsPerTask,

    #[error("panorama has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("panorama buffer holds {actual} pixels, expected {expected}")]
    PixelCountMismatch { expected: usize, actual: usize },

    #[error("failed to load panorama {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("frame is {actual:?} but the ray field was built for {expected:?}")]
    FrameSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
