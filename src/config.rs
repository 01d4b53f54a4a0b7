// config.rs — 启动配置（默认值 / JSON 文件 / 校验）

use crate::error::{Result, ViewerError};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_FOV_DEGREES: f64 = 110.0;
pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 1000;
pub const DEFAULT_ACCURACY: usize = 2048;
pub const DEFAULT_SENSITIVITY: f64 = 0.025;
pub const DEFAULT_SMOOTHING: f64 = 0.1;

/// How the per-pixel fill is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Plain nested loop on the calling thread.
    Sequential,
    /// Row blocks distributed over a rayon pool.
    #[default]
    Parallel,
}

impl ExecutionStrategy {
    pub fn toggle(self) -> Self {
        match self {
            ExecutionStrategy::Sequential => ExecutionStrategy::Parallel,
            ExecutionStrategy::Parallel => ExecutionStrategy::Sequential,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExecutionStrategy::Sequential => "sequential",
            ExecutionStrategy::Parallel => "parallel",
        }
    }
}

/// How the camera approaches its target rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum SmoothingMode {
    /// One smoothing step per rendered frame, whatever the frame took.
    #[default]
    PerFrame,
    /// Step scaled by elapsed time; matches `PerFrame` when rendering at
    /// `reference_fps`.
    TimeBased { reference_fps: f64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub fov_degrees: f64,
    pub width: u32,
    pub height: u32,
    /// Lookup table accuracy factor `A`; tables cover `[-1, 1)` in `2A` buckets.
    pub accuracy: usize,
    /// Radians of rotation per pixel of pointer offset from the viewport center.
    pub sensitivity: f64,
    pub smoothing: f64,
    pub smoothing_mode: SmoothingMode,
    pub execution: ExecutionStrategy,
    /// Fixed worker count for the parallel strategy; `None` uses every core.
    pub workers: Option<usize>,
    pub rows_per_task: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            accuracy: DEFAULT_ACCURACY,
            sensitivity: DEFAULT_SENSITIVITY,
            smoothing: DEFAULT_SMOOTHING,
            smoothing_mode: SmoothingMode::PerFrame,
            execution: ExecutionStrategy::Parallel,
            workers: None,
            rows_per_task: 1,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ViewerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        validate_viewport(self.width, self.height)?;
        validate_fov(self.fov_degrees)?;
        if self.accuracy == 0 {
            return Err(ViewerError::InvalidAccuracy(self.accuracy));
        }
        if !self.sensitivity.is_finite() {
            return Err(ViewerError::InvalidSensitivity(self.sensitivity));
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ViewerError::InvalidSmoothing(self.smoothing));
        }
        if let SmoothingMode::TimeBased { reference_fps } = self.smoothing_mode {
            if !(reference_fps.is_finite() && reference_fps > 0.0) {
                return Err(ViewerError::InvalidReferenceFps(reference_fps));
            }
        }
        if self.rows_per_task == 0 {
            return Err(ViewerError::InvalidRowsPerTask);
        }
        Ok(())
    }
}

pub(crate) fn validate_viewport(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ViewerError::DegenerateViewport { width, height });
    }
    Ok(())
}

pub(crate) fn validate_fov(fov_degrees: f64) -> Result<()> {
    // tan(fov/2) 在 180° 处奇异
    if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
        return Err(ViewerError::InvalidFieldOfView(fov_degrees));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.width, 1000);
        assert_eq!(config.height, 1000);
        assert_eq!(config.accuracy, 2048);
        assert_eq!(config.fov_degrees, 110.0);
        assert_eq!(config.sensitivity, 0.025);
        assert_eq!(config.smoothing, 0.1);
        assert_eq!(config.execution, ExecutionStrategy::Parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json_str(
            r#"{ "width": 640, "execution": "sequential", "smoothing_mode": { "mode": "time_based", "reference_fps": 60.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.execution, ExecutionStrategy::Sequential);
        assert_eq!(
            config.smoothing_mode,
            SmoothingMode::TimeBased { reference_fps: 60.0 }
        );
    }

    #[test]
    fn test_rejects_degenerate_viewport() {
        let err = ViewerConfig::from_json_str(r#"{ "height": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ViewerError::DegenerateViewport { width: 1000, height: 0 }
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = ViewerConfig::default();
        config.fov_degrees = 180.0;
        assert!(matches!(config.validate(), Err(ViewerError::InvalidFieldOfView(_))));

        let mut config = ViewerConfig::default();
        config.smoothing = 0.0;
        assert!(matches!(config.validate(), Err(ViewerError::InvalidSmoothing(_))));

        let mut config = ViewerConfig::default();
        config.accuracy = 0;
        assert!(matches!(config.validate(), Err(ViewerError::InvalidAccuracy(0))));

        let mut config = ViewerConfig::default();
        config.rows_per_task = 0;
        assert!(matches!(config.validate(), Err(ViewerError::InvalidRowsPerTask)));

        let mut config = ViewerConfig::default();
        config.sensitivity = f64::NAN;
        assert!(matches!(config.validate(), Err(ViewerError::InvalidSensitivity(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ViewerConfig::from_json_str("{ width: }"),
            Err(ViewerError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_strategy_toggle() {
        assert_eq!(ExecutionStrategy::Parallel.toggle(), ExecutionStrategy::Sequential);
        assert_eq!(ExecutionStrategy::Sequential.toggle().label(), "parallel");
    }
}
