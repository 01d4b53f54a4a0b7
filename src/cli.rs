// cli.rs — 命令行参数：JSON 配置文件 + 单项覆盖

use anyhow::{Context, Result};
use clap::Parser;
use sphere_viewer::{ExecutionStrategy, SmoothingMode, ViewerConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sphere_viewer")]
#[command(about = "360° equirectangular panorama viewer (drag to look around)")]
pub struct Cli {
    /// Panorama image; a file dialog opens when omitted
    pub image: Option<PathBuf>,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Horizontal field of view in degrees
    #[arg(long)]
    pub fov: Option<f64>,

    /// Lookup table accuracy factor
    #[arg(long)]
    pub accuracy: Option<usize>,

    /// Radians of rotation per pixel of pointer offset
    #[arg(long)]
    pub sensitivity: Option<f64>,

    /// Smoothing factor in (0, 1]
    #[arg(long)]
    pub smoothing: Option<f64>,

    /// Scale smoothing by elapsed time, calibrated to this frame rate
    #[arg(long, value_name = "FPS")]
    pub time_smoothing: Option<f64>,

    /// Render on a single thread
    #[arg(long, default_value = "false")]
    pub sequential: bool,

    /// Fixed number of render workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Rows handed to each parallel task
    #[arg(long)]
    pub rows_per_task: Option<usize>,
}

impl Cli {
    pub fn resolve_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ViewerConfig::default(),
        };

        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if let Some(v) = self.fov {
            config.fov_degrees = v;
        }
        if let Some(v) = self.accuracy {
            config.accuracy = v;
        }
        if let Some(v) = self.sensitivity {
            config.sensitivity = v;
        }
        if let Some(v) = self.smoothing {
            config.smoothing = v;
        }
        if let Some(fps) = self.time_smoothing {
            config.smoothing_mode = SmoothingMode::TimeBased { reference_fps: fps };
        }
        if self.sequential {
            config.execution = ExecutionStrategy::Sequential;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        if let Some(v) = self.rows_per_task {
            config.rows_per_task = v;
        }

        config.validate().context("invalid viewer configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "sphere_viewer",
            "pano.jpg",
            "--width",
            "640",
            "--fov",
            "90",
            "--sequential",
            "--time-smoothing",
            "60",
        ]);
        assert_eq!(cli.image, Some(PathBuf::from("pano.jpg")));
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 1000);
        assert_eq!(config.fov_degrees, 90.0);
        assert_eq!(config.execution, ExecutionStrategy::Sequential);
        assert_eq!(
            config.smoothing_mode,
            SmoothingMode::TimeBased { reference_fps: 60.0 }
        );
    }

    #[test]
    fn test_rejects_zero_viewport() {
        let cli = Cli::parse_from(["sphere_viewer", "--height", "0"]);
        assert!(cli.image.is_none());
        assert!(cli.resolve_config().is_err());
    }
}
