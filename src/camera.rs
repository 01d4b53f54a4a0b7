// camera.rs — 视角状态：鼠标位置 → 目标旋转 → 平滑后的当前旋转

use crate::config::{SmoothingMode, ViewerConfig};
use std::time::Duration;

/// Below this gap (radians) the current angle snaps onto the target.
const SETTLE_EPSILON: f64 = 1e-12;

/// Look direction used for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    /// Tilt around the horizontal axis.
    pub x: f64,
    /// Pan around the vertical axis.
    pub y: f64,
}

/// Sines and cosines of a [`Rotation`], computed once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTrig {
    pub sin_x: f64,
    pub cos_x: f64,
    pub sin_y: f64,
    pub cos_y: f64,
}

impl Rotation {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn trig(&self) -> RotationTrig {
        let (sin_x, cos_x) = self.x.sin_cos();
        let (sin_y, cos_y) = self.y.sin_cos();
        RotationTrig {
            sin_x,
            cos_x,
            sin_y,
            cos_y,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraState {
    pub target: Rotation,
    pub current: Rotation,
    viewport: (u32, u32),
    sensitivity: f64,
    smoothing: f64,
    mode: SmoothingMode,
}

impl CameraState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            target: Rotation::default(),
            current: Rotation::default(),
            viewport: (config.width, config.height),
            sensitivity: config.sensitivity,
            smoothing: config.smoothing,
            mode: config.smoothing_mode,
        }
    }

    pub fn smoothing_mode(&self) -> SmoothingMode {
        self.mode
    }

    /// Pointer drag at `(px, py)` in viewport pixels. Angles are not clamped:
    /// the projection is periodic.
    pub fn pointer(&mut self, px: f64, py: f64) {
        let half_w = (self.viewport.0 / 2) as f64;
        let half_h = (self.viewport.1 / 2) as f64;
        self.target.x = (py - half_h) * self.sensitivity;
        self.target.y = (px - half_w) * self.sensitivity;
    }

    /// One render tick. `elapsed` is only consulted in time-based mode.
    pub fn advance(&mut self, elapsed: Duration) {
        let alpha = match self.mode {
            SmoothingMode::PerFrame => self.smoothing,
            SmoothingMode::TimeBased { reference_fps } => {
                let frames = elapsed.as_secs_f64() * reference_fps;
                1.0 - (1.0 - self.smoothing).powf(frames)
            }
        };
        self.current.x = approach(self.current.x, self.target.x, alpha);
        self.current.y = approach(self.current.y, self.target.y, alpha);
    }

    /// Current rotation, advanced by one tick, ready for a render pass.
    pub fn tick(&mut self, elapsed: Duration) -> Rotation {
        self.advance(elapsed);
        self.snapshot()
    }

    pub fn snapshot(&self) -> Rotation {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    pub fn reset(&mut self) {
        self.target = Rotation::default();
        self.current = Rotation::default();
    }
}

fn approach(current: f64, target: f64, alpha: f64) -> f64 {
    let next = current + (target - current) * alpha;
    if (target - next).abs() < SETTLE_EPSILON {
        target
    } else {
        next
    }
}
