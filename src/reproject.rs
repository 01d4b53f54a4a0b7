// reproject.rs — 核心：旋转视线 → 球面 UV → 采样全景图
//
// 每个像素只依赖自己的视线和只读的共享状态，所以按行块并行，结果与串行逐位一致。

use crate::camera::{Rotation, RotationTrig};
use crate::config::{ExecutionStrategy, ViewerConfig};
use crate::error::{Result, ViewerError};
use crate::lut::TrigTables;
use crate::panorama::{DestinationFrame, SourcePanorama};
use crate::rays::RayField;
use glam::DVec3;
use rayon::prelude::*;
use std::f64::consts::PI;

const INV_PI: f64 = 1.0 / PI;
const INV_2PI: f64 = 1.0 / (2.0 * PI);

/// Equirectangular sampling coordinates: `u` is longitude with 0.5 straight
/// ahead, `v` is latitude with 1 at the top pole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uv {
    pub u: f64,
    pub v: f64,
}

pub struct Reprojector {
    source: SourcePanorama,
    rays: RayField,
    tables: TrigTables,
    strategy: ExecutionStrategy,
    rows_per_task: usize,
    pool: Option<rayon::ThreadPool>,
}

impl Reprojector {
    pub fn new(source: SourcePanorama, config: &ViewerConfig) -> Result<Self> {
        config.validate()?;
        let rays = RayField::new(config.width, config.height, config.fov_degrees)?;
        let tables = TrigTables::new(config.accuracy)?;
        Self::with_parts(source, rays, tables, config)
    }

    /// Assemble from prebuilt parts, e.g. to share tables across viewports.
    pub fn with_parts(
        source: SourcePanorama,
        rays: RayField,
        tables: TrigTables,
        config: &ViewerConfig,
    ) -> Result<Self> {
        if config.rows_per_task == 0 {
            return Err(ViewerError::InvalidRowsPerTask);
        }
        let pool = match config.workers {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("reproject-{i}"))
                    .build()?,
            ),
            None => None,
        };
        Ok(Self {
            source,
            rays,
            tables,
            strategy: config.execution,
            rows_per_task: config.rows_per_task,
            pool,
        })
    }

    pub fn source(&self) -> &SourcePanorama {
        &self.source
    }

    pub fn rays(&self) -> &RayField {
        &self.rays
    }

    pub fn tables(&self) -> &TrigTables {
        &self.tables
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: ExecutionStrategy) {
        self.strategy = strategy;
    }

    /// Worker threads a parallel pass will use.
    pub fn workers(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// A frame matching the ray field's viewport.
    pub fn new_frame(&self) -> Result<DestinationFrame> {
        DestinationFrame::new(self.rays.width(), self.rays.height())
    }

    /// Rotate `ray` (X tilt first, then Y pan) and map it to sphere UV.
    #[inline]
    pub fn project(&self, ray: DVec3, trig: &RotationTrig) -> Uv {
        let (vx, vy, vz) = (ray.x, ray.y, ray.z);

        // 绕 X 轴
        let vz1 = vz * trig.cos_x - vy * trig.sin_x;
        let vy1 = vz * trig.sin_x + vy * trig.cos_x;
        // 绕 Y 轴，使用更新后的 z
        let vz2 = vz1 * trig.cos_y - vx * trig.sin_y;
        let vx1 = vz1 * trig.sin_y + vx * trig.cos_y;

        let ix = self.tables.index(vx1);
        let iy = self.tables.index(vy1);
        let iz = self.tables.index(vz2);

        Uv {
            u: 0.5 + self.tables.atan2_at(ix, iz) * INV_2PI,
            v: 0.5 - self.tables.asin_at(iy) * INV_PI,
        }
    }

    /// Source texel for `uv`: longitude wraps, latitude clamps.
    #[inline]
    pub fn texel(&self, uv: Uv) -> (u32, u32) {
        let sw = self.source.width() as i64;
        let sh = self.source.height() as i64;
        let tx = ((sw as f64 * uv.u).floor() as i64).rem_euclid(sw);
        let ty = ((sh as f64 * (1.0 - uv.v)).floor() as i64).clamp(0, sh - 1);
        (tx as u32, ty as u32)
    }

    #[inline]
    fn shade(&self, ray: DVec3, trig: &RotationTrig) -> u32 {
        let (tx, ty) = self.texel(self.project(ray, trig));
        self.source.get(tx, ty)
    }

    fn fill_rows(&self, first_row: u32, out: &mut [u32], trig: &RotationTrig) {
        let w = self.rays.width() as usize;
        for (dy, row_out) in out.chunks_exact_mut(w).enumerate() {
            let rays = self.rays.row(first_row + dy as u32);
            for (dst, &ray) in row_out.iter_mut().zip(rays) {
                *dst = self.shade(ray, trig);
            }
        }
    }

    /// One full pass for `rotation`; every destination pixel is written once.
    pub fn render(&self, rotation: &Rotation, frame: &mut DestinationFrame) -> Result<()> {
        let expected = (self.rays.width(), self.rays.height());
        let actual = (frame.width(), frame.height());
        if expected != actual {
            return Err(ViewerError::FrameSizeMismatch { expected, actual });
        }

        let trig = rotation.trig();
        let out = frame.pixels_mut();
        match self.strategy {
            ExecutionStrategy::Sequential => self.fill_rows(0, out, &trig),
            ExecutionStrategy::Parallel => {
                let rows = self.rows_per_task;
                let chunk = rows * self.rays.width() as usize;
                let fill = |(i, block): (usize, &mut [u32])| {
                    self.fill_rows((i * rows) as u32, block, &trig);
                };
                match &self.pool {
                    Some(pool) => {
                        pool.install(|| out.par_chunks_mut(chunk).enumerate().for_each(fill))
                    }
                    None => out.par_chunks_mut(chunk).enumerate().for_each(fill),
                }
            }
        }
        Ok(())
    }
}
