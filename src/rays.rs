// rays.rs — 每个输出像素的相机空间视线方向
//
// 与旋转无关，只依赖视口尺寸和 FOV，因此只算一次，每帧复用。

use crate::config::{validate_fov, validate_viewport};
use crate::error::Result;
use glam::DVec3;

pub struct RayField {
    width: u32,
    height: u32,
    fov_degrees: f64,
    rays: Vec<DVec3>,
}

impl RayField {
    pub fn new(width: u32, height: u32, fov_degrees: f64) -> Result<Self> {
        validate_viewport(width, height)?;
        validate_fov(fov_degrees)?;

        // 与整数像素中心对齐：奇数宽度时中心列的 x 分量恰为 0
        let half_w = (width / 2) as f64;
        let half_h = (height / 2) as f64;
        let camera_plane_distance = half_w / (fov_degrees.to_radians() / 2.0).tan();

        let mut rays = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let v = DVec3::new(x as f64 - half_w, y as f64 - half_h, camera_plane_distance);
                rays.push(v / v.length());
            }
        }

        Ok(Self {
            width,
            height,
            fov_degrees,
            rays,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fov_degrees(&self) -> f64 {
        self.fov_degrees
    }

    pub fn get(&self, x: u32, y: u32) -> DVec3 {
        self.rays[y as usize * self.width as usize + x as usize]
    }

    /// Rays of row `y`, left to right.
    pub fn row(&self, y: u32) -> &[DVec3] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.rays[start..start + w]
    }

    /// Rebuild for a new viewport; returns `self` unchanged when nothing differs.
    pub fn rebuild(self, width: u32, height: u32, fov_degrees: f64) -> Result<Self> {
        if width == self.width && height == self.height && fov_degrees == self.fov_degrees {
            return Ok(self);
        }
        Self::new(width, height, fov_degrees)
    }
}
