// lib.rs — 全景重投影核心（不依赖窗口 / GPU）
//
// 视线场 + 查找表 + 相机旋转 → 逐像素采样等距柱状全景图。

pub mod camera;
pub mod config;
pub mod error;
pub mod lut;
pub mod panorama;
pub mod rays;
pub mod reproject;

pub use camera::{CameraState, Rotation, RotationTrig};
pub use config::{ExecutionStrategy, SmoothingMode, ViewerConfig};
pub use error::{Result, ViewerError};
pub use lut::TrigTables;
pub use panorama::{pack_rgb, unpack_rgb, DestinationFrame, SourcePanorama};
pub use rays::RayField;
pub use reproject::{Reprojector, Uv};
