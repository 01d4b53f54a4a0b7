// panorama.rs — 等距柱状全景源图与输出帧（0x00RRGGBB 打包像素）

use crate::config::validate_viewport;
use crate::error::{Result, ViewerError};
use image::RgbImage;
use std::path::Path;

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn unpack_rgb(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// Full 360°×180° equirectangular source image, row-major.
#[derive(Debug, Clone)]
pub struct SourcePanorama {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl SourcePanorama {
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ViewerError::EmptyImage { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ViewerError::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_rgb_image(img: &RgbImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        let pixels = img.pixels().map(|p| pack_rgb(p[0], p[1], p[2])).collect();
        Self::from_raw(width, height, pixels)
    }

    /// Decode an image file (any format the `image` crate knows) and drop alpha.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|source| ViewerError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_rgb_image(&img.to_rgb8())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Viewport-sized output buffer, rewritten by every render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationFrame {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl DestinationFrame {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        validate_viewport(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Little-endian bytes of the packed pixels, i.e. B, G, R, 0 per pixel.
    pub fn as_bgra_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.pixels.as_slice())
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(unpack_rgb(self.get(x, y)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_roundtrip() {
        let c = pack_rgb(0x12, 0x34, 0x56);
        assert_eq!(c, 0x0012_3456);
        assert_eq!(unpack_rgb(c), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_from_rgb_image() {
        let img = RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 7]));
        let pano = SourcePanorama::from_rgb_image(&img).unwrap();
        assert_eq!((pano.width(), pano.height()), (3, 2));
        assert_eq!(pano.get(2, 1), pack_rgb(2, 1, 7));
    }

    #[test]
    fn test_rejects_empty_image() {
        let img = RgbImage::new(0, 4);
        assert!(matches!(
            SourcePanorama::from_rgb_image(&img),
            Err(ViewerError::EmptyImage { width: 0, height: 4 })
        ));
        assert!(matches!(
            SourcePanorama::from_raw(2, 2, vec![0; 3]),
            Err(ViewerError::PixelCountMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let err = SourcePanorama::open(Path::new("does/not/exist.jpg")).unwrap_err();
        assert!(matches!(err, ViewerError::ImageLoad { .. }));
    }

    #[test]
    fn test_frame_bytes() {
        let mut frame = DestinationFrame::new(2, 1).unwrap();
        frame.pixels_mut()[1] = pack_rgb(1, 2, 3);
        let bytes = frame.as_bgra_bytes();
        assert_eq!(bytes.len(), 8);
        if cfg!(target_endian = "little") {
            assert_eq!(&bytes[4..], &[3, 2, 1, 0]);
        }
        assert_eq!(frame.to_rgb_image().get_pixel(1, 0).0, [1, 2, 3]);
        assert!(DestinationFrame::new(0, 1).is_err());
    }
}
