// lut.rs — asin / atan2 查找表
//
// 每像素的 asin/atan2 太贵，这里预先把 [-1, 1) 离散成 2A 个桶。

use crate::error::{Result, ViewerError};

pub struct TrigTables {
    accuracy: usize,
    factor: f64,
    size: usize,
    asin: Vec<f32>,
    /// Row-major: entry `j + i * size` holds `atan2(value(i), value(j))`.
    atan2: Vec<f32>,
}

impl TrigTables {
    pub fn new(accuracy: usize) -> Result<Self> {
        if accuracy == 0 {
            return Err(ViewerError::InvalidAccuracy(accuracy));
        }
        let factor = accuracy as f64;
        let size = 2 * accuracy;
        let value = |i: usize| (i as f64 - factor) / factor;

        let asin = (0..size).map(|i| value(i).asin() as f32).collect();

        let mut atan2 = Vec::with_capacity(size * size);
        for i in 0..size {
            let y = value(i);
            for j in 0..size {
                atan2.push(y.atan2(value(j)) as f32);
            }
        }

        Ok(Self {
            accuracy,
            factor,
            size,
            asin,
            atan2,
        })
    }

    pub fn accuracy(&self) -> usize {
        self.accuracy
    }

    /// Number of buckets per axis (`2A`).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bucket for `v`: `floor((v + 1) * A)`, clamped to `[0, 2A - 1]`.
    /// Rounding can push rotated components slightly past ±1, and `+1.0`
    /// itself lands one past the end.
    #[inline]
    pub fn index(&self, v: f64) -> usize {
        let i = ((v + 1.0) * self.factor).floor();
        // NaN 转换为 0
        (i as isize).clamp(0, self.size as isize - 1) as usize
    }

    #[inline]
    pub fn asin_at(&self, index: usize) -> f64 {
        self.asin[index] as f64
    }

    /// `atan2(value(y_index), value(x_index))`.
    #[inline]
    pub fn atan2_at(&self, y_index: usize, x_index: usize) -> f64 {
        self.atan2[x_index + y_index * self.size] as f64
    }

    pub fn asin(&self, v: f64) -> f64 {
        self.asin_at(self.index(v))
    }

    pub fn atan2(&self, y: f64, x: f64) -> f64 {
        self.atan2_at(self.index(y), self.index(x))
    }

    /// Heap held by both tables.
    pub fn memory_bytes(&self) -> usize {
        (self.asin.len() + self.atan2.len()) * std::mem::size_of::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_table_sizes() {
        let tables = TrigTables::new(64).unwrap();
        assert_eq!(tables.size(), 128);
        assert_eq!(tables.memory_bytes(), (128 + 128 * 128) * 4);
    }

    #[test]
    fn test_rejects_zero_accuracy() {
        assert!(matches!(
            TrigTables::new(0),
            Err(ViewerError::InvalidAccuracy(0))
        ));
    }

    #[test]
    fn test_index_clamps() {
        let tables = TrigTables::new(16).unwrap();
        assert_eq!(tables.index(-1.0), 0);
        assert_eq!(tables.index(0.0), 16);
        assert_eq!(tables.index(1.0), 31);
        assert_eq!(tables.index(1.0 + 1e-12), 31);
        assert_eq!(tables.index(-1.0 - 1e-12), 0);
        assert_eq!(tables.index(5.0), 31);
        assert_eq!(tables.index(f64::NAN), 0);
    }

    #[test]
    fn test_asin_accuracy() {
        let tables = TrigTables::new(2048).unwrap();
        let step = 1.0 / 2048.0;
        for v in [-1.0f64, -0.5, 0.0, 0.5, 0.999] {
            // floor 取桶下沿，误差不超过一个桶宽内 asin 的增量
            let lower = (v - step).max(-1.0);
            let bound = v.asin() - lower.asin() + 1e-6;
            let err = (tables.asin(v) - v.asin()).abs();
            assert!(err <= bound, "asin({v}): err {err} > {bound}");
        }
        // 远离极点时误差约为 1/A
        for v in [-0.5f64, 0.0, 0.5] {
            assert!((tables.asin(v) - v.asin()).abs() < step);
        }
    }

    #[test]
    fn test_atan2_layout() {
        let tables = TrigTables::new(256).unwrap();
        assert!((tables.atan2(0.0, 0.5) - 0.0).abs() < 1e-6);
        assert!((tables.atan2(0.5, 0.0) - FRAC_PI_2).abs() < 1e-6);
        assert!((tables.atan2(-0.5, 0.0) + FRAC_PI_2).abs() < 1e-6);
        assert!((tables.atan2(0.0, -0.5) - PI).abs() < 1e-6);
        assert!((tables.atan2(0.3, 0.7) - 0.3f64.atan2(0.7)).abs() < 2.0 / 256.0);
    }
}
