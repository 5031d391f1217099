use image::{imageops, GrayImage, Luma, RgbaImage};
use imageproc::filter::laplacian_filter;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CaptureRegion, Direction};

/// Способ свести кадр к одному скалярному сигналу препятствия
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalMethod {
    /// Сумма яркостей всех пикселей. Препятствие затемняет белый фон.
    PixelSum,
    /// Число пикселей с ненулевым откликом дискретного лапласиана.
    Laplacian,
}

impl SignalMethod {
    pub fn measure(&self, gray: &GrayImage) -> u64 {
        match self {
            SignalMethod::PixelSum => pixel_sum(gray),
            SignalMethod::Laplacian => edge_pixel_count(gray),
        }
    }

    /// Значение сигнала для кадра без препятствия
    pub fn baseline(&self, region: &CaptureRegion) -> u64 {
        match self {
            SignalMethod::PixelSum => white_baseline(region),
            SignalMethod::Laplacian => 0,
        }
    }

    pub fn natural_direction(&self) -> Direction {
        match self {
            SignalMethod::PixelSum => Direction::Below,
            SignalMethod::Laplacian => Direction::Above,
        }
    }
}

impl fmt::Display for SignalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalMethod::PixelSum => write!(f, "pixel_sum"),
            SignalMethod::Laplacian => write!(f, "laplacian"),
        }
    }
}

pub fn to_grayscale(frame: &RgbaImage) -> GrayImage {
    imageops::grayscale(frame)
}

pub fn pixel_sum(gray: &GrayImage) -> u64 {
    gray.as_raw().iter().map(|&p| u64::from(p)).sum()
}

/// Сумма яркостей полностью белого кадра размером с область
pub fn white_baseline(region: &CaptureRegion) -> u64 {
    region.area() * 255
}

pub fn edge_pixel_count(gray: &GrayImage) -> u64 {
    laplacian_filter(gray)
        .pixels()
        .filter(|p| p.0[0] != 0)
        .count() as u64
}

/// Карта границ для отладочных дампов: |отклик| с насыщением до 255
pub fn edge_map(gray: &GrayImage) -> GrayImage {
    let response = laplacian_filter(gray);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = response.get_pixel(x, y).0[0].unsigned_abs().min(255);
        Luma([value as u8])
    })
}
