use crate::error::{DinoError, Result};
use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Прямоугольник экрана, который опрашивается каждую итерацию
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn new(top: u32, left: u32, width: u32, height: u32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Проверить, что область целиком лежит внутри кадра `width` x `height`
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        match (
            self.left.checked_add(self.width),
            self.top.checked_add(self.height),
        ) {
            (Some(right), Some(bottom)) => right <= width && bottom <= height,
            _ => false,
        }
    }

    /// Вырезать область из полного снимка монитора
    pub fn crop(&self, screenshot: &RgbaImage) -> Result<RgbaImage> {
        let (width, height) = screenshot.dimensions();
        if self.is_empty() || !self.fits_within(width, height) {
            return Err(DinoError::RegionOutOfBounds {
                region: *self,
                width,
                height,
            });
        }

        Ok(imageops::crop_imm(screenshot, self.left, self.top, self.width, self.height).to_image())
    }
}

impl fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.left, self.top
        )
    }
}
