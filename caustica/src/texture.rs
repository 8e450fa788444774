use std::path::Path;

use derivative::Derivative;
use glam::{UVec2, Vec4};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::Result;

/// RGBA image kept in floating point, in row-major order.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Texture {
    size: UVec2,

    #[derivative(Debug = "ignore")]
    pixels: Vec<Vec4>,
}

impl Texture {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            pixels: vec![Vec4::ZERO; (size.x * size.y) as usize],
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn get(&self, pos: UVec2) -> Vec4 {
        self.pixels[self.idx(pos)]
    }

    pub fn set(&mut self, pos: UVec2, pixel: Vec4) {
        let idx = self.idx(pos);

        self.pixels[idx] = pixel;
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Vec4] {
        &mut self.pixels
    }

    /// Quantizes pixels into 8-bit channels; values are expected to be
    /// display-encoded already.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.size.x, self.size.y, |x, y| {
            let pixel = self.pixels[(y * self.size.x + x) as usize];
            let pixel = (pixel.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();

            Rgba([pixel.x as u8, pixel.y as u8, pixel.z as u8, pixel.w as u8])
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_image()
            .save_with_format(path.as_ref(), ImageFormat::Png)?;

        Ok(())
    }

    fn idx(&self, pos: UVec2) -> usize {
        assert!(pos.x < self.size.x && pos.y < self.size.y);

        (pos.y * self.size.x + pos.x) as usize
    }
}
