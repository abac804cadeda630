//! CPU raster painter.
//!
//! The nested-loop rendition of the per-pixel model: every frame walks the
//! surface and evaluates the scene's pure shading function into an RGBA8
//! buffer, which the blit pipeline then presents. Slower than the GPU path
//! but exercises exactly the reference field math.

use fieldgen::Scene;

use crate::types::SurfaceExtent;

pub(crate) struct CpuPainter {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl CpuPainter {
    pub fn new(extent: SurfaceExtent) -> Self {
        let width = extent.width.max(1);
        let height = extent.height.max(1);
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    pub fn resize(&mut self, extent: SurfaceExtent) {
        self.width = extent.width.max(1);
        self.height = extent.height.max(1);
        self.pixels
            .resize((self.width * self.height * 4) as usize, 0);
    }

    /// Shades every pixel for the current field state and returns the
    /// packed buffer, rows top to bottom.
    pub fn paint(&mut self, scene: &Scene, fade: f32) -> &[u8] {
        let mut offset = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let color = scene.shade_pixel(x, y).scale(fade);
                self.pixels[offset..offset + 4].copy_from_slice(&color.to_bytes());
                offset += 4;
            }
        }
        &self.pixels
    }
}
