//! CPU renderer: per-frame snapshot of the scene plus a parallel per-pixel ray pass.

pub mod aperture;
pub use aperture::*;
pub mod frame;
pub use frame::*;

use glam::{Vec2, Vec4};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

pub const BYTES_PER_PIXEL: usize = 4;

/// Enables access to pixel data from multiple threads without any safety checks.
struct PixelDataPtr(*mut u8);

impl PixelDataPtr {
    fn new(pixels: &mut Vec<u8>) -> Self {
        Self(pixels.as_mut_ptr())
    }

    unsafe fn write_pixel(&self, i: usize, color: Vec4) {
        let color = color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
        *self.0.add(i * BYTES_PER_PIXEL) = color.x as u8;
        *self.0.add(i * BYTES_PER_PIXEL + 1) = color.y as u8;
        *self.0.add(i * BYTES_PER_PIXEL + 2) = color.z as u8;
        *self.0.add(i * BYTES_PER_PIXEL + 3) = color.w as u8;
    }
}

unsafe impl Send for PixelDataPtr {}
unsafe impl Sync for PixelDataPtr {}

pub struct Renderer {
    pixels: Vec<u8>,
    samples: ApertureSamples,
    frame_idx: u32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            pixels: Vec::new(),
            samples: ApertureSamples::default(),
            frame_idx: 0,
        }
    }

    pub fn frame_idx(&self) -> u32 {
        self.frame_idx
    }

    /// Render one RGBA8 frame. Rows are distributed across threads; the returned slice is
    /// `width * height * 4` bytes, top row first.
    pub fn render(&mut self, width: u32, height: u32, params: &FrameParameters) -> &[u8] {
        self.pixels
            .resize((width * height) as usize * BYTES_PER_PIXEL, 0);

        let pixel_data_ptr = PixelDataPtr::new(&mut self.pixels);
        let samples = &self.samples;

        (0..height).into_par_iter().for_each(|y| {
            for x in 0..width {
                let ndc = Vec2::new(
                    (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
                    1.0 - (y as f32 + 0.5) / height as f32 * 2.0,
                );

                let result = params.render_pixel(samples, ndc);

                // no mutex needed, rows never alias
                unsafe {
                    pixel_data_ptr.write_pixel((y * width + x) as usize, result);
                }
            }
        });

        self.frame_idx += 1;

        self.pixels.as_ref()
    }
}
