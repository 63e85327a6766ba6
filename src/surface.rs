use anyhow::{Context, Result};
use image::ImageEncoder;
use log::debug;

/// A detached, invisible render surface: an owned RGB8 buffer that plotters
/// draws into and that rasterizes to raw pixels.
///
/// Acquisition is scoped; the buffer is released when the surface drops, on
/// every exit path, success or failure.
pub struct RenderSurface {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
}

impl RenderSurface {
    /// Allocate a surface of `logical` pixels rasterized at `density`x.
    pub fn acquire(logical: (u32, u32), density: u32) -> Self {
        let width = logical.0 * density;
        let height = logical.1 * density;
        debug!("acquired {width}x{height} render surface");
        Self {
            buffer: vec![0u8; (width as usize) * (height as usize) * 3],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Hand the rasterized pixels over, consuming the surface.
    pub fn into_pixels(mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer)
    }
}

impl Drop for RenderSurface {
    fn drop(&mut self) {
        debug!("released {}x{} render surface", self.width, self.height);
    }
}

/// Encode raw RGB8 pixels as PNG.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(pixels, width, height, image::ColorType::Rgb8)
        .context("Failed to encode PNG")?;
    Ok(png_bytes)
}
