use crate::blend::alpha_over;
use crate::error::{EditorError, EditorResult};
use crate::geometry::PixelRect;
use image::{ImageFormat, Rgba, RgbaImage, imageops};
use std::io::Cursor;

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A fixed-size grid of straight-alpha RGBA pixels.
///
/// Every layer owns exactly one of these. Draw operations mutate it in place;
/// coordinates outside the grid are clipped rather than rejected.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: RgbaImage,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// Creates a fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
        }
    }

    pub fn from_rgba_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Wraps raw RGBA bytes; `None` if the length doesn't match `width * height * 4`
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(Self::from_rgba_image)
    }

    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, color),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width(), self.height())
    }

    pub fn as_rgba_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_rgba_image(self) -> RgbaImage {
        self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba<u8>> {
        if x < 0 || y < 0 {
            return None;
        }
        self.pixels.get_pixel_checked(x as u32, y as u32).copied()
    }

    /// Alpha at `(x, y)`; out-of-bounds reads as transparent
    pub fn alpha(&self, x: i32, y: i32) -> u8 {
        self.pixel(x, y).map_or(0, |p| p[3])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, pixel: Rgba<u8>) {
        if let Some(p) = self.pixel_mut(x, y) {
            *p = pixel;
        }
    }

    /// Blends `pixel` over whatever is at `(x, y)`
    pub fn blend_pixel(&mut self, x: i32, y: i32, pixel: Rgba<u8>) {
        if let Some(p) = self.pixel_mut(x, y) {
            *p = alpha_over(*p, pixel);
        }
    }

    pub(crate) fn pixel_mut(&mut self, x: i32, y: i32) -> Option<&mut Rgba<u8>> {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return None;
        }
        Some(self.pixels.get_pixel_mut(x as u32, y as u32))
    }

    pub fn is_transparent(&self) -> bool {
        self.pixels.pixels().all(|p| p[3] == 0)
    }

    /// Copies `rect` out of the buffer. Parts outside the buffer read as transparent.
    pub fn region(&self, rect: PixelRect) -> PixelBuffer {
        let mut out = PixelBuffer::new(rect.width, rect.height);
        for dy in 0..rect.height as i32 {
            for dx in 0..rect.width as i32 {
                if let Some(p) = self.pixel(rect.x + dx, rect.y + dy) {
                    out.set_pixel(dx, dy, p);
                }
            }
        }
        out
    }

    /// Overwrites pixels with `src` placed at `(x, y)`, transparent pixels included
    pub fn put_region(&mut self, x: i32, y: i32, src: &PixelBuffer) {
        for (sx, sy, p) in src.pixels.enumerate_pixels() {
            self.set_pixel(x + sx as i32, y + sy as i32, *p);
        }
    }

    /// Alpha-blends `src` placed at `(x, y)` over the buffer
    pub fn blit_over(&mut self, x: i32, y: i32, src: &PixelBuffer) {
        for (sx, sy, p) in src.pixels.enumerate_pixels() {
            self.blend_pixel(x + sx as i32, y + sy as i32, *p);
        }
    }

    pub fn clear_rect(&mut self, rect: PixelRect) {
        let rect = rect.clamp_to(self.width(), self.height());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set_pixel(x, y, TRANSPARENT);
            }
        }
    }

    pub fn clear(&mut self) {
        for p in self.pixels.pixels_mut() {
            *p = TRANSPARENT;
        }
    }

    /// Nearest-neighbour rescale to `width x height`
    pub fn scaled(&self, width: u32, height: u32) -> PixelBuffer {
        if self.size() == (width, height) {
            return self.clone();
        }
        PixelBuffer::from_rgba_image(imageops::resize(
            &self.pixels,
            width,
            height,
            imageops::FilterType::Nearest,
        ))
    }

    /// Smooth rescale, used for imported images
    pub fn resampled(&self, width: u32, height: u32) -> PixelBuffer {
        if self.size() == (width, height) {
            return self.clone();
        }
        PixelBuffer::from_rgba_image(imageops::resize(
            &self.pixels,
            width,
            height,
            imageops::FilterType::Triangle,
        ))
    }

    pub fn encode_png(&self) -> EditorResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Decodes any raster format the `image` crate was built with
    pub fn decode(bytes: &[u8]) -> EditorResult<PixelBuffer> {
        let decoded = image::load_from_memory(bytes)?;
        log::debug!("Decoded image: {}x{}", decoded.width(), decoded.height());
        Ok(PixelBuffer::from_rgba_image(decoded.to_rgba8()))
    }

    /// Replaces the whole content with `other`, which must have the same size
    pub fn replace_with(&mut self, other: PixelBuffer) -> EditorResult<()> {
        if other.size() != self.size() {
            return Err(EditorError::DimensionMismatch {
                expected: self.size(),
                actual: other.size(),
            });
        }
        self.pixels = other.pixels;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn new_buffer_is_transparent() {
        let buffer = PixelBuffer::new(4, 3);
        assert_eq!(buffer.size(), (4, 3));
        assert!(buffer.is_transparent());
    }

    #[test]
    fn region_clips_outside_pixels() {
        let buffer = PixelBuffer::filled(4, 4, RED);
        let region = buffer.region(PixelRect::new(2, 2, 4, 4));
        assert_eq!(region.pixel(0, 0), Some(RED));
        assert_eq!(region.pixel(3, 3), Some(TRANSPARENT));
    }

    #[test]
    fn put_region_overwrites_with_transparency() {
        let mut buffer = PixelBuffer::filled(4, 4, RED);
        buffer.put_region(1, 1, &PixelBuffer::new(2, 2));
        assert_eq!(buffer.alpha(1, 1), 0);
        assert_eq!(buffer.alpha(2, 2), 0);
        assert_eq!(buffer.alpha(3, 3), 255);
    }

    #[test]
    fn blit_over_keeps_base_under_transparent_source() {
        let mut buffer = PixelBuffer::filled(4, 4, RED);
        buffer.blit_over(0, 0, &PixelBuffer::new(4, 4));
        assert_eq!(buffer, PixelBuffer::filled(4, 4, RED));
    }

    #[test]
    fn clear_rect_clamps_to_bounds() {
        let mut buffer = PixelBuffer::filled(4, 4, RED);
        buffer.clear_rect(PixelRect::new(-2, -2, 4, 4));
        assert_eq!(buffer.alpha(0, 0), 0);
        assert_eq!(buffer.alpha(1, 1), 0);
        assert_eq!(buffer.alpha(2, 2), 255);
    }

    #[test]
    fn png_encoding_is_lossless() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.set_pixel(1, 1, Rgba([10, 20, 30, 40]));
        let decoded = PixelBuffer::decode(&buffer.encode_png().unwrap()).unwrap();
        assert_eq!(decoded, buffer);
    }

    #[test]
    fn replace_with_rejects_other_sizes() {
        let mut buffer = PixelBuffer::new(2, 2);
        assert!(matches!(
            buffer.replace_with(PixelBuffer::new(3, 3)),
            Err(EditorError::DimensionMismatch { .. })
        ));
    }
}
