//! The drawing surface the editor core paints through.
//!
//! Everything above this module only speaks in terms of `DrawingSurface`;
//! `PixelBuffer` provides a software implementation so the whole editor runs
//! headless.

use crate::error::EditorResult;
use crate::geometry::PixelRect;
use crate::image::{PixelBuffer, TRANSPARENT};
use ab_glyph::{Font as _, FontArc, ScaleFont as _, point};
use egui::{Color32, Pos2, Vec2};
use image::Rgba;

/// A font face at a pixel size
#[derive(Clone)]
pub struct TextFont {
    pub face: FontArc,
    pub size: f32,
}

impl std::fmt::Debug for TextFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFont")
            .field("face", &"<font>")
            .field("size", &self.size)
            .finish()
    }
}

/// Primitive stroke, fill and pixel operations
pub trait DrawingSurface {
    /// Round-capped line segment
    fn draw_line(&mut self, start: Pos2, end: Pos2, color: Color32, width: f32);

    /// Rectangle outline spanning `start` and `end`
    fn draw_rect(&mut self, start: Pos2, end: Pos2, color: Color32, width: f32);

    /// Circle outline centred on `start` passing through `end`
    fn draw_ellipse(&mut self, start: Pos2, end: Pos2, color: Color32, width: f32);

    /// Clears a round-capped line segment back to transparent
    fn erase_line(&mut self, start: Pos2, end: Pos2, width: f32);

    /// Text with its alphabetic baseline starting at `pos`
    fn fill_text(&mut self, text: &str, pos: Pos2, font: &TextFont, color: Color32);

    /// Draws `image` scaled to `size` with its top-left at `pos`
    fn blit_image(&mut self, image: &PixelBuffer, pos: Pos2, size: Vec2);

    fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba<u8>>;

    fn get_region(&self, rect: PixelRect) -> PixelBuffer;

    fn put_region(&mut self, rect: PixelRect, pixels: &PixelBuffer);

    fn clear(&mut self, rect: PixelRect);

    fn to_encoded_bytes(&self) -> EditorResult<Vec<u8>>;
}

pub(crate) fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

impl PixelBuffer {
    /// Applies `op` once to every pixel whose centre lies within `width / 2`
    /// of the segment, so translucent colors don't build up along a stroke.
    ///
    /// The radius is at least 0.75 so a hairline on integer coordinates still
    /// covers the pixels either side of it. Only pixels inside the buffer are
    /// visited, however wide the stroke or far away its endpoints.
    fn stamp_segment(
        &mut self,
        start: Pos2,
        end: Pos2,
        width: f32,
        mut op: impl FnMut(&mut Rgba<u8>),
    ) {
        let radius = (width / 2.0).max(0.75);
        let (buffer_w, buffer_h) = (self.width() as f32, self.height() as f32);
        let min_x = (start.x.min(end.x) - radius).floor().clamp(0.0, buffer_w) as i32;
        let max_x = (start.x.max(end.x) + radius).ceil().clamp(0.0, buffer_w) as i32;
        let min_y = (start.y.min(end.y) - radius).floor().clamp(0.0, buffer_h) as i32;
        let max_y = (start.y.max(end.y) + radius).ceil().clamp(0.0, buffer_h) as i32;

        // f64 keeps the projection exact for endpoints far off the buffer
        let (sx, sy) = (start.x as f64, start.y as f64);
        let (dx, dy) = (end.x as f64 - sx, end.y as f64 - sy);
        let length_sq = dx * dx + dy * dy;
        let radius_sq = radius as f64 * radius as f64;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let (cx, cy) = (x as f64 + 0.5, y as f64 + 0.5);
                let t = if length_sq > 0.0 {
                    (((cx - sx) * dx + (cy - sy) * dy) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (ex, ey) = (cx - (sx + dx * t), cy - (sy + dy * t));
                if ex * ex + ey * ey <= radius_sq {
                    if let Some(p) = self.pixel_mut(x, y) {
                        op(p);
                    }
                }
            }
        }
    }
}

impl DrawingSurface for PixelBuffer {
    fn draw_line(&mut self, start: Pos2, end: Pos2, color: Color32, width: f32) {
        let color = to_rgba(color);
        self.stamp_segment(start, end, width, |p| *p = crate::blend::alpha_over(*p, color));
    }

    fn draw_rect(&mut self, start: Pos2, end: Pos2, color: Color32, width: f32) {
        let corners = [
            start,
            Pos2::new(end.x, start.y),
            end,
            Pos2::new(start.x, end.y),
        ];
        for i in 0..corners.len() {
            self.draw_line(corners[i], corners[(i + 1) % corners.len()], color, width);
        }
    }

    fn draw_ellipse(&mut self, start: Pos2, end: Pos2, color: Color32, width: f32) {
        let radius = start.distance(end);
        if radius < 0.5 {
            self.draw_line(start, start, color, width);
            return;
        }
        // Roughly one segment per 2px of circumference
        let segments = ((std::f32::consts::TAU * radius) / 2.0).ceil().clamp(8.0, 4096.0) as usize;
        let point_at = |i: usize| {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            start + Vec2::angled(angle) * radius
        };
        for i in 0..segments {
            self.draw_line(point_at(i), point_at(i + 1), color, width);
        }
    }

    fn erase_line(&mut self, start: Pos2, end: Pos2, width: f32) {
        self.stamp_segment(start, end, width, |p| *p = TRANSPARENT);
    }

    fn fill_text(&mut self, text: &str, pos: Pos2, font: &TextFont, color: Color32) {
        let scaled = font.face.as_scaled(font.size);
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        let mut cursor_x = pos.x;
        let mut prev = None;

        for ch in text.chars() {
            let glyph_id = font.face.glyph_id(ch);
            if let Some(prev) = prev {
                cursor_x += scaled.kern(prev, glyph_id);
            }
            let glyph = glyph_id.with_scale_and_position(font.size, point(cursor_x, pos.y));
            cursor_x += scaled.h_advance(glyph_id);
            prev = Some(glyph_id);

            let Some(outlined) = font.face.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let alpha = (coverage.clamp(0.0, 1.0) * a as f32).round() as u8;
                if alpha == 0 {
                    return;
                }
                let x = bounds.min.x as i32 + gx as i32;
                let y = bounds.min.y as i32 + gy as i32;
                self.blend_pixel(x, y, Rgba([r, g, b, alpha]));
            });
        }
    }

    fn blit_image(&mut self, image: &PixelBuffer, pos: Pos2, size: Vec2) {
        let width = size.x.round().max(1.0) as u32;
        let height = size.y.round().max(1.0) as u32;
        let resampled = image.resampled(width, height);
        self.blit_over(pos.x.round() as i32, pos.y.round() as i32, &resampled);
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba<u8>> {
        self.pixel(x, y)
    }

    fn get_region(&self, rect: PixelRect) -> PixelBuffer {
        self.region(rect)
    }

    fn put_region(&mut self, rect: PixelRect, pixels: &PixelBuffer) {
        let pixels = pixels.scaled(rect.width, rect.height);
        PixelBuffer::put_region(self, rect.x, rect.y, &pixels);
    }

    fn clear(&mut self, rect: PixelRect) {
        self.clear_rect(rect);
    }

    fn to_encoded_bytes(&self) -> EditorResult<Vec<u8>> {
        self.encode_png()
    }
}
