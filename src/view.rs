use crate::config::ZoomConfig;
use egui::{Pos2, Vec2};

/// Display zoom and rotation of the canvas.
///
/// This never touches pixels; it only maps between viewport and canvas
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Zoom in percent
    zoom: u32,
    /// Rotation in whole degrees, always in `0..360`
    rotation: i32,
    limits: ZoomConfig,
}

impl ViewTransform {
    pub fn new(limits: ZoomConfig) -> Self {
        Self {
            zoom: 100u32.clamp(limits.min, limits.max),
            rotation: 0,
            limits,
        }
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn scale(&self) -> f32 {
        self.zoom as f32 / 100.0
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn set_zoom(&mut self, percent: u32) {
        self.zoom = percent.clamp(self.limits.min, self.limits.max);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.saturating_add(self.limits.step));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.saturating_sub(self.limits.step));
    }

    /// Positive deltas scroll down, which zooms out
    pub fn zoom_wheel(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.set_zoom(self.zoom.saturating_sub(self.limits.wheel_step));
        } else if delta_y < 0.0 {
            self.set_zoom(self.zoom.saturating_add(self.limits.wheel_step));
        }
    }

    pub fn set_rotation(&mut self, degrees: i32) {
        self.rotation = degrees.rem_euclid(360);
    }

    pub fn rotate_left(&mut self) {
        self.set_rotation(self.rotation - 90);
    }

    pub fn rotate_right(&mut self) {
        self.set_rotation(self.rotation + 90);
    }

    /// Maps a point in the unscaled, unrotated canvas frame onto the viewport.
    ///
    /// The canvas is scaled and rotated about its centre; `canvas_size` is the
    /// document size in pixels.
    pub fn to_viewport(&self, canvas_pos: Pos2, canvas_size: Vec2) -> Pos2 {
        let center = (canvas_size / 2.0).to_pos2();
        let (sin, cos) = (self.rotation as f32).to_radians().sin_cos();
        let d = (canvas_pos - center) * self.scale();
        center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
    }

    /// Inverse of `to_viewport`
    pub fn to_canvas(&self, viewport_pos: Pos2, canvas_size: Vec2) -> Pos2 {
        let center = (canvas_size / 2.0).to_pos2();
        let (sin, cos) = (self.rotation as f32).to_radians().sin_cos();
        let d = viewport_pos - center;
        let unrotated = Vec2::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos);
        center + unrotated / self.scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped() {
        let mut view = ViewTransform::new(ZoomConfig::default());
        view.set_zoom(500);
        assert_eq!(view.zoom(), 200);
        view.set_zoom(0);
        assert_eq!(view.zoom(), 10);
    }

    #[test]
    fn zoom_steps() {
        let mut view = ViewTransform::new(ZoomConfig::default());
        view.zoom_in();
        assert_eq!(view.zoom(), 110);
        view.zoom_out();
        view.zoom_out();
        assert_eq!(view.zoom(), 90);
        view.zoom_wheel(3.0);
        assert_eq!(view.zoom(), 85);
        view.zoom_wheel(-3.0);
        assert_eq!(view.zoom(), 90);
    }

    #[test]
    fn rotation_wraps() {
        let mut view = ViewTransform::new(ZoomConfig::default());
        view.rotate_left();
        assert_eq!(view.rotation(), 270);
        view.rotate_right();
        view.rotate_right();
        assert_eq!(view.rotation(), 90);
        view.set_rotation(-450);
        assert_eq!(view.rotation(), 270);
    }

    #[test]
    fn to_canvas_inverts_to_viewport() {
        let mut view = ViewTransform::new(ZoomConfig::default());
        view.set_zoom(150);
        view.set_rotation(90);
        let size = Vec2::new(200.0, 100.0);
        let p = Pos2::new(30.0, 70.0);
        let back = view.to_canvas(view.to_viewport(p, size), size);
        assert!((back.x - p.x).abs() < 1e-3);
        assert!((back.y - p.y).abs() < 1e-3);
    }

    #[test]
    fn centre_is_fixed() {
        let mut view = ViewTransform::new(ZoomConfig::default());
        view.set_zoom(200);
        view.set_rotation(45);
        let size = Vec2::new(100.0, 100.0);
        assert_eq!(view.to_viewport(Pos2::new(50.0, 50.0), size), Pos2::new(50.0, 50.0));
    }
}
