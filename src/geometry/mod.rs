pub mod hit_testing;

use egui::Pos2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in whole canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        pos.x >= self.x as f32
            && pos.y >= self.y as f32
            && pos.x < self.right() as f32
            && pos.y < self.bottom() as f32
    }

    /// Corner position in canvas coordinates
    pub fn corner(&self, corner: Corner) -> Pos2 {
        let (x, y) = match corner {
            Corner::TopLeft => (self.x, self.y),
            Corner::TopRight => (self.right(), self.y),
            Corner::BottomLeft => (self.x, self.bottom()),
            Corner::BottomRight => (self.right(), self.bottom()),
        };
        Pos2::new(x as f32, y as f32)
    }

    /// Intersection with `[0, width) x [0, height)`
    pub fn clamp_to(&self, width: u32, height: u32) -> PixelRect {
        let left = self.x.clamp(0, width as i32);
        let top = self.y.clamp(0, height as i32);
        let right = self.right().clamp(0, width as i32);
        let bottom = self.bottom().clamp(0, height as i32);
        PixelRect::new(
            left,
            top,
            (right - left).max(0) as u32,
            (bottom - top).max(0) as u32,
        )
    }
}

/// Represents a corner of a selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Compass name used by the transform box handles
    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "nw",
            Corner::TopRight => "ne",
            Corner::BottomLeft => "sw",
            Corner::BottomRight => "se",
        }
    }

    pub fn opposite(&self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}
