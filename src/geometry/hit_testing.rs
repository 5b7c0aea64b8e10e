use super::{Corner, PixelRect};
use egui::Pos2;

/// Returns the corner handle of `rect` under `pos`, if any.
///
/// Corners are checked in `Corner::ALL` order, so on a tiny rect where
/// several handles overlap the top-left one wins.
pub fn handle_at(rect: &PixelRect, pos: Pos2, radius: f32) -> Option<Corner> {
    Corner::ALL
        .into_iter()
        .find(|corner| pos.distance(rect.corner(*corner)) <= radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_each_corner() {
        let rect = PixelRect::new(10, 20, 30, 40);
        assert_eq!(handle_at(&rect, Pos2::new(11.0, 21.0), 4.0), Some(Corner::TopLeft));
        assert_eq!(handle_at(&rect, Pos2::new(40.0, 20.0), 4.0), Some(Corner::TopRight));
        assert_eq!(handle_at(&rect, Pos2::new(10.0, 58.0), 4.0), Some(Corner::BottomLeft));
        assert_eq!(handle_at(&rect, Pos2::new(42.0, 61.0), 4.0), Some(Corner::BottomRight));
    }

    #[test]
    fn misses_interior() {
        let rect = PixelRect::new(0, 0, 100, 100);
        assert_eq!(handle_at(&rect, Pos2::new(50.0, 50.0), 6.0), None);
    }
}
