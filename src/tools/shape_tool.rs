use crate::document::Document;
use crate::error::EditorResult;
use crate::image::PixelBuffer;
use crate::layer::LayerId;
use crate::surface::DrawingSurface;
use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    /// Centred on the press point, radius out to the pointer
    Circle,
    Line,
}

/// A rubber-band shape being dragged out.
///
/// Each update redraws the pre-gesture buffer plus the shape, so the layer
/// always shows exactly one copy of the shape.
#[derive(Debug, Clone)]
pub struct ShapeGesture {
    layer_id: LayerId,
    kind: ShapeKind,
    start: Pos2,
    color: Color32,
    width: f32,
    base: PixelBuffer,
}

impl ShapeGesture {
    pub fn new(
        document: &Document,
        kind: ShapeKind,
        start: Pos2,
        color: Color32,
        width: f32,
    ) -> Self {
        let layer = document.current_layer();
        Self {
            layer_id: layer.id,
            kind,
            start,
            color,
            width,
            base: layer.buffer().clone(),
        }
    }

    pub fn layer_id(&self) -> LayerId {
        self.layer_id
    }

    /// Re-renders the shape from the press point to `pos`
    pub fn update(&self, document: &mut Document, pos: Pos2) -> EditorResult<()> {
        let buffer = document.layer_by_id_mut(self.layer_id)?.buffer_mut();
        buffer.clone_from(&self.base);
        match self.kind {
            ShapeKind::Rectangle => buffer.draw_rect(self.start, pos, self.color, self.width),
            ShapeKind::Circle => buffer.draw_ellipse(self.start, pos, self.color, self.width),
            ShapeKind::Line => buffer.draw_line(self.start, pos, self.color, self.width),
        }
        Ok(())
    }
}
