use crate::document::Document;
use crate::error::EditorResult;
use crate::layer::LayerId;
use crate::surface::DrawingSurface;
use egui::{Color32, Pos2};

/// A freehand brush or eraser stroke in progress.
///
/// Segments are rasterized into the layer as the pointer moves; there is no
/// separate preview.
#[derive(Debug, Clone)]
pub struct StrokeGesture {
    layer_id: LayerId,
    last: Pos2,
    color: Color32,
    width: f32,
    erase: bool,
}

impl StrokeGesture {
    pub fn new(layer_id: LayerId, start: Pos2, color: Color32, width: f32, erase: bool) -> Self {
        Self {
            layer_id,
            last: start,
            color,
            width,
            erase,
        }
    }

    pub fn layer_id(&self) -> LayerId {
        self.layer_id
    }

    /// Draws the segment from the previous sample to `pos`
    pub fn extend(&mut self, document: &mut Document, pos: Pos2) -> EditorResult<()> {
        let buffer = document.layer_by_id_mut(self.layer_id)?.buffer_mut();
        if self.erase {
            buffer.erase_line(self.last, pos, self.width);
        } else {
            buffer.draw_line(self.last, pos, self.color, self.width);
        }
        self.last = pos;
        Ok(())
    }
}
