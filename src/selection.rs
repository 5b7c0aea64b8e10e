//! Object selection of a cut-out pixel region and its move/resize transform.
//!
//! ```text
//!   Idle ──select_at──► Dragging ──end_gesture──► Selected
//!                          ▲                        │  │
//!                          └──────begin_drag────────┘  │ begin_resize
//!                                                      ▼
//!   Idle ◄──commit── (any live phase)             Resizing
//! ```
//!
//! While a selection is live its pixels have already been lifted out of the
//! layer: the layer buffer is always `base` with `placed` drawn on top at the
//! current geometry, so committing only has to drop the bookkeeping.

use crate::command::History;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::geometry::{Corner, PixelRect, hit_testing};
use crate::image::PixelBuffer;
use crate::layer::LayerId;
use egui::{Pos2, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionPhase {
    Selected,
    Dragging {
        /// Pointer position relative to the selection's top-left corner
        grab_offset: Vec2,
    },
    Resizing {
        corner: Corner,
    },
}

/// A live cut-out region
#[derive(Debug, Clone)]
pub struct Selection {
    pub layer_id: LayerId,
    pub rect: PixelRect,
    pub phase: SelectionPhase,
    /// Pixels as they were cut out
    captured: PixelBuffer,
    /// `captured` scaled to `rect`'s size
    placed: PixelBuffer,
    /// The layer with the cut-out region cleared
    base: PixelBuffer,
}

impl Selection {
    pub fn captured(&self) -> &PixelBuffer {
        &self.captured
    }

    pub fn placed(&self) -> &PixelBuffer {
        &self.placed
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, SelectionPhase::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.phase, SelectionPhase::Resizing { .. })
    }
}

/// What a select-tool click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// A new selection was cut out and is being dragged
    Selected(PixelRect),
    /// Empty space was clicked; any previous selection was committed
    Empty,
}

/// Finds the bounding box of the opaque run through `(x, y)`.
///
/// Only the row and column through the click are scanned, one axis
/// direction at a time; this is not a connected-component search, so
/// non-convex shapes can yield a box that doesn't cover the whole shape.
pub fn scan_bounds(buffer: &PixelBuffer, x: i32, y: i32) -> Option<PixelRect> {
    if buffer.alpha(x, y) == 0 {
        return None;
    }
    let (width, height) = (buffer.width() as i32, buffer.height() as i32);

    let mut left = x;
    while left > 0 && buffer.alpha(left - 1, y) > 0 {
        left -= 1;
    }
    let mut right = x;
    while right + 1 < width && buffer.alpha(right + 1, y) > 0 {
        right += 1;
    }
    let mut top = y;
    while top > 0 && buffer.alpha(x, top - 1) > 0 {
        top -= 1;
    }
    let mut bottom = y;
    while bottom + 1 < height && buffer.alpha(x, bottom + 1) > 0 {
        bottom += 1;
    }

    Some(PixelRect::new(
        left,
        top,
        (right - left + 1) as u32,
        (bottom - top + 1) as u32,
    ))
}

/// Holds at most one live selection and drives its state machine
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    live: Option<Selection>,
    /// Resizes producing a width or height at or below this are rejected
    min_size: u32,
    handle_radius: f32,
}

impl SelectionEngine {
    pub fn new(min_size: u32, handle_radius: f32) -> Self {
        Self {
            live: None,
            min_size,
            handle_radius,
        }
    }

    pub fn live(&self) -> Option<&Selection> {
        self.live.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.live.is_none()
    }

    /// Corner handle of the live selection under `pos`
    pub fn handle_at(&self, pos: Pos2) -> Option<Corner> {
        let selection = self.live.as_ref()?;
        hit_testing::handle_at(&selection.rect, pos, self.handle_radius)
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.live
            .as_ref()
            .is_some_and(|selection| selection.rect.contains(pos))
    }

    /// Select-tool click on the current layer.
    ///
    /// Any live selection is committed first. On an opaque pixel the region is
    /// snapshotted into `history`, cut out of the layer and starts dragging.
    pub fn select_at(
        &mut self,
        document: &mut Document,
        history: &mut History,
        pos: Pos2,
    ) -> EditorResult<SelectOutcome> {
        self.commit();

        let (x, y) = (pos.x.floor() as i32, pos.y.floor() as i32);
        let index = document.current_index();
        let Some(rect) = scan_bounds(document.current_layer().buffer(), x, y) else {
            return Ok(SelectOutcome::Empty);
        };

        history.snapshot_before(document, index)?;

        let layer = document.current_layer_mut();
        let captured = layer.buffer().region(rect);
        layer.buffer_mut().clear_rect(rect);
        let base = layer.buffer().clone();
        layer.buffer_mut().put_region(rect.x, rect.y, &captured);

        log::debug!("Selected {rect:?} on layer {}", layer.id);
        self.live = Some(Selection {
            layer_id: layer.id,
            rect,
            phase: SelectionPhase::Dragging {
                grab_offset: pos - Pos2::new(rect.x as f32, rect.y as f32),
            },
            placed: captured.clone(),
            captured,
            base,
        });
        Ok(SelectOutcome::Selected(rect))
    }

    /// Re-grabs the live selection for moving. Only valid from `Selected`.
    pub fn begin_drag(&mut self, pos: Pos2) -> bool {
        match &mut self.live {
            Some(selection) if selection.phase == SelectionPhase::Selected => {
                let origin = Pos2::new(selection.rect.x as f32, selection.rect.y as f32);
                selection.phase = SelectionPhase::Dragging {
                    grab_offset: pos - origin,
                };
                true
            }
            _ => false,
        }
    }

    /// Grabs a corner handle. Only valid from `Selected`.
    pub fn begin_resize(&mut self, corner: Corner) -> bool {
        match &mut self.live {
            Some(selection) if selection.phase == SelectionPhase::Selected => {
                selection.phase = SelectionPhase::Resizing { corner };
                true
            }
            _ => false,
        }
    }

    /// Ends a drag or resize gesture, returning to `Selected`
    pub fn end_gesture(&mut self) {
        if let Some(selection) = &mut self.live {
            selection.phase = SelectionPhase::Selected;
        }
    }

    /// Moves the selection so the grab point follows the pointer.
    ///
    /// The rectangle is kept inside the canvas. Returns `false` when not dragging.
    pub fn drag(&mut self, document: &mut Document, pos: Pos2) -> EditorResult<bool> {
        let Some(selection) = &mut self.live else {
            return Ok(false);
        };
        let SelectionPhase::Dragging { grab_offset } = selection.phase else {
            return Ok(false);
        };

        let max_x = document.width().saturating_sub(selection.rect.width) as i32;
        let max_y = document.height().saturating_sub(selection.rect.height) as i32;
        let target = pos - grab_offset;
        selection.rect.x = (target.x.round() as i32).clamp(0, max_x);
        selection.rect.y = (target.y.round() as i32).clamp(0, max_y);

        redraw(document, selection)?;
        Ok(true)
    }

    /// Moves the grabbed corner to the pointer while the opposite corner stays put.
    ///
    /// The pointer is clamped to one canvas size beyond each edge. Fails with
    /// `ResizeRejected` and keeps the previous geometry if the new width or
    /// height would be at or below the minimum size.
    pub fn resize(&mut self, document: &mut Document, pos: Pos2) -> EditorResult<bool> {
        let min_size = self.min_size as i64;
        let Some(selection) = &mut self.live else {
            return Ok(false);
        };
        let SelectionPhase::Resizing { corner } = selection.phase else {
            return Ok(false);
        };

        let (canvas_w, canvas_h) = (document.width() as f32, document.height() as f32);
        let px = pos.x.clamp(-canvas_w, 2.0 * canvas_w).round() as i64;
        let py = pos.y.clamp(-canvas_h, 2.0 * canvas_h).round() as i64;

        let rect = selection.rect;
        let (left, top) = (rect.x as i64, rect.y as i64);
        let (right, bottom) = (rect.right() as i64, rect.bottom() as i64);
        let (x, width) = match corner {
            Corner::TopLeft | Corner::BottomLeft => (px, right - px),
            Corner::TopRight | Corner::BottomRight => (left, px - left),
        };
        let (y, height) = match corner {
            Corner::TopLeft | Corner::TopRight => (py, bottom - py),
            Corner::BottomLeft | Corner::BottomRight => (top, py - top),
        };

        if width <= min_size || height <= min_size {
            return Err(EditorError::ResizeRejected {
                width: saturate(width),
                height: saturate(height),
            });
        }

        selection.rect = PixelRect::new(saturate(x), saturate(y), width as u32, height as u32);
        selection.placed = selection.captured.scaled(width as u32, height as u32);
        redraw(document, selection)?;
        Ok(true)
    }

    /// Finalizes the live selection where it currently sits.
    ///
    /// The layer already holds the placed pixels, so this only ends the
    /// selection. Returns the layer it was committed to.
    pub fn commit(&mut self) -> Option<LayerId> {
        let selection = self.live.take()?;
        log::debug!("Committed {:?} on layer {}", selection.rect, selection.layer_id);
        Some(selection.layer_id)
    }

    /// Removes the selected pixels from the layer and ends the selection
    pub fn delete_selection(&mut self, document: &mut Document) -> EditorResult<Option<LayerId>> {
        let Some(selection) = self.live.take() else {
            return Ok(None);
        };
        let layer = document.layer_by_id_mut(selection.layer_id)?;
        layer.buffer_mut().clone_from(&selection.base);
        log::debug!("Deleted selection {:?}", selection.rect);
        Ok(Some(selection.layer_id))
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn redraw(document: &mut Document, selection: &Selection) -> EditorResult<()> {
    let layer = document.layer_by_id_mut(selection.layer_id)?;
    let buffer = layer.buffer_mut();
    buffer.clone_from(&selection.base);
    buffer.put_region(selection.rect.x, selection.rect.y, &selection.placed);
    Ok(())
}
