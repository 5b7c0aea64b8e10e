use crate::error::{EditorError, EditorResult};
use crate::file_handler;
use crate::image::PixelBuffer;
use crate::selection::SelectOutcome;
use crate::state::EditorState;
use crate::surface::TextFont;
use crate::tools::{self, ToolKind};
use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

/// Everything the editor can be asked to do.
///
/// Pointer positions are in canvas pixels. Commands carrying decoded pixels
/// are skipped by serde, so a serialized log holds only replayable input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    /// Change the active tool, committing any live selection
    SetTool(ToolKind),
    SetColor(Color32),
    SetBrushSize(f32),
    SetFontSize(f32),

    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp(Pos2),
    /// The pointer left the canvas mid-gesture
    PointerLeave,

    /// Fill text onto the current layer with its baseline at `position`
    PlaceText {
        position: Pos2,
        text: String,
    },
    /// Draw a decoded image onto the current layer
    #[serde(skip)]
    PlaceImage(PixelBuffer),
    /// Resize the canvas to a decoded image and draw it on the current layer
    #[serde(skip)]
    OpenImage(PixelBuffer),

    /// Start over with a single empty layer
    NewCanvas {
        width: u32,
        height: u32,
    },

    AddLayer,
    DeleteLayer(usize),
    SelectLayer(usize),
    SetLayerVisibility {
        index: usize,
        visible: bool,
    },
    ReorderLayer {
        from: usize,
        to: usize,
    },

    Undo,
    Redo,

    /// Commit the live selection where it is (Escape, empty-space click)
    Deselect,
    /// Erase the live selection's pixels and commit
    DeleteSelection,

    SetZoom(u32),
    ZoomIn,
    ZoomOut,
    /// Mouse wheel delta; positive scrolls down
    ZoomWheel(f32),
    SetRotation(i32),
    RotateLeft,
    RotateRight,
}

impl Command {
    /// Returns true if the command can change what the composite looks like
    pub fn touches_pixels(&self) -> bool {
        match self {
            Command::SetTool(_) => true, // commits a live selection
            Command::SetColor(_) => false,
            Command::SetBrushSize(_) => false,
            Command::SetFontSize(_) => false,
            Command::PointerDown(_) => true,
            Command::PointerMove(_) => true,
            Command::PointerUp(_) => true,
            Command::PointerLeave => true,
            Command::PlaceText { .. } => true,
            Command::PlaceImage(_) => true,
            Command::OpenImage(_) => true,
            Command::NewCanvas { .. } => true,
            Command::AddLayer => true,
            Command::DeleteLayer(_) => true,
            Command::SelectLayer(_) => true,
            Command::SetLayerVisibility { .. } => true,
            Command::ReorderLayer { .. } => true,
            Command::Undo => true,
            Command::Redo => true,
            Command::Deselect => true,
            Command::DeleteSelection => true,
            Command::SetZoom(_) => false,
            Command::ZoomIn => false,
            Command::ZoomOut => false,
            Command::ZoomWheel(_) => false,
            Command::SetRotation(_) => false,
            Command::RotateLeft => false,
            Command::RotateRight => false,
        }
    }

    /// Execute the command against the editor
    pub(crate) fn execute(self, state: &mut EditorState) -> EditorResult<()> {
        match self {
            Command::SetTool(kind) => {
                state.settle();
                state.tools.set_tool(kind);
                Ok(())
            }
            Command::SetColor(color) => {
                state.tools.settings.color = color;
                Ok(())
            }
            Command::SetBrushSize(size) => {
                state.tools.settings.size = size.max(0.0);
                Ok(())
            }
            Command::SetFontSize(size) => {
                state.tools.settings.font_size = size.max(0.0);
                Ok(())
            }

            Command::PointerDown(pos) => pointer_down(state, pos),
            Command::PointerMove(pos) => pointer_move(state, pos),
            Command::PointerUp(pos) => {
                state.selection.end_gesture();
                state.tools.pointer_up(&mut state.document, Some(pos))
            }
            Command::PointerLeave => state.tools.pointer_up(&mut state.document, None),

            Command::PlaceText { position, text } => {
                let face = state.font.clone().ok_or(EditorError::NoFont)?;
                state.settle();
                let font = TextFont {
                    face,
                    size: state.tools.settings.font_size,
                };
                let color = state.tools.settings.color;
                tools::place_text(
                    &mut state.document,
                    &mut state.history,
                    position,
                    &text,
                    &font,
                    color,
                )
            }
            Command::PlaceImage(image) => {
                state.settle();
                let index = state.document.current_index();
                state.history.snapshot_before(&state.document, index)?;
                file_handler::place_image(
                    &mut state.document,
                    &image,
                    state.config.import_max_size,
                );
                Ok(())
            }
            Command::OpenImage(image) => {
                state.settle();
                file_handler::open_image(&mut state.document, image)?;
                state.history.clear();
                Ok(())
            }

            Command::NewCanvas { width, height } => state.new_canvas(width, height),

            Command::AddLayer => {
                state.settle();
                state.document.add_layer();
                Ok(())
            }
            // Arguments are checked before settling so a rejected command
            // leaves the live selection and gesture alone
            Command::DeleteLayer(index) => {
                state.document.check_delete(index)?;
                state.settle();
                state.document.delete_layer(index).map(drop)
            }
            Command::SelectLayer(index) => {
                state.document.layer(index)?;
                state.settle();
                state.document.select_layer(index)
            }
            Command::SetLayerVisibility { index, visible } => {
                state.document.layer(index)?;
                state.settle();
                state.document.set_visibility(index, visible)
            }
            Command::ReorderLayer { from, to } => {
                state.document.layer(from)?;
                state.document.layer(to)?;
                state.settle();
                state.document.reorder(from, to)
            }

            Command::Undo => {
                state.settle();
                if !state.history.undo(&mut state.document)? {
                    log::debug!("Undo: nothing to undo");
                }
                Ok(())
            }
            Command::Redo => {
                state.settle();
                if !state.history.redo(&mut state.document)? {
                    log::debug!("Redo: nothing to redo");
                }
                Ok(())
            }

            Command::Deselect => {
                state.selection.commit();
                Ok(())
            }
            Command::DeleteSelection => {
                state.selection.delete_selection(&mut state.document)?;
                Ok(())
            }

            Command::SetZoom(percent) => {
                state.view.set_zoom(percent);
                Ok(())
            }
            Command::ZoomIn => {
                state.view.zoom_in();
                Ok(())
            }
            Command::ZoomOut => {
                state.view.zoom_out();
                Ok(())
            }
            Command::ZoomWheel(delta) => {
                state.view.zoom_wheel(delta);
                Ok(())
            }
            Command::SetRotation(degrees) => {
                state.view.set_rotation(degrees);
                Ok(())
            }
            Command::RotateLeft => {
                state.view.rotate_left();
                Ok(())
            }
            Command::RotateRight => {
                state.view.rotate_right();
                Ok(())
            }
        }
    }
}

fn pointer_down(state: &mut EditorState, pos: Pos2) -> EditorResult<()> {
    match state.tools.kind() {
        ToolKind::Select => {
            if let Some(corner) = state.selection.handle_at(pos) {
                if state.selection.begin_resize(corner) {
                    return Ok(());
                }
            }
            if state.selection.contains(pos) && state.selection.begin_drag(pos) {
                return Ok(());
            }
            let outcome =
                state
                    .selection
                    .select_at(&mut state.document, &mut state.history, pos)?;
            if outcome == SelectOutcome::Empty {
                log::debug!("Select: empty space at {pos:?}");
            }
            Ok(())
        }
        // Text is placed with `PlaceText`, images arrive through a load
        ToolKind::Text | ToolKind::Image => Ok(()),
        _ => state
            .tools
            .pointer_down(&mut state.document, &mut state.history, pos),
    }
}

fn pointer_move(state: &mut EditorState, pos: Pos2) -> EditorResult<()> {
    let (dragging, resizing) = match state.selection.live() {
        Some(selection) => (selection.is_dragging(), selection.is_resizing()),
        None => return state.tools.pointer_move(&mut state.document, pos),
    };

    if dragging {
        state.selection.drag(&mut state.document, pos)?;
    } else if resizing {
        match state.selection.resize(&mut state.document, pos) {
            Err(EditorError::ResizeRejected { width, height }) => {
                log::debug!("Ignoring resize to {width}x{height}");
            }
            other => {
                other?;
            }
        }
    }
    Ok(())
}
