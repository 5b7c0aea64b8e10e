use crate::command::History;
use crate::document::Document;
use crate::error::EditorResult;
use crate::surface::{DrawingSurface, TextFont};
use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

mod draw_stroke_tool;
pub use draw_stroke_tool::StrokeGesture;

mod shape_tool;
pub use shape_tool::{ShapeGesture, ShapeKind};

/// Enum representing all available tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Rectangle,
    Circle,
    Line,
    /// Places text where the user clicks
    Text,
    /// Places an imported image on the current layer
    Image,
    /// Cuts out, moves and resizes opaque regions
    Select,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Eraser => "eraser",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Line => "line",
            ToolKind::Text => "text",
            ToolKind::Image => "image",
            ToolKind::Select => "select",
        }
    }

    fn shape(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Line => Some(ShapeKind::Line),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    pub color: Color32,
    /// Stroke width in pixels
    pub size: f32,
    pub font_size: f32,
}

#[derive(Debug, Clone)]
enum Gesture {
    Stroke(StrokeGesture),
    Shape { shape: ShapeGesture, last: Pos2 },
}

/// Current tool, its settings and the drawing gesture in flight
#[derive(Debug, Clone)]
pub struct ToolController {
    kind: ToolKind,
    pub settings: ToolSettings,
    gesture: Option<Gesture>,
}

impl ToolController {
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            kind: ToolKind::default(),
            settings,
            gesture: None,
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    /// Switches tools, finishing any gesture with the old one
    pub fn set_tool(&mut self, kind: ToolKind) {
        self.gesture = None;
        if self.kind != kind {
            log::debug!("Tool changed: {} -> {}", self.kind.name(), kind.name());
        }
        self.kind = kind;
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    /// Starts a brush, eraser or shape gesture on the current layer.
    ///
    /// Takes one history snapshot for the whole gesture. Other tools are ignored.
    pub fn pointer_down(
        &mut self,
        document: &mut Document,
        history: &mut History,
        pos: Pos2,
    ) -> EditorResult<()> {
        let ToolSettings { color, size, .. } = self.settings;
        let gesture = match self.kind {
            ToolKind::Brush | ToolKind::Eraser => {
                let erase = self.kind == ToolKind::Eraser;
                let layer_id = document.current_layer().id;
                Gesture::Stroke(StrokeGesture::new(layer_id, pos, color, size, erase))
            }
            kind => match kind.shape() {
                Some(shape) => Gesture::Shape {
                    shape: ShapeGesture::new(document, shape, pos, color, size),
                    last: pos,
                },
                None => return Ok(()),
            },
        };

        history.snapshot_before(document, document.current_index())?;
        self.gesture = Some(gesture);
        Ok(())
    }

    pub fn pointer_move(&mut self, document: &mut Document, pos: Pos2) -> EditorResult<()> {
        match &mut self.gesture {
            Some(Gesture::Stroke(stroke)) => stroke.extend(document, pos),
            Some(Gesture::Shape { shape, last }) => {
                *last = pos;
                shape.update(document, pos)
            }
            None => Ok(()),
        }
    }

    /// Ends the gesture. Without a position (pointer left the canvas) a shape
    /// keeps its last preview.
    pub fn pointer_up(&mut self, document: &mut Document, pos: Option<Pos2>) -> EditorResult<()> {
        match self.gesture.take() {
            Some(Gesture::Shape { shape, last }) => shape.update(document, pos.unwrap_or(last)),
            Some(Gesture::Stroke(_)) | None => Ok(()),
        }
    }

    /// Drops the gesture without touching any layer
    pub(crate) fn cancel_gesture(&mut self) {
        self.gesture = None;
    }
}

/// Fills `text` onto the current layer with its baseline at `pos`
pub fn place_text(
    document: &mut Document,
    history: &mut History,
    pos: Pos2,
    text: &str,
    font: &TextFont,
    color: Color32,
) -> EditorResult<()> {
    if text.is_empty() {
        return Ok(());
    }
    history.snapshot_before(document, document.current_index())?;
    document
        .current_layer_mut()
        .buffer_mut()
        .fill_text(text, pos, font, color);
    Ok(())
}
