use crate::error::{EditorError, EditorResult};
use egui::Color32;
use serde::{Deserialize, Serialize};

/// Zoom limits and step sizes, in percent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: u32,
    pub max: u32,
    /// Step used by zoom in / zoom out
    pub step: u32,
    /// Step used per mouse wheel notch
    pub wheel_step: u32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 10,
            max: 200,
            step: 10,
            wheel_step: 5,
        }
    }
}

/// Host-supplied editor settings.
///
/// Every field has a default, so a host can pass a partial JSON object
/// (or nothing at all) and still get a usable editor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)] // if we add new fields, give them default values when deserializing old config
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub brush_color: Color32,
    pub brush_size: f32,
    pub font_size: f32,
    /// Imported images are scaled down to fit a square of this size
    pub import_max_size: u32,
    /// Selection resizes to this width/height or smaller are rejected
    pub min_selection_size: u32,
    /// Distance in pixels within which a pointer grabs a corner handle
    pub handle_radius: f32,
    pub zoom: ZoomConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            brush_color: Color32::BLACK,
            brush_size: 5.0,
            font_size: 20.0,
            import_max_size: 300,
            min_selection_size: 10,
            handle_radius: 6.0,
            zoom: ZoomConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EditorResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(EditorError::InvalidDimension(format!(
                "default canvas {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.zoom.min == 0 || self.zoom.min > self.zoom.max {
            return Err(EditorError::InvalidDimension(format!(
                "zoom range {}..={}",
                self.zoom.min, self.zoom.max
            )));
        }
        Ok(())
    }
}
