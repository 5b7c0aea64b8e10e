#![warn(clippy::all, rust_2018_idioms)]

pub mod blend;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod image;
pub mod layer;
pub mod loader;
pub mod selection;
pub mod state;
pub mod surface;
pub mod tools;
pub mod view;

pub use crate::command::{Command, History};
pub use crate::config::{EditorConfig, ZoomConfig};
pub use crate::document::{Document, parse_dimensions};
pub use crate::error::{EditorError, EditorResult};
pub use crate::geometry::{Corner, PixelRect};
pub use crate::image::PixelBuffer;
pub use crate::layer::{Layer, LayerId};
pub use crate::loader::{LoadTarget, LoadedImage, PendingLoad};
pub use crate::selection::{Selection, SelectionEngine, SelectionPhase};
pub use crate::state::EditorState;
pub use crate::surface::{DrawingSurface, TextFont};
pub use crate::tools::{ShapeKind, ToolKind};
pub use crate::view::ViewTransform;
