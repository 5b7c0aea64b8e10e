use crate::image::PixelBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A stable identifier for a layer.
///
/// Unlike the layer's position, this survives reordering and the deletion
/// of other layers, so history entries can find their layer again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single independently rasterized layer
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    /// Display name of the layer
    pub name: String,
    /// Whether the layer takes part in compositing
    pub visible: bool,
    buffer: PixelBuffer,
}

impl Layer {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            id: LayerId::new(),
            name: name.to_string(),
            visible: true,
            buffer: PixelBuffer::new(width, height),
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    /// Discards the content and allocates a transparent buffer of the new size
    pub(crate) fn reallocate(&mut self, width: u32, height: u32) {
        self.buffer = PixelBuffer::new(width, height);
    }
}
