use crate::error::{EditorError, EditorResult};
use crate::image::PixelBuffer;
use crate::layer::{Layer, LayerId};

/// An ordered stack of equally sized layers.
///
/// Index 0 is the bottom of the stack. The stack is never empty and the
/// current index always points at an existing layer.
#[derive(Debug, Clone)]
pub struct Document {
    layers: Vec<Layer>,
    current: usize,
    width: u32,
    height: u32,
}

/// Parses the width/height typed into the new-canvas prompt
pub fn parse_dimensions(width: &str, height: &str) -> EditorResult<(u32, u32)> {
    let parse = |value: &str| -> Option<u32> {
        let parsed = value.trim().parse::<i64>().ok()?;
        u32::try_from(parsed).ok().filter(|v| *v > 0)
    };
    match (parse(width), parse(height)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(EditorError::InvalidDimension(format!(
            "{width:?} x {height:?}: please enter positive whole numbers"
        ))),
    }
}

impl Document {
    /// Creates a document with a single transparent layer named "Layer 1"
    pub fn new(width: u32, height: u32) -> EditorResult<Self> {
        validate_dimensions(width, height)?;
        Ok(Self {
            layers: vec![Layer::new("Layer 1", width, height)],
            current: 0,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_layer(&self) -> &Layer {
        &self.layers[self.current]
    }

    pub fn current_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.current]
    }

    pub fn layer(&self, index: usize) -> EditorResult<&Layer> {
        let len = self.layers.len();
        self.layers
            .get(index)
            .ok_or(EditorError::IndexOutOfRange { index, len })
    }

    pub fn layer_mut(&mut self, index: usize) -> EditorResult<&mut Layer> {
        let len = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(EditorError::IndexOutOfRange { index, len })
    }

    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    pub fn layer_by_id_mut(&mut self, id: LayerId) -> EditorResult<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|layer| layer.id == id)
            .ok_or(EditorError::LayerNotFound(id))
    }

    /// Appends a transparent layer on top and makes it current
    pub fn add_layer(&mut self) -> LayerId {
        let name = format!("Layer {}", self.layers.len() + 1);
        let layer = Layer::new(&name, self.width, self.height);
        let id = layer.id;
        self.layers.push(layer);
        self.current = self.layers.len() - 1;
        log::info!("Added {name} ({id})");
        id
    }

    /// Checks that `delete_layer(index)` would succeed
    pub fn check_delete(&self, index: usize) -> EditorResult<()> {
        if self.layers.len() <= 1 {
            return Err(EditorError::LastLayer);
        }
        self.layer(index).map(drop)
    }

    pub fn delete_layer(&mut self, index: usize) -> EditorResult<Layer> {
        self.check_delete(index)?;

        let removed = self.layers.remove(index);
        if self.current >= self.layers.len() {
            self.current = self.layers.len() - 1;
        }
        log::info!("Deleted {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    pub fn select_layer(&mut self, index: usize) -> EditorResult<()> {
        self.layer(index)?;
        self.current = index;
        Ok(())
    }

    pub fn set_visibility(&mut self, index: usize, visible: bool) -> EditorResult<()> {
        self.layer_mut(index)?.visible = visible;
        Ok(())
    }

    /// Moves the layer at `from` to `to`, keeping the current index on the same layer
    pub fn reorder(&mut self, from: usize, to: usize) -> EditorResult<()> {
        self.layer(from)?;
        self.layer(to)?;
        if from == to {
            return Ok(());
        }

        let moved = self.layers.remove(from);
        self.layers.insert(to, moved);

        if self.current == from {
            self.current = to;
        } else if from < self.current && to >= self.current {
            self.current -= 1;
        } else if from > self.current && to <= self.current {
            self.current += 1;
        }
        Ok(())
    }

    /// Alpha-over of every visible layer, bottom to top
    pub fn composite(&self) -> PixelBuffer {
        let mut out = PixelBuffer::new(self.width, self.height);
        for layer in self.layers.iter().filter(|layer| layer.visible) {
            out.blit_over(0, 0, layer.buffer());
        }
        out
    }

    /// Reallocates every layer at the new size. Content is discarded.
    pub fn resize_all(&mut self, width: u32, height: u32) -> EditorResult<()> {
        validate_dimensions(width, height)?;
        for layer in &mut self.layers {
            layer.reallocate(width, height);
        }
        self.width = width;
        self.height = height;
        log::info!("Resized {} layers to {width}x{height}", self.layers.len());
        Ok(())
    }
}

fn validate_dimensions(width: u32, height: u32) -> EditorResult<()> {
    if width == 0 || height == 0 {
        return Err(EditorError::InvalidDimension(format!("{width}x{height}")));
    }
    Ok(())
}
