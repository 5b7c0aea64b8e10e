use crate::document::Document;
use crate::error::EditorResult;
use crate::image::PixelBuffer;
use crate::layer::LayerId;

/// A PNG-encoded copy of one layer's buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    bytes: Vec<u8>,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl Snapshot {
    pub fn capture(buffer: &PixelBuffer) -> EditorResult<Self> {
        Ok(Self {
            bytes: buffer.encode_png()?,
        })
    }

    pub fn restore(&self) -> EditorResult<PixelBuffer> {
        PixelBuffer::decode(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// The layer the snapshot belongs to
    pub layer_id: LayerId,
    /// Where that layer sat in the stack when the snapshot was taken
    pub layer_index: usize,
    pub snapshot: Snapshot,
}

/// Snapshot-based undo/redo of layer pixels
#[derive(Debug, Default)]
pub struct History {
    /// Stack of states that can be restored by undo
    undo_stack: Vec<HistoryEntry>,
    /// Stack of states that can be restored by redo
    redo_stack: Vec<HistoryEntry>,
}

impl History {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current content of `layer_index` before it gets mutated.
    ///
    /// Call once per gesture, not per pointer sample.
    pub fn snapshot_before(&mut self, document: &Document, layer_index: usize) -> EditorResult<()> {
        let entry = capture(document, layer_index)?;
        log::debug!(
            "Snapshot of layer {} ({}), {} bytes",
            entry.layer_index,
            entry.layer_id,
            entry.snapshot.len()
        );
        self.undo_stack.push(entry);
        self.redo_stack.clear(); // Clear redo stack when a new change is recorded
        Ok(())
    }

    /// Restores the most recent undo snapshot. Returns `false` if nothing changed.
    pub fn undo(&mut self, document: &mut Document) -> EditorResult<bool> {
        step(&mut self.undo_stack, &mut self.redo_stack, document)
    }

    /// Restores the most recent redo snapshot. Returns `false` if nothing changed.
    pub fn redo(&mut self, document: &mut Document) -> EditorResult<bool> {
        step(&mut self.redo_stack, &mut self.undo_stack, document)
    }

    /// Returns true if there are states that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are states that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear the history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn capture(document: &Document, layer_index: usize) -> EditorResult<HistoryEntry> {
    let layer = document.layer(layer_index)?;
    Ok(HistoryEntry {
        layer_id: layer.id,
        layer_index,
        snapshot: Snapshot::capture(layer.buffer())?,
    })
}

/// Pops from `source`, saves the layer's current state onto `target`, restores.
fn step(
    source: &mut Vec<HistoryEntry>,
    target: &mut Vec<HistoryEntry>,
    document: &mut Document,
) -> EditorResult<bool> {
    let Some(entry) = source.pop() else {
        return Ok(false);
    };

    let Some(index) = document.index_of(entry.layer_id) else {
        log::warn!(
            "Dropping history entry for deleted layer {} (was at index {})",
            entry.layer_id,
            entry.layer_index
        );
        return Ok(false);
    };

    // On failure the entry goes back so the stacks stay as they were
    let current = match restore_into(document, index, &entry) {
        Ok(current) => current,
        Err(err) => {
            source.push(entry);
            return Err(err);
        }
    };
    target.push(current);
    Ok(true)
}

/// Swaps the layer's buffer for the entry's snapshot, returning the replaced state
fn restore_into(
    document: &mut Document,
    index: usize,
    entry: &HistoryEntry,
) -> EditorResult<HistoryEntry> {
    let restored = entry.snapshot.restore()?;
    let current = capture(document, index)?;
    document.layer_mut(index)?.buffer_mut().replace_with(restored)?;
    Ok(current)
}
