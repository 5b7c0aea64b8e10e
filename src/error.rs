use crate::layer::LayerId;
use thiserror::Error;

pub type EditorResult<T> = std::result::Result<T, EditorError>;

/// Errors that can occur while editing a document
#[derive(Debug, Error)]
pub enum EditorError {
    /// Width or height for a new canvas was missing, non-numeric or not positive
    #[error("invalid canvas dimensions: {0}")]
    InvalidDimension(String),

    /// The document must always keep at least one layer
    #[error("cannot delete the last remaining layer")]
    LastLayer,

    #[error("layer index {index} is out of range for {len} layers")]
    IndexOutOfRange { index: usize, len: usize },

    /// A selection resize would shrink below the minimum size
    #[error("selection resize to {width}x{height} rejected")]
    ResizeRejected { width: i32, height: i32 },

    #[error("layer {0} no longer exists")]
    LayerNotFound(LayerId),

    #[error("buffer is {actual:?} but the document is {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("no font loaded for the text tool")]
    NoFont,

    #[error(transparent)]
    Font(#[from] ab_glyph::InvalidFont),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] serde_json::Error),

    /// The image load was superseded by a newer one for the same target
    #[error("image load was cancelled")]
    LoadCancelled,
}

impl EditorError {
    /// True for errors that reject one user action and leave the editor
    /// untouched, as opposed to failures of the environment (I/O, codecs).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EditorError::InvalidDimension(_)
                | EditorError::LastLayer
                | EditorError::IndexOutOfRange { .. }
                | EditorError::ResizeRejected { .. }
                | EditorError::LayerNotFound(_)
                | EditorError::NoFont
        )
    }
}
