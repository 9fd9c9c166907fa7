/// Error types for mask painting
///
/// A paint call either fully completes its overlay buffer or returns one of these.
use std::fmt;

use crate::mask::ElementType;

/// Failure reported by a `ColorResolver`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    pub key: String,
    pub reason: String,
}

impl ResolveError {
    pub fn new(key: &str, reason: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to resolve color for '{}': {}", self.key, self.reason)
    }
}

impl std::error::Error for ResolveError {}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintError {
    /// The element-width tag of a mask buffer is not one of the supported numeric types
    UnsupportedElementWidth(String),
    /// Mask targets mix integer and hex keys, or contain keys of neither kind
    MalformedMaskTargets(String),
    ColorResolution(ResolveError),
    BufferSizeMismatch { expected: usize, actual: usize },
    /// Raw bytes cannot be viewed as the requested element type without copying
    MisalignedBuffer(ElementType),
    InvalidChannels(usize),
    /// A palette needed by the requested coloring mode is empty
    EmptyPalette(&'static str),
    /// The segmentation mask was already rewritten from RGB to class ids
    MaskAlreadyDecoded,
    InvalidColor(String),
    InvalidColoring(String),
    WorkerClosed,
}

impl fmt::Display for PaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintError::UnsupportedElementWidth(tag) => {
                write!(f, "unsupported mask element type '{}'", tag)
            }
            PaintError::MalformedMaskTargets(reason) => write!(f, "malformed mask targets: {}", reason),
            PaintError::ColorResolution(err) => write!(f, "{}", err),
            PaintError::BufferSizeMismatch { expected, actual } => {
                write!(f, "buffer size mismatch: expected {} elements, got {}", expected, actual)
            }
            PaintError::MisalignedBuffer(ty) => {
                write!(f, "byte buffer cannot be viewed as {} without copying", ty)
            }
            PaintError::InvalidChannels(channels) => write!(f, "invalid channel count {}", channels),
            PaintError::EmptyPalette(name) => write!(f, "coloring.{} is empty", name),
            PaintError::MaskAlreadyDecoded => {
                write!(f, "segmentation mask was already decoded from RGB and cannot be repainted")
            }
            PaintError::InvalidColor(value) => write!(f, "invalid color '{}'", value),
            PaintError::InvalidColoring(reason) => write!(f, "invalid coloring: {}", reason),
            PaintError::WorkerClosed => write!(f, "paint worker is no longer running"),
        }
    }
}

impl std::error::Error for PaintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaintError::ColorResolution(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResolveError> for PaintError {
    fn from(err: ResolveError) -> Self {
        PaintError::ColorResolution(err)
    }
}
