//! Label mask painting
//!
//! Converts the per-pixel data attached to detection, heatmap and segmentation
//! labels into RGBA32 overlay buffers, off the render path.

pub mod color;
pub mod coloring;
pub mod config;
pub mod error;
pub mod label;
pub mod logging;
pub mod mask;
pub mod painter;
pub mod resolver;
pub mod settings;
pub mod targets;
pub mod worker;

pub use color::{pack_rgba, Color, PackedColor};
pub use coloring::{ColorBy, Coloring};
pub use error::{PaintError, ResolveError};
pub use label::{Detection, Detections, Heatmap, Label, LabelKind, Segmentation, SegmentationState};
pub use mask::{ElementType, MaskData, MaskView, OverlayMask};
pub use painter::Painter;
pub use resolver::{ColorResolver, SeededColorResolver};
pub use targets::MaskTargets;
pub use worker::{PaintRequest, PaintWorker};
