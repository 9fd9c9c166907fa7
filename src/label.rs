/// Label variants that carry paintable masks
use crate::mask::OverlayMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Detection,
    Detections,
    Heatmap,
    Segmentation,
}

impl LabelKind {
    /// Parse a label class name such as `"Detection"`
    pub fn from_cls(cls: &str) -> Option<Self> {
        match cls {
            "Detection" => Some(LabelKind::Detection),
            "Detections" => Some(LabelKind::Detections),
            "Heatmap" => Some(LabelKind::Heatmap),
            "Segmentation" => Some(LabelKind::Segmentation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKind::Detection => "Detection",
            LabelKind::Detections => "Detections",
            LabelKind::Heatmap => "Heatmap",
            LabelKind::Segmentation => "Segmentation",
        }
    }
}

/// Object detection; its mask covers the bounding box only
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Detection {
    pub id: String,
    pub label: String,
    pub mask: Option<OverlayMask>,
}

impl Detection {
    pub fn new(id: &str, label: &str, mask: Option<OverlayMask>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            mask,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Detections {
    pub detections: Vec<Detection>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Heatmap {
    pub map: Option<OverlayMask>,
    /// Value range `(start, stop)`; defaults depend on the element type
    pub range: Option<(f64, f64)>,
}

/// Whether a segmentation mask still holds its original encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentationState {
    #[default]
    Encoded,
    /// RGB mask rewritten in place to single-channel class ids
    RgbDecoded,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segmentation {
    pub mask: Option<OverlayMask>,
    state: SegmentationState,
}

impl Segmentation {
    pub fn new(mask: Option<OverlayMask>) -> Self {
        Self {
            mask,
            state: SegmentationState::Encoded,
        }
    }

    pub fn state(&self) -> SegmentationState {
        self.state
    }

    pub(crate) fn mark_rgb_decoded(&mut self) {
        self.state = SegmentationState::RgbDecoded;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    Detection(Detection),
    Detections(Detections),
    Heatmap(Heatmap),
    Segmentation(Segmentation),
}

impl Label {
    pub fn kind(&self) -> LabelKind {
        match self {
            Label::Detection(_) => LabelKind::Detection,
            Label::Detections(_) => LabelKind::Detections,
            Label::Heatmap(_) => LabelKind::Heatmap,
            Label::Segmentation(_) => LabelKind::Segmentation,
        }
    }
}
