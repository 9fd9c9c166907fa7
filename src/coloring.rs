/// Coloring configuration shared by all painters of one render pass
use std::collections::HashMap;

use serde::Deserialize;

use crate::color::Color;
use crate::error::PaintError;
use crate::targets::MaskTargets;

/// What a detection's color is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBy {
    Label,
    #[default]
    Field,
    Instance,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coloring {
    /// Candidate colors handed to the color resolver
    pub pool: Vec<Color>,
    #[serde(default)]
    pub seed: i64,
    #[serde(default)]
    pub by: ColorBy,
    /// Continuous scale used by heatmaps colored by label
    #[serde(default)]
    pub scale: Vec<Color>,
    /// Discrete palette for single-channel segmentation classes
    #[serde(default)]
    pub targets: Vec<Color>,
    #[serde(default)]
    pub mask_targets: HashMap<String, MaskTargets>,
    #[serde(default)]
    pub default_mask_targets: MaskTargets,
}

impl Coloring {
    pub fn new(pool: Vec<Color>, seed: i64, by: ColorBy) -> Self {
        Self {
            pool,
            seed,
            by,
            scale: Vec::new(),
            targets: Vec::new(),
            mask_targets: HashMap::new(),
            default_mask_targets: MaskTargets::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PaintError> {
        serde_json::from_str(json).map_err(|e| PaintError::InvalidColoring(e.to_string()))
    }

    /// Field-specific targets, falling back to the dataset default
    pub fn mask_targets_for(&self, field: &str) -> &MaskTargets {
        self.mask_targets
            .get(field)
            .unwrap_or(&self.default_mask_targets)
    }
}
