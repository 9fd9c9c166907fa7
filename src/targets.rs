/// Mask targets: semantic meaning of raw class values or RGB codes
///
/// A mapping is keyed either by integer class id or by `#rrggbb` hex code, never both.
/// The scheme is decided once, when the mapping is built.
use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use crate::color::Color;
use crate::error::PaintError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ClassTarget {
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RgbTarget {
    pub int_target: u32,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskTargets {
    ClassIds(HashMap<u32, ClassTarget>),
    Rgb(HashMap<Color, RgbTarget>),
}

impl Default for MaskTargets {
    fn default() -> Self {
        MaskTargets::ClassIds(HashMap::new())
    }
}

/// One entry as it appears before the key scheme is known
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTarget {
    Label(String),
    Entry {
        #[serde(default, rename = "intTarget")]
        int_target: Option<u32>,
        #[serde(default)]
        label: Option<String>,
    },
}

impl RawTarget {
    fn into_parts(self) -> (Option<u32>, String) {
        match self {
            RawTarget::Label(label) => (None, label),
            RawTarget::Entry { int_target, label } => (int_target, label.unwrap_or_default()),
        }
    }
}

enum KeyScheme {
    ClassId(u32),
    Hex(Color),
}

fn classify_key(key: &str) -> Result<KeyScheme, PaintError> {
    if key.starts_with('#') {
        let digits = &key[1..];
        if digits.len() != 6 {
            return Err(PaintError::MalformedMaskTargets(format!("'{}' is not a #rrggbb code", key)));
        }
        return Color::parse_hex(key)
            .map(KeyScheme::Hex)
            .map_err(|_| PaintError::MalformedMaskTargets(format!("'{}' is not a #rrggbb code", key)));
    }

    key.trim()
        .parse::<u32>()
        .map(KeyScheme::ClassId)
        .map_err(|_| PaintError::MalformedMaskTargets(format!("'{}' is neither a class id nor a hex code", key)))
}

impl MaskTargets {
    /// Build targets from string keys, detecting the key scheme
    ///
    /// Fails with `MalformedMaskTargets` when schemes are mixed, a key is unparsable,
    /// or a hex entry has no `intTarget`.
    pub fn from_entries<I>(entries: I) -> Result<Self, PaintError>
    where
        I: IntoIterator<Item = (String, RawTarget)>,
    {
        let mut class_ids = HashMap::new();
        let mut rgb = HashMap::new();

        for (key, raw) in entries {
            let (int_target, label) = raw.into_parts();
            match classify_key(&key)? {
                KeyScheme::ClassId(id) => {
                    class_ids.insert(id, ClassTarget { label });
                }
                KeyScheme::Hex(color) => {
                    let int_target = int_target.ok_or_else(|| {
                        PaintError::MalformedMaskTargets(format!("'{}' has no intTarget", key))
                    })?;
                    rgb.insert(color, RgbTarget { int_target, label });
                }
            }

            if !class_ids.is_empty() && !rgb.is_empty() {
                return Err(PaintError::MalformedMaskTargets(
                    "class id keys and hex keys are mixed".to_string(),
                ));
            }
        }

        if rgb.is_empty() {
            Ok(MaskTargets::ClassIds(class_ids))
        } else {
            Ok(MaskTargets::Rgb(rgb))
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MaskTargets::ClassIds(map) => map.len(),
            MaskTargets::Rgb(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_rgb(&self) -> bool {
        matches!(self, MaskTargets::Rgb(_))
    }

    /// Whether a raw mask value names a class in an integer-keyed mapping
    ///
    /// Only integral, non-negative values can match. Always false for hex-keyed targets.
    #[inline]
    pub fn contains_class(&self, value: f64) -> bool {
        match self {
            MaskTargets::ClassIds(map) => {
                value >= 0.0
                    && value.fract() == 0.0
                    && value <= u32::MAX as f64
                    && map.contains_key(&(value as u32))
            }
            MaskTargets::Rgb(_) => false,
        }
    }

    pub fn rgb_target(&self, color: &Color) -> Option<&RgbTarget> {
        match self {
            MaskTargets::Rgb(map) => map.get(color),
            MaskTargets::ClassIds(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for MaskTargets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, RawTarget> = HashMap::deserialize(deserializer)?;
        MaskTargets::from_entries(raw).map_err(serde::de::Error::custom)
    }
}
