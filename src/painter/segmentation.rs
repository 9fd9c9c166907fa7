use log::debug;

use crate::color::{Color, PackedColor};
use crate::coloring::Coloring;
use crate::error::PaintError;
use crate::label::{Segmentation, SegmentationState};
use crate::mask::{read_rgb, with_view, MaskElement};
use crate::painter::Painter;
use crate::targets::MaskTargets;

/// Call-local memo of `class value mod palette length -> packed color`
struct ClassPalette<'a> {
    colors: &'a [Color],
    packed: Vec<Option<PackedColor>>,
}

impl<'a> ClassPalette<'a> {
    fn new(colors: &'a [Color]) -> Self {
        Self {
            colors,
            packed: vec![None; colors.len()],
        }
    }

    fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    fn get(&mut self, value: f64) -> PackedColor {
        let colors = self.colors;
        let index = (value.abs().round() as u64 % colors.len() as u64) as usize;
        *self.packed[index].get_or_insert_with(|| colors[index].packed())
    }
}

impl Painter {
    /// Paint a semantic segmentation mask
    ///
    /// Masks with more than two channels are RGB-encoded: they are painted with their own
    /// colors and rewritten in place to single-channel class ids, after which the label is
    /// `RgbDecoded` and cannot be painted again.
    pub async fn paint_segmentation(
        &self,
        field: &str,
        label: &mut Segmentation,
        coloring: &Coloring,
    ) -> Result<(), PaintError> {
        if label.state() == SegmentationState::RgbDecoded {
            return Err(PaintError::MaskAlreadyDecoded);
        }
        let Some(mask) = label.mask.as_mut() else {
            return Ok(());
        };

        let targets = coloring.mask_targets_for(field);
        let channels = mask.channels();

        if channels > 2 {
            let (view, overlay) = mask.split_mut();
            let cleared = with_view!(view, values => paint_rgb_classes(values, channels, overlay, targets));
            mask.collapse_to_single_channel();
            label.mark_rgb_decoded();
            debug!("Decoded RGB segmentation '{}', {} pixels cleared", field, cleared);
            return Ok(());
        }

        let single = if targets.len() == 1 {
            Some(self.request_color(coloring, field).await?.packed())
        } else {
            None
        };
        let mut palette = ClassPalette::new(&coloring.targets);
        let (view, overlay) = mask.split_mut();
        let cleared = with_view!(view, values => paint_class_ids(values, overlay, targets, single, &mut palette))?;
        debug!("Painted segmentation '{}', {} pixels cleared", field, cleared);
        Ok(())
    }
}

/// RGB-encoded masks: returns the number of cleared pixels
fn paint_rgb_classes<T: MaskElement>(
    values: &mut [T],
    channels: usize,
    overlay: &mut [PackedColor],
    targets: &MaskTargets,
) -> usize {
    let filter = !targets.is_empty() && targets.is_rgb();
    let mut cleared = 0;

    // pixel i is written to values[i] only after it was read from values[i * channels..]
    for i in 0..overlay.len() {
        let (r, g, b) = read_rgb(values, channels, i);
        let color = Color::from_channels(r.to_f64(), g.to_f64(), b.to_f64());
        let entry = targets.rgb_target(&color);

        if color.is_black() || (filter && entry.is_none()) {
            values[i] = T::zero();
            cleared += 1;
            continue;
        }

        overlay[i] = color.packed();
        // non-zero placeholder keeps the pixel visible to tooltip lookups
        values[i] = match entry {
            Some(target) => T::from_class_id(target.int_target),
            None => r,
        };
    }

    cleared
}

/// Single-channel class maps: returns the number of cleared pixels
///
/// An empty palette is only an error when some kept pixel needs it; the mask is
/// left untouched in that case.
fn paint_class_ids<T: MaskElement>(
    values: &mut [T],
    overlay: &mut [PackedColor],
    targets: &MaskTargets,
    single: Option<PackedColor>,
    palette: &mut ClassPalette,
) -> Result<usize, PaintError> {
    let filter = !targets.is_empty() && !targets.is_rgb();
    let kept = |value: &T| value.is_set() && (!filter || targets.contains_class(value.to_f64()));

    if single.is_none() && palette.is_empty() && values.iter().take(overlay.len()).any(kept) {
        return Err(PaintError::EmptyPalette("targets"));
    }

    let mut cleared = 0;

    for (pixel, value) in overlay.iter_mut().zip(values.iter_mut()) {
        if !value.is_set() {
            continue;
        }

        let class = value.to_f64();
        if filter && !targets.contains_class(class) {
            *value = T::zero();
            cleared += 1;
            continue;
        }

        *pixel = match single {
            Some(color) => color,
            None => palette.get(class),
        };
    }

    Ok(cleared)
}
