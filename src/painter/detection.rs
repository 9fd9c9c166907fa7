use futures::future::try_join_all;
use log::debug;

use crate::color::PackedColor;
use crate::coloring::{ColorBy, Coloring};
use crate::error::PaintError;
use crate::label::{Detection, Detections};
use crate::mask::{with_view, MaskElement};
use crate::painter::Painter;

impl Painter {
    /// Paint one instance mask with a single color
    ///
    /// The mask spans the detection's bounding box. A detection without a mask is left alone.
    pub async fn paint_detection(
        &self,
        field: &str,
        label: &mut Detection,
        coloring: &Coloring,
    ) -> Result<(), PaintError> {
        if label.mask.is_none() {
            return Ok(());
        }

        let key = match coloring.by {
            ColorBy::Label => label.label.as_str(),
            ColorBy::Field => field,
            ColorBy::Instance => label.id.as_str(),
        };
        let color = self.request_color(coloring, key).await?.packed();

        if let Some(mask) = label.mask.as_mut() {
            let (view, overlay) = mask.split_mut();
            with_view!(view, values => fill_indicated(values, overlay, color));
        }
        Ok(())
    }

    /// Paint every child detection concurrently; the first failure fails the batch
    pub async fn paint_detections(
        &self,
        field: &str,
        labels: &mut Detections,
        coloring: &Coloring,
    ) -> Result<(), PaintError> {
        debug!("Painting {} detections for field '{}'", labels.detections.len(), field);
        let paints = labels
            .detections
            .iter_mut()
            .map(|detection| self.paint_detection(field, detection, coloring));
        try_join_all(paints).await?;
        Ok(())
    }
}

/// Write `color` wherever the indicator is set, leave other pixels untouched
fn fill_indicated<T: MaskElement>(indicator: &[T], overlay: &mut [PackedColor], color: PackedColor) {
    // these loops must be fast
    for (pixel, value) in overlay.iter_mut().zip(indicator.iter()) {
        if value.is_set() {
            *pixel = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mask::{MaskData, OverlayMask};
    use crate::painter::testing::{blank_mask, coloring, RecordingResolver, FIELD_COLOR};

    const BACKGROUND: PackedColor = 0x11223344;

    #[tokio::test]
    async fn test_writes_only_where_indicator_set() {
        let painter = Painter::with_resolver(RecordingResolver::new());
        let mask = OverlayMask::new(MaskData::U8(vec![0, 1, 0, 255]), 1, vec![BACKGROUND; 4]).unwrap();
        let mut detection = Detection::new("abc", "cat", Some(mask));

        painter.paint_detection("gt", &mut detection, &coloring()).await.unwrap();

        let color = FIELD_COLOR.packed();
        assert_eq!(
            detection.mask.unwrap().overlay(),
            &[BACKGROUND, color, BACKGROUND, color]
        );
    }

    #[tokio::test]
    async fn test_float_indicator() {
        let painter = Painter::with_resolver(RecordingResolver::new());
        let mut detection = Detection::new(
            "abc",
            "cat",
            Some(blank_mask(MaskData::F32(vec![0.0, 0.25, f32::NAN]), 1)),
        );

        painter.paint_detection("gt", &mut detection, &coloring()).await.unwrap();

        assert_eq!(detection.mask.unwrap().overlay(), &[0, FIELD_COLOR.packed(), 0]);
    }

    #[tokio::test]
    async fn test_missing_mask_is_noop() {
        let resolver = Arc::new(RecordingResolver::new());
        let painter = Painter::new(resolver.clone());
        let mut detection = Detection::new("abc", "cat", None);

        painter.paint_detection("gt", &mut detection, &coloring()).await.unwrap();

        assert!(resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_color_key_follows_coloring_by() {
        let resolver = Arc::new(RecordingResolver::new());
        let painter = Painter::new(resolver.clone());
        let mut coloring = coloring();

        for by in [ColorBy::Label, ColorBy::Field, ColorBy::Instance] {
            coloring.by = by;
            let mut detection = Detection::new("abc", "cat", Some(blank_mask(MaskData::U8(vec![1]), 1)));
            painter.paint_detection("gt", &mut detection, &coloring).await.unwrap();
        }

        assert_eq!(resolver.calls(), vec!["cat", "gt", "abc"]);
    }

    #[tokio::test]
    async fn test_detections_paint_every_child() {
        let painter = Painter::with_resolver(RecordingResolver::new());
        let mut labels = Detections {
            detections: vec![
                Detection::new("a", "cat", Some(blank_mask(MaskData::U8(vec![1, 0]), 1))),
                Detection::new("b", "dog", None),
                Detection::new("c", "cat", Some(blank_mask(MaskData::U16(vec![0, 3]), 1))),
            ],
        };

        painter.paint_detections("gt", &mut labels, &coloring()).await.unwrap();

        let color = FIELD_COLOR.packed();
        assert_eq!(labels.detections[0].mask.as_ref().unwrap().overlay(), &[color, 0]);
        assert_eq!(labels.detections[2].mask.as_ref().unwrap().overlay(), &[0, color]);
    }

    #[tokio::test]
    async fn test_detections_fail_as_a_batch() {
        let painter = Painter::with_resolver(RecordingResolver::failing("dog"));
        let mut coloring = coloring();
        coloring.by = ColorBy::Label;
        let mut labels = Detections {
            detections: vec![
                Detection::new("a", "cat", Some(blank_mask(MaskData::U8(vec![1]), 1))),
                Detection::new("b", "dog", Some(blank_mask(MaskData::U8(vec![1]), 1))),
            ],
        };

        let result = painter.paint_detections("gt", &mut labels, &coloring).await;

        assert!(matches!(result, Err(PaintError::ColorResolution(e)) if e.key == "dog"));
    }
}
