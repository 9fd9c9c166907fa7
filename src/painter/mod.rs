//! Mask-to-overlay painters
//!
//! One painter per label kind. Each call resolves its colors first (the only await
//! points), then runs a single synchronous pass over the pixels, writing packed
//! RGBA32 values into the label's overlay buffer.

use std::sync::Arc;

use log::{debug, warn};

use crate::color::Color;
use crate::coloring::Coloring;
use crate::error::PaintError;
use crate::label::Label;
use crate::resolver::ColorResolver;

pub mod detection;
pub mod heatmap;
pub mod segmentation;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Clone)]
pub struct Painter {
    resolver: Arc<dyn ColorResolver>,
}

impl Painter {
    pub fn new(resolver: Arc<dyn ColorResolver>) -> Self {
        Self { resolver }
    }

    pub fn with_resolver<R: ColorResolver + 'static>(resolver: R) -> Self {
        Self::new(Arc::new(resolver))
    }

    pub fn resolver(&self) -> &Arc<dyn ColorResolver> {
        &self.resolver
    }

    /// Paint any label kind, mutating its overlay (and for segmentations, its mask)
    pub async fn paint(&self, field: &str, label: &mut Label, coloring: &Coloring) -> Result<(), PaintError> {
        debug!("Painting {} for field '{}'", label.kind().as_str(), field);
        let kind = label.kind();
        let result = match label {
            Label::Detection(detection) => self.paint_detection(field, detection, coloring).await,
            Label::Detections(detections) => self.paint_detections(field, detections, coloring).await,
            Label::Heatmap(heatmap) => self.paint_heatmap(field, heatmap, coloring).await,
            Label::Segmentation(segmentation) => self.paint_segmentation(field, segmentation, coloring).await,
        };
        if let Err(e) = &result {
            warn!("Rejected {} for field '{}': {}", kind.as_str(), field, e);
        }
        result
    }

    async fn request_color(&self, coloring: &Coloring, key: &str) -> Result<Color, PaintError> {
        let color = self.resolver.resolve(&coloring.pool, coloring.seed, key).await?;
        Ok(color)
    }
}

impl std::fmt::Debug for Painter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Painter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{blank_mask, coloring, RecordingResolver, FIELD_COLOR};
    use super::*;
    use crate::label::{Detection, Heatmap, Segmentation};
    use crate::mask::MaskData;

    #[tokio::test]
    async fn test_dispatch_by_variant() {
        let resolver = Arc::new(RecordingResolver::new());
        let painter = Painter::new(resolver.clone());
        let coloring = coloring();

        let mut detection = Label::Detection(Detection::new(
            "id1",
            "cat",
            Some(blank_mask(MaskData::U8(vec![1, 0]), 1)),
        ));
        painter.paint("gt", &mut detection, &coloring).await.unwrap();

        let mut heatmap = Label::Heatmap(Heatmap {
            map: Some(blank_mask(MaskData::U8(vec![10, 20, 30]), 3)),
            range: None,
        });
        painter.paint("gt", &mut heatmap, &coloring).await.unwrap();

        let mut segmentation = Label::Segmentation(Segmentation::new(None));
        painter.paint("gt", &mut segmentation, &coloring).await.unwrap();

        assert_eq!(resolver.calls(), vec!["gt".to_string()]);
        if let Label::Detection(d) = &detection {
            assert_eq!(d.mask.as_ref().unwrap().overlay(), &[FIELD_COLOR.packed(), 0]);
        }
    }

    #[tokio::test]
    async fn test_resolver_failure_is_returned() {
        let painter = Painter::new(Arc::new(RecordingResolver::failing("gt")));
        let mut label = Label::Detection(Detection::new(
            "id1",
            "cat",
            Some(blank_mask(MaskData::U8(vec![1]), 1)),
        ));
        let result = painter.paint("gt", &mut label, &coloring()).await;
        assert!(matches!(result, Err(PaintError::ColorResolution(_))));
    }
}
