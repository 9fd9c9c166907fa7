use log::debug;

use crate::color::{pack_rgba, Color, PackedColor};
use crate::coloring::{ColorBy, Coloring};
use crate::error::PaintError;
use crate::label::Heatmap;
use crate::mask::{read_rgb, with_view, MaskElement};
use crate::painter::Painter;

/// How a scalar heatmap value becomes a color
enum Shade<'a> {
    /// Pick from the coloring scale by position within `[start, stop]`
    Scale {
        start: f64,
        stop: f64,
        scale: &'a [PackedColor],
    },
    /// Base color with alpha proportional to `|value| / max`
    Intensity { color: Color, max: f64 },
}

impl Shade<'_> {
    #[inline]
    fn color(&self, value: f64) -> PackedColor {
        match self {
            Shade::Scale { start, stop, scale } => scale[scale_index(value, *start, *stop, scale.len())],
            Shade::Intensity { color, max } => {
                let alpha = if *max == 0.0 { 1.0 } else { value.abs().min(*max) / max };
                pack_rgba(*color, alpha)
            }
        }
    }
}

/// Index into a scale of `len` colors, clamped to `0..len`
pub fn scale_index(value: f64, start: f64, stop: f64, len: usize) -> usize {
    let last = len.saturating_sub(1) as f64;
    let span = stop - start;
    let ratio = if span == 0.0 {
        if value > start { 1.0 } else { 0.0 }
    } else {
        (value - start).max(0.0) / span
    };
    (ratio * last).round().clamp(0.0, last) as usize
}

/// Default `[start, stop]` for heatmaps without an explicit range
pub fn default_range(is_float: bool) -> (f64, f64) {
    if is_float {
        (0.0, 1.0)
    } else {
        (0.0, 255.0)
    }
}

impl Painter {
    /// Paint a heatmap, either as a direct RGB map or as a scalar intensity map
    pub async fn paint_heatmap(
        &self,
        field: &str,
        label: &mut Heatmap,
        coloring: &Coloring,
    ) -> Result<(), PaintError> {
        let range = label.range;
        let Some(map) = label.map.as_mut() else {
            return Ok(());
        };

        let channels = map.channels();
        if channels > 2 {
            let (view, overlay) = map.split_mut();
            with_view!(view, values => paint_rgb_map(values, channels, overlay));
            return Ok(());
        }

        let (start, stop) = range.unwrap_or_else(|| default_range(map.element_type().is_float()));
        let max = start.abs().max(stop.abs());
        let color = self.request_color(coloring, field).await?;

        let scale: Vec<PackedColor>;
        let shade = match coloring.by {
            ColorBy::Label => {
                if coloring.scale.is_empty() {
                    return Err(PaintError::EmptyPalette("scale"));
                }
                scale = coloring.scale.iter().map(Color::packed).collect();
                Shade::Scale { start, stop, scale: &scale }
            }
            _ => Shade::Intensity { color, max },
        };

        debug!("Painting scalar heatmap '{}' over [{}, {}]", field, start, stop);
        let (view, overlay) = map.split_mut();
        with_view!(view, values => paint_scalar_map(values, overlay, &shade));
        Ok(())
    }
}

fn paint_rgb_map<T: MaskElement>(values: &[T], channels: usize, overlay: &mut [PackedColor]) {
    for (i, pixel) in overlay.iter_mut().enumerate() {
        let (r, g, b) = read_rgb(values, channels, i);
        *pixel = Color::from_channels(r.to_f64(), g.to_f64(), b.to_f64()).packed();
    }
}

fn paint_scalar_map<T: MaskElement>(values: &[T], overlay: &mut [PackedColor], shade: &Shade) {
    // these loops must be fast; zero means "no value" and is never written
    for (pixel, value) in overlay.iter_mut().zip(values.iter()) {
        if value.is_set() {
            *pixel = shade.color(value.to_f64());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::color::unpack_rgba;
    use crate::mask::{MaskData, OverlayMask};
    use crate::painter::testing::{blank_mask, coloring, RecordingResolver, FIELD_COLOR};

    fn scale_coloring() -> Coloring {
        let mut coloring = coloring();
        coloring.by = ColorBy::Label;
        coloring.scale = vec![
            Color::new(0, 0, 0),
            Color::new(100, 0, 0),
            Color::new(200, 0, 0),
        ];
        coloring
    }

    #[test]
    fn test_scale_index_bounds() {
        assert_eq!(scale_index(10.0, 10.0, 20.0, 3), 0);
        assert_eq!(scale_index(20.0, 10.0, 20.0, 3), 2);
        assert_eq!(scale_index(15.0, 10.0, 20.0, 3), 1);
        assert_eq!(scale_index(2.0, 10.0, 20.0, 3), 0);
        assert_eq!(scale_index(99.0, 10.0, 20.0, 3), 2);
        assert_eq!(scale_index(5.0, 5.0, 5.0, 3), 0);
        assert_eq!(scale_index(6.0, 5.0, 5.0, 3), 2);
    }

    #[test]
    fn test_default_range() {
        assert_eq!(default_range(true), (0.0, 1.0));
        assert_eq!(default_range(false), (0.0, 255.0));
    }

    #[tokio::test]
    async fn test_rgb_map_skips_resolver() {
        let resolver = Arc::new(RecordingResolver::new());
        let painter = Painter::new(resolver.clone());
        let mut heatmap = Heatmap {
            map: Some(blank_mask(MaskData::U8(vec![10, 20, 30]), 3)),
            range: None,
        };

        painter.paint_heatmap("heat", &mut heatmap, &coloring()).await.unwrap();

        assert_eq!(heatmap.map.unwrap().overlay(), &[Color::new(10, 20, 30).packed()]);
        assert!(resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_zero_is_never_written() {
        let painter = Painter::with_resolver(RecordingResolver::new());
        for coloring in [coloring(), scale_coloring()] {
            let mask = OverlayMask::new(MaskData::U8(vec![0, 0, 128]), 1, vec![7; 3]).unwrap();
            let mut heatmap = Heatmap { map: Some(mask), range: None };
            painter.paint_heatmap("heat", &mut heatmap, &coloring).await.unwrap();
            let overlay = heatmap.map.unwrap().overlay().to_vec();
            assert_eq!(&overlay[..2], &[7, 7]);
            assert_ne!(overlay[2], 7);
        }
    }

    #[tokio::test]
    async fn test_scale_mode_endpoints() {
        let painter = Painter::with_resolver(RecordingResolver::new());
        let coloring = scale_coloring();
        let mut heatmap = Heatmap {
            map: Some(blank_mask(MaskData::I16(vec![10, 15, 20, 40, -3]), 1)),
            range: Some((10.0, 20.0)),
        };

        painter.paint_heatmap("heat", &mut heatmap, &coloring).await.unwrap();

        let scale: Vec<PackedColor> = coloring.scale.iter().map(Color::packed).collect();
        assert_eq!(
            heatmap.map.unwrap().overlay(),
            &[scale[0], scale[1], scale[2], scale[2], scale[0]]
        );
    }

    #[tokio::test]
    async fn test_scale_mode_requires_scale() {
        let painter = Painter::with_resolver(RecordingResolver::new());
        let mut coloring = scale_coloring();
        coloring.scale.clear();
        let mut heatmap = Heatmap {
            map: Some(blank_mask(MaskData::U8(vec![1]), 1)),
            range: None,
        };

        let result = painter.paint_heatmap("heat", &mut heatmap, &coloring).await;
        assert_eq!(result, Err(PaintError::EmptyPalette("scale")));
    }

    #[tokio::test]
    async fn test_intensity_mode_alpha() {
        let resolver = Arc::new(RecordingResolver::new());
        let painter = Painter::new(resolver.clone());
        let mut heatmap = Heatmap {
            map: Some(blank_mask(MaskData::F32(vec![0.5, -1.0, 4.0]), 1)),
            range: None,
        };

        painter.paint_heatmap("heat", &mut heatmap, &coloring()).await.unwrap();

        let overlay = heatmap.map.unwrap().overlay().to_vec();
        let alphas: Vec<u8> = overlay.iter().map(|p| unpack_rgba(*p).1).collect();
        assert_eq!(alphas, vec![128, 255, 255]);
        assert!(overlay.iter().all(|p| unpack_rgba(*p).0 == FIELD_COLOR));
        assert_eq!(resolver.calls(), vec!["heat"]);
    }

    #[tokio::test]
    async fn test_integer_default_range() {
        let painter = Painter::with_resolver(RecordingResolver::new());
        let mut heatmap = Heatmap {
            map: Some(blank_mask(MaskData::U8(vec![51, 255]), 1)),
            range: None,
        };

        painter.paint_heatmap("heat", &mut heatmap, &coloring()).await.unwrap();

        let alphas: Vec<u8> = heatmap.map.unwrap().overlay().iter().map(|p| unpack_rgba(*p).1).collect();
        assert_eq!(alphas, vec![51, 255]);
    }

    #[tokio::test]
    async fn test_missing_map_is_noop() {
        let resolver = Arc::new(RecordingResolver::new());
        let painter = Painter::new(resolver.clone());
        let mut heatmap = Heatmap::default();
        painter.paint_heatmap("heat", &mut heatmap, &coloring()).await.unwrap();
        assert!(resolver.calls().is_empty());
    }
}
