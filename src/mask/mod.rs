//! Mask buffers and the overlay they are painted into
//!
//! An `OverlayMask` pairs the raw per-pixel data of a label with the RGBA32 overlay
//! buffer that painters write. Both are owned here; painters borrow them mutably
//! for the duration of one call.

pub mod element;
pub mod view;

pub use element::{ElementType, MaskElement};
pub(crate) use view::with_view;
pub use view::{read_rgb, MaskData, MaskView};

use crate::color::PackedColor;
use crate::error::PaintError;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMask {
    data: MaskData,
    channels: usize,
    overlay: Vec<PackedColor>,
}

impl OverlayMask {
    /// Wrap mask data and a pre-sized overlay buffer
    ///
    /// `overlay` must hold exactly one value per pixel, i.e. `data.len() / channels`.
    pub fn new(data: MaskData, channels: usize, overlay: Vec<PackedColor>) -> Result<Self, PaintError> {
        if channels == 0 {
            return Err(PaintError::InvalidChannels(channels));
        }
        if data.len() % channels != 0 {
            return Err(PaintError::BufferSizeMismatch {
                expected: (data.len() / channels + 1) * channels,
                actual: data.len(),
            });
        }

        let pixel_count = data.len() / channels;
        if overlay.len() != pixel_count {
            return Err(PaintError::BufferSizeMismatch {
                expected: pixel_count,
                actual: overlay.len(),
            });
        }

        Ok(Self { data, channels, overlay })
    }

    /// Wrap mask data with a fully transparent overlay
    pub fn with_blank_overlay(data: MaskData, channels: usize) -> Result<Self, PaintError> {
        let pixel_count = if channels == 0 { 0 } else { data.len() / channels };
        Self::new(data, channels, vec![0; pixel_count])
    }

    pub fn data(&self) -> &MaskData {
        &self.data
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn pixel_count(&self) -> usize {
        self.overlay.len()
    }

    pub fn overlay(&self) -> &[PackedColor] {
        &self.overlay
    }

    /// Overlay as RGBA8 bytes, ready for texture upload
    pub fn overlay_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.overlay)
    }

    pub fn into_parts(self) -> (MaskData, usize, Vec<PackedColor>) {
        (self.data, self.channels, self.overlay)
    }

    /// Borrow the mask view and the overlay at the same time
    pub(crate) fn split_mut(&mut self) -> (MaskView<'_>, &mut [PackedColor]) {
        (self.data.view_mut(), &mut self.overlay)
    }

    /// Drop all channels but one, leaving `pixel_count` elements
    pub(crate) fn collapse_to_single_channel(&mut self) {
        let pixel_count = self.overlay.len();
        self.data.truncate(pixel_count);
        self.channels = 1;
    }
}
