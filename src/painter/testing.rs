/// Shared fixtures for painter tests
use std::sync::Mutex;

use futures::future::{self, BoxFuture, FutureExt};

use crate::color::Color;
use crate::coloring::{ColorBy, Coloring};
use crate::error::ResolveError;
use crate::mask::{MaskData, OverlayMask};
use crate::resolver::ColorResolver;

/// Color returned by `RecordingResolver` for every key
pub const FIELD_COLOR: Color = Color::new(200, 100, 50);

/// Records every requested key; optionally fails for one key
pub struct RecordingResolver {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingResolver {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing(key: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(key.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ColorResolver for RecordingResolver {
    fn resolve<'a>(
        &'a self,
        _pool: &'a [Color],
        _seed: i64,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Color, ResolveError>> {
        self.calls.lock().unwrap().push(key.to_string());
        let result = match &self.fail_on {
            Some(fail) if fail == key => Err(ResolveError::new(key, "unavailable")),
            _ => Ok(FIELD_COLOR),
        };
        future::ready(result).boxed()
    }
}

pub fn coloring() -> Coloring {
    Coloring::new(vec![FIELD_COLOR], 0, ColorBy::Field)
}

pub fn blank_mask(data: MaskData, channels: usize) -> OverlayMask {
    OverlayMask::with_blank_overlay(data, channels).unwrap()
}
