// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub and synthetic camera backends for headless builds, CI, and tests.
//
// Real platform implementations are integration points outside this crate.

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::CaptureConstraints;
use image::{DynamicImage, Rgb, RgbImage};

use crate::stream::FrameSource;
use crate::traits::CameraBackend;

/// Backend for builds with no camera hardware access. Always fails.
pub struct UnavailableCamera;

impl CameraBackend for UnavailableCamera {
    fn name(&self) -> &str {
        "unavailable (stub)"
    }

    fn open_stream(&self, _constraints: &CaptureConstraints) -> Result<Box<dyn FrameSource>> {
        tracing::warn!("CameraBackend::open_stream called on stub backend");
        Err(BildwerkError::CameraUnavailable(
            "no camera on this platform".into(),
        ))
    }
}

/// Frame fill pattern served by [`SyntheticCamera`].
#[derive(Debug, Clone, Copy)]
pub enum TestPattern {
    /// Every pixel the same colour.
    Solid([u8; 3]),
    /// Per-axis gradient with a fixed blue channel.
    Gradient,
}

/// Deterministic camera for tests.
///
/// Serves generated frames at a fixed resolution and can emulate a device
/// that rejects resolution constraints, which exercises the facing-only
/// retry in [`crate::traits::acquire_stream`].
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    pattern: TestPattern,
    frames: usize,
    reject_rich_constraints: bool,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pattern: TestPattern::Gradient,
            frames: 16,
            reject_rich_constraints: false,
        }
    }

    pub fn with_pattern(mut self, pattern: TestPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Emulate a device without resolution/aspect negotiation: any request
    /// beyond a bare facing mode is rejected.
    pub fn rejecting_rich_constraints(mut self) -> Self {
        self.reject_rich_constraints = true;
        self
    }

    /// Render one frame of the configured pattern.
    pub fn frame(&self) -> DynamicImage {
        let (w, h) = (self.width, self.height);
        let image = match self.pattern {
            TestPattern::Solid(rgb) => RgbImage::from_pixel(w, h, Rgb(rgb)),
            TestPattern::Gradient => RgbImage::from_fn(w, h, |x, y| {
                Rgb([
                    (x * 255 / w.max(1)) as u8,
                    (y * 255 / h.max(1)) as u8,
                    128,
                ])
            }),
        };
        DynamicImage::ImageRgb8(image)
    }
}

impl CameraBackend for SyntheticCamera {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn open_stream(&self, constraints: &CaptureConstraints) -> Result<Box<dyn FrameSource>> {
        if self.reject_rich_constraints && !constraints.is_facing_only() {
            return Err(BildwerkError::CameraUnavailable(
                "resolution constraints not supported by this device".into(),
            ));
        }
        Ok(Box::new(SyntheticSource {
            frame: self.frame(),
            remaining: self.frames,
            stopped: false,
        }))
    }
}

struct SyntheticSource {
    frame: DynamicImage,
    remaining: usize,
    stopped: bool,
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<DynamicImage>> {
        if self.stopped || self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(self.frame.clone()))
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
