// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Bildwerk capture-to-upload pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Quad;

/// Unique identifier for one capture-to-upload flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(pub Uuid);

impl FlowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FlowId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FlowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of planar subject the detector believes it found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectKind {
    Building,
    Facade,
    Document,
    Object,
}

/// Detector output, offered to the caller (or a human) for confirmation or
/// manual adjustment before rectification.
///
/// Ephemeral — lives for a single capture-to-upload flow and is never
/// persisted by this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedSubject {
    pub bounds: Quad,
    /// Fraction of the image the subject covers, clamped to [0, 1].
    pub confidence: f32,
    pub kind: SubjectKind,
}

/// Output of a perspective rectification.
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// JPEG-encoded corrected image.
    pub corrected_image: Vec<u8>,
    /// The (ordered) source corners the transform mapped from.
    pub original_bounds: Quad,
    /// The target rectangle's corners — axis-aligned by construction.
    pub corrected_bounds: Quad,
}

/// Upload compression settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionOptions {
    /// Byte budget in megabytes. Best effort, not a hard cap.
    pub max_size_mb: f64,
    /// Neither output side may exceed this; aspect ratio is preserved.
    pub max_width_or_height: u32,
    /// JPEG quality in (0, 1].
    pub quality: f32,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_size_mb: 1.0,
            max_width_or_height: 1920,
            quality: 0.8,
        }
    }
}

/// Which camera to prefer on multi-camera devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FacingMode {
    /// Front-facing ("selfie") camera.
    User,
    /// Rear camera — the default for photographing property.
    #[default]
    Environment,
}

/// Constraints requested when opening a camera stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub facing: FacingMode,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect_ratio: Option<f32>,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            width: None,
            height: None,
            aspect_ratio: Some(16.0 / 9.0),
        }
    }
}

impl CaptureConstraints {
    /// Full-resolution request for a given capture size.
    pub fn with_resolution(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Reduced constraint set used for the single retry after a device
    /// rejects the rich request: only the facing mode survives.
    pub fn facing_only(&self) -> Self {
        Self {
            facing: self.facing,
            width: None,
            height: None,
            aspect_ratio: None,
        }
    }

    pub fn is_facing_only(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.aspect_ratio.is_none()
    }
}
