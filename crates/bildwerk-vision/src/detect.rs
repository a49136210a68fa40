// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subject detection — primary contour path with heuristic fallback.

use std::sync::Arc;

use bildwerk_core::config::DetectorConfig;
use bildwerk_core::types::{DetectedSubject, SubjectKind};
use image::DynamicImage;
use tracing::{debug, instrument, warn};

use crate::backend::{SubjectHit, VisionRuntime};
use crate::heuristic;

/// Finds the dominant planar subject (a façade, a document) in a photograph.
pub struct SubjectDetector {
    runtime: Arc<VisionRuntime>,
    config: DetectorConfig,
}

impl SubjectDetector {
    pub fn new(runtime: Arc<VisionRuntime>, config: DetectorConfig) -> Self {
        Self { runtime, config }
    }

    /// Detect the dominant quadrilateral subject.
    ///
    /// Never fails for a structurally valid image: an unavailable primary
    /// backend or a primary-path error downgrades to the heuristic fallback,
    /// which always produces a rectangle. `None` means the primary path ran
    /// and found no subject — callers should ask the user to outline the
    /// subject manually, not treat it as an error.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub async fn detect(&self, image: &DynamicImage) -> Option<DetectedSubject> {
        use crate::backend::VisionBackend as _;

        // The primary/fallback boundary is a plain Result match so the
        // fallback trigger conditions stay enumerable.
        let primary = match self.runtime.primary().await {
            Ok(backend) => backend.find_subject(image, &self.config),
            Err(err) => Err(err),
        };

        let hit: Option<SubjectHit> = match primary {
            Ok(hit) => {
                debug!(found = hit.is_some(), "primary detection complete");
                hit
            }
            Err(err) => {
                warn!(%err, "primary detection unavailable, using heuristic fallback");
                match heuristic::fallback().find_subject(image, &self.config) {
                    Ok(hit) => hit,
                    Err(fallback_err) => {
                        warn!(%fallback_err, "heuristic detection failed");
                        None
                    }
                }
            }
        };

        hit.map(|hit| DetectedSubject {
            bounds: hit.bounds.ordered(),
            confidence: hit.confidence.clamp(0.0, 1.0),
            kind: SubjectKind::Building,
        })
    }
}
