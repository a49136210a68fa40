// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dependency-free fallback backend.
//
// Runs a Sobel gradient pass over the grayscale pixels to gauge edge
// content, then offers a deterministic inset rectangle for manual
// adjustment rather than inferring a quadrilateral. The warp counterpart is
// a bounding-box crop+scale: it corrects translation and scale but not skew
// or rotation, a deliberate fidelity trade for running without the contour
// backend.

use bildwerk_core::config::DetectorConfig;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::geometry::Quad;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbaImage};
use tracing::debug;

use crate::backend::{SubjectHit, VisionBackend};

pub struct HeuristicBackend;

static FALLBACK: HeuristicBackend = HeuristicBackend;

/// The shared fallback instance.
pub fn fallback() -> &'static HeuristicBackend {
    &FALLBACK
}

impl HeuristicBackend {
    /// Fraction of interior pixels whose Sobel gradient magnitude clears
    /// `threshold`.
    fn edge_ratio(gray: &GrayImage, threshold: u16) -> f32 {
        let (width, height) = gray.dimensions();
        if width < 3 || height < 3 {
            return 0.0;
        }

        let sample = |x: u32, y: u32| gray.get_pixel(x, y).0[0] as i32;
        let mut edge_pixels = 0u64;
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let gx = -sample(x - 1, y - 1) - 2 * sample(x - 1, y) - sample(x - 1, y + 1)
                    + sample(x + 1, y - 1)
                    + 2 * sample(x + 1, y)
                    + sample(x + 1, y + 1);
                let gy = -sample(x - 1, y - 1) - 2 * sample(x, y - 1) - sample(x + 1, y - 1)
                    + sample(x - 1, y + 1)
                    + 2 * sample(x, y + 1)
                    + sample(x + 1, y + 1);
                let magnitude = ((gx * gx + gy * gy) as f64).sqrt();
                if magnitude >= threshold as f64 {
                    edge_pixels += 1;
                }
            }
        }

        let interior = (width - 2) as u64 * (height - 2) as u64;
        edge_pixels as f32 / interior as f32
    }
}

impl VisionBackend for HeuristicBackend {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn find_subject(
        &self,
        image: &DynamicImage,
        config: &DetectorConfig,
    ) -> Result<Option<SubjectHit>> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();

        let edge_ratio = Self::edge_ratio(&gray, config.fallback_edge_threshold);
        debug!(edge_ratio, "heuristic edge pass complete");

        // No quadrilateral inference here: the inset rectangle guarantees
        // the caller always has corners to offer for manual correction.
        let margin = config.fallback_margin;
        let bounds = Quad::axis_aligned(
            width as f32 * margin,
            height as f32 * margin,
            width as f32 * (1.0 - 2.0 * margin),
            height as f32 * (1.0 - 2.0 * margin),
        );

        Ok(Some(SubjectHit {
            bounds,
            confidence: config.fallback_confidence,
        }))
    }

    fn warp_quad(
        &self,
        image: &DynamicImage,
        corners: &Quad,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage> {
        let ordered = corners.ordered();
        let (min, max) = ordered.bounding_box();

        let x0 = min.x.max(0.0);
        let y0 = min.y.max(0.0);
        let x1 = max.x.min(image.width() as f32);
        let y1 = max.y.min(image.height() as f32);

        let crop_w = (x1 - x0).round();
        let crop_h = (y1 - y0).round();
        if crop_w < 1.0 || crop_h < 1.0 {
            return Err(BildwerkError::InvalidGeometry(format!(
                "bounding box has zero area ({crop_w}x{crop_h})"
            )));
        }

        let cropped = image.crop_imm(x0 as u32, y0 as u32, crop_w as u32, crop_h as u32);
        let resized = cropped.resize_exact(width, height, FilterType::Lanczos3);
        Ok(resized.to_rgba8())
    }
}
