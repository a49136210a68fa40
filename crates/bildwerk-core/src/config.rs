// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::types::CompressionOptions;

/// Tunable constants for the capture-to-upload pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub detector: DetectorConfig,
    pub rectifier: RectifierConfig,
    /// Defaults applied when a caller omits per-flow compression options.
    pub compression: CompressionOptions,
}

/// Subject detector tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Gaussian blur sigma applied before edge detection (5×5-kernel
    /// equivalent).
    pub blur_sigma: f32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Minimum contour area as a fraction of the image area.
    pub min_area_ratio: f32,
    /// Polygon approximation epsilon as a fraction of the contour perimeter.
    pub poly_epsilon_ratio: f64,
    /// Per-side inset (fraction of the image dimension) of the fallback
    /// rectangle.
    pub fallback_margin: f32,
    /// Fixed confidence reported by the fallback detector.
    pub fallback_confidence: f32,
    /// Gradient magnitude threshold for the fallback edge pass.
    pub fallback_edge_threshold: u16,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 150.0,
            min_area_ratio: 0.10,
            poly_epsilon_ratio: 0.02,
            fallback_margin: 0.10,
            fallback_confidence: 0.6,
            fallback_edge_threshold: 128,
        }
    }
}

/// Perspective rectifier tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectifierConfig {
    /// JPEG quality (1-100) of the corrected output image.
    pub jpeg_quality: u8,
}

impl Default for RectifierConfig {
    fn default() -> Self {
        Self { jpeg_quality: 90 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_constants() {
        let config = EngineConfig::default();
        assert!((config.detector.canny_low - 50.0).abs() < f32::EPSILON);
        assert!((config.detector.canny_high - 150.0).abs() < f32::EPSILON);
        assert!((config.detector.min_area_ratio - 0.10).abs() < f32::EPSILON);
        assert!((config.detector.poly_epsilon_ratio - 0.02).abs() < f64::EPSILON);
        assert!((config.detector.fallback_confidence - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.rectifier.jpeg_quality, 90);
        assert_eq!(config.compression.max_width_or_height, 1920);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert!((back.detector.fallback_margin - config.detector.fallback_margin).abs() < f32::EPSILON);
        assert_eq!(back.rectifier.jpeg_quality, config.rectifier.jpeg_quality);
    }
}
