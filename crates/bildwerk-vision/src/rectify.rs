// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — projective transform with a crop+scale
// fallback.

use std::sync::Arc;

use bildwerk_core::config::RectifierConfig;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::geometry::Quad;
use bildwerk_core::types::TransformResult;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use tracing::{debug, instrument, warn};

use crate::backend::{VisionBackend, VisionRuntime};
use crate::heuristic;

/// Maps a quadrilateral region of a photograph onto an axis-aligned target
/// rectangle.
pub struct PerspectiveRectifier {
    runtime: Arc<VisionRuntime>,
    config: RectifierConfig,
}

impl PerspectiveRectifier {
    pub fn new(runtime: Arc<VisionRuntime>, config: RectifierConfig) -> Self {
        Self { runtime, config }
    }

    /// Rectify `corners` of `image` onto a `target_width` × `target_height`
    /// canvas and encode the result as JPEG.
    ///
    /// Corners are normalized internally, so detector-supplied and
    /// human-adjusted quadrilaterals are accepted in any order. The primary
    /// path applies a true projective transform; when the contour backend is
    /// unavailable or fails at runtime, the fallback crops the corners'
    /// bounding box and scales it to the target — an approximation that
    /// corrects translation and scale but not skew. The only surfaced
    /// failure is `InvalidGeometry`: zero-sized target, or degenerate corner
    /// input whose bounding box has no area.
    #[instrument(skip(self, image), fields(target_width, target_height))]
    pub async fn rectify(
        &self,
        image: &DynamicImage,
        corners: Quad,
        target_width: u32,
        target_height: u32,
    ) -> Result<TransformResult> {
        if target_width == 0 || target_height == 0 {
            return Err(BildwerkError::InvalidGeometry(
                "target dimensions must be non-zero".into(),
            ));
        }

        let ordered = corners.ordered();
        let warped = match self.runtime.primary().await {
            Ok(backend) => {
                match backend.warp_quad(image, &ordered, target_width, target_height) {
                    Ok(out) => {
                        debug!(backend = backend.name(), "projective warp applied");
                        out
                    }
                    Err(err) => {
                        warn!(%err, "projective warp failed, using bounding-box fallback");
                        self.fallback_warp(image, &ordered, target_width, target_height)?
                    }
                }
            }
            Err(err) => {
                debug!(%err, "contour backend unavailable, using bounding-box fallback");
                self.fallback_warp(image, &ordered, target_width, target_height)?
            }
        };

        let corrected_image = encode_jpeg(warped, self.config.jpeg_quality)?;
        Ok(TransformResult {
            corrected_image,
            original_bounds: ordered,
            corrected_bounds: Quad::axis_aligned(
                0.0,
                0.0,
                target_width as f32,
                target_height as f32,
            ),
        })
    }

    fn fallback_warp(
        &self,
        image: &DynamicImage,
        ordered: &Quad,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage> {
        heuristic::fallback().warp_quad(image, ordered, width, height)
    }
}

fn encode_jpeg(image: RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| BildwerkError::ImageError(format!("JPEG encoding failed: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_core::geometry::Point;
    use image::{Rgb, RgbImage};

    fn rectifier() -> PerspectiveRectifier {
        PerspectiveRectifier::new(Arc::new(VisionRuntime::new()), RectifierConfig::default())
    }

    fn uniform_scene(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    /// Colour each pixel by the nearest quad corner so the warp direction is
    /// observable at the output corners.
    fn corner_voronoi_scene(width: u32, height: u32, corners: &Quad) -> DynamicImage {
        let colors: [[u8; 3]; 4] = [
            [220, 40, 40],  // top-left: red
            [40, 180, 40],  // top-right: green
            [40, 60, 220],  // bottom-right: blue
            [230, 210, 40], // bottom-left: yellow
        ];
        let img = RgbImage::from_fn(width, height, |x, y| {
            let mut best = 0usize;
            let mut best_dist = f32::MAX;
            for (i, p) in corners.points().iter().enumerate() {
                let dx = x as f32 - p.x;
                let dy = y as f32 - p.y;
                let dist = dx * dx + dy * dy;
                if dist < best_dist {
                    best_dist = dist;
                    best = i;
                }
            }
            Rgb(colors[best])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn assert_close(pixel: &image::Rgb<u8>, expected: [u8; 3], tolerance: i16, context: &str) {
        for c in 0..3 {
            let got = pixel.0[c] as i16;
            let want = expected[c] as i16;
            assert!(
                (got - want).abs() <= tolerance,
                "{context}: channel {c} got {got}, want {want}"
            );
        }
    }

    #[tokio::test]
    async fn round_trip_of_axis_aligned_rectangle() {
        let scene = uniform_scene(500, 500, [70, 140, 60]);
        let corners = Quad::axis_aligned(100.0, 120.0, 250.0, 180.0);

        let result = rectifier().rectify(&scene, corners, 250, 180).await.unwrap();
        assert_eq!(result.corrected_bounds, Quad::axis_aligned(0.0, 0.0, 250.0, 180.0));
        assert_eq!(result.original_bounds, corners);

        let out = image::load_from_memory(&result.corrected_image)
            .unwrap()
            .to_rgb8();
        assert_eq!(out.dimensions(), (250, 180));
        assert_close(out.get_pixel(125, 90), [70, 140, 60], 6, "center");
    }

    #[tokio::test]
    async fn skewed_quad_corners_map_to_output_corners() {
        let corners = Quad::new([
            Point::new(200.0, 150.0),
            Point::new(780.0, 220.0),
            Point::new(740.0, 760.0),
            Point::new(260.0, 700.0),
        ]);
        let scene = corner_voronoi_scene(1000, 1000, &corners);

        let result = rectifier().rectify(&scene, corners, 600, 400).await.unwrap();
        let out = image::load_from_memory(&result.corrected_image)
            .unwrap()
            .to_rgb8();
        assert_eq!(out.dimensions(), (600, 400));

        // A few pixels in from each output corner must carry the colour of
        // the corresponding source corner — otherwise the mapping is
        // transposed or mirrored.
        assert_close(out.get_pixel(8, 8), [220, 40, 40], 60, "top-left");
        assert_close(out.get_pixel(591, 8), [40, 180, 40], 60, "top-right");
        assert_close(out.get_pixel(591, 391), [40, 60, 220], 60, "bottom-right");
        assert_close(out.get_pixel(8, 391), [230, 210, 40], 60, "bottom-left");
    }

    #[tokio::test]
    async fn unordered_corner_input_is_normalized() {
        let scene = uniform_scene(400, 400, [120, 50, 50]);
        let shuffled = Quad::new([
            Point::new(300.0, 300.0),
            Point::new(50.0, 60.0),
            Point::new(50.0, 300.0),
            Point::new(300.0, 60.0),
        ]);

        let result = rectifier().rectify(&scene, shuffled, 100, 100).await.unwrap();
        assert_eq!(result.original_bounds, shuffled.ordered());
    }

    #[tokio::test]
    async fn collinear_corners_are_invalid_geometry() {
        let scene = uniform_scene(200, 200, [10; 3]);
        let flat = Quad::new([
            Point::new(10.0, 80.0),
            Point::new(60.0, 80.0),
            Point::new(120.0, 80.0),
            Point::new(190.0, 80.0),
        ]);

        let err = rectifier().rectify(&scene, flat, 100, 100).await.unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidGeometry(_)));
    }

    #[tokio::test]
    async fn zero_target_dimensions_are_invalid_geometry() {
        let scene = uniform_scene(100, 100, [10; 3]);
        let corners = Quad::axis_aligned(10.0, 10.0, 50.0, 50.0);

        let err = rectifier().rectify(&scene, corners, 0, 100).await.unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidGeometry(_)));
    }

    #[tokio::test]
    async fn output_is_jpeg() {
        let scene = uniform_scene(100, 100, [90, 90, 90]);
        let corners = Quad::axis_aligned(0.0, 0.0, 100.0, 100.0);

        let result = rectifier().rectify(&scene, corners, 64, 64).await.unwrap();
        assert_eq!(result.corrected_image[0], 0xFF);
        assert_eq!(result.corrected_image[1], 0xD8);
    }
}
