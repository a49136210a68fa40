// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour/homography backend built on `imageproc`.
//
// Detection: grayscale → Gaussian blur → Canny → close edge gaps → external
// contours → polygon approximation → best 4-vertex candidate.
// Warp: projective transform from the 4 corner correspondences, bilinear
// sampling.

use bildwerk_core::config::DetectorConfig;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::geometry::{Point, Quad};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use imageproc::geometry::approximate_polygon_dp;
use imageproc::morphology::dilate;
use imageproc::point::Point as ContourPoint;
use tracing::{debug, trace};

use crate::backend::{SubjectHit, VisionBackend};

/// Images narrower than this on either axis skip edge detection entirely;
/// the blur/Canny kernels need a few pixels of margin to be meaningful.
const MIN_EDGE_DIMENSION: u32 = 8;

pub struct ContourBackend;

impl ContourBackend {
    /// Initialize the backend, running the edge kernel once as a self-check.
    pub fn load() -> Result<Self> {
        let probe = GrayImage::from_pixel(8, 8, Luma([0u8]));
        let _ = canny(&probe, 50.0, 150.0);
        debug!("contour backend initialized");
        Ok(Self)
    }
}

impl VisionBackend for ContourBackend {
    fn name(&self) -> &'static str {
        "contour"
    }

    fn find_subject(
        &self,
        image: &DynamicImage,
        config: &DetectorConfig,
    ) -> Result<Option<SubjectHit>> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        if width < MIN_EDGE_DIMENSION || height < MIN_EDGE_DIMENSION {
            trace!(width, height, "image too small for contour detection");
            return Ok(None);
        }

        let blurred = gaussian_blur_f32(&gray, config.blur_sigma);
        let edges = canny(&blurred, config.canny_low, config.canny_high);
        // Canny rings on real photographs are rarely closed curves; one
        // dilation pass closes single-pixel gaps before contour tracing.
        let closed = dilate(&edges, Norm::LInf, 1);

        let contours = find_contours::<i32>(&closed);
        let image_area = width as f64 * height as f64;
        let min_area = image_area * config.min_area_ratio as f64;

        let mut best: Option<(Quad, f64)> = None;
        for contour in contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer)
        {
            let area = polygon_area(&contour.points);
            if area < min_area {
                continue;
            }
            let epsilon = perimeter(&contour.points) * config.poly_epsilon_ratio;
            let approx = approximate_polygon_dp(&contour.points, epsilon, true);
            if approx.len() != 4 {
                trace!(vertices = approx.len(), area, "non-quad contour skipped");
                continue;
            }
            if best.as_ref().is_none_or(|(_, best_area)| area > *best_area) {
                best = Some((quad_from_contour(&approx), area));
            }
        }

        debug!(
            contours = contours.len(),
            found = best.is_some(),
            "contour detection complete"
        );
        Ok(best.map(|(quad, area)| SubjectHit {
            bounds: quad.ordered(),
            confidence: ((area / image_area) as f32).clamp(0.0, 1.0),
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
        let src: [(f32, f32); 4] = [
            (ordered.0[0].x, ordered.0[0].y),
            (ordered.0[1].x, ordered.0[1].y),
            (ordered.0[2].x, ordered.0[2].y),
            (ordered.0[3].x, ordered.0[3].y),
        ];
        let dest: [(f32, f32); 4] = [
            (0.0, 0.0),
            (width as f32, 0.0),
            (width as f32, height as f32),
            (0.0, height as f32),
        ];

        let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
            BildwerkError::ImageError(
                "control points do not define a projective transform".into(),
            )
        })?;

        let rgba = image.to_rgba8();
        let mut output = RgbaImage::new(width, height);
        warp_into(
            &rgba,
            &projection,
            Interpolation::Bilinear,
            Rgba([255u8, 255, 255, 255]),
            &mut output,
        );
        Ok(output)
    }
}

/// Shoelace area of a closed contour.
fn polygon_area(points: &[ContourPoint<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0f64;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        area += points[i].x as f64 * points[j].y as f64;
        area -= points[j].x as f64 * points[i].y as f64;
    }
    area.abs() / 2.0
}

/// Perimeter of a closed contour.
fn perimeter(points: &[ContourPoint<i32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut length = 0.0f64;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        let dx = (points[j].x - points[i].x) as f64;
        let dy = (points[j].y - points[i].y) as f64;
        length += (dx * dx + dy * dy).sqrt();
    }
    length
}

fn quad_from_contour(points: &[ContourPoint<i32>]) -> Quad {
    debug_assert_eq!(points.len(), 4);
    Quad::new([
        Point::new(points[0].x as f32, points[0].y as f32),
        Point::new(points[1].x as f32, points[1].y as f32),
        Point::new(points[2].x as f32, points[2].y as f32),
        Point::new(points[3].x as f32, points[3].y as f32),
    ])
}
