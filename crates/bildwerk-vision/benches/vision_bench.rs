// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Benchmarks for the vision hot paths: subject detection and rectification.

use std::sync::Arc;

use bildwerk_core::config::{DetectorConfig, RectifierConfig};
use bildwerk_core::geometry::Quad;
use bildwerk_vision::{PerspectiveRectifier, SubjectDetector, VisionRuntime};
use criterion::{Criterion, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

fn facade_scene(width: u32, height: u32) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([25u8, 25, 25]));
    let (x0, y0) = (width / 6, height / 6);
    let (x1, y1) = (width * 5 / 6, height * 5 / 6);
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, Rgb([230u8, 230, 230]));
        }
    }
    DynamicImage::ImageRgb8(img)
}

fn detect_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let runtime = Arc::new(VisionRuntime::new());
    let detector = SubjectDetector::new(runtime, DetectorConfig::default());
    let scene = facade_scene(640, 480);

    c.bench_function("detect_640x480", |b| {
        b.iter(|| rt.block_on(detector.detect(&scene)))
    });
}

fn rectify_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let runtime = Arc::new(VisionRuntime::new());
    let rectifier = PerspectiveRectifier::new(runtime, RectifierConfig::default());
    let scene = facade_scene(640, 480);
    let corners = Quad::new([
        bildwerk_core::geometry::Point::new(110.0, 85.0),
        bildwerk_core::geometry::Point::new(530.0, 95.0),
        bildwerk_core::geometry::Point::new(520.0, 390.0),
        bildwerk_core::geometry::Point::new(120.0, 385.0),
    ]);

    c.bench_function("rectify_640x480_to_600x400", |b| {
        b.iter(|| {
            rt.block_on(rectifier.rectify(&scene, corners, 600, 400))
                .unwrap()
        })
    });
}

criterion_group!(benches, detect_benchmark, rectify_benchmark);
criterion_main!(benches);
