// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload compression — best effort, never fatal to the submission flow.

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::CompressionOptions;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::{debug, instrument, warn};

/// Quality floor for the downward search when the first encode is over
/// budget.
const MIN_QUALITY: f32 = 0.1;

/// Binary-search iterations over quality (covers the range at ~1% steps).
const FIT_ITERATIONS: u32 = 7;

/// Compress image bytes for upload.
///
/// Best effort: the output fits `options.max_size_mb` when the encoder can
/// get there, neither output side exceeds `options.max_width_or_height`, and
/// the aspect ratio is preserved to within rounding. Any internal failure
/// returns the original bytes unchanged — this stage never blocks a
/// submission. The pixel work runs off the async executor.
#[instrument(skip(input), fields(input_len = input.len()))]
pub async fn compress(input: Vec<u8>, options: &CompressionOptions) -> Vec<u8> {
    let opts = options.clone();
    let original = input.clone();

    match tokio::task::spawn_blocking(move || compress_bytes(&input, &opts)).await {
        Ok(Ok(compressed)) => {
            debug!(output_len = compressed.len(), "compression complete");
            compressed
        }
        Ok(Err(err)) => {
            warn!(%err, "compression failed, returning original bytes");
            original
        }
        Err(err) => {
            warn!(%err, "compression task aborted, returning original bytes");
            original
        }
    }
}

/// Synchronous compression core: decode → bounded downscale → JPEG encode,
/// searching quality downward while over the byte budget.
pub(crate) fn compress_bytes(input: &[u8], options: &CompressionOptions) -> Result<Vec<u8>> {
    if options.quality <= 0.0 || options.quality > 1.0 {
        return Err(BildwerkError::Compression(format!(
            "quality out of range: {}",
            options.quality
        )));
    }
    if options.max_width_or_height == 0 {
        return Err(BildwerkError::Compression(
            "max_width_or_height must be non-zero".into(),
        ));
    }

    let decoded = image::load_from_memory(input)
        .map_err(|err| BildwerkError::Compression(format!("decode failed: {err}")))?;

    let resized = if decoded.width().max(decoded.height()) > options.max_width_or_height {
        decoded.resize(
            options.max_width_or_height,
            options.max_width_or_height,
            FilterType::Lanczos3,
        )
    } else {
        decoded
    };

    let budget = (options.max_size_mb * 1024.0 * 1024.0) as usize;
    let first = encode_jpeg(&resized, options.quality)?;
    if first.len() <= budget {
        return Ok(first);
    }

    // Over budget — binary-search a lower quality, keeping the best result
    // that fits. If even the floor quality is too large, return the last
    // (smallest) attempt: best effort, not a hard cap.
    let mut low = MIN_QUALITY;
    let mut high = options.quality;
    let mut best_fit: Option<Vec<u8>> = None;
    let mut floor_attempt = first;

    for _ in 0..FIT_ITERATIONS {
        let mid = (low + high) / 2.0;
        let attempt = encode_jpeg(&resized, mid)?;
        if attempt.len() <= budget {
            best_fit = Some(attempt);
            low = mid;
        } else {
            floor_attempt = attempt;
            high = mid;
        }
    }

    Ok(best_fit.unwrap_or(floor_attempt))
}

fn encode_jpeg(image: &DynamicImage, quality: f32) -> Result<Vec<u8>> {
    let quality = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let mut buffer = Vec::new();
    let rgb = image.to_rgb8();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| BildwerkError::Compression(format!("JPEG encoding failed: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder, RgbImage};

    fn noisy_png(width: u32, height: u32) -> Vec<u8> {
        // Deterministic high-frequency pattern so JPEG sizes respond to
        // quality changes.
        let img = RgbImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(31) ^ y.wrapping_mul(17)) as u8;
            image::Rgb([v, v.wrapping_add(85), v.wrapping_add(170)])
        });
        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
        buffer
    }

    #[tokio::test]
    async fn garbage_input_returns_original_bytes() {
        let input = b"definitely not an image".to_vec();
        let out = compress(input.clone(), &CompressionOptions::default()).await;
        assert_eq!(out, input);
    }

    #[tokio::test]
    async fn one_pixel_image_compresses_without_error() {
        let input = noisy_png(1, 1);
        let out = compress(input.clone(), &CompressionOptions::default()).await;
        assert!(!out.is_empty());
    }

    #[tokio::test]
    async fn large_image_is_bounded_and_keeps_aspect() {
        let input = noisy_png(3000, 2000);
        let out = compress(input, &CompressionOptions::default()).await;

        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.width().max(decoded.height()), 1920);
        // 3:2 input → 1920×1280 output.
        assert_eq!(decoded.width(), 1920);
        assert_eq!(decoded.height(), 1280);
    }

    #[tokio::test]
    async fn small_image_is_not_upscaled() {
        let input = noisy_png(200, 100);
        let out = compress(input, &CompressionOptions::default()).await;

        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 100));
    }

    #[test]
    fn stays_under_byte_budget_when_feasible() {
        let input = noisy_png(1600, 1200);
        let options = CompressionOptions {
            max_size_mb: 0.25,
            ..CompressionOptions::default()
        };

        let out = compress_bytes(&input, &options).unwrap();
        assert!(
            out.len() <= (0.25 * 1024.0 * 1024.0) as usize,
            "{} bytes over budget",
            out.len()
        );
    }

    #[test]
    fn impossible_budget_still_returns_smallest_attempt() {
        let input = noisy_png(800, 600);
        let options = CompressionOptions {
            max_size_mb: 0.000001,
            ..CompressionOptions::default()
        };

        let out = compress_bytes(&input, &options).unwrap();
        // Over budget but present — best effort, never an error.
        assert!(!out.is_empty());
    }

    #[tokio::test]
    #[ignore = "slow: decodes and resizes a 50-megapixel image"]
    async fn fifty_megapixel_image_compresses_without_error() {
        let img = RgbImage::from_pixel(8660, 5773, image::Rgb([120u8, 140, 160]));
        let mut input = Vec::new();
        PngEncoder::new(&mut input)
            .write_image(img.as_raw(), 8660, 5773, ExtendedColorType::Rgb8)
            .unwrap();

        let out = compress(input, &CompressionOptions::default()).await;
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.width().max(decoded.height()), 1920);
    }

    #[test]
    fn invalid_quality_is_rejected_by_the_core() {
        let input = noisy_png(10, 10);
        let options = CompressionOptions {
            quality: 1.5,
            ..CompressionOptions::default()
        };
        assert!(compress_bytes(&input, &options).is_err());
    }

    #[tokio::test]
    async fn invalid_quality_falls_back_to_original_at_the_boundary() {
        let input = noisy_png(10, 10);
        let options = CompressionOptions {
            quality: 1.5,
            ..CompressionOptions::default()
        };
        let out = compress(input.clone(), &options).await;
        assert_eq!(out, input);
    }

    #[test]
    fn output_is_jpeg() {
        let input = noisy_png(64, 64);
        let out = compress_bytes(&input, &CompressionOptions::default()).unwrap();
        assert_eq!(out[0], 0xFF);
        assert_eq!(out[1], 0xD8);
    }
}
