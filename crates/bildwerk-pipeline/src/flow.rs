// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture-to-upload flow orchestration.
//
// Stages within one flow run strictly in sequence: capture, then detection
// (or manual adjustment), then rectification, then compression. Independent
// flows can run concurrently — each owns its image buffers and shares only
// the process-wide vision backend handle.

use std::sync::Arc;

use bildwerk_capture::{CameraBackend, acquire_stream};
use bildwerk_core::config::EngineConfig;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::geometry::Quad;
use bildwerk_core::types::{
    CaptureConstraints, CompressionOptions, DetectedSubject, FlowId, TransformResult,
};
use bildwerk_vision::{PerspectiveRectifier, SubjectDetector, VisionRuntime};
use chrono::{DateTime, Utc};
use image::DynamicImage;
use tracing::{info, instrument};

use crate::compress;

/// One captured frame plus the detector's suggestion, awaiting confirmation.
///
/// Ephemeral: lives for a single capture-to-upload flow and is dropped once
/// the corrected bytes are handed to the uploader.
#[derive(Debug)]
pub struct CaptureReview {
    pub flow: FlowId,
    pub captured_at: DateTime<Utc>,
    pub frame: DynamicImage,
    /// `None` means no subject was found — ask the user to outline one.
    pub suggestion: Option<DetectedSubject>,
}

/// Final output of a flow: corrected geometry plus upload-ready bytes.
#[derive(Debug, Clone)]
pub struct FlowOutput {
    pub flow: FlowId,
    pub transform: TransformResult,
    pub upload_bytes: Vec<u8>,
}

/// The capture → detect → rectify → compress pipeline.
pub struct PhotoPipeline {
    config: EngineConfig,
    detector: SubjectDetector,
    rectifier: PerspectiveRectifier,
}

impl PhotoPipeline {
    pub fn new(config: EngineConfig) -> Self {
        let runtime = Arc::new(VisionRuntime::new());
        let detector = SubjectDetector::new(Arc::clone(&runtime), config.detector.clone());
        let rectifier = PerspectiveRectifier::new(runtime, config.rectifier.clone());
        Self {
            config,
            detector,
            rectifier,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Capture one frame and run subject detection on it.
    ///
    /// The camera stream is released before this returns, on success and on
    /// every error path. `CameraUnavailable` is the only capture failure the
    /// caller sees; it should offer file selection instead (see
    /// [`PhotoPipeline::process_image`]).
    #[instrument(skip(self, camera, constraints), fields(device = camera.name()))]
    pub async fn begin(
        &self,
        camera: &dyn CameraBackend,
        constraints: &CaptureConstraints,
    ) -> Result<CaptureReview> {
        let flow = FlowId::new();
        let mut stream = acquire_stream(camera, constraints)?;

        let frame = match stream.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                stream.stop();
                return Err(BildwerkError::CameraUnavailable(
                    "stream produced no frames".into(),
                ));
            }
            Err(err) => {
                stream.stop();
                return Err(err);
            }
        };
        stream.stop();

        info!(
            %flow,
            width = frame.width(),
            height = frame.height(),
            "frame captured"
        );
        let suggestion = self.detector.detect(&frame).await;
        Ok(CaptureReview {
            flow,
            captured_at: Utc::now(),
            frame,
            suggestion,
        })
    }

    /// Run detection on a frame the caller brings (e.g. a decoded file).
    pub async fn detect(&self, image: &DynamicImage) -> Option<DetectedSubject> {
        self.detector.detect(image).await
    }

    /// Rectify the confirmed corners and compress for upload.
    ///
    /// `corners` may be the detector's suggestion or a human-adjusted
    /// quadrilateral — the rectifier normalizes their order either way.
    /// When `options` is omitted the engine's configured compression
    /// defaults apply.
    #[instrument(
        skip(self, review, options),
        fields(flow = %review.flow, target_width, target_height)
    )]
    pub async fn finish(
        &self,
        review: &CaptureReview,
        corners: Quad,
        target_width: u32,
        target_height: u32,
        options: Option<&CompressionOptions>,
    ) -> Result<FlowOutput> {
        self.complete(
            review.flow,
            &review.frame,
            corners,
            target_width,
            target_height,
            options,
        )
        .await
    }

    /// File-selection entry point: decode in-memory bytes and run the
    /// rectify + compress tail of the flow on them.
    #[instrument(skip(self, bytes, options), fields(input_len = bytes.len()))]
    pub async fn process_image(
        &self,
        bytes: &[u8],
        corners: Quad,
        target_width: u32,
        target_height: u32,
        options: Option<&CompressionOptions>,
    ) -> Result<FlowOutput> {
        let frame = image::load_from_memory(bytes)
            .map_err(|err| BildwerkError::ImageError(format!("failed to decode image: {err}")))?;
        self.complete(
            FlowId::new(),
            &frame,
            corners,
            target_width,
            target_height,
            options,
        )
        .await
    }

    async fn complete(
        &self,
        flow: FlowId,
        frame: &DynamicImage,
        corners: Quad,
        target_width: u32,
        target_height: u32,
        options: Option<&CompressionOptions>,
    ) -> Result<FlowOutput> {
        let transform = self
            .rectifier
            .rectify(frame, corners, target_width, target_height)
            .await?;

        let options = options.unwrap_or(&self.config.compression);
        let upload_bytes = compress::compress(transform.corrected_image.clone(), options).await;

        info!(%flow, upload_len = upload_bytes.len(), "flow complete");
        Ok(FlowOutput {
            flow,
            transform,
            upload_bytes,
        })
    }
}

impl Default for PhotoPipeline {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
