// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-pipeline — Capture-to-upload orchestration.
//
// Wires the capture, detection, rectification, and compression stages into
// the flow a listing UI drives: capture a frame, show the detected corners
// for confirmation or manual adjustment, then rectify and compress the
// confirmed region for upload.

pub mod compress;
pub mod flow;

pub use compress::compress;
pub use flow::{CaptureReview, FlowOutput, PhotoPipeline};
