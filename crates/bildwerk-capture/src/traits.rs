// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic camera backend trait and the acquisition entry point.

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::CaptureConstraints;
use tracing::{debug, warn};

use crate::stream::{CameraStream, FrameSource};

/// A source of camera streams for one physical (or simulated) device.
///
/// Platform implementations (mobile, desktop, browser) live outside this
/// crate; in-tree backends are [`crate::stub::UnavailableCamera`] and the
/// deterministic [`crate::stub::SyntheticCamera`] used by tests.
pub trait CameraBackend: Send + Sync {
    /// Human-readable device name (e.g. "Back camera").
    fn name(&self) -> &str;

    /// Open a stream honouring the given constraints, or fail if the device
    /// cannot satisfy them.
    fn open_stream(&self, constraints: &CaptureConstraints) -> Result<Box<dyn FrameSource>>;
}

/// Acquire a camera stream with graceful constraint degradation.
///
/// Requests the full constraint set (resolution, aspect ratio) first. If the
/// device rejects it — missing capability, permission or track negotiation
/// failure — retries exactly once with only the facing mode set. When both
/// attempts fail the caller receives `CameraUnavailable` and decides what to
/// offer instead (typically file selection).
pub fn acquire_stream(
    backend: &dyn CameraBackend,
    constraints: &CaptureConstraints,
) -> Result<CameraStream> {
    match backend.open_stream(constraints) {
        Ok(source) => {
            debug!(device = backend.name(), "camera stream opened");
            Ok(CameraStream::new(source, constraints.clone()))
        }
        Err(err) => {
            warn!(
                device = backend.name(),
                %err,
                "rich constraint set rejected, retrying with facing mode only"
            );
            let reduced = constraints.facing_only();
            match backend.open_stream(&reduced) {
                Ok(source) => {
                    debug!(device = backend.name(), "camera stream opened on retry");
                    Ok(CameraStream::new(source, reduced))
                }
                Err(retry_err) => Err(BildwerkError::CameraUnavailable(format!(
                    "{}: {retry_err}",
                    backend.name()
                ))),
            }
        }
    }
}
