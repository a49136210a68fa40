// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera stream guard with guaranteed release.

use bildwerk_core::error::Result;
use bildwerk_core::types::CaptureConstraints;
use image::DynamicImage;
use tracing::debug;

/// Produces decoded frames for an open camera stream.
///
/// Implemented by camera backends; consumers use [`CameraStream`] instead of
/// holding a source directly.
pub trait FrameSource: Send {
    /// The next frame, or `None` when the stream has ended.
    fn next_frame(&mut self) -> Result<Option<DynamicImage>>;

    /// Release the underlying device tracks. Must be idempotent.
    fn stop(&mut self);
}

/// An open camera stream.
///
/// Frames are pulled with [`CameraStream::next_frame`]. [`CameraStream::stop`]
/// releases the device tracks and is safe to call repeatedly and at any
/// point, including mid-frame; dropping the stream stops it as well, so
/// early exits (errors, navigating away) cannot leak the hardware.
pub struct CameraStream {
    source: Box<dyn FrameSource>,
    constraints: CaptureConstraints,
    stopped: bool,
}

impl CameraStream {
    pub(crate) fn new(source: Box<dyn FrameSource>, constraints: CaptureConstraints) -> Self {
        Self {
            source,
            constraints,
            stopped: false,
        }
    }

    /// The constraints the stream was actually opened with — after a retry
    /// this is the reduced facing-only set, not the caller's original request.
    pub fn constraints(&self) -> &CaptureConstraints {
        &self.constraints
    }

    /// Pull the next frame. Returns `Ok(None)` once stopped or exhausted.
    pub fn next_frame(&mut self) -> Result<Option<DynamicImage>> {
        if self.stopped {
            return Ok(None);
        }
        self.source.next_frame()
    }

    /// Stop all tracks. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.source.stop();
        debug!("camera stream stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.stop();
    }
}
