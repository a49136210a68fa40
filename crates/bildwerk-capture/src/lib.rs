// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-capture — Camera acquisition for the Bildwerk imaging engine.
//
// Platform camera access sits behind the `CameraBackend` trait; this crate
// ships the acquisition logic (rich constraints with a single facing-only
// retry), a stream guard with guaranteed release, and stub/synthetic
// backends for headless builds and tests.

pub mod stream;
pub mod stub;
pub mod traits;

pub use stream::{CameraStream, FrameSource};
pub use stub::{SyntheticCamera, TestPattern, UnavailableCamera};
pub use traits::{CameraBackend, acquire_stream};
