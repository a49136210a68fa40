// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-vision — Subject detection and perspective rectification.
//
// The primary contour/homography backend sits behind the default-on
// `contour` feature; a dependency-free heuristic fallback is always compiled
// so the pipeline degrades rather than fails when the primary backend is
// missing or errors at runtime.

pub mod backend;
#[cfg(feature = "contour")]
pub mod contour;
pub mod detect;
pub mod heuristic;
pub mod rectify;

pub use backend::{SubjectHit, VisionBackend, VisionRuntime};
pub use detect::SubjectDetector;
pub use rectify::PerspectiveRectifier;
