// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.
//
// Only `CameraUnavailable` and `InvalidGeometry` are meant to reach an end
// user: vision errors downgrade to the heuristic fallback, and compression
// errors are swallowed by the compressor (original bytes returned).

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Capture errors --
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("camera stream error: {0}")]
    Stream(String),

    // -- Vision errors --
    #[error("vision backend unavailable: {0}")]
    VisionUnavailable(String),

    #[error("degenerate quadrilateral: {0}")]
    InvalidGeometry(String),

    // -- Imaging --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("compression failed: {0}")]
    Compression(String),

    // -- Storage / misc --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
