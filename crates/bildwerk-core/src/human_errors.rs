// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the photo submission flow.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The UI layer renders these directly; the severity drives presentation.

use crate::error::BildwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Momentary hiccup — we can retry automatically.
    Transient,
    /// User must do something (grant camera access, adjust corners).
    ActionRequired,
    /// Cannot be fixed by retrying or user action — damaged file, etc.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the system should auto-retry.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `BildwerkError` into a `HumanError` the UI can show as-is.
pub fn humanize_error(err: &BildwerkError) -> HumanError {
    match err {
        // -- Capture --
        BildwerkError::CameraUnavailable(_) => HumanError {
            message: "We can't access a camera on this device.".into(),
            suggestion: "Allow camera access in your settings and try again, or choose an existing photo from your library instead.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::Stream(detail) => HumanError {
            message: "The camera stopped responding.".into(),
            suggestion: format!("Try taking the photo again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Vision --
        BildwerkError::VisionUnavailable(_) => HumanError {
            message: "Automatic photo framing isn't available right now.".into(),
            suggestion: "You can still adjust the photo corners yourself before uploading.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BildwerkError::InvalidGeometry(_) => HumanError {
            message: "Those corner points don't outline a usable area.".into(),
            suggestion: "Drag the four corners so they surround the subject, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Imaging --
        BildwerkError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BildwerkError::Compression(_) => HumanError {
            message: "We couldn't shrink this photo.".into(),
            suggestion: "The photo will be uploaded at its original size instead.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage / misc --
        BildwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The photo couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the photo again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        BildwerkError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
