// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Vision backend trait and the process-wide backend runtime.

use bildwerk_core::config::DetectorConfig;
use bildwerk_core::error::Result;
use bildwerk_core::geometry::Quad;
use image::{DynamicImage, RgbaImage};
#[cfg(feature = "contour")]
use tokio::sync::OnceCell;

/// A candidate subject boundary with its detection confidence.
#[derive(Debug, Clone, Copy)]
pub struct SubjectHit {
    pub bounds: Quad,
    /// In [0, 1]. The contour backend reports the area fraction the subject
    /// covers; the heuristic fallback reports a fixed moderate value.
    pub confidence: f32,
}

/// A vision implementation capable of quadrilateral search and warps onto an
/// axis-aligned canvas.
///
/// Two implementations exist: the contour/homography backend (feature
/// `contour`) and the dependency-free heuristic in [`crate::heuristic`].
/// [`VisionRuntime`] resolves the primary backend once per process; detector
/// and rectifier downgrade to the fallback whenever the primary is
/// unavailable or errors.
pub trait VisionBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Best 4-vertex boundary of the dominant planar subject, if any.
    fn find_subject(
        &self,
        image: &DynamicImage,
        config: &DetectorConfig,
    ) -> Result<Option<SubjectHit>>;

    /// Render the region outlined by `corners` onto a `width` × `height`
    /// canvas.
    fn warp_quad(
        &self,
        image: &DynamicImage,
        corners: &Quad,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage>;
}

/// Process-wide, lazily-initialized handle to the primary vision backend.
///
/// The first caller triggers initialization and concurrent callers join the
/// same in-flight load. A failed load is not cached — the next call retries
/// — and the first successful load wins for the lifetime of the runtime.
#[derive(Default)]
pub struct VisionRuntime {
    #[cfg(feature = "contour")]
    primary: OnceCell<crate::contour::ContourBackend>,
}

impl VisionRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// The primary backend, initializing it on first use.
    #[cfg(feature = "contour")]
    pub async fn primary(&self) -> Result<&dyn VisionBackend> {
        let backend = self
            .primary
            .get_or_try_init(|| async { crate::contour::ContourBackend::load() })
            .await?;
        Ok(backend as &dyn VisionBackend)
    }

    /// Built without the `contour` feature: there is no primary backend.
    #[cfg(not(feature = "contour"))]
    pub async fn primary(&self) -> Result<&dyn VisionBackend> {
        Err(bildwerk_core::error::BildwerkError::VisionUnavailable(
            "built without the `contour` feature".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "contour")]
    #[tokio::test]
    async fn primary_backend_resolves_once_for_concurrent_callers() {
        let runtime = std::sync::Arc::new(VisionRuntime::new());

        let a = std::sync::Arc::clone(&runtime);
        let b = std::sync::Arc::clone(&runtime);
        let (first, second) = tokio::join!(
            async move { a.primary().await.map(|backend| backend.name()) },
            async move { b.primary().await.map(|backend| backend.name()) },
        );

        assert_eq!(first.unwrap(), "contour");
        assert_eq!(second.unwrap(), "contour");
    }

    #[cfg(not(feature = "contour"))]
    #[tokio::test]
    async fn primary_backend_unavailable_without_feature() {
        let runtime = VisionRuntime::new();
        assert!(runtime.primary().await.is_err());
    }
}
