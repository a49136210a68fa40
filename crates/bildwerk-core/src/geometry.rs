// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry primitives — points and quadrilaterals in image pixel space.

use serde::{Deserialize, Serialize};

/// A 2D coordinate in image pixel space. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Four corner points of a planar subject.
///
/// The canonical order is `[top-left, top-right, bottom-right, bottom-left]`
/// (clockwise). A quadrilateral built from arbitrary points is "unordered";
/// call [`Quad::ordered`] before any operation that depends on winding order
/// (area, transforms). Ordering is idempotent, so double-ordering is safe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    pub fn new(points: [Point; 4]) -> Self {
        Self(points)
    }

    /// Axis-aligned rectangle with its top-left corner at `(x, y)`.
    ///
    /// The result is already in canonical order.
    pub fn axis_aligned(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self([
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Normalize corner order to `[top-left, top-right, bottom-right,
    /// bottom-left]`.
    ///
    /// Sorts by y; the first two points form the top pair and the last two
    /// the bottom pair; within each pair the smaller x is the left corner.
    /// Total over any 4 points and idempotent.
    pub fn ordered(&self) -> Self {
        let mut pts = self.0;
        pts.sort_by(|a, b| a.y.total_cmp(&b.y));

        let (mut top, mut bottom) = ([pts[0], pts[1]], [pts[2], pts[3]]);
        if top[0].x > top[1].x {
            top.swap(0, 1);
        }
        if bottom[0].x > bottom[1].x {
            bottom.swap(0, 1);
        }

        Self([top[0], top[1], bottom[1], bottom[0]])
    }

    /// Area via the shoelace formula.
    ///
    /// The corners must be in order (CW or CCW); self-intersecting point
    /// sequences under-report.
    pub fn area(&self) -> f32 {
        let pts = &self.0;
        let mut area = 0.0f32;
        for i in 0..4 {
            let j = (i + 1) % 4;
            area += pts[i].x * pts[j].y;
            area -= pts[j].x * pts[i].y;
        }
        area.abs() / 2.0
    }

    /// Axis-aligned bounding box as `(min, max)` corners.
    pub fn bounding_box(&self) -> (Point, Point) {
        let mut min = self.0[0];
        let mut max = self.0[0];
        for p in &self.0[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.0
    }
}
