// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D curves: line segments and circular arcs.
//!
//! Arcs keep their endpoints explicitly instead of deriving them from angles,
//! so an endpoint written into an arc reads back bit-identical. The edge
//! reconciler relies on this when it compares coordinates exactly.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::{Point2, Vector2};

use crate::bbox::BoundingBox2;
use crate::error::{Error, Result};
use crate::tolerance::{points_equal_2d, TOL};

/// Normalizes an angle into `[0, 2π)`.
#[inline]
pub(crate) fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// A 2D line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2d {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Line2d {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end, `None` for a zero-length segment.
    pub fn direction(&self) -> Option<Vector2<f64>> {
        let d = self.end - self.start;
        let len = d.norm();
        if len < 1e-15 {
            None
        } else {
            Some(d / len)
        }
    }

    /// Distance from `p` to the infinite line through this segment.
    pub fn distance_to_line(&self, p: &Point2<f64>) -> Option<f64> {
        let dir = self.direction()?;
        let v = p - self.start;
        Some((v.x * dir.y - v.y * dir.x).abs())
    }

    /// Orthogonal projection of `p` onto the infinite line.
    pub fn project(&self, p: &Point2<f64>) -> Option<Point2<f64>> {
        let dir = self.direction()?;
        let t = (p - self.start).dot(&dir);
        Some(self.start + dir * t)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut b = BoundingBox2::empty();
        b.expand(&self.start);
        b.expand(&self.end);
        b
    }

    fn contains_point(&self, p: &Point2<f64>, tol: f64) -> bool {
        let d = self.end - self.start;
        let len_sq = d.norm_squared();
        if len_sq < 1e-30 {
            return points_equal_2d(p, &self.start, tol);
        }
        let t = ((p - self.start).dot(&d) / len_sq).clamp(0.0, 1.0);
        let closest = self.start + d * t;
        (p - closest).norm() <= tol
    }
}

/// A 2D circular arc running from `start` to `end` around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc2d {
    pub center: Point2<f64>,
    pub radius: f64,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    /// `true` for counter-clockwise traversal
    pub ccw: bool,
}

impl Arc2d {
    /// Rebuilds an arc from its endpoints, center and rotation sense.
    ///
    /// The radius is the mean of the two endpoint distances, so an endpoint
    /// nudged by a few tolerances still produces a valid arc.
    pub fn from_start_end_center(
        start: Point2<f64>,
        end: Point2<f64>,
        center: Point2<f64>,
        ccw: bool,
    ) -> Result<Self> {
        let r0 = (start - center).norm();
        let r1 = (end - center).norm();
        let radius = 0.5 * (r0 + r1);
        if !radius.is_finite() || radius < 1e-12 {
            return Err(Error::DegenerateCurve(format!(
                "arc radius {} around ({}, {})",
                radius, center.x, center.y
            )));
        }
        Ok(Self {
            center,
            radius,
            start,
            end,
            ccw,
        })
    }

    /// A full circle starting and ending at angle 0.
    pub fn circle(center: Point2<f64>, radius: f64, ccw: bool) -> Result<Self> {
        let p = center + Vector2::new(radius, 0.0);
        Self::from_start_end_center(p, p, center, ccw)
    }

    pub fn start_angle(&self) -> f64 {
        let v = self.start - self.center;
        v.y.atan2(v.x)
    }

    pub fn end_angle(&self) -> f64 {
        let v = self.end - self.center;
        v.y.atan2(v.x)
    }

    pub fn is_closed(&self) -> bool {
        points_equal_2d(&self.start, &self.end, TOL)
    }

    /// Angular extent in `(0, 2π]`.
    pub fn sweep(&self) -> f64 {
        if self.is_closed() {
            return TAU;
        }
        let raw = if self.ccw {
            self.end_angle() - self.start_angle()
        } else {
            self.start_angle() - self.end_angle()
        };
        let s = normalize_angle(raw);
        if s == 0.0 {
            TAU
        } else {
            s
        }
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep()
    }

    pub fn start_tangent(&self) -> Vector2<f64> {
        let r = (self.start - self.center).normalize();
        if self.ccw {
            Vector2::new(-r.y, r.x)
        } else {
            Vector2::new(r.y, -r.x)
        }
    }

    /// Angular offset of `p` from the start, measured in travel direction.
    pub fn param_at(&self, p: &Point2<f64>) -> f64 {
        let v = p - self.center;
        let angle = v.y.atan2(v.x);
        if self.ccw {
            normalize_angle(angle - self.start_angle())
        } else {
            normalize_angle(self.start_angle() - angle)
        }
    }

    fn contains_point(&self, p: &Point2<f64>, tol: f64) -> bool {
        let dist = (p - self.center).norm();
        if (dist - self.radius).abs() > tol {
            return false;
        }
        if self.is_closed() {
            return true;
        }
        let slack = tol / self.radius;
        let t = self.param_at(p);
        t <= self.sweep() + slack || t >= TAU - slack
    }

    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        self.ccw = !self.ccw;
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut b = BoundingBox2::empty();
        b.expand(&self.start);
        b.expand(&self.end);
        // Axis extremes that fall within the sweep
        let sweep = self.sweep();
        for k in 0..4 {
            let angle = k as f64 * FRAC_PI_2;
            let offset = if self.ccw {
                normalize_angle(angle - self.start_angle())
            } else {
                normalize_angle(self.start_angle() - angle)
            };
            if offset <= sweep {
                let dir = Vector2::new(angle.cos(), angle.sin());
                b.expand(&(self.center + dir * self.radius));
            }
        }
        b
    }
}

/// A 2D curve: the unit wrapped by an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve2d {
    Line(Line2d),
    Arc(Arc2d),
}

impl Curve2d {
    pub fn line(start: Point2<f64>, end: Point2<f64>) -> Self {
        Curve2d::Line(Line2d::new(start, end))
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Curve2d::Line(_))
    }

    pub fn start_point(&self) -> Point2<f64> {
        match self {
            Curve2d::Line(l) => l.start,
            Curve2d::Arc(a) => a.start,
        }
    }

    pub fn end_point(&self) -> Point2<f64> {
        match self {
            Curve2d::Line(l) => l.end,
            Curve2d::Arc(a) => a.end,
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Curve2d::Line(l) => l.length(),
            Curve2d::Arc(a) => a.length(),
        }
    }

    /// Unit tangent at the start point. Zero for a degenerate line.
    pub fn start_tangent(&self) -> Vector2<f64> {
        match self {
            Curve2d::Line(l) => l.direction().unwrap_or_else(Vector2::zeros),
            Curve2d::Arc(a) => a.start_tangent(),
        }
    }

    pub fn contains_point(&self, p: &Point2<f64>, tol: f64) -> bool {
        match self {
            Curve2d::Line(l) => l.contains_point(p, tol),
            Curve2d::Arc(a) => a.contains_point(p, tol),
        }
    }

    /// Curve parameter of `p`: arc length along a line, angle along an arc.
    pub fn param_at(&self, p: &Point2<f64>) -> f64 {
        match self {
            Curve2d::Line(l) => match l.direction() {
                Some(dir) => (p - l.start).dot(&dir),
                None => 0.0,
            },
            Curve2d::Arc(a) => a.param_at(p),
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            Curve2d::Line(_) => false,
            Curve2d::Arc(a) => a.is_closed(),
        }
    }

    pub fn reverse(&mut self) {
        match self {
            Curve2d::Line(l) => std::mem::swap(&mut l.start, &mut l.end),
            Curve2d::Arc(a) => a.reverse(),
        }
    }

    /// Returns a copy of this curve with new endpoints. Arcs keep their
    /// center and rotation sense.
    pub fn with_endpoints(&self, start: Point2<f64>, end: Point2<f64>) -> Result<Self> {
        match self {
            Curve2d::Line(_) => Ok(Curve2d::line(start, end)),
            Curve2d::Arc(a) => {
                Arc2d::from_start_end_center(start, end, a.center, a.ccw).map(Curve2d::Arc)
            }
        }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        match self {
            Curve2d::Line(l) => l.bounding_box(),
            Curve2d::Arc(a) => a.bounding_box(),
        }
    }
}

impl From<Line2d> for Curve2d {
    fn from(l: Line2d) -> Self {
        Curve2d::Line(l)
    }
}

impl From<Arc2d> for Curve2d {
    fn from(a: Arc2d) -> Self {
        Curve2d::Arc(a)
    }
}
