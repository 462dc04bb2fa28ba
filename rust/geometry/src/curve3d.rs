// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D curves carried by B-Rep edges and produced as sweep paths.
//!
//! Lines are parametrized by arc length from their start point. Arcs are
//! parametrized by angle, measured counter-clockwise about their axis from
//! the reference direction `x_ref`.

use std::f64::consts::TAU;

use nalgebra::{Isometry3, Point3, Unit, Vector3};

use crate::bbox::BoundingBox3;
use crate::curve2d::normalize_angle;
use crate::error::{Error, Result};
use crate::frame::perpendicular_to;

/// Samples used to bound an arc.
const ARC_BOUND_SAMPLES: usize = 33;

/// A 3D line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3d {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Line3d {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn direction(&self) -> Option<Unit<Vector3<f64>>> {
        Unit::try_new(self.end - self.start, 1e-15)
    }

    /// Point at arc length `t` from the start (may lie outside the segment).
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        match self.direction() {
            Some(dir) => self.start + dir.into_inner() * t,
            None => self.start,
        }
    }

    fn param_at(&self, p: &Point3<f64>) -> f64 {
        match self.direction() {
            Some(dir) => (p - self.start).dot(&dir.into_inner()),
            None => 0.0,
        }
    }

    fn contains_point(&self, p: &Point3<f64>, tol: f64) -> bool {
        let d = self.end - self.start;
        let len_sq = d.norm_squared();
        if len_sq < 1e-30 {
            return (p - self.start).norm() <= tol;
        }
        let t = ((p - self.start).dot(&d) / len_sq).clamp(0.0, 1.0);
        (p - (self.start + d * t)).norm() <= tol
    }
}

/// A circular arc in 3D, traversed counter-clockwise about `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc3d {
    pub center: Point3<f64>,
    pub axis: Unit<Vector3<f64>>,
    /// Direction of angle zero, perpendicular to `axis`
    pub x_ref: Unit<Vector3<f64>>,
    pub radius: f64,
    pub start_angle: f64,
    /// Angular extent in `(0, 2π]`
    pub sweep: f64,
}

impl Arc3d {
    pub fn new(
        center: Point3<f64>,
        axis: Vector3<f64>,
        x_ref: Vector3<f64>,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    ) -> Result<Self> {
        let axis = Unit::try_new(axis, 1e-15)
            .ok_or_else(|| Error::DegenerateCurve("arc axis has zero length".into()))?;
        let x_ref = Unit::try_new(x_ref - axis.into_inner() * x_ref.dot(&axis.into_inner()), 1e-15)
            .ok_or_else(|| Error::DegenerateCurve("arc reference direction is parallel to its axis".into()))?;
        if !radius.is_finite() || radius < 1e-12 {
            return Err(Error::DegenerateCurve(format!("arc radius {}", radius)));
        }
        if !sweep.is_finite() || sweep <= 0.0 {
            return Err(Error::DegenerateCurve(format!("arc sweep {}", sweep)));
        }
        Ok(Self {
            center,
            axis,
            x_ref,
            radius,
            start_angle,
            sweep: sweep.min(TAU),
        })
    }

    /// Full circle about `axis`.
    pub fn circle(center: Point3<f64>, axis: Vector3<f64>, radius: f64) -> Result<Self> {
        let unit = Unit::try_new(axis, 1e-15)
            .ok_or_else(|| Error::DegenerateCurve("circle axis has zero length".into()))?;
        let x_ref = perpendicular_to(&unit);
        Self::new(center, axis, x_ref.into_inner(), radius, 0.0, TAU)
    }

    /// Arc from `start` to `end` running counter-clockwise about `axis`.
    /// Equal endpoints produce a full circle.
    pub fn from_center_start_end(
        center: Point3<f64>,
        start: Point3<f64>,
        end: Point3<f64>,
        axis: Vector3<f64>,
    ) -> Result<Self> {
        let radial = start - center;
        let radius = radial.norm();
        let mut arc = Self::new(center, axis, radial, radius, 0.0, TAU)?;
        if (end - start).norm() > 1e-12 {
            let angle = arc.angle_of(&end);
            arc.sweep = if angle <= 0.0 { angle + TAU } else { angle };
        }
        Ok(arc)
    }

    pub fn y_ref(&self) -> Vector3<f64> {
        self.axis.cross(&self.x_ref.into_inner())
    }

    pub fn point_at_angle(&self, angle: f64) -> Point3<f64> {
        self.center
            + (self.x_ref.into_inner() * angle.cos() + self.y_ref() * angle.sin()) * self.radius
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    pub fn is_closed(&self) -> bool {
        self.sweep >= TAU - 1e-12
    }

    /// Raw polar angle of `p` in the arc's frame, in `(-π, π]`.
    fn angle_of(&self, p: &Point3<f64>) -> f64 {
        let v = p - self.center;
        v.dot(&self.y_ref()).atan2(v.dot(&self.x_ref.into_inner()))
    }

    fn param_at(&self, p: &Point3<f64>) -> f64 {
        self.start_angle + normalize_angle(self.angle_of(p) - self.start_angle)
    }

    fn contains_point(&self, p: &Point3<f64>, tol: f64) -> bool {
        let v = p - self.center;
        let height = v.dot(&self.axis.into_inner());
        if height.abs() > tol {
            return false;
        }
        let planar = v - self.axis.into_inner() * height;
        if (planar.norm() - self.radius).abs() > tol {
            return false;
        }
        if self.is_closed() {
            return true;
        }
        let slack = tol / self.radius;
        let offset = normalize_angle(self.angle_of(p) - self.start_angle);
        offset <= self.sweep + slack || offset >= TAU - slack
    }

    fn reverse(&mut self) {
        self.start_angle = -(self.start_angle + self.sweep);
        self.axis = -self.axis;
    }

    fn set_range(&mut self, a: f64, b: f64) {
        let mut sweep = b - a;
        if sweep <= 0.0 {
            sweep += TAU;
        }
        self.start_angle = a;
        self.sweep = sweep.min(TAU);
    }
}

/// A 3D curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve3d {
    Line(Line3d),
    Arc(Arc3d),
}

impl Curve3d {
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        Curve3d::Line(Line3d::new(start, end))
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Curve3d::Line(_))
    }

    pub fn as_arc(&self) -> Option<&Arc3d> {
        match self {
            Curve3d::Arc(a) => Some(a),
            Curve3d::Line(_) => None,
        }
    }

    /// Arc center; `None` for lines.
    pub fn center(&self) -> Option<Point3<f64>> {
        self.as_arc().map(|a| a.center)
    }

    pub fn start_point(&self) -> Point3<f64> {
        match self {
            Curve3d::Line(l) => l.start,
            Curve3d::Arc(a) => a.point_at_angle(a.start_angle),
        }
    }

    pub fn end_point(&self) -> Point3<f64> {
        match self {
            Curve3d::Line(l) => l.end,
            Curve3d::Arc(a) => a.point_at_angle(a.end_angle()),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Curve3d::Line(l) => l.length(),
            Curve3d::Arc(a) => a.radius * a.sweep,
        }
    }

    /// Unit tangent at the start point. Zero for a degenerate line.
    pub fn start_tangent(&self) -> Vector3<f64> {
        match self {
            Curve3d::Line(l) => l.direction().map(|d| d.into_inner()).unwrap_or_else(Vector3::zeros),
            Curve3d::Arc(a) => {
                let (s, c) = a.start_angle.sin_cos();
                a.x_ref.into_inner() * -s + a.y_ref() * c
            }
        }
    }

    pub fn contains_point(&self, p: &Point3<f64>, tol: f64) -> bool {
        match self {
            Curve3d::Line(l) => l.contains_point(p, tol),
            Curve3d::Arc(a) => a.contains_point(p, tol),
        }
    }

    pub fn param_at(&self, p: &Point3<f64>) -> f64 {
        match self {
            Curve3d::Line(l) => l.param_at(p),
            Curve3d::Arc(a) => a.param_at(p),
        }
    }

    pub fn start_param(&self) -> f64 {
        match self {
            Curve3d::Line(_) => 0.0,
            Curve3d::Arc(a) => a.start_angle,
        }
    }

    pub fn end_param(&self) -> f64 {
        match self {
            Curve3d::Line(l) => l.length(),
            Curve3d::Arc(a) => a.end_angle(),
        }
    }

    /// Restricts the curve to the parameter interval `[a, b]`.
    pub fn set_range(&mut self, a: f64, b: f64) {
        match self {
            Curve3d::Line(l) => {
                let start = l.point_at(a);
                let end = l.point_at(b);
                l.start = start;
                l.end = end;
            }
            Curve3d::Arc(arc) => arc.set_range(a, b),
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            Curve3d::Line(_) => false,
            Curve3d::Arc(a) => a.is_closed(),
        }
    }

    pub fn reverse(&mut self) {
        match self {
            Curve3d::Line(l) => std::mem::swap(&mut l.start, &mut l.end),
            Curve3d::Arc(a) => a.reverse(),
        }
    }

    pub fn reversed(&self) -> Self {
        let mut c = *self;
        c.reverse();
        c
    }

    pub fn transformed(&self, iso: &Isometry3<f64>) -> Self {
        match self {
            Curve3d::Line(l) => Curve3d::line(iso * l.start, iso * l.end),
            Curve3d::Arc(a) => Curve3d::Arc(Arc3d {
                center: iso * a.center,
                axis: Unit::new_normalize(iso.transform_vector(&a.axis.into_inner())),
                x_ref: Unit::new_normalize(iso.transform_vector(&a.x_ref.into_inner())),
                ..*a
            }),
        }
    }

    /// `n` points evenly spaced in parameter, both ends included.
    pub fn sample_points(&self, n: usize) -> Vec<Point3<f64>> {
        let n = n.max(2);
        match self {
            Curve3d::Line(l) => (0..n)
                .map(|i| l.start + (l.end - l.start) * (i as f64 / (n - 1) as f64))
                .collect(),
            Curve3d::Arc(a) => (0..n)
                .map(|i| a.point_at_angle(a.start_angle + a.sweep * (i as f64 / (n - 1) as f64)))
                .collect(),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox3 {
        match self {
            Curve3d::Line(l) => BoundingBox3::from_points(&[l.start, l.end]),
            Curve3d::Arc(_) => BoundingBox3::from_points(&self.sample_points(ARC_BOUND_SAMPLES)),
        }
    }
}

impl From<Line3d> for Curve3d {
    fn from(l: Line3d) -> Self {
        Curve3d::Line(l)
    }
}

impl From<Arc3d> for Curve3d {
    fn from(a: Arc3d) -> Self {
        Curve3d::Arc(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::{points_equal_3d, TOL};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn quarter() -> Curve3d {
        Curve3d::Arc(
            Arc3d::from_center_start_end(
                Point3::origin(),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Vector3::z(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn arc_endpoints_and_length() {
        let c = quarter();
        assert!(points_equal_3d(&c.start_point(), &Point3::new(1.0, 0.0, 0.0), TOL));
        assert!(points_equal_3d(&c.end_point(), &Point3::new(0.0, 1.0, 0.0), TOL));
        assert_relative_eq!(c.length(), FRAC_PI_2, epsilon = 1e-12);
        assert!(!c.is_closed());
    }

    #[test]
    fn clockwise_arc_via_negative_axis() {
        let c = Curve3d::Arc(
            Arc3d::from_center_start_end(
                Point3::origin(),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                -Vector3::z(),
            )
            .unwrap(),
        );
        assert_relative_eq!(c.length(), 3.0 * FRAC_PI_2, epsilon = 1e-12);
        assert!(c.contains_point(&Point3::new(-1.0, 0.0, 0.0), TOL));
    }

    #[test]
    fn arc_reverse_swaps_endpoints_and_tangent() {
        let c = quarter();
        let r = c.reversed();
        assert!(points_equal_3d(&r.start_point(), &c.end_point(), TOL));
        assert!(points_equal_3d(&r.end_point(), &c.start_point(), TOL));
        let t = r.start_tangent();
        assert_relative_eq!(t.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(t.y, 0.0, epsilon = 1e-12);
        assert!(r.contains_point(&Point3::new(0.5f64.sqrt(), 0.5f64.sqrt(), 0.0), TOL));
        assert!(!r.contains_point(&Point3::new(-1.0, 0.0, 0.0), TOL));
    }

    #[test]
    fn arc_start_tangent_is_ccw() {
        let t = quarter().start_tangent();
        assert_relative_eq!(t.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(t.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn circle_is_closed() {
        let c = Curve3d::Arc(Arc3d::circle(Point3::new(1.0, 1.0, 0.0), Vector3::z(), 2.0).unwrap());
        assert!(c.is_closed());
        assert!(points_equal_3d(&c.start_point(), &c.end_point(), TOL));
        assert!(c.contains_point(&Point3::new(-1.0, 1.0, 0.0), TOL));
    }

    #[test]
    fn line_set_range_trims() {
        let mut c = Curve3d::line(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0));
        let a = c.param_at(&Point3::new(2.0, 0.0, 0.0));
        let b = c.param_at(&Point3::new(7.0, 0.0, 0.0));
        c.set_range(a, b);
        assert_relative_eq!(c.start_point().x, 2.0);
        assert_relative_eq!(c.end_point().x, 7.0);
        assert_relative_eq!(c.length(), 5.0);
    }

    #[test]
    fn arc_set_range_trims() {
        let mut c = Curve3d::Arc(Arc3d::circle(Point3::origin(), Vector3::z(), 1.0).unwrap());
        let start = c.param_at(&c.start_point());
        let mid = c.param_at(&c.sample_points(3)[1]);
        c.set_range(start, mid);
        assert_relative_eq!(c.length(), PI, epsilon = 1e-9);
        assert!(!c.is_closed());
    }

    #[test]
    fn transformed_translation() {
        let iso = Isometry3::translation(5.0, 0.0, 1.0);
        let c = quarter().transformed(&iso);
        assert!(points_equal_3d(&c.start_point(), &Point3::new(6.0, 0.0, 1.0), TOL));
        assert!(points_equal_3d(&c.center().unwrap(), &Point3::new(5.0, 0.0, 1.0), TOL));
    }

    #[test]
    fn sample_points_include_ends() {
        let pts = quarter().sample_points(5);
        assert_eq!(pts.len(), 5);
        assert!(points_equal_3d(&pts[0], &Point3::new(1.0, 0.0, 0.0), TOL));
        assert!(points_equal_3d(&pts[4], &Point3::new(0.0, 1.0, 0.0), TOL));
    }

    #[test]
    fn degenerate_arc_rejected() {
        assert!(Arc3d::new(Point3::origin(), Vector3::zeros(), Vector3::x(), 1.0, 0.0, 1.0).is_err());
        assert!(Arc3d::new(Point3::origin(), Vector3::z(), Vector3::z(), 1.0, 0.0, 1.0).is_err());
        assert!(Arc3d::new(Point3::origin(), Vector3::z(), Vector3::x(), 0.0, 0.0, 1.0).is_err());
    }
}
