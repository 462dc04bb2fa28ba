// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face surfaces: planes and cylinders.

use nalgebra::{Isometry3, Point2, Point3, Unit, Vector3};

use crate::error::{Error, Result};
use crate::frame::perpendicular_to;

/// Infinite plane with an in-plane U direction for parametrization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
    pub u_axis: Unit<Vector3<f64>>,
}

impl Plane {
    pub fn from_origin_normal(origin: Point3<f64>, normal: Vector3<f64>) -> Result<Self> {
        let normal = Unit::try_new(normal, 1e-12)
            .ok_or_else(|| Error::DegenerateSurface("plane normal has zero length".into()))?;
        Ok(Self {
            origin,
            normal,
            u_axis: perpendicular_to(&normal),
        })
    }

    /// Best-fit plane through a polygon (Newell's method), origin at the
    /// first point. Fails for fewer than three points or colinear input.
    pub fn from_points(points: &[Point3<f64>]) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::DegenerateSurface(format!(
                "plane needs at least 3 points, got {}",
                points.len()
            )));
        }
        let mut normal = Vector3::zeros();
        for (i, curr) in points.iter().enumerate() {
            let next = &points[(i + 1) % points.len()];
            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }
        Self::from_origin_normal(points[0], normal)
            .map_err(|_| Error::DegenerateSurface("points are colinear".into()))
    }

    pub fn v_axis(&self) -> Vector3<f64> {
        self.normal.cross(&self.u_axis.into_inner())
    }

    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        (p - self.origin).dot(&self.normal.into_inner())
    }
}

/// Infinite cylinder about an axis line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub origin: Point3<f64>,
    pub axis: Unit<Vector3<f64>>,
    pub ref_dir: Unit<Vector3<f64>>,
    pub radius: f64,
}

impl Cylinder {
    pub fn new(origin: Point3<f64>, axis: Vector3<f64>, radius: f64) -> Result<Self> {
        let axis = Unit::try_new(axis, 1e-12)
            .ok_or_else(|| Error::DegenerateSurface("cylinder axis has zero length".into()))?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::DegenerateSurface(format!("cylinder radius {}", radius)));
        }
        Ok(Self {
            origin,
            axis,
            ref_dir: perpendicular_to(&axis),
            radius,
        })
    }
}

/// Surface underlying a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Plane(Plane),
    Cylinder(Cylinder),
}

impl Surface {
    pub fn is_plane(&self) -> bool {
        matches!(self, Surface::Plane(_))
    }

    /// Surface parameters of `p` (assumed on or near the surface).
    ///
    /// Planes use in-plane coordinates; cylinders use (angle, height).
    pub fn uv_at(&self, p: &Point3<f64>) -> Point2<f64> {
        match self {
            Surface::Plane(pl) => {
                let d = p - pl.origin;
                Point2::new(d.dot(&pl.u_axis.into_inner()), d.dot(&pl.v_axis()))
            }
            Surface::Cylinder(c) => {
                let d = p - c.origin;
                let axis = c.axis.into_inner();
                let x = c.ref_dir.into_inner();
                let y = axis.cross(&x);
                Point2::new(d.dot(&y).atan2(d.dot(&x)), d.dot(&axis))
            }
        }
    }

    /// Outward unit normal at surface parameters `uv`.
    pub fn normal_at(&self, uv: &Point2<f64>) -> Vector3<f64> {
        match self {
            Surface::Plane(pl) => pl.normal.into_inner(),
            Surface::Cylinder(c) => {
                let x = c.ref_dir.into_inner();
                let y = c.axis.cross(&x);
                x * uv.x.cos() + y * uv.x.sin()
            }
        }
    }

    /// Outward unit normal at the surface point nearest `p`.
    pub fn normal_at_point(&self, p: &Point3<f64>) -> Vector3<f64> {
        self.normal_at(&self.uv_at(p))
    }

    pub fn transformed(&self, iso: &Isometry3<f64>) -> Self {
        match self {
            Surface::Plane(pl) => Surface::Plane(Plane {
                origin: iso * pl.origin,
                normal: Unit::new_normalize(iso.transform_vector(&pl.normal.into_inner())),
                u_axis: Unit::new_normalize(iso.transform_vector(&pl.u_axis.into_inner())),
            }),
            Surface::Cylinder(c) => Surface::Cylinder(Cylinder {
                origin: iso * c.origin,
                axis: Unit::new_normalize(iso.transform_vector(&c.axis.into_inner())),
                ref_dir: Unit::new_normalize(iso.transform_vector(&c.ref_dir.into_inner())),
                radius: c.radius,
            }),
        }
    }
}

impl From<Plane> for Surface {
    fn from(p: Plane) -> Self {
        Surface::Plane(p)
    }
}

impl From<Cylinder> for Surface {
    fn from(c: Cylinder) -> Self {
        Surface::Cylinder(c)
    }
}
