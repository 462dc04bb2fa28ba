// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Right-handed orthonormal frames.

use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Any unit vector perpendicular to `v`.
pub fn perpendicular_to(v: &Unit<Vector3<f64>>) -> Unit<Vector3<f64>> {
    // Cross with the world axis least aligned with v
    let helper = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    Unit::new_normalize(v.cross(&helper))
}

/// Local coordinate frame: origin plus orthonormal X and Z axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub origin: Point3<f64>,
    pub x_axis: Unit<Vector3<f64>>,
    pub z_axis: Unit<Vector3<f64>>,
}

impl Frame {
    /// Builds a frame from an X direction and a Z direction.
    ///
    /// Z is kept as given (normalized); X is orthogonalized against it.
    /// Returns `None` if either vector is zero or they are parallel.
    pub fn new(origin: Point3<f64>, x_dir: Vector3<f64>, z_dir: Vector3<f64>) -> Option<Self> {
        let z_axis = Unit::try_new(z_dir, 1e-12)?;
        let z = z_axis.into_inner();
        let x_axis = Unit::try_new(x_dir - z * x_dir.dot(&z), 1e-12)?;
        Some(Self {
            origin,
            x_axis,
            z_axis,
        })
    }

    pub fn y_axis(&self) -> Vector3<f64> {
        self.z_axis.cross(&self.x_axis.into_inner())
    }

    /// Local-to-world matrix with the axes as columns.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let x = self.x_axis.into_inner();
        let y = self.y_axis();
        let z = self.z_axis.into_inner();
        let o = self.origin;
        Matrix4::new(
            x.x, y.x, z.x, o.x, //
            x.y, y.y, z.y, o.y, //
            x.z, y.z, z.z, o.z, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Maps a point expressed in this frame to world coordinates.
    pub fn to_world(&self, local: &Point3<f64>) -> Point3<f64> {
        self.origin
            + self.x_axis.into_inner() * local.x
            + self.y_axis() * local.y
            + self.z_axis.into_inner() * local.z
    }
}
