// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! brepkit Geometry Primitives
//!
//! Points, 2D/3D lines and arcs, planar and cylindrical surfaces, bounding
//! boxes and local frames used by the B-Rep topology layer. Every point
//! comparison goes through a tolerance; nothing here compares coordinates
//! exactly except where a caller asks for it explicitly.

pub mod bbox;
pub mod curve2d;
pub mod curve3d;
pub mod error;
pub mod frame;
pub mod surface;
pub mod tolerance;

// Re-export nalgebra types for convenience
pub use nalgebra::{
    Isometry3, Matrix4, Point2, Point3, Translation3, Unit, UnitQuaternion, Vector2, Vector3,
};

pub use bbox::{BoundingBox2, BoundingBox3};
pub use curve2d::{Arc2d, Curve2d, Line2d};
pub use curve3d::{Arc3d, Curve3d, Line3d};
pub use error::{Error, Result};
pub use frame::{perpendicular_to, Frame};
pub use surface::{Cylinder, Plane, Surface};
pub use tolerance::{
    points_equal_2d, points_equal_3d, ToleranceConfig, COLINEAR_ANGLE_TOL, FIX_TOL, NORMAL_TOL,
    TOL,
};
