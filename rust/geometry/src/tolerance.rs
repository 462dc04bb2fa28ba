// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerance constants and the serializable tolerance configuration shared
//! by the reconciler, path assembler and matcher.

use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tight tolerance for on-curve and point-equality tests.
pub const TOL: f64 = 1e-6;

/// Looser tolerance used when snapping near-duplicate coordinates together.
pub const FIX_TOL: f64 = 2e-6;

/// Angle (radians) below which a direction counts as exactly colinear.
pub const COLINEAR_ANGLE_TOL: f64 = 1e-10;

/// Maximum `1 - cos(angle)` between two normals that still point the same way.
pub const NORMAL_TOL: f64 = 1e-3;

/// Default number of sample points used to compare arcs.
pub const DEFAULT_ARC_SAMPLES: usize = 8;

/// Returns `true` if two 2D points are within `tol` of each other.
#[inline]
pub fn points_equal_2d(a: &Point2<f64>, b: &Point2<f64>, tol: f64) -> bool {
    (a - b).norm() <= tol
}

/// Returns `true` if two 3D points are within `tol` of each other.
#[inline]
pub fn points_equal_3d(a: &Point3<f64>, b: &Point3<f64>, tol: f64) -> bool {
    (a - b).norm() <= tol
}

/// Tolerance configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Point-equality and on-curve tolerance
    pub tol: f64,
    /// Near-duplicate snapping tolerance (must be >= `tol`)
    pub fix_tol: f64,
    /// Angle tolerance (radians) for the exact-colinearity check
    pub colinear_angle_tol: f64,
    /// Maximum `1 - cos(angle)` between comparable normals
    pub normal_tol: f64,
    /// Points sampled per arc when comparing arcs geometrically
    pub arc_samples: usize,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            tol: TOL,
            fix_tol: FIX_TOL,
            colinear_angle_tol: COLINEAR_ANGLE_TOL,
            normal_tol: NORMAL_TOL,
            arc_samples: DEFAULT_ARC_SAMPLES,
        }
    }
}

impl ToleranceConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every tolerance is finite and positive and that the
    /// snapping tolerance is not tighter than the equality tolerance.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("tol", self.tol),
            ("fix_tol", self.fix_tol),
            ("colinear_angle_tol", self.colinear_angle_tol),
            ("normal_tol", self.normal_tol),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidTolerance(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }
        if self.fix_tol < self.tol {
            return Err(Error::InvalidTolerance(format!(
                "fix_tol ({}) must not be smaller than tol ({})",
                self.fix_tol, self.tol
            )));
        }
        if self.arc_samples < 2 {
            return Err(Error::InvalidTolerance(format!(
                "arc_samples must be at least 2, got {}",
                self.arc_samples
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn points_equal_2d(&self, a: &Point2<f64>, b: &Point2<f64>) -> bool {
        points_equal_2d(a, b, self.tol)
    }

    #[inline]
    pub fn points_equal_3d(&self, a: &Point3<f64>, b: &Point3<f64>) -> bool {
        points_equal_3d(a, b, self.tol)
    }
}
