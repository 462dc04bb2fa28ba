// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rigid transformations of a whole Brep.
//!
//! Vertex points, edge curves and face surfaces are all moved together so
//! that curves keep meeting their vertices.

use brepkit_geometry::{Isometry3, Vector3};

use crate::arena::Brep;

impl Brep {
    /// Applies a rigid transformation to every vertex, curve and surface.
    pub fn transform(&mut self, iso: &Isometry3<f64>) {
        for (_, v) in self.vertices.iter_mut() {
            v.point = iso * v.point;
        }
        for (_, e) in self.edges.iter_mut() {
            e.curve = e.curve.transformed(iso);
        }
        for (_, f) in self.faces.iter_mut() {
            f.surface = f.surface.transformed(iso);
        }
    }

    /// Translates the whole Brep.
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.transform(&Isometry3::translation(dx, dy, dz));
    }

    /// Returns a translated copy. Keys and tags are preserved.
    pub fn translated(&self, offset: &Vector3<f64>) -> Brep {
        let mut copy = self.clone();
        copy.translate(offset.x, offset.y, offset.z);
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use brepkit_geometry::{Point3, Translation3, UnitQuaternion};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn translated_copy_keeps_tags_and_moves_geometry() {
        let brep = Brep::make_box(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0), "b").unwrap();
        let moved = brep.translated(&Vector3::new(10.0, 0.0, -2.0));

        let c = moved.bounding_box_center().unwrap();
        assert_relative_eq!(c, Point3::new(10.5, 0.5, -1.5), epsilon = 1e-12);

        for ((_, a), (_, b)) in brep.faces().zip(moved.faces()) {
            assert_eq!(a.tag, b.tag);
        }
        for (ek, e) in moved.edges() {
            let p0 = moved.vertex_point(e.start).unwrap();
            assert_relative_eq!(moved.edge(ek).unwrap().curve.start_point(), p0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rotation_keeps_normals_outward() {
        let mut brep = Brep::make_box(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0), "b").unwrap();
        brep.transform(&Isometry3::from_parts(
            Translation3::new(0.0, 0.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
        ));
        let center = brep.bounding_box_center().unwrap();
        for (fk, _) in brep.faces() {
            let n = brep.face_normal(fk).unwrap();
            let c = brep.face_centroid(fk).unwrap();
            assert!((c - center).dot(&n) > 0.0);
        }
    }
}
