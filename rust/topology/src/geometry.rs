// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric queries on B-Rep entities.
//!
//! Computes lengths, centroids, normals and bounds from the vertex points,
//! edge curves and face surfaces.

use brepkit_geometry::{BoundingBox3, Point3, Vector3};

use crate::arena::Brep;
use crate::keys::*;

impl Brep {
    /// Returns the position of a vertex.
    pub fn vertex_point(&self, key: VertexKey) -> Option<Point3<f64>> {
        self.vertices.get(key).map(|v| v.point)
    }

    /// Length of an edge's curve.
    pub fn edge_length(&self, key: EdgeKey) -> Option<f64> {
        self.edges.get(key).map(|e| e.curve.length())
    }

    /// Computes the face centroid as the average of its outer wire vertices.
    pub fn face_centroid(&self, key: FaceKey) -> Option<Point3<f64>> {
        let outer = self.faces.get(key)?.outer_wire()?;
        let pts = self.wire_vertex_points(outer)?;
        if pts.is_empty() {
            return None;
        }
        let sum = pts.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / pts.len() as f64))
    }

    /// Outward unit normal of a face.
    ///
    /// Evaluates the surface normal at the face centroid and flips it when
    /// the face disagrees with its surface.
    pub fn face_normal(&self, key: FaceKey) -> Option<Vector3<f64>> {
        let face = self.faces.get(key)?;
        let centroid = self.face_centroid(key)?;
        let n = face.surface.normal_at_point(&centroid);
        Some(if face.same_dir { n } else { -n })
    }

    /// Axis-aligned bounds of every edge curve and vertex.
    pub fn bounding_box(&self) -> BoundingBox3 {
        let mut bounds = BoundingBox3::empty();
        for (_, v) in &self.vertices {
            bounds.expand(&v.point);
        }
        for (_, e) in &self.edges {
            bounds.merge(&e.curve.bounding_box());
        }
        bounds
    }

    /// Center of [`bounding_box`](Self::bounding_box); `None` for an empty Brep.
    pub fn bounding_box_center(&self) -> Option<Point3<f64>> {
        let bounds = self.bounding_box();
        bounds.is_valid().then(|| bounds.center())
    }
}
