// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level builders for planar faces and boxes.
//!
//! Boxes are sewn: faces meeting at a corner share the vertex, and faces
//! meeting along a side share the edge, so every box edge carries two
//! coedges running in opposite directions.

use brepkit_geometry::{Plane, Point3, Surface, TOL};
use rustc_hash::FxHashMap;

use crate::arena::Brep;
use crate::error::{Error, Result};
use crate::keys::*;
use crate::spatial::SpatialIndex;

type EdgeMap = FxHashMap<(VertexKey, VertexKey), EdgeKey>;

impl Brep {
    /// Creates a planar face through `points`, creating fresh vertices,
    /// straight edges and one wire.
    ///
    /// Coedge `i` runs from `points[i]` to `points[i + 1]` (wrapping) and is
    /// tagged `coedge_tags[i]`. An empty tag list generates
    /// `"{face_tag}|ce_{i}"` tags.
    pub fn add_planar_face<S: AsRef<str>>(
        &mut self,
        points: &[Point3<f64>],
        face_tag: &str,
        coedge_tags: &[S],
    ) -> Result<FaceKey> {
        let vertices: Vec<VertexKey> = points.iter().map(|p| self.add_vertex(*p)).collect();
        let mut edge_map = EdgeMap::default();
        self.planar_face_from_vertices(&vertices, &mut edge_map, face_tag, coedge_tags)
    }

    /// Builds an axis-aligned box with outward-facing planar faces.
    ///
    /// Faces are tagged `"{tag_prefix}|face_{n}"` in the order bottom, top,
    /// front, back, left, right; their coedges `"{tag_prefix}|face_{n}|ce_{m}"`.
    pub fn make_box(min: Point3<f64>, max: Point3<f64>, tag_prefix: &str) -> Result<Brep> {
        let mut brep = Brep::new();
        brep.add_box(min, max, tag_prefix)?;
        Ok(brep)
    }

    /// Adds a sewn box to this Brep and returns its six faces.
    pub fn add_box(
        &mut self,
        min: Point3<f64>,
        max: Point3<f64>,
        tag_prefix: &str,
    ) -> Result<[FaceKey; 6]> {
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);

        let faces = [
            // bottom (z=z0), outward normal = -Z
            [[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]],
            // top (z=z1), outward normal = +Z
            [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]],
            // front (y=y0), outward normal = -Y
            [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]],
            // back (y=y1), outward normal = +Y
            [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]],
            // left (x=x0), outward normal = -X
            [[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]],
            // right (x=x1), outward normal = +X
            [[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]],
        ];

        let mut index = SpatialIndex::new(TOL);
        let mut edge_map = EdgeMap::default();
        let mut keys = Vec::with_capacity(6);

        for (n, coords) in faces.iter().enumerate() {
            let vertices: Vec<VertexKey> = coords
                .iter()
                .map(|c| self.find_or_add_vertex(&mut index, Point3::new(c[0], c[1], c[2]), TOL))
                .collect();
            let face_tag = format!("{}|face_{}", tag_prefix, n);
            keys.push(self.planar_face_from_vertices(
                &vertices,
                &mut edge_map,
                &face_tag,
                &[] as &[&str],
            )?);
        }

        Ok([keys[0], keys[1], keys[2], keys[3], keys[4], keys[5]])
    }

    fn planar_face_from_vertices<S: AsRef<str>>(
        &mut self,
        vertices: &[VertexKey],
        edge_map: &mut EdgeMap,
        face_tag: &str,
        coedge_tags: &[S],
    ) -> Result<FaceKey> {
        if !coedge_tags.is_empty() && coedge_tags.len() != vertices.len() {
            return Err(Error::Underconstrained(format!(
                "face '{}' has {} vertices but {} coedge tags",
                face_tag,
                vertices.len(),
                coedge_tags.len()
            )));
        }

        let points = vertices
            .iter()
            .map(|&vk| self.vertex_point(vk).ok_or(Error::VertexNotFound(vk)))
            .collect::<Result<Vec<_>>>()?;
        let plane = Plane::from_points(&points)?;

        let mut uses = Vec::with_capacity(vertices.len());
        for i in 0..vertices.len() {
            let start = vertices[i];
            let end = vertices[(i + 1) % vertices.len()];
            if start == end {
                continue;
            }

            // Canonical edge key (ordered by key for deduplication)
            let canonical = if start < end { (start, end) } else { (end, start) };

            let edge = match edge_map.get(&canonical) {
                Some(&existing) => existing,
                None => {
                    let new_edge = self.add_line_edge(start, end)?;
                    edge_map.insert(canonical, new_edge);
                    new_edge
                }
            };

            let tag = match coedge_tags.get(i) {
                Some(t) => t.as_ref().to_string(),
                None => format!("{}|ce_{}", face_tag, i),
            };
            uses.push((edge, tag));
        }

        let wire = self.add_wire(&uses)?;
        self.add_face(wire, &[], Surface::Plane(plane), true, face_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_box_is_sewn() {
        let brep = Brep::make_box(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0), "box").unwrap();

        assert_eq!(brep.vertex_count(), 8);
        assert_eq!(brep.edge_count(), 12);
        assert_eq!(brep.coedge_count(), 24);
        assert_eq!(brep.face_count(), 6);

        for (ek, _) in brep.edges() {
            let uses = brep.edge_coedges(ek).unwrap();
            assert_eq!(uses.len(), 2);
            let a = brep.coedge(uses[0]).unwrap();
            let b = brep.coedge(uses[1]).unwrap();
            assert_ne!(a.forward, b.forward, "manifold edge uses run opposite ways");
        }
    }

    #[test]
    fn make_box_tags() {
        let brep = Brep::make_box(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0), "w1").unwrap();
        let tags: Vec<&str> = brep.faces().map(|(_, f)| f.tag.as_str()).collect();
        assert_eq!(tags[0], "w1|face_0");
        assert_eq!(tags[5], "w1|face_5");

        let (fk, _) = brep.faces().nth(2).unwrap();
        let wire = brep.face_wires(fk).unwrap()[0];
        let ce = brep.wire_coedges(wire).unwrap()[3];
        assert_eq!(brep.coedge_tag(ce), Some("w1|face_2|ce_3"));
    }

    #[test]
    fn planar_face_tag_count_checked() {
        let mut brep = Brep::new();
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert!(matches!(
            brep.add_planar_face(&pts, "f", &["only-one"]),
            Err(Error::Underconstrained(_))
        ));
    }

    #[test]
    fn planar_face_rejects_colinear_points() {
        let mut brep = Brep::new();
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(matches!(
            brep.add_planar_face(&pts, "f", &[] as &[&str]),
            Err(Error::Geometry(_))
        ));
    }
}
