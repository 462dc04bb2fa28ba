// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Traversal methods for navigating the B-Rep hierarchy.
//!
//! Supports downward traversal (face → wires → coedges → edge → vertices)
//! and the coedge-level queries the sweep and matching code is built on.

use brepkit_geometry::{Curve3d, Point3};
use rustc_hash::FxHashSet;

use crate::arena::*;
use crate::keys::*;

impl Brep {
    /// Iterates faces in creation order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceKey, &FaceData)> {
        self.faces.iter()
    }

    /// Iterates edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &EdgeData)> {
        self.edges.iter()
    }

    /// Returns the start and end vertex keys of an edge.
    pub fn edge_vertices(&self, key: EdgeKey) -> Option<(VertexKey, VertexKey)> {
        self.edges.get(key).map(|e| (e.start, e.end))
    }

    /// Returns the coedges using an edge.
    pub fn edge_coedges(&self, key: EdgeKey) -> Option<&[CoedgeKey]> {
        self.edges.get(key).map(|e| e.coedges.as_slice())
    }

    /// Returns the edges incident to a vertex.
    pub fn vertex_edges(&self, key: VertexKey) -> FxHashSet<EdgeKey> {
        self.vertex_to_edges.get(&key).cloned().unwrap_or_default()
    }

    /// Returns the wires of a face, outer wire first.
    pub fn face_wires(&self, key: FaceKey) -> Option<&[WireKey]> {
        self.faces.get(key).map(|f| f.wires.as_slice())
    }

    /// Returns the coedges of a wire in traversal order.
    pub fn wire_coedges(&self, key: WireKey) -> Option<&[CoedgeKey]> {
        self.wires.get(key).map(|w| w.coedges.as_slice())
    }

    /// Returns the face owning a coedge, if it has been attached to one.
    pub fn coedge_face(&self, key: CoedgeKey) -> Option<FaceKey> {
        self.coedges.get(key)?.face
    }

    pub fn coedge_tag(&self, key: CoedgeKey) -> Option<&str> {
        self.coedges.get(key).map(|c| c.tag.as_str())
    }

    /// Returns the edge curve oriented along the coedge.
    pub fn coedge_curve(&self, key: CoedgeKey) -> Option<Curve3d> {
        let coedge = self.coedges.get(key)?;
        let curve = self.edges.get(coedge.edge)?.curve;
        Some(if coedge.forward {
            curve
        } else {
            curve.reversed()
        })
    }

    /// Returns the vertex the coedge starts at (in coedge direction).
    pub fn coedge_start_vertex(&self, key: CoedgeKey) -> Option<VertexKey> {
        let coedge = self.coedges.get(key)?;
        let edge = self.edges.get(coedge.edge)?;
        Some(if coedge.forward { edge.start } else { edge.end })
    }

    pub fn coedge_end_vertex(&self, key: CoedgeKey) -> Option<VertexKey> {
        let coedge = self.coedges.get(key)?;
        let edge = self.edges.get(coedge.edge)?;
        Some(if coedge.forward { edge.end } else { edge.start })
    }

    pub fn coedge_start_point(&self, key: CoedgeKey) -> Option<Point3<f64>> {
        let v = self.coedge_start_vertex(key)?;
        self.vertices.get(v).map(|v| v.point)
    }

    pub fn coedge_end_point(&self, key: CoedgeKey) -> Option<Point3<f64>> {
        let v = self.coedge_end_vertex(key)?;
        self.vertices.get(v).map(|v| v.point)
    }

    /// Returns the vertex points of a wire, in traversal order.
    pub fn wire_vertex_points(&self, key: WireKey) -> Option<Vec<Point3<f64>>> {
        let wire = self.wires.get(key)?;
        wire.coedges
            .iter()
            .map(|&ck| self.coedge_start_point(ck))
            .collect()
    }

    /// Returns the vertex points of every wire of a face, outer wire first.
    pub fn face_vertex_points(&self, key: FaceKey) -> Option<Vec<Point3<f64>>> {
        let face = self.faces.get(key)?;
        let mut points = Vec::new();
        for &wk in &face.wires {
            points.extend(self.wire_vertex_points(wk)?);
        }
        Some(points)
    }
}
