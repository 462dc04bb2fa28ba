// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction methods for B-Rep entities.
//!
//! Each entity is created through the Brep, which ensures referential
//! integrity (all referenced sub-entities must exist) and maintains the
//! adjacency index.

use brepkit_geometry::{points_equal_3d, Curve3d, Surface, TOL};

use crate::arena::*;
use crate::error::{Error, Result};
use crate::keys::*;

impl Brep {
    /// Creates an edge between two existing vertices carrying `curve`.
    ///
    /// The curve must start at `start` and end at `end` within [`TOL`].
    pub fn add_edge(&mut self, start: VertexKey, end: VertexKey, curve: Curve3d) -> Result<EdgeKey> {
        let p0 = self
            .vertices
            .get(start)
            .ok_or(Error::VertexNotFound(start))?
            .point;
        let p1 = self
            .vertices
            .get(end)
            .ok_or(Error::VertexNotFound(end))?
            .point;

        if !points_equal_3d(&curve.start_point(), &p0, TOL) {
            return Err(Error::CurveVertexMismatch(format!(
                "curve starts at {:?}, start vertex is at {:?}",
                curve.start_point(),
                p0
            )));
        }
        if !points_equal_3d(&curve.end_point(), &p1, TOL) {
            return Err(Error::CurveVertexMismatch(format!(
                "curve ends at {:?}, end vertex is at {:?}",
                curve.end_point(),
                p1
            )));
        }

        let key = self.edges.insert(EdgeData {
            start,
            end,
            curve,
            coedges: Vec::new(),
        });
        self.link_vertex_edge(start, key);
        self.link_vertex_edge(end, key);
        Ok(key)
    }

    /// Creates a straight edge between two existing vertices.
    pub fn add_line_edge(&mut self, start: VertexKey, end: VertexKey) -> Result<EdgeKey> {
        let p0 = self.vertices.get(start).ok_or(Error::VertexNotFound(start))?.point;
        let p1 = self.vertices.get(end).ok_or(Error::VertexNotFound(end))?.point;
        self.add_edge(start, end, Curve3d::line(p0, p1))
    }

    /// Creates a wire from an ordered list of `(edge, coedge tag)` pairs.
    ///
    /// The edges must form a connected chain: each edge shares a vertex with
    /// the next edge. One coedge is created per entry, oriented so that the
    /// chain is traversed consistently.
    ///
    /// Returns an error if the list is empty or edges are not connected.
    pub fn add_wire<S: AsRef<str>>(&mut self, uses: &[(EdgeKey, S)]) -> Result<WireKey> {
        if uses.is_empty() {
            return Err(Error::EmptyWire);
        }

        for (ek, _) in uses {
            if !self.edges.contains_key(*ek) {
                return Err(Error::EdgeNotFound(*ek));
            }
        }

        // Determine orientations by checking connectivity
        let mut orientations = Vec::with_capacity(uses.len());

        if uses.len() == 1 {
            orientations.push(true);
        } else {
            // First edge orientation is decided by the second edge
            let first = &self.edges[uses[0].0];
            let second = &self.edges[uses[1].0];

            if first.end == second.start || first.end == second.end {
                orientations.push(true);
            } else if first.start == second.start || first.start == second.end {
                orientations.push(false);
            } else {
                return Err(Error::DisconnectedWire(0, 1));
            }

            for i in 1..uses.len() {
                let prev_edge = &self.edges[uses[i - 1].0];
                let curr_edge = &self.edges[uses[i].0];

                let prev_end = if orientations[i - 1] {
                    prev_edge.end
                } else {
                    prev_edge.start
                };

                if prev_end == curr_edge.start {
                    orientations.push(true);
                } else if prev_end == curr_edge.end {
                    orientations.push(false);
                } else {
                    return Err(Error::DisconnectedWire(i - 1, i));
                }
            }
        }

        let wire = self.wires.insert(WireData {
            coedges: Vec::with_capacity(uses.len()),
            face: None,
        });

        for ((ek, tag), forward) in uses.iter().zip(orientations) {
            let coedge = self.coedges.insert(CoedgeData {
                edge: *ek,
                wire,
                face: None,
                forward,
                tag: tag.as_ref().to_string(),
            });
            self.edges[*ek].coedges.push(coedge);
            self.wires[wire].coedges.push(coedge);
        }

        Ok(wire)
    }

    /// Creates a face bounded by `outer` and optional hole wires.
    ///
    /// `same_dir` records whether the face normal agrees with the surface's
    /// natural normal. Every coedge of the given wires gets this face as its
    /// owner.
    pub fn add_face<S: Into<String>>(
        &mut self,
        outer: WireKey,
        inner: &[WireKey],
        surface: Surface,
        same_dir: bool,
        tag: S,
    ) -> Result<FaceKey> {
        let mut wires = Vec::with_capacity(inner.len() + 1);
        wires.push(outer);
        wires.extend_from_slice(inner);

        for &wk in &wires {
            let wire = self.wires.get(wk).ok_or(Error::WireNotFound(wk))?;
            if wire.face.is_some() {
                return Err(Error::WireInUse(wk));
            }
        }

        let face = self.faces.insert(FaceData {
            wires: wires.clone(),
            surface,
            same_dir,
            tag: tag.into(),
        });

        for wk in wires {
            let wire = &mut self.wires[wk];
            wire.face = Some(face);
            for &ck in &wire.coedges {
                if let Some(coedge) = self.coedges.get_mut(ck) {
                    coedge.face = Some(face);
                }
            }
        }

        Ok(face)
    }
}
