// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for B-Rep entities.
//!
//! The [`Brep`] is the central owner of all topology data. Every entity
//! (vertex, edge, coedge, wire, face) lives inside slot maps with stable,
//! generational keys. Edges keep the list of coedges that use them, so the
//! two faces meeting at an edge can be reached from either side.
//!
//! ## Coedges and tags
//!
//! A coedge is a directed use of an edge inside one wire. Each coedge and
//! each face carries a string tag that survives regeneration of the model.
//! Tags are expected to be unique within one Brep and often encode a
//! lineage path such as `parentId|localId`.

use brepkit_geometry::{Curve3d, Point3, Surface};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::keys::*;

/// Data stored for a vertex: a point in 3D space.
#[derive(Debug, Clone)]
pub struct VertexData {
    pub point: Point3<f64>,
}

/// Data stored for an edge: a curve between two vertices.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub start: VertexKey,
    pub end: VertexKey,
    /// Geometry running from `start` to `end`
    pub curve: Curve3d,
    /// Coedges using this edge, in creation order
    pub coedges: Vec<CoedgeKey>,
}

/// Data stored for a coedge: one directed use of an edge.
#[derive(Debug, Clone)]
pub struct CoedgeData {
    pub edge: EdgeKey,
    pub wire: WireKey,
    /// Owning face, set once the wire is attached to a face
    pub face: Option<FaceKey>,
    /// `true` if the coedge runs along the edge curve (start→end)
    pub forward: bool,
    pub tag: String,
}

/// Data stored for a wire: an ordered chain of coedges.
#[derive(Debug, Clone)]
pub struct WireData {
    pub coedges: Vec<CoedgeKey>,
    pub face: Option<FaceKey>,
}

/// Data stored for a face: a surface region bounded by one outer wire and
/// zero or more inner wires (holes).
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Outer wire first, then inner wires
    pub wires: Vec<WireKey>,
    pub surface: Surface,
    /// `true` if the face normal agrees with the surface's natural normal
    pub same_dir: bool,
    pub tag: String,
}

impl FaceData {
    pub fn outer_wire(&self) -> Option<WireKey> {
        self.wires.first().copied()
    }
}

/// Boundary representation of a solid (or an open shell of faces).
///
/// # Example
///
/// ```
/// use brepkit_geometry::Point3;
/// use brepkit_topology::Brep;
///
/// let mut brep = Brep::new();
/// brep.add_vertex(Point3::new(0.0, 0.0, 0.0));
/// brep.add_vertex(Point3::new(1.0, 0.0, 0.0));
///
/// assert_eq!(brep.vertex_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Brep {
    // Entity storage
    pub(crate) vertices: SlotMap<VertexKey, VertexData>,
    pub(crate) edges: SlotMap<EdgeKey, EdgeData>,
    pub(crate) coedges: SlotMap<CoedgeKey, CoedgeData>,
    pub(crate) wires: SlotMap<WireKey, WireData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,

    // Upward adjacency: vertex → edges using it
    pub(crate) vertex_to_edges: FxHashMap<VertexKey, FxHashSet<EdgeKey>>,
}

impl Brep {
    /// Creates a new, empty Brep.
    pub fn new() -> Self {
        Self {
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            coedges: SlotMap::with_key(),
            wires: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            vertex_to_edges: FxHashMap::default(),
        }
    }

    // --- Vertex operations ---

    /// Adds a vertex at the given point.
    pub fn add_vertex(&mut self, point: Point3<f64>) -> VertexKey {
        self.vertices.insert(VertexData { point })
    }

    pub fn vertex(&self, key: VertexKey) -> Option<&VertexData> {
        self.vertices.get(key)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Edge operations ---

    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeData> {
        self.edges.get(key)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Coedge operations ---

    pub fn coedge(&self, key: CoedgeKey) -> Option<&CoedgeData> {
        self.coedges.get(key)
    }

    pub fn coedge_count(&self) -> usize {
        self.coedges.len()
    }

    // --- Wire operations ---

    pub fn wire(&self, key: WireKey) -> Option<&WireData> {
        self.wires.get(key)
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    // --- Face operations ---

    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if the Brep has no faces and no edges.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.edges.is_empty()
    }

    // --- Adjacency index helpers ---

    /// Register that an edge uses a vertex (upward adjacency).
    pub(crate) fn link_vertex_edge(&mut self, vertex: VertexKey, edge: EdgeKey) {
        self.vertex_to_edges.entry(vertex).or_default().insert(edge);
    }
}

impl Default for Brep {
    fn default() -> Self {
        Self::new()
    }
}
