// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based B-Rep storage.
//!
//! Each entity gets a unique, type-safe key for O(1) lookup in the Brep.
//! Keys are created by `slotmap::SlotMap` and remain valid even after other
//! entities are removed (generational indices).

use slotmap::new_key_type;

new_key_type! {
    /// Key for a vertex (point in 3D space).
    pub struct VertexKey;

    /// Key for an edge (curve between two vertices).
    pub struct EdgeKey;

    /// Key for a coedge (directed, tagged use of an edge inside a wire).
    pub struct CoedgeKey;

    /// Key for a wire (ordered chain of coedges).
    pub struct WireKey;

    /// Key for a face (surface region bounded by wires).
    pub struct FaceKey;
}

/// A coedge inside one of several Breps.
///
/// Sweep paths may be resolved across multiple solids, so a bare
/// [`CoedgeKey`] is not enough to identify a coedge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoedgeRef {
    /// Index of the owning Brep in the slice the path was resolved against
    pub brep: usize,
    pub coedge: CoedgeKey,
}

impl CoedgeRef {
    pub fn new(brep: usize, coedge: CoedgeKey) -> Self {
        Self { brep, coedge }
    }
}

/// A face inside one of several Breps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceRef {
    pub brep: usize,
    pub face: FaceKey,
}

impl FaceRef {
    pub fn new(brep: usize, face: FaceKey) -> Self {
        Self { brep, face }
    }
}
