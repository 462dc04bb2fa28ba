// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for topology operations.

use crate::keys::{CoedgeKey, EdgeKey, FaceKey, VertexKey, WireKey};

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during topology operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tag lookup found no face or coedge.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request did not carry enough information to resolve anything.
    #[error("underconstrained request: {0}")]
    Underconstrained(String),

    /// No geometrically equivalent entity exists on the target.
    #[error("no geometric match: {0}")]
    NoGeometricMatch(String),

    /// Vertex key not found in the Brep.
    #[error("vertex not found: {0:?}")]
    VertexNotFound(VertexKey),

    /// Edge key not found in the Brep.
    #[error("edge not found: {0:?}")]
    EdgeNotFound(EdgeKey),

    /// Coedge key not found in the Brep.
    #[error("coedge not found: {0:?}")]
    CoedgeNotFound(CoedgeKey),

    /// Wire key not found in the Brep.
    #[error("wire not found: {0:?}")]
    WireNotFound(WireKey),

    /// Face key not found in the Brep.
    #[error("face not found: {0:?}")]
    FaceNotFound(FaceKey),

    /// A wire must have at least one edge.
    #[error("wire must have at least one edge")]
    EmptyWire,

    /// Edges in a wire are not connected end-to-end.
    #[error("wire edges are not connected: edge {0} endpoint does not match edge {1}")]
    DisconnectedWire(usize, usize),

    /// A wire is already bounding another face.
    #[error("wire {0:?} already bounds a face")]
    WireInUse(WireKey),

    /// An edge curve does not start/end at the edge's vertices.
    #[error("edge curve does not meet its vertices: {0}")]
    CurveVertexMismatch(String),

    /// Error from the geometry layer.
    #[error(transparent)]
    Geometry(#[from] brepkit_geometry::Error),
}
