// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # brepkit Topology
//!
//! Arena-based boundary representation with the consistency and sweep-path
//! services built on top of it.
//!
//! A [`Brep`] stores vertices, edges, coedges, wires and faces in slot maps.
//! Every coedge carries a persistent string tag (lineage tags look like
//! `parentId|localId`) that outlives regeneration of the model, and the
//! services below work from those tags:
//!
//! - [`EdgeReconciler`] snaps near-coincident endpoints of 2D profile edges
//!   together before they are extruded or swept.
//! - [`TagLookup`] resolves face and coedge tags across several Breps, with
//!   a fallback on the last tag segment.
//! - [`PathAssembler`] turns a stored list of coedge tags into an ordered,
//!   consistently oriented chain of curves and a frame at its start.
//! - [`BrepMatcher`] finds the counterparts of a source path on a translated
//!   copy of the source Brep.
//!
//! ```
//! use brepkit_geometry::Point3;
//! use brepkit_topology::{Brep, PathAssembler};
//!
//! let brep = Brep::make_box(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0), "w").unwrap();
//! let breps = [brep];
//! let path = PathAssembler::default().sweep_path(
//!     &["w|face_1|ce_0", "w|face_1|ce_1"],
//!     &breps,
//!     None,
//!     None,
//!     None,
//! );
//! assert_eq!(path.len(), 2);
//! ```

pub mod arena;
pub mod builders;
pub mod config;
pub mod construction;
pub mod error;
pub mod geometry;
pub mod keys;
pub mod lookup;
pub mod matcher;
pub mod reconcile;
pub mod spatial;
pub mod sweep;
pub mod transform;
pub mod traversal;

pub use arena::{Brep, CoedgeData, EdgeData, FaceData, VertexData, WireData};
pub use config::TopologyConfig;
pub use error::{Error, Result};
pub use keys::{CoedgeKey, CoedgeRef, EdgeKey, FaceKey, FaceRef, VertexKey, WireKey};
pub use lookup::{tag_suffix, TagLookup, TAG_DELIMITER};
pub use matcher::BrepMatcher;
pub use reconcile::{Edge2d, EdgeReconciler, DEFAULT_MAX_ROUNDS};
pub use spatial::SpatialIndex;
pub use sweep::{PathAssembler, SweepInfo, SweepPath};
