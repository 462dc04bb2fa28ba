// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial index for tolerance-based vertex lookup and merging.
//!
//! Uses a grid-based spatial hash for O(1) average-case nearest-vertex
//! queries. Builders use it so that faces meeting at a corner share one
//! vertex (and therefore one edge) instead of carrying duplicates.

use brepkit_geometry::Point3;
use rustc_hash::FxHashMap;

use crate::arena::Brep;
use crate::keys::VertexKey;

/// A spatial hash grid for fast tolerance-based vertex lookup.
///
/// The grid divides 3D space into cubic cells of side `cell_size`. Lookups
/// check the 27 neighboring cells for candidates within tolerance.
#[derive(Debug)]
pub struct SpatialIndex {
    cell_size: f64,
    grid: FxHashMap<(i64, i64, i64), Vec<VertexKey>>,
}

impl SpatialIndex {
    /// `cell_size` should be >= the tolerance used for queries.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(1e-10),
            grid: FxHashMap::default(),
        }
    }

    /// Builds an index over every vertex of a Brep.
    pub fn from_brep(brep: &Brep, cell_size: f64) -> Self {
        let mut index = Self::new(cell_size);
        for (key, data) in brep.vertices.iter() {
            index.insert(key, &data.point);
        }
        index
    }

    pub fn insert(&mut self, key: VertexKey, p: &Point3<f64>) {
        let cell = self.cell_coords(p);
        self.grid.entry(cell).or_default().push(key);
    }

    /// Finds a vertex within `tolerance` of `p`. Returns the first match.
    pub fn find_near(&self, brep: &Brep, p: &Point3<f64>, tolerance: f64) -> Option<VertexKey> {
        let (cx, cy, cz) = self.cell_coords(p);

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(keys) = self.grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &vk in keys {
                        if let Some(v) = brep.vertex(vk) {
                            if (v.point - p).norm() <= tolerance {
                                return Some(vk);
                            }
                        }
                    }
                }
            }
        }

        None
    }

    fn cell_coords(&self, p: &Point3<f64>) -> (i64, i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
            (p.z / self.cell_size).floor() as i64,
        )
    }
}

impl Brep {
    /// Returns an existing vertex within `tolerance` of `p`, or creates a
    /// new one.
    pub fn find_or_add_vertex(
        &mut self,
        index: &mut SpatialIndex,
        p: Point3<f64>,
        tolerance: f64,
    ) -> VertexKey {
        if let Some(existing) = index.find_near(self, &p, tolerance) {
            return existing;
        }

        let key = self.add_vertex(p);
        index.insert(key, &p);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spatial_index_find_near() {
        let mut brep = Brep::new();
        let v0 = brep.add_vertex(Point3::new(0.0, 0.0, 0.0));
        brep.add_vertex(Point3::new(10.0, 10.0, 10.0));

        let index = SpatialIndex::from_brep(&brep, 0.01);

        assert_eq!(index.find_near(&brep, &Point3::new(0.0, 0.0, 0.0), 0.001), Some(v0));
        assert_eq!(index.find_near(&brep, &Point3::new(0.001, 0.0, 0.0), 0.01), Some(v0));
        assert_eq!(index.find_near(&brep, &Point3::new(1.0, 0.0, 0.0), 0.01), None);
    }

    #[test]
    fn find_or_add_reuses_vertex() {
        let mut brep = Brep::new();
        let mut index = SpatialIndex::new(0.01);

        let v0 = brep.find_or_add_vertex(&mut index, Point3::new(0.0, 0.0, 0.0), 0.001);
        let v1 = brep.find_or_add_vertex(&mut index, Point3::new(0.0001, 0.0, 0.0), 0.001);
        let v2 = brep.find_or_add_vertex(&mut index, Point3::new(5.0, 5.0, 5.0), 0.001);

        assert_eq!(v0, v1);
        assert_ne!(v0, v2);
        assert_eq!(brep.vertex_count(), 2);
    }
}
