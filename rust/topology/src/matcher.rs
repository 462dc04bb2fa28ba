// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Matching of faces and coedge paths between two Breps.
//!
//! The target is assumed to be a rigidly translated copy of the source:
//! the alignment is the translation between the two bounding-box centers.
//! Rotated copies are not recognised.

use brepkit_geometry::{Curve3d, Isometry3, Point3, ToleranceConfig};
use tracing::{debug, warn};

use crate::arena::Brep;
use crate::error::{Error, Result};
use crate::keys::*;
use crate::sweep::PathAssembler;

/// Finds the target-side counterparts of source faces and coedge paths.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrepMatcher {
    tolerance: ToleranceConfig,
}

impl BrepMatcher {
    pub fn new(tolerance: ToleranceConfig) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> &ToleranceConfig {
        &self.tolerance
    }

    /// Translation taking the source bounding-box center onto the target's.
    pub fn brep_offset(&self, source: &Brep, target: &Brep) -> Option<Isometry3<f64>> {
        let from = source.bounding_box_center()?;
        let to = target.bounding_box_center()?;
        let d = to - from;
        Some(Isometry3::translation(d.x, d.y, d.z))
    }

    /// Tags on `target` of the coedges matching the source path, in path
    /// order. Empty if any coedge has no counterpart.
    pub fn match_coedge_path<S: AsRef<str>>(
        &self,
        source: &Brep,
        coedge_tags: &[S],
        target: &Brep,
    ) -> Vec<String> {
        match self.try_match_coedge_path(source, coedge_tags, target) {
            Ok(tags) => tags,
            Err(err) => {
                warn!(%err, tags = coedge_tags.len(), "cannot match coedge path");
                Vec::new()
            }
        }
    }

    pub fn try_match_coedge_path<S: AsRef<str>>(
        &self,
        source: &Brep,
        coedge_tags: &[S],
        target: &Brep,
    ) -> Result<Vec<String>> {
        let breps = std::slice::from_ref(source);
        let path = PathAssembler::new(self.tolerance).try_resolve_path(coedge_tags, breps, None)?;
        let first = path
            .first()
            .ok_or_else(|| Error::NotFound("source path is empty".into()))?;

        let source_face = source
            .coedge_face(first.coedge)
            .ok_or_else(|| Error::NoGeometricMatch("source path has no owning face".into()))?;
        let offset = self
            .brep_offset(source, target)
            .ok_or_else(|| Error::NoGeometricMatch("Brep without vertices".into()))?;
        let target_face = self.try_match_face(source, source_face, target, &offset)?;
        debug!(face = target.face(target_face).map(|f| f.tag.as_str()), "matched owning face");

        let candidates: Vec<(CoedgeKey, Curve3d)> = target
            .face_wires(target_face)
            .unwrap_or_default()
            .iter()
            .flat_map(|&w| target.wire_coedges(w).unwrap_or_default().iter().copied())
            .filter_map(|ck| target.coedge_curve(ck).map(|c| (ck, c)))
            .collect();

        path.iter()
            .map(|c| -> Result<String> {
                let curve = source
                    .coedge_curve(c.coedge)
                    .ok_or(Error::CoedgeNotFound(c.coedge))?
                    .transformed(&offset);
                let (found, _) = candidates
                    .iter()
                    .find(|(_, candidate)| self.same_curve(&curve, candidate))
                    .ok_or_else(|| {
                        Error::NoGeometricMatch(format!(
                            "coedge '{}' has no counterpart",
                            source.coedge_tag(c.coedge).unwrap_or_default()
                        ))
                    })?;
                Ok(target.coedge_tag(*found).unwrap_or_default().to_string())
            })
            .collect()
    }

    /// Tag of the target face matching the source face tagged `face_tag`.
    pub fn match_face_tag(&self, source: &Brep, face_tag: &str, target: &Brep) -> Option<String> {
        let face = source.face_by_tag(face_tag)?;
        let offset = self.brep_offset(source, target)?;
        let found = self.match_face(source, face, target, &offset)?;
        target.face(found).map(|f| f.tag.clone())
    }

    /// Target face matching `face`: the face with the same tag if there is
    /// one, otherwise the first face geometrically equal to `face` moved by
    /// `offset`.
    pub fn match_face(
        &self,
        source: &Brep,
        face: FaceKey,
        target: &Brep,
        offset: &Isometry3<f64>,
    ) -> Option<FaceKey> {
        match self.try_match_face(source, face, target, offset) {
            Ok(found) => Some(found),
            Err(err) => {
                warn!(%err, "cannot match face");
                None
            }
        }
    }

    fn try_match_face(
        &self,
        source: &Brep,
        face: FaceKey,
        target: &Brep,
        offset: &Isometry3<f64>,
    ) -> Result<FaceKey> {
        let data = source.face(face).ok_or(Error::FaceNotFound(face))?;
        if let Some(same_tag) = target.face_by_tag(&data.tag) {
            return Ok(same_tag);
        }
        target
            .faces()
            .map(|(k, _)| k)
            .find(|&candidate| self.judge_same_face(source, face, target, candidate, offset))
            .ok_or_else(|| Error::NoGeometricMatch(format!("face '{}'", data.tag)))
    }

    /// Returns `true` if `a` moved by `offset` coincides with `b`: same
    /// vertex count, every vertex present on `b`, and normals agreeing
    /// within the normal tolerance.
    pub fn judge_same_face(
        &self,
        source: &Brep,
        a: FaceKey,
        target: &Brep,
        b: FaceKey,
        offset: &Isometry3<f64>,
    ) -> bool {
        let (Some(pa), Some(pb)) = (source.face_vertex_points(a), target.face_vertex_points(b)) else {
            return false;
        };
        if pa.len() != pb.len() || !pa.iter().all(|p| self.point_in_points(&(offset * p), &pb)) {
            return false;
        }
        match (source.face_normal(a), target.face_normal(b)) {
            (Some(na), Some(nb)) => {
                let na = offset.rotation * na;
                na.dot(&nb) >= 1.0 - self.tolerance.normal_tol
            }
            _ => false,
        }
    }

    /// Returns `true` if some point of `points` equals `p` within tolerance.
    pub fn point_in_points(&self, p: &Point3<f64>, points: &[Point3<f64>]) -> bool {
        points.iter().any(|q| self.tolerance.points_equal_3d(p, q))
    }

    /// Lines compare by their endpoints in either order. Arcs compare by
    /// their sampled points.
    fn same_curve(&self, a: &Curve3d, b: &Curve3d) -> bool {
        match (a, b) {
            (Curve3d::Line(_), Curve3d::Line(_)) => {
                let eq = |p: &Point3<f64>, q: &Point3<f64>| self.tolerance.points_equal_3d(p, q);
                let (a0, a1) = (a.start_point(), a.end_point());
                let (b0, b1) = (b.start_point(), b.end_point());
                (eq(&a0, &b0) && eq(&a1, &b1)) || (eq(&a0, &b1) && eq(&a1, &b0))
            }
            (Curve3d::Arc(_), Curve3d::Arc(_)) => {
                let n = self.tolerance.arc_samples.max(2);
                let theirs = b.sample_points(n);
                a.sample_points(n).iter().all(|p| self.point_in_points(p, &theirs))
            }
            _ => false,
        }
    }
}
