// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sweep-path assembly.
//!
//! A sweep path is stored as a list of coedge tags, optionally scoped to a
//! face. [`PathAssembler`] resolves those tags across one or more Breps,
//! orders and orients the coedges into a continuous chain, turns the chain
//! into curves and derives a local frame at its start for placing the
//! swept profile.
//!
//! The public entry points never fail: lookup failures and malformed input
//! are logged and produce an empty path (or `None`). The `try_*` variants
//! return the typed error instead.

use brepkit_geometry::{Curve3d, Frame, Plane, Point3, Surface, ToleranceConfig};
use tracing::{debug, warn};

use crate::arena::{Brep, FaceData};
use crate::error::{Error, Result};
use crate::keys::*;
use crate::lookup::{tag_suffix, TagLookup, TAG_DELIMITER};

/// Resolved sweep path: curves forming a continuous chain.
///
/// `tags[i]` is the tag of the coedge `curves[i]` was built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepPath {
    pub curves: Vec<Curve3d>,
    pub tags: Vec<String>,
}

impl SweepPath {
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Start of the first curve.
    pub fn start_point(&self) -> Option<Point3<f64>> {
        self.curves.first().map(|c| c.start_point())
    }

    pub fn end_point(&self) -> Option<Point3<f64>> {
        self.curves.last().map(|c| c.end_point())
    }

    /// Returns `true` if every curve ends where the next one starts.
    pub fn is_continuous(&self, tol: f64) -> bool {
        self.curves
            .windows(2)
            .all(|w| (w[0].end_point() - w[1].start_point()).norm() <= tol)
    }

    fn push(&mut self, curve: Curve3d, tag: String) {
        self.curves.push(curve);
        self.tags.push(tag);
    }
}

/// Everything needed to sweep a profile along a stored path.
#[derive(Debug, Clone)]
pub struct SweepInfo {
    pub coedges: Vec<CoedgeRef>,
    pub path: SweepPath,
    pub start_point: Point3<f64>,
    pub frame: Option<Frame>,
}

/// Resolves stored coedge/face tags into ordered sweep paths.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathAssembler {
    tolerance: ToleranceConfig,
}

impl PathAssembler {
    pub fn new(tolerance: ToleranceConfig) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> &ToleranceConfig {
        &self.tolerance
    }

    /// Resolves a stored path to ordered, oriented coedges.
    ///
    /// With a face tag, the path is the last wire of that face containing one
    /// of `coedge_tags` (or its first wire when no coedge tags are given).
    /// When several Breps hold the face tag the last one is used.
    /// Otherwise each coedge tag is looked up across `breps`, stopping at the
    /// first one that does not resolve. Returns an empty list on failure.
    pub fn resolve_path<S: AsRef<str>>(
        &self,
        coedge_tags: &[S],
        breps: &[Brep],
        face_tag: Option<&str>,
    ) -> Vec<CoedgeRef> {
        match self.try_resolve_path(coedge_tags, breps, face_tag) {
            Ok(coedges) => coedges,
            Err(err) => {
                warn!(%err, face_tag, tags = coedge_tags.len(), "cannot resolve sweep path");
                Vec::new()
            }
        }
    }

    pub fn try_resolve_path<S: AsRef<str>>(
        &self,
        coedge_tags: &[S],
        breps: &[Brep],
        face_tag: Option<&str>,
    ) -> Result<Vec<CoedgeRef>> {
        let coedges = match face_tag.filter(|t| !t.is_empty()) {
            Some(face_tag) => self.coedges_by_face(coedge_tags, breps, face_tag)?,
            None if coedge_tags.is_empty() => {
                return Err(Error::Underconstrained(
                    "neither a face tag nor coedge tags were given".into(),
                ));
            }
            None => self.coedges_by_tags(coedge_tags, breps)?,
        };
        self.reorder(coedges, breps)
    }

    fn coedges_by_face<S: AsRef<str>>(
        &self,
        coedge_tags: &[S],
        breps: &[Brep],
        face_tag: &str,
    ) -> Result<Vec<CoedgeRef>> {
        let lookup = TagLookup::new(breps);
        let found = match lookup.last_exact_face(face_tag) {
            Some(found) => found,
            None => lookup.face(face_tag)?,
        };
        let brep = &breps[found.brep];
        let wires = brep
            .face_wires(found.face)
            .ok_or(Error::FaceNotFound(found.face))?;

        let refs = |wire: WireKey| -> Vec<CoedgeRef> {
            brep.wire_coedges(wire)
                .unwrap_or_default()
                .iter()
                .map(|&ck| CoedgeRef::new(found.brep, ck))
                .collect()
        };

        let Some(first_tag) = coedge_tags.first() else {
            return wires
                .first()
                .map(|&w| refs(w))
                .ok_or_else(|| Error::NotFound(format!("face '{}' has no wires", face_tag)));
        };

        let exact = wire_with_tag(brep, wires, |t| coedge_tags.iter().any(|q| q.as_ref() == t));
        if let Some(wire) = exact {
            return Ok(refs(wire));
        }

        let first_tag = first_tag.as_ref();
        if first_tag.contains(TAG_DELIMITER) {
            let suffix = tag_suffix(first_tag);
            if let Some(wire) = wire_with_tag(brep, wires, |t| tag_suffix(t) == suffix) {
                debug!(tag = first_tag, face_tag, "sweep wire resolved by tag suffix");
                return Ok(refs(wire));
            }
        }

        Err(Error::NotFound(format!(
            "no wire of face '{}' carries coedge '{}'",
            face_tag, first_tag
        )))
    }

    fn coedges_by_tags<S: AsRef<str>>(&self, coedge_tags: &[S], breps: &[Brep]) -> Result<Vec<CoedgeRef>> {
        let lookup = TagLookup::new(breps);
        let mut coedges = Vec::with_capacity(coedge_tags.len());
        for tag in coedge_tags {
            match lookup.coedge(tag.as_ref()) {
                Ok(found) => coedges.push(found),
                Err(err) => {
                    if coedges.is_empty() {
                        return Err(err);
                    }
                    debug!(tag = tag.as_ref(), resolved = coedges.len(), "sweep path cut short");
                    break;
                }
            }
        }
        Ok(coedges)
    }

    /// Orders coedges into a chain.
    ///
    /// Coedges all on one face that disagrees with its surface are
    /// reversed; coedges that all lack a face count as such. Then, unless
    /// the path is closed, the last coedge is moved to the front while it
    /// touches the first, at most once per coedge.
    pub fn reorder(&self, mut coedges: Vec<CoedgeRef>, breps: &[Brep]) -> Result<Vec<CoedgeRef>> {
        if self.runs_against_face(&coedges, breps) {
            coedges.reverse();
        }

        let bound = coedges.len();
        for _ in 0..bound {
            if self.is_chained(&coedges, breps)? {
                return Ok(coedges);
            }
            coedges.rotate_right(1);
        }
        if self.is_chained(&coedges, breps)? {
            return Ok(coedges);
        }

        Err(Error::NoGeometricMatch(format!(
            "path ends still touch after {} rotations",
            bound
        )))
    }

    /// Closed, trivially short, or with first and last coedges apart.
    fn is_chained(&self, coedges: &[CoedgeRef], breps: &[Brep]) -> Result<bool> {
        if coedges.len() <= 1 || self.is_closed(coedges, breps)? {
            return Ok(true);
        }
        let first = coedges[0];
        let last = coedges[coedges.len() - 1];
        Ok(!self.share_endpoint(breps, first, last)?)
    }

    fn runs_against_face(&self, coedges: &[CoedgeRef], breps: &[Brep]) -> bool {
        let Some(&first) = coedges.first() else {
            return false;
        };
        let face_of = |c: &CoedgeRef| breps.get(c.brep).and_then(|b| b.coedge_face(c.coedge));
        let face = face_of(&first);
        let shared = coedges
            .iter()
            .all(|c| face_of(c) == face && (face.is_none() || c.brep == first.brep));
        shared && !face_agrees(breps, first)
    }

    /// A path is closed if it is a single closed arc or every consecutive
    /// pair of coedges (wrapping around) shares an endpoint.
    pub fn is_closed(&self, coedges: &[CoedgeRef], breps: &[Brep]) -> Result<bool> {
        match coedges {
            [] => Ok(true),
            [single] => Ok(curve_of(breps, *single)?.as_arc().is_some_and(|a| a.is_closed())),
            _ => {
                for (i, &curr) in coedges.iter().enumerate() {
                    let next = coedges[(i + 1) % coedges.len()];
                    if !self.share_endpoint(breps, curr, next)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    fn share_endpoint(&self, breps: &[Brep], a: CoedgeRef, b: CoedgeRef) -> Result<bool> {
        let (a0, a1) = endpoints_of(breps, a)?;
        let (b0, b1) = endpoints_of(breps, b)?;
        let eq = |p: &Point3<f64>, q: &Point3<f64>| self.tolerance.points_equal_3d(p, q);
        Ok(eq(&a0, &b0) || eq(&a0, &b1) || eq(&a1, &b0) || eq(&a1, &b1))
    }

    /// Builds the curve chain for ordered coedges.
    ///
    /// A single coedge keeps its curve, reversed when its face disagrees
    /// with its surface. Longer paths start from the first coedge's curve
    /// (reversed if it starts on the second coedge) and reverse each
    /// following curve whose end meets the running end.
    pub fn to_curves(&self, coedges: &[CoedgeRef], breps: &[Brep]) -> SweepPath {
        match self.try_to_curves(coedges, breps) {
            Ok(path) => path,
            Err(err) => {
                warn!(%err, coedges = coedges.len(), "cannot build sweep curves");
                SweepPath::default()
            }
        }
    }

    pub fn try_to_curves(&self, coedges: &[CoedgeRef], breps: &[Brep]) -> Result<SweepPath> {
        let mut path = SweepPath::default();
        let eq = |p: &Point3<f64>, q: &Point3<f64>| self.tolerance.points_equal_3d(p, q);

        match coedges {
            [] => Err(Error::Underconstrained("no coedges to build a sweep path from".into())),
            [single] => {
                let mut curve = curve_of(breps, *single)?;
                if !face_agrees(breps, *single) {
                    curve.reverse();
                }
                path.push(curve, tag_of(breps, *single)?);
                Ok(path)
            }
            [first, second, ..] => {
                let mut current = curve_of(breps, *first)?;
                let next = curve_of(breps, *second)?;
                let start = current.start_point();
                if eq(&start, &next.start_point()) || eq(&start, &next.end_point()) {
                    current.reverse();
                }
                path.push(current, tag_of(breps, *first)?);

                for &coedge in &coedges[1..] {
                    let mut curve = curve_of(breps, coedge)?;
                    if eq(&current.end_point(), &curve.end_point()) {
                        curve.reverse();
                    }
                    path.push(curve, tag_of(breps, coedge)?);
                    current = curve;
                }
                Ok(path)
            }
        }
    }

    /// Local frame for placing a profile at `origin`.
    ///
    /// The normal comes from `base_face`'s surface, or from a plane through
    /// the curve start points. X is `normal × tangent` with the tangent
    /// taken at the start of the first curve.
    pub fn local_frame(
        &self,
        path: &SweepPath,
        origin: &Point3<f64>,
        base_face: Option<&FaceData>,
    ) -> Option<Frame> {
        let first = path.curves.first()?;
        let surface = match base_face {
            Some(face) => face.surface,
            None => {
                let starts: Vec<Point3<f64>> = path.curves.iter().map(|c| c.start_point()).collect();
                Surface::Plane(Plane::from_points(&starts).ok()?)
            }
        };
        let normal = surface.normal_at(&surface.uv_at(origin));
        let x_axis = normal.cross(&first.start_tangent());
        Frame::new(*origin, x_axis, normal)
    }

    /// Sweep path trimmed to run from `start` to `end`.
    ///
    /// Leading curves not containing `start` are dropped and the first one
    /// containing it is clipped to begin there. The first later curve
    /// containing `end` is clipped to end there and closes the path.
    pub fn sweep_path<S: AsRef<str>>(
        &self,
        coedge_tags: &[S],
        breps: &[Brep],
        face_tag: Option<&str>,
        start: Option<&Point3<f64>>,
        end: Option<&Point3<f64>>,
    ) -> SweepPath {
        let coedges = self.resolve_path(coedge_tags, breps, face_tag);
        if coedges.is_empty() {
            return SweepPath::default();
        }
        let full = self.to_curves(&coedges, breps);
        let tol = self.tolerance.tol;

        let mut trimmed = SweepPath::default();
        for (curve, tag) in full.curves.into_iter().zip(full.tags) {
            if trimmed.is_empty() {
                match start {
                    Some(p) if curve.contains_point(p, tol) => {
                        let mut clipped = curve;
                        clipped.set_range(curve.param_at(p), curve.end_param());
                        trimmed.push(clipped, tag);
                    }
                    Some(_) => {}
                    None => trimmed.push(curve, tag),
                }
                continue;
            }
            if let Some(p) = end.filter(|p| curve.contains_point(p, tol)) {
                let mut clipped = curve;
                clipped.set_range(curve.start_param(), curve.param_at(p));
                trimmed.push(clipped, tag);
                break;
            }
            trimmed.push(curve, tag);
        }
        trimmed
    }

    /// Returns `true` if the resolved path runs against its stored direction.
    pub fn is_path_reversed<S: AsRef<str>>(
        &self,
        coedge_tags: &[S],
        breps: &[Brep],
        face_tag: Option<&str>,
    ) -> bool {
        let coedges = self.resolve_path(coedge_tags, breps, face_tag);
        match coedges.as_slice() {
            [] => false,
            [single] => !face_agrees(breps, *single),
            [first, second, ..] => {
                let (Ok(a), Ok(b)) = (curve_of(breps, *first), curve_of(breps, *second)) else {
                    return false;
                };
                let start = a.start_point();
                self.tolerance.points_equal_3d(&start, &b.start_point())
                    || self.tolerance.points_equal_3d(&start, &b.end_point())
            }
        }
    }

    /// Frame at the start of the resolved path, using the first coedge's face.
    pub fn local_frame_for<S: AsRef<str>>(
        &self,
        coedge_tags: &[S],
        breps: &[Brep],
        face_tag: Option<&str>,
    ) -> Option<Frame> {
        self.sweep_info(coedge_tags, breps, face_tag)?.frame
    }

    /// Coedges, curves, start point and frame of a stored path in one call.
    pub fn sweep_info<S: AsRef<str>>(
        &self,
        coedge_tags: &[S],
        breps: &[Brep],
        face_tag: Option<&str>,
    ) -> Option<SweepInfo> {
        let coedges = self.resolve_path(coedge_tags, breps, face_tag);
        let first = *coedges.first()?;
        let path = self.to_curves(&coedges, breps);
        let start_point = path.start_point()?;
        let base_face = breps[first.brep]
            .coedge_face(first.coedge)
            .and_then(|f| breps[first.brep].face(f));
        let frame = self.local_frame(&path, &start_point, base_face);
        Some(SweepInfo {
            coedges,
            path,
            start_point,
            frame,
        })
    }
}

/// Last wire holding a coedge whose tag satisfies `pred`.
fn wire_with_tag(brep: &Brep, wires: &[WireKey], pred: impl Fn(&str) -> bool) -> Option<WireKey> {
    wires.iter().rev().copied().find(|&w| {
        brep.wire_coedges(w)
            .unwrap_or_default()
            .iter()
            .any(|&ck| brep.coedge_tag(ck).is_some_and(&pred))
    })
}

fn brep_of(breps: &[Brep], c: CoedgeRef) -> Result<&Brep> {
    breps.get(c.brep).ok_or(Error::CoedgeNotFound(c.coedge))
}

fn curve_of(breps: &[Brep], c: CoedgeRef) -> Result<Curve3d> {
    brep_of(breps, c)?
        .coedge_curve(c.coedge)
        .ok_or(Error::CoedgeNotFound(c.coedge))
}

fn tag_of(breps: &[Brep], c: CoedgeRef) -> Result<String> {
    brep_of(breps, c)?
        .coedge_tag(c.coedge)
        .map(str::to_string)
        .ok_or(Error::CoedgeNotFound(c.coedge))
}

fn endpoints_of(breps: &[Brep], c: CoedgeRef) -> Result<(Point3<f64>, Point3<f64>)> {
    let brep = brep_of(breps, c)?;
    match (brep.coedge_start_point(c.coedge), brep.coedge_end_point(c.coedge)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(Error::CoedgeNotFound(c.coedge)),
    }
}

/// A coedge without a face runs against its (absent) surface.
fn face_agrees(breps: &[Brep], c: CoedgeRef) -> bool {
    let Some(brep) = breps.get(c.brep) else {
        return false;
    };
    brep.coedge_face(c.coedge)
        .and_then(|f| brep.face(f))
        .is_some_and(|f| f.same_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use brepkit_geometry::{Arc3d, Vector3};

    const TOL_TEST: f64 = 1e-9;

    /// Coedges A(p0→p1), B(p2→p1), C(p2→p3), each in its own wire. With
    /// `face`, the wires bound a face tagged `z` that agrees with its plane.
    fn zigzag_with(face: bool) -> (Brep, [Point3<f64>; 4]) {
        let p = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let mut brep = Brep::new();
        let v: Vec<_> = p.iter().map(|&q| brep.add_vertex(q)).collect();
        let a = brep.add_line_edge(v[0], v[1]).unwrap();
        let b = brep.add_line_edge(v[2], v[1]).unwrap();
        let c = brep.add_line_edge(v[2], v[3]).unwrap();
        let wa = brep.add_wire(&[(a, "z|a")]).unwrap();
        let wb = brep.add_wire(&[(b, "z|b")]).unwrap();
        let wc = brep.add_wire(&[(c, "z|c")]).unwrap();
        if face {
            let plane = Plane::from_origin_normal(Point3::origin(), Vector3::z()).unwrap();
            brep.add_face(wa, &[wb, wc], Surface::Plane(plane), true, "z")
                .unwrap();
        }
        (brep, p)
    }

    fn zigzag() -> (Brep, [Point3<f64>; 4]) {
        zigzag_with(true)
    }

    fn square(same_dir: bool) -> Brep {
        let mut brep = Brep::new();
        let face = brep
            .add_planar_face(
                &[
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(2.0, 0.0, 0.0),
                    Point3::new(2.0, 2.0, 0.0),
                    Point3::new(0.0, 2.0, 0.0),
                ],
                "sq",
                &["sq|0", "sq|1", "sq|2", "sq|3"],
            )
            .unwrap();
        brep.faces[face].same_dir = same_dir;
        brep
    }

    #[test]
    fn to_curves_reverses_backwards_middle_coedge() {
        let (brep, p) = zigzag();
        let breps = [brep];
        let asm = PathAssembler::default();
        let coedges = asm.resolve_path(&["z|a", "z|b", "z|c"], &breps, None);
        assert_eq!(coedges.len(), 3);

        let path = asm.to_curves(&coedges, &breps);
        assert_eq!(path.tags, vec!["z|a", "z|b", "z|c"]);
        assert_eq!(path.curves[0].start_point(), p[0]);
        assert_eq!(path.curves[1].start_point(), p[1]);
        assert_eq!(path.curves[1].end_point(), p[2]);
        assert_eq!(path.curves[2].end_point(), p[3]);
        assert!(path.is_continuous(TOL_TEST));
    }

    #[test]
    fn first_curve_reversed_when_it_starts_on_second() {
        let (brep, p) = zigzag();
        let breps = [brep];
        let asm = PathAssembler::default();
        // B then A: B runs p2→p1 and A starts at p0, so B stays; A must flip
        let coedges = asm.resolve_path(&["z|b", "z|a"], &breps, None);
        let path = asm.to_curves(&coedges, &breps);
        assert_eq!(path.curves[0].start_point(), p[2]);
        assert_eq!(path.curves[1].end_point(), p[0]);
        assert!(path.is_continuous(TOL_TEST));
    }

    #[test]
    fn tag_path_stops_at_first_unresolved() {
        let (brep, _) = zigzag();
        let breps = [brep];
        let asm = PathAssembler::default();
        let coedges = asm.resolve_path(&["z|a", "missing", "z|c"], &breps, None);
        assert_eq!(coedges.len(), 1);
    }

    #[test]
    fn empty_request_is_underconstrained() {
        let breps = [square(true)];
        let asm = PathAssembler::default();
        let none: [&str; 0] = [];
        assert!(asm.resolve_path(&none, &breps, None).is_empty());
        assert!(matches!(
            asm.try_resolve_path(&none, &breps, None),
            Err(Error::Underconstrained(_))
        ));
        assert!(asm.to_curves(&[], &breps).is_empty());
    }

    #[test]
    fn face_path_without_coedge_tags_uses_first_wire() {
        let breps = [square(true)];
        let asm = PathAssembler::default();
        let none: [&str; 0] = [];
        let coedges = asm.resolve_path(&none, &breps, Some("sq"));
        assert_eq!(coedges.len(), 4);
        let path = asm.to_curves(&coedges, &breps);
        assert_eq!(path.tags, vec!["sq|0", "sq|1", "sq|2", "sq|3"]);
        assert!(path.is_continuous(TOL_TEST));
        assert_relative_eq!(path.end_point().unwrap(), path.start_point().unwrap());
    }

    #[test]
    fn face_path_falls_back_to_tag_suffix() {
        let breps = [square(true)];
        let asm = PathAssembler::default();
        let coedges = asm.resolve_path(&["renamed|2"], &breps, Some("sq"));
        assert_eq!(coedges.len(), 4);
        assert!(asm.resolve_path(&["nodelimiter"], &breps, Some("sq")).is_empty());
        assert!(asm.resolve_path(&["sq|0"], &breps, Some("nope")).is_empty());
    }

    #[test]
    fn face_against_surface_reverses_order() {
        let breps = [square(false)];
        let asm = PathAssembler::default();
        let coedges = asm.resolve_path(&["sq|0", "sq|1", "sq|2", "sq|3"], &breps, None);
        let tags: Vec<_> = coedges
            .iter()
            .map(|c| breps[0].coedge_tag(c.coedge).unwrap())
            .collect();
        assert_eq!(tags, vec!["sq|3", "sq|2", "sq|1", "sq|0"]);
    }

    #[test]
    fn open_path_with_touching_ends_is_rotated() {
        let breps = [square(true)];
        let asm = PathAssembler::default();
        let coedges = asm.resolve_path(&["sq|1", "sq|0"], &breps, None);
        let tags: Vec<_> = coedges
            .iter()
            .map(|c| breps[0].coedge_tag(c.coedge).unwrap())
            .collect();
        // Two coedges touching at one end already count as closed
        assert_eq!(tags, vec!["sq|1", "sq|0"]);

        let coedges = asm.resolve_path(&["sq|0", "sq|2", "sq|1"], &breps, None);
        let path = asm.to_curves(&coedges, &breps);
        assert!(path.is_continuous(TOL_TEST), "tags {:?}", path.tags);
        assert_eq!(path.tags, vec!["sq|2", "sq|1", "sq|0"]);
    }

    #[test]
    fn face_path_takes_last_matching_wire() {
        let (brep, _) = zigzag();
        let breps = [brep];
        let asm = PathAssembler::default();
        let coedges = asm.resolve_path(&["z|a", "z|c"], &breps, Some("z"));
        assert_eq!(coedges.len(), 1);
        assert_eq!(breps[0].coedge_tag(coedges[0].coedge), Some("z|c"));
    }

    #[test]
    fn face_path_takes_last_brep_with_face_tag() {
        let breps = [
            square(true),
            square(true).translated(&Vector3::new(0.0, 0.0, 5.0)),
        ];
        let asm = PathAssembler::default();
        let none: [&str; 0] = [];

        let coedges = asm.resolve_path(&none, &breps, Some("sq"));
        assert_eq!(coedges.len(), 4);
        assert!(coedges.iter().all(|c| c.brep == 1));

        let coedges = asm.resolve_path(&["sq|0"], &breps, Some("sq"));
        assert!(coedges.iter().all(|c| c.brep == 1));
        let path = asm.to_curves(&coedges, &breps);
        assert_eq!(path.start_point().unwrap().z, 5.0);
    }

    #[test]
    fn rotation_may_take_all_but_one_step() {
        let breps = [square(true)];
        let asm = PathAssembler::default();
        // sq|3 touches sq|0 and sq|0 touches sq|1, but sq|1 misses sq|3
        let coedges = asm.resolve_path(&["sq|3", "sq|1", "sq|0"], &breps, None);
        let tags: Vec<_> = coedges
            .iter()
            .map(|c| breps[0].coedge_tag(c.coedge).unwrap())
            .collect();
        assert_eq!(tags, vec!["sq|1", "sq|0", "sq|3"]);
    }

    #[test]
    fn faceless_coedges_are_reversed() {
        let (brep, p) = zigzag_with(false);
        let breps = [brep];
        let asm = PathAssembler::default();

        let coedges = asm.resolve_path(&["z|a", "z|b", "z|c"], &breps, None);
        let path = asm.to_curves(&coedges, &breps);
        assert_eq!(path.tags, vec!["z|c", "z|b", "z|a"]);
        assert_eq!(path.start_point(), Some(p[3]));
        assert_eq!(path.end_point(), Some(p[0]));
        assert!(path.is_continuous(TOL_TEST));
        assert!(asm.is_path_reversed(&["z|a", "z|b", "z|c"], &breps, None));

        // A lone faceless coedge runs backwards
        let single = asm.sweep_path(&["z|a"], &breps, None, None, None);
        assert_eq!(single.start_point(), Some(p[1]));
        assert_eq!(single.end_point(), Some(p[0]));
        assert!(asm.is_path_reversed(&["z|a"], &breps, None));
    }

    #[test]
    fn single_coedge_on_reversed_face_is_reversed() {
        let breps = [square(false)];
        let asm = PathAssembler::default();
        let coedges = asm.resolve_path(&["sq|0"], &breps, None);
        let raw = breps[0].coedge_curve(coedges[0].coedge).unwrap();
        let path = asm.to_curves(&coedges, &breps);
        assert_eq!(path.curves[0], raw.reversed());
        assert!(asm.is_path_reversed(&["sq|0"], &breps, None));
        assert!(!asm.is_path_reversed(&["sq|0"], &[square(true)], None));
    }

    #[test]
    fn closed_circle_is_closed() {
        let mut brep = Brep::new();
        let circle = Curve3d::Arc(Arc3d::circle(Point3::origin(), Vector3::z(), 1.0).unwrap());
        let v = brep.add_vertex(circle.start_point());
        let e = brep.add_edge(v, v, circle).unwrap();
        brep.add_wire(&[(e, "ring")]).unwrap();
        let breps = [brep];
        let asm = PathAssembler::default();
        let coedges = asm.resolve_path(&["ring"], &breps, None);
        assert!(asm.is_closed(&coedges, &breps).unwrap());
    }

    #[test]
    fn local_frame_on_face() {
        let breps = [square(true)];
        let asm = PathAssembler::default();
        let info = asm.sweep_info(&["sq|0"], &breps, None).unwrap();
        assert_eq!(info.start_point, Point3::new(0.0, 0.0, 0.0));
        let frame = info.frame.unwrap();
        // Tangent +X on a +Z face gives X axis +Y
        assert_relative_eq!(frame.z_axis.into_inner(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(frame.x_axis.into_inner(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn local_frame_from_best_fit_plane() {
        let (brep, _) = zigzag();
        let breps = [brep];
        let asm = PathAssembler::default();
        let path = asm.sweep_path(&["z|a", "z|b", "z|c"], &breps, None, None, None);
        let origin = path.start_point().unwrap();
        let frame = asm.local_frame(&path, &origin, None).unwrap();
        assert_relative_eq!(frame.z_axis.into_inner().z.abs(), 1.0, epsilon = 1e-12);

        assert!(asm.local_frame(&SweepPath::default(), &origin, None).is_none());
    }

    #[test]
    fn sweep_path_trims_to_start_and_end() {
        let (brep, _) = zigzag();
        let breps = [brep];
        let asm = PathAssembler::default();
        let start = Point3::new(0.5, 0.0, 0.0);
        let end = Point3::new(1.5, 1.0, 0.0);
        let path = asm.sweep_path(&["z|a", "z|b", "z|c"], &breps, None, Some(&start), Some(&end));

        assert_eq!(path.len(), 3);
        assert_relative_eq!(path.start_point().unwrap(), start, epsilon = 1e-12);
        assert_relative_eq!(path.end_point().unwrap(), end, epsilon = 1e-12);
        assert!(path.is_continuous(1e-9));

        // A start point off the path drops every curve
        let off = Point3::new(5.0, 5.0, 5.0);
        assert!(asm
            .sweep_path(&["z|a", "z|b", "z|c"], &breps, None, Some(&off), None)
            .is_empty());
    }
}
