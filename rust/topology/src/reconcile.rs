// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconciliation of near-coincident points in a 2D edge set.
//!
//! Floating-point noise can leave points that are meant to be identical a
//! few ulps apart, which breaks downstream extrusion and boolean steps.
//! [`EdgeReconciler::fix`] snaps such points together in three passes over
//! the start/end points of every edge:
//!
//! 1. X pass: points whose x differs from the previous point (sorted by x)
//!    by at most `fix_tol` take the previous x.
//! 2. Y pass: the same along y.
//! 3. Line pass: a line endpoint lying within `tol` of another line (but
//!    not on it) is moved onto that line. The move is an orthogonal
//!    projection, except for a point whose x (or y) exactly equals that of
//!    some other point: it slides along the free axis instead, so the line
//!    pass never undoes an axis snap. A point aligned on both axes stays.
//!
//! Every record sharing the moved point is moved with it and the owning
//! curves are rebuilt, so no curve keeps a stale endpoint. Arcs never take
//! part in the axis passes. The passes repeat until a round changes
//! nothing, which makes a second call a no-op.

use brepkit_geometry::{Curve2d, Line2d, Point2, ToleranceConfig};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::Result;

/// Distances at or below this count as "already on the line".
const ON_LINE_EPS: f64 = 1e-12;

/// Default cap on snapping rounds per call.
pub const DEFAULT_MAX_ROUNDS: usize = 8;

/// A 2D edge: the unit of reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge2d {
    pub curve: Curve2d,
}

impl Edge2d {
    pub fn new(curve: Curve2d) -> Self {
        Self { curve }
    }

    pub fn line(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self::new(Curve2d::line(start, end))
    }
}

impl From<Curve2d> for Edge2d {
    fn from(curve: Curve2d) -> Self {
        Self::new(curve)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurveKind {
    Line,
    Arc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Start,
    End,
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, p: &Point2<f64>) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }

    fn with(self, p: &Point2<f64>, value: f64) -> Point2<f64> {
        match self {
            Axis::X => Point2::new(value, p.y),
            Axis::Y => Point2::new(p.x, value),
        }
    }

    fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Point of `line` with the same `fixed` coordinate as `p`. `None` when the
/// line runs along the other axis.
fn slide_onto(line: &Line2d, fixed: Axis, p: &Point2<f64>) -> Option<Point2<f64>> {
    let free = fixed.other();
    let run = fixed.of(&line.end) - fixed.of(&line.start);
    if run.abs() <= ON_LINE_EPS {
        return None;
    }
    let slope = (free.of(&line.end) - free.of(&line.start)) / run;
    let value = free.of(&line.start) + (fixed.of(p) - fixed.of(&line.start)) * slope;
    Some(free.with(p, value))
}

/// One start or end point of an edge.
#[derive(Debug, Clone, Copy)]
struct PointRecord {
    kind: CurveKind,
    end: End,
    point: Point2<f64>,
    edge: usize,
}

fn collect_records(edges: &[Edge2d]) -> Vec<PointRecord> {
    let mut records = Vec::with_capacity(edges.len() * 2);
    for (i, e) in edges.iter().enumerate() {
        let kind = if e.curve.is_line() {
            CurveKind::Line
        } else {
            CurveKind::Arc
        };
        records.push(PointRecord {
            kind,
            end: End::Start,
            point: e.curve.start_point(),
            edge: i,
        });
        records.push(PointRecord {
            kind,
            end: End::End,
            point: e.curve.end_point(),
            edge: i,
        });
    }
    records
}

/// Snaps near-coincident points of a 2D edge set together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeReconciler {
    tolerance: ToleranceConfig,
    max_rounds: usize,
}

impl Default for EdgeReconciler {
    fn default() -> Self {
        Self::new(ToleranceConfig::default())
    }
}

impl EdgeReconciler {
    pub fn new(tolerance: ToleranceConfig) -> Self {
        Self {
            tolerance,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Caps the number of snapping rounds (at least one).
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds.max(1);
        self
    }

    pub fn tolerance(&self) -> &ToleranceConfig {
        &self.tolerance
    }

    /// Reconciles `edges` in place.
    ///
    /// Rounds repeat until one moves nothing, so calling `fix` again on the
    /// result is a no-op. Fewer than two edges is a no-op. The returned
    /// count of moved points is for diagnostics only.
    pub fn fix(&self, edges: &mut [Edge2d]) -> usize {
        if edges.len() < 2 {
            return 0;
        }

        let mut total = 0;
        for round in 0..self.max_rounds {
            let moved = self.run_round(edges);
            debug!(round, moved, "edge reconciliation round");
            total += moved;
            if moved == 0 {
                return total;
            }
        }

        warn!(
            rounds = self.max_rounds,
            edges = edges.len(),
            "edge reconciliation did not settle"
        );
        total
    }

    fn run_round(&self, edges: &mut [Edge2d]) -> usize {
        let mut records = collect_records(edges);
        let mut moved = self.snap_axis(edges, &mut records, Axis::X);
        moved += self.snap_axis(edges, &mut records, Axis::Y);
        moved += self.snap_to_lines(edges, &mut records);
        moved
    }

    fn snap_axis(&self, edges: &mut [Edge2d], records: &mut [PointRecord], axis: Axis) -> usize {
        records.sort_by(|a, b| axis.of(&a.point).total_cmp(&axis.of(&b.point)));

        let mut moved = 0;
        for i in 1..records.len() {
            let prev = records[i - 1].point;
            let curr = records[i].point;
            let delta = (axis.of(&curr) - axis.of(&prev)).abs();
            if delta == 0.0 || delta > self.tolerance.fix_tol {
                continue;
            }

            let target = axis.with(&curr, axis.of(&prev));
            moved += self.move_group(edges, records, curr, target, false).len();
        }
        moved
    }

    fn snap_to_lines(&self, edges: &mut [Edge2d], records: &mut [PointRecord]) -> usize {
        let mut processed: FxHashSet<usize> = FxHashSet::default();
        let mut last: Option<Point2<f64>> = None;
        let mut moved = 0;

        for i in 0..records.len() {
            let record = records[i];
            if record.kind != CurveKind::Line || processed.contains(&i) {
                continue;
            }
            if last == Some(record.point) {
                continue;
            }
            processed.insert(i);

            let Some(target) = self.line_projection(edges, records, &record) else {
                last = Some(record.point);
                continue;
            };

            let group = self.move_group(edges, records, record.point, target, true);
            moved += group.len();
            processed.extend(group);
            last = Some(records[i].point);
        }
        moved
    }

    /// Where a line endpoint lands on another line it nearly touches.
    /// When several lines qualify the last one wins.
    fn line_projection(
        &self,
        edges: &[Edge2d],
        records: &[PointRecord],
        record: &PointRecord,
    ) -> Option<Point2<f64>> {
        let Curve2d::Line(own) = edges[record.edge].curve else {
            return None;
        };
        let own_dir = own.direction()?;
        let tol = self.tolerance.tol;
        let p = record.point;

        let aligned = |axis: Axis| {
            records
                .iter()
                .any(|r| r.point != p && axis.of(&r.point) == axis.of(&p))
        };
        let fixed = match (aligned(Axis::X), aligned(Axis::Y)) {
            (true, true) => return None,
            (true, false) => Some(Axis::X),
            (false, true) => Some(Axis::Y),
            (false, false) => None,
        };

        let mut hit = None;
        for (j, edge) in edges.iter().enumerate() {
            if j == record.edge {
                continue;
            }
            let Curve2d::Line(line) = edge.curve else {
                continue;
            };
            if !line.bounding_box().expanded(tol).contains_point(&p) {
                continue;
            }
            let tangent = edge.curve.start_tangent();
            let cross = own_dir.x * tangent.y - own_dir.y * tangent.x;
            if cross.abs() <= self.tolerance.colinear_angle_tol {
                continue;
            }
            let Some(dist) = line.distance_to_line(&p) else {
                continue;
            };
            if dist <= ON_LINE_EPS || dist >= tol {
                continue;
            }
            let target = match fixed {
                Some(axis) => {
                    let free = axis.other();
                    slide_onto(&line, axis, &p)
                        .filter(|t| (free.of(t) - free.of(&p)).abs() <= self.tolerance.fix_tol)
                }
                None => line.project(&p),
            };
            if target.is_some() {
                hit = target;
            }
        }
        hit
    }

    /// Moves every record exactly at `from` to `to`, rebuilding the owning
    /// curves. Returns the moved record indices; empty if the group was
    /// skipped (an arc in an axis pass, or a curve that cannot be rebuilt).
    fn move_group(
        &self,
        edges: &mut [Edge2d],
        records: &mut [PointRecord],
        from: Point2<f64>,
        to: Point2<f64>,
        allow_arcs: bool,
    ) -> SmallVec<[usize; 4]> {
        let group: SmallVec<[usize; 4]> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.point == from)
            .map(|(i, _)| i)
            .collect();

        if !allow_arcs && group.iter().any(|&i| records[i].kind == CurveKind::Arc) {
            return SmallVec::new();
        }

        match rebuild_curves(edges, records, &group, to) {
            Ok(rebuilt) => {
                for (edge, curve) in rebuilt {
                    edges[edge].curve = curve;
                }
                for &i in &group {
                    records[i].point = to;
                }
                group
            }
            Err(err) => {
                warn!(?from, ?to, %err, "cannot rebuild curve for snapped point");
                SmallVec::new()
            }
        }
    }
}

/// New curves for every edge touched by `group`, endpoints moved to `to`.
fn rebuild_curves(
    edges: &[Edge2d],
    records: &[PointRecord],
    group: &[usize],
    to: Point2<f64>,
) -> Result<SmallVec<[(usize, Curve2d); 4]>> {
    let mut rebuilt: SmallVec<[(usize, Curve2d); 4]> = SmallVec::new();
    for &i in group {
        let record = &records[i];
        let slot = match rebuilt.iter().position(|(e, _)| *e == record.edge) {
            Some(slot) => slot,
            None => {
                rebuilt.push((record.edge, edges[record.edge].curve));
                rebuilt.len() - 1
            }
        };
        let curve = rebuilt[slot].1;
        let (start, end) = match record.end {
            End::Start => (to, curve.end_point()),
            End::End => (curve.start_point(), to),
        };
        rebuilt[slot].1 = curve.with_endpoints(start, end)?;
    }
    Ok(rebuilt)
}
