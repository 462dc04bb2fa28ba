// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sweep-path resolution, ordering and curve construction across Breps.

use approx::assert_relative_eq;
use brepkit_geometry::{Plane, Point3, Surface, Vector3, TOL};
use brepkit_topology::{Brep, Error, PathAssembler};

/// Three coedges on one face, each in its own wire:
/// A runs p0→p1, B is stored p2→p1 and C runs p2→p3.
fn zigzag_face() -> (Brep, [Point3<f64>; 4]) {
    let p = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(2.0, 3.0, 0.0),
        Point3::new(5.0, 3.0, 0.0),
    ];
    let mut brep = Brep::new();
    let v: Vec<_> = p.iter().map(|&q| brep.add_vertex(q)).collect();
    let a = brep.add_line_edge(v[0], v[1]).unwrap();
    let b = brep.add_line_edge(v[2], v[1]).unwrap();
    let c = brep.add_line_edge(v[2], v[3]).unwrap();
    let wa = brep.add_wire(&[(a, "path|A")]).unwrap();
    let wb = brep.add_wire(&[(b, "path|B")]).unwrap();
    let wc = brep.add_wire(&[(c, "path|C")]).unwrap();
    let plane = Plane::from_origin_normal(Point3::origin(), Vector3::z()).unwrap();
    brep.add_face(wa, &[wb, wc], Surface::Plane(plane), true, "path")
        .unwrap();
    (brep, p)
}

fn unit_box(prefix: &str, min: Point3<f64>) -> Brep {
    Brep::make_box(min, min + Vector3::new(1.0, 1.0, 1.0), prefix).unwrap()
}

#[test]
fn backwards_middle_coedge_is_reversed_in_chain() {
    let (brep, p) = zigzag_face();
    let breps = [brep];
    let asm = PathAssembler::default();

    let coedges = asm.resolve_path(&["path|A", "path|B", "path|C"], &breps, None);
    let path = asm.to_curves(&coedges, &breps);

    assert_eq!(path.tags, vec!["path|A", "path|B", "path|C"]);
    assert_eq!(path.curves[0].start_point(), p[0]);
    assert_eq!(path.curves[0].end_point(), p[1]);
    assert_eq!(path.curves[1].start_point(), p[1]);
    assert_eq!(path.curves[1].end_point(), p[2]);
    assert_eq!(path.curves[2].start_point(), p[2]);
    assert_eq!(path.curves[2].end_point(), p[3]);

    // Stored geometry is left alone
    let raw_b = breps[0].coedge_curve(coedges[1].coedge).unwrap();
    assert_eq!(raw_b.start_point(), p[2]);
}

#[test]
fn closed_face_wire_is_continuous_around() {
    let breps = [unit_box("w", Point3::origin())];
    let asm = PathAssembler::default();
    let none: [&str; 0] = [];

    for n in 0..6 {
        let face_tag = format!("w|face_{}", n);
        let coedges = asm.resolve_path(&none, &breps, Some(&face_tag));
        assert_eq!(coedges.len(), 4);
        assert!(asm.is_closed(&coedges, &breps).unwrap());

        let path = asm.to_curves(&coedges, &breps);
        for i in 0..path.len() {
            let next = (i + 1) % path.len();
            assert_relative_eq!(
                path.curves[i].end_point(),
                path.curves[next].start_point(),
                epsilon = TOL
            );
        }
    }
}

#[test]
fn face_tag_selects_wire_holding_the_coedge() {
    let (brep, _) = zigzag_face();
    let breps = [brep];
    let asm = PathAssembler::default();

    let coedges = asm.resolve_path(&["path|C"], &breps, Some("path"));
    assert_eq!(coedges.len(), 1);
    assert_eq!(breps[0].coedge_tag(coedges[0].coedge), Some("path|C"));

    // Renumbered prefix still finds the wire through the last tag segment
    let coedges = asm.resolve_path(&["renumbered|B"], &breps, Some("path"));
    assert_eq!(breps[0].coedge_tag(coedges[0].coedge), Some("path|B"));
}

#[test]
fn path_spans_several_breps() {
    let breps = [
        unit_box("a", Point3::origin()),
        unit_box("b", Point3::new(1.0, 0.0, 0.0)),
    ];
    let asm = PathAssembler::default();

    let coedges = asm.resolve_path(&["a|face_1|ce_0", "b|face_1|ce_0"], &breps, None);
    assert_eq!(coedges.iter().map(|c| c.brep).collect::<Vec<_>>(), vec![0, 1]);

    let path = asm.to_curves(&coedges, &breps);
    assert!(path.is_continuous(TOL));
    assert_eq!(path.start_point(), Some(Point3::new(0.0, 0.0, 1.0)));
    assert_eq!(path.end_point(), Some(Point3::new(2.0, 0.0, 1.0)));
}

#[test]
fn reversed_face_flips_single_coedge() {
    let mut brep = Brep::new();
    let v0 = brep.add_vertex(Point3::new(0.0, 0.0, 0.0));
    let v1 = brep.add_vertex(Point3::new(3.0, 0.0, 0.0));
    let v2 = brep.add_vertex(Point3::new(0.0, 3.0, 0.0));
    let e0 = brep.add_line_edge(v0, v1).unwrap();
    let e1 = brep.add_line_edge(v1, v2).unwrap();
    let e2 = brep.add_line_edge(v2, v0).unwrap();
    let wire = brep
        .add_wire(&[(e0, "tri|0"), (e1, "tri|1"), (e2, "tri|2")])
        .unwrap();
    let plane = Plane::from_origin_normal(Point3::origin(), Vector3::z()).unwrap();
    brep.add_face(wire, &[], Surface::Plane(plane), false, "tri")
        .unwrap();

    let breps = [brep];
    let asm = PathAssembler::default();
    let coedges = asm.resolve_path(&["tri|0"], &breps, None);
    let raw = breps[0].coedge_curve(coedges[0].coedge).unwrap();
    let path = asm.to_curves(&coedges, &breps);

    assert_eq!(path.curves[0], raw.reversed());
    assert_eq!(path.start_point(), Some(Point3::new(3.0, 0.0, 0.0)));
    assert!(asm.is_path_reversed(&["tri|0"], &breps, None));
}

#[test]
fn empty_requests_degrade_to_empty_results() {
    let breps = [unit_box("w", Point3::origin())];
    let asm = PathAssembler::default();
    let none: [&str; 0] = [];

    assert!(asm.resolve_path(&none, &breps, None).is_empty());
    assert!(asm.resolve_path(&none, &breps, Some("")).is_empty());
    assert!(asm.resolve_path(&["nowhere"], &breps, None).is_empty());
    assert!(asm.resolve_path(&["w|face_0|ce_0"], &[], None).is_empty());
    assert!(asm.sweep_path(&none, &breps, None, None, None).is_empty());
    assert!(asm.sweep_info(&none, &breps, None).is_none());
    assert!(!asm.is_path_reversed(&none, &breps, None));

    assert!(matches!(
        asm.try_resolve_path(&none, &breps, None),
        Err(Error::Underconstrained(_))
    ));
    assert!(matches!(
        asm.try_resolve_path(&["nowhere"], &breps, None),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn sweep_info_frame_sits_on_path_start() {
    let breps = [unit_box("w", Point3::origin())];
    let asm = PathAssembler::default();

    // Top face, first coedge runs +X from (0,0,1)
    let info = asm
        .sweep_info(&["w|face_1|ce_0", "w|face_1|ce_1"], &breps, None)
        .unwrap();
    assert_eq!(info.coedges.len(), 2);
    assert_eq!(info.start_point, Point3::new(0.0, 0.0, 1.0));

    let frame = info.frame.unwrap();
    assert_eq!(frame.origin, info.start_point);
    assert_relative_eq!(frame.z_axis.into_inner(), Vector3::z(), epsilon = 1e-12);
    assert_relative_eq!(frame.x_axis.into_inner(), Vector3::y(), epsilon = 1e-12);

    let same = asm
        .local_frame_for(&["w|face_1|ce_0", "w|face_1|ce_1"], &breps, None)
        .unwrap();
    assert_eq!(same, frame);
}

#[test]
fn trimmed_sweep_path_runs_between_points() {
    let (brep, p) = zigzag_face();
    let breps = [brep];
    let asm = PathAssembler::default();
    let tags = ["path|A", "path|B", "path|C"];

    let start = Point3::new(2.0, 1.0, 0.0);
    let end = Point3::new(4.0, 3.0, 0.0);
    let path = asm.sweep_path(&tags, &breps, None, Some(&start), Some(&end));

    // A does not hold the start point and is dropped
    assert_eq!(path.tags, vec!["path|B", "path|C"]);
    assert_relative_eq!(path.start_point().unwrap(), start, epsilon = 1e-12);
    assert_relative_eq!(path.curves[0].end_point(), p[2], epsilon = 1e-12);
    assert_relative_eq!(path.end_point().unwrap(), end, epsilon = 1e-12);

    let full = asm.sweep_path(&tags, &breps, None, None, None);
    assert_eq!(full.len(), 3);
    assert_eq!(full.end_point(), Some(p[3]));
}
