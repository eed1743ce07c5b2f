use super::macros::trace_capture;
use crate::prelude::*;
use crate::stereo::{assign_directional_labels, GeometricSpec};
use petgraph::graph::{EdgeIndex, NodeIndex};

// x(0)-u(1)=v(2)-y(3) butene skeleton
fn butene() -> GraphBuilder {
    GraphBuilder::new()
        .aliphatic(Element::Carbon, 3)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 3)
        .connect(0, 1)
        .double_bond(1, 2)
        .connect(2, 3)
}

#[test]
fn together_gives_equal_labels() {
    trace_capture!();
    let m = butene().geometric(1, 2).together(0, 3).build().unwrap();
    let (u, v) = (NodeIndex::new(1), NodeIndex::new(2));
    let e_ux = EdgeIndex::new(0);
    let e_vy = EdgeIndex::new(2);
    assert!(m.bond(e_ux).directional());
    assert_eq!(m.bond_from(e_ux, u), m.bond_from(e_vy, v));
    assert_eq!(m.bond_from(e_ux, u), Bond::Down);
}

#[test]
fn opposite_gives_inverse_labels() {
    let m = butene().geometric(1, 2).opposite(0, 3).build().unwrap();
    let (u, v) = (NodeIndex::new(1), NodeIndex::new(2));
    let e_ux = EdgeIndex::new(0);
    let e_vy = EdgeIndex::new(2);
    assert_eq!(m.bond_from(e_ux, u), m.bond_from(e_vy, v).inverse());
}

#[test]
fn labels_flip_across_an_edge() {
    let m = butene().geometric(1, 2).together(0, 3).build().unwrap();
    let e = EdgeIndex::new(0);
    let a = m.bond_from(e, NodeIndex::new(0));
    let b = m.bond_from(e, NodeIndex::new(1));
    assert_eq!(a, b.inverse());
}

#[test]
fn unspecified_is_read_only() {
    let m = butene().geometric(1, 2).unspecified(0, 3).build().unwrap();
    for i in 0..3 {
        assert!(!m.bond(EdgeIndex::new(i)).directional());
    }
}

// 0-1=2-3=4-5 conjugated diene
fn hexadiene() -> GraphBuilder {
    GraphBuilder::new()
        .aliphatic(Element::Carbon, 3)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 3)
        .connect(0, 1)
        .double_bond(1, 2)
        .connect(2, 3)
        .double_bond(3, 4)
        .connect(4, 5)
}

#[test]
fn adjacent_bonds_share_the_allylic_label() {
    let m = hexadiene()
        .geometric(1, 2)
        .together(0, 3)
        .geometric(3, 4)
        .together(2, 5)
        .build()
        .unwrap();
    let e01 = EdgeIndex::new(0);
    let e23 = EdgeIndex::new(2);
    let e45 = EdgeIndex::new(4);
    // first declaration
    assert_eq!(
        m.bond_from(e01, NodeIndex::new(1)),
        m.bond_from(e23, NodeIndex::new(2))
    );
    // second declaration reuses the shared bond as seen from its side
    assert_eq!(
        m.bond_from(e23, NodeIndex::new(3)),
        m.bond_from(e45, NodeIndex::new(4))
    );
    // one shared edge serves both, so the two sides are inverses
    assert_eq!(
        m.bond_from(e23, NodeIndex::new(2)),
        m.bond_from(e23, NodeIndex::new(3)).inverse()
    );
}

#[test]
fn declaration_order_converges() {
    // same molecule, declarations in the other order: the second commit
    // has to invert its derived pair to fit the existing labels
    let m = hexadiene()
        .geometric(3, 4)
        .together(2, 5)
        .geometric(1, 2)
        .together(0, 3)
        .build()
        .unwrap();
    let e01 = EdgeIndex::new(0);
    let e23 = EdgeIndex::new(2);
    let e45 = EdgeIndex::new(4);
    assert_eq!(
        m.bond_from(e01, NodeIndex::new(1)),
        m.bond_from(e23, NodeIndex::new(2))
    );
    assert_eq!(
        m.bond_from(e23, NodeIndex::new(3)),
        m.bond_from(e45, NodeIndex::new(4))
    );
}

#[test]
fn branch_labels_are_implied() {
    // 2-methylbut-2-ene-like skeleton: the second substituent on the
    // stereo centre picks up the opposite label
    let m = GraphBuilder::new()
        .aliphatic(Element::Carbon, 3)
        .aliphatic(Element::Carbon, 0)
        .aliphatic(Element::Carbon, 3)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 3)
        .connect(0, 1)
        .connect(1, 2)
        .double_bond(1, 3)
        .connect(3, 4)
        .geometric(1, 3)
        .together(0, 4)
        .build()
        .unwrap();
    let u = NodeIndex::new(1);
    let e_ux = EdgeIndex::new(0);
    let e_branch = EdgeIndex::new(1);
    assert_eq!(
        m.bond_from(e_ux, u),
        m.bond_from(e_branch, u).inverse(),
        "substituents on one centre sit on opposite sides"
    );
}

fn cyclobutadiene() -> GraphBuilder {
    GraphBuilder::new()
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 1)
        .double_bond(0, 1)
        .connect(1, 2)
        .double_bond(2, 3)
        .connect(3, 0)
}

#[test]
fn ring_configurations_can_agree() {
    let m = cyclobutadiene()
        .geometric(0, 1)
        .together(3, 2)
        .geometric(2, 3)
        .together(1, 0)
        .build()
        .unwrap();
    let e12 = EdgeIndex::new(1);
    let e30 = EdgeIndex::new(3);
    assert!(m.bond(e12).directional());
    assert!(m.bond(e30).directional());
    // both declarations read the same two single bonds consistently
    assert_eq!(
        m.bond_from(e30, NodeIndex::new(0)),
        m.bond_from(e12, NodeIndex::new(1))
    );
}

#[test]
fn contradictory_ring_configurations_fail() {
    let err = cyclobutadiene()
        .geometric(0, 1)
        .together(3, 2)
        .geometric(2, 3)
        .opposite(1, 0)
        .build()
        .unwrap_err();
    assert_eq!(err, GeometryError::Unassignable { u: 2, v: 3 });
}

#[test]
fn conflicting_priors_are_fixed_first() {
    // vertex 1 starts with the same label toward 0 and 2, left over from
    // an earlier, independently committed system; the engine repairs it
    // before assigning the new configuration
    let mut m = Molecule::new();
    let vs: Vec<_> = (0..5)
        .map(|i| m.add_atom(Atom::aliphatic(Element::Carbon).with_hydrogens(if i == 1 { 0 } else { 2 })))
        .collect();
    let e_ux = m.add_bond(vs[1], vs[0], Bond::Up);
    let e_branch = m.add_bond(vs[1], vs[2], Bond::Up);
    m.add_bond(vs[1], vs[3], Bond::Double);
    let e_vy = m.add_bond(vs[3], vs[4], Bond::Implicit);
    let specs = vec![GeometricSpec {
        u: vs[1],
        v: vs[3],
        x: vs[0],
        y: vs[4],
        config: DoubleBondConfig::Together,
    }];
    assign_directional_labels(&mut m, specs).unwrap();
    assert_eq!(m.bond_from(e_ux, vs[1]), Bond::Down);
    assert_eq!(m.bond_from(e_branch, vs[1]), Bond::Up);
    assert_eq!(m.bond_from(e_vy, vs[3]), Bond::Down);
}

#[test]
fn missing_adjacency_is_rejected() {
    let err = butene().geometric(1, 2).together(3, 0).build().unwrap_err();
    assert_eq!(
        err,
        GeometryError::NotAdjacent {
            u: 1,
            v: 2,
            x: 3,
            y: 0
        }
    );
}

#[test]
fn configuration_needs_a_double_bond() {
    let err = GraphBuilder::new()
        .aliphatic(Element::Carbon, 3)
        .aliphatic(Element::Carbon, 2)
        .aliphatic(Element::Carbon, 2)
        .aliphatic(Element::Carbon, 3)
        .connect(0, 1)
        .connect(1, 2)
        .connect(2, 3)
        .geometric(1, 2)
        .together(0, 3)
        .build()
        .unwrap_err();
    assert_eq!(err, GeometryError::NotDoubleBond { u: 1, v: 2 });
}
