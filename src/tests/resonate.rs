use crate::localise::resonate;
use crate::prelude::*;

// cyclohexatriene with the double bonds wherever the offsets say
fn kekule_benzene(doubles: [usize; 3]) -> Molecule {
    let mut gb = GraphBuilder::new();
    for _ in 0..6 {
        gb = gb.aliphatic(Element::Carbon, 1);
    }
    for u in 0..6 {
        let v = (u + 1) % 6;
        gb = if doubles.contains(&u) {
            gb.double_bond(u, v)
        } else {
            gb.connect(u, v)
        };
    }
    gb.build().unwrap()
}

fn labels(m: &Molecule) -> Vec<(usize, usize, Bond)> {
    let mut out: Vec<_> = m
        .graph
        .edge_indices()
        .map(|e| {
            let (s, t) = m.graph.edge_endpoints(e).unwrap();
            let (a, b) = (s.index().min(t.index()), s.index().max(t.index()));
            (a, b, m.bond(e))
        })
        .collect();
    out.sort();
    out
}

#[test]
fn equivalent_kekule_forms_converge() {
    let a = resonate(kekule_benzene([0, 2, 4])).unwrap();
    let b = resonate(kekule_benzene([1, 3, 5])).unwrap();
    assert_eq!(labels(&a), labels(&b));
    let doubles = labels(&a)
        .into_iter()
        .filter(|&(_, _, b)| b == Bond::Double)
        .count();
    assert_eq!(doubles, 3);
}

#[test]
fn canonical_placement_is_stable() {
    // resonating twice changes nothing further
    let once = resonate(kekule_benzene([1, 3, 5])).unwrap();
    let fp = labels(&once);
    let twice = resonate(once).unwrap();
    assert_eq!(labels(&twice), fp);
}

#[test]
fn acyclic_double_bonds_are_left_alone() {
    // butadiene has no ring, so nothing is re-localised
    let m = GraphBuilder::new()
        .aliphatic(Element::Carbon, 2)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 1)
        .aliphatic(Element::Carbon, 2)
        .double_bond(0, 1)
        .connect(1, 2)
        .double_bond(2, 3)
        .build()
        .unwrap();
    let r = resonate(m).unwrap();
    let doubles = labels(&r)
        .into_iter()
        .filter(|&(_, _, b)| b == Bond::Double)
        .count();
    assert_eq!(doubles, 2);
}

#[test]
fn exocyclic_doubles_do_not_move() {
    // methylenecyclohexane: the ring is saturated, the double bond pokes
    // out of it and must survive untouched
    let mut gb = GraphBuilder::new().aliphatic(Element::Carbon, 0);
    for _ in 0..5 {
        gb = gb.aliphatic(Element::Carbon, 2);
    }
    gb = gb.aliphatic(Element::Carbon, 2);
    for u in 0..6 {
        gb = gb.connect(u, (u + 1) % 6);
    }
    let m = gb
        .double_bond(0, 6)
        .build()
        .unwrap();
    let r = resonate(m).unwrap();
    let kept = labels(&r)
        .into_iter()
        .filter(|&(_, _, b)| b == Bond::Double)
        .count();
    assert_eq!(kept, 1);
}

#[test]
fn localise_then_resonate_round_trip() {
    let mut gb = GraphBuilder::new();
    for _ in 0..6 {
        gb = gb.aromatic(Element::Carbon, 1);
    }
    for u in 0..6 {
        gb = gb.aromatic_bond(u, (u + 1) % 6);
    }
    let m = gb.build().unwrap();
    let k = crate::localise::localise(&m).unwrap();
    let r = resonate(k).unwrap();
    let by_label = labels(&r);
    let doubles = by_label
        .iter()
        .filter(|&&(_, _, b)| b == Bond::Double)
        .count();
    assert_eq!(doubles, 3);
    // alternation survives: no vertex touches two doubles
    for v in r.graph.node_indices() {
        let d = r
            .incident(v)
            .into_iter()
            .filter(|&(e, _)| r.bond(e).order() == 2)
            .count();
        assert_eq!(d, 1);
    }
}
