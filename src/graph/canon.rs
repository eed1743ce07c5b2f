//! Canonical vertex ordering by iterative invariant refinement.
//!
//! The seed invariant is intrinsic to each atom and its incident labels;
//! refinement folds in neighbour ranks until a fixed point. Vertices still
//! tied at the fixed point are automorphic images of each other, so any
//! stable tie-break yields an equivalent ordering.

use crate::molecule::Molecule;
use itertools::Itertools;
use petgraph::prelude::*;
use petgraph::visit::EdgeRef;

type Seed = (u8, i8, i16, usize, u8, bool, Vec<u8>);

/// Canonical ordering: `order[k]` is the vertex to place at position `k`
pub fn canonical_order(m: &Molecule) -> Vec<NodeIndex> {
    let n = m.graph.node_count();
    let mut seeds: Vec<Seed> = Vec::with_capacity(n);
    for v in m.graph.node_indices() {
        let a = m.atom(v);
        let mut profile: Vec<u8> = m.graph.edges(v).map(|e| e.weight().order()).collect();
        profile.sort_unstable();
        seeds.push((
            a.element.atomic_number(),
            a.charge,
            a.isotope,
            m.degree(v),
            m.implicit_h_count(v),
            a.is_aromatic(),
            profile,
        ));
    }
    let mut rank = rank_of(&seeds);
    loop {
        let refined: Vec<(usize, Vec<usize>)> = (0..n)
            .map(|i| {
                let mut around: Vec<usize> = m
                    .graph
                    .neighbors(NodeIndex::new(i))
                    .map(|w| rank[w.index()])
                    .collect();
                around.sort_unstable();
                (rank[i], around)
            })
            .collect();
        let next = rank_of(&refined);
        if next == rank {
            break;
        }
        rank = next;
    }
    m.graph
        .node_indices()
        .sorted_by_key(|v| (rank[v.index()], v.index()))
        .collect()
}

// dense ranks, equal keys share the index of their first occurrence
fn rank_of<K: Ord>(keys: &[K]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..keys.len()).collect();
    idx.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    let mut rank = vec![0; keys.len()];
    let mut r = 0;
    for k in 0..idx.len() {
        if k > 0 && keys[idx[k]] != keys[idx[k - 1]] {
            r = k;
        }
        rank[idx[k]] = r;
    }
    rank
}
