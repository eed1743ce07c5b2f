//! Matching over the undecided vertices of a delocalised system.
//!
//! Callers chain three passes of increasing cost: a greedy [`initial`]
//! pairing, a single augmenting step via [`augment_once`] when the greedy
//! pass is short by exactly one pair, and the full blossom search in
//! [`maximise`]. Each pass only ever grows the matched count.

use crate::molecule::{Bond, Molecule};
use crate::utils::bitset::BitSet;
use petgraph::prelude::*;
use std::collections::VecDeque;
use tracing::*;

/// A symmetric partial pairing of vertices
#[derive(Debug, Clone, Default)]
pub struct Matching {
    pairing: Vec<Option<NodeIndex>>,
}
impl Matching {
    pub fn empty(n: usize) -> Self {
        Self {
            pairing: vec![None; n],
        }
    }
    #[inline(always)]
    pub fn partner(&self, v: NodeIndex) -> Option<NodeIndex> {
        self.pairing[v.index()]
    }
    #[inline(always)]
    pub fn matched(&self, v: NodeIndex) -> bool {
        self.pairing[v.index()].is_some()
    }
    pub fn pair(&mut self, u: NodeIndex, v: NodeIndex) {
        self.pairing[u.index()] = Some(v);
        self.pairing[v.index()] = Some(u);
    }
}

/// Only an undecided label can carry the newly placed pi bond; an explicit
/// single or double between two subset atoms is already spoken for
fn matchable(b: Bond) -> bool {
    matches!(b, Bond::Implicit | Bond::ImplicitAromatic | Bond::Aromatic)
}

/// Greedy pass: pair each unmatched subset vertex with its first unmatched
/// subset neighbour, in edge-encounter order. Returns the matched count.
pub fn initial(m: &Molecule, mat: &mut Matching, subset: &BitSet) -> usize {
    let mut matched = 0;
    for v in subset.ones().map(NodeIndex::new) {
        if mat.matched(v) {
            continue;
        }
        for (e, w) in m.incident(v) {
            if matchable(m.bond(e)) && subset.get(w.index()) && !mat.matched(w) {
                mat.pair(v, w);
                matched += 2;
                break;
            }
        }
    }
    trace!(matched, "greedy matching done");
    matched
}

/// One targeted augmenting step: a plain alternating-tree search from each
/// exposed vertex until a single augmenting path is flipped. Odd cycles are
/// left to [`maximise`].
pub fn augment_once(m: &Molecule, mat: &mut Matching, matched: usize, subset: &BitSet) -> usize {
    for root in subset.ones().map(NodeIndex::new) {
        if !mat.matched(root) && augment_from(m, mat, subset, root) {
            return matched + 2;
        }
    }
    matched
}

fn augment_from(m: &Molecule, mat: &mut Matching, subset: &BitSet, root: NodeIndex) -> bool {
    let n = m.graph.node_count();
    let mut prev: Vec<Option<NodeIndex>> = vec![None; n];
    let mut seen = BitSet::with_capacity(n);
    seen.set(root.index(), true);
    let mut queue = VecDeque::new();
    queue.push_back(root);
    while let Some(v) = queue.pop_front() {
        for (e, w) in m.incident(v) {
            if !matchable(m.bond(e)) || !subset.get(w.index()) || seen.get(w.index()) {
                continue;
            }
            seen.set(w.index(), true);
            prev[w.index()] = Some(v);
            match mat.partner(w) {
                None => {
                    flip_path(mat, &prev, w);
                    return true;
                }
                Some(z) => {
                    if !seen.get(z.index()) {
                        seen.set(z.index(), true);
                        queue.push_back(z);
                    }
                }
            }
        }
    }
    false
}

// walk back from the newly exposed end, re-pairing along the way
fn flip_path(mat: &mut Matching, prev: &[Option<NodeIndex>], end: NodeIndex) {
    let mut v = end;
    loop {
        let u = prev[v.index()].expect("path leads back to the root");
        let old = mat.partner(u);
        mat.pair(v, u);
        match old {
            None => break,
            Some(o) => v = o,
        }
    }
}

/// Maximum matching over the subset via Edmonds' blossom algorithm,
/// starting from whatever `mat` already holds
pub fn maximise(m: &Molecule, mat: &mut Matching, mut matched: usize, subset: &BitSet) -> usize {
    for root in subset.ones().map(NodeIndex::new) {
        if !mat.matched(root) && find_augmenting(m, mat, subset, root) {
            matched += 2;
        }
    }
    debug!(matched, "maximum matching done");
    matched
}

fn find_augmenting(m: &Molecule, mat: &mut Matching, subset: &BitSet, root: NodeIndex) -> bool {
    let n = m.graph.node_count();
    let mut parent: Vec<Option<NodeIndex>> = vec![None; n];
    let mut base: Vec<NodeIndex> = (0..n).map(NodeIndex::new).collect();
    let mut in_tree = BitSet::with_capacity(n);
    in_tree.set(root.index(), true);
    let mut queue = VecDeque::new();
    queue.push_back(root);
    while let Some(v) = queue.pop_front() {
        for (e, w) in m.incident(v) {
            if !matchable(m.bond(e)) || !subset.get(w.index()) {
                continue;
            }
            if base[v.index()] == base[w.index()] || mat.partner(v) == Some(w) {
                continue;
            }
            if w == root
                || mat
                    .partner(w)
                    .is_some_and(|pw| parent[pw.index()].is_some())
            {
                // odd cycle: contract the blossom down to its base
                let b = lca(&base, &parent, mat, v, w);
                let mut blossom = BitSet::with_capacity(n);
                mark_path(&mut base, &mut parent, mat, &mut blossom, v, b, w);
                mark_path(&mut base, &mut parent, mat, &mut blossom, w, b, v);
                for i in 0..n {
                    if blossom.get(base[i].index()) {
                        base[i] = b;
                        if !in_tree.get(i) {
                            in_tree.set(i, true);
                            queue.push_back(NodeIndex::new(i));
                        }
                    }
                }
            } else if parent[w.index()].is_none() {
                parent[w.index()] = Some(v);
                match mat.partner(w) {
                    None => {
                        augment_along(mat, &parent, w);
                        return true;
                    }
                    Some(pw) => {
                        if !in_tree.get(pw.index()) {
                            in_tree.set(pw.index(), true);
                            queue.push_back(pw);
                        }
                    }
                }
            }
        }
    }
    false
}

fn lca(
    base: &[NodeIndex],
    parent: &[Option<NodeIndex>],
    mat: &Matching,
    a: NodeIndex,
    b: NodeIndex,
) -> NodeIndex {
    let mut marked = BitSet::with_capacity(base.len());
    let mut v = a;
    loop {
        v = base[v.index()];
        marked.set(v.index(), true);
        let Some(pv) = mat.partner(v) else { break };
        let Some(next) = parent[pv.index()] else {
            break;
        };
        v = next;
    }
    let mut v = b;
    loop {
        v = base[v.index()];
        if marked.get(v.index()) {
            return v;
        }
        let pv = mat.partner(v).expect("tree vertices below the root are matched");
        v = parent[pv.index()].expect("tree vertices below the root have parents");
    }
}

fn mark_path(
    base: &mut [NodeIndex],
    parent: &mut [Option<NodeIndex>],
    mat: &Matching,
    blossom: &mut BitSet,
    mut v: NodeIndex,
    b: NodeIndex,
    mut child: NodeIndex,
) {
    while base[v.index()] != b {
        let pv = mat.partner(v).expect("blossom vertices are matched");
        blossom.set(base[v.index()].index(), true);
        blossom.set(base[pv.index()].index(), true);
        parent[v.index()] = Some(child);
        child = pv;
        v = parent[pv.index()].expect("blossom vertices have parents");
    }
}

fn augment_along(mat: &mut Matching, parent: &[Option<NodeIndex>], end: NodeIndex) {
    let mut v = end;
    loop {
        let pv = parent[v.index()].expect("augmenting path leads back to the root");
        let old = mat.partner(pv);
        mat.pair(v, pv);
        match old {
            None => break,
            Some(next) => v = next,
        }
    }
}
