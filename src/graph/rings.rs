//! Ring membership queries backing the resonance pass.

use crate::molecule::Molecule;
use crate::utils::bitset::BitSet;
use petgraph::prelude::*;
use smallvec::SmallVec;

struct Frame {
    v: NodeIndex,
    parent_edge: Option<EdgeIndex>,
    edges: SmallVec<(EdgeIndex, NodeIndex), 4>,
    i: usize,
}

/// Vertices lying on any cycle: every endpoint of a non-bridge edge.
/// Bridges fall out of an iterative low-link DFS.
pub fn cyclic_vertices(m: &Molecule) -> BitSet {
    let n = m.graph.node_count();
    let mut cyclic = BitSet::with_capacity(n);
    let mut disc = vec![0usize; n];
    let mut low = vec![0usize; n];
    let mut timer = 0usize;
    for start in m.graph.node_indices() {
        if disc[start.index()] != 0 {
            continue;
        }
        timer += 1;
        disc[start.index()] = timer;
        low[start.index()] = timer;
        let mut stack = vec![Frame {
            v: start,
            parent_edge: None,
            edges: m.incident(start),
            i: 0,
        }];
        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            if frame.i < frame.edges.len() {
                let (e, w) = frame.edges[frame.i];
                frame.i += 1;
                let v = frame.v;
                if frame.parent_edge == Some(e) {
                    continue;
                }
                if disc[w.index()] == 0 {
                    timer += 1;
                    disc[w.index()] = timer;
                    low[w.index()] = timer;
                    stack.push(Frame {
                        v: w,
                        parent_edge: Some(e),
                        edges: m.incident(w),
                        i: 0,
                    });
                } else {
                    // non-tree edge, always part of a cycle
                    low[v.index()] = low[v.index()].min(disc[w.index()]);
                    cyclic.set(v.index(), true);
                    cyclic.set(w.index(), true);
                }
            } else {
                let done = stack.pop().expect("frame just inspected");
                if done.parent_edge.is_some() {
                    let p = stack.last().expect("non-root frames have parents").v;
                    low[p.index()] = low[p.index()].min(low[done.v.index()]);
                    if low[done.v.index()] <= disc[p.index()] {
                        // tree edge inside a cycle, not a bridge
                        cyclic.set(p.index(), true);
                        cyclic.set(done.v.index(), true);
                    }
                }
            }
        }
    }
    cyclic
}

/// Does edge `e` close a ring of at most seven bonds?
pub fn in_small_ring(m: &Molecule, e: EdgeIndex) -> bool {
    let Some((u, v)) = m.graph.edge_endpoints(e) else {
        return false;
    };
    let mut visit = BitSet::with_capacity(m.graph.node_count());
    small_ring_walk(m, u, v, v, 1, &mut visit)
}

fn small_ring_walk(
    m: &Molecule,
    v: NodeIndex,
    prev: NodeIndex,
    target: NodeIndex,
    d: usize,
    visit: &mut BitSet,
) -> bool {
    if d > 7 {
        return false;
    }
    if v == target {
        return true;
    }
    if visit.get(v.index()) {
        return false;
    }
    visit.set(v.index(), true);
    for (_, w) in m.incident(v) {
        if w == prev {
            continue;
        }
        if small_ring_walk(m, w, v, target, d + 1, visit) {
            return true;
        }
    }
    false
}
