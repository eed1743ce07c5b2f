//! Commits declared double-bond configurations as directional bond labels,
//! resolving clashes with earlier assignments by propagated inversion.

use crate::molecule::{Bond, Molecule};
use crate::utils::bitset::BitSet;
use petgraph::prelude::*;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::*;

/// Declared geometry of a double bond relative to one reference neighbour
/// on each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoubleBondConfig {
    /// Read-only declaration, skipped when committing
    Unspecified,
    /// The reference neighbours sit on the same side
    Together,
    /// The reference neighbours sit on opposite sides
    Opposite,
}

/// A pending declaration for the double bond `u = v`: `x` is a neighbour of
/// `u`, `y` a neighbour of `v`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometricSpec {
    pub u: NodeIndex,
    pub v: NodeIndex,
    pub x: NodeIndex,
    pub y: NodeIndex,
    pub config: DoubleBondConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("cannot assign directional labels, vertices were not adjacent: expected topology x-u=v-y with x={x}, u={u}, v={v}, y={y}")]
    NotAdjacent {
        u: usize,
        v: usize,
        x: usize,
        y: usize,
    },
    #[error("cannot assign a configuration to the bond {u}-{v}, it is not a double bond")]
    NotDoubleBond { u: usize, v: usize },
    #[error("no consistent assignment of directional labels exists around {u}={v}")]
    Unassignable { u: usize, v: usize },
}

/// Commit the pending declarations in order. Each declaration either fully
/// commits or the whole call fails; edges touched by earlier declarations
/// stay committed, so callers wanting atomicity should work on a clone.
#[instrument(level = "debug", skip_all, fields(pending = specs.len()))]
pub fn assign_directional_labels(
    m: &mut Molecule,
    specs: Vec<GeometricSpec>,
) -> Result<(), GeometryError> {
    // vertices already adjacent to a committed double-bond configuration
    let mut adj_to_db = BitSet::with_capacity(m.graph.node_count());

    for spec in specs {
        if spec.config == DoubleBondConfig::Unspecified {
            continue;
        }
        let GeometricSpec { u, v, x, y, config } = spec;
        let (e_ux, e_vy) = check_spec(m, &spec)?;

        fix(m, u, v, &adj_to_db);
        fix(m, v, u, &adj_to_db);

        let mut first = first_directional_label(m, e_ux, u, x, &adj_to_db);
        let mut second = if config == DoubleBondConfig::Together {
            first
        } else {
            first.inverse()
        };

        if check_directional_assignment(m, second, v, y) {
            // clean, commit as derived
        } else if check_directional_assignment(m, first.inverse(), u, x) {
            first = first.inverse();
            second = second.inverse();
        } else {
            // both orientations clash locally: flip everything reachable on
            // the far side and try once more
            let mut visited = BitSet::with_capacity(m.graph.node_count());
            visited.set(v.index(), true);
            invert_reachable(m, &adj_to_db, &mut visited, v, u);
            if !check_directional_assignment(m, first, u, x)
                || !check_directional_assignment(m, second, v, y)
            {
                return Err(GeometryError::Unassignable {
                    u: u.index(),
                    v: v.index(),
                });
            }
        }
        m.set_bond_from(e_ux, u, first);
        m.set_bond_from(e_vy, v, second);
        trace!(u = u.index(), v = v.index(), %first, %second, "committed configuration");

        // imply directions on the remaining plain bonds of both ends
        for (e, _) in m.incident(u) {
            let b = m.bond(e);
            if b != Bond::Double && !b.directional() {
                m.set_bond_from(e, u, first.inverse());
            }
        }
        for (e, _) in m.incident(v) {
            let b = m.bond(e);
            if b != Bond::Double && !b.directional() {
                m.set_bond_from(e, v, second.inverse());
            }
        }

        adj_to_db.set(u.index(), true);
        adj_to_db.set(v.index(), true);
    }
    Ok(())
}

fn check_spec(m: &Molecule, s: &GeometricSpec) -> Result<(EdgeIndex, EdgeIndex), GeometryError> {
    let (Some(e_ux), Some(e_uv), Some(e_vy)) = (
        m.bond_between(s.u, s.x),
        m.bond_between(s.u, s.v),
        m.bond_between(s.v, s.y),
    ) else {
        return Err(GeometryError::NotAdjacent {
            u: s.u.index(),
            v: s.v.index(),
            x: s.x.index(),
            y: s.y.index(),
        });
    };
    if m.bond(e_uv) != Bond::Double {
        return Err(GeometryError::NotDoubleBond {
            u: s.u.index(),
            v: s.v.index(),
        });
    }
    Ok((e_ux, e_vy))
}

/// Repair `u` before a new assignment: if two of its edges already carry the
/// same directional label as seen from `u`, an earlier commit on the other
/// side left it inconsistent, so flip the labels reachable from `u` without
/// crossing the double bond to `p`
fn fix(m: &mut Molecule, u: NodeIndex, p: NodeIndex, adj_to_db: &BitSet) {
    let mut other: Option<Bond> = None;
    for (e, w) in m.incident(u) {
        let b = m.bond_from(e, u);
        if b.directional() {
            if other == Some(b) {
                let mut visited = BitSet::with_capacity(m.graph.node_count());
                visited.set(p.index(), true);
                visited.set(w.index(), true);
                invert_reachable(m, adj_to_db, &mut visited, u, p);
            }
            other = Some(b);
        }
    }
}

struct Frame {
    v: NodeIndex,
    p: NodeIndex,
    edges: SmallVec<(EdgeIndex, NodeIndex), 4>,
    i: usize,
}

/// Depth-first inversion of directional labels reachable from `start`,
/// never crossing into `exclude` or a visited vertex; descends only through
/// vertices that belong to an already-committed configuration
fn invert_reachable(
    m: &mut Molecule,
    adj_to_db: &BitSet,
    visited: &mut BitSet,
    start: NodeIndex,
    exclude: NodeIndex,
) {
    visited.set(start.index(), true);
    let mut stack = vec![Frame {
        v: start,
        p: exclude,
        edges: m.incident(start),
        i: 0,
    }];
    loop {
        let Some(frame) = stack.last_mut() else {
            break;
        };
        if frame.i >= frame.edges.len() {
            stack.pop();
            continue;
        }
        let (e, w) = frame.edges[frame.i];
        frame.i += 1;
        let v = frame.v;
        let p = frame.p;
        if visited.get(w.index()) || w == p {
            continue;
        }
        let b = m.bond(e);
        if b.directional() {
            m.set_bond(e, b.inverse());
        }
        if adj_to_db.get(w.index()) {
            visited.set(w.index(), true);
            stack.push(Frame {
                v: w,
                p: v,
                edges: m.incident(w),
                i: 0,
            });
        }
    }
}

/// Label to put on `u -> x`, as seen from `u`. Prefer whatever a decided
/// neighbouring configuration already forces, then the inverse of another
/// label on `u` itself, then the existing label, then down.
fn first_directional_label(
    m: &Molecule,
    e_ux: EdgeIndex,
    u: NodeIndex,
    x: NodeIndex,
    adj_to_db: &BitSet,
) -> Bond {
    let b = m.bond_from(e_ux, u);

    if adj_to_db.get(x.index()) && m.degree(x) > 2 {
        for (f, w) in m.incident(x) {
            if w != u && m.bond(f).directional() {
                return m.bond_from(f, x);
            }
        }
    }
    if m.degree(u) > 2 {
        for (f, w) in m.incident(u) {
            if w != x && m.bond(f).directional() {
                return m.bond_from(f, u).inverse();
            }
        }
    }
    if b.directional() {
        b
    } else {
        Bond::Down
    }
}

/// Would labelling `u -> v` with `b` clash with the directional labels
/// already around `u`? A clash is the same label toward a different
/// neighbour, or a different label on the `u -> v` edge itself.
fn check_directional_assignment(m: &Molecule, b: Bond, u: NodeIndex, v: NodeIndex) -> bool {
    for (e, w) in m.incident(u) {
        let existing = m.bond_from(e, u);
        if existing.directional() {
            if w != v {
                if existing == b {
                    return false;
                }
            } else if existing != b {
                return false;
            }
        }
    }
    true
}
