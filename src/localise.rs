//! Localisation of delocalised bond systems into explicit Kekulé form, and
//! canonical re-localisation of the double bonds in conjugated rings.

use crate::atom_info::Element;
use crate::graph::canon;
use crate::graph::matching::{self, Matching};
use crate::graph::rings;
use crate::molecule::{Bond, Molecule};
use crate::utils::bitset::BitSet;
use petgraph::prelude::*;
use thiserror::Error;
use tracing::*;

/// No alternating single/double pattern satisfies the delocalised system;
/// the input molecule is invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a valid kekulé structure could not be assigned")]
pub struct KekuleError;

/// The double bonds of a ring system that was already localised could not
/// be rebuilt. The input was known to admit a Kekulé structure, so this is
/// an internal-consistency failure rather than an invalid molecule; it is
/// kept distinct from [`KekuleError`] on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("could not rebuild the double bonds of a localised ring system")]
pub struct ResonanceError;

/// Is the pi assignment of `v` already forced by its element, charge and
/// degree, or by an existing multiple bond?
pub fn pi_predetermined(m: &Molecule, v: NodeIndex) -> bool {
    let a = m.atom(v);
    let q = a.charge;
    let deg = m.degree(v) as u32 + m.implicit_h_count(v) as u32;

    if m.bonded_valence(v) > m.degree(v) as u32 {
        for (e, w) in m.incident(v) {
            let b = m.bond(e);
            if b == Bond::Double {
                // a nitro- or sulfoxide-like centre keeps its choice open
                if q == 0
                    && (a.element == Element::Nitrogen
                        || (a.element == Element::Sulfur && deg > 3))
                    && m.atom(w).element == Element::Oxygen
                {
                    return false;
                }
                return true;
            } else if b.order() > 2 {
                // triple or quadruple, no pi electrons left to assign
                return true;
            }
        }
    }

    match a.element {
        Element::Carbon => (q == 1 || q == -1) && deg == 3,
        Element::Silicon | Element::Germanium => q < 0,
        Element::Nitrogen | Element::Phosphorus | Element::Arsenic | Element::Antimony => {
            if q == 0 {
                deg == 3 || deg > 4
            } else if q == 1 {
                deg > 3
            } else {
                true
            }
        }
        Element::Oxygen | Element::Sulfur | Element::Selenium | Element::Tellurium => {
            if q == 0 {
                deg == 2 || deg == 4 || deg > 5
            } else if q == -1 || q == 1 {
                deg == 3 || deg == 5 || deg > 6
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Collect every delocalised vertex into `aromatic` and return the subset
/// whose pi bond still has to be decided by matching
pub fn undecided_set(m: &Molecule, aromatic: &mut BitSet) -> BitSet {
    let mut undecided = BitSet::with_capacity(m.graph.node_count());
    for v in m.graph.node_indices() {
        if m.atom(v).is_aromatic() {
            aromatic.set(v.index(), true);
            if !pi_predetermined(m, v) {
                undecided.set(v.index(), true);
            }
        }
    }
    undecided
}

// initial -> augment once when short by a single pair -> full blossom search
fn perfect_matching(m: &Molecule, subset: &BitSet) -> Option<Matching> {
    let mut mat = Matching::empty(m.graph.node_count());
    let n = subset.count_ones();
    let mut matched = matching::initial(m, &mut mat, subset);
    if matched < n {
        if n - matched == 2 {
            matched = matching::augment_once(m, &mut mat, matched, subset);
        }
        if matched < n {
            matched = matching::maximise(m, &mut mat, matched, subset);
        }
        if matched < n {
            return None;
        }
    }
    Some(mat)
}

/// Localise into an independent copy; the input is left untouched, also on
/// failure
#[instrument(level = "debug", skip_all, fields(atoms = m.graph.node_count()))]
pub fn localise(m: &Molecule) -> Result<Molecule, KekuleError> {
    if !m.has_arom {
        return Ok(m.clone());
    }
    let mut aromatic = BitSet::with_capacity(m.graph.node_count());
    let subset = undecided_set(m, &mut aromatic);
    debug!(undecided = subset.count_ones(), "built candidate set");
    if subset.count_ones() % 2 == 1 {
        return Err(KekuleError);
    }
    let mat = perfect_matching(m, &subset).ok_or(KekuleError)?;
    let mut out = m.clone();
    assign(&mut out, &subset, &aromatic, &mat);
    Ok(out)
}

/// Localise the owned graph in place; a no-op when nothing is delocalised.
/// The graph is only mutated once a perfect matching is in hand.
#[instrument(level = "debug", skip_all, fields(atoms = m.graph.node_count()))]
pub fn localise_in_place(m: &mut Molecule) -> Result<(), KekuleError> {
    if !m.has_arom {
        return Ok(());
    }
    let mut aromatic = BitSet::with_capacity(m.graph.node_count());
    let subset = undecided_set(m, &mut aromatic);
    debug!(undecided = subset.count_ones(), "built candidate set");
    if subset.count_ones() % 2 == 1 {
        return Err(KekuleError);
    }
    let mat = perfect_matching(m, &subset).ok_or(KekuleError)?;
    assign(m, &subset, &aromatic, &mat);
    Ok(())
}

// rewrite each edge once, the higher-indexed endpoint visiting the lower
fn assign(m: &mut Molecule, subset: &BitSet, aromatic: &BitSet, mat: &Matching) {
    m.has_arom = false;
    for i in 0..m.graph.edge_count() {
        let e = EdgeIndex::new(i);
        let Some((s, t)) = m.graph.edge_endpoints(e) else {
            continue;
        };
        let (u, v) = if s.index() > t.index() { (s, t) } else { (t, s) };
        match m.bond(e) {
            Bond::Single => m.set_bond(e, Bond::Implicit),
            b @ (Bond::Aromatic | Bond::Implicit) => {
                if subset.get(u.index()) && mat.partner(u) == Some(v) {
                    m.set_bond(e, Bond::DoubleAromatic);
                } else if aromatic.get(u.index()) && aromatic.get(v.index()) {
                    m.set_bond(e, Bond::ImplicitAromatic);
                } else if b == Bond::Aromatic {
                    m.set_bond(e, Bond::Implicit);
                }
            }
            _ => {}
        }
    }
    for v in aromatic.ones().map(NodeIndex::new) {
        let a = m.atom(v);
        m.set_atom(v, a.to_aliphatic());
    }
}

/// Re-localise the double bonds of cyclic conjugated systems so that
/// equivalent Kekulé inputs converge on one canonical placement. Takes the
/// molecule by value and returns it renumbered into canonical order.
#[instrument(level = "debug", skip_all, fields(atoms = m.graph.node_count()))]
pub fn resonate(mut m: Molecule) -> Result<Molecule, ResonanceError> {
    let n = m.graph.node_count();
    let cyclic = rings::cyclic_vertices(&m);
    let mut count = vec![0u32; n];
    let mut eligible: Vec<EdgeIndex> = Vec::new();
    for i in 0..m.graph.edge_count() {
        let e = EdgeIndex::new(i);
        if m.bond(e).order() != 2 {
            continue;
        }
        let Some((u, v)) = m.graph.edge_endpoints(e) else {
            continue;
        };
        if has_adj_directional_labels(&m, u, &cyclic) && has_adj_directional_labels(&m, v, &cyclic)
        {
            // pinned by nearby stereo unless the ring is small enough that
            // the geometry survives re-localisation
            if !rings::in_small_ring(&m, e) {
                continue;
            }
        }
        if cyclic.get(u.index()) && cyclic.get(v.index()) {
            count[u.index()] += 1;
            count[v.index()] += 1;
            eligible.push(e);
        }
    }

    let mut subset = BitSet::with_capacity(n);
    for e in eligible {
        let Some((u, v)) = m.graph.edge_endpoints(e) else {
            continue;
        };
        if count[u.index()] == 1 && count[v.index()] == 1 {
            m.set_bond(e, Bond::Implicit);
            subset.set(u.index(), true);
            subset.set(v.index(), true);
        }
    }
    debug!(relocalised = subset.count_ones(), "demoted ring double bonds");

    // the canonical ordering, not the caller's, decides the outcome
    let order = canon::canonical_order(&m);
    let mut remapped = BitSet::with_capacity(n);
    for (new, old) in order.iter().enumerate() {
        if subset.get(old.index()) {
            remapped.set(new, true);
        }
    }
    let mut m = m.reordered(&order);

    let mat = perfect_matching(&m, &remapped).ok_or(ResonanceError)?;
    for v in remapped.ones().map(NodeIndex::new) {
        let Some(w) = mat.partner(v) else { continue };
        if w.index() < v.index() {
            continue;
        }
        if let Some(e) = m.bond_between(v, w) {
            m.set_bond(e, Bond::Double);
        }
    }
    Ok(m)
}

fn has_adj_directional_labels(m: &Molecule, u: NodeIndex, cyclic: &BitSet) -> bool {
    m.incident(u)
        .into_iter()
        .any(|(e, v)| m.bond(e).directional() && cyclic.get(v.index()))
}
