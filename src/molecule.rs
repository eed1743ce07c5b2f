//! Core molecule graph types: atoms, bond labels, and the graph wrapper
//! shared by the localisation and stereo passes.

use crate::atom_info::Element;
use crate::topology::Topology;
use ahash::HashMap;
use modular_bitfield::prelude::*;
use petgraph::prelude::*;
use petgraph::visit::EdgeRef;
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};

/// Bit-packed per-atom bookkeeping: explicit hydrogen count, delocalisation
/// and shorthand flags, and the numbered atom class
#[bitfield]
#[repr(u16)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomData {
    pub hydrogens: B4,
    pub aromatic: bool,
    pub subset: bool,
    pub atom_class: B10,
}

/// An atom in the molecule graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom {
    pub element: Element,
    pub charge: i8,
    /// Mass number, `-1` when unspecified
    pub isotope: i16,
    pub data: AtomData,
}
impl Atom {
    pub fn aliphatic(element: Element) -> Self {
        Self {
            element,
            charge: 0,
            isotope: -1,
            data: AtomData::new(),
        }
    }
    pub fn aromatic(element: Element) -> Self {
        Self {
            data: AtomData::new().with_aromatic(true),
            ..Self::aliphatic(element)
        }
    }
    /// Panics if `h` doesn't fit in four bits
    pub fn with_hydrogens(mut self, h: u8) -> Self {
        self.data.set_hydrogens(h);
        self
    }
    pub fn with_charge(mut self, charge: i8) -> Self {
        self.charge = charge;
        self
    }
    pub fn with_isotope(mut self, isotope: i16) -> Self {
        self.isotope = isotope;
        self
    }
    pub fn with_atom_class(mut self, class: u16) -> Self {
        self.data.set_atom_class(class);
        self
    }

    #[inline(always)]
    pub fn is_aromatic(&self) -> bool {
        self.data.aromatic()
    }
    #[inline(always)]
    pub fn is_subset(&self) -> bool {
        self.data.subset()
    }
    #[inline(always)]
    pub fn hydrogens(&self) -> u8 {
        self.data.hydrogens()
    }
    #[inline(always)]
    pub fn atom_class(&self) -> u16 {
        self.data.atom_class()
    }

    /// Aliphatic copy of this atom, delocalisation flag cleared
    pub fn to_aliphatic(mut self) -> Self {
        self.data.set_aromatic(false);
        self
    }
    /// Organic-subset shorthand: hydrogens become implied by valence
    pub fn to_subset(mut self) -> Self {
        self.data.set_subset(true);
        self.data.set_hydrogens(0);
        self
    }
}
impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.element.data().name)?;
            if self.isotope >= 0 {
                write!(f, "-{}", self.isotope)?;
            }
        } else {
            use fmtastic::*;
            if self.isotope >= 0 {
                write!(f, "{}", Superscript(self.isotope))?;
            }
            write!(f, "{}", self.element.data().sym)?;
            match self.charge {
                0 => {}
                1 => f.write_str("⁺")?,
                -1 => f.write_str("⁻")?,
                _ => write!(f, "{:+}", Superscript(self.charge))?,
            }
        }
        Ok(())
    }
}

/// A bond label between atoms in the molecule graph.
///
/// Directional labels are stored relative to the edge's endpoint order and
/// flip when read from the far endpoint; every other label is its own
/// inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bond {
    /// Atoms written together but not bonded
    Dot,
    /// Single or delocalised, not yet decided
    Implicit,
    /// Definitely-single bond inside a formerly delocalised system
    ImplicitAromatic,
    Single,
    Double,
    /// Double bond placed by localising a delocalised system
    DoubleAromatic,
    Triple,
    Quadruple,
    Aromatic,
    /// Directional single bond, the second endpoint above the first
    Up,
    /// Directional single bond, the second endpoint below the first
    Down,
}
impl Bond {
    /// Contribution to bonded valence sums
    pub fn order(self) -> u8 {
        match self {
            Self::Dot => 0,
            Self::Double | Self::DoubleAromatic => 2,
            Self::Triple => 3,
            Self::Quadruple => 4,
            _ => 1,
        }
    }
    /// Shared electrons; `None` while an implicit label is still ambiguous
    pub fn electrons(self) -> Option<u8> {
        match self {
            Self::Dot => Some(0),
            Self::Implicit => None,
            Self::Single | Self::Up | Self::Down => Some(2),
            Self::ImplicitAromatic | Self::Aromatic => Some(3),
            Self::Double | Self::DoubleAromatic => Some(4),
            Self::Triple => Some(6),
            Self::Quadruple => Some(8),
        }
    }
    pub fn inverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            b => b,
        }
    }
    pub fn directional(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
    pub fn as_static_str(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Implicit => "implicit",
            Self::ImplicitAromatic => "implicit aromatic",
            Self::Single => "single",
            Self::Double => "double",
            Self::DoubleAromatic => "aromatic double",
            Self::Triple => "triple",
            Self::Quadruple => "quad",
            Self::Aromatic => "aromatic",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}
impl Display for Bond {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_static_str())
    }
}

/// A molecule graph is an undirected graph between atoms, connected with bonds
pub type MoleculeGraph = UnGraph<Atom, Bond>;

/// A molecule graph plus the per-vertex stereo descriptors and graph-level
/// flags the localisation and stereo passes work against
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub graph: MoleculeGraph,
    pub topology: HashMap<NodeIndex, Topology>,
    /// Delocalised atoms or bonds are present somewhere in the graph
    pub has_arom: bool,
}
impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: MoleculeGraph::with_capacity(nodes, edges),
            topology: HashMap::default(),
            has_arom: false,
        }
    }

    #[inline(always)]
    pub fn atom(&self, v: NodeIndex) -> Atom {
        self.graph[v]
    }
    #[inline(always)]
    pub fn set_atom(&mut self, v: NodeIndex, a: Atom) {
        self.graph[v] = a;
    }
    pub fn add_atom(&mut self, a: Atom) -> NodeIndex {
        if a.is_aromatic() {
            self.has_arom = true;
        }
        self.graph.add_node(a)
    }
    pub fn add_bond(&mut self, u: NodeIndex, v: NodeIndex, b: Bond) -> EdgeIndex {
        if b == Bond::Aromatic {
            self.has_arom = true;
        }
        self.graph.add_edge(u, v, b)
    }
    #[inline(always)]
    pub fn bond(&self, e: EdgeIndex) -> Bond {
        self.graph[e]
    }
    #[inline(always)]
    pub fn set_bond(&mut self, e: EdgeIndex, b: Bond) {
        self.graph[e] = b;
    }
    pub fn bond_between(&self, u: NodeIndex, v: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(u, v)
    }
    pub fn adjacent(&self, u: NodeIndex, v: NodeIndex) -> bool {
        self.graph.find_edge(u, v).is_some()
    }
    pub fn degree(&self, v: NodeIndex) -> usize {
        self.graph.edges(v).count()
    }
    pub fn other_end(&self, e: EdgeIndex, v: NodeIndex) -> NodeIndex {
        let (s, t) = self.graph.edge_endpoints(e).expect("edge in graph");
        if s == v {
            t
        } else {
            s
        }
    }

    /// Incident edges of `v` in insertion order (petgraph iterates its
    /// adjacency chains newest first, the matching and stereo passes are
    /// defined oldest first; edge indices grow in insertion order)
    pub fn incident(&self, v: NodeIndex) -> SmallVec<(EdgeIndex, NodeIndex), 4> {
        let mut out: SmallVec<(EdgeIndex, NodeIndex), 4> = self
            .graph
            .edges(v)
            .map(|e| {
                let w = if e.source() == v {
                    e.target()
                } else {
                    e.source()
                };
                (e.id(), w)
            })
            .collect();
        out.sort_unstable_by_key(|&(e, _)| e.index());
        out
    }

    /// Label of `e` as seen from endpoint `v`; directional labels flip when
    /// the edge is stored pointing the other way
    pub fn bond_from(&self, e: EdgeIndex, v: NodeIndex) -> Bond {
        let (s, _) = self.graph.edge_endpoints(e).expect("edge in graph");
        let b = self.graph[e];
        if s == v {
            b
        } else {
            b.inverse()
        }
    }
    pub fn set_bond_from(&mut self, e: EdgeIndex, v: NodeIndex, b: Bond) {
        let (s, _) = self.graph.edge_endpoints(e).expect("edge in graph");
        self.graph[e] = if s == v { b } else { b.inverse() };
    }

    /// Sum of the incident bond orders
    pub fn bonded_valence(&self, v: NodeIndex) -> u32 {
        self.graph.edges(v).map(|e| e.weight().order() as u32).sum()
    }

    /// Explicit hydrogen count for expanded atoms, derived from the default
    /// valences for subset shorthand (plus one delocalised electron when the
    /// atom is aromatic)
    pub fn implicit_h_count(&self, v: NodeIndex) -> u8 {
        let a = self.atom(v);
        if a.is_subset() {
            let pi = a.is_aromatic() as u32;
            a.element.implicit_hydrogens(self.bonded_valence(v) + pi)
        } else {
            a.hydrogens()
        }
    }

    pub fn topology_of(&self, v: NodeIndex) -> Option<&Topology> {
        self.topology.get(&v)
    }
    pub fn set_topology(&mut self, t: Topology) {
        self.topology.insert(t.focus(), t);
    }

    /// Independent copy with vertices renumbered so `order[k]` lands at `k`.
    /// Edges are re-inserted in a deterministic order and topologies are
    /// rewritten to the new numbering.
    pub fn reordered(&self, order: &[NodeIndex]) -> Molecule {
        let mut new_of = vec![NodeIndex::end(); self.graph.node_count()];
        let mut out = Molecule::with_capacity(self.graph.node_count(), self.graph.edge_count());
        out.has_arom = self.has_arom;
        for &old in order {
            new_of[old.index()] = out.graph.add_node(self.graph[old]);
        }
        let mut edges: Vec<(NodeIndex, NodeIndex, Bond)> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (s, t) = self.graph.edge_endpoints(e)?;
                Some((new_of[s.index()], new_of[t.index()], self.graph[e]))
            })
            .collect();
        edges.sort_by_key(|&(s, t, _)| (s.index().min(t.index()), s.index().max(t.index())));
        for (s, t, b) in edges {
            out.graph.add_edge(s, t, b);
        }
        for t in self.topology.values() {
            out.set_topology(t.remap(&new_of));
        }
        out
    }
}
