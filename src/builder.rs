//! Incremental construction of molecule graphs.
//!
//! The builder accumulates atoms, bonds and stereo declarations, then
//! finalisation suppresses implicit hydrogens and commits the declared
//! double-bond configurations as directional labels.

use crate::atom_info::Element;
use crate::molecule::{Atom, Bond, Molecule};
use crate::stereo::{self, DoubleBondConfig, GeometricSpec, GeometryError};
use crate::topology::{Topology, Winding};
use petgraph::prelude::*;
use tracing::*;

#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    mol: Molecule,
    /// Running bond-order sum per vertex
    valence: Vec<u32>,
    pending: Vec<GeometricSpec>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_capacity(atoms: usize) -> Self {
        Self {
            mol: Molecule::with_capacity(atoms, atoms),
            valence: Vec::with_capacity(atoms),
            pending: Vec::new(),
        }
    }

    pub fn atom(mut self, a: Atom) -> Self {
        self.mol.add_atom(a);
        self.valence.push(0);
        self
    }
    /// Add an aliphatic atom of `element` with `h` explicit hydrogens
    pub fn aliphatic(self, element: Element, h: u8) -> Self {
        self.atom(Atom::aliphatic(element).with_hydrogens(h))
    }
    /// Add a delocalised atom of `element` with `h` explicit hydrogens
    pub fn aromatic(self, element: Element, h: u8) -> Self {
        self.atom(Atom::aromatic(element).with_hydrogens(h))
    }

    pub fn bond(mut self, u: usize, v: usize, mut b: Bond) -> Self {
        let (nu, nv) = (NodeIndex::new(u), NodeIndex::new(v));
        let arom_u = self.mol.atom(nu).is_aromatic();
        let arom_v = self.mol.atom(nv).is_aromatic();
        if b == Bond::Single && (!arom_u || !arom_v) {
            b = Bond::Implicit;
        } else if b == Bond::Aromatic && arom_u && arom_v {
            b = Bond::Implicit;
        }
        self.mol.add_bond(nu, nv, b);
        self.valence[u] += b.order() as u32;
        self.valence[v] += b.order() as u32;
        self
    }
    /// Connect `u` and `v` with an implicit bond
    pub fn connect(self, u: usize, v: usize) -> Self {
        self.bond(u, v, Bond::Implicit)
    }
    pub fn single_bond(self, u: usize, v: usize) -> Self {
        if self.mol.atom(NodeIndex::new(u)).is_aromatic()
            && self.mol.atom(NodeIndex::new(v)).is_aromatic()
        {
            self.bond(u, v, Bond::Single)
        } else {
            self.bond(u, v, Bond::Implicit)
        }
    }
    pub fn aromatic_bond(self, u: usize, v: usize) -> Self {
        if self.mol.atom(NodeIndex::new(u)).is_aromatic()
            && self.mol.atom(NodeIndex::new(v)).is_aromatic()
        {
            self.bond(u, v, Bond::Implicit)
        } else {
            self.bond(u, v, Bond::Aromatic)
        }
    }
    pub fn double_bond(self, u: usize, v: usize) -> Self {
        self.bond(u, v, Bond::Double)
    }

    /// Start declaring the configuration of the double bond `u = v`
    pub fn geometric(self, u: usize, v: usize) -> GeometricBuilder {
        GeometricBuilder { gb: self, u, v }
    }
    /// Start declaring a tetrahedral centre at `u`
    pub fn tetrahedral(self, u: usize) -> TetrahedralBuilder {
        TetrahedralBuilder { gb: self, focus: u }
    }

    // collapse expanded atoms whose stored hydrogen count is exactly what
    // their valence implies anyway
    fn suppress(&mut self) {
        for v in self.mol.graph.node_indices() {
            if self.mol.topology_of(v).is_some() {
                continue;
            }
            let a = self.mol.atom(v);
            if suppressible(a, self.valence[v.index()]) {
                self.mol.set_atom(v, a.to_subset());
            }
        }
    }

    /// Finalise: suppress implicit hydrogens, then commit the pending
    /// double-bond configurations. Declarations committed before a failing
    /// one stay committed.
    #[instrument(level = "debug", skip_all, fields(atoms = self.mol.graph.node_count()))]
    pub fn build(mut self) -> Result<Molecule, GeometryError> {
        self.suppress();
        let pending = std::mem::take(&mut self.pending);
        stereo::assign_directional_labels(&mut self.mol, pending)?;
        Ok(self.mol)
    }
}

fn suppressible(a: Atom, valence: u32) -> bool {
    if a.is_subset()
        || !a.element.organic()
        || a.isotope >= 0
        || a.charge != 0
        || a.atom_class() != 0
    {
        return false;
    }
    let h = a.hydrogens();
    if a.is_aromatic() {
        h == a.element.implicit_hydrogens(1 + valence)
    } else {
        h == a.element.implicit_hydrogens(valence)
    }
}

/// Fluent assembly of a double-bond configuration; the terminal methods
/// hand the graph builder back
#[derive(Debug)]
pub struct GeometricBuilder {
    gb: GraphBuilder,
    u: usize,
    v: usize,
}
impl GeometricBuilder {
    /// The reference neighbours `x` (of `u`) and `y` (of `v`) are on the
    /// same side
    pub fn together(self, x: usize, y: usize) -> GraphBuilder {
        self.configure(x, y, DoubleBondConfig::Together)
    }
    /// The reference neighbours are on opposite sides
    pub fn opposite(self, x: usize, y: usize) -> GraphBuilder {
        self.configure(x, y, DoubleBondConfig::Opposite)
    }
    /// Record the reference neighbours without fixing a geometry; skipped
    /// when committing
    pub fn unspecified(self, x: usize, y: usize) -> GraphBuilder {
        self.configure(x, y, DoubleBondConfig::Unspecified)
    }
    fn configure(mut self, x: usize, y: usize, config: DoubleBondConfig) -> GraphBuilder {
        self.gb.pending.push(GeometricSpec {
            u: NodeIndex::new(self.u),
            v: NodeIndex::new(self.v),
            x: NodeIndex::new(x),
            y: NodeIndex::new(y),
            config,
        });
        self.gb
    }
}

/// Fluent assembly of a tetrahedral centre; each step narrows the type so a
/// half-declared configuration cannot reach the graph
#[derive(Debug)]
pub struct TetrahedralBuilder {
    gb: GraphBuilder,
    focus: usize,
}
impl TetrahedralBuilder {
    /// The neighbour the centre is viewed from
    pub fn looking_from(self, v: usize) -> TetrahedralViewpoint {
        TetrahedralViewpoint {
            gb: self.gb,
            focus: self.focus,
            from: v,
        }
    }
}

#[derive(Debug)]
pub struct TetrahedralViewpoint {
    gb: GraphBuilder,
    focus: usize,
    from: usize,
}
impl TetrahedralViewpoint {
    /// The remaining three neighbours, in the order they wind
    pub fn neighbors(self, a: usize, b: usize, c: usize) -> TetrahedralNeighbors {
        TetrahedralNeighbors {
            gb: self.gb,
            focus: self.focus,
            from: self.from,
            vs: [a, b, c],
        }
    }
}

#[derive(Debug)]
pub struct TetrahedralNeighbors {
    gb: GraphBuilder,
    focus: usize,
    from: usize,
    vs: [usize; 3],
}
impl TetrahedralNeighbors {
    pub fn winding(mut self, winding: Winding) -> GraphBuilder {
        let t = Topology::tetrahedral(
            NodeIndex::new(self.focus),
            [
                NodeIndex::new(self.from),
                NodeIndex::new(self.vs[0]),
                NodeIndex::new(self.vs[1]),
                NodeIndex::new(self.vs[2]),
            ],
            winding,
        );
        self.gb.mol.set_topology(t);
        self.gb
    }
    /// Negative parity winds anti-clockwise, anything else clockwise
    pub fn parity(self, p: i8) -> GraphBuilder {
        self.winding(if p < 0 {
            Winding::AntiClockwise
        } else {
            Winding::Clockwise
        })
    }
}
