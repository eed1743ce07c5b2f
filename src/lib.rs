//! Utilities for modeling molecules as graphs, localising their
//! delocalised bond systems, and committing double-bond stereochemistry.
// Molecules come in through the incremental builder, implicit hydrogens are
// suppressed, directional labels are committed; kekulisation runs on demand.

pub mod atom_info;
pub mod builder;
pub mod graph;
pub mod localise;
pub mod molecule;
pub mod stereo;
pub mod topology;
pub mod utils;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::atom_info::Element;
    pub use crate::builder::GraphBuilder;
    pub use crate::localise::{
        localise, localise_in_place, resonate, undecided_set, KekuleError, ResonanceError,
    };
    pub use crate::molecule::{Atom, Bond, Molecule, MoleculeGraph};
    pub use crate::stereo::{
        assign_directional_labels, DoubleBondConfig, GeometricSpec, GeometryError,
    };
    pub use crate::topology::{Topology, Winding};
}
