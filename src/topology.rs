//! Per-vertex stereo descriptors

use petgraph::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winding {
    Clockwise,
    AntiClockwise,
}
impl Winding {
    pub fn flip(self) -> Self {
        match self {
            Self::Clockwise => Self::AntiClockwise,
            Self::AntiClockwise => Self::Clockwise,
        }
    }
}

/// Stereo descriptor attached to a vertex. Directional bond labels cover
/// double-bond geometry; this covers atom-centred arrangements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// Tetrahedral centre: `order[0]` is the viewpoint, the remaining three
    /// wind clockwise or anti-clockwise when seen from it
    Tetrahedral {
        focus: NodeIndex,
        order: [NodeIndex; 4],
        winding: Winding,
    },
}
impl Topology {
    pub fn tetrahedral(focus: NodeIndex, order: [NodeIndex; 4], winding: Winding) -> Self {
        Self::Tetrahedral {
            focus,
            order,
            winding,
        }
    }
    pub fn focus(&self) -> NodeIndex {
        match self {
            Self::Tetrahedral { focus, .. } => *focus,
        }
    }
    /// Rewrite vertex references under a renumbering (`map[old] = new`)
    pub fn remap(&self, map: &[NodeIndex]) -> Self {
        match self {
            Self::Tetrahedral {
                focus,
                order,
                winding,
            } => Self::Tetrahedral {
                focus: map[focus.index()],
                order: order.map(|v| map[v.index()]),
                winding: *winding,
            },
        }
    }
}
