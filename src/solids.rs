//! Ready-made graphs: complete graphs, cycles, paths and the skeletons of the Platonic solids.

use itertools::Itertools;
use strum::{Display, EnumString, VariantArray};

use crate::builder::{BuilderInvalidReason, GraphBuilder};
use crate::graph::ChipGraph;

fn numbered(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect_vec()
}

fn build(names: &[String], edges: impl IntoIterator<Item=(usize, usize)>) -> Result<ChipGraph, Vec<BuilderInvalidReason>> {
    let mut builder = GraphBuilder::with_vertices(names);
    for (a, b) in edges {
        builder.add_edge(&names[a], &names[b], 1);
    }

    builder.build().map_err(|reasons| reasons.clone())
}

/// The complete graph on `n` vertices `v0`, `v1`, ... with one edge between every pair.
pub fn complete_graph(n: usize) -> Result<ChipGraph, Vec<BuilderInvalidReason>> {
    build(&numbered("v", n), (0..n).tuple_combinations())
}

/// The cycle on `n` vertices `v0`, `v1`, ... For `n = 2` this is two vertices joined by a double edge.
pub fn cycle_graph(n: usize) -> Result<ChipGraph, Vec<BuilderInvalidReason>> {
    build(&numbered("v", n), (0..n).map(|i| (i, (i + 1) % n)))
}

/// The path on `n` vertices `v0`, `v1`, ...
pub fn path_graph(n: usize) -> Result<ChipGraph, Vec<BuilderInvalidReason>> {
    build(&numbered("v", n), (1..n).map(|i| (i - 1, i)))
}

/// The five convex regular polyhedra, whose vertex-edge skeletons make good test graphs.
#[derive(Copy, Clone, Debug, Display, EnumString, Eq, Hash, PartialEq, VariantArray)]
#[strum(serialize_all = "lowercase")]
pub enum PlatonicSolid {
    /// 4 vertices, 6 edges; the complete graph K4 on `0` to `3`.
    Tetrahedron,
    /// 8 vertices, 12 edges; vertices are the binary strings `000` to `111`, adjacent when differing in one place.
    Cube,
    /// 6 vertices, 12 edges; `v0` to `v5`, where `v0`/`v1`, `v2`/`v3` and `v4`/`v5` are the only non-adjacent pairs.
    Octahedron,
    /// 20 vertices, 30 edges; `0` to `19`.
    Dodecahedron,
    /// 12 vertices, 30 edges; `0` to `11`.
    Icosahedron,
}

// LCF notation: vertex i of a 20-cycle also joins i + DODECAHEDRON_SHIFTS[i % 10]
const DODECAHEDRON_SHIFTS: [isize; 10] = [10, 7, 4, -4, -7, 10, -4, 7, -7, 4];

const ICOSAHEDRON_EDGES: [(usize, usize); 30] = [
    (0, 1), (0, 5), (0, 7), (0, 8), (0, 11),
    (1, 2), (1, 5), (1, 6), (1, 8),
    (2, 3), (2, 6), (2, 8), (2, 9),
    (3, 4), (3, 6), (3, 9), (3, 10),
    (4, 5), (4, 6), (4, 10), (4, 11),
    (5, 6), (5, 11),
    (7, 8), (7, 9), (7, 10), (7, 11),
    (8, 9),
    (9, 10),
    (10, 11),
];

impl PlatonicSolid {
    /// Number of vertices of the solid.
    pub fn vertex_count(self) -> usize {
        match self {
            PlatonicSolid::Tetrahedron => 4,
            PlatonicSolid::Cube => 8,
            PlatonicSolid::Octahedron => 6,
            PlatonicSolid::Dodecahedron => 20,
            PlatonicSolid::Icosahedron => 12,
        }
    }

    /// The skeleton of the solid as a [`ChipGraph`] with simple edges.
    pub fn graph(self) -> ChipGraph {
        let n = self.vertex_count();
        let built = match self {
            PlatonicSolid::Tetrahedron => build(&numbered("", n), (0..n).tuple_combinations()),
            PlatonicSolid::Cube => {
                let names = (0..n).map(|i| format!("{i:03b}")).collect_vec();
                let edges = (0..n).tuple_combinations().filter(|&(a, b): &(usize, usize)| (a ^ b).is_power_of_two());
                build(&names, edges)
            }
            PlatonicSolid::Octahedron => {
                let edges = (0..n).tuple_combinations().filter(|&(a, b): &(usize, usize)| a / 2 != b / 2);
                build(&numbered("v", n), edges)
            }
            PlatonicSolid::Dodecahedron => {
                let ring = (0..n).map(|i| (i, (i + 1) % n));
                let chords = (0..n)
                    .map(|i| (i, (i as isize + DODECAHEDRON_SHIFTS[i % 10]).rem_euclid(n as isize) as usize))
                    // each chord is listed from both ends
                    .filter(|(a, b)| a < b);
                build(&numbered("", n), ring.chain(chords))
            }
            PlatonicSolid::Icosahedron => build(&numbered("", n), ICOSAHEDRON_EDGES),
        };

        match built {
            Ok(graph) => graph,
            Err(reasons) => panic!("{self} skeleton is malformed: {reasons:?}"),
        }
    }
}
