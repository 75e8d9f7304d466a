use std::collections::HashMap;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;

use crate::error::ChipFiringError;

/// Position of a vertex in its [`ChipGraph`].
///
/// Indices are handed out once, at build time, in ascending order of vertex name.
/// Every algorithm in this crate which must break a tie between vertices does so by lowest index.
pub type VertexIndex = usize;
/// Number of parallel edges joining two vertices. Always positive for adjacent vertices.
pub type Multiplicity = u32;
/// Number of chips (or dollars) on a vertex. Negative values are debt.
pub type Chips = i64;

/// A finite, connected, undirected multigraph without loops, on which chips are fired.
///
/// [`ChipGraph`]s are immutable and should be built using a [`GraphBuilder`](crate::builder::GraphBuilder).
/// Everything else in this crate ([`Divisor`](crate::Divisor), [`Orientation`](crate::Orientation), ...) borrows one.
#[derive(Clone, Debug)]
pub struct ChipGraph {
    // parallel edges are collapsed into a single edge weighted by multiplicity
    pub(crate) graph: UnGraphMap<VertexIndex, Multiplicity>,
    pub(crate) names: Vec<String>,
    pub(crate) lookup: HashMap<String, VertexIndex>,
}

impl ChipGraph {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.names.len()
    }

    /// Number of edges, counting parallel edges individually.
    pub fn edge_count(&self) -> usize {
        self.graph.all_edges().map(|(_, _, m)| *m as usize).sum()
    }

    /// Vertex names, in index order.
    pub fn vertices(&self) -> impl Iterator<Item=&str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Look up the index of the vertex called `name`.
    pub fn vertex_index(&self, name: &str) -> Option<VertexIndex> {
        self.lookup.get(name).copied()
    }

    /// Name of the vertex at `index`.
    ///
    /// Panics if `index` is not less than [`Self::vertex_count`].
    pub fn vertex_name(&self, index: VertexIndex) -> &str {
        &self.names[index]
    }

    pub(crate) fn require(&self, name: &str) -> Result<VertexIndex, ChipFiringError> {
        self.vertex_index(name).ok_or_else(|| ChipFiringError::UnknownVertex(name.to_string()))
    }

    /// Number of edges incident to `name`, counting multiplicity.
    pub fn valence(&self, name: &str) -> Result<Multiplicity, ChipFiringError> {
        Ok(self.valence_of(self.require(name)?))
    }

    #[inline]
    pub(crate) fn valence_of(&self, vertex: VertexIndex) -> Multiplicity {
        self.graph.edges(vertex).map(|(_, _, m)| *m).sum()
    }

    /// Number of edges joining `a` and `b`; 0 if they are not adjacent.
    pub fn multiplicity(&self, a: &str, b: &str) -> Result<Multiplicity, ChipFiringError> {
        Ok(self.multiplicity_of(self.require(a)?, self.require(b)?))
    }

    #[inline]
    pub(crate) fn multiplicity_of(&self, a: VertexIndex, b: VertexIndex) -> Multiplicity {
        self.graph.edge_weight(a, b).copied().unwrap_or(0)
    }

    /// Neighbors of `name` along with the multiplicity of the edge to each, sorted by neighbor name.
    pub fn neighbors_with_weights(&self, name: &str) -> Result<Vec<(&str, Multiplicity)>, ChipFiringError> {
        let vertex = self.require(name)?;
        Ok(self.neighbors_of(vertex)
            .sorted()
            .map(|(neighbor, m)| (self.vertex_name(neighbor), m))
            .collect_vec())
    }

    #[inline]
    pub(crate) fn neighbors_of(&self, vertex: VertexIndex) -> impl Iterator<Item=(VertexIndex, Multiplicity)> + '_ {
        self.graph.edges(vertex).map(move |(a, b, m)| (if a == vertex { b } else { a }, *m))
    }

    /// The genus |E| - |V| + 1 of this graph, i.e. its first Betti number, counting parallel edges.
    pub fn genus(&self) -> Chips {
        self.edge_count() as Chips - self.vertex_count() as Chips + 1
    }

    /// The smallest number of distinct neighbors of any vertex.
    ///
    /// This is the minimum degree of the underlying simple graph.
    pub fn min_neighbor_count(&self) -> usize {
        (0..self.vertex_count())
            .map(|v| self.graph.neighbors(v).count())
            .min()
            .unwrap_or(0)
    }

    /// All edges as `(lower, higher, multiplicity)`, ordered by endpoints.
    pub(crate) fn sorted_edges(&self) -> Vec<(VertexIndex, VertexIndex, Multiplicity)> {
        self.graph.all_edges()
            .map(|(a, b, m)| (a.min(b), a.max(b), *m))
            .sorted()
            .collect_vec()
    }

    /// Whether `self` and `other` are the same graph, either by reference or structurally.
    pub(crate) fn same_as(&self, other: &ChipGraph) -> bool {
        std::ptr::eq(self, other) || self == other
    }
}

impl PartialEq for ChipGraph {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names && self.sorted_edges() == other.sorted_edges()
    }
}

impl Eq for ChipGraph {}
