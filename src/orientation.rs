use std::collections::HashMap;

use itertools::Itertools;
use ndarray::Array1;
use strum::{Display, VariantArray};
use unordered_pair::UnorderedPair;

use crate::divisor::Divisor;
use crate::error::ChipFiringError;
use crate::graph::{ChipGraph, Chips, Multiplicity, VertexIndex};

/// The state of an edge `(u, v)`, relative to the order in which `u` and `v` were asked about.
#[derive(Copy, Clone, Debug, Default, Display, Eq, Hash, PartialEq, VariantArray)]
pub enum OrientationState {
    /// The edge is undirected.
    #[default]
    NoOrientation,
    /// The edge points from `u` to `v`.
    SourceToSink,
    /// The edge points from `v` to `u`.
    SinkToSource,
}

/// A partial orientation of the edges of a [`ChipGraph`].
///
/// All parallel edges between a pair of vertices share one direction.
/// Once an edge is oriented, orienting it the other way is an error.
#[derive(Clone, Debug)]
pub struct Orientation<'g> {
    graph: &'g ChipGraph,
    // edge -> source vertex
    sources: HashMap<UnorderedPair<VertexIndex>, VertexIndex>,
}

impl<'g> Orientation<'g> {
    /// An orientation of `graph` with no edge oriented.
    pub fn new(graph: &'g ChipGraph) -> Self {
        Self { graph, sources: HashMap::new() }
    }

    /// Orient each `(source, sink)` edge in turn; see [`Self::set_orientation`].
    pub fn from_pairs(graph: &'g ChipGraph, pairs: &[(&str, &str)]) -> Result<Self, ChipFiringError> {
        let mut ret = Self::new(graph);
        for (source, sink) in pairs {
            ret.set_orientation(source, sink)?;
        }

        Ok(ret)
    }

    /// The graph this orientation lives on.
    pub fn graph(&self) -> &'g ChipGraph {
        self.graph
    }

    fn edge(&self, a: &str, b: &str) -> Result<(VertexIndex, VertexIndex), ChipFiringError> {
        match (self.graph.vertex_index(a), self.graph.vertex_index(b)) {
            (Some(a), Some(b)) if self.graph.multiplicity_of(a, b) > 0 => Ok((a, b)),
            _ => Err(ChipFiringError::UnknownEdge(a.to_string(), b.to_string())),
        }
    }

    /// Point the edge between `source` and `sink` towards `sink`.
    ///
    /// Fails with [`UnknownEdge`](ChipFiringError::UnknownEdge) if the two are not adjacent,
    /// or with [`OrientationConflict`](ChipFiringError::OrientationConflict) if the edge already points the other way.
    /// Repeating an existing orientation does nothing.
    pub fn set_orientation(&mut self, source: &str, sink: &str) -> Result<(), ChipFiringError> {
        let (source, sink) = self.edge(source, sink)?;
        self.orient(source, sink)
    }

    pub(crate) fn orient(&mut self, source: VertexIndex, sink: VertexIndex) -> Result<(), ChipFiringError> {
        let existing = *self.sources.entry(UnorderedPair(source, sink)).or_insert(source);
        if existing != source {
            return Err(ChipFiringError::OrientationConflict(
                self.graph.vertex_name(source).to_string(),
                self.graph.vertex_name(sink).to_string(),
            ));
        }

        Ok(())
    }

    pub(crate) fn state_of(&self, u: VertexIndex, v: VertexIndex) -> OrientationState {
        match self.sources.get(&UnorderedPair(u, v)) {
            None => OrientationState::NoOrientation,
            Some(source) if *source == u => OrientationState::SourceToSink,
            Some(_) => OrientationState::SinkToSource,
        }
    }

    /// The state of the edge between `u` and `v`, read from `u` towards `v`.
    pub fn state(&self, u: &str, v: &str) -> Result<OrientationState, ChipFiringError> {
        let (u, v) = self.edge(u, v)?;
        Ok(self.state_of(u, v))
    }

    /// The edge between `u` and `v` as `(source, sink)`, or `None` if it is not oriented.
    pub fn get_orientation(&self, u: &str, v: &str) -> Result<Option<(&'g str, &'g str)>, ChipFiringError> {
        let (u, v) = self.edge(u, v)?;
        let graph = self.graph;
        Ok(match self.state_of(u, v) {
            OrientationState::NoOrientation => None,
            OrientationState::SourceToSink => Some((graph.vertex_name(u), graph.vertex_name(v))),
            OrientationState::SinkToSource => Some((graph.vertex_name(v), graph.vertex_name(u))),
        })
    }

    /// Whether `u` is the source of the edge to `v`; `None` if the edge is not oriented.
    pub fn is_source(&self, u: &str, v: &str) -> Result<Option<bool>, ChipFiringError> {
        Ok(match self.state(u, v)? {
            OrientationState::NoOrientation => None,
            state => Some(state == OrientationState::SourceToSink),
        })
    }

    /// Whether `u` is the sink of the edge from `v`; `None` if the edge is not oriented.
    pub fn is_sink(&self, u: &str, v: &str) -> Result<Option<bool>, ChipFiringError> {
        Ok(self.is_source(u, v)?.map(|source| !source))
    }

    /// Number of oriented edges (with multiplicity) pointing into `name`.
    pub fn in_degree(&self, name: &str) -> Result<Multiplicity, ChipFiringError> {
        Ok(self.in_degree_of(self.graph.require(name)?))
    }

    /// Number of oriented edges (with multiplicity) pointing out of `name`.
    pub fn out_degree(&self, name: &str) -> Result<Multiplicity, ChipFiringError> {
        Ok(self.out_degree_of(self.graph.require(name)?))
    }

    pub(crate) fn in_degree_of(&self, vertex: VertexIndex) -> Multiplicity {
        self.graph.neighbors_of(vertex)
            .filter(|(neighbor, _)| self.state_of(vertex, *neighbor) == OrientationState::SinkToSource)
            .map(|(_, m)| m)
            .sum()
    }

    pub(crate) fn out_degree_of(&self, vertex: VertexIndex) -> Multiplicity {
        self.graph.neighbors_of(vertex)
            .filter(|(neighbor, _)| self.state_of(vertex, *neighbor) == OrientationState::SourceToSink)
            .map(|(_, m)| m)
            .sum()
    }

    /// Whether every edge of the graph is oriented.
    pub fn is_full(&self) -> bool {
        self.sources.len() == self.graph.graph.edge_count()
    }

    /// Oriented edges as `(source, sink)` names, ordered by source then sink.
    pub fn oriented_edges(&self) -> Vec<(&'g str, &'g str)> {
        let graph = self.graph;
        self.sources.iter()
            .map(|(UnorderedPair(a, b), source)| (*source, if a == source { *b } else { *a }))
            .sorted()
            .map(|(source, sink)| (graph.vertex_name(source), graph.vertex_name(sink)))
            .collect_vec()
    }

    /// The same orientation with every oriented edge pointing the other way.
    pub fn reversed(&self) -> Self {
        Self {
            graph: self.graph,
            sources: self.sources.iter()
                .map(|(pair, source)| (*pair, if pair.0 == *source { pair.1 } else { pair.0 }))
                .collect(),
        }
    }

    /// The divisor D_O with D_O(v) = indeg(v) - 1.
    ///
    /// For a full orientation this has degree genus - 1.
    pub fn divisor(&self) -> Divisor<'g> {
        Divisor::from_array(self.graph, Array1::from_shape_fn(
            self.graph.vertex_count(),
            |v| self.in_degree_of(v) as Chips - 1,
        ))
    }

    /// The canonical divisor K, K(v) = valence(v) - 2.
    ///
    /// For a full orientation O this equals D_O + D_rev(O); otherwise it is computed from valences directly.
    pub fn canonical_divisor(&self) -> Divisor<'g> {
        if self.is_full() {
            &self.divisor() + &self.reversed().divisor()
        } else {
            Divisor::canonical(self.graph)
        }
    }
}
