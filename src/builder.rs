//! Builders for [`ChipGraph`](crate::ChipGraph)s.

use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;

use crate::graph::{ChipGraph, Multiplicity, VertexIndex};

/// Reasons a builder may become invalid while building.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BuilderInvalidReason {
    /// An edge was added from a vertex to itself.
    #[error("self-loop at vertex {0}")]
    SelfLoop(String),
    /// An edge was added with multiplicity 0.
    #[error("edge {0}-{1} has multiplicity 0")]
    ZeroMultiplicity(String, String),
    /// An edge was added touching a vertex which was never declared.
    #[error("vertex {0} not found in graph")]
    UnknownVertex(String),
    /// The graph has no vertices at all.
    #[error("graph has no vertices")]
    NoVertices,
    /// Some vertex cannot be reached from another; chip-firing is only defined on connected graphs.
    #[error("graph is not connected")]
    Disconnected,
}

/// A builder for [`ChipGraph`]s.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Once invalid, every further call does nothing; [`Self::build`] then reports why.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    vertices: BTreeSet<String>,
    // parallel edges are accumulated, keyed by name in either order
    edges: HashMap<(String, String), Multiplicity>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl GraphBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder with the given vertices already declared.
    pub fn with_vertices<S: AsRef<str>>(names: impl IntoIterator<Item=S>) -> Self {
        let mut ret = Self::new();
        for name in names {
            ret.add_vertex(name.as_ref());
        }

        ret
    }

    /// Declare a vertex. Declaring the same name twice has no further effect.
    ///
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_vertex(&mut self, name: &str) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.vertices.insert(name.to_string());
        self
    }

    /// Add `multiplicity` parallel edges between `a` and `b`, on top of any already present.
    ///
    /// Both vertices must already be declared.
    /// May cause the builder to enter a [`SelfLoop`](BuilderInvalidReason::SelfLoop),
    /// [`ZeroMultiplicity`](BuilderInvalidReason::ZeroMultiplicity) or [`UnknownVertex`](BuilderInvalidReason::UnknownVertex) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_edge(&mut self, a: &str, b: &str, multiplicity: Multiplicity) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        for name in [a, b] {
            if !self.vertices.contains(name) {
                self.invalid_reasons.push(BuilderInvalidReason::UnknownVertex(name.to_string()));
                return self;
            }
        }

        if a == b {
            self.invalid_reasons.push(BuilderInvalidReason::SelfLoop(a.to_string()));
            return self;
        }

        if multiplicity == 0 {
            self.invalid_reasons.push(BuilderInvalidReason::ZeroMultiplicity(a.to_string(), b.to_string()));
            return self;
        }

        let key = if a < b { (a.to_string(), b.to_string()) } else { (b.to_string(), a.to_string()) };
        *self.edges.entry(key).or_default() += multiplicity;
        self
    }

    /// Shorthand for multiple calls to [`Self::add_edge`], with the same conditions.
    pub fn add_edges<'a>(&mut self, edges: impl IntoIterator<Item=(&'a str, &'a str, Multiplicity)>) -> &mut Self {
        for (a, b, multiplicity) in edges {
            self.add_edge(a, b, multiplicity);
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    /// Connectivity is only checked by [`Self::build`].
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`ChipGraph`].
    /// If the builder is invalid for any reason, including the graph being empty or disconnected,
    /// a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&mut self) -> Result<ChipGraph, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        if self.vertices.is_empty() {
            self.invalid_reasons.push(BuilderInvalidReason::NoVertices);
            return Err(&self.invalid_reasons);
        }

        // BTreeSet iterates in name order, so indices follow names
        let names = self.vertices.iter().cloned().collect_vec();
        let lookup: HashMap<String, VertexIndex> = names.iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();

        let mut graph = UnGraphMap::with_capacity(names.len(), self.edges.len());
        for index in 0..names.len() {
            graph.add_node(index);
        }
        for ((a, b), multiplicity) in self.edges.iter().sorted() {
            graph.add_edge(lookup[a], lookup[b], *multiplicity);
        }

        let mut bfs = Bfs::new(&graph, 0);
        let mut reached = 0;
        while bfs.next(&graph).is_some() {
            reached += 1;
        }
        if reached != names.len() {
            self.invalid_reasons.push(BuilderInvalidReason::Disconnected);
            return Err(&self.invalid_reasons);
        }

        Ok(ChipGraph {
            graph,
            names,
            lookup,
        })
    }
}
