use std::collections::HashSet;
use std::ops::Add;

use ndarray::{Array1, Array2};

use crate::divisor::Divisor;
use crate::error::ChipFiringError;
use crate::graph::{ChipGraph, Chips, VertexIndex};

/// Net number of times each vertex fires; negative entries are borrows.
///
/// Applying a script through the [`Laplacian`] is order independent,
/// so any sequence of moves collapses to one script.
#[derive(Clone, Debug)]
pub struct FiringScript<'g> {
    pub(crate) graph: &'g ChipGraph,
    pub(crate) firings: Array1<Chips>,
}

impl<'g> FiringScript<'g> {
    /// Construct a script from `(vertex name, net firings)` pairs. Vertices not mentioned fire 0 times.
    pub fn new(graph: &'g ChipGraph, firings: &[(&str, Chips)]) -> Result<Self, ChipFiringError> {
        let mut seen = HashSet::with_capacity(firings.len());
        let mut ret = Self::empty(graph);

        for (name, count) in firings {
            if !seen.insert(*name) {
                return Err(ChipFiringError::DuplicateVertex(name.to_string()));
            }
            ret.firings[graph.require(name)?] = *count;
        }

        Ok(ret)
    }

    /// The script in which nothing fires.
    pub fn empty(graph: &'g ChipGraph) -> Self {
        Self { graph, firings: Array1::zeros(graph.vertex_count()) }
    }

    /// The script firing every vertex of `names` once.
    pub fn from_set<'a>(graph: &'g ChipGraph, names: impl IntoIterator<Item=&'a str>) -> Result<Self, ChipFiringError> {
        let mut ret = Self::empty(graph);
        for name in names {
            ret.firings[graph.require(name)?] = 1;
        }

        Ok(ret)
    }

    /// Net firings of the vertex called `name`.
    pub fn firings(&self, name: &str) -> Result<Chips, ChipFiringError> {
        Ok(self.firings[self.graph.require(name)?])
    }

    pub(crate) fn record(&mut self, set: &HashSet<VertexIndex>, times: Chips) {
        for &vertex in set {
            self.firings[vertex] += times;
        }
    }

    /// Whether every vertex fires the same number of times, which leaves any divisor unchanged.
    pub fn is_trivial(&self) -> bool {
        self.firings.iter().all(|count| *count == self.firings[0])
    }
}

/// Panics if the two scripts live on different graphs.
impl<'g> Add for &FiringScript<'g> {
    type Output = FiringScript<'g>;

    fn add(self, rhs: Self) -> Self::Output {
        assert!(self.graph.same_as(rhs.graph), "cannot add firing scripts on different graphs");
        FiringScript { graph: self.graph, firings: &self.firings + &rhs.firings }
    }
}

/// The Laplacian matrix L of a [`ChipGraph`], with rows and columns in vertex index order.
///
/// L(v, v) is the valence of v and L(v, w) is minus the number of edges joining v and w.
/// Firing script s takes divisor D to D - L s.
pub struct Laplacian<'g> {
    graph: &'g ChipGraph,
    matrix: Array2<Chips>,
}

impl<'g> From<&'g ChipGraph> for Laplacian<'g> {
    fn from(graph: &'g ChipGraph) -> Self {
        let mut matrix = Array2::zeros((graph.vertex_count(), graph.vertex_count()));
        for v in 0..graph.vertex_count() {
            matrix[[v, v]] = graph.valence_of(v) as Chips;
            for (w, m) in graph.neighbors_of(v) {
                matrix[[v, w]] = -(m as Chips);
            }
        }

        Self { graph, matrix }
    }
}

impl<'g> Laplacian<'g> {
    /// The matrix itself.
    pub fn matrix(&self) -> &Array2<Chips> {
        &self.matrix
    }

    /// The entry L(v, w).
    pub fn entry(&self, v: &str, w: &str) -> Result<Chips, ChipFiringError> {
        Ok(self.matrix[[self.graph.require(v)?, self.graph.require(w)?]])
    }

    /// Compute D - L s, the divisor reached from `divisor` by running `script`.
    ///
    /// Fails with [`GraphMismatch`](ChipFiringError::GraphMismatch) if either argument lives on another graph.
    pub fn apply(&self, divisor: &Divisor<'g>, script: &FiringScript<'g>) -> Result<Divisor<'g>, ChipFiringError> {
        if !self.graph.same_as(divisor.graph) || !self.graph.same_as(script.graph) {
            return Err(ChipFiringError::GraphMismatch);
        }

        Ok(Divisor::from_array(divisor.graph, &divisor.degrees - &self.matrix.dot(&script.firings)))
    }
}
