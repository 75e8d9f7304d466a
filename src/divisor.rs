use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Neg, Sub};

use itertools::Itertools;
use ndarray::Array1;

use crate::error::ChipFiringError;
use crate::graph::{ChipGraph, Chips, VertexIndex};

/// A chip configuration: an integer number of chips on every vertex of a [`ChipGraph`].
///
/// Negative values are debt. A divisor is *effective* if no vertex is in debt.
/// Firing and borrowing moves redistribute chips along edges and never change [`Self::total_degree`].
#[derive(Clone, Debug)]
pub struct Divisor<'g> {
    pub(crate) graph: &'g ChipGraph,
    pub(crate) degrees: Array1<Chips>,
}

impl<'g> Divisor<'g> {
    /// Construct a divisor from `(vertex name, chips)` pairs. Vertices not mentioned get 0 chips.
    ///
    /// Fails with [`DuplicateVertex`](ChipFiringError::DuplicateVertex) if a name is given twice,
    /// or [`UnknownVertex`](ChipFiringError::UnknownVertex) if a name is not in `graph`.
    pub fn new(graph: &'g ChipGraph, degrees: &[(&str, Chips)]) -> Result<Self, ChipFiringError> {
        let mut seen = HashSet::with_capacity(degrees.len());
        let mut ret = Self::zero(graph);

        for (name, chips) in degrees {
            if !seen.insert(*name) {
                return Err(ChipFiringError::DuplicateVertex(name.to_string()));
            }
            ret.degrees[graph.require(name)?] = *chips;
        }

        Ok(ret)
    }

    /// The divisor with no chips anywhere.
    pub fn zero(graph: &'g ChipGraph) -> Self {
        Self { graph, degrees: Array1::zeros(graph.vertex_count()) }
    }

    /// The canonical divisor K, with K(v) = valence(v) - 2.
    pub fn canonical(graph: &'g ChipGraph) -> Self {
        Self {
            graph,
            degrees: Array1::from_shape_fn(graph.vertex_count(), |v| graph.valence_of(v) as Chips - 2),
        }
    }

    pub(crate) fn from_array(graph: &'g ChipGraph, degrees: Array1<Chips>) -> Self {
        debug_assert_eq!(degrees.len(), graph.vertex_count());
        Self { graph, degrees }
    }

    /// The graph this divisor lives on.
    pub fn graph(&self) -> &'g ChipGraph {
        self.graph
    }

    /// Chips on the vertex called `name`.
    pub fn degree(&self, name: &str) -> Result<Chips, ChipFiringError> {
        Ok(self.degrees[self.graph.require(name)?])
    }

    #[inline]
    pub(crate) fn at(&self, vertex: VertexIndex) -> Chips {
        self.degrees[vertex]
    }

    /// Overwrite the chips on the vertex called `name`.
    pub fn set_degree(&mut self, name: &str, chips: Chips) -> Result<(), ChipFiringError> {
        let vertex = self.graph.require(name)?;
        self.degrees[vertex] = chips;
        Ok(())
    }

    /// Sum of chips over all vertices.
    pub fn total_degree(&self) -> Chips {
        self.degrees.sum()
    }

    /// Whether no vertex is in debt.
    pub fn is_effective(&self) -> bool {
        self.degrees.iter().all(|chips| *chips >= 0)
    }

    /// `(vertex name, chips)` pairs, in index order.
    pub fn iter(&self) -> impl Iterator<Item=(&'g str, Chips)> + '_ {
        let graph = self.graph;
        self.degrees.iter().enumerate().map(move |(v, chips)| (graph.vertex_name(v), *chips))
    }

    /// Chips per vertex, in index order.
    pub fn to_vec(&self) -> Vec<Chips> {
        self.degrees.to_vec()
    }

    /// The vertex holding the fewest chips; ties go to the lowest index.
    pub(crate) fn min_vertex(&self) -> VertexIndex {
        // graphs always have at least one vertex
        self.degrees.iter().position_min().unwrap_or_default()
    }

    /// Lending move: `name` sends one chip along each incident edge.
    pub fn lend(&mut self, name: &str) -> Result<(), ChipFiringError> {
        self.fire_set([name])
    }

    /// Borrowing move: `name` receives one chip along each incident edge.
    pub fn borrow(&mut self, name: &str) -> Result<(), ChipFiringError> {
        self.borrow_set([name])
    }

    /// Fire every vertex in `names` simultaneously.
    ///
    /// Each vertex in the set sends one chip along every edge leaving the set;
    /// edges with both endpoints in the set carry chips both ways and so cancel.
    /// Repeated names are counted once.
    pub fn fire_set<'a>(&mut self, names: impl IntoIterator<Item=&'a str>) -> Result<(), ChipFiringError> {
        let set = self.resolve(names)?;
        self.fire_indices(&set, 1);
        Ok(())
    }

    /// Borrow at every vertex in `names` simultaneously; the inverse of [`Self::fire_set`].
    pub fn borrow_set<'a>(&mut self, names: impl IntoIterator<Item=&'a str>) -> Result<(), ChipFiringError> {
        let set = self.resolve(names)?;
        self.fire_indices(&set, -1);
        Ok(())
    }

    fn resolve<'a>(&self, names: impl IntoIterator<Item=&'a str>) -> Result<HashSet<VertexIndex>, ChipFiringError> {
        names.into_iter().map(|name| self.graph.require(name)).collect()
    }

    /// Fire (`times` > 0) or borrow (`times` < 0) the set `set`, `|times|` times.
    pub(crate) fn fire_indices(&mut self, set: &HashSet<VertexIndex>, times: Chips) {
        for &vertex in set {
            for (neighbor, m) in self.graph.neighbors_of(vertex) {
                if !set.contains(&neighbor) {
                    let moved = times * m as Chips;
                    self.degrees[vertex] -= moved;
                    self.degrees[neighbor] += moved;
                }
            }
        }
    }

    /// `self + other`, or [`GraphMismatch`](ChipFiringError::GraphMismatch) if they live on different graphs.
    pub fn checked_add(&self, other: &Divisor<'g>) -> Result<Divisor<'g>, ChipFiringError> {
        if !self.graph.same_as(other.graph) {
            return Err(ChipFiringError::GraphMismatch);
        }

        Ok(Self::from_array(self.graph, &self.degrees + &other.degrees))
    }

    /// `self - other`, or [`GraphMismatch`](ChipFiringError::GraphMismatch) if they live on different graphs.
    pub fn checked_sub(&self, other: &Divisor<'g>) -> Result<Divisor<'g>, ChipFiringError> {
        if !self.graph.same_as(other.graph) {
            return Err(ChipFiringError::GraphMismatch);
        }

        Ok(Self::from_array(self.graph, &self.degrees - &other.degrees))
    }
}

impl PartialEq for Divisor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.graph.same_as(other.graph) && self.degrees == other.degrees
    }
}

impl Eq for Divisor<'_> {}

/// Panics if the two divisors live on different graphs; see [`Divisor::checked_add`].
impl<'g> Add for &Divisor<'g> {
    type Output = Divisor<'g>;

    fn add(self, rhs: Self) -> Self::Output {
        match self.checked_add(rhs) {
            Ok(sum) => sum,
            Err(e) => panic!("cannot add divisors: {e}"),
        }
    }
}

/// Panics if the two divisors live on different graphs; see [`Divisor::checked_sub`].
impl<'g> Sub for &Divisor<'g> {
    type Output = Divisor<'g>;

    fn sub(self, rhs: Self) -> Self::Output {
        match self.checked_sub(rhs) {
            Ok(difference) => difference,
            Err(e) => panic!("cannot subtract divisors: {e}"),
        }
    }
}

impl<'g> Neg for &Divisor<'g> {
    type Output = Divisor<'g>;

    fn neg(self) -> Self::Output {
        Divisor::from_array(self.graph, -&self.degrees)
    }
}

impl Display for Divisor<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.iter().map(|(name, chips)| format!("{name}: {chips}")).join(", "))
    }
}
