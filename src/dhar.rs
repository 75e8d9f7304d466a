use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;
use petgraph::algo::dijkstra;
use tracing::trace;

use crate::divisor::Divisor;
use crate::error::ChipFiringError;
use crate::graph::{ChipGraph, Chips, VertexIndex};
use crate::laplacian::FiringScript;
use crate::orientation::Orientation;

/// Dhar's burning algorithm, finding the maximal legal firing set of a divisor with respect to a distinguished vertex q.
///
/// A fire starts at q. A vertex catches fire once the edges joining it to burnt vertices outnumber its chips,
/// since it could not afford to fire along all of them. Whatever never burns can fire together without going into debt.
///
/// The algorithm owns its working copy of the divisor. [`Self::send_debt_to_q`] and [`Self::legal_set_fire`] mutate it,
/// and every move made is also recorded in a [`FiringScript`], so that the starting divisor minus L times
/// [`Self::script`] is always [`Self::configuration`].
pub struct DharAlgorithm<'g> {
    graph: &'g ChipGraph,
    q: VertexIndex,
    configuration: Divisor<'g>,
    total_degree: Chips,
    script: FiringScript<'g>,
}

/// The maximal legal firing set found by [`DharAlgorithm::run`], as vertex indices in ascending order.
pub type FiringSet = BTreeSet<VertexIndex>;

impl<'g> DharAlgorithm<'g> {
    /// Prepare to burn `configuration` starting from the vertex called `q`.
    ///
    /// Fails with [`UnknownVertex`](ChipFiringError::UnknownVertex) if `q` is not in the graph.
    pub fn new(configuration: &Divisor<'g>, q: &str) -> Result<Self, ChipFiringError> {
        let q = configuration.graph.require(q)?;
        Ok(Self::with_q(configuration.clone(), q))
    }

    pub(crate) fn with_q(configuration: Divisor<'g>, q: VertexIndex) -> Self {
        let graph = configuration.graph;
        Self {
            graph,
            q,
            total_degree: configuration.total_degree(),
            configuration,
            script: FiringScript::empty(graph),
        }
    }

    /// Name of the distinguished vertex.
    pub fn q(&self) -> &'g str {
        self.graph.vertex_name(self.q)
    }

    pub(crate) fn q_index(&self) -> VertexIndex {
        self.q
    }

    /// The current working divisor.
    pub fn configuration(&self) -> &Divisor<'g> {
        &self.configuration
    }

    /// Every move made so far, as one script.
    pub fn script(&self) -> &FiringScript<'g> {
        &self.script
    }

    pub(crate) fn into_parts(self) -> (Divisor<'g>, FiringScript<'g>) {
        (self.configuration, self.script)
    }

    /// Total weight of the edges from `vertex` into `set`.
    pub fn outdegree_s(&self, vertex: VertexIndex, set: &HashSet<VertexIndex>) -> Chips {
        self.graph.neighbors_of(vertex)
            .filter(|(neighbor, _)| set.contains(neighbor))
            .map(|(_, m)| m as Chips)
            .sum()
    }

    /// Move all debt onto q, leaving every other vertex with a non-negative number of chips.
    ///
    /// Vertices are grouped by their distance from q and handled from the farthest group inwards.
    /// While some vertex at distance k is in debt, every vertex at distance k or more borrows at once.
    /// That pulls chips only from distance k - 1, leaves the farther vertices untouched,
    /// and gives every vertex at distance k at least one chip, so each group ends debt-free.
    pub fn send_debt_to_q(&mut self) {
        let distances = dijkstra(&self.graph.graph, self.q, None, |_| 1usize);
        let max_distance = distances.values().copied().max().unwrap_or(0);

        for k in (1..=max_distance).rev() {
            let level = distances.iter()
                .filter(|(_, d)| **d == k)
                .map(|(v, _)| *v)
                .sorted()
                .collect_vec();
            let outer: HashSet<VertexIndex> = distances.iter()
                .filter(|(_, d)| **d >= k)
                .map(|(v, _)| *v)
                .collect();

            while level.iter().any(|v| self.configuration.at(*v) < 0) {
                trace!(k, size = outer.len(), "borrowing outer set");
                self.configuration.fire_indices(&outer, -1);
                self.script.record(&outer, -1);
            }
        }
    }

    /// Run the burning process, returning the maximal legal firing set and the orientation recording how the fire spread.
    ///
    /// Debt is first sent to q. Vertices are examined in index order, repeatedly, until a full pass burns nothing.
    /// Vertex v burns if it holds fewer chips than there are edges from v to burnt vertices;
    /// each such edge is then oriented from the burnt neighbor towards v.
    ///
    /// Panics if an edge would be oriented twice, which the burning rule never allows.
    pub fn run(&mut self) -> (FiringSet, Orientation<'g>) {
        self.send_debt_to_q();

        let mut burnt = HashSet::with_capacity(self.graph.vertex_count());
        burnt.insert(self.q);
        let mut unburnt: FiringSet = (0..self.graph.vertex_count()).filter(|v| *v != self.q).collect();
        let mut orientation = Orientation::new(self.graph);

        let mut changed = true;
        while changed {
            changed = false;

            for v in unburnt.iter().copied().collect_vec() {
                let edges_to_burnt = self.outdegree_s(v, &burnt);
                if self.configuration.at(v) >= edges_to_burnt {
                    continue;
                }

                for (neighbor, _) in self.graph.neighbors_of(v).filter(|(n, _)| burnt.contains(n)) {
                    if let Err(e) = orientation.orient(neighbor, v) {
                        panic!("burning oriented an edge twice: {e}");
                    }
                }

                burnt.insert(v);
                unburnt.remove(&v);
                changed = true;
            }
        }

        trace!(q = self.q(), burnt = burnt.len(), unburnt = unburnt.len(), "burn complete");
        (unburnt, orientation)
    }

    /// Fire `firing_set` simultaneously, then settle q's chips as the total degree minus everything held elsewhere.
    pub fn legal_set_fire(&mut self, firing_set: &FiringSet) {
        let set: HashSet<VertexIndex> = firing_set.iter().copied().collect();
        self.configuration.fire_indices(&set, 1);
        self.script.record(&set, 1);

        let elsewhere: Chips = (0..self.graph.vertex_count())
            .filter(|v| *v != self.q)
            .map(|v| self.configuration.at(v))
            .sum();
        self.configuration.degrees[self.q] = self.total_degree - elsewhere;
    }
}
