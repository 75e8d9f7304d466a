//! The gonality game and divisorial gonality.

use std::ops::RangeInclusive;

use itertools::Itertools;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::divisor::Divisor;
use crate::error::ChipFiringError;
use crate::ewd::is_winnable;
use crate::graph::{ChipGraph, VertexIndex};
use crate::rank::rank_at_most;

/// One round of the gonality game.
#[derive(Clone, Debug)]
pub struct GonalityGameResult<'g> {
    /// Whether player A's placement survived player B's reply.
    pub player_a_wins: bool,
    /// Player A's effective placement.
    pub placement: Divisor<'g>,
    /// The vertex where player B took one chip.
    pub player_b_vertex: VertexIndex,
    /// The placement after player B's reply.
    pub final_divisor: Divisor<'g>,
}

/// Result of [`gonality`].
#[derive(Clone, Debug)]
pub struct GonalityResult<'g> {
    /// The smallest number of chips player A needs to always win.
    pub gonality: usize,
    /// A placement of that many chips winning against every reply; the first found in enumeration order.
    pub winning_placement: Divisor<'g>,
}

/// Player A has placed the effective divisor `placement`; player B now removes one chip from `player_b_vertex`.
/// Player A wins if the result is still winnable.
///
/// Fails with [`NotEffective`](ChipFiringError::NotEffective) if `placement` has debt,
/// or [`UnknownVertex`](ChipFiringError::UnknownVertex) if `player_b_vertex` is not in the graph.
pub fn play_gonality_game<'g>(placement: &Divisor<'g>, player_b_vertex: &str) -> Result<GonalityGameResult<'g>, ChipFiringError> {
    if !placement.is_effective() {
        return Err(ChipFiringError::NotEffective);
    }
    let player_b_vertex = placement.graph.require(player_b_vertex)?;

    let mut final_divisor = placement.clone();
    final_divisor.degrees[player_b_vertex] -= 1;

    Ok(GonalityGameResult {
        player_a_wins: is_winnable(&final_divisor),
        placement: placement.clone(),
        player_b_vertex,
        final_divisor,
    })
}

/// Whether `placement` wins the gonality game against every reply of player B, i.e. has rank at least 1.
pub fn is_winning_placement(placement: &Divisor) -> bool {
    placement.is_effective() && rank_at_most(placement, 1) >= 1
}

/// Range in which the gonality of `graph` must lie.
///
/// Below: gonality is at least the treewidth, which is at least the minimum number of distinct neighbors.
/// Above: one chip on every vertex always wins, and so does any divisor of degree genus + 1 by Riemann-Roch.
pub fn gonality_bounds(graph: &ChipGraph) -> RangeInclusive<usize> {
    let lower = graph.min_neighbor_count().clamp(1, graph.vertex_count());
    let upper = graph.vertex_count().min(graph.genus() as usize + 1);
    lower.min(upper)..=upper
}

/// The divisorial gonality of `graph`: the smallest degree of an effective divisor of rank at least 1.
///
/// Every placement of each candidate degree is tried in turn, so this is practical only for small graphs.
pub fn gonality(graph: &ChipGraph) -> GonalityResult<'_> {
    for degree in gonality_bounds(graph) {
        debug!(degree, "trying placements");
        if let Some(winning_placement) = first_winning_placement(graph, degree) {
            return GonalityResult { gonality: degree, winning_placement };
        }
    }

    // the upper bound always admits a winning placement
    unreachable!("no winning placement within gonality bounds")
}

fn first_winning_placement(graph: &ChipGraph, degree: usize) -> Option<Divisor<'_>> {
    let placements = (0..graph.vertex_count())
        .combinations_with_replacement(degree)
        .map(|chips| {
            let mut placement = Divisor::zero(graph);
            for v in chips {
                placement.degrees[v] += 1;
            }
            placement
        })
        .collect_vec();

    #[cfg(feature = "parallel")]
    {
        placements.into_par_iter().find_first(is_winning_placement)
    }

    #[cfg(not(feature = "parallel"))]
    {
        placements.into_iter().find(is_winning_placement)
    }
}
