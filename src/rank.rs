use itertools::Itertools;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::divisor::Divisor;
use crate::ewd::is_winnable;
use crate::graph::{Chips, VertexIndex};

/// The rank of `divisor`: the largest k such that removing any k chips, from anywhere, leaves a winnable divisor.
///
/// Unwinnable divisors have rank -1. The search is exhaustive over every way of removing k chips,
/// so the cost grows quickly with degree; use [`rank_at_most`] to bound it.
pub fn rank(divisor: &Divisor) -> Chips {
    rank_at_most(divisor, usize::MAX)
}

/// [`rank`], but stop searching once rank `cap` is established; returns `min(rank, cap)`.
pub fn rank_at_most(divisor: &Divisor, cap: usize) -> Chips {
    if !is_winnable(divisor) {
        return -1;
    }

    let degree = divisor.total_degree();
    let mut k = 1usize;
    loop {
        if k > cap {
            return cap as Chips;
        }

        // removing more chips than there are leaves negative degree, which is never winnable
        if k as Chips > degree {
            debug!(k, degree, "no removal of this size keeps degree non-negative");
            return k as Chips - 1;
        }

        if !survives_every_removal(divisor, k) {
            debug!(k, "some removal is unwinnable");
            return k as Chips - 1;
        }

        debug!(k, "every removal is winnable");
        k += 1;
    }
}

/// Whether `divisor - E` is winnable for every effective E of degree `k`.
fn survives_every_removal(divisor: &Divisor, k: usize) -> bool {
    let removals = (0..divisor.graph.vertex_count()).combinations_with_replacement(k);
    let survives = |removal: Vec<VertexIndex>| {
        let mut remaining = divisor.clone();
        for v in removal {
            remaining.degrees[v] -= 1;
        }
        is_winnable(&remaining)
    };

    #[cfg(feature = "parallel")]
    {
        removals.par_bridge().all(survives)
    }

    #[cfg(not(feature = "parallel"))]
    {
        removals.into_iter().all(survives)
    }
}
