//! Playing the dollar game: the greedy algorithm and a strategy-driven game object.

use std::collections::HashSet;

use strum::{Display, EnumString, VariantArray};
use tracing::{debug, trace};

use crate::divisor::Divisor;
use crate::ewd::ewd;
use crate::laplacian::{FiringScript, Laplacian};

/// Ways of playing the dollar game.
#[derive(Copy, Clone, Debug, Display, EnumString, Eq, Hash, PartialEq, VariantArray)]
#[strum(serialize_all = "lowercase")]
pub enum Strategy {
    /// Repeatedly let a vertex in debt borrow; see [`greedy`].
    Greedy,
    /// Reduce with Dhar's burning algorithm; see [`ewd`].
    Dhar,
}

/// The greedy algorithm for the dollar game.
///
/// While some vertex is in debt, the lowest-indexed such vertex borrows and is marked.
/// If debt remains after every vertex has borrowed at least once, the divisor is unwinnable.
///
/// Returns a script which, applied to `divisor`, makes it effective; or `None` if there is none.
pub fn greedy<'g>(divisor: &Divisor<'g>) -> Option<FiringScript<'g>> {
    let graph = divisor.graph;
    let mut current = divisor.clone();
    let mut script = FiringScript::empty(graph);
    let mut marked = HashSet::with_capacity(graph.vertex_count());
    let mut moves = 0usize;

    while let Some(in_debt) = (0..graph.vertex_count()).find(|v| current.at(*v) < 0) {
        if marked.len() == graph.vertex_count() {
            debug!(moves, "every vertex has borrowed, unwinnable");
            return None;
        }

        let borrower = HashSet::from([in_debt]);
        current.fire_indices(&borrower, -1);
        script.record(&borrower, -1);
        marked.insert(in_debt);
        moves += 1;
        trace!(vertex = graph.vertex_name(in_debt), moves, "borrow");
    }

    debug!(moves, "effective");
    Some(script)
}

/// A game of chip-firing ("the dollar game") on one starting divisor.
pub struct DollarGame<'g> {
    divisor: Divisor<'g>,
    laplacian: Laplacian<'g>,
}

impl<'g> DollarGame<'g> {
    /// Set up a game starting from `divisor`.
    pub fn new(divisor: Divisor<'g>) -> Self {
        Self { laplacian: Laplacian::from(divisor.graph), divisor }
    }

    /// The starting divisor.
    pub fn divisor(&self) -> &Divisor<'g> {
        &self.divisor
    }

    /// Play using `strategy`, returning a winning firing script, or `None` if the game cannot be won.
    pub fn play(&self, strategy: Strategy) -> Option<FiringScript<'g>> {
        match strategy {
            Strategy::Greedy => greedy(&self.divisor),
            Strategy::Dhar => {
                let outcome = ewd(&self.divisor, false);
                if outcome.winnable { outcome.script } else { None }
            }
        }
    }

    /// The divisor reached by running `script` from the starting divisor.
    pub fn apply(&self, script: &FiringScript<'g>) -> Divisor<'g> {
        match self.laplacian.apply(&self.divisor, script) {
            Ok(divisor) => divisor,
            Err(e) => panic!("firing script does not belong to this game: {e}"),
        }
    }
}
