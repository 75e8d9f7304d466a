use itertools::Itertools;
use tracing::debug;

use crate::dhar::DharAlgorithm;
use crate::divisor::Divisor;
use crate::error::ChipFiringError;
use crate::graph::{Chips, VertexIndex};
use crate::laplacian::FiringScript;
use crate::orientation::Orientation;

/// Outcome of [`ewd`].
///
/// `reduced`, `orientation`, `script` and `q` are `None` exactly when a degree shortcut decided winnability without burning.
#[derive(Clone, Debug)]
pub struct Ewd<'g> {
    /// Whether some sequence of moves makes the divisor effective.
    pub winnable: bool,
    /// The distinguished vertex the divisor was reduced against.
    pub q: Option<VertexIndex>,
    /// The q-reduced divisor linearly equivalent to the input.
    pub reduced: Option<Divisor<'g>>,
    /// The full orientation left by the final, complete burn.
    pub orientation: Option<Orientation<'g>>,
    /// Moves taking the input to `reduced`; when winnable, these win the game.
    pub script: Option<FiringScript<'g>>,
}

impl<'g> Ewd<'g> {
    fn shortcut(winnable: bool) -> Self {
        Self { winnable, q: None, reduced: None, orientation: None, script: None }
    }
}

/// Efficient Winnability Detection: decide whether `divisor` is winnable, computing its q-reduced form along the way.
///
/// q is the vertex with the fewest chips, lowest index on a tie.
/// With `optimized`, divisors of negative degree are reported unwinnable and divisors of degree at least the genus winnable,
/// both without reducing.
///
/// Panics if the final burn leaves an edge unoriented, which would mean the reduction loop ended early.
pub fn ewd<'g>(divisor: &Divisor<'g>, optimized: bool) -> Ewd<'g> {
    if optimized {
        let degree = divisor.total_degree();
        if degree < 0 {
            debug!(degree, "negative degree, unwinnable");
            return Ewd::shortcut(false);
        }
        if degree >= divisor.graph.genus() {
            debug!(degree, genus = divisor.graph.genus(), "degree at least genus, winnable");
            return Ewd::shortcut(true);
        }
    }

    reduce_at(divisor, divisor.min_vertex())
}

/// Reduce `divisor` against `q`: send debt to q, then fire maximal legal sets until none remain.
pub(crate) fn reduce_at<'g>(divisor: &Divisor<'g>, q: VertexIndex) -> Ewd<'g> {
    let mut dhar = DharAlgorithm::with_q(divisor.clone(), q);
    debug!(q = dhar.q(), "reducing");

    let (mut firing_set, mut orientation) = dhar.run();
    let mut rounds = 0usize;
    while !firing_set.is_empty() {
        dhar.legal_set_fire(&firing_set);
        rounds += 1;
        (firing_set, orientation) = dhar.run();
    }

    let elsewhere: Chips = dhar.configuration().iter()
        .enumerate()
        .filter(|(v, _)| *v != q)
        .map(|(_, (_, chips))| chips)
        .sum();
    let q_degree = divisor.total_degree() - elsewhere;
    let winnable = q_degree >= 0;
    debug!(q = dhar.q(), rounds, q_degree, winnable, "reduced");

    assert!(orientation.is_full(), "reduction finished with a partial orientation");

    let q = dhar.q_index();
    let (reduced, script) = dhar.into_parts();
    Ewd {
        winnable,
        q: Some(q),
        reduced: Some(reduced),
        orientation: Some(orientation),
        script: Some(script),
    }
}

/// Whether some sequence of lending and borrowing moves makes `divisor` effective.
pub fn is_winnable(divisor: &Divisor) -> bool {
    ewd(divisor, true).winnable
}

/// The q-reduced divisor linearly equivalent to `divisor`, q being its vertex with the fewest chips.
pub fn q_reduction<'g>(divisor: &Divisor<'g>) -> Divisor<'g> {
    match ewd(divisor, false).reduced {
        Some(reduced) => reduced,
        None => unreachable!("unoptimized EWD always reduces"),
    }
}

/// The divisor linearly equivalent to `divisor` which is reduced with respect to the vertex called `q`.
pub fn q_reduced_at<'g>(divisor: &Divisor<'g>, q: &str) -> Result<Divisor<'g>, ChipFiringError> {
    let q = divisor.graph.require(q)?;
    match reduce_at(divisor, q).reduced {
        Some(reduced) => Ok(reduced),
        None => unreachable!("reduction always produces a divisor"),
    }
}

/// Whether `divisor` is q-reduced for some vertex q: no vertex but q is in debt, and no set avoiding q can legally fire.
///
/// Every [`q_reduction`] passes this test, and any divisor equal to its own [`q_reduction`] does too.
/// The converse does not hold: q here is any vertex, while [`q_reduction`] always reduces against the vertex with
/// the fewest chips, so `is_q_reduced(d)` can be true while `q_reduction(d) != d`.
/// On a triangle, `(0, 1, 1)` is reduced with respect to its second vertex but reduces to `(2, 0, 0)`.
pub fn is_q_reduced(divisor: &Divisor) -> bool {
    let in_debt = (0..divisor.graph.vertex_count()).filter(|v| divisor.at(*v) < 0).collect_vec();
    let candidates = match in_debt.len() {
        0 => (0..divisor.graph.vertex_count()).collect_vec(),
        1 => in_debt,
        _ => return false,
    };

    candidates.into_iter().any(|q| {
        let mut dhar = DharAlgorithm::with_q(divisor.clone(), q);
        dhar.run().0.is_empty()
    })
}

/// Whether `a` and `b` are related by a sequence of lending and borrowing moves.
///
/// Divisors on different graphs or of different degree never are.
/// Otherwise they are exactly when their difference is winnable, i.e. principal.
pub fn linear_equivalence<'g>(a: &Divisor<'g>, b: &Divisor<'g>) -> bool {
    if !a.graph.same_as(b.graph) || a.total_degree() != b.total_degree() {
        return false;
    }

    if a.degrees == b.degrees {
        return true;
    }

    match a.checked_sub(b) {
        Ok(difference) => ewd(&difference, false).winnable,
        Err(_) => false,
    }
}
