#![warn(missing_docs)]

//! # `chipfiring`
//!
//! Chip-firing games (also known as the dollar game) on finite, connected, undirected multigraphs.
//! Begin by building a graph with a [`GraphBuilder`], place chips on it with a [`Divisor`],
//! then ask whether the divisor is winnable with [`is_winnable()`], reduce it with [`q_reduction()`] or compute its [`rank()`].
//!
//! A vertex *lends* by sending one chip along each of its edges, and *borrows* by doing the reverse.
//! A divisor is winnable if some sequence of such moves leaves no vertex in debt.
//! Two divisors related by a sequence of moves are linearly equivalent; see [`linear_equivalence()`].
//!
//! # Internals
//! Winnability is decided by Efficient Winnability Detection ([`ewd()`]), driven by [`DharAlgorithm`].
//! Fix a vertex q. All debt is first pushed onto q through borrowing moves by everything else.
//! A fire is then lit at q and spreads to every vertex holding fewer chips than it has edges to burnt vertices.
//! Whatever does not burn can fire as one set without anyone going into debt, so it does, and the fire is lit again.
//! Once everything burns the divisor is q-reduced, and it is winnable exactly when q is out of debt.
//!
//! The edges along which the last fire spread form a full, acyclic [`Orientation`] of the graph.
//!
//! Rank and [`gonality()`](gonality::gonality) are computed by exhaustive search on top of winnability;
//! with the default `parallel` feature, that search is spread across threads.

pub use builder::GraphBuilder;
pub use dhar::{DharAlgorithm, FiringSet};
pub use divisor::Divisor;
pub use error::ChipFiringError;
pub use ewd::{Ewd, ewd, is_q_reduced, is_winnable, linear_equivalence, q_reduced_at, q_reduction};
pub use game::{DollarGame, Strategy};
pub use graph::{ChipGraph, Chips, Multiplicity, VertexIndex};
pub use laplacian::{FiringScript, Laplacian};
pub use orientation::{Orientation, OrientationState};
pub use rank::{rank, rank_at_most};

pub mod builder;
pub(crate) mod graph;
pub(crate) mod divisor;
pub(crate) mod error;
pub(crate) mod orientation;
pub(crate) mod laplacian;
pub(crate) mod dhar;
pub(crate) mod ewd;
pub(crate) mod rank;
pub mod gonality;
pub mod game;
pub mod solids;
mod tests;
