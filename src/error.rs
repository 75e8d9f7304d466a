/// Reasons an operation on a graph, divisor or orientation may be rejected.
///
/// These all describe bad input and can be fixed by the caller.
/// Broken internal invariants (e.g. an edge burning twice) are not represented here; they panic.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ChipFiringError {
    /// A vertex name was given which the graph does not contain.
    #[error("vertex {0} not found in graph")]
    UnknownVertex(String),
    /// The same vertex name appeared more than once in a list of degrees or firings.
    #[error("duplicate vertex name {0} is not allowed")]
    DuplicateVertex(String),
    /// Two vertices were named as the endpoints of an edge, but are not adjacent.
    #[error("edge {0}-{1} not found in graph")]
    UnknownEdge(String, String),
    /// An edge was oriented twice, in opposite directions.
    #[error("multiple orientations specified for edge {0}-{1}")]
    OrientationConflict(String, String),
    /// Two objects were combined which live on different graphs.
    #[error("objects are defined on different graphs")]
    GraphMismatch,
    /// A divisor was required to be effective (no vertex in debt) but was not.
    #[error("divisor must be effective")]
    NotEffective,
}
