/// Identifier for a node in a [`crate::graph::Graph`].
///
/// This is an index into `Graph::nodes`, and is only meaningful within
/// the lifetime of a given `Graph` instance. Nodes are never removed
/// individually, so ids stay valid until the graph is cleared.
pub type NodeId = usize;
