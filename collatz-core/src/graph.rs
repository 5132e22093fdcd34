use crate::{node::Node, types::NodeId};
use glam::Vec2;

/// The live registry of all nodes in the simulation.
///
/// Holds at most one node per distinct value: callers must check
/// [`Graph::find_by_value`] before [`Graph::add_node`]. Nodes and edges
/// are only ever added (the graph grows for the life of the session);
/// [`Graph::clear`] is the one bulk reset.
#[derive(Debug, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.connections.len()).sum::<usize>() / 2
    }

    /// Returns the id of the live node holding `value`, if any.
    pub fn find_by_value(&self, value: u64) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.value == value)
    }

    /// Registers a new node at `pos` and returns its id.
    ///
    /// Callers must have checked [`Graph::find_by_value`] first; creating
    /// a second node for an existing value violates the registry invariant
    /// and is a caller defect, not a runtime error.
    pub fn add_node(&mut self, value: u64, pos: Vec2, target_radius: f32) -> NodeId {
        debug_assert!(
            self.find_by_value(value).is_none(),
            "duplicate node for value {value}"
        );
        let id = self.nodes.len();
        self.nodes.push(Node::new(value, pos, target_radius));
        log::debug!("node {id} created for value {value} at ({}, {})", pos.x, pos.y);
        id
    }

    /// Creates an undirected edge between `a` and `b`.
    ///
    /// Symmetric and idempotent: both adjacency lists are updated, and
    /// connecting an already-connected pair changes nothing. Self-edges
    /// are ignored.
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        if !self.nodes[a].is_connected_to(b) {
            self.nodes[a].connections.push(b);
        }
        if !self.nodes[b].is_connected_to(a) {
            self.nodes[b].connections.push(a);
            log::debug!(
                "edge created: {} <-> {}",
                self.nodes[a].value,
                self.nodes[b].value
            );
        }
        debug_assert!(self.has_edge(a, b) && self.has_edge(b, a));
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes[a].is_connected_to(b)
    }

    /// Value-keyed edge query: whether `from` links to a node holding
    /// `value`. Generators reason in values, not ids, so this is the
    /// lookup they use for cycle detection.
    pub fn has_edge_to_value(&self, from: NodeId, value: u64) -> bool {
        self.nodes[from]
            .connections
            .iter()
            .any(|&id| self.nodes[id].value == value)
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_values(values: &[u64]) -> Graph {
        let mut graph = Graph::new();
        for &v in values {
            graph.add_node(v, Vec2::ZERO, 16.0);
        }
        graph
    }

    #[test]
    fn connect_is_symmetric() {
        let mut graph = graph_with_values(&[6, 3]);

        graph.connect(0, 1);

        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(1, 0));
    }

    #[test]
    fn connect_is_idempotent() {
        let mut graph = graph_with_values(&[6, 3]);

        graph.connect(0, 1);
        graph.connect(0, 1);
        graph.connect(1, 0);

        assert_eq!(graph.nodes[0].connections.len(), 1);
        assert_eq!(graph.nodes[1].connections.len(), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn connect_ignores_self_edges() {
        let mut graph = graph_with_values(&[6]);

        graph.connect(0, 0);

        assert!(graph.nodes[0].connections.is_empty());
    }

    #[test]
    fn find_by_value_returns_existing_node() {
        let graph = graph_with_values(&[6, 3, 10]);

        assert_eq!(graph.find_by_value(3), Some(1));
        assert_eq!(graph.find_by_value(99), None);
    }

    #[test]
    fn find_before_create_keeps_values_unique() {
        let mut graph = Graph::new();

        for v in [6u64, 3, 6, 10, 3, 6] {
            if graph.find_by_value(v).is_none() {
                graph.add_node(v, Vec2::ZERO, 16.0);
            }
        }

        assert_eq!(graph.len(), 3);
        let mut values: Vec<u64> = graph.nodes.iter().map(|n| n.value).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), graph.len());
    }

    #[test]
    fn has_edge_to_value_queries_by_value() {
        let mut graph = graph_with_values(&[8, 4, 2]);
        graph.connect(0, 1);

        assert!(graph.has_edge_to_value(0, 4));
        assert!(graph.has_edge_to_value(1, 8));
        assert!(!graph.has_edge_to_value(0, 2));
        assert!(!graph.has_edge_to_value(2, 8));
    }

    #[test]
    fn clear_empties_the_registry() {
        let mut graph = graph_with_values(&[6, 3]);
        graph.connect(0, 1);

        graph.clear();

        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.find_by_value(6), None);
    }
}
