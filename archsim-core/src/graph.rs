//! Directed architecture graph: adjacency maps and entry-node detection

use crate::types::{SimEdge, SimNode};
use std::collections::HashMap;

/// Node types treated as request generators.
pub fn is_entry_type(node_type: &str) -> bool {
    matches!(node_type, "client" | "mobile_app" | "web_browser")
}

/// Forward and reverse adjacency over node ids.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    forward: HashMap<String, Vec<String>>,
    reverse: HashMap<String, Vec<String>>,
}

impl Graph {
    pub fn from_edges(edges: &[SimEdge]) -> Self {
        let mut graph = Graph::default();
        for edge in edges {
            graph
                .forward
                .entry(edge.source.clone())
                .or_default()
                .push(edge.target.clone());
            graph
                .reverse
                .entry(edge.target.clone())
                .or_default()
                .push(edge.source.clone());
        }
        graph
    }

    /// Downstream targets of a node.
    pub fn children(&self, id: &str) -> &[String] {
        self.forward.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Upstream sources of a node.
    pub fn parents(&self, id: &str) -> &[String] {
        self.reverse.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entry nodes: explicit client-like types, else any node with no
    /// incoming edges.
    pub fn entry_nodes(&self, nodes: &[SimNode]) -> Vec<String> {
        let mut entries: Vec<String> = nodes
            .iter()
            .filter(|n| is_entry_type(&n.data.node_type))
            .map(|n| n.id.clone())
            .collect();

        if entries.is_empty() {
            entries = nodes
                .iter()
                .filter(|n| self.parents(&n.id).is_empty())
                .map(|n| n.id.clone())
                .collect();
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SimNodeData;

    fn node(id: &str, node_type: &str) -> SimNode {
        SimNode {
            id: id.to_string(),
            kind: node_type.to_string(),
            data: SimNodeData {
                label: id.to_string(),
                node_type: node_type.to_string(),
                config: Default::default(),
            },
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> SimEdge {
        SimEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn adjacency_is_built_both_ways() {
        let graph = Graph::from_edges(&[edge("e1", "a", "b"), edge("e2", "a", "c")]);
        assert_eq!(graph.children("a"), ["b", "c"]);
        assert_eq!(graph.parents("b"), ["a"]);
        assert!(graph.children("b").is_empty());
    }

    #[test]
    fn clients_are_entry_nodes() {
        let nodes = vec![node("c", "client"), node("a", "api_server")];
        let graph = Graph::from_edges(&[edge("e1", "c", "a")]);
        assert_eq!(graph.entry_nodes(&nodes), ["c"]);
    }

    #[test]
    fn sourceless_nodes_are_entries_when_no_clients() {
        let nodes = vec![node("lb", "load_balancer"), node("a", "api_server")];
        let graph = Graph::from_edges(&[edge("e1", "lb", "a")]);
        assert_eq!(graph.entry_nodes(&nodes), ["lb"]);
    }
}
