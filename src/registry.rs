use rand::seq::SliceRandom;

/// One logical database replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub endpoint: String,
}

/// Fixed set of replicas, built once at startup and shared read-only.
///
/// The same instance backs both routing and the stats fan-out, so the two
/// always see the same node set.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
}

impl NodeRegistry {
    /// Invariant: the set must be non-empty; `choose` relies on it.
    pub fn new(nodes: Vec<Node>) -> Self {
        assert!(!nodes.is_empty(), "node registry must not be empty");
        Self { nodes }
    }

    /// The three demo replicas, addressed by container name.
    pub fn default_nodes() -> Self {
        Self::new(
            ["mongo1", "mongo2", "mongo3"]
                .into_iter()
                .map(|name| Node {
                    name: name.to_string(),
                    endpoint: format!("mongodb://{name}:27017/"),
                })
                .collect(),
        )
    }

    /// Picks one node uniformly at random, independently of prior picks.
    pub fn choose(&self) -> &Node {
        self.nodes
            .choose(&mut rand::thread_rng())
            .expect("registry is never empty")
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|node| node.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
