//! Immutable topology store.
//!
//! Nodes and their directed `supplies` edges, loaded once per monitoring
//! session and read-only thereafter. Structural errors (dangling supply
//! targets, duplicate ids) are rejected at load time rather than silently
//! dropped so data-entry mistakes surface at startup, not mid-incident.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique node identifier within one topology.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Substation,
    Asset,
    Generator,
}

/// One infrastructure node as described in the topology input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// (latitude, longitude)
    pub location: (f64, f64),
    /// Node ids this node feeds, in input order.
    #[serde(default)]
    pub supplies: Vec<NodeId>,
}

/// Serde shape of a topology file or network payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopologyDescription {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("duplicate node id '{0}' in topology description")]
    DuplicateNode(NodeId),

    #[error("node '{node}' supplies unknown node '{target}'")]
    DanglingSupply { node: NodeId, target: NodeId },
}

/// Validated, immutable supply graph. Iteration order matches input order,
/// which keeps downstream propagation deterministic.
#[derive(Debug)]
pub struct Topology {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    suppliers: HashMap<NodeId, Vec<NodeId>>,
}

impl Topology {
    /// Validates a description and freezes it into a `Topology`.
    ///
    /// Fails if any node id occurs twice or any supply edge points at a
    /// node absent from the description. Cycles are allowed.
    pub fn load(description: TopologyDescription) -> Result<Self, TopologyError> {
        let mut index = HashMap::with_capacity(description.nodes.len());
        for (pos, node) in description.nodes.iter().enumerate() {
            if index.insert(node.id.clone(), pos).is_some() {
                return Err(TopologyError::DuplicateNode(node.id.clone()));
            }
        }

        let mut suppliers: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for node in &description.nodes {
            for target in &node.supplies {
                if !index.contains_key(target) {
                    return Err(TopologyError::DanglingSupply {
                        node: node.id.clone(),
                        target: target.clone(),
                    });
                }
                suppliers
                    .entry(target.clone())
                    .or_default()
                    .push(node.id.clone());
            }
        }

        Ok(Self {
            nodes: description.nodes,
            index,
            suppliers,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    /// All nodes in input order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Downstream ids fed by `id`. Empty for unknown ids.
    pub fn supplies_of(&self, id: &NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.supplies.as_slice()).unwrap_or(&[])
    }

    /// Upstream ids feeding `id` (reverse edges). Empty for unknown ids.
    pub fn suppliers_of(&self, id: &NodeId) -> &[NodeId] {
        self.suppliers
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Display name for a node, falling back to the raw id.
    pub fn display_name<'a>(&'a self, id: &'a NodeId) -> &'a str {
        self.get(id).map(|n| n.name.as_str()).unwrap_or(id.as_str())
    }
}
