//! Story content packs: the declared node graph a session is built from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{CoreError, CoreResult};
use crate::node::{Node, NodeId, NodeKind};

/// The declared content of a story: its nodes and the starting room.
///
/// A pack is inert data. [`crate::World::new`] validates it and turns it into
/// a live world; [`ContentPack::validate`] can be called on its own to check
/// authored content without starting a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPack {
    /// Id of the room the session starts in.
    pub start: NodeId,
    /// All declared nodes.
    pub nodes: Vec<Node>,
}

impl ContentPack {
    /// Create a pack from a start room id and a node list.
    pub fn new(start: impl Into<NodeId>, nodes: Vec<Node>) -> Self {
        Self {
            start: start.into(),
            nodes,
        }
    }

    /// Parse a pack from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::Validation(e.to_string()))
    }

    /// Look up a declared node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Check the pack for internal consistency.
    ///
    /// Rejects duplicate ids, references to undeclared nodes, links or sites
    /// that do not point at rooms, and a start that is not a declared room.
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = BTreeSet::new();
        for node in &self.nodes {
            if !seen.insert(&node.id) {
                return Err(CoreError::DuplicateNode(node.id.clone()));
            }
        }

        for node in &self.nodes {
            for req in &node.requires {
                if self.node(req).is_none() {
                    return Err(CoreError::UnknownReference {
                        node: node.id.clone(),
                        field: "requires",
                        target: req.clone(),
                    });
                }
            }
            for link in &node.links {
                match self.node(link) {
                    None => {
                        return Err(CoreError::UnknownReference {
                            node: node.id.clone(),
                            field: "links",
                            target: link.clone(),
                        });
                    }
                    Some(target) if target.kind != NodeKind::Room => {
                        return Err(CoreError::Validation(format!(
                            "node {}: link target {} is not a room",
                            node.id, link
                        )));
                    }
                    Some(_) => {}
                }
            }
            if let Some(site) = &node.site {
                match self.node(site) {
                    None => {
                        return Err(CoreError::UnknownReference {
                            node: node.id.clone(),
                            field: "site",
                            target: site.clone(),
                        });
                    }
                    Some(target) if target.kind != NodeKind::Room => {
                        return Err(CoreError::Validation(format!(
                            "node {}: site {} is not a room",
                            node.id, site
                        )));
                    }
                    Some(_) => {}
                }
            }
        }

        match self.node(&self.start) {
            Some(node) if node.kind == NodeKind::Room => Ok(()),
            _ => Err(CoreError::BadStart(self.start.clone())),
        }
    }
}
