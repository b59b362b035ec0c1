use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node, as declared by story content.
///
/// Ids are lowercase hyphenated keys (`"key-fragment"`). Player input is
/// normalized the same way before resolution, so `open key fragment` finds
/// the node declared as `key-fragment`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id from a declared string key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Normalize free-form player input into id form: lowercased, with
    /// whitespace runs collapsed to single hyphens.
    pub fn normalize(input: &str) -> Self {
        let key = input
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-");
        Self(key)
    }

    /// The raw string key.
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
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// What kind of artifact a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A readable artifact: a file, a note, a protocol.
    File,
    /// A place the player can stand in.
    Room,
    /// Something that lives here with you.
    Entity,
}

impl NodeKind {
    /// Lowercase display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Room => "room",
            Self::Entity => "entity",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A discoverable narrative artifact.
///
/// Nodes form a dependency graph: a node can be unlocked only once every id
/// in `requires` is unlocked. Rooms additionally carry `links` (which rooms
/// are reachable from them); files and entities may carry a `site` (the room
/// where they can be found).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Declared identifier, unique within a story.
    pub id: NodeId,
    /// Artifact kind.
    pub kind: NodeKind,
    /// Text revealed when the node is opened or looked at.
    pub content: String,
    /// Nodes that must be unlocked before this one can be.
    #[serde(default)]
    pub requires: Vec<NodeId>,
    /// Rooms reachable from this node. Only meaningful on rooms.
    #[serde(default)]
    pub links: Vec<NodeId>,
    /// Room where this artifact is discoverable. `None` means anywhere.
    #[serde(default)]
    pub site: Option<NodeId>,
    /// Shown when the node is inspected while still locked.
    #[serde(default)]
    pub sealed_hint: Option<String>,
    /// Whether the node starts the session unlocked.
    #[serde(default)]
    pub unlocked: bool,
}

impl Node {
    /// Create a locked node with no prerequisites.
    pub fn new(kind: NodeKind, id: impl Into<NodeId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            requires: Vec::new(),
            links: Vec::new(),
            site: None,
            sealed_hint: None,
            unlocked: false,
        }
    }

    /// Add prerequisite node ids.
    pub fn with_requires<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        self.requires.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Add linked room ids.
    pub fn with_links<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        self.links.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Set the room where this artifact is discoverable.
    pub fn with_site(mut self, site: impl Into<NodeId>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Set the text shown while the node is still locked.
    pub fn with_sealed_hint(mut self, hint: impl Into<String>) -> Self {
        self.sealed_hint = Some(hint.into());
        self
    }

    /// Mark the node as unlocked from the start.
    pub fn starts_unlocked(mut self) -> Self {
        self.unlocked = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(NodeId::normalize("Key Fragment").as_str(), "key-fragment");
        assert_eq!(NodeId::normalize("  locker  ").as_str(), "locker");
        assert_eq!(NodeId::normalize("a  b\tc").as_str(), "a-b-c");
    }

    #[test]
    fn builder_chain() {
        let node = Node::new(NodeKind::File, "locker", "Inside: a reel of tape.")
            .with_requires(["key-fragment"])
            .with_site("archive")
            .with_sealed_hint("It's locked.");

        assert_eq!(node.id.as_str(), "locker");
        assert_eq!(node.requires, vec![NodeId::new("key-fragment")]);
        assert_eq!(node.site, Some(NodeId::new("archive")));
        assert_eq!(node.sealed_hint.as_deref(), Some("It's locked."));
        assert!(!node.unlocked);
    }

    #[test]
    fn starts_unlocked() {
        let node = Node::new(NodeKind::Room, "foyer", "Dust.").starts_unlocked();
        assert!(node.unlocked);
    }

    #[test]
    fn node_serde_roundtrip() {
        let node = Node::new(NodeKind::Room, "archive", "Shelves of dead media.")
            .with_links(["foyer"])
            .starts_unlocked();
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, node.id);
        assert_eq!(back.kind, NodeKind::Room);
        assert_eq!(back.links, node.links);
        assert!(back.unlocked);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(NodeKind::File.to_string(), "file");
        assert_eq!(NodeKind::Room.to_string(), "room");
        assert_eq!(NodeKind::Entity.to_string(), "entity");
    }
}
