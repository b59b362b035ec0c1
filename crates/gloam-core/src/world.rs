use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::content::ContentPack;
use crate::error::{CoreError, CoreResult};
use crate::node::{Node, NodeId, NodeKind};

/// The world model. Owns the node graph and all mutable session state.
///
/// Everything the narrative can observe lives here: which nodes are
/// unlocked, where the player stands, which flags are raised, and the turn
/// counter. Mutation happens only through the operations below; callers
/// hold `&mut World` for exactly one processed event at a time.
#[derive(Debug, Clone)]
pub struct World {
    nodes: BTreeMap<NodeId, Node>,
    location: NodeId,
    flags: BTreeSet<String>,
    turn: u64,
}

impl World {
    /// Build a world from a validated content pack.
    ///
    /// The start room is unlocked implicitly; a sealed start would leave the
    /// player standing nowhere.
    pub fn new(pack: ContentPack) -> CoreResult<Self> {
        pack.validate()?;
        let start = pack.start.clone();
        let mut nodes: BTreeMap<NodeId, Node> = pack
            .nodes
            .into_iter()
            .map(|n| (n.id.clone(), n))
            .collect();
        if let Some(room) = nodes.get_mut(&start) {
            room.unlocked = true;
        }
        Ok(Self {
            nodes,
            location: start,
            flags: BTreeSet::new(),
            turn: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Node access
    // -----------------------------------------------------------------------

    /// Get a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Resolve free-form player input to a node, normalizing case and
    /// whitespace.
    pub fn resolve(&self, input: &str) -> Option<&Node> {
        self.nodes.get(&NodeId::normalize(input))
    }

    /// Iterate all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All nodes discoverable in the given room, in id order.
    pub fn nodes_at(&self, room: &NodeId) -> Vec<&Node> {
        self.nodes
            .values()
            .filter(|n| n.site.as_ref() == Some(room))
            .collect()
    }

    /// Ids of all unlocked nodes, in sorted order.
    pub fn unlocked_ids(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.unlocked)
            .map(|n| n.id.clone())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Unlocking
    // -----------------------------------------------------------------------

    /// Unlock a node.
    ///
    /// Idempotent. Returns `Ok(true)` if the node is (now) unlocked and
    /// `Ok(false)` if a prerequisite is still locked — an expected, frequent
    /// outcome, so it is not an error. State is unchanged on `Ok(false)`.
    pub fn unlock(&mut self, id: &NodeId) -> CoreResult<bool> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| CoreError::UnknownNode(id.clone()))?;
        if node.unlocked {
            return Ok(true);
        }
        let blocked = node
            .requires
            .iter()
            .any(|req| !self.nodes.get(req).is_some_and(|n| n.unlocked));
        if blocked {
            return Ok(false);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.unlocked = true;
        }
        Ok(true)
    }

    /// Whether a node is unlocked. Unknown ids read as locked.
    pub fn is_unlocked(&self, id: &NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.unlocked)
    }

    /// The prerequisites of `id` that are still locked, in declaration order.
    pub fn missing_requirements(&self, id: &NodeId) -> CoreResult<Vec<NodeId>> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| CoreError::UnknownNode(id.clone()))?;
        Ok(node
            .requires
            .iter()
            .filter(|req| !self.is_unlocked(req))
            .cloned()
            .collect())
    }

    // -----------------------------------------------------------------------
    // Location
    // -----------------------------------------------------------------------

    /// The room the player currently stands in.
    pub fn location(&self) -> &NodeId {
        &self.location
    }

    /// Move the player to a linked, unlocked room.
    pub fn set_location(&mut self, id: &NodeId) -> CoreResult<()> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| CoreError::UnknownNode(id.clone()))?;
        if node.kind != NodeKind::Room {
            return Err(CoreError::InvalidLocation {
                target: id.clone(),
                reason: "not somewhere you can stand".to_string(),
            });
        }
        if !node.unlocked {
            return Err(CoreError::InvalidLocation {
                target: id.clone(),
                reason: "it is sealed".to_string(),
            });
        }
        let linked = self
            .nodes
            .get(&self.location)
            .is_some_and(|here| here.links.contains(id));
        if !linked {
            return Err(CoreError::InvalidLocation {
                target: id.clone(),
                reason: "no way there from here".to_string(),
            });
        }
        self.location = id.clone();
        Ok(())
    }

    /// Move the player to an unlocked room ignoring adjacency. Used by
    /// scripted effects, which may relocate the player anywhere unsealed.
    pub fn teleport(&mut self, id: &NodeId) -> CoreResult<()> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| CoreError::UnknownNode(id.clone()))?;
        if node.kind != NodeKind::Room || !node.unlocked {
            return Err(CoreError::InvalidLocation {
                target: id.clone(),
                reason: "not an open room".to_string(),
            });
        }
        self.location = id.clone();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Flags & turns
    // -----------------------------------------------------------------------

    /// Raise a narrative flag.
    pub fn set_flag(&mut self, flag: impl Into<String>) {
        self.flags.insert(flag.into());
    }

    /// Lower a narrative flag.
    pub fn clear_flag(&mut self, flag: &str) {
        self.flags.remove(flag);
    }

    /// Whether a narrative flag is raised.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// The current turn counter. Starts at 0; one processed event = one turn.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Advance the turn counter. Called exactly once per processed event.
    pub fn bump_turn(&mut self) {
        self.turn += 1;
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Capture the mutable state of the world.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            unlocked: self.unlocked_ids(),
            location: self.location.clone(),
            flags: self.flags.clone(),
            turn: self.turn,
        }
    }

    /// Restore mutable state from a snapshot taken against the same content.
    pub fn restore(&mut self, snap: &WorldSnapshot) -> CoreResult<()> {
        for id in &snap.unlocked {
            if !self.nodes.contains_key(id) {
                return Err(CoreError::UnknownNode(id.clone()));
            }
        }
        let target = self
            .nodes
            .get(&snap.location)
            .ok_or_else(|| CoreError::UnknownNode(snap.location.clone()))?;
        if target.kind != NodeKind::Room {
            return Err(CoreError::InvalidLocation {
                target: snap.location.clone(),
                reason: "not somewhere you can stand".to_string(),
            });
        }
        for node in self.nodes.values_mut() {
            node.unlocked = snap.unlocked.contains(&node.id);
        }
        self.location = snap.location.clone();
        self.flags = snap.flags.clone();
        self.turn = snap.turn;
        Ok(())
    }
}

/// The mutable state of a [`World`], detached from its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Ids of unlocked nodes, sorted.
    pub unlocked: Vec<NodeId>,
    /// Current location.
    pub location: NodeId,
    /// Raised narrative flags.
    pub flags: BTreeSet<String>,
    /// Turn counter.
    pub turn: u64,
}
