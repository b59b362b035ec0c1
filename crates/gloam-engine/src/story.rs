//! Story packs: everything a session is built from, as plain data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use gloam_core::ContentPack;

use crate::beat::Beat;
use crate::error::{EngineError, EngineResult};
use crate::presence::PresenceConfig;

fn default_seed() -> u64 {
    42
}

/// A complete story: content nodes, beat table, presence tuning, whisper
/// lines, and the RNG seed. Serializable, so stories can live in JSON files
/// and be edited without recompiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryPack {
    /// Story title, shown by the adapter.
    pub name: String,
    /// The declared node graph.
    pub content: ContentPack,
    /// The beat table, in registration order.
    pub beats: Vec<Beat>,
    /// Presence tuning. Defaults to the shipped balance.
    #[serde(default)]
    pub presence: PresenceConfig,
    /// Flavor lines the presence may surface on idle ticks.
    #[serde(default)]
    pub whispers: Vec<String>,
    /// Seed for whisper selection.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl StoryPack {
    /// Parse a story from JSON.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::Story(e.to_string()))
    }

    /// Serialize the story as pretty JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::Story(e.to_string()))
    }

    /// Check the story for internal consistency: valid content, unique beat
    /// ids, and triggers/effects that only name declared nodes.
    pub fn validate(&self) -> EngineResult<()> {
        self.content.validate()?;

        let mut seen = BTreeSet::new();
        for beat in &self.beats {
            if !seen.insert(&beat.id) {
                return Err(EngineError::Story(format!("duplicate beat id: {}", beat.id)));
            }
            for id in beat.trigger.node_refs() {
                if self.content.node(id).is_none() {
                    return Err(EngineError::Story(format!(
                        "beat {}: trigger references undeclared node {id}",
                        beat.id
                    )));
                }
            }
            for effect in &beat.effects {
                for id in effect.node_refs() {
                    if self.content.node(id).is_none() {
                        return Err(EngineError::Story(format!(
                            "beat {}: effect references undeclared node {id}",
                            beat.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beat::{Effect, Trigger};
    use gloam_core::{Node, NodeKind};

    fn story() -> StoryPack {
        StoryPack {
            name: "Test Story".to_string(),
            content: ContentPack::new(
                "foyer",
                vec![
                    Node::new(NodeKind::Room, "foyer", "Dust.").starts_unlocked(),
                    Node::new(NodeKind::File, "key-fragment", "A shard.").with_site("foyer"),
                ],
            ),
            beats: vec![
                Beat::new("intro", Trigger::Always).with_text("You wake at a terminal."),
            ],
            presence: PresenceConfig::default(),
            whispers: vec!["the fans spin up for no reason".to_string()],
            seed: 7,
        }
    }

    #[test]
    fn valid_story_passes() {
        story().validate().unwrap();
    }

    #[test]
    fn duplicate_beat_ids_rejected() {
        let mut s = story();
        s.beats.push(Beat::new("intro", Trigger::Always));
        assert!(matches!(s.validate(), Err(EngineError::Story(_))));
    }

    #[test]
    fn trigger_reference_to_undeclared_node_rejected() {
        let mut s = story();
        s.beats
            .push(Beat::new("bad", Trigger::Unlocked("nothing".into())));
        assert!(matches!(s.validate(), Err(EngineError::Story(_))));
    }

    #[test]
    fn effect_reference_to_undeclared_node_rejected() {
        let mut s = story();
        s.beats.push(
            Beat::new("bad", Trigger::Always).with_effects([Effect::Unlock("nothing".into())]),
        );
        assert!(matches!(s.validate(), Err(EngineError::Story(_))));
    }

    #[test]
    fn json_roundtrip() {
        let s = story();
        let json = s.to_json().unwrap();
        let back = StoryPack::from_json(&json).unwrap();
        assert_eq!(back.name, s.name);
        assert_eq!(back.beats.len(), s.beats.len());
        assert_eq!(back.seed, 7);
        back.validate().unwrap();
    }

    #[test]
    fn seed_defaults_when_missing() {
        let json = r#"{
            "name": "Bare",
            "content": {
                "start": "foyer",
                "nodes": [
                    { "id": "foyer", "kind": "room", "content": "Dust.", "unlocked": true }
                ]
            },
            "beats": []
        }"#;
        let s = StoryPack::from_json(json).unwrap();
        assert_eq!(s.seed, 42);
        assert!(s.whispers.is_empty());
        s.validate().unwrap();
    }
}
