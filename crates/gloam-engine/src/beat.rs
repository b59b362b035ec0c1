//! Narrative beats: data-driven trigger/effect pairs.
//!
//! Branching lives in the beat table rather than in conditional cascades, so
//! each trigger/effect pair can be tested on its own and stories can be
//! rewired without touching the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use gloam_core::{NodeId, World};

use crate::presence::{Phase, Presence};

/// How a session can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The player abandoned the dive in time.
    Escaped,
    /// The player turned the terminal against the presence.
    Reclaimed,
    /// The countdown ran out.
    Overtaken,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Escaped => "escaped",
            Self::Reclaimed => "reclaimed",
            Self::Overtaken => "overtaken",
        };
        f.write_str(label)
    }
}

/// A resolution the player can request with a resolution verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// `escape` — abandon the dive.
    Escape,
    /// `reclaim` — purge the presence.
    Reclaim,
}

/// Per-turn signals raised while processing a single event, visible to
/// triggers in the same turn's script pass and then discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnSignals {
    /// Phase entered by this turn's presence update.
    pub entered: Option<Phase>,
    /// The breach countdown expired on this turn.
    pub countdown_expired: bool,
    /// The player requested a resolution this turn.
    pub resolution: Option<Resolution>,
}

/// Everything a trigger may observe.
#[derive(Debug, Clone, Copy)]
pub struct TriggerCtx<'a> {
    /// The world model.
    pub world: &'a World,
    /// The presence.
    pub presence: &'a Presence,
    /// This turn's signals.
    pub signals: &'a TurnSignals,
}

/// A predicate over world, turn, presence, and per-turn signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Matches every turn.
    Always,
    /// The turn counter has reached `n`.
    TurnAtLeast(u64),
    /// A node is unlocked.
    Unlocked(NodeId),
    /// A narrative flag is raised.
    FlagSet(String),
    /// The player stands in a room.
    At(NodeId),
    /// The presence is exactly in a phase.
    PhaseIs(Phase),
    /// The presence is in a phase or beyond.
    PhaseAtLeast(Phase),
    /// The presence entered a phase this turn.
    PhaseEntered(Phase),
    /// The breach countdown expired this turn.
    CountdownExpired,
    /// The player requested a resolution this turn.
    ResolutionRequested(Resolution),
    /// Logical NOT.
    Not(Box<Trigger>),
    /// Logical AND.
    All(Vec<Trigger>),
    /// Logical OR.
    Any(Vec<Trigger>),
}

impl Trigger {
    /// Evaluate the predicate. No side effects.
    pub fn matches(&self, ctx: &TriggerCtx<'_>) -> bool {
        match self {
            Self::Always => true,
            Self::TurnAtLeast(n) => ctx.world.turn() >= *n,
            Self::Unlocked(id) => ctx.world.is_unlocked(id),
            Self::FlagSet(flag) => ctx.world.has_flag(flag),
            Self::At(id) => ctx.world.location() == id,
            Self::PhaseIs(phase) => ctx.presence.phase() == *phase,
            Self::PhaseAtLeast(phase) => ctx.presence.phase() >= *phase,
            Self::PhaseEntered(phase) => ctx.signals.entered == Some(*phase),
            Self::CountdownExpired => ctx.signals.countdown_expired,
            Self::ResolutionRequested(r) => ctx.signals.resolution == Some(*r),
            Self::Not(inner) => !inner.matches(ctx),
            Self::All(inner) => inner.iter().all(|t| t.matches(ctx)),
            Self::Any(inner) => inner.iter().any(|t| t.matches(ctx)),
        }
    }

    /// Node ids this trigger references, for story validation.
    pub fn node_refs(&self) -> Vec<&NodeId> {
        match self {
            Self::Unlocked(id) | Self::At(id) => vec![id],
            Self::Not(inner) => inner.node_refs(),
            Self::All(inner) | Self::Any(inner) => {
                inner.iter().flat_map(Trigger::node_refs).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// A state change a firing beat applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Unlock a node (prerequisites are bypassed: the story said so).
    Unlock(NodeId),
    /// Raise a narrative flag.
    SetFlag(String),
    /// Lower a narrative flag.
    ClearFlag(String),
    /// Relocate the player to an open room.
    MoveTo(NodeId),
    /// Push the presence forward to a phase.
    SetPhase(Phase),
    /// Return the presence to Dormant with score 0. The only legal way
    /// backward.
    ResetPresence,
    /// End the session with an outcome.
    EndSession(Outcome),
}

impl Effect {
    /// Node ids this effect references, for story validation.
    pub fn node_refs(&self) -> Vec<&NodeId> {
        match self {
            Self::Unlock(id) | Self::MoveTo(id) => vec![id],
            _ => Vec::new(),
        }
    }
}

/// Whether a beat stays eligible after firing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// Consumed after the first firing.
    #[default]
    OneShot,
    /// Eligible every turn.
    Repeatable,
}

/// A narrative beat: an identified trigger/effect pair with at most one
/// output text block. Registration order is the tie-break between beats
/// matching on the same turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beat {
    /// Identifier, unique within a story.
    pub id: String,
    /// When the beat fires.
    pub trigger: Trigger,
    /// State changes applied on firing, in order.
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// Text emitted on firing.
    #[serde(default)]
    pub text: Option<String>,
    /// One-shot (default) or repeatable.
    #[serde(default)]
    pub repeat: Repeat,
}

impl Beat {
    /// Create a one-shot beat with no effects or text.
    pub fn new(id: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            id: id.into(),
            trigger,
            effects: Vec::new(),
            text: None,
            repeat: Repeat::OneShot,
        }
    }

    /// Set the output text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append effects.
    pub fn with_effects<I>(mut self, effects: I) -> Self
    where
        I: IntoIterator<Item = Effect>,
    {
        self.effects.extend(effects);
        self
    }

    /// Make the beat repeatable.
    pub fn repeatable(mut self) -> Self {
        self.repeat = Repeat::Repeatable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::PresenceConfig;
    use gloam_core::{ContentPack, Node, NodeKind};

    fn test_world() -> World {
        World::new(ContentPack::new(
            "foyer",
            vec![
                Node::new(NodeKind::Room, "foyer", "Dust.")
                    .with_links(["archive"])
                    .starts_unlocked(),
                Node::new(NodeKind::Room, "archive", "Shelves.").starts_unlocked(),
                Node::new(NodeKind::File, "key-fragment", "A shard."),
            ],
        ))
        .unwrap()
    }

    fn ctx<'a>(
        world: &'a World,
        presence: &'a Presence,
        signals: &'a TurnSignals,
    ) -> TriggerCtx<'a> {
        TriggerCtx {
            world,
            presence,
            signals,
        }
    }

    #[test]
    fn world_triggers() {
        let mut world = test_world();
        let presence = Presence::new(PresenceConfig::default());
        let signals = TurnSignals::default();

        assert!(Trigger::Always.matches(&ctx(&world, &presence, &signals)));
        assert!(Trigger::At("foyer".into()).matches(&ctx(&world, &presence, &signals)));
        assert!(!Trigger::At("archive".into()).matches(&ctx(&world, &presence, &signals)));
        assert!(
            !Trigger::Unlocked("key-fragment".into())
                .matches(&ctx(&world, &presence, &signals))
        );

        world.unlock(&"key-fragment".into()).unwrap();
        world.set_flag("met-caretaker");
        assert!(
            Trigger::Unlocked("key-fragment".into())
                .matches(&ctx(&world, &presence, &signals))
        );
        assert!(
            Trigger::FlagSet("met-caretaker".into())
                .matches(&ctx(&world, &presence, &signals))
        );
    }

    #[test]
    fn turn_trigger() {
        let mut world = test_world();
        let presence = Presence::new(PresenceConfig::default());
        let signals = TurnSignals::default();

        assert!(Trigger::TurnAtLeast(0).matches(&ctx(&world, &presence, &signals)));
        assert!(!Trigger::TurnAtLeast(2).matches(&ctx(&world, &presence, &signals)));
        world.bump_turn();
        world.bump_turn();
        assert!(Trigger::TurnAtLeast(2).matches(&ctx(&world, &presence, &signals)));
    }

    #[test]
    fn phase_triggers() {
        let world = test_world();
        let mut presence = Presence::new(PresenceConfig::default());
        presence.force_phase(Phase::Active);
        let signals = TurnSignals::default();

        assert!(Trigger::PhaseIs(Phase::Active).matches(&ctx(&world, &presence, &signals)));
        assert!(!Trigger::PhaseIs(Phase::Breach).matches(&ctx(&world, &presence, &signals)));
        assert!(
            Trigger::PhaseAtLeast(Phase::Watching).matches(&ctx(&world, &presence, &signals))
        );
        assert!(
            !Trigger::PhaseAtLeast(Phase::Breach).matches(&ctx(&world, &presence, &signals))
        );
    }

    #[test]
    fn signal_triggers() {
        let world = test_world();
        let presence = Presence::new(PresenceConfig::default());
        let signals = TurnSignals {
            entered: Some(Phase::Watching),
            countdown_expired: true,
            resolution: Some(Resolution::Escape),
        };

        assert!(
            Trigger::PhaseEntered(Phase::Watching).matches(&ctx(&world, &presence, &signals))
        );
        assert!(
            !Trigger::PhaseEntered(Phase::Active).matches(&ctx(&world, &presence, &signals))
        );
        assert!(Trigger::CountdownExpired.matches(&ctx(&world, &presence, &signals)));
        assert!(
            Trigger::ResolutionRequested(Resolution::Escape)
                .matches(&ctx(&world, &presence, &signals))
        );
        assert!(
            !Trigger::ResolutionRequested(Resolution::Reclaim)
                .matches(&ctx(&world, &presence, &signals))
        );
    }

    #[test]
    fn combinators() {
        let world = test_world();
        let presence = Presence::new(PresenceConfig::default());
        let signals = TurnSignals::default();
        let c = ctx(&world, &presence, &signals);

        assert!(Trigger::Not(Box::new(Trigger::CountdownExpired)).matches(&c));
        assert!(Trigger::All(vec![Trigger::Always, Trigger::At("foyer".into())]).matches(&c));
        assert!(
            !Trigger::All(vec![Trigger::Always, Trigger::CountdownExpired]).matches(&c)
        );
        assert!(Trigger::Any(vec![Trigger::CountdownExpired, Trigger::Always]).matches(&c));
        assert!(!Trigger::Any(vec![]).matches(&c));
    }

    #[test]
    fn node_refs_collected() {
        let trigger = Trigger::All(vec![
            Trigger::Unlocked("locker".into()),
            Trigger::Not(Box::new(Trigger::At("vault".into()))),
        ]);
        let refs: Vec<_> = trigger.node_refs().iter().map(|id| id.as_str()).collect();
        assert_eq!(refs, vec!["locker", "vault"]);

        let effect = Effect::MoveTo("foyer".into());
        assert_eq!(effect.node_refs()[0].as_str(), "foyer");
        assert!(Effect::SetFlag("x".into()).node_refs().is_empty());
    }

    #[test]
    fn beat_builder_and_serde() {
        let beat = Beat::new("watching-entry", Trigger::PhaseEntered(Phase::Watching))
            .with_text("Something begins to read along.")
            .with_effects([Effect::SetFlag("watched".into())]);
        assert_eq!(beat.repeat, Repeat::OneShot);

        let json = serde_json::to_string(&beat).unwrap();
        let back: Beat = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "watching-entry");
        assert_eq!(back.text.as_deref(), Some("Something begins to read along."));
        assert_eq!(back.effects.len(), 1);
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::Escaped.to_string(), "escaped");
        assert_eq!(Outcome::Reclaimed.to_string(), "reclaimed");
        assert_eq!(Outcome::Overtaken.to_string(), "overtaken");
    }
}
