//! The script engine: an ordered beat table evaluated once per turn.

use std::collections::BTreeSet;

use gloam_core::World;

use crate::beat::{Beat, Effect, Outcome, Repeat, TriggerCtx, TurnSignals};
use crate::error::EngineResult;
use crate::presence::Presence;

/// What a fired beat produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Firing {
    /// Id of the beat that fired.
    pub beat_id: String,
    /// Output text, if the beat carries any.
    pub text: Option<String>,
    /// Session outcome, if the beat ended the session.
    pub ended: Option<Outcome>,
}

/// Holds beats in registration order and fires at most one per pass.
///
/// One-shot beats are marked consumed after firing and never re-evaluated;
/// repeatable beats stay eligible. When several beats match in the same
/// pass, only the first (by registration order) fires — the rest wait for a
/// later turn.
#[derive(Debug, Clone, Default)]
pub struct ScriptEngine {
    beats: Vec<Beat>,
    fired: BTreeSet<String>,
}

impl ScriptEngine {
    /// Create an engine over a beat table.
    pub fn new(beats: Vec<Beat>) -> Self {
        Self {
            beats,
            fired: BTreeSet::new(),
        }
    }

    /// Append a beat at the end of the registration order.
    pub fn register(&mut self, beat: Beat) {
        self.beats.push(beat);
    }

    /// The registered beats, in order.
    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    /// Ids of consumed one-shot beats, sorted.
    pub fn fired_ids(&self) -> Vec<String> {
        self.fired.iter().cloned().collect()
    }

    /// Mark beats as already consumed (used when resuming a session).
    pub fn mark_fired<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fired.extend(ids.into_iter().map(Into::into));
    }

    /// Evaluate triggers in registration order and fire the first match.
    ///
    /// Effects execute atomically with respect to other mutators: the pass
    /// holds `&mut` on world and presence for its whole duration.
    pub fn run_pass(
        &mut self,
        world: &mut World,
        presence: &mut Presence,
        signals: &TurnSignals,
    ) -> EngineResult<Option<Firing>> {
        let matched = {
            let ctx = TriggerCtx {
                world,
                presence,
                signals,
            };
            self.beats.iter().position(|beat| {
                (beat.repeat == Repeat::Repeatable || !self.fired.contains(&beat.id))
                    && beat.trigger.matches(&ctx)
            })
        };

        let Some(index) = matched else {
            return Ok(None);
        };
        let beat = self.beats[index].clone();
        if beat.repeat == Repeat::OneShot {
            self.fired.insert(beat.id.clone());
        }

        let mut ended = None;
        for effect in &beat.effects {
            match effect {
                Effect::Unlock(id) => {
                    // Scripted unlocks bypass prerequisites: the story said so.
                    if !world.unlock(id)? {
                        for req in world.missing_requirements(id)? {
                            world.unlock(&req)?;
                        }
                        world.unlock(id)?;
                    }
                }
                Effect::SetFlag(flag) => world.set_flag(flag.clone()),
                Effect::ClearFlag(flag) => world.clear_flag(flag),
                Effect::MoveTo(id) => world.teleport(id)?,
                Effect::SetPhase(phase) => {
                    presence.force_phase(*phase);
                }
                Effect::ResetPresence => presence.reset(),
                Effect::EndSession(outcome) => ended = Some(*outcome),
            }
        }

        Ok(Some(Firing {
            beat_id: beat.id,
            text: beat.text,
            ended,
        }))
    }
}
