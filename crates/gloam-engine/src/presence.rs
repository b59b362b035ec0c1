//! The presence: the escalation state machine behind the terminal.
//!
//! The presence climbs through four phases as its escalation score rises.
//! Idle ticks beyond a grace period and risky commands feed the score;
//! calming commands drain it. The phase only ever moves forward — one step
//! per update, so every boundary is crossed visibly — until a scripted
//! resolution resets it to Dormant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::Risk;

/// A discrete escalation stage.
///
/// Ordered: `Dormant < Watching < Active < Breach`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The terminal is only a terminal.
    Dormant,
    /// Something reads along.
    Watching,
    /// It interferes.
    Active,
    /// It is coming through. A countdown runs.
    Breach,
}

impl Phase {
    /// The next phase up, if any.
    pub fn next(&self) -> Option<Phase> {
        match self {
            Self::Dormant => Some(Self::Watching),
            Self::Watching => Some(Self::Active),
            Self::Active => Some(Self::Breach),
            Self::Breach => None,
        }
    }

    /// Lowercase display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dormant => "dormant",
            Self::Watching => "watching",
            Self::Active => "active",
            Self::Breach => "breach",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tuning for the escalation machine. All values configurable; the defaults
/// are the shipped game balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Upper bound of the escalation score.
    pub max_score: u32,
    /// Score at which Watching begins.
    pub watch_at: u32,
    /// Score at which Active begins.
    pub active_at: u32,
    /// Score at which Breach begins.
    pub breach_at: u32,
    /// Idle ticks tolerated before idling starts to score.
    pub grace_ticks: u64,
    /// Score gained per idle tick beyond the grace period.
    pub idle_increment: u32,
    /// Score gained on a risky command.
    pub risky_increment: u32,
    /// Score drained by a calming command.
    pub calming_decrement: u32,
    /// Ticks from Breach entry until the forced failure fires.
    pub breach_countdown: u32,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            max_score: 12,
            watch_at: 3,
            active_at: 6,
            breach_at: 9,
            grace_ticks: 2,
            idle_increment: 1,
            risky_increment: 2,
            calming_decrement: 1,
            breach_countdown: 5,
        }
    }
}

impl PresenceConfig {
    /// Set the phase thresholds. Clamped so T1 <= T2 <= T3 <= max.
    pub fn with_thresholds(mut self, watch: u32, active: u32, breach: u32) -> Self {
        self.watch_at = watch.min(self.max_score);
        self.active_at = active.clamp(self.watch_at, self.max_score);
        self.breach_at = breach.clamp(self.active_at, self.max_score);
        self
    }

    /// Set the idle grace period, in ticks.
    pub fn with_grace_ticks(mut self, ticks: u64) -> Self {
        self.grace_ticks = ticks;
        self
    }

    /// Set the breach countdown, in ticks (minimum 1).
    pub fn with_breach_countdown(mut self, ticks: u32) -> Self {
        self.breach_countdown = ticks.max(1);
        self
    }

    /// Set the score bound (minimum: the breach threshold).
    pub fn with_max_score(mut self, max: u32) -> Self {
        self.max_score = max.max(self.breach_at);
        self
    }
}

/// What a single presence update produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenceUpdate {
    /// Phase entered by this update, if the boundary was crossed.
    pub entered: Option<Phase>,
    /// The breach countdown reached its deadline on this update.
    pub countdown_expired: bool,
    /// This update scored an idle tick (used for whisper pacing).
    pub scored_idle: bool,
}

/// The adversary escalation state machine.
#[derive(Debug, Clone)]
pub struct Presence {
    phase: Phase,
    score: u32,
    tick: u64,
    last_input_tick: u64,
    countdown: Option<u32>,
    config: PresenceConfig,
}

impl Presence {
    /// A dormant presence with score 0.
    pub fn new(config: PresenceConfig) -> Self {
        Self {
            phase: Phase::Dormant,
            score: 0,
            tick: 0,
            last_input_tick: 0,
            countdown: None,
            config,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current escalation score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ticks remaining on the breach countdown, if armed.
    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    /// Ticks observed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// The active configuration.
    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    /// Register a player command. Risky commands feed the score, calming
    /// ones drain it; either way the idle clock restarts.
    pub fn observe_command(&mut self, risk: Risk) -> PresenceUpdate {
        self.last_input_tick = self.tick;
        match risk {
            Risk::Risky => self.raise(self.config.risky_increment),
            Risk::Calming => self.lower(self.config.calming_decrement),
            Risk::Neutral => {}
        }
        PresenceUpdate {
            entered: self.advance_phase(),
            countdown_expired: false,
            scored_idle: false,
        }
    }

    /// Register one clock tick. Scores idling beyond the grace period and
    /// runs the breach countdown.
    pub fn observe_tick(&mut self) -> PresenceUpdate {
        self.tick += 1;

        let mut expired = false;
        if self.phase == Phase::Breach
            && let Some(remaining) = self.countdown
        {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                self.countdown = None;
                expired = true;
            } else {
                self.countdown = Some(remaining);
            }
        }

        let idle = self.tick - self.last_input_tick;
        let scored = idle > self.config.grace_ticks;
        if scored {
            self.raise(self.config.idle_increment);
        }

        PresenceUpdate {
            entered: self.advance_phase(),
            countdown_expired: expired,
            scored_idle: scored,
        }
    }

    /// Explicit reset: back to Dormant, score 0, countdown disarmed. Only a
    /// scripted resolution beat may invoke this.
    pub fn reset(&mut self) {
        self.phase = Phase::Dormant;
        self.score = 0;
        self.countdown = None;
    }

    /// Move directly to a phase at or above the current one, arming the
    /// countdown if Breach is entered. A backward move outside [`reset`] is
    /// an illegal state transition: fatal in debug builds, a silent no-op in
    /// release builds. State is never corrupted either way.
    ///
    /// [`reset`]: Presence::reset
    pub fn force_phase(&mut self, phase: Phase) -> Option<Phase> {
        if phase < self.phase {
            debug_assert!(
                false,
                "illegal presence transition: {} -> {}",
                self.phase, phase
            );
            return None;
        }
        if phase == self.phase {
            return None;
        }
        self.phase = phase;
        if phase == Phase::Breach {
            self.countdown = Some(self.config.breach_countdown);
        }
        Some(phase)
    }

    /// Capture the mutable state for persistence.
    pub fn snapshot(&self) -> PresenceSnapshot {
        PresenceSnapshot {
            phase: self.phase,
            score: self.score,
            tick: self.tick,
            last_input_tick: self.last_input_tick,
            countdown: self.countdown,
        }
    }

    /// Rebuild a presence from a snapshot and a configuration.
    pub fn from_snapshot(config: PresenceConfig, snap: &PresenceSnapshot) -> Self {
        Self {
            phase: snap.phase,
            score: snap.score.min(config.max_score),
            tick: snap.tick,
            last_input_tick: snap.last_input_tick,
            countdown: snap.countdown,
            config,
        }
    }

    fn raise(&mut self, by: u32) {
        self.score = (self.score + by).min(self.config.max_score);
    }

    fn lower(&mut self, by: u32) {
        self.score = self.score.saturating_sub(by);
    }

    /// Check the next phase boundary only: at most one step per update.
    fn advance_phase(&mut self) -> Option<Phase> {
        let next = self.phase.next()?;
        let threshold = match next {
            Phase::Dormant => return None,
            Phase::Watching => self.config.watch_at,
            Phase::Active => self.config.active_at,
            Phase::Breach => self.config.breach_at,
        };
        if self.score < threshold {
            return None;
        }
        self.phase = next;
        if next == Phase::Breach {
            self.countdown = Some(self.config.breach_countdown);
        }
        Some(next)
    }
}

/// The mutable state of a [`Presence`], detached from its configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Escalation score.
    pub score: u32,
    /// Ticks observed.
    pub tick: u64,
    /// Tick of the last player command.
    pub last_input_tick: u64,
    /// Remaining breach countdown, if armed.
    pub countdown: Option<u32>,
}
