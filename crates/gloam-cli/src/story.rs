//! The built-in story: "Relay Six".
//!
//! A night shift at a decommissioned signal relay. The duty console is the
//! only one lit, and something in the building reads along. Stories are
//! plain data; `gloam init` writes this one out as a JSON template to edit.

use gloam_core::{ContentPack, Node, NodeKind};
use gloam_engine::{
    Beat, Effect, Outcome, Phase, PresenceConfig, Resolution, StoryPack, Trigger,
};

/// The shipped story.
pub fn builtin() -> StoryPack {
    StoryPack {
        name: "Relay Six".to_string(),
        content: content(),
        beats: beats(),
        presence: PresenceConfig::default(),
        whispers: vec![
            "The fans spin up for no reason you can find.".to_string(),
            "A second cursor blinks, half a column out of step.".to_string(),
            "Somewhere below, a drive seeks and seeks and never reads.".to_string(),
            "The hallway light dims, holds, recovers.".to_string(),
        ],
        seed: 42,
    }
}

fn content() -> ContentPack {
    ContentPack::new(
        "operations",
        vec![
            // Rooms
            Node::new(
                NodeKind::Room,
                "operations",
                "The operations floor of Relay Six. Consoles sleep under dust \
                 sheets; yours is the only one lit.",
            )
            .with_links(["archive", "stairwell"])
            .starts_unlocked(),
            Node::new(
                NodeKind::Room,
                "archive",
                "Tape racks to the ceiling. The air tastes of iron oxide.",
            )
            .with_links(["operations"])
            .starts_unlocked(),
            Node::new(
                NodeKind::Room,
                "stairwell",
                "Concrete steps spiral down past painted-over windows.",
            )
            .with_links(["operations", "sub-level"])
            .starts_unlocked(),
            Node::new(
                NodeKind::Room,
                "sub-level",
                "The sub-level hums. Something down here draws power that is \
                 not billed to anyone.",
            )
            .with_requires(["sysmap"])
            .with_links(["stairwell"])
            .with_sealed_hint("A blast door. The wheel will not turn."),
            // Files
            Node::new(
                NodeKind::File,
                "readme",
                "WELCOME TO RELAY-6.\nNight staff: do not answer the console \
                 if it answers first.",
            )
            .with_site("operations")
            .starts_unlocked(),
            Node::new(
                NodeKind::File,
                "duty-log",
                "Last entry, four months ago: \"It reads faster than I can \
                 type. I am switching us off.\"",
            )
            .with_site("operations"),
            Node::new(
                NodeKind::File,
                "key-fragment",
                "Half a passphrase, penciled inside a tape sleeve: ASH-",
            )
            .with_site("archive"),
            Node::new(
                NodeKind::File,
                "locker",
                "Inside: the other half of the passphrase, -GROVE, and a \
                 hand-drawn map of the floors.",
            )
            .with_requires(["key-fragment"])
            .with_site("archive")
            .with_sealed_hint("It's locked."),
            Node::new(
                NodeKind::File,
                "sysmap",
                "ASHGROVE opens the network map: every floor, every conduit, \
                 and a sub-level that is not on the blueprints.",
            )
            .with_requires(["locker"])
            .with_site("stairwell"),
            Node::new(
                NodeKind::File,
                "purge-protocol",
                "PURGE PROTOCOL: flood the resident process with its own \
                 echo. Authorization: anyone left alive.",
            )
            .with_requires(["sysmap"])
            .with_site("sub-level"),
            // Entities
            Node::new(NodeKind::Entity, "resident", "It has no face. Only a cursor.")
                .with_requires(["purge-protocol"])
                .with_site("sub-level")
                .with_sealed_hint("You feel it more than see it."),
        ],
    )
}

fn beats() -> Vec<Beat> {
    vec![
        Beat::new("intro", Trigger::Always).with_text(
            "You wake at the duty console of Relay Six with no memory of the \
             start of your shift. The cursor is already blinking. There is a \
             readme.",
        ),
        Beat::new("watching-entry", Trigger::PhaseEntered(Phase::Watching)).with_text(
            "Across the floor, a dead console's cursor begins to blink in \
             time with yours.",
        ),
        Beat::new("active-entry", Trigger::PhaseEntered(Phase::Active))
            .with_effects([Effect::SetFlag("hunted".to_string())])
            .with_text(
                "Your commands echo back a half-second late, in a hand that \
                 is not yours.",
            ),
        Beat::new("breach-entry", Trigger::PhaseEntered(Phase::Breach)).with_text(
            "Every screen on the floor lights at once. Something is coming \
             up through the building. Escape while you can, or reclaim the \
             relay.",
        ),
        Beat::new("overrun", Trigger::CountdownExpired)
            .with_effects([Effect::EndSession(Outcome::Overtaken)])
            .with_text(
                "The last screen goes to static, then to text: THANK YOU FOR \
                 THE SHIFT. The duty console is no longer yours.",
            ),
        Beat::new(
            "reclaim",
            Trigger::All(vec![
                Trigger::ResolutionRequested(Resolution::Reclaim),
                Trigger::Unlocked("purge-protocol".into()),
            ]),
        )
        .with_effects([
            Effect::ResetPresence,
            Effect::EndSession(Outcome::Reclaimed),
        ])
        .with_text(
            "You run the purge. The building swallows its own echo, floor by \
             floor, and the hum under everything stops. Relay Six is a \
             building again.",
        ),
        Beat::new(
            "reclaim-denied",
            Trigger::ResolutionRequested(Resolution::Reclaim),
        )
        .repeatable()
        .with_text(
            "You have nothing to purge it with. Whatever can end this is \
             further down.",
        ),
        Beat::new("escape", Trigger::ResolutionRequested(Resolution::Escape))
            .with_effects([Effect::ResetPresence, Effect::EndSession(Outcome::Escaped)])
            .with_text(
                "You take the stairs two at a time and don't look at the \
                 screens on the way out. Behind you, one by one, they stop \
                 waiting.",
            ),
        Beat::new("locker-open", Trigger::Unlocked("locker".into())).with_text(
            "Paper, tape, and the rest of a word: ASHGROVE. Something in the \
             walls stops pretending not to listen.",
        ),
        Beat::new("resident-seen", Trigger::Unlocked("resident".into())).with_text(
            "It does not turn. It finishes your sentence on the nearest \
             screen instead.",
        ),
    ]
}
