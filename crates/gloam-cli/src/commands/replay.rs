use std::path::Path;

use colored::Colorize;

use gloam_session::Session;

/// Feed a scripted input file through a session: `ticks_between` clock ticks
/// are enqueued before each line, so escalation timing is reproducible.
pub fn run(
    input: &Path,
    story: Option<&Path>,
    ticks_between: u64,
    export_to: Option<&Path>,
) -> Result<(), String> {
    let pack = super::load_story(story)?;
    let mut session =
        Session::new(pack).map_err(|e| format!("failed to start session: {e}"))?;

    let script = std::fs::read_to_string(input)
        .map_err(|e| format!("cannot read {}: {e}", input.display()))?;
    for line in script.lines() {
        for _ in 0..ticks_between {
            session.enqueue_tick();
        }
        session.enqueue_input(line);
    }

    let turns = session.drain().map_err(|e| e.to_string())?;

    let mut last_blob = None;
    for turn in &turns {
        if turn.input.is_empty() {
            if !turn.output.is_empty() {
                println!("{}\n", turn.output.dimmed());
            }
        } else {
            println!("> {}", turn.input);
            if !turn.output.is_empty() {
                println!("{}", turn.output);
            }
            println!();
        }
        if let Some(blob) = &turn.export {
            last_blob = Some(blob.clone());
        }
    }

    match session.ended() {
        Some(outcome) => println!("  -- session {outcome} --"),
        None => println!(
            "  -- session abandoned after {} turns --",
            session.transcript().len()
        ),
    }

    if let Some(path) = export_to {
        let blob = match last_blob {
            Some(blob) => blob,
            None => session.export().map_err(|e| e.to_string())?,
        };
        std::fs::write(path, blob)
            .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        println!("  Exported to {}", path.display());
    }

    Ok(())
}
