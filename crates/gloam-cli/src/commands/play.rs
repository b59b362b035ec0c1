use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use colored::Colorize;

use gloam_engine::Phase;
use gloam_session::{Session, SessionTurn};

/// Events the adapter feeds into the session's queue: input lines from the
/// reader thread, ticks from the clock thread, multiplexed over one channel.
enum AdapterEvent {
    Line(String),
    Tick,
    Eof,
}

pub fn run(story: Option<&Path>, tick_ms: u64, no_ticks: bool) -> Result<(), String> {
    let pack = super::load_story(story)?;
    let mut session =
        Session::new(pack).map_err(|e| format!("failed to start session: {e}"))?;

    println!("  {} {}", "Starting".bold(), session.name().bold());
    println!(
        "  Type 'help' for commands. The clock is {}.\n",
        if no_ticks { "off" } else { "running" }
    );

    let (tx, rx) = mpsc::channel();

    let input_tx = tx.clone();
    thread::spawn(move || {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => {
                    let _ = input_tx.send(AdapterEvent::Eof);
                    break;
                }
                Ok(_) => {
                    let event = AdapterEvent::Line(line.trim_end().to_string());
                    if input_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        }
    });

    if no_ticks {
        drop(tx);
    } else {
        thread::spawn(move || {
            loop {
                thread::sleep(Duration::from_millis(tick_ms.max(100)));
                if tx.send(AdapterEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }

    prompt()?;

    for event in rx {
        let was_line = match event {
            AdapterEvent::Line(line) => {
                session.enqueue_input(line);
                true
            }
            AdapterEvent::Tick => {
                session.enqueue_tick();
                false
            }
            AdapterEvent::Eof => break,
        };

        let turns = session.drain().map_err(|e| e.to_string())?;

        let phase = session.engine().presence().phase();
        let mut printed = false;
        for turn in &turns {
            printed |= render(turn, phase);
            if let Some(blob) = &turn.export {
                let path = download(&session, blob)?;
                println!("  Saved transcript to {}\n", path.display());
                printed = true;
            }
        }

        if let Some(outcome) = session.ended() {
            println!("\n  -- session {outcome} --");
            break;
        }
        if was_line || printed {
            prompt()?;
        }
    }

    Ok(())
}

fn prompt() -> Result<(), String> {
    print!("> ");
    io::stdout().flush().map_err(|e| e.to_string())
}

/// Print one turn's output, tinted by the presence phase. Tick output
/// (whispers, entry beats) renders dimmed when the phase is still calm.
fn render(turn: &SessionTurn, phase: Phase) -> bool {
    if turn.output.is_empty() {
        return false;
    }
    let text = match phase {
        Phase::Breach => turn.output.red().to_string(),
        Phase::Active => turn.output.yellow().to_string(),
        _ if turn.input.is_empty() => turn.output.dimmed().italic().to_string(),
        _ => turn.output.clone(),
    };
    println!("{text}\n");
    true
}

/// The download half of the adapter contract: the session hands over a
/// finished blob, the adapter decides where it lands.
fn download(session: &Session, blob: &str) -> Result<PathBuf, String> {
    let id = session.id().to_string();
    let short = id.get(..8).unwrap_or(&id);
    let path = PathBuf::from(format!("gloam-{short}.json"));
    std::fs::write(&path, blob).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    Ok(path)
}
