//! CLI frontend and terminal adapter for Gloam.

mod commands;
mod story;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gloam",
    about = "Gloam — a haunted-terminal narrative engine",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story interactively at this terminal
    Play {
        /// Story file to load (default: the built-in story)
        #[arg(short, long)]
        story: Option<PathBuf>,

        /// Milliseconds between clock ticks
        #[arg(long, default_value = "1000")]
        tick_ms: u64,

        /// Disable the clock entirely (the presence only reacts to commands)
        #[arg(long)]
        no_ticks: bool,
    },

    /// Validate a story file and report its shape
    Check {
        /// Story file to check (default: the built-in story)
        #[arg(short, long)]
        story: Option<PathBuf>,
    },

    /// Write the built-in story as a JSON template to edit
    Init {
        /// Path of the story file to create
        path: PathBuf,
    },

    /// Feed a scripted input file through a session and print the turns
    Replay {
        /// File with one input line per session line
        input: PathBuf,

        /// Story file to load (default: the built-in story)
        #[arg(short, long)]
        story: Option<PathBuf>,

        /// Clock ticks enqueued before each input line
        #[arg(long, default_value = "0")]
        ticks_between: u64,

        /// Write the final transcript export to this file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            story,
            tick_ms,
            no_ticks,
        } => commands::play::run(story.as_deref(), tick_ms, no_ticks),
        Commands::Check { story } => commands::check::run(story.as_deref()),
        Commands::Init { path } => commands::init::run(&path),
        Commands::Replay {
            input,
            story,
            ticks_between,
            export,
        } => commands::replay::run(&input, story.as_deref(), ticks_between, export.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
