//! mathdrill CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "mathdrill", version, about = "Arithmetic practice in the terminal")]
struct Cli {
    /// Directory holding match history and settings
    #[arg(long, default_value = "./mathdrill-data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a practice match
    Play {
        /// Run a timed session of this many seconds
        #[arg(long, conflicts_with = "count")]
        timed: Option<u32>,

        /// Run a fixed-count session of this many questions
        #[arg(long)]
        count: Option<u32>,
    },

    /// List past matches, most recent first
    History,

    /// Per-question detail for one match
    Show {
        /// Match id, as shown by `history`
        #[arg(long)]
        id: Uuid,
    },

    /// Aggregate statistics over the match history
    Stats,

    /// Show or update practice settings
    Settings {
        /// Enable operators (comma-separated: add,subtract,multiply,divide)
        #[arg(long)]
        enable: Option<String>,

        /// Disable operators (comma-separated)
        #[arg(long)]
        disable: Option<String>,

        /// Set an operator's ranges: op=min1:max1,min2:max2 (repeatable)
        #[arg(long)]
        range: Vec<String>,

        /// Default timed-session length in seconds
        #[arg(long)]
        duration: Option<u32>,

        /// Default fixed-count session length
        #[arg(long)]
        count: Option<u32>,
    },

    /// Delete all match history
    Clear {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mathdrill=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir;

    let result = match cli.command {
        Commands::Play { timed, count } => commands::play::execute(&data_dir, timed, count).await,
        Commands::History => commands::history::execute(&data_dir),
        Commands::Show { id } => commands::show::execute(&data_dir, id),
        Commands::Stats => commands::stats::execute(&data_dir),
        Commands::Settings {
            enable,
            disable,
            range,
            duration,
            count,
        } => commands::settings::execute(
            &data_dir,
            enable.as_deref(),
            disable.as_deref(),
            &range,
            duration,
            count,
        ),
        Commands::Clear { yes } => commands::clear::execute(&data_dir, yes),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
