mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "binflow")]
#[command(about = "Binflow - extract the first local entry of a ZIP archive", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the first entry's raw payload to a file named after it
    Extract {
        /// Path to the archive
        archive: String,

        /// Directory the payload file is written into
        #[arg(short = 'C', long, default_value = ".")]
        dest: String,
    },

    /// Print the first entry's header and trailing fields
    Info {
        /// Path to the archive
        archive: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    let code = match cli.command {
        Commands::Extract { archive, dest } => commands::extract::execute(&archive, &dest),

        Commands::Info { archive, json } => commands::info::execute(&archive, json),
    };

    ExitCode::from(code)
}
