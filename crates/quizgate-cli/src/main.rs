//! quizgate CLI: run the question engine over files on disk.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "quizgate",
    version,
    about = "Validation and grounding checks for generated quiz questions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and score candidate questions against source material
    Check {
        /// Raw model output holding the candidate questions
        #[arg(long)]
        candidates: PathBuf,

        /// Plain-text context file
        #[arg(long, required_unless_present = "request", conflicts_with = "request")]
        context: Option<PathBuf>,

        /// Generation request JSON whose context is assembled
        #[arg(long)]
        request: Option<PathBuf>,

        /// Override the minimum grounding score
        #[arg(long)]
        min_grounding: Option<f64>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Save the response envelope as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the grounding context assembled from a request
    Context {
        /// Generation request JSON
        #[arg(long)]
        request: PathBuf,

        /// Override the context length cap
        #[arg(long)]
        max_chars: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizgate=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            candidates,
            context,
            request,
            min_grounding,
            format,
            output,
            config,
        } => commands::check::execute(
            candidates,
            context,
            request,
            min_grounding,
            format,
            output,
            config,
        ),
        Commands::Context {
            request,
            max_chars,
            config,
        } => commands::context::execute(request, max_chars, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
