//! Shortsmith CLI — Command-line interface for producing narrated shorts.
//!
//! Usage:
//!   shortsmith render [OPTIONS]    Render a single short from explicit inputs
//!   shortsmith batch [OPTIONS]     Render every unprocessed narration in the data directory
//!   shortsmith check               Check external tool availability

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod ledger;

#[derive(Parser)]
#[command(
    name = "shortsmith",
    about = "Assemble narrated vertical shorts from footage, audio, and transcripts",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single short from explicit inputs
    Render {
        /// Title drawn at the top of the frame
        #[arg(short, long)]
        title: String,

        /// Background footage file
        #[arg(short, long)]
        footage: PathBuf,

        /// Narration audio file
        #[arg(short, long)]
        narration: PathBuf,

        /// SRT transcript aligned to the narration
        #[arg(long)]
        transcript: Option<PathBuf>,

        /// Article text file; image URLs are pulled from its "Images:" line
        #[arg(long)]
        article: Option<PathBuf>,

        /// Local overlay image, repeatable
        #[arg(long = "image")]
        images: Vec<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output width
        #[arg(long, default_value = "1080")]
        width: u32,

        /// Output height
        #[arg(long, default_value = "1920")]
        height: u32,

        /// Output frame rate
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Font file for title and subtitle text
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Render every unprocessed narration found in the data directory
    Batch {
        /// Data directory holding generated_audio, generated_articles,
        /// and generated_transcripts (defaults to the configured one)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Background footage file shared by every short
        #[arg(short, long)]
        footage: PathBuf,

        /// Output directory for finished shorts
        #[arg(long)]
        shorts_dir: Option<PathBuf>,

        /// Stop after rendering this many shorts
        #[arg(long)]
        limit: Option<usize>,

        /// Re-render titles already recorded in the processed ledger
        #[arg(long)]
        force: bool,
    },

    /// Check external tool availability
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    shortsmith_common::logging::init_logging(&shortsmith_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Render {
            title,
            footage,
            narration,
            transcript,
            article,
            images,
            output,
            width,
            height,
            fps,
            font,
        } => {
            commands::render::run(
                title, footage, narration, transcript, article, images, output, width, height,
                fps, font,
            )
            .await
        }
        Commands::Batch {
            data_dir,
            footage,
            shorts_dir,
            limit,
            force,
        } => commands::batch::run(data_dir, footage, shorts_dir, limit, force).await,
        Commands::Check => commands::check::run(),
    }
}
