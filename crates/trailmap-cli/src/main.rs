//! trailmap CLI — learner progress, pathways and leaderboards.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "trailmap",
    version,
    about = "Learner progress, pathway layout and leaderboards"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a completion percentage
    Progress {
        /// Total number of items
        #[arg(long, allow_negative_numbers = true)]
        total: i64,

        /// Number of completed items
        #[arg(long, allow_negative_numbers = true)]
        completed: i64,
    },

    /// Compute the display position of one pathway stop
    Position {
        /// 1-based position of the stop
        #[arg(long, allow_negative_numbers = true)]
        order: i64,

        /// Number of stops on the pathway
        #[arg(long, allow_negative_numbers = true)]
        total: i64,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show a learner's pathway through a course
    Pathway {
        /// Dataset file (.toml or .json)
        #[arg(long)]
        dataset: PathBuf,

        /// Learner ID
        #[arg(long)]
        user: String,

        /// Course ID
        #[arg(long)]
        course: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Rank learners in a course
    Leaderboard {
        /// Dataset file (.toml or .json)
        #[arg(long)]
        dataset: PathBuf,

        /// Course ID
        #[arg(long)]
        course: String,

        /// Learner whose standing is reported
        #[arg(long)]
        user: Option<String>,

        /// Number of rows to show (default: from config)
        #[arg(long)]
        top: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build a learner dashboard and write report files
    Report {
        /// Dataset file (.toml or .json)
        #[arg(long)]
        dataset: PathBuf,

        /// Learner ID
        #[arg(long)]
        user: String,

        /// Restrict to these course IDs (comma-separated)
        #[arg(long)]
        course: Option<String>,

        /// Output format: json, html, all (default: from config)
        #[arg(long)]
        format: Option<String>,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate dataset files
    Validate {
        /// Path to dataset file or directory
        #[arg(long)]
        dataset: PathBuf,
    },

    /// Create starter config and example dataset
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trailmap=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Progress { total, completed } => commands::progress::execute(total, completed),
        Commands::Position {
            order,
            total,
            config,
        } => commands::position::execute(order, total, config),
        Commands::Pathway {
            dataset,
            user,
            course,
            config,
        } => commands::pathway::execute(dataset, user, course, config),
        Commands::Leaderboard {
            dataset,
            course,
            user,
            top,
            config,
        } => commands::leaderboard::execute(dataset, course, user, top, config),
        Commands::Report {
            dataset,
            user,
            course,
            format,
            output,
            config,
        } => commands::report::execute(dataset, user, course, format, output, config),
        Commands::Validate { dataset } => commands::validate::execute(dataset),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
