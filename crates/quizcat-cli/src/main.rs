//! quizcat CLI — inspect, grade, and maintain question catalogues.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizcat", version, about = "Question catalogue toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate catalogue JSON files
    Validate {
        /// Path to catalogue file or directory
        #[arg(long)]
        catalogue: PathBuf,
    },

    /// List the sections of a catalogue, or the questions of one section
    Show {
        /// Catalogue JSON file
        #[arg(long)]
        catalogue: PathBuf,

        /// Section id to list questions for
        #[arg(long)]
        section: Option<String>,
    },

    /// Grade a single answer
    Grade {
        /// Catalogue JSON file
        #[arg(long)]
        catalogue: PathBuf,

        /// Section id
        #[arg(long)]
        section: String,

        /// Question id
        #[arg(long)]
        question: String,

        /// The answer to grade (a number for estimation questions)
        #[arg(long)]
        answer: String,
    },

    /// Copy a file into the media directory under its content hash
    Media {
        /// File to import
        #[arg(long)]
        file: PathBuf,

        /// Media directory (overrides config)
        #[arg(long)]
        media_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build a synthetic catalogue and time dump, restore, and lookup
    Smoke {
        /// Number of sections
        #[arg(long, default_value = "12")]
        sections: usize,

        /// Questions of each kind per section
        #[arg(long, default_value = "250")]
        questions: usize,

        /// Write the generated catalogue here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example catalogue
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizcat=info".parse().expect("static directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { catalogue } => commands::validate::execute(catalogue),
        Commands::Show { catalogue, section } => commands::show::execute(catalogue, section),
        Commands::Grade {
            catalogue,
            section,
            question,
            answer,
        } => commands::grade::execute(catalogue, section, question, answer),
        Commands::Media {
            file,
            media_dir,
            config,
        } => commands::media::execute(file, media_dir, config),
        Commands::Smoke {
            sections,
            questions,
            output,
            config,
        } => commands::smoke::execute(sections, questions, output, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
