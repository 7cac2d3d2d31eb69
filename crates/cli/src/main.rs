//! Polls CLI - Database migrations and poll management.
//!
//! # Usage
//!
//! ```bash
//! # Create the polls schema and the session table
//! polls migrate
//!
//! # Publish a question now, or schedule one
//! polls question create --text "What's new?"
//! polls question create --text "Coming soon?" --in-days 3
//!
//! # Attach choices
//! polls choice add --question 1 --text "Not much"
//!
//! # Bulk-load questions and choices
//! polls seed polls.yaml
//! ```
//!
//! All commands read `POLLS_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "polls")]
#[command(author, version, about = "Polls CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (poll tables and sessions)
    Migrate,
    /// Manage questions
    Question {
        #[command(subcommand)]
        action: QuestionAction,
    },
    /// Manage choices
    Choice {
        #[command(subcommand)]
        action: ChoiceAction,
    },
    /// Create questions and choices from a YAML file
    Seed {
        /// Path to the YAML file
        file: String,
    },
}

#[derive(Subcommand)]
enum QuestionAction {
    /// Create a question
    Create {
        /// Question text (at most 200 characters)
        #[arg(short, long)]
        text: String,

        /// Publication time (RFC 3339); defaults to now
        #[arg(long, conflicts_with = "in_days")]
        pub_date: Option<String>,

        /// Publish this many days from now (negative for the past)
        #[arg(long, allow_hyphen_values = true)]
        in_days: Option<i64>,
    },
    /// List every question, including unpublished ones
    List,
    /// Delete a question and its choices
    Delete {
        /// Question ID
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum ChoiceAction {
    /// Add a choice to a question
    Add {
        /// Question ID
        #[arg(short, long)]
        question: String,

        /// Choice text (at most 200 characters)
        #[arg(short, long)]
        text: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Question { action } => match action {
            QuestionAction::Create {
                text,
                pub_date,
                in_days,
            } => {
                commands::poll::create_question(&text, pub_date.as_deref(), in_days).await?;
            }
            QuestionAction::List => commands::poll::list_questions().await?,
            QuestionAction::Delete { id } => commands::poll::delete_question(&id).await?,
        },
        Commands::Choice { action } => match action {
            ChoiceAction::Add { question, text } => {
                commands::poll::add_choice(&question, &text).await?;
            }
        },
        Commands::Seed { file } => commands::seed::from_file(&file).await?,
    }
    Ok(())
}
