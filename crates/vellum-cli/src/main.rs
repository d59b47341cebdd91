//! Vellum CLI — document intelligence for markdown project vaults.
//!
//! The binary is the transport collaborator: each subcommand runs one
//! core operation against the vault and marshals its structured result
//! as JSON on stdout. Logs go to stderr so stdout stays machine-readable.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vellum_vault::Vault;

#[derive(Parser)]
#[command(name = "vellum")]
#[command(version)]
#[command(about = "Document intelligence for markdown project vaults")]
struct Cli {
    /// Vault root directory.
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the structural contract check and append its report to the
    /// maintenance log
    Check,
    /// Triage open tasks into priority buckets and rewrite the summary
    Triage,
    /// Regenerate the current-focus snapshot
    Status,
    /// Ranked free-text search; persists search notes
    #[command(alias = "s")]
    Search {
        /// Term to look for (case-insensitive substring)
        term: String,
    },
    /// Answer a constrained natural-language question with citations
    #[command(alias = "q")]
    Query {
        /// The question to match against the supported intents
        question: String,
    },
    /// Assemble the context bundle from the current-focus document
    Context {
        /// Cap on linked sources pulled into the bundle (1-50)
        #[arg(long)]
        max_sources: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let vault = Vault::open(&cli.vault)?;
    let now = Local::now();

    let output = match cli.command {
        Commands::Check => serde_json::to_value(vellum_audit::run_contract_check(&vault, now)?)?,
        Commands::Triage => serde_json::to_value(vellum_triage::run_triage(&vault, now)?)?,
        Commands::Status => serde_json::to_value(vellum_triage::run_status(&vault)?)?,
        Commands::Search { term } => {
            let results = vellum_query::run_search(&vault, &term, now)?;
            serde_json::json!({ "term": term.trim(), "results": results })
        }
        Commands::Query { question } => {
            serde_json::to_value(vellum_query::answer_question(&vault, &question)?)?
        }
        Commands::Context { max_sources } => {
            serde_json::to_value(vellum_query::assemble_context(&vault, now, max_sources)?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
