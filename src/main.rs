//! # Content Vault CLI (`cvault`)
//!
//! The `cvault` binary is the human front end over the content store. It
//! provides commands for ingesting markdown documents, retrieving and
//! patching records, enumerating by status, and retention maintenance.
//!
//! ## Usage
//!
//! ```bash
//! cvault --config ./cvault.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cvault init` | Create the data directory and rebuild the dedup index |
//! | `cvault add <file>` | Store a markdown document (deduplicating) |
//! | `cvault get <id>` | Print a record's metadata and body |
//! | `cvault meta <id>` | Print a record's metadata only |
//! | `cvault set <id> k=v…` | Patch metadata fields on a record |
//! | `cvault list` | Enumerate records, optionally by status/window |
//! | `cvault cleanup` | Delete records past the retention window |
//! | `cvault stats` | Show store statistics |

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use content_vault::{add, config, get, list, models, stats, store};

/// Content Vault — a local-first deduplicating content store for digest
/// pipelines.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; built-in defaults apply when the file is absent.
#[derive(Parser)]
#[command(
    name = "cvault",
    about = "Content Vault — a local-first deduplicating content store for digest pipelines",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./cvault.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and rebuild the dedup index.
    ///
    /// Idempotent: running it against an existing store just reports the
    /// record count.
    Init,

    /// Store a markdown document, deduplicating by URL and content.
    Add {
        /// Path to the markdown file, or `-` for stdin.
        file: PathBuf,

        /// Source URL of the document.
        #[arg(long)]
        url: String,

        /// Content source: html, pdf, or youtube.
        #[arg(long)]
        source_type: String,

        /// Document title, mixed into the content fingerprint.
        #[arg(long)]
        title: Option<String>,
    },

    /// Print a record's metadata and body.
    Get { id: String },

    /// Print a record's metadata only.
    Meta { id: String },

    /// Patch metadata fields on a record.
    ///
    /// Patch keys overwrite existing values; everything else, including the
    /// body, is untouched.
    Set {
        id: String,

        /// Fields to set, as key=value pairs.
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Enumerate stored records.
    List {
        /// Only records with this exact status.
        #[arg(long)]
        status: Option<String>,

        /// Only records added in the last N days (requires --status).
        #[arg(long, requires = "status")]
        days: Option<i64>,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Delete records older than the retention window.
    Cleanup {
        /// Override retention.ttl_days from the config.
        #[arg(long)]
        ttl_days: Option<i64>,
    },

    /// Show store statistics.
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;
    let mut store = store::ContentStore::open(config.storage.data_dir.as_path())?;

    match cli.command {
        Commands::Init => {
            println!(
                "initialized {} ({} record{})",
                store.root().display(),
                store.record_count(),
                if store.record_count() == 1 { "" } else { "s" }
            );
        }
        Commands::Add {
            file,
            url,
            source_type,
            title,
        } => {
            add::run_add(&mut store, &file, &url, &source_type, title.as_deref())?;
        }
        Commands::Get { id } => {
            get::run_get(&store, &id)?;
        }
        Commands::Meta { id } => {
            get::run_meta(&store, &id)?;
        }
        Commands::Set { id, fields } => {
            let mut patch = models::Metadata::new();
            for field in &fields {
                let (key, value) = field.split_once('=').ok_or_else(|| {
                    anyhow::anyhow!("invalid field '{}', expected key=value", field)
                })?;
                patch.insert(key, value);
            }
            store.update_metadata(&id, &patch)?;
            println!("updated {}", id);
        }
        Commands::List { status, days, json } => {
            list::run_list(&store, status.as_deref(), days, json)?;
        }
        Commands::Cleanup { ttl_days } => {
            let ttl = ttl_days.unwrap_or(config.retention.ttl_days);
            let removed = store.cleanup(ttl)?;
            println!(
                "removed {} file{}",
                removed,
                if removed == 1 { "" } else { "s" }
            );
        }
        Commands::Stats => {
            stats::run_stats(&store)?;
        }
    }

    Ok(())
}
