// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 出力フォーマット
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

/// Sediment - Entity-driven table synchronization
///
/// Creates missing tables and adds missing columns so that the database
/// matches declared entity definitions.
#[derive(Parser, Debug)]
#[command(name = "sediment")]
#[command(author = "Sediment Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Entity-driven table synchronization tool")]
#[command(long_about = "Sediment - Entity-driven table synchronization

Reads entity definitions, checks which tables and columns already exist,
and issues only the CREATE TABLE / ALTER TABLE ADD / CREATE INDEX
statements needed to bring each table up to date.

Columns are never dropped or altered; synchronization is additive and idempotent.")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Create .sediment.yaml with a database environment
  2. Declare entities in the entities/ directory
  3. Check definitions offline:     sediment validate
  4. Preview DDL:                   sediment sync --dry-run
  5. Apply DDL:                     sediment sync

For detailed help on each command, use: sediment <command> --help")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize database tables with entity definitions
    ///
    /// Creates tables that do not exist yet and adds columns that are
    /// missing from existing tables, followed by their indexes.
    ///
    /// EXAMPLES:
    ///   # Synchronize the development environment
    ///   sediment sync
    ///
    ///   # Preview statements without executing them
    ///   sediment sync --dry-run
    ///
    ///   # Synchronize production
    ///   sediment sync --env production
    Sync {
        /// Target environment
        #[arg(short, long, value_name = "ENV", default_value = "development")]
        env: String,

        /// Dry run - show DDL without executing
        #[arg(long)]
        dry_run: bool,

        /// Entity definition directory (defaults to schema_dir in config)
        #[arg(long, value_name = "DIR")]
        schema_dir: Option<PathBuf>,
    },

    /// Validate entity definitions without touching the database
    ///
    /// Parses every entity file, resolves column types and prints the
    /// CREATE TABLE statement each entity would produce.
    ///
    /// EXAMPLES:
    ///   sediment validate
    ///   sediment validate --schema-dir ./entities
    Validate {
        /// Entity definition directory (defaults to schema_dir in config)
        #[arg(long, value_name = "DIR")]
        schema_dir: Option<PathBuf>,
    },
}
