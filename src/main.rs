//! Table data overwrite and schema-scope tool
//!
//! Provides CLI interface for replacing destination MySQL tables with the
//! contents of their source counterparts, and for inspecting scope rules.

// schemasync/src/main.rs
mod config;
mod errors;
mod notify;
mod scope;
mod sync;
mod utils;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use errors::Result;

#[derive(Parser)]
#[command(
    name = "schemasync",
    about = "Overwrite MySQL table data from a source database and inspect sync scope rules",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the TOML configuration file
    #[arg(long, env = "SCHEMASYNC_CONF", default_value = "config.toml", global = true)]
    conf: PathBuf,

    /// Failure mail recipients, replacing `email.to` from the configuration
    #[arg(long, global = true)]
    mail_to: Option<String>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Truncate and reload every table listed under [overwrite_data] (default)
    Overwrite,
    /// Validate the configuration and test both connections
    Check,
    /// Show how the scope rules treat a table and its objects
    Scope(ScopeArgs),
}

#[derive(Args)]
struct ScopeArgs {
    #[arg(long)]
    table: String,
    #[arg(long)]
    column: Option<String>,
    #[arg(long)]
    index: Option<String>,
    #[arg(long)]
    foreign: Option<String>,
}

/// Main entry point for the overwrite tool
#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Failed to load configuration from {}: {}", cli.conf.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match run_command(cli.command.unwrap_or(Commands::Overwrite), &config).await {
        Ok(()) => {
            info!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ Error: {}", e);
            if let Err(mail_err) = notify::send_failure_mail(&config, &e.to_string()) {
                warn!("⚠️ Could not send failure mail: {}", mail_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_from_toml(&cli.conf)?;
    if let Some(to) = &cli.mail_to {
        config.override_mail_to(to);
    }
    info!("config:\n{}", config);
    Ok(config)
}

async fn run_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Overwrite => {
            info!("🚀 Starting overwrite-data process...");
            sync::run_overwrite_flow(config).await?;
        }
        Commands::Check => {
            println!("{}", config);
            utils::setting::check_db_connection(&config.source).await?;
            utils::setting::check_db_connection(&config.dest).await?;
        }
        Commands::Scope(args) => print_scope(config, &args),
    }
    Ok(())
}

fn print_scope(config: &Config, args: &ScopeArgs) {
    let scope = config.scope();
    let table = &args.table;

    println!(
        "table {}: in scope = {}, excluded = {}",
        table,
        scope.matches_table_scope(table),
        scope.is_table_excluded(table)
    );
    if let Some(column) = &args.column {
        println!(
            "column {}.{}: ignored = {}",
            table,
            column,
            scope.is_column_ignored(table, column)
        );
    }
    if let Some(index) = &args.index {
        println!(
            "index {}.{}: ignored = {}",
            table,
            index,
            scope.is_index_ignored(table, index)
        );
    }
    if let Some(foreign) = &args.foreign {
        println!(
            "foreign key {}.{}: ignored = {}",
            table,
            foreign,
            scope.is_foreign_key_ignored(table, foreign)
        );
    }
}
