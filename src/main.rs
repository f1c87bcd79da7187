//! Toolhost CLI - lists, browses and runs registered tools.
//!
//! Stands in for a presentation layer: every command goes through the same
//! [`Dispatcher`] a UI would use, and `run` prints the public result envelope.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use toolhost::observability::init_tracing;
use toolhost::tools::builtin::builtin_registry;
use toolhost::{identity, Config, Dispatcher, Error, Params};

#[derive(Parser)]
#[command(name = "toolhost")]
#[command(version)]
#[command(about = "Tool registry and dispatcher")]
struct Cli {
    /// JSON configuration file; TOOLHOST_* variables override it
    #[arg(long, env = "TOOLHOST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tool catalog
    List,
    /// Print the navigation tree
    Tree,
    /// Run one tool and print its result envelope
    Run {
        /// Tool path, e.g. RAD/ingestor/timeline
        path: String,
        /// Parameters as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,
        /// Caller identity; defaults to USER_ID, then USER
        #[arg(long)]
        user: Option<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> toolhost::Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    config.apply_env()?;
    Ok(config)
}

fn parse_params(raw: &str) -> toolhost::Result<Params> {
    match serde_json::from_str::<serde_json::Value>(raw)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(Error::config(format!(
            "--params must be a JSON object, got {}",
            other
        ))),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config.observability);

    let registry = builtin_registry().map_err(|err| {
        if err.is_registration_error() {
            tracing::error!(error = %err, "tool registry misconfigured");
        }
        err
    })?;
    let registry = Arc::new(registry);
    let dispatcher = Dispatcher::with_config(registry, config.dispatch.clone());

    match cli.command {
        Commands::List => {
            let catalog = dispatcher.registry().catalog();
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        Commands::Tree => {
            let tree = dispatcher.registry().navigation();
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Commands::Run { path, params, user } => {
            let params = parse_params(&params)?;
            let caller = match user {
                Some(user) => user,
                None => identity::current_caller().to_string(),
            };
            let result = dispatcher.execute(&caller, &path, params);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.is_failure() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
