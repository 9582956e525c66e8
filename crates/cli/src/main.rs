use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use cmdrest_engine::{NoopInvoker, ProcessInvoker, SystemInvoker};
use cmdrest_registry::{CatalogConfig, builtin_ls};
use cmdrest_server::{CommandHandler, HttpServer, resolve_bind_address};
use cmdrest_types::CommandDescriptor;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve command-line tools as REST endpoints with generated Swagger docs.
#[derive(Debug, Parser)]
#[command(name = "cmdrest", version, about)]
struct Cli {
    /// Address to listen on
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Command catalog (YAML or JSON); defaults to the user config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the generated Swagger document for one command and exit
    #[arg(long, value_name = "COMMAND")]
    print_swagger: Option<String>,

    /// Echo synthesized command lines instead of running them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let descriptors = load_descriptors(cli.config.as_deref())?;
    let invoker: Arc<dyn ProcessInvoker> = if cli.dry_run {
        Arc::new(NoopInvoker)
    } else {
        Arc::new(SystemInvoker)
    };
    let handlers = descriptors
        .iter()
        .map(|descriptor| {
            CommandHandler::with_invoker(descriptor, Arc::clone(&invoker))
                .with_context(|| format!("build handler for '{}'", descriptor.name))
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(name) = cli.print_swagger.as_deref() {
        let handler = handlers
            .iter()
            .find(|handler| handler.command() == name)
            .with_context(|| format!("no command named '{name}'"))?;
        print!("{}", handler.swagger());
        return Ok(());
    }

    let bind_address = resolve_bind_address(cli.bind.as_deref())?;
    let server = HttpServer::new(bind_address, handlers).start().await?;
    for descriptor in &descriptors {
        info!(
            "serving /{name}/run (docs at http://{address}/{name}/docs/)",
            name = descriptor.name,
            address = server.bound_address()
        );
    }

    tokio::signal::ctrl_c().await.context("wait for shutdown signal")?;
    info!("shutting down");
    server.stop().await
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter(log_filter()).try_init();
}

/// `RUST_LOG` when it parses, `info` otherwise.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn load_descriptors(config: Option<&std::path::Path>) -> Result<Vec<CommandDescriptor>> {
    let catalog = match config {
        Some(path) => Some(CatalogConfig::load_from(path)?),
        None => CatalogConfig::load()?,
    };
    match catalog {
        Some(catalog) if !catalog.commands.is_empty() => Ok(catalog.commands),
        _ => {
            info!("no command catalog found; serving built-in ls");
            Ok(vec![builtin_ls()])
        }
    }
}
