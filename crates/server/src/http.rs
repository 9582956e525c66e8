//! HTTP server host for command handlers.

use std::collections::HashSet;
use std::net::SocketAddr;

use anyhow::{Result, anyhow, bail};
use axum::{Router, http::Uri, routing::get};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::handler::CommandHandler;

/// Default listen address when none is configured.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Builds a router mounting each handler under `/<command>/`.
///
/// # Errors
///
/// Fails when two handlers share a command name.
pub fn router(handlers: &[CommandHandler]) -> Result<Router> {
    let mut seen = HashSet::new();
    let mut router = Router::new();
    for handler in handlers {
        if !seen.insert(handler.command().to_string()) {
            bail!("command '{}' is mounted more than once", handler.command());
        }
        let mount = format!("/{}/{{*rest}}", handler.command());
        let handler = handler.clone();
        router = router.route(
            &mount,
            get(move |uri: Uri| {
                let handler = handler.clone();
                async move { handler.handle(&uri).await }
            }),
        );
        info!(%mount, "mounted command");
    }
    Ok(router)
}

/// Host configuration for a server instance.
#[derive(Debug, Clone)]
pub struct HttpServer {
    bind_address: SocketAddr,
    handlers: Vec<CommandHandler>,
}

impl HttpServer {
    /// Create a new server bound to the provided address.
    pub fn new(bind_address: SocketAddr, handlers: Vec<CommandHandler>) -> Self {
        Self { bind_address, handlers }
    }

    /// Start the server and return a handle for runtime inspection and shutdown.
    pub async fn start(self) -> Result<RunningHttpServer> {
        let router = router(&self.handlers)?;
        let listener = tokio::net::TcpListener::bind(self.bind_address).await?;
        let bound_address = listener.local_addr()?;
        let cancellation_token = CancellationToken::new();

        let server_handle = tokio::spawn({
            let shutdown = cancellation_token.child_token();
            async move {
                if let Err(error) = axum::serve(listener, router)
                    .with_graceful_shutdown(async move {
                        shutdown.cancelled().await;
                    })
                    .await
                {
                    tracing::error!(%error, "HTTP server terminated with an error");
                }
            }
        });
        info!(address = %bound_address, commands = self.handlers.len(), "HTTP server listening");

        Ok(RunningHttpServer {
            bind_address: bound_address,
            cancellation_token,
            server_handle,
        })
    }
}

/// Runtime handle for a running HTTP server.
#[derive(Debug)]
pub struct RunningHttpServer {
    bind_address: SocketAddr,
    cancellation_token: CancellationToken,
    server_handle: JoinHandle<()>,
}

impl RunningHttpServer {
    /// Return the bound socket address for the running server.
    pub fn bound_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Stop the server and wait for in-flight requests to finish.
    pub async fn stop(self) -> Result<()> {
        self.cancellation_token.cancel();
        self.server_handle
            .await
            .map_err(|error| anyhow!("HTTP server task failed: {error}"))?;
        info!(address = %self.bind_address, "HTTP server stopped");
        Ok(())
    }
}

/// Resolve the listen address for the server.
pub fn resolve_bind_address(bind_address: Option<&str>) -> Result<SocketAddr> {
    let address = bind_address.unwrap_or(DEFAULT_BIND_ADDRESS);
    address
        .parse()
        .map_err(|error| anyhow!("invalid HTTP bind address '{address}': {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdrest_types::CommandDescriptor;

    #[test]
    fn resolves_default_and_explicit_addresses() {
        assert_eq!(resolve_bind_address(None).expect("default").port(), 8080);
        assert_eq!(resolve_bind_address(Some("0.0.0.0:9000")).expect("explicit").port(), 9000);
        assert!(resolve_bind_address(Some("not an address")).is_err());
    }

    #[test]
    fn router_rejects_duplicate_commands() {
        let descriptor = CommandDescriptor::new("ls").flag("Long", "l", true);
        let handler = CommandHandler::new(&descriptor).expect("handler");
        let err = router(&[handler.clone(), handler]).unwrap_err();
        assert!(err.to_string().contains("'ls'"), "{err}");
    }
}
