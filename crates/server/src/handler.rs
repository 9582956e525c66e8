//! Per-command HTTP handler.

use std::sync::Arc;

use axum::{
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Redirect, Response},
};
use cmdrest_engine::{ProcessInvoker, SystemInvoker, synthesize};
use cmdrest_openapi::{DocumentInfo, SWAGGER_TEMPLATE, render_with_template};
use cmdrest_registry::{Overrides, ParameterTable, extract};
use cmdrest_types::{CommandDescriptor, RunResponse};
use tracing::{debug, info};

use crate::docs::{DocViewer, SwaggerUiViewer};
use crate::errors::ConstructionError;
use crate::render::{RunOutcome, render};
use crate::routes::Route;

/// Serves one command descriptor: its run endpoint, Swagger document and docs
/// viewer.
///
/// The default parameter table and the rendered document are computed once at
/// construction and shared read-only by every clone; requests only ever work
/// on private copies.
#[derive(Clone)]
pub struct CommandHandler {
    table: Arc<ParameterTable>,
    swagger: Arc<str>,
    invoker: Arc<dyn ProcessInvoker>,
    viewer: Arc<dyn DocViewer>,
}

impl std::fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("command", &self.table.command())
            .field("parameters", &self.table.len())
            .finish_non_exhaustive()
    }
}

impl CommandHandler {
    /// Builds a handler that runs real processes.
    ///
    /// # Errors
    ///
    /// Returns the first failure of introspection or document generation.
    pub fn new(descriptor: &CommandDescriptor) -> Result<Self, ConstructionError> {
        Self::with_invoker(descriptor, Arc::new(SystemInvoker))
    }

    /// Builds a handler that runs commands through `invoker`.
    pub fn with_invoker(descriptor: &CommandDescriptor, invoker: Arc<dyn ProcessInvoker>) -> Result<Self, ConstructionError> {
        Self::with_template(descriptor, SWAGGER_TEMPLATE, invoker)
    }

    /// Builds a handler whose Swagger document is rendered from `template`
    /// instead of the built-in one.
    pub fn with_template(
        descriptor: &CommandDescriptor,
        template: &str,
        invoker: Arc<dyn ProcessInvoker>,
    ) -> Result<Self, ConstructionError> {
        let table = extract(descriptor)?;
        let info = DocumentInfo::for_command(&descriptor.name, descriptor.summary.as_deref());
        let swagger = render_with_template(template, &info, &table)?;
        info!(command = %descriptor.name, parameters = table.len(), "constructed command handler");
        Ok(Self {
            table: Arc::new(table),
            swagger: Arc::from(swagger),
            invoker,
            viewer: Arc::new(SwaggerUiViewer::default()),
        })
    }

    /// Replaces the documentation viewer.
    pub fn with_doc_viewer(mut self, viewer: Arc<dyn DocViewer>) -> Self {
        self.viewer = viewer;
        self
    }

    pub fn command(&self) -> &str {
        self.table.command()
    }

    /// The default parameter table.
    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    /// The cached Swagger document.
    pub fn swagger(&self) -> &str {
        &self.swagger
    }

    /// Dispatches a request by its path.
    pub async fn handle(&self, uri: &Uri) -> Response {
        let route = Route::classify(uri.path());
        debug!(command = self.command(), path = uri.path(), ?route, "dispatching request");
        match route {
            Route::SwaggerDocument => (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                self.swagger.to_string(),
            )
                .into_response(),
            Route::DocsViewer { asset, swagger_url } => self.viewer.serve(&asset, &swagger_url),
            Route::DocsRedirect { location } => Redirect::to(&location).into_response(),
            Route::Run => {
                let overrides = Overrides::from_query(uri.query().unwrap_or_default());
                render(self.run(&overrides).await)
            }
            Route::Unmatched => StatusCode::NOT_FOUND.into_response(),
        }
    }

    /// Synthesizes the command line for `overrides` and runs it.
    ///
    /// Never fails: launch and execution errors are carried in the outcome so
    /// that the response is always rendered.
    pub async fn run(&self, overrides: &Overrides) -> RunOutcome {
        let command_line = synthesize(&self.table, overrides);
        let output = self.invoker.invoke(&command_line).await;

        let mut response = RunResponse::new(command_line);
        response.stdout = output.stdout;
        response.stderr = output.stderr;
        RunOutcome {
            response,
            failure: output.status.err(),
        }
    }
}
