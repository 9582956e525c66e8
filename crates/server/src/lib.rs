//! HTTP surface for command descriptors.
//!
//! Each [`CommandHandler`] exposes one descriptor under `/<command>/`:
//! `run` synthesizes and executes the command, `docs/swagger.yaml` returns the
//! generated Swagger document, and `docs/` serves an interactive viewer.

pub mod docs;
pub mod errors;
pub mod handler;
pub mod http;
pub mod render;
pub mod routes;

pub use docs::{DocViewer, SwaggerUiViewer};
pub use errors::ConstructionError;
pub use handler::CommandHandler;
pub use http::{HttpServer, RunningHttpServer, resolve_bind_address, router};
pub use render::{RunOutcome, render};
pub use routes::Route;
