//! API document generation for command descriptors.
//!
//! Renders a [`cmdrest_registry::ParameterTable`] into a Swagger 2.0 YAML
//! document describing the command's `run` endpoint.

pub mod swagger;

pub use swagger::{DocGenerationError, DocumentInfo, SWAGGER_TEMPLATE, generate_swagger, render_with_template, run_path};
