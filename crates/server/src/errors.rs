//! Error types for handler construction.

use cmdrest_openapi::DocGenerationError;
use cmdrest_registry::IntrospectionError;
use thiserror::Error;

/// Failure to build a [`crate::CommandHandler`].
///
/// Construction is all-or-nothing: the first failing step is reported and no
/// handler is produced.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("introspection failed: {0}")]
    Introspection(#[from] IntrospectionError),

    #[error("API document generation failed: {0}")]
    DocGeneration(#[from] DocGenerationError),
}
