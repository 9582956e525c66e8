//! Registry crate for command descriptors.
//!
//! This crate turns declared command descriptors into parameter tables, merges
//! per-request overrides into private working copies, and loads descriptor
//! catalogs from disk.

pub mod config;
pub mod introspect;
pub mod table;

pub use cmdrest_types::{Binding, CommandDescriptor, Parameter, ParamValue};
pub use config::CatalogConfig;
pub use introspect::{IntrospectionError, extract};
pub use table::{Overrides, ParameterTable, coerce_value, parse_bool};

/// Built-in descriptor served when no catalog is configured.
pub fn builtin_ls() -> CommandDescriptor {
    CommandDescriptor::new("ls")
        .with_summary("List directory contents")
        .flag("Long", "l", true)
        .describe("Use a long listing format")
        .flag("All", "a", false)
        .describe("Do not ignore entries starting with .")
        .flag("Time", "t", false)
        .describe("Sort by modification time, newest first")
        .positional("Dir", 0, "")
        .describe("Directory to list; empty lists the working directory")
}
