//! Descriptor introspection.
//!
//! Turns a declared [`CommandDescriptor`] into the canonical [`ParameterTable`]
//! used for both API documentation and command synthesis.

use cmdrest_types::{Binding, CommandDescriptor, Parameter};
use thiserror::Error;
use tracing::debug;

use crate::table::ParameterTable;

/// Errors raised while extracting parameters from a descriptor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    #[error("command descriptor has an empty name")]
    EmptyCommandName,

    #[error("command descriptor '{command}' declares no fields")]
    NoFields { command: String },

    #[error("command descriptor '{command}' declares parameter '{name}' more than once")]
    DuplicateParameter { command: String, name: String },
}

/// Extracts the parameter table of a descriptor.
///
/// Fields are visited in declaration order. Fields without a tag (or with an
/// empty tag or name) are skipped. A tag that parses as a non-negative integer
/// yields a positional binding; any other tag is used verbatim as a flag name.
/// The field's declared value becomes the parameter default.
///
/// # Errors
///
/// Fails when the descriptor has no name, declares no fields at all, or
/// declares two tagged fields with the same name.
///
/// # Examples
///
/// ```rust
/// use cmdrest_registry::extract;
/// use cmdrest_types::{Binding, CommandDescriptor};
///
/// let descriptor = CommandDescriptor::new("ls").flag("Long", "l", true).positional("Path", 0, ".");
/// let table = extract(&descriptor).expect("extract table");
/// assert_eq!(table.get("Long").map(|p| &p.binding), Some(&Binding::Flag("l".into())));
/// assert_eq!(table.positional_count(), 1);
/// ```
pub fn extract(descriptor: &CommandDescriptor) -> Result<ParameterTable, IntrospectionError> {
    if descriptor.name.trim().is_empty() {
        return Err(IntrospectionError::EmptyCommandName);
    }
    if descriptor.fields.is_empty() {
        return Err(IntrospectionError::NoFields {
            command: descriptor.name.clone(),
        });
    }

    let mut table = ParameterTable::new(descriptor.name.clone());
    for field in &descriptor.fields {
        let Some(tag) = field.tag.as_deref().filter(|tag| !tag.is_empty()) else {
            debug!(command = %descriptor.name, field = %field.name, "skipping untagged field");
            continue;
        };
        if field.name.is_empty() {
            continue;
        }

        let parameter = Parameter {
            name: field.name.clone(),
            binding: Binding::from_tag(tag),
            value: field.value.clone(),
            description: field.description.clone(),
        };
        if !table.insert(parameter) {
            return Err(IntrospectionError::DuplicateParameter {
                command: descriptor.name.clone(),
                name: field.name.clone(),
            });
        }
    }

    Ok(table)
}
