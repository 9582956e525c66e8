//! Command-line synthesis from parameter tables.

use cmdrest_registry::{Overrides, ParameterTable};
use cmdrest_types::{Binding, ParamValue};
use tracing::debug;

/// Builds the command line for one request.
///
/// The default `table` is never touched: overrides are applied to a private
/// working copy which is then composed with [`compose`].
///
/// ```rust
/// use cmdrest_engine::synthesize;
/// use cmdrest_registry::{Overrides, extract};
/// use cmdrest_types::CommandDescriptor;
///
/// let descriptor = CommandDescriptor::new("ls").flag("Long", "l", true).positional("Path", 0, "");
/// let table = extract(&descriptor).expect("extract");
/// assert_eq!(synthesize(&table, &Overrides::from_query("0=/tmp")), "ls -l /tmp");
/// ```
pub fn synthesize(table: &ParameterTable, overrides: &Overrides) -> String {
    let working = table.merged(overrides);
    let command_line = compose(&working);
    debug!(command = table.command(), %command_line, "synthesized command line");
    command_line
}

/// Composes the command line of a (possibly merged) table.
///
/// Tokens are the command name, then flags in declaration order, then
/// positional slots in ascending index order, joined by single spaces:
///
/// - `true` flags render as `-<flag>`, `false` flags are dropped;
/// - string flags render as `--<flag> <value>`;
/// - positionals render their value verbatim.
///
/// Values are not quoted. A repeated positional index overwrites the earlier
/// value, and an index past the end of the slot array grows it with empty
/// slots.
pub fn compose(table: &ParameterTable) -> String {
    let mut tokens = vec![table.command().to_string()];
    let mut slots = vec![String::new(); table.positional_count()];

    for parameter in table {
        match (&parameter.binding, &parameter.value) {
            (Binding::Positional(index), value) => {
                if *index >= slots.len() {
                    slots.resize(index + 1, String::new());
                }
                slots[*index] = value.to_string();
            }
            (Binding::Flag(flag), ParamValue::Bool(true)) => tokens.push(format!("-{flag}")),
            (Binding::Flag(_), ParamValue::Bool(false)) => {}
            (Binding::Flag(flag), ParamValue::String(value)) => tokens.push(format!("--{flag} {value}")),
        }
    }

    tokens.extend(slots);
    tokens.join(" ")
}
