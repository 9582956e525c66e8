//! Parameter tables and per-request overrides.

use cmdrest_types::{Parameter, ParamValue};
use indexmap::IndexMap;

/// Canonical, ordered mapping from parameter name to [`Parameter`].
///
/// A table built by [`crate::extract`] is the immutable default snapshot for
/// a command. Requests never mutate it; [`ParameterTable::merged`] hands out
/// an owned working copy with caller overrides applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTable {
    command: String,
    parameters: IndexMap<String, Parameter>,
}

impl ParameterTable {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            parameters: IndexMap::new(),
        }
    }

    /// The command name the table was extracted from.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Inserts a parameter, returning `false` if the name is already present.
    pub(crate) fn insert(&mut self, parameter: Parameter) -> bool {
        if self.parameters.contains_key(&parameter.name) {
            return false;
        }
        self.parameters.insert(parameter.name.clone(), parameter);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Number of parameters bound to a positional slot.
    pub fn positional_count(&self) -> usize {
        self.iter().filter(|p| p.binding.is_positional()).count()
    }

    /// Returns a private copy of the table with `overrides` applied.
    ///
    /// Each parameter is looked up by name first and by binding key (flag name
    /// or positional index) second. Values that parse as booleans are stored
    /// as booleans; anything else is stored as a string.
    pub fn merged(&self, overrides: &Overrides) -> ParameterTable {
        let mut working = self.clone();
        for parameter in working.parameters.values_mut() {
            let raw = overrides
                .get(&parameter.name)
                .or_else(|| overrides.get(&parameter.binding.key()));
            if let Some(raw) = raw {
                parameter.value = coerce_value(raw);
            }
        }
        working
    }
}

impl<'a> IntoIterator for &'a ParameterTable {
    type Item = &'a Parameter;
    type IntoIter = indexmap::map::Values<'a, String, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.values()
    }
}

/// Caller-supplied raw values keyed by parameter name or binding key.
///
/// Empty values are ignored and the first occurrence of a repeated key wins,
/// matching how query strings are usually read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    values: IndexMap<String, String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URL query string (without the leading `?`).
    ///
    /// ```rust
    /// use cmdrest_registry::Overrides;
    ///
    /// let overrides = Overrides::from_query("l=false&Path=%2Ftmp&Path=ignored&empty=");
    /// assert_eq!(overrides.get("l"), Some("false"));
    /// assert_eq!(overrides.get("Path"), Some("/tmp"));
    /// assert_eq!(overrides.get("empty"), None);
    /// ```
    pub fn from_query(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.values.entry(key.into()).or_insert(value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Overrides {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut overrides = Overrides::new();
        for (key, value) in iter {
            overrides.insert(key, value);
        }
        overrides
    }
}

/// Interprets a raw override, falling back to a plain string.
pub fn coerce_value(raw: &str) -> ParamValue {
    match parse_bool(raw) {
        Some(value) => ParamValue::Bool(value),
        None => ParamValue::String(raw.to_string()),
    }
}

/// Parses the boolean spellings accepted for overrides.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
