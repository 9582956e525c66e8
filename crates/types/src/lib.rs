use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};

pub mod response;

pub use response::RunResponse;

/// A parameter value as declared by a descriptor or supplied by a caller.
///
/// Only two shapes exist: booleans drive switch-style flags (`-l`), and
/// everything else is carried as a string and rendered verbatim. Numbers in a
/// catalog (`value: 5`) deserialize as their decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    String(String),
}

impl ParamValue {
    /// Returns the boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::String(_) => None,
        }
    }

    /// The Swagger primitive type name for this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::String(_) => "string",
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ParamValueVisitor)
    }
}

struct ParamValueVisitor;

impl de::Visitor<'_> for ParamValueVisitor {
    type Value = ParamValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, string or number")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(ParamValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(ParamValue::String(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(ParamValue::String(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(ParamValue::String(value.to_string()))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(ParamValue::from(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(ParamValue::String(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ParamValue::default())
    }
}

/// Accepts `tag: 0` as well as `tag: "0"`.
fn deserialize_tag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<ParamValue>::deserialize(deserializer)?.map(|tag| tag.to_string()))
}

impl Default for ParamValue {
    fn default() -> Self {
        Self::String(String::new())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// How a parameter is placed on the synthesized command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Rendered as `-<name>` (booleans) or `--<name> <value>`.
    Flag(String),
    /// Rendered after all flags, at the given zero-based slot.
    Positional(usize),
}

impl Binding {
    /// Interprets a binding tag.
    ///
    /// A tag that parses as a non-negative integer is a positional slot; any
    /// other tag is taken literally as a flag name.
    pub fn from_tag(tag: &str) -> Self {
        match tag.parse::<usize>() {
            Ok(index) => Self::Positional(index),
            Err(_) => Self::Flag(tag.to_string()),
        }
    }

    /// The key callers may use in place of the parameter name when overriding.
    pub fn key(&self) -> String {
        match self {
            Self::Flag(flag) => flag.clone(),
            Self::Positional(index) => index.to_string(),
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, Self::Positional(_))
    }
}

/// A single introspected parameter: the unit stored in a parameter table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Unique name within the owning descriptor
    pub name: String,
    /// Flag or positional placement
    pub binding: Binding,
    /// Current value; the descriptor default until overridden
    pub value: ParamValue,
    /// Optional human-readable help carried into the API document
    pub description: Option<String>,
}

/// One declared field of a command descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorField {
    /// Field name; becomes the parameter name (e.g., "Long", "Path")
    pub name: String,
    /// Binding tag; a non-negative integer for positionals, a flag name otherwise.
    /// Fields without a tag are not exposed.
    #[serde(default, deserialize_with = "deserialize_tag")]
    pub tag: Option<String>,
    /// Default value of the parameter
    #[serde(default)]
    pub value: ParamValue,
    /// Optional help text for the generated API document
    #[serde(default)]
    pub description: Option<String>,
}

/// A statically declared command-line tool.
///
/// Descriptors are built once by the embedding application, either in code with
/// the builder helpers or by deserializing a catalog file, and are never mutated
/// afterwards.
///
/// ```rust
/// use cmdrest_types::CommandDescriptor;
///
/// let ls = CommandDescriptor::new("ls")
///     .flag("Long", "l", true)
///     .flag("All", "a", false)
///     .positional("Path", 0, ".");
/// assert_eq!(ls.fields.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Executable name; the first token of every synthesized command
    pub name: String,
    /// Short description used as the API document description
    #[serde(default)]
    pub summary: Option<String>,
    /// Declared fields, in declaration order
    #[serde(default)]
    pub fields: Vec<DescriptorField>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: None,
            fields: Vec::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Appends a field bound to a flag name.
    pub fn flag(self, name: impl Into<String>, flag: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.field(name, Some(flag.into()), value)
    }

    /// Appends a field bound to a positional slot.
    pub fn positional(self, name: impl Into<String>, index: usize, value: impl Into<ParamValue>) -> Self {
        self.field(name, Some(index.to_string()), value)
    }

    /// Appends a field with an arbitrary (possibly absent) tag.
    pub fn field(mut self, name: impl Into<String>, tag: Option<String>, value: impl Into<ParamValue>) -> Self {
        self.fields.push(DescriptorField {
            name: name.into(),
            tag,
            value: value.into(),
            description: None,
        });
        self
    }

    /// Sets the description of the most recently added field.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.description = Some(description.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_from_tag_distinguishes_positionals() {
        assert_eq!(Binding::from_tag("0"), Binding::Positional(0));
        assert_eq!(Binding::from_tag("12"), Binding::Positional(12));
        assert_eq!(Binding::from_tag("l"), Binding::Flag("l".into()));
        assert_eq!(Binding::from_tag("-1"), Binding::Flag("-1".into()));
        assert_eq!(Binding::from_tag("color"), Binding::Flag("color".into()));
    }

    #[test]
    fn numeric_catalog_values_become_strings() {
        let yaml = r#"
name: head
fields:
  - name: Lines
    tag: n
    value: 5
  - name: Ratio
    tag: ratio
    value: 0.5
  - name: File
    tag: 0
    value: ~
"#;
        let descriptor: CommandDescriptor = serde_yaml::from_str(yaml).expect("deserialize descriptor");
        assert_eq!(descriptor.fields[0].value, ParamValue::from("5"));
        assert_eq!(descriptor.fields[1].value, ParamValue::from("0.5"));
        assert_eq!(descriptor.fields[2].tag.as_deref(), Some("0"));
        assert_eq!(descriptor.fields[2].value, ParamValue::default());

        let json: ParamValue = serde_json::from_str("-3").expect("json number");
        assert_eq!(json, ParamValue::from("-3"));
    }

    #[test]
    fn non_scalar_values_name_the_accepted_shapes() {
        let err = serde_yaml::from_str::<ParamValue>("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("a boolean, string or number"), "{err}");
    }

    #[test]
    fn descriptor_deserializes_with_defaults() {
        let yaml = r#"
name: ls
fields:
  - name: Long
    tag: l
    value: true
  - name: Path
    tag: "0"
    value: "."
  - name: Hidden
"#;
        let descriptor: CommandDescriptor = serde_yaml::from_str(yaml).expect("deserialize descriptor");
        assert_eq!(descriptor.name, "ls");
        assert!(descriptor.summary.is_none());
        assert_eq!(descriptor.fields.len(), 3);
        assert_eq!(descriptor.fields[0].value, ParamValue::Bool(true));
        assert_eq!(descriptor.fields[1].value, ParamValue::String(".".into()));
        assert!(descriptor.fields[2].tag.is_none());
        assert_eq!(descriptor.fields[2].value, ParamValue::default());
    }

    #[test]
    fn param_value_display_is_raw() {
        assert_eq!(ParamValue::Bool(false).to_string(), "false");
        assert_eq!(ParamValue::from("/tmp").to_string(), "/tmp");
        assert_eq!(ParamValue::from(true).type_name(), "boolean");
        assert_eq!(ParamValue::default().type_name(), "string");
    }

    #[test]
    fn builder_describe_targets_last_field() {
        let descriptor = CommandDescriptor::new("grep")
            .flag("Ignore", "i", false)
            .positional("Pattern", 0, "")
            .describe("Pattern to search for");
        assert!(descriptor.fields[0].description.is_none());
        assert_eq!(descriptor.fields[1].description.as_deref(), Some("Pattern to search for"));
        assert_eq!(descriptor.fields[1].tag.as_deref(), Some("0"));
    }
}
