//! Swagger 2.0 rendering of parameter tables.
//!
//! The document skeleton (info block, response definitions) lives in an
//! embedded YAML template. Rendering parses the template, fills in the info
//! block and a single `/<command>/run` path whose `get` operation lists one
//! query parameter per table entry, and serializes the result back to YAML.

use cmdrest_registry::ParameterTable;
use cmdrest_types::{Binding, Parameter, ParamValue};
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::debug;

/// Embedded document skeleton shared by every generated document.
pub static SWAGGER_TEMPLATE: &str = include_str!("swagger.yaml");

const RUN_RESPONSE_REF: &str = "#/definitions/RunResponse";

/// Errors raised while producing an API document.
#[derive(Debug, Error)]
pub enum DocGenerationError {
    #[error("failed to parse swagger template: {0}")]
    TemplateParse(#[source] serde_yaml::Error),

    #[error("swagger template must be a YAML mapping")]
    TemplateShape,

    #[error("failed to render swagger document: {0}")]
    Render(#[source] serde_yaml::Error),
}

/// Values placed in the document's `info` block.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub description: String,
    pub version: String,
}

impl DocumentInfo {
    /// Info derived from the command name and optional summary.
    pub fn for_command(command: &str, summary: Option<&str>) -> Self {
        Self {
            title: command.to_string(),
            description: summary
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP interface for the `{command}` command")),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    summary: String,
    description: String,
    operation_id: String,
    tags: Vec<String>,
    parameters: Vec<QueryParameter>,
    responses: IndexMap<&'static str, ResponseDef>,
}

#[derive(Debug, Serialize)]
struct QueryParameter {
    name: String,
    #[serde(rename = "in")]
    location: &'static str,
    description: String,
    #[serde(rename = "type")]
    kind: &'static str,
    default: ParamValue,
    required: bool,
}

#[derive(Debug, Serialize)]
struct ResponseDef {
    description: &'static str,
    schema: SchemaRef,
}

#[derive(Debug, Serialize)]
struct SchemaRef {
    #[serde(rename = "$ref")]
    reference: &'static str,
}

/// Renders the Swagger document for `table` using the embedded template.
pub fn generate_swagger(table: &ParameterTable, summary: Option<&str>) -> Result<String, DocGenerationError> {
    let info = DocumentInfo::for_command(table.command(), summary);
    render_with_template(SWAGGER_TEMPLATE, &info, table)
}

/// Renders the Swagger document for `table` from an explicit template.
pub fn render_with_template(template: &str, info: &DocumentInfo, table: &ParameterTable) -> Result<String, DocGenerationError> {
    let mut document: Value = serde_yaml::from_str(template).map_err(DocGenerationError::TemplateParse)?;
    let root = document.as_mapping_mut().ok_or(DocGenerationError::TemplateShape)?;

    let mut info_block = Mapping::new();
    info_block.insert("title".into(), info.title.clone().into());
    info_block.insert("description".into(), info.description.clone().into());
    info_block.insert("version".into(), info.version.clone().into());
    root.insert("info".into(), Value::Mapping(info_block));

    let operation = run_operation(table);
    let operation = serde_yaml::to_value(&operation).map_err(DocGenerationError::Render)?;
    let mut path_item = Mapping::new();
    path_item.insert("get".into(), operation);
    let mut paths = Mapping::new();
    paths.insert(run_path(table.command()).into(), Value::Mapping(path_item));
    root.insert("paths".into(), Value::Mapping(paths));

    let rendered = serde_yaml::to_string(&document).map_err(DocGenerationError::Render)?;
    debug!(command = table.command(), parameters = table.len(), "rendered swagger document");
    Ok(rendered)
}

/// The documented path of a command's run endpoint.
pub fn run_path(command: &str) -> String {
    format!("/{command}/run")
}

fn run_operation(table: &ParameterTable) -> Operation {
    let command = table.command();
    let mut responses = IndexMap::new();
    responses.insert(
        "200",
        ResponseDef {
            description: "Command completed successfully",
            schema: SchemaRef { reference: RUN_RESPONSE_REF },
        },
    );
    responses.insert(
        "500",
        ResponseDef {
            description: "Command failed to start or exited with an error",
            schema: SchemaRef { reference: RUN_RESPONSE_REF },
        },
    );

    Operation {
        summary: format!("Run {command}"),
        description: format!("Synthesizes and runs `{command}`; query parameters override the defaults."),
        operation_id: format!("run_{command}"),
        tags: vec![command.to_string()],
        parameters: table.iter().map(query_parameter).collect(),
        responses,
    }
}

fn query_parameter(parameter: &Parameter) -> QueryParameter {
    let description = parameter.description.clone().unwrap_or_else(|| match &parameter.binding {
        Binding::Flag(flag) if parameter.value.as_bool().is_some() => format!("Switch `-{flag}`"),
        Binding::Flag(flag) => format!("Option `--{flag}`"),
        Binding::Positional(index) => format!("Positional argument {index}"),
    });
    QueryParameter {
        name: parameter.name.clone(),
        location: "query",
        description,
        kind: parameter.value.type_name(),
        default: parameter.value.clone(),
        required: false,
    }
}
