//! Compiles JSON definition text into [`Definition`] values.
//!
//! Accepted shape:
//!
//! ```json
//! {
//!   "name": "button",
//!   "type": "WIDGET",
//!   "containsChildren": false,
//!   "containsValidation": false,
//!   "properties": [
//!     { "name": "text", "type": "STRING", "isTranslatable": true }
//!   ]
//! }
//! ```
//!
//! When `name` is absent, `type` names the node type itself and the kind is
//! read from an optional `kind` field.

use crate::{Definition, DefinitionError, DefinitionResult, EntityKind, PropertyDefinition, ScalarType};
use serde_json::{Map, Value};

/// Stateless compiler for definition source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefinitionCompiler;

impl DefinitionCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compiles one definition.
    pub fn compile(&self, source: &str) -> DefinitionResult<Definition> {
        let data: Value =
            serde_json::from_str(source).map_err(|source| DefinitionError::InvalidJson { path: None, source })?;
        let data = data.as_object().ok_or_else(|| {
            DefinitionError::Compilation("definition must be a JSON object".into())
        })?;

        let type_field = required_str(data, "type")?;
        let (name, kind) = match optional_str(data, "name")? {
            Some(name) => (name, parse_kind(type_field)?),
            None => {
                let kind = match optional_str(data, "kind")? {
                    Some(keyword) => parse_kind(keyword)?,
                    None => EntityKind::Widget,
                };
                (type_field, kind)
            }
        };

        let mut builder = Definition::builder(name)
            .kind(kind)
            .with_children(optional_bool(data, "containsChildren")?.unwrap_or(false))
            .with_validation(optional_bool(data, "containsValidation")?.unwrap_or(false));

        match data.get("properties") {
            None | Some(Value::Null) => {}
            Some(Value::Array(entries)) => {
                for entry in entries {
                    builder = builder.property(compile_property(entry)?);
                }
            }
            Some(_) => {
                return Err(DefinitionError::Compilation(
                    "definition property must be an array: properties".into(),
                ));
            }
        }

        builder.build()
    }
}

fn compile_property(entry: &Value) -> DefinitionResult<PropertyDefinition> {
    let entry = entry.as_object().ok_or_else(|| {
        DefinitionError::Compilation("property definition must be a JSON object".into())
    })?;
    let name = required_str(entry, "name")?;
    let keyword = required_str(entry, "type")?;
    let scalar_type = ScalarType::parse(keyword).ok_or_else(|| {
        DefinitionError::Compilation(format!("invalid property type for {name}: [{keyword}]"))
    })?;
    let translatable = optional_bool(entry, "isTranslatable")?.unwrap_or(true);

    Ok(PropertyDefinition::new(name, scalar_type).translatable(translatable))
}

fn parse_kind(keyword: &str) -> DefinitionResult<EntityKind> {
    EntityKind::parse(keyword).ok_or_else(|| {
        DefinitionError::Compilation(format!("invalid entity type in definition: [{keyword}]"))
    })
}

fn required_str<'a>(data: &'a Map<String, Value>, field: &str) -> DefinitionResult<&'a str> {
    optional_str(data, field)?.ok_or_else(|| {
        DefinitionError::Compilation(format!("required definition property is missing: {field}"))
    })
}

// Null and empty strings count as missing.
fn optional_str<'a>(data: &'a Map<String, Value>, field: &str) -> DefinitionResult<Option<&'a str>> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(DefinitionError::Compilation(format!(
            "definition property must be a string: {field}"
        ))),
    }
}

fn optional_bool(data: &Map<String, Value>, field: &str) -> DefinitionResult<Option<bool>> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(DefinitionError::Compilation(format!(
            "definition property must be a boolean: {field}"
        ))),
    }
}
