use crate::errors::{ErrorCode, McpError, ToolError};
use jsonschema::error::ValidationErrorKind;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
}

static TOOL_CATALOG: Lazy<Result<Vec<ToolDef>, String>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).map_err(|err| err.to_string())
});

static TOOL_MAP: Lazy<HashMap<String, ToolDef>> = Lazy::new(|| {
    tool_catalog()
        .iter()
        .cloned()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
});

static TOOL_VALIDATORS: Lazy<HashMap<String, Result<JSONSchema, String>>> = Lazy::new(|| {
    tool_catalog()
        .iter()
        .map(|tool| {
            let compiled = JSONSchema::compile(&tool.input_schema).map_err(|err| err.to_string());
            (tool.name.clone(), compiled)
        })
        .collect()
});

/// Tools in catalog order. Empty when the embedded catalog is unreadable;
/// `check_catalog` reports why.
pub fn tool_catalog() -> &'static [ToolDef] {
    match TOOL_CATALOG.as_ref() {
        Ok(tools) => tools,
        Err(_) => &[],
    }
}

/// Fails when the embedded catalog does not parse or a schema does not compile.
pub fn check_catalog() -> Result<(), ToolError> {
    if let Err(err) = TOOL_CATALOG.as_ref() {
        return Err(ToolError::internal(format!(
            "tool_catalog.json is invalid: {}",
            err
        )));
    }
    for (name, compiled) in TOOL_VALIDATORS.iter() {
        if let Err(err) = compiled {
            return Err(ToolError::internal(format!(
                "Input schema for {} does not compile: {}",
                name, err
            )));
        }
    }
    Ok(())
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name)
}

pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), McpError> {
    let Some(Ok(schema)) = TOOL_VALIDATORS.get(tool_name) else {
        return Ok(());
    };
    if let Err(errors) = schema.validate(args) {
        let message = format_schema_errors(tool_name, errors);
        return Err(McpError::new(ErrorCode::InvalidParams, message));
    }
    Ok(())
}

fn format_schema_errors(tool_name: &str, errors: jsonschema::ErrorIterator) -> String {
    let mut lines = vec![format!("Invalid arguments for {}", tool_name)];
    for err in errors.take(10) {
        let instance_path = if err.instance_path.to_string().is_empty() {
            "(root)".to_string()
        } else {
            err.instance_path.to_string()
        };
        let line = match &err.kind {
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                format!("{}: unknown field(s) {}", instance_path, unexpected.join(", "))
            }
            ValidationErrorKind::Enum { options } => {
                let allowed: Vec<String> = options
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                            .collect()
                    })
                    .unwrap_or_default();
                format!("{}: expected one of {}", instance_path, allowed.join(", "))
            }
            ValidationErrorKind::Required { property } => {
                let prop = property
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| property.to_string());
                format!("{}: missing required field '{}'", instance_path, prop)
            }
            _ => format!("{}: {}", instance_path, err),
        };
        lines.push(format!("- {}", line));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_parses_and_compiles() {
        check_catalog().expect("catalog must be valid");
        assert_eq!(tool_catalog().len(), 32);
    }

    #[test]
    fn tool_names_are_unique_and_kebab_case() {
        let mut names: Vec<&str> = tool_catalog().iter().map(|t| t.name.as_str()).collect();
        assert!(names
            .iter()
            .all(|n| n.chars().all(|c| c.is_ascii_lowercase() || c == '-')));
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tool_catalog().len());
    }

    #[test]
    fn every_tool_but_feedback_is_read_only() {
        for tool in tool_catalog() {
            let read_only = tool
                .annotations
                .as_ref()
                .and_then(|a| a.get("readOnlyHint"))
                .and_then(Value::as_bool);
            let expected = tool.name != "submit-user-feedback";
            assert_eq!(read_only, Some(expected), "{}", tool.name);
        }
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = validate_tool_args("query-costs", &json!({"filter": "(costs.provider = 'aws')"}))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParams);
        assert!(err.message.contains("missing required field 'workspace_token'"));
    }

    #[test]
    fn unknown_fields_and_bad_page_are_rejected() {
        let err = validate_tool_args("list-tags", &json!({"pgae": 1})).unwrap_err();
        assert!(err.message.contains("pgae"));
        assert!(validate_tool_args("list-tags", &json!({"page": 0})).is_err());
        assert!(validate_tool_args("list-tags", &json!({"page": 2})).is_ok());
        assert!(validate_tool_args("list-tags", &json!({"page": 2.0})).is_ok());
        assert!(validate_tool_args("list-tags", &json!({"page": 2.5})).is_err());
    }

    #[test]
    fn enum_violation_lists_choices() {
        let err = validate_tool_args("list-unit-costs", &json!({"order": "up"})).unwrap_err();
        assert!(err.message.contains("expected one of asc, desc"));
    }
}
