use crate::errors::ToolError;
use chrono::NaiveDate;
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Argument readers shared by every endpoint adapter.
///
/// Schema validation runs before these, so they mostly normalize. They
/// still reject what a schema cannot express (blank strings, page zero).
#[derive(Clone, Default)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_string(
        &self,
        value: &Value,
        label: &str,
        trim: bool,
    ) -> Result<String, ToolError> {
        let text = value.as_str().ok_or_else(|| {
            ToolError::invalid_params(format!("{} must be a non-empty string", label))
        })?;
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(if trim {
            normalized.to_string()
        } else {
            text.to_string()
        })
    }

    /// Required argument; missing, null and blank are all rejected.
    pub fn required_string(&self, args: &Value, key: &str) -> Result<String, ToolError> {
        match args.get(key) {
            None | Some(Value::Null) => Err(ToolError::invalid_params(format!(
                "{} is required",
                key
            ))),
            Some(value) => self.ensure_string(value, key, true),
        }
    }

    /// Optional argument; blank strings count as absent.
    pub fn optional_string(&self, args: &Value, key: &str) -> Result<Option<String>, ToolError> {
        match args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(value) => self.ensure_string(value, key, true).map(Some),
        }
    }

    /// Optional calendar date. Anything that is not `YYYY-MM-DD` is
    /// dropped rather than rejected, leaving the upstream default in place.
    pub fn optional_date(&self, args: &Value, key: &str) -> Option<String> {
        let text = args.get(key)?.as_str()?.trim();
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .map(|date| date.format(DATE_FORMAT).to_string())
    }

    pub fn optional_bool(&self, args: &Value, key: &str) -> Result<Option<bool>, ToolError> {
        match args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(_) => Err(ToolError::invalid_params(format!(
                "{} must be a boolean",
                key
            ))),
        }
    }

    /// 1-based page number, defaulting to the first page.
    pub fn page(&self, args: &Value) -> Result<u64, ToolError> {
        let Some(value) = args.get("page") else {
            return Ok(1);
        };
        if value.is_null() {
            return Ok(1);
        }
        // JSON numbers like 2.0 are integral even though serde keeps them as f64.
        let page = value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        });
        match page {
            Some(page) if page >= 1 => Ok(page),
            _ => Err(ToolError::invalid_params("page must be an integer >= 1")),
        }
    }

    pub fn optional_integer(&self, args: &Value, key: &str) -> Result<Option<i64>, ToolError> {
        match args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_i64()
                .or_else(|| {
                    value
                        .as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .map(Some)
                .ok_or_else(|| ToolError::invalid_params(format!("{} must be an integer", key))),
        }
    }

    /// One of a fixed set of lowercase choices. Blank falls back to `default`.
    pub fn choice(
        &self,
        args: &Value,
        key: &str,
        options: &[&str],
        default: Option<&'static str>,
    ) -> Result<Option<String>, ToolError> {
        let Some(raw) = self.optional_string(args, key)? else {
            return Ok(default.map(str::to_string));
        };
        let normalized = raw.to_lowercase();
        if options.contains(&normalized.as_str()) {
            return Ok(Some(normalized));
        }
        Err(ToolError::invalid_params(format!(
            "{}: expected one of {}",
            key,
            options.join(", ")
        )))
    }

    /// List of non-empty strings, accepting either an array or a
    /// comma-separated string.
    pub fn string_list(&self, args: &Value, key: &str) -> Result<Option<Vec<String>>, ToolError> {
        let items: Vec<String> = match args.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(text)) => text.split(',').map(str::to_string).collect(),
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| {
                    value.as_str().map(str::to_string).ok_or_else(|| {
                        ToolError::invalid_params(format!("{} must contain only strings", key))
                    })
                })
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(ToolError::invalid_params(format!(
                    "{} must be an array of strings",
                    key
                )))
            }
        };
        let items: Vec<String> = items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        Ok(if items.is_empty() { None } else { Some(items) })
    }
}
