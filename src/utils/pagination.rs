use crate::errors::ToolError;
use crate::services::logger::Logger;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Normalized page cursor returned to callers.
///
/// `has_next_page == false` always pairs with `next_page == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageToken {
    pub next_page: u64,
    pub has_next_page: bool,
}

impl PageToken {
    pub const fn none() -> Self {
        Self {
            next_page: 0,
            has_next_page: false,
        }
    }

    pub const fn next(page: u64) -> Self {
        Self {
            next_page: page,
            has_next_page: true,
        }
    }
}

/// How an adapter reacts to a `links` value it cannot decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinksPolicy {
    /// Fail the call with an upstream shape error.
    Strict,
    /// Log a warning and report no next page.
    Lenient,
}

/// The relations we consume from the upstream `links` object. Other
/// relations (`first`, `last`, `prev`, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<String>,
}

/// Converts an upstream "next" URL into a page token. Never fails.
pub fn normalize_next_link(next_link: Option<&str>) -> PageToken {
    let Some(raw) = next_link.map(str::trim).filter(|s| !s.is_empty()) else {
        return PageToken::none();
    };
    let Ok(url) = Url::parse(raw) else {
        return PageToken::none();
    };
    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.trim().parse::<u64>().ok());
    match page {
        Some(page) if page >= 1 => PageToken::next(page),
        _ => PageToken::none(),
    }
}

/// Decodes `payload.links` once and normalizes its `next` relation.
///
/// A missing or null `links` means the upstream has nothing more to give.
pub fn page_data(
    payload: &Value,
    policy: LinksPolicy,
    logger: &Logger,
) -> Result<PageToken, ToolError> {
    let raw = match payload.get("links") {
        None | Some(Value::Null) => return Ok(PageToken::none()),
        Some(raw) => raw,
    };
    let decoded = if raw.is_object() {
        serde_json::from_value::<Links>(raw.clone()).map_err(|err| err.to_string())
    } else {
        Err(format!("expected an object, got {}", value_kind(raw)))
    };
    match decoded {
        Ok(links) => Ok(normalize_next_link(links.next.as_deref())),
        Err(reason) => match policy {
            LinksPolicy::Strict => Err(ToolError::upstream_shape(format!(
                "Upstream pagination links could not be decoded: {}",
                reason
            ))
            .with_details(serde_json::json!({ "links": raw }))),
            LinksPolicy::Lenient => {
                logger.warn(
                    "Ignoring undecodable pagination links",
                    Some(&serde_json::json!({ "reason": reason })),
                );
                Ok(PageToken::none())
            }
        },
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
