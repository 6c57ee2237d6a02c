use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    Unauthenticated,
    Unauthorized,
    UpstreamRequest,
    UpstreamShape,
    Serialization,
    Internal,
}

impl ToolErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolErrorKind::InvalidParams => "invalid_params",
            ToolErrorKind::Unauthenticated => "unauthenticated",
            ToolErrorKind::Unauthorized => "unauthorized",
            ToolErrorKind::UpstreamRequest => "upstream_request",
            ToolErrorKind::UpstreamShape => "upstream_shape",
            ToolErrorKind::Serialization => "serialization",
            ToolErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub retryable: bool,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
            retryable: matches!(kind, ToolErrorKind::UpstreamRequest),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Unauthenticated, "UNAUTHENTICATED", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Unauthorized, "UNAUTHORIZED", message)
    }

    pub fn upstream_request(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::UpstreamRequest, "UPSTREAM_REQUEST", message)
    }

    pub fn upstream_shape(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::UpstreamShape, "UPSTREAM_SHAPE", message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Serialization, "SERIALIZATION", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, "INTERNAL", message)
    }

    /// Multi-line rendering returned to the client as the text of a failed tool call.
    pub fn render(&self, tool: &str) -> String {
        let mut lines = vec![
            "VantageError".to_string(),
            format!("tool: {}", tool),
            format!("kind: {}", self.kind.as_str()),
            format!("code: {}", self.code),
            format!("retryable: {}", self.retryable),
            format!("message: {}", self.message),
        ];
        if let Some(hint) = &self.hint {
            lines.push(format!("hint: {}", hint));
        }
        if let Some(details) = &self.details {
            lines.push(format!("details: {}", details));
        }
        lines.join("\n")
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_kind_code_and_hint() {
        let err = ToolError::unauthorized("credential is not read-only").with_hint("rotate it");
        let text = err.render("list-tags");
        assert!(text.contains("tool: list-tags"));
        assert!(text.contains("kind: unauthorized"));
        assert!(text.contains("code: UNAUTHORIZED"));
        assert!(text.contains("hint: rotate it"));
        assert!(!err.retryable);
    }

    #[test]
    fn upstream_request_errors_are_marked_retryable() {
        assert!(ToolError::upstream_request("connection reset").retryable);
        assert!(!ToolError::upstream_shape("links is not a map").retryable);
    }
}
