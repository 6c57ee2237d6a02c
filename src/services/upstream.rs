use crate::constants::network::{TIMEOUT_API_REQUEST_MS, TIMEOUT_CONNECTION_MS};
use crate::constants::upstream::API_VERSION;
use crate::errors::ToolError;
use crate::services::credential::RequestSigner;
use crate::services::logger::Logger;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use url::Url;

const ERROR_BODY_PREVIEW: usize = 2_048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One call against the versioned upstream API.
///
/// Path segments are percent-encoded individually, so caller supplied
/// tokens can never change the route.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: HttpMethod,
    pub path: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl UpstreamRequest {
    pub fn get<S: AsRef<str>>(path: &[S]) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.iter().map(|s| s.as_ref().to_string()).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post<S: AsRef<str>>(path: &[S], body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(body),
            ..Self::get(path)
        }
    }

    pub fn param(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn param_opt(&mut self, key: &str, value: Option<impl ToString>) -> &mut Self {
        if let Some(value) = value {
            self.param(key, value);
        }
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn route(&self) -> String {
        format!("/{}/{}", API_VERSION, self.path.join("/"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream request failed: {0}")]
    Transport(String),
    #[error("upstream responded with HTTP {status}")]
    Status { status: u16, errors: Value },
    #[error("upstream response is not valid JSON: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return UpstreamError::Timeout;
        }
        UpstreamError::Transport(err.to_string())
    }
}

impl From<UpstreamError> for ToolError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::InvalidUrl(message) => {
                ToolError::upstream_request(format!("Invalid upstream URL: {}", message))
                    .with_retryable(false)
            }
            UpstreamError::Timeout => {
                ToolError::upstream_request("Upstream request timed out").with_hint(format!(
                    "The API did not answer within {} ms; retry later.",
                    TIMEOUT_API_REQUEST_MS
                ))
            }
            UpstreamError::Transport(message) => ToolError::upstream_request(message),
            UpstreamError::Status { status, errors } => {
                let retryable = status == 429 || status >= 500;
                ToolError::upstream_request(format!("Upstream responded with HTTP {}", status))
                    .with_details(serde_json::json!({ "status": status, "errors": errors }))
                    .with_retryable(retryable)
            }
            UpstreamError::Decode(message) => ToolError::upstream_shape(format!(
                "Upstream response is not valid JSON: {}",
                message
            )),
        }
    }
}

/// Shared HTTP client bound to one API host.
#[derive(Clone)]
pub struct UpstreamClient {
    logger: Logger,
    base: Url,
    client: Client,
}

impl UpstreamClient {
    pub fn new(logger: Logger, api_host: &str) -> Result<Self, ToolError> {
        let base = Url::parse(api_host).map_err(|err| {
            ToolError::invalid_params(format!("Invalid API host '{}': {}", api_host, err))
        })?;
        if base.cannot_be_a_base() {
            return Err(ToolError::invalid_params(format!(
                "Invalid API host '{}': not a base URL",
                api_host
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(TIMEOUT_API_REQUEST_MS))
            .connect_timeout(Duration::from_millis(TIMEOUT_CONNECTION_MS))
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("upstream"),
            base,
            client,
        })
    }

    pub fn url_for(&self, request: &UpstreamRequest) -> Result<Url, UpstreamError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidUrl(self.base.to_string()))?;
            segments.pop_if_empty().push(API_VERSION);
            for segment in &request.path {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Sends a signed request and decodes the JSON body. An empty body
    /// (204 or zero-length) decodes to `Value::Null`.
    pub async fn send(
        &self,
        signer: &RequestSigner,
        request: UpstreamRequest,
    ) -> Result<Value, UpstreamError> {
        let url = self.url_for(&request)?;
        let started = Instant::now();
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = signer.sign(builder).send().await?;
        let status = response.status();
        let text = response.text().await?;
        self.logger.debug(
            "upstream response",
            Some(&serde_json::json!({
                "route": request.route(),
                "status": status.as_u16(),
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                errors: extract_errors(&text),
            });
        }
        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| UpstreamError::Decode(err.to_string()))
    }
}

/// Pulls the `errors` array out of an error body, falling back to a
/// preview of the raw text.
fn extract_errors(body: &str) -> Value {
    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        if let Some(errors) = parsed.get("errors") {
            return errors.clone();
        }
        return Value::Array(vec![parsed]);
    }
    let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
    if preview.trim().is_empty() {
        Value::Array(Vec::new())
    } else {
        Value::Array(vec![Value::String(preview)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolErrorKind;
    use serde_json::json;

    fn client(host: &str) -> UpstreamClient {
        UpstreamClient::new(Logger::new("test"), host).expect("client")
    }

    #[test]
    fn url_keeps_host_prefix_and_encodes_segments() {
        let upstream = client("https://api.vantage.sh");
        let request = UpstreamRequest::get(&["tags", "team/name", "values"]);
        assert_eq!(
            upstream.url_for(&request).unwrap().as_str(),
            "https://api.vantage.sh/v2/tags/team%2Fname/values"
        );

        let upstream = client("http://127.0.0.1:9000/proxy");
        let request = UpstreamRequest::get(&["me"]);
        assert_eq!(
            upstream.url_for(&request).unwrap().as_str(),
            "http://127.0.0.1:9000/proxy/v2/me"
        );
    }

    #[test]
    fn invalid_host_is_rejected() {
        assert!(UpstreamClient::new(Logger::new("test"), "not a host").is_err());
        assert!(UpstreamClient::new(Logger::new("test"), "mailto:ops@example.com").is_err());
    }

    #[test]
    fn query_params_keep_insertion_order() {
        let mut request = UpstreamRequest::get(&["costs"]);
        request
            .param("limit", 64)
            .param("page", 1)
            .param_opt("start_date", None::<String>)
            .param_opt("date_bin", Some("month"));
        let keys: Vec<&str> = request.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["limit", "page", "date_bin"]);
        assert_eq!(request.query_value("page"), Some("1"));
    }

    #[test]
    fn status_errors_carry_upstream_error_list() {
        let errors = extract_errors(r#"{"errors":["Workspace not found"]}"#);
        let err: ToolError = UpstreamError::Status {
            status: 404,
            errors,
        }
        .into();
        assert_eq!(err.kind, ToolErrorKind::UpstreamRequest);
        assert!(!err.retryable);
        assert_eq!(
            err.details.unwrap()["errors"],
            json!(["Workspace not found"])
        );
    }

    #[test]
    fn server_errors_are_retryable_and_decode_errors_are_shape_errors() {
        let err: ToolError = UpstreamError::Status {
            status: 503,
            errors: extract_errors("<html>down</html>"),
        }
        .into();
        assert!(err.retryable);
        let err: ToolError = UpstreamError::Decode("eof".into()).into();
        assert_eq!(err.kind, ToolErrorKind::UpstreamShape);
    }

    #[test]
    fn unusable_base_url_is_an_upstream_request_error() {
        let err: ToolError = UpstreamError::InvalidUrl("data:text/plain,x".into()).into();
        assert_eq!(err.kind, ToolErrorKind::UpstreamRequest);
        assert!(err.message.contains("data:text/plain,x"));
        assert!(!err.retryable);
    }
}
