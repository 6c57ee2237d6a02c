use crate::app::App;
use crate::constants::server::{HTTP_PATH, NAME, PROTOCOL_VERSION, VERSION};
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::catalog::{tool_by_name, tool_catalog, validate_tool_args};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::mcp::resources::{list_resources, read_resource};
use crate::services::settings::Settings;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpListener;

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    pub async fn from_settings(settings: Settings) -> Result<Self, ToolError> {
        let app = App::initialize(settings).await?;
        Ok(Self::new(Arc::new(app)))
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {"listChanged": false},
                "resources": {"listChanged": false, "subscribe": false}
            },
            "serverInfo": {"name": NAME, "version": VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        let tools: Vec<_> = tool_catalog()
            .iter()
            .filter(|tool| self.app.gateway.contains(&tool.name))
            .collect();
        json!({ "tools": tools })
    }

    fn handle_resources_list(&self) -> Value {
        json!({ "resources": list_resources() })
    }

    fn handle_resources_read(&self, params: &Value) -> Result<Value, McpError> {
        let uri = params
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::new(ErrorCode::InvalidParams, "Missing resource uri"))?;
        let content = read_resource(uri).ok_or_else(|| {
            McpError::new(ErrorCode::ResourceNotFound, format!("Unknown resource: {}", uri))
        })?;
        Ok(json!({ "contents": [content] }))
    }

    /// Runs one tool. Tool failures become an `isError` result; only
    /// protocol problems (unknown tool, bad arguments) are JSON-RPC errors.
    async fn handle_tools_call(&self, params: &Value) -> Result<Value, McpError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| McpError::new(ErrorCode::InvalidParams, "Missing tool name"))?;
        if tool_by_name(name).is_none() || !self.app.gateway.contains(name) {
            return Err(McpError::new(
                ErrorCode::InvalidParams,
                format!("Unknown tool: {}", name),
            ));
        }
        let args = match params.get("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(args) => args.clone(),
        };
        validate_tool_args(name, &args)?;

        let outcome = match self.app.gateway.execute(name, args).await {
            Ok(result) => serde_json::to_string_pretty(&result)
                .map(|text| (text, result))
                .map_err(|err| ToolError::serialization(err.to_string())),
            Err(err) => Err(err),
        };
        Ok(match outcome {
            Ok((text, result)) => json!({
                "content": [{ "type": "text", "text": text }],
                "structuredContent": result,
                "isError": false
            }),
            Err(err) => json!({
                "content": [{ "type": "text", "text": err.render(name) }],
                "isError": true
            }),
        })
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method.starts_with("notifications/") && request.is_notification() {
            return None;
        }
        let id = request.id.clone()?;
        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" | "notifications/initialized" => Ok(json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(&request.params).await,
            "resources/list" => Ok(self.handle_resources_list()),
            "resources/read" => self.handle_resources_read(&request.params),
            _ => Err(McpError::new(ErrorCode::MethodNotFound, "Method not found")),
        };
        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => JsonRpcResponse::from_error(id, err),
        })
    }

    /// Decodes and dispatches one framed message.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let parsed: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    ErrorCode::ParseError.as_i32(),
                    "Parse error".to_string(),
                ))
            }
        };
        let id = parsed.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(parsed) {
            Ok(request) => self.handle_request(request).await,
            Err(_) => Some(JsonRpcResponse::failure(
                id,
                ErrorCode::InvalidRequest.as_i32(),
                "Invalid request".to_string(),
            )),
        }
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin).lines();
        let mut writer = BufWriter::new(stdout);

        while let Some(line) = reader.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(response) = self.handle_message(trimmed).await {
                let payload = serde_json::to_string(&response)?;
                writer.write_all(payload.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        self.app.logger.info("stdin closed, shutting down", None);
        Ok(())
    }

    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route(HTTP_PATH, post(handle_http))
            .with_state(self)
    }

    pub async fn serve_http(self: Arc<Self>, listener: TcpListener) -> Result<(), ToolError> {
        let local = listener.local_addr()?;
        self.app.logger.info(
            "HTTP transport listening",
            Some(&json!({ "addr": local.to_string(), "path": HTTP_PATH })),
        );
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

async fn handle_http(State(server): State<Arc<McpServer>>, body: Bytes) -> Response {
    let raw = String::from_utf8_lossy(&body);
    match server.handle_message(raw.trim()).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

pub async fn run_stdio(settings: Settings) -> Result<(), ToolError> {
    let server = McpServer::from_settings(settings).await?;
    server.run_stdio().await
}

pub async fn run_http(settings: Settings, bind: &str) -> Result<(), ToolError> {
    let server = Arc::new(McpServer::from_settings(settings).await?);
    let listener = TcpListener::bind(bind).await.map_err(|err| {
        ToolError::internal(format!("Failed to bind HTTP transport on {}: {}", bind, err))
    })?;
    server.serve_http(listener).await
}
