use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::ToolError;
use crate::services::credential::{CredentialOutcome, RequestSigner};
use crate::services::logger::Logger;

use serde_json::Value;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, args: Value, signer: &RequestSigner) -> Result<Value, ToolError>;
}

#[derive(Clone)]
struct RegisteredTool {
    description: String,
    handler: Arc<dyn ToolHandler>,
}

/// Single entry point for tool invocations.
///
/// Holds the startup credential outcome; when it is an error, every call
/// returns that error and no handler runs.
#[derive(Clone)]
pub struct ToolGateway {
    logger: Logger,
    credential: Arc<CredentialOutcome>,
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolGateway {
    pub fn new(logger: Logger, credential: CredentialOutcome) -> Self {
        Self {
            logger: logger.child("gateway"),
            credential: Arc::new(credential),
            tools: BTreeMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn ToolHandler>,
    ) {
        let name = name.into();
        if self.tools.contains_key(&name) {
            self.logger.warn(
                "Replacing previously registered tool",
                Some(&serde_json::json!({ "tool": name })),
            );
        }
        self.tools.insert(
            name,
            RegisteredTool {
                description: description.into(),
                handler,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.tools.get(name).map(|tool| tool.description.as_str())
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn credential(&self) -> &CredentialOutcome {
        &self.credential
    }

    pub async fn execute(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        let Some(registered) = self.tools.get(tool) else {
            return Err(
                ToolError::invalid_params(format!("Unknown tool: {}", tool)).with_hint(format!(
                    "Known tools: {}",
                    self.tool_names().join(", ")
                )),
            );
        };

        let call_id = uuid::Uuid::new_v4().to_string();
        self.logger.info(
            "Tool call",
            Some(&serde_json::json!({ "tool": tool, "call_id": call_id, "args": args })),
        );

        let signer = match self.credential.as_ref() {
            Ok(signer) => signer,
            Err(err) => {
                self.logger.warn(
                    "Tool call rejected by credential check",
                    Some(&serde_json::json!({ "tool": tool, "call_id": call_id, "kind": err.kind.as_str() })),
                );
                return Err(err.clone());
            }
        };

        let started = Instant::now();
        let result = registered.handler.handle(args, signer).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => self.logger.debug(
                "Tool call completed",
                Some(&serde_json::json!({ "tool": tool, "call_id": call_id, "duration_ms": duration_ms })),
            ),
            Err(err) => self.logger.warn(
                "Tool call failed",
                Some(&serde_json::json!({
                    "tool": tool,
                    "call_id": call_id,
                    "duration_ms": duration_ms,
                    "kind": err.kind.as_str(),
                    "message": err.message,
                })),
            ),
        }
        result
    }
}
