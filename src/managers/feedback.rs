use serde_json::{json, Value};

use super::{AdapterContext, Endpoint, HandlerRegistry};
use crate::errors::ToolError;
use crate::services::upstream::UpstreamRequest;

/// Sends free-form feedback about the server to the upstream team.
pub struct FeedbackEndpoint;

impl Endpoint for FeedbackEndpoint {
    fn tool(&self) -> &'static str {
        "submit-user-feedback"
    }

    fn build_query(
        &self,
        args: &Value,
        ctx: &AdapterContext,
    ) -> Result<UpstreamRequest, ToolError> {
        let message = ctx.validation.required_string(args, "message")?;
        Ok(UpstreamRequest::post(
            &["user_feedback"],
            json!({ "message": message }),
        ))
    }

    fn project_result(
        &self,
        _args: &Value,
        _payload: Value,
        _ctx: &AdapterContext,
    ) -> Result<Value, ToolError> {
        Ok(json!({ "success": true }))
    }
}

pub fn register(registry: &mut HandlerRegistry) {
    registry.add(FeedbackEndpoint);
}
