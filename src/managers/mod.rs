//! Endpoint adapters: one per upstream resource, all driven by the same
//! generic handler.

pub mod account;
pub mod alerts;
pub mod anomalies;
pub mod cost_reports;
pub mod costs;
pub mod feedback;
pub mod organization;
pub mod providers;
pub mod recommendations;
pub mod resources;
pub mod tags;
pub mod unit_costs;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ToolError;
use crate::services::credential::RequestSigner;
use crate::services::gateway::ToolHandler;
use crate::services::logger::Logger;
use crate::services::upstream::{UpstreamClient, UpstreamRequest};
use crate::services::validation::Validation;
use crate::utils::date_bin::DateBin;
use crate::utils::pagination::{page_data, LinksPolicy};

/// Everything an adapter needs besides its own configuration.
#[derive(Clone)]
pub struct AdapterContext {
    pub validation: Validation,
    pub logger: Logger,
}

impl AdapterContext {
    pub fn new(logger: Logger) -> Self {
        Self {
            validation: Validation::new(),
            logger,
        }
    }

    /// Optional date argument; malformed values are logged and dropped.
    pub fn date(&self, args: &Value, key: &str) -> Option<String> {
        let parsed = self.validation.optional_date(args, key);
        if parsed.is_none() {
            if let Some(raw) = args.get(key).filter(|v| !v.is_null()) {
                if raw.as_str().map(|s| !s.trim().is_empty()).unwrap_or(true) {
                    self.logger.debug(
                        "Dropping malformed date argument",
                        Some(&serde_json::json!({ "arg": key, "value": raw })),
                    );
                }
            }
        }
        parsed
    }
}

/// Maps tool arguments to an upstream request and the upstream payload
/// back to a tool result.
pub trait Endpoint: Send + Sync {
    fn tool(&self) -> &'static str;

    fn build_query(&self, args: &Value, ctx: &AdapterContext)
        -> Result<UpstreamRequest, ToolError>;

    fn project_result(
        &self,
        args: &Value,
        payload: Value,
        ctx: &AdapterContext,
    ) -> Result<Value, ToolError>;
}

pub struct EndpointHandler<E> {
    endpoint: E,
    upstream: UpstreamClient,
    ctx: AdapterContext,
}

impl<E: Endpoint> EndpointHandler<E> {
    pub fn new(endpoint: E, upstream: UpstreamClient, logger: &Logger) -> Self {
        let ctx = AdapterContext::new(logger.child(endpoint.tool()));
        Self {
            endpoint,
            upstream,
            ctx,
        }
    }
}

#[async_trait]
impl<E: Endpoint + 'static> ToolHandler for EndpointHandler<E> {
    async fn handle(&self, args: Value, signer: &RequestSigner) -> Result<Value, ToolError> {
        let request = self.endpoint.build_query(&args, &self.ctx)?;
        let payload = self.upstream.send(signer, request).await?;
        self.endpoint.project_result(&args, payload, &self.ctx)
    }
}

/// A URL path segment, either literal or taken from a required argument.
#[derive(Debug, Clone, Copy)]
pub enum PathPart {
    Fixed(&'static str),
    Param(&'static str),
}

pub fn resolve_path(
    parts: &[PathPart],
    args: &Value,
    ctx: &AdapterContext,
) -> Result<Vec<String>, ToolError> {
    parts
        .iter()
        .map(|part| match part {
            PathPart::Fixed(segment) => Ok(segment.to_string()),
            PathPart::Param(key) => ctx.validation.required_string(args, key),
        })
        .collect()
}

/// Query filter attached after `limit` and `page`, in declaration order.
#[derive(Debug, Clone, Copy)]
pub enum Filter {
    Required(&'static str),
    Text(&'static str),
    Integer(&'static str),
    /// Boolean sent on every call, `false` unless the caller set it.
    Flag(&'static str),
    Date(&'static str),
    Choice {
        key: &'static str,
        options: &'static [&'static str],
        default: Option<&'static str>,
    },
    DateBin,
}

pub fn apply_filters(
    request: &mut UpstreamRequest,
    filters: &[Filter],
    args: &Value,
    ctx: &AdapterContext,
) -> Result<(), ToolError> {
    for filter in filters {
        match *filter {
            Filter::Required(key) => {
                request.param(key, ctx.validation.required_string(args, key)?);
            }
            Filter::Text(key) => {
                request.param_opt(key, ctx.validation.optional_string(args, key)?);
            }
            Filter::Integer(key) => {
                request.param_opt(key, ctx.validation.optional_integer(args, key)?);
            }
            Filter::Flag(key) => {
                request.param(key, ctx.validation.optional_bool(args, key)?.unwrap_or(false));
            }
            Filter::Date(key) => {
                request.param_opt(key, ctx.date(args, key));
            }
            Filter::Choice {
                key,
                options,
                default,
            } => {
                request.param_opt(key, ctx.validation.choice(args, key, options, default)?);
            }
            Filter::DateBin => {
                request.param("date_bin", DateBin::from_args(args)?.as_str());
            }
        }
    }
    Ok(())
}

/// Static description of one paginated collection.
#[derive(Debug, Clone, Copy)]
pub struct EndpointBinding {
    pub tool: &'static str,
    pub path: &'static [PathPart],
    pub limit: u32,
    pub collection: &'static str,
    pub links: LinksPolicy,
}

/// Paginated list whose behavior is fully described by data.
#[derive(Debug, Clone, Copy)]
pub struct ListEndpoint {
    pub binding: EndpointBinding,
    pub filters: &'static [Filter],
    /// Subject for the date-bin note, e.g. "Unit cost".
    pub notes: Option<&'static str>,
}

impl Endpoint for ListEndpoint {
    fn tool(&self) -> &'static str {
        self.binding.tool
    }

    fn build_query(
        &self,
        args: &Value,
        ctx: &AdapterContext,
    ) -> Result<UpstreamRequest, ToolError> {
        let path = resolve_path(self.binding.path, args, ctx)?;
        let mut request = UpstreamRequest::get(&path);
        request
            .param("limit", self.binding.limit)
            .param("page", ctx.validation.page(args)?);
        apply_filters(&mut request, self.filters, args, ctx)?;
        Ok(request)
    }

    fn project_result(
        &self,
        args: &Value,
        payload: Value,
        ctx: &AdapterContext,
    ) -> Result<Value, ToolError> {
        let mut out = project_page(&self.binding, payload, ctx)?;
        if let Some(subject) = self.notes {
            let bin = DateBin::from_args(args).unwrap_or_default();
            out.insert("notes".to_string(), Value::String(bin.notes(subject)));
        }
        Ok(Value::Object(out))
    }
}

/// Single record fetched by token. `entity` wraps the record under a key;
/// without it the record is returned as is.
#[derive(Debug, Clone, Copy)]
pub struct LookupEndpoint {
    pub tool: &'static str,
    pub path: &'static [PathPart],
    pub filters: &'static [Filter],
    pub entity: Option<&'static str>,
}

impl Endpoint for LookupEndpoint {
    fn tool(&self) -> &'static str {
        self.tool
    }

    fn build_query(
        &self,
        args: &Value,
        ctx: &AdapterContext,
    ) -> Result<UpstreamRequest, ToolError> {
        let mut request = UpstreamRequest::get(&resolve_path(self.path, args, ctx)?);
        apply_filters(&mut request, self.filters, args, ctx)?;
        Ok(request)
    }

    fn project_result(
        &self,
        _args: &Value,
        payload: Value,
        _ctx: &AdapterContext,
    ) -> Result<Value, ToolError> {
        if !payload.is_object() {
            return Err(ToolError::upstream_shape(format!(
                "Expected an object from {}",
                self.tool
            )));
        }
        Ok(match self.entity {
            Some(key) => {
                let mut out = Map::new();
                out.insert(key.to_string(), payload);
                Value::Object(out)
            }
            None => payload,
        })
    }
}

/// Unpaginated list: the upstream returns every record at once.
#[derive(Debug, Clone, Copy)]
pub struct CollectionEndpoint {
    pub tool: &'static str,
    pub path: &'static [PathPart],
    pub filters: &'static [Filter],
    pub collection: &'static str,
}

impl Endpoint for CollectionEndpoint {
    fn tool(&self) -> &'static str {
        self.tool
    }

    fn build_query(
        &self,
        args: &Value,
        ctx: &AdapterContext,
    ) -> Result<UpstreamRequest, ToolError> {
        let mut request = UpstreamRequest::get(&resolve_path(self.path, args, ctx)?);
        apply_filters(&mut request, self.filters, args, ctx)?;
        Ok(request)
    }

    fn project_result(
        &self,
        _args: &Value,
        mut payload: Value,
        _ctx: &AdapterContext,
    ) -> Result<Value, ToolError> {
        let items = take_collection(&mut payload, self.collection)?;
        let mut out = Map::new();
        out.insert(self.collection.to_string(), items);
        Ok(Value::Object(out))
    }
}

/// Builds `{<collection>: [...], "page_data": {...}}` from a list payload.
pub fn project_page(
    binding: &EndpointBinding,
    mut payload: Value,
    ctx: &AdapterContext,
) -> Result<Map<String, Value>, ToolError> {
    let page = page_data(&payload, binding.links, &ctx.logger)?;
    let items = take_collection(&mut payload, binding.collection)?;
    let mut out = Map::new();
    out.insert(binding.collection.to_string(), items);
    out.insert("page_data".to_string(), serde_json::to_value(page)?);
    Ok(out)
}

/// Removes `key` from an object payload. A null collection reads as empty.
pub fn take_collection(payload: &mut Value, key: &str) -> Result<Value, ToolError> {
    let object = payload.as_object_mut().ok_or_else(|| {
        ToolError::upstream_shape(format!("Expected an object containing '{}'", key))
    })?;
    match object.remove(key) {
        Some(Value::Array(items)) => Ok(Value::Array(items)),
        Some(Value::Null) => Ok(Value::Array(Vec::new())),
        Some(_) => Err(ToolError::upstream_shape(format!(
            "Upstream field '{}' is not a list",
            key
        ))),
        None => Err(ToolError::upstream_shape(format!(
            "Upstream payload has no '{}' field",
            key
        ))),
    }
}

/// Collects handlers keyed by tool name.
pub struct HandlerRegistry {
    upstream: UpstreamClient,
    logger: Logger,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl HandlerRegistry {
    pub fn new(upstream: UpstreamClient, logger: Logger) -> Self {
        Self {
            upstream,
            logger: logger.child("adapter"),
            handlers: HashMap::new(),
        }
    }

    pub fn add<E: Endpoint + 'static>(&mut self, endpoint: E) -> &mut Self {
        let name = endpoint.tool().to_string();
        let handler = EndpointHandler::new(endpoint, self.upstream.clone(), &self.logger);
        self.handlers.insert(name, Arc::new(handler));
        self
    }

    pub fn into_handlers(self) -> HashMap<String, Arc<dyn ToolHandler>> {
        self.handlers
    }
}

pub fn build_handlers(
    upstream: &UpstreamClient,
    logger: &Logger,
) -> HashMap<String, Arc<dyn ToolHandler>> {
    let mut registry = HandlerRegistry::new(upstream.clone(), logger.clone());
    cost_reports::register(&mut registry);
    costs::register(&mut registry);
    providers::register(&mut registry);
    tags::register(&mut registry);
    anomalies::register(&mut registry);
    organization::register(&mut registry);
    unit_costs::register(&mut registry);
    alerts::register(&mut registry);
    recommendations::register(&mut registry);
    resources::register(&mut registry);
    account::register(&mut registry);
    feedback::register(&mut registry);
    registry.into_handlers()
}
