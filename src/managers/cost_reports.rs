use serde_json::Value;

use super::{
    apply_filters, project_page, resolve_path, AdapterContext, Endpoint, EndpointBinding, Filter,
    HandlerRegistry, ListEndpoint, LookupEndpoint, PathPart,
};
use crate::constants::limits;
use crate::errors::ToolError;
use crate::services::upstream::UpstreamRequest;
use crate::utils::pagination::LinksPolicy;

pub const LIST_COST_REPORTS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-cost-reports",
        path: &[PathPart::Fixed("cost_reports")],
        limit: limits::DEFAULT,
        collection: "cost_reports",
        links: LinksPolicy::Strict,
    },
    filters: &[Filter::Text("folder_token")],
    notes: None,
};

pub const GET_COST_REPORT: LookupEndpoint = LookupEndpoint {
    tool: "get-cost-report",
    path: &[
        PathPart::Fixed("cost_reports"),
        PathPart::Param("cost_report_token"),
    ],
    filters: &[],
    entity: Some("cost_report"),
};

/// Predicted spend for one cost report, optionally narrowed to a provider
/// or a provider's service.
pub struct ForecastEndpoint;

impl ForecastEndpoint {
    const BINDING: EndpointBinding = EndpointBinding {
        tool: "get-cost-report-forecast",
        path: &[
            PathPart::Fixed("cost_reports"),
            PathPart::Param("cost_report_token"),
            PathPart::Fixed("forecasted_costs"),
        ],
        limit: limits::FORECAST,
        collection: "forecasted_costs",
        links: LinksPolicy::Strict,
    };
}

impl Endpoint for ForecastEndpoint {
    fn tool(&self) -> &'static str {
        Self::BINDING.tool
    }

    fn build_query(
        &self,
        args: &Value,
        ctx: &AdapterContext,
    ) -> Result<UpstreamRequest, ToolError> {
        let path = resolve_path(Self::BINDING.path, args, ctx)?;
        let provider = ctx.validation.optional_string(args, "provider")?;
        let service = ctx.validation.optional_string(args, "service")?;
        if service.is_some() && provider.is_none() {
            return Err(
                ToolError::invalid_params("service requires provider").with_hint(
                    "Pass the provider that offers this service (see list-cost-providers).",
                ),
            );
        }
        let mut request = UpstreamRequest::get(&path);
        request
            .param("limit", Self::BINDING.limit)
            .param("page", ctx.validation.page(args)?);
        apply_filters(
            &mut request,
            &[Filter::Date("start_date"), Filter::Date("end_date")],
            args,
            ctx,
        )?;
        request
            .param_opt("provider", provider)
            .param_opt("service", service);
        Ok(request)
    }

    fn project_result(
        &self,
        _args: &Value,
        payload: Value,
        ctx: &AdapterContext,
    ) -> Result<Value, ToolError> {
        let currency = payload.get("currency").cloned().unwrap_or(Value::Null);
        let mut out = project_page(&Self::BINDING, payload, ctx)?;
        out.insert("currency".to_string(), currency);
        Ok(Value::Object(out))
    }
}

pub fn register(registry: &mut HandlerRegistry) {
    registry
        .add(LIST_COST_REPORTS)
        .add(GET_COST_REPORT)
        .add(ForecastEndpoint);
}
