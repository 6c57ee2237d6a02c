use serde_json::Value;

use super::{
    apply_filters, project_page, AdapterContext, Endpoint, EndpointBinding, Filter,
    HandlerRegistry, PathPart,
};
use crate::constants::limits;
use crate::errors::ToolError;
use crate::services::upstream::UpstreamRequest;
use crate::utils::date_bin::DateBin;
use crate::utils::pagination::LinksPolicy;

/// Boolean report settings forwarded as `settings[<name>]`, with the
/// value sent when the caller leaves them out.
const SETTING_FLAGS: &[(&str, bool)] = &[
    ("include_credits", false),
    ("include_refunds", false),
    ("include_discounts", true),
    ("include_tax", true),
    ("amortize", true),
    ("unallocated", false),
    ("show_previous_period", true),
];

const AGGREGATE_BY: &[&str] = &["cost", "usage"];

/// The two ways of reading cost rows from `/v2/costs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostsMode {
    /// Rows of a saved cost report.
    Report,
    /// Ad-hoc VQL query scoped to a workspace.
    Query,
}

pub struct CostsEndpoint {
    mode: CostsMode,
}

impl CostsEndpoint {
    pub const fn new(mode: CostsMode) -> Self {
        Self { mode }
    }

    fn binding(&self) -> EndpointBinding {
        let (tool, limit) = match self.mode {
            CostsMode::Report => ("list-costs", limits::COST_ITEMS),
            CostsMode::Query => ("query-costs", limits::COST_QUERY),
        };
        EndpointBinding {
            tool,
            path: &[PathPart::Fixed("costs")],
            limit,
            collection: "costs",
            links: LinksPolicy::Strict,
        }
    }

    fn scope_filters(&self) -> &'static [Filter] {
        match self.mode {
            CostsMode::Report => &[Filter::Required("cost_report_token")],
            CostsMode::Query => &[Filter::Required("filter"), Filter::Required("workspace_token")],
        }
    }

    fn default_groupings(&self) -> &'static [&'static str] {
        match self.mode {
            CostsMode::Report => &["provider", "service", "account_id"],
            CostsMode::Query => &["provider", "service", "region"],
        }
    }
}

impl Endpoint for CostsEndpoint {
    fn tool(&self) -> &'static str {
        self.binding().tool
    }

    fn build_query(
        &self,
        args: &Value,
        ctx: &AdapterContext,
    ) -> Result<UpstreamRequest, ToolError> {
        let binding = self.binding();
        let mut request = UpstreamRequest::get(&["costs"]);
        request
            .param("limit", binding.limit)
            .param("page", ctx.validation.page(args)?);
        apply_filters(&mut request, self.scope_filters(), args, ctx)?;
        apply_filters(
            &mut request,
            &[
                Filter::Date("start_date"),
                Filter::Date("end_date"),
                Filter::DateBin,
            ],
            args,
            ctx,
        )?;

        for (name, default) in SETTING_FLAGS {
            let key = format!("settings_{}", name);
            let value = ctx.validation.optional_bool(args, &key)?.unwrap_or(*default);
            request.param(&format!("settings[{}]", name), value);
        }
        let aggregate_by = ctx
            .validation
            .choice(args, "settings_aggregate_by", AGGREGATE_BY, Some("cost"))?;
        request.param_opt("settings[aggregate_by]", aggregate_by);

        let groupings = ctx
            .validation
            .string_list(args, "groupings")?
            .map(|items| items.join(","))
            .unwrap_or_else(|| self.default_groupings().join(","));
        request.param("groupings", groupings);
        Ok(request)
    }

    fn project_result(
        &self,
        args: &Value,
        payload: Value,
        ctx: &AdapterContext,
    ) -> Result<Value, ToolError> {
        let total_cost = payload.get("total_cost").cloned().unwrap_or(Value::Null);
        let mut out = project_page(&self.binding(), payload, ctx)?;
        out.insert("total_cost".to_string(), total_cost);
        let bin = DateBin::from_args(args).unwrap_or_default();
        out.insert("notes".to_string(), Value::String(bin.notes("Costs")));
        Ok(Value::Object(out))
    }
}

pub fn register(registry: &mut HandlerRegistry) {
    registry
        .add(CostsEndpoint::new(CostsMode::Report))
        .add(CostsEndpoint::new(CostsMode::Query));
}
