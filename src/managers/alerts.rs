use super::{EndpointBinding, HandlerRegistry, ListEndpoint, LookupEndpoint, PathPart};
use crate::constants::limits;
use crate::utils::pagination::LinksPolicy;

pub const LIST_COST_ALERTS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-cost-alerts",
        path: &[PathPart::Fixed("cost_alerts")],
        limit: limits::DEFAULT,
        collection: "cost_alerts",
        links: LinksPolicy::Strict,
    },
    filters: &[],
    notes: None,
};

pub const GET_COST_ALERT: LookupEndpoint = LookupEndpoint {
    tool: "get-cost-alert",
    path: &[
        PathPart::Fixed("cost_alerts"),
        PathPart::Param("cost_alert_token"),
    ],
    filters: &[],
    entity: Some("cost_alert"),
};

pub fn register(registry: &mut HandlerRegistry) {
    registry.add(LIST_COST_ALERTS).add(GET_COST_ALERT);
}
