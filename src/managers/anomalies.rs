use super::{EndpointBinding, Filter, HandlerRegistry, ListEndpoint, LookupEndpoint, PathPart};
use crate::constants::limits;
use crate::utils::pagination::LinksPolicy;

pub const LIST_ANOMALIES: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-anomalies",
        path: &[PathPart::Fixed("anomaly_alerts")],
        limit: limits::DEFAULT,
        collection: "anomaly_alerts",
        links: LinksPolicy::Strict,
    },
    filters: &[
        Filter::Text("cost_report_token"),
        Filter::Text("service"),
        Filter::Text("provider"),
        Filter::Text("cost_category"),
        Filter::Date("start_date"),
        Filter::Date("end_date"),
    ],
    notes: None,
};

pub const GET_ANOMALY: LookupEndpoint = LookupEndpoint {
    tool: "get-anomaly",
    path: &[
        PathPart::Fixed("anomaly_alerts"),
        PathPart::Param("anomaly_token"),
    ],
    filters: &[],
    entity: Some("anomaly_alert"),
};

pub fn register(registry: &mut HandlerRegistry) {
    registry.add(LIST_ANOMALIES).add(GET_ANOMALY);
}
