use super::{EndpointBinding, Filter, HandlerRegistry, ListEndpoint, PathPart};
use crate::constants::limits;
use crate::utils::pagination::LinksPolicy;

pub const LIST_UNIT_COSTS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-unit-costs",
        path: &[PathPart::Fixed("unit_costs")],
        limit: limits::UNIT_COSTS,
        collection: "unit_costs",
        links: LinksPolicy::Strict,
    },
    filters: &[
        Filter::Text("cost_report_token"),
        Filter::Date("start_date"),
        Filter::Date("end_date"),
        Filter::DateBin,
        Filter::Choice {
            key: "order",
            options: &["asc", "desc"],
            default: Some("desc"),
        },
    ],
    notes: Some("Unit cost"),
};

pub fn register(registry: &mut HandlerRegistry) {
    registry.add(LIST_UNIT_COSTS);
}
