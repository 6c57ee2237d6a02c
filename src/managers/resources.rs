use super::{EndpointBinding, Filter, HandlerRegistry, ListEndpoint, LookupEndpoint, PathPart};
use crate::constants::limits;
use crate::utils::pagination::LinksPolicy;

/// Provider resources, taken either from a resource report or from a VQL
/// filter scoped to a workspace.
pub const LIST_PROVIDER_RESOURCES: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-provider-resources",
        path: &[PathPart::Fixed("resources")],
        limit: limits::DEFAULT,
        collection: "resources",
        links: LinksPolicy::Strict,
    },
    filters: &[
        Filter::Text("resource_report_token"),
        Filter::Text("filter"),
        Filter::Text("workspace_token"),
        Filter::Flag("include_cost"),
    ],
    notes: None,
};

/// Accepts a `prvdr_rsrc_` token or the provider's own UUID/ARN.
pub const GET_PROVIDER_RESOURCE: LookupEndpoint = LookupEndpoint {
    tool: "get-provider-resource",
    path: &[PathPart::Fixed("resources"), PathPart::Param("resource_token")],
    filters: &[Filter::Flag("include_cost")],
    entity: Some("resource"),
};

pub fn register(registry: &mut HandlerRegistry) {
    registry
        .add(LIST_PROVIDER_RESOURCES)
        .add(GET_PROVIDER_RESOURCE);
}
