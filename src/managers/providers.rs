use super::{CollectionEndpoint, EndpointBinding, Filter, HandlerRegistry, ListEndpoint, PathPart};
use crate::constants::limits;
use crate::utils::pagination::LinksPolicy;

/// Providers are listed leniently: an odd `links` value still yields the
/// provider list.
pub const LIST_COST_PROVIDERS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-cost-providers",
        path: &[PathPart::Fixed("cost_providers")],
        limit: limits::DEFAULT,
        collection: "cost_providers",
        links: LinksPolicy::Lenient,
    },
    filters: &[Filter::Required("workspace_token")],
    notes: None,
};

pub const LIST_COST_SERVICES: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-cost-services",
        path: &[PathPart::Fixed("cost_services")],
        limit: limits::COST_SERVICES,
        collection: "cost_services",
        links: LinksPolicy::Strict,
    },
    filters: &[Filter::Required("workspace_token")],
    notes: None,
};

pub const LIST_COST_INTEGRATIONS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-cost-integrations",
        path: &[PathPart::Fixed("integrations")],
        limit: limits::DEFAULT,
        collection: "integrations",
        links: LinksPolicy::Strict,
    },
    filters: &[],
    notes: None,
};

/// Account ids here are the ones VQL expects in `account_id` filters.
pub const GET_COST_PROVIDER_ACCOUNTS: CollectionEndpoint = CollectionEndpoint {
    tool: "get-cost-provider-accounts",
    path: &[PathPart::Fixed("cost_provider_accounts")],
    filters: &[
        Filter::Required("workspace_token"),
        Filter::Text("account_id"),
        Filter::Text("provider"),
    ],
    collection: "cost_provider_accounts",
};

pub fn register(registry: &mut HandlerRegistry) {
    registry
        .add(LIST_COST_PROVIDERS)
        .add(LIST_COST_SERVICES)
        .add(LIST_COST_INTEGRATIONS)
        .add(GET_COST_PROVIDER_ACCOUNTS);
}
