use super::{EndpointBinding, HandlerRegistry, ListEndpoint, LookupEndpoint, PathPart};
use crate::constants::limits;
use crate::utils::pagination::LinksPolicy;

/// Identity of the calling token: user, workspaces and token scope.
pub const GET_MYSELF: LookupEndpoint = LookupEndpoint {
    tool: "get-myself",
    path: &[PathPart::Fixed("me")],
    filters: &[],
    entity: Some("me"),
};

pub const GET_USERS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "get-users",
        path: &[PathPart::Fixed("users")],
        limit: limits::DEFAULT,
        collection: "users",
        links: LinksPolicy::Strict,
    },
    filters: &[],
    notes: None,
};

pub const GET_TEAMS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "get-teams",
        path: &[PathPart::Fixed("teams")],
        limit: limits::DEFAULT,
        collection: "teams",
        links: LinksPolicy::Strict,
    },
    filters: &[],
    notes: None,
};

pub const GET_TEAM: LookupEndpoint = LookupEndpoint {
    tool: "get-team",
    path: &[PathPart::Fixed("teams"), PathPart::Param("token")],
    filters: &[],
    entity: Some("team"),
};

pub fn register(registry: &mut HandlerRegistry) {
    registry
        .add(GET_MYSELF)
        .add(GET_USERS)
        .add(GET_TEAMS)
        .add(GET_TEAM);
}
