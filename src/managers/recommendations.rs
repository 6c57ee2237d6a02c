use super::{EndpointBinding, Filter, HandlerRegistry, ListEndpoint, LookupEndpoint, PathPart};
use crate::constants::limits;
use crate::utils::pagination::LinksPolicy;

pub const RECOMMENDATION_STATUSES: &[&str] = &["open", "resolved", "dismissed"];

pub const LIST_RECOMMENDATIONS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-recommendations",
        path: &[PathPart::Fixed("recommendations")],
        limit: limits::DEFAULT,
        collection: "recommendations",
        links: LinksPolicy::Strict,
    },
    filters: &[
        Filter::Text("workspace_token"),
        Filter::Text("provider"),
        Filter::Text("provider_account_id"),
        Filter::Text("category"),
        Filter::Choice {
            key: "filter",
            options: RECOMMENDATION_STATUSES,
            default: None,
        },
    ],
    notes: None,
};

pub const GET_RECOMMENDATION_DETAILS: LookupEndpoint = LookupEndpoint {
    tool: "get-recommendation-details",
    path: &[
        PathPart::Fixed("recommendations"),
        PathPart::Param("recommendation_token"),
    ],
    filters: &[],
    entity: Some("recommendation"),
};

/// Resources affected by one recommendation.
pub const GET_RECOMMENDATION_RESOURCES: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "get-recommendation-resources",
        path: &[
            PathPart::Fixed("recommendations"),
            PathPart::Param("recommendation_token"),
            PathPart::Fixed("resources"),
        ],
        limit: limits::DEFAULT,
        collection: "resources",
        links: LinksPolicy::Strict,
    },
    filters: &[],
    notes: None,
};

pub const GET_RECOMMENDATION_RESOURCE_DETAILS: LookupEndpoint = LookupEndpoint {
    tool: "get-recommendation-resource-details",
    path: &[
        PathPart::Fixed("recommendations"),
        PathPart::Param("recommendation_token"),
        PathPart::Fixed("resources"),
        PathPart::Param("resource_token"),
    ],
    filters: &[],
    entity: Some("resource"),
};

pub fn register(registry: &mut HandlerRegistry) {
    registry
        .add(LIST_RECOMMENDATIONS)
        .add(GET_RECOMMENDATION_DETAILS)
        .add(GET_RECOMMENDATION_RESOURCES)
        .add(GET_RECOMMENDATION_RESOURCE_DETAILS);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::Endpoint;
    use super::*;
    use crate::errors::ToolErrorKind;
    use serde_json::json;

    #[test]
    fn status_filter_is_normalized() {
        let request = LIST_RECOMMENDATIONS
            .build_query(&json!({"filter": "Resolved", "provider": "aws"}), &ctx())
            .unwrap();
        assert_eq!(query_keys(&request), vec!["limit", "page", "provider", "filter"]);
        assert_eq!(request.query_value("filter"), Some("resolved"));

        let err = LIST_RECOMMENDATIONS
            .build_query(&json!({"filter": "pending"}), &ctx())
            .unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::InvalidParams);
    }

    #[test]
    fn status_is_left_to_upstream_when_absent() {
        let request = LIST_RECOMMENDATIONS.build_query(&json!({}), &ctx()).unwrap();
        assert_eq!(query_keys(&request), vec!["limit", "page"]);
    }

    #[test]
    fn nested_resource_paths() {
        let args = json!({"recommendation_token": "rcmmndtn_1", "resource_token": "prvdr_rsrc_2"});
        let request = GET_RECOMMENDATION_RESOURCES.build_query(&args, &ctx()).unwrap();
        assert_eq!(request.path, vec!["recommendations", "rcmmndtn_1", "resources"]);
        let request = GET_RECOMMENDATION_RESOURCE_DETAILS
            .build_query(&args, &ctx())
            .unwrap();
        assert_eq!(
            request.path,
            vec!["recommendations", "rcmmndtn_1", "resources", "prvdr_rsrc_2"]
        );
        assert!(GET_RECOMMENDATION_RESOURCE_DETAILS
            .build_query(&json!({"recommendation_token": "rcmmndtn_1"}), &ctx())
            .is_err());
    }

    #[test]
    fn affected_resources_carry_page_data() {
        let payload = json!({
            "resources": [{"token": "prvdr_rsrc_2"}],
            "links": {"next": "https://api.vantage.sh/v2/recommendations/rcmmndtn_1/resources?page=2"}
        });
        let out = GET_RECOMMENDATION_RESOURCES
            .project_result(&json!({}), payload, &ctx())
            .unwrap();
        assert_eq!(out["page_data"], json!({"next_page": 2, "has_next_page": true}));
    }
}
