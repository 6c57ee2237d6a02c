use super::{EndpointBinding, Filter, HandlerRegistry, ListEndpoint, LookupEndpoint, PathPart};
use crate::constants::limits;
use crate::utils::pagination::LinksPolicy;

pub const LIST_DASHBOARDS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-dashboards",
        path: &[PathPart::Fixed("dashboards")],
        limit: limits::DASHBOARDS,
        collection: "dashboards",
        links: LinksPolicy::Strict,
    },
    filters: &[],
    notes: None,
};

pub const LIST_FOLDERS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-folders",
        path: &[PathPart::Fixed("folders")],
        limit: limits::DEFAULT,
        collection: "folders",
        links: LinksPolicy::Strict,
    },
    filters: &[],
    notes: None,
};

pub const GET_FOLDER: LookupEndpoint = LookupEndpoint {
    tool: "get-folder",
    path: &[PathPart::Fixed("folders"), PathPart::Param("folder_token")],
    filters: &[],
    entity: Some("folder"),
};

pub const LIST_BUDGETS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-budgets",
        path: &[PathPart::Fixed("budgets")],
        limit: limits::DEFAULT,
        collection: "budgets",
        links: LinksPolicy::Strict,
    },
    filters: &[],
    notes: None,
};

/// Audit trail dates are ISO 8601 timestamps, so they pass through as text.
pub const LIST_AUDIT_LOGS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-audit-logs",
        path: &[PathPart::Fixed("audit_logs")],
        limit: limits::DEFAULT,
        collection: "audit_logs",
        links: LinksPolicy::Strict,
    },
    filters: &[
        Filter::Integer("user"),
        Filter::Text("workspace_token"),
        Filter::Text("action"),
        Filter::Text("object_name"),
        Filter::Text("source"),
        Filter::Text("object_type"),
        Filter::Text("token"),
        Filter::Text("object_token"),
        Filter::Text("start_date"),
        Filter::Text("end_date"),
    ],
    notes: None,
};

pub fn register(registry: &mut HandlerRegistry) {
    registry
        .add(LIST_DASHBOARDS)
        .add(LIST_FOLDERS)
        .add(GET_FOLDER)
        .add(LIST_BUDGETS)
        .add(LIST_AUDIT_LOGS);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::Endpoint;
    use super::*;
    use serde_json::json;

    #[test]
    fn dashboards_use_smaller_pages() {
        let request = LIST_DASHBOARDS.build_query(&json!({}), &ctx()).unwrap();
        assert_eq!(request.query_value("limit"), Some("64"));
    }

    #[test]
    fn folder_lookup_wraps_record() {
        let out = GET_FOLDER
            .project_result(&json!({}), json!({"token": "fldr_1", "title": "Prod"}), &ctx())
            .unwrap();
        assert_eq!(out["folder"]["title"], "Prod");
    }

    #[test]
    fn audit_log_filters_keep_timestamps() {
        let request = LIST_AUDIT_LOGS
            .build_query(
                &json!({
                    "user": 12,
                    "source": "finops_agent",
                    "start_date": "2025-03-01T00:00:00Z"
                }),
                &ctx(),
            )
            .unwrap();
        assert_eq!(
            query_keys(&request),
            vec!["limit", "page", "user", "source", "start_date"]
        );
        assert_eq!(request.query_value("user"), Some("12"));
        assert_eq!(request.query_value("start_date"), Some("2025-03-01T00:00:00Z"));
    }
}
