use super::{EndpointBinding, HandlerRegistry, ListEndpoint, PathPart};
use crate::constants::limits;
use crate::utils::pagination::LinksPolicy;

pub const LIST_TAGS: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-tags",
        path: &[PathPart::Fixed("tags")],
        limit: limits::DEFAULT,
        collection: "tags",
        links: LinksPolicy::Strict,
    },
    filters: &[],
    notes: None,
};

pub const LIST_TAG_VALUES: ListEndpoint = ListEndpoint {
    binding: EndpointBinding {
        tool: "list-tag-values",
        path: &[
            PathPart::Fixed("tags"),
            PathPart::Param("key"),
            PathPart::Fixed("values"),
        ],
        limit: limits::DEFAULT,
        collection: "tag_values",
        links: LinksPolicy::Strict,
    },
    filters: &[],
    notes: None,
};

pub fn register(registry: &mut HandlerRegistry) {
    registry.add(LIST_TAGS).add(LIST_TAG_VALUES);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::Endpoint;
    use super::*;
    use serde_json::json;

    #[test]
    fn tag_key_lands_in_path_not_query() {
        let request = LIST_TAG_VALUES
            .build_query(&json!({"key": "team", "page": 2}), &ctx())
            .unwrap();
        assert_eq!(request.path, vec!["tags", "team", "values"]);
        assert_eq!(query_keys(&request), vec!["limit", "page"]);
        assert_eq!(request.query_value("page"), Some("2"));
    }

    #[test]
    fn blank_tag_key_is_rejected() {
        assert!(LIST_TAG_VALUES
            .build_query(&json!({"key": " "}), &ctx())
            .is_err());
    }
}
