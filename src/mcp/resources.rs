use crate::constants::resources::{GUIDE_URI_PREFIX, PROVIDERS, PROVIDERS_URI, VERSION_URI};
use crate::constants::server::{NAME, VERSION};
use serde_json::{json, Value};

const JSON_MIME: &str = "application/json";
const MARKDOWN_MIME: &str = "text/markdown";

/// A static markdown document served under `GUIDE_URI_PREFIX`.
pub struct Guide {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub content: &'static str,
}

macro_rules! guide {
    ($key:literal, $title:literal, $description:literal) => {
        Guide {
            key: $key,
            title: $title,
            description: $description,
            content: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/", $key)),
        }
    };
}

pub static GUIDES: &[Guide] = &[
    guide!(
        "vql/index.md",
        "VQL (Vantage Query Language) Overview",
        "Learn Vantage Query Language (VQL), a SQL-like language for filtering cloud cost data across providers."
    ),
    guide!(
        "vql/cost_report.md",
        "VQL for Cost Reports",
        "Learn how to use VQL when querying Cost Reports in Vantage."
    ),
    guide!(
        "vql/resource_report.md",
        "VQL for Resource Reports",
        "Learn how to use VQL when querying Resource Reports in Vantage."
    ),
    guide!(
        "vql/financial_commitment_report.md",
        "VQL for Financial Commitment Reports",
        "Learn how to use VQL when querying Financial Commitment Reports in Vantage."
    ),
    guide!(
        "vql/kubernetes_efficiency_report.md",
        "VQL for Kubernetes Efficiency Reports",
        "Learn how to use VQL when querying Kubernetes Efficiency Reports in Vantage."
    ),
    guide!(
        "vql/network_flow_report.md",
        "VQL for Network Flow Reports",
        "Learn how to use VQL when querying Network Flow Reports in Vantage."
    ),
];

impl Guide {
    pub fn uri(&self) -> String {
        format!("{}{}", GUIDE_URI_PREFIX, self.key)
    }
}

fn guide_by_uri(uri: &str) -> Option<&'static Guide> {
    let key = uri.strip_prefix(GUIDE_URI_PREFIX)?;
    GUIDES.iter().find(|guide| guide.key == key)
}

/// Descriptors for `resources/list`.
pub fn list_resources() -> Vec<Value> {
    let mut out = vec![
        json!({
            "uri": PROVIDERS_URI,
            "name": "providers",
            "description": "Cloud providers with first-class cost support",
            "mimeType": JSON_MIME
        }),
        json!({
            "uri": VERSION_URI,
            "name": "version",
            "description": "Version of this server",
            "mimeType": JSON_MIME
        }),
    ];
    out.extend(GUIDES.iter().map(|guide| {
        json!({
            "uri": guide.uri(),
            "name": guide.key,
            "title": guide.title,
            "description": guide.description,
            "mimeType": MARKDOWN_MIME,
            "annotations": { "audience": ["assistant", "user"] }
        })
    }));
    out
}

/// Content entry for `resources/read`, or `None` for an unknown uri.
pub fn read_resource(uri: &str) -> Option<Value> {
    let (mime, text) = match uri {
        PROVIDERS_URI => (JSON_MIME, json!(PROVIDERS).to_string()),
        VERSION_URI => (JSON_MIME, json!({ "name": NAME, "version": VERSION }).to_string()),
        other => (MARKDOWN_MIME, guide_by_uri(other)?.content.to_string()),
    };
    Some(json!({ "uri": uri, "mimeType": mime, "text": text }))
}
