use crate::constants::server::{NAME, VERSION};
use crate::constants::upstream::{READ_SCOPE, TOKEN_SETTINGS_URL};
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::services::upstream::{UpstreamClient, UpstreamError, UpstreamRequest};
use reqwest::header::{HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::fmt;

/// Result of the one-time startup verification. Every tool call sees the
/// same outcome for the lifetime of the process.
pub type CredentialOutcome = Result<RequestSigner, ToolError>;

/// Attaches the verified bearer token and the client identifier to
/// outgoing requests.
#[derive(Clone)]
pub struct RequestSigner {
    authorization: HeaderValue,
    user_agent: HeaderValue,
}

impl RequestSigner {
    pub fn new(token: &str) -> Result<Self, ToolError> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| {
                ToolError::unauthenticated("Bearer token contains characters not allowed in headers")
                    .with_hint(token_hint())
            })?;
        authorization.set_sensitive(true);
        let user_agent = HeaderValue::from_str(&user_agent())
            .map_err(|err| ToolError::internal(format!("Invalid user agent: {}", err)))?;
        Ok(Self {
            authorization,
            user_agent,
        })
    }

    pub fn sign(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, self.authorization.clone())
            .header(USER_AGENT, self.user_agent.clone())
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("authorization", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

pub fn user_agent() -> String {
    format!("{}/{}", NAME, VERSION)
}

fn token_hint() -> String {
    format!(
        "Create a read-only API token at {} and export it as VANTAGE_BEARER_TOKEN.",
        TOKEN_SETTINGS_URL
    )
}

#[derive(Debug, Deserialize)]
struct IdentityPayload {
    #[serde(default)]
    bearer_token: Option<TokenDescriptor>,
}

#[derive(Debug, Default, Deserialize)]
struct TokenDescriptor {
    #[serde(default)]
    scope: Vec<String>,
}

/// True only for a scope list that grants read and nothing else.
pub fn is_read_only(scopes: &[String]) -> bool {
    matches!(scopes, [only] if only == READ_SCOPE)
}

/// Checks a credential against the identity endpoint exactly once.
pub struct CredentialVerifier {
    logger: Logger,
    upstream: UpstreamClient,
}

impl CredentialVerifier {
    pub fn new(logger: Logger, upstream: UpstreamClient) -> Self {
        Self {
            logger: logger.child("credential"),
            upstream,
        }
    }

    pub async fn verify(&self, credential: &str) -> CredentialOutcome {
        let outcome = self.check(credential).await;
        match &outcome {
            Ok(_) => self.logger.info("Bearer token verified as read-only", None),
            Err(err) => self.logger.error(
                "Bearer token rejected; tool calls will fail",
                Some(&serde_json::json!({ "kind": err.kind.as_str(), "message": err.message })),
            ),
        }
        outcome
    }

    async fn check(&self, credential: &str) -> CredentialOutcome {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(ToolError::unauthenticated("No bearer token is configured")
                .with_hint(token_hint()));
        }
        let signer = RequestSigner::new(credential)?;
        let payload = self
            .upstream
            .send(&signer, UpstreamRequest::get(&["me"]))
            .await
            .map_err(|err| match err {
                UpstreamError::Status { status, errors } => ToolError::unauthenticated(format!(
                    "Identity check failed with HTTP {}",
                    status
                ))
                .with_hint(token_hint())
                .with_details(serde_json::json!({ "status": status, "errors": errors })),
                other => ToolError::unauthenticated(format!("Identity check failed: {}", other))
                    .with_hint(token_hint()),
            })?;
        let identity: IdentityPayload = serde_json::from_value(payload).map_err(|err| {
            ToolError::unauthenticated(format!("Identity response could not be decoded: {}", err))
                .with_hint(token_hint())
        })?;
        let scopes = identity.bearer_token.unwrap_or_default().scope;
        if !is_read_only(&scopes) {
            return Err(ToolError::unauthorized(
                "Bearer token must be scoped to read only",
            )
            .with_hint(token_hint())
            .with_details(serde_json::json!({ "scope": scopes })));
        }
        Ok(signer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolErrorKind;

    fn scopes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn only_exact_read_scope_is_accepted() {
        assert!(is_read_only(&scopes(&["read"])));
        assert!(!is_read_only(&scopes(&[])));
        assert!(!is_read_only(&scopes(&["read", "write"])));
        assert!(!is_read_only(&scopes(&["write"])));
        assert!(!is_read_only(&scopes(&["read", "read"])));
        assert!(!is_read_only(&scopes(&["READ"])));
    }

    #[test]
    fn signer_sets_bearer_and_user_agent() {
        let signer = RequestSigner::new("tok_123").unwrap();
        let request = signer
            .sign(reqwest::Client::new().get("https://api.vantage.sh/v2/me"))
            .build()
            .unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok_123");
        assert_eq!(
            request.headers()[USER_AGENT],
            format!("vantage-mcp-server/{}", VERSION).as_str()
        );
        assert!(!format!("{:?}", signer).contains("tok_123"));
    }

    #[test]
    fn control_characters_in_token_are_unauthenticated() {
        let err = RequestSigner::new("tok\n123").unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn empty_credential_fails_without_network() {
        let upstream = UpstreamClient::new(Logger::new("test"), "http://127.0.0.1:9").unwrap();
        let verifier = CredentialVerifier::new(Logger::new("test"), upstream);
        let err = verifier.verify("   ").await.unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::Unauthenticated);
        assert_eq!(err.message, "No bearer token is configured");
        assert!(err.hint.unwrap().contains(TOKEN_SETTINGS_URL));
    }
}
