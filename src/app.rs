use crate::errors::ToolError;
use crate::managers;
use crate::mcp::catalog::{check_catalog, tool_catalog};
use crate::services::credential::CredentialVerifier;
use crate::services::gateway::{ToolGateway, ToolHandler};
use crate::services::logger::Logger;
use crate::services::settings::Settings;
use crate::services::upstream::UpstreamClient;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub settings: Settings,
    pub gateway: Arc<ToolGateway>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        let mut uncatalogued: Vec<String> = handlers
            .keys()
            .filter(|name| !tool_catalog().iter().any(|tool| &tool.name == *name))
            .cloned()
            .collect();
        if missing.is_empty() && uncatalogued.is_empty() {
            return Ok(());
        }
        missing.sort();
        uncatalogued.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint(
                "Every tool in tool_catalog.json needs an endpoint adapter and every adapter a catalog entry.",
            )
            .with_details(serde_json::json!({
                "missing_handlers": missing,
                "missing_catalog_entries": uncatalogued,
            })))
    }

    /// Builds the process-wide state. The credential is verified here, once;
    /// a rejected credential does not stop startup.
    pub async fn initialize(settings: Settings) -> Result<Self, ToolError> {
        let logger = match &settings.log_file {
            Some(path) => Logger::with_file("vantage", path)?,
            None => Logger::new("vantage"),
        };
        check_catalog()?;

        let upstream = UpstreamClient::new(logger.clone(), &settings.api_host)?;
        let handlers = managers::build_handlers(&upstream, &logger);
        Self::validate_tool_wiring(&handlers)?;

        let verifier = CredentialVerifier::new(logger.clone(), upstream);
        let credential = verifier.verify(&settings.bearer_token).await;

        let mut gateway = ToolGateway::new(logger.clone(), credential);
        for tool in tool_catalog() {
            if let Some(handler) = handlers.get(&tool.name) {
                gateway.register(tool.name.clone(), tool.description.clone(), handler.clone());
            }
        }
        logger.info(
            "Server initialized",
            Some(&serde_json::json!({
                "settings": format!("{:?}", settings),
                "credential_configured": settings.has_credential(),
                "tools": gateway.tool_names().len(),
            })),
        );
        Ok(Self::from_parts(logger, settings, gateway))
    }

    pub fn from_parts(logger: Logger, settings: Settings, gateway: ToolGateway) -> Self {
        Self {
            logger,
            settings,
            gateway: Arc::new(gateway),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::upstream::UpstreamClient;

    #[test]
    fn every_catalog_tool_has_an_adapter() {
        let upstream = UpstreamClient::new(Logger::new("test"), "https://api.vantage.sh").unwrap();
        let handlers = managers::build_handlers(&upstream, &Logger::new("test"));
        App::validate_tool_wiring(&handlers).expect("wiring must be complete");
        assert_eq!(handlers.len(), tool_catalog().len());
    }

    #[test]
    fn missing_adapter_is_reported() {
        let upstream = UpstreamClient::new(Logger::new("test"), "https://api.vantage.sh").unwrap();
        let mut handlers = managers::build_handlers(&upstream, &Logger::new("test"));
        handlers.remove("list-budgets");
        let err = App::validate_tool_wiring(&handlers).unwrap_err();
        assert_eq!(err.details.unwrap()["missing_handlers"][0], "list-budgets");
    }

    #[tokio::test]
    async fn starts_without_credential() {
        let app = App::initialize(Settings::new("", "http://127.0.0.1:9"))
            .await
            .expect("startup must not require a token");
        assert!(app.gateway.credential().is_err());
        assert!(app.gateway.contains("get-myself"));
    }
}
