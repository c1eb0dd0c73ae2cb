//! Plain JSON translation endpoint.

use std::time::Duration;

use ureq::{Agent, AgentBuilder};

use crate::{BridgeError, TranslationRequest, TranslationResponse, Translator};

/// POSTs the [`TranslationRequest`] as JSON and expects a
/// [`TranslationResponse`] back.
pub struct HttpTranslator {
    agent: Agent,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        HttpTranslator {
            agent: AgentBuilder::new().timeout(timeout).build(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Send `Authorization: Bearer <key>` with every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

impl Translator for HttpTranslator {
    #[tracing::instrument(level = "debug", skip_all, fields(endpoint = %self.endpoint, statements = request.statements.len()))]
    fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, BridgeError> {
        let mut call = self.agent.post(&self.endpoint);
        if let Some(key) = &self.api_key {
            call = call.set("Authorization", &format!("Bearer {key}"));
        }
        let response = call.send_json(request)?;
        response
            .into_json::<TranslationResponse>()
            .map_err(|err| BridgeError::Protocol(err.to_string()))
    }
}
