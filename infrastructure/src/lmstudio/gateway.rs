//! LM Studio adapter for the [`LlmGateway`] port
//!
//! Chat goes over the server's OpenAI-compatible HTTP endpoint; model
//! listing and server start-up go through the `lms` CLI.

use super::cli::LmsCli;
use super::protocol::{ChatCompletionRequest, ChatCompletionResponse, ErrorResponse};
use async_trait::async_trait;
use lmagent_application::{GatewayError, LlmGateway};
use lmagent_domain::{ChatMessage, LlmResponse, ModelRecord, ToolDefinition};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

/// Generation on a local model can be slow; this bounds a single request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub struct LmStudioGateway {
    client: Client,
    base_url: String,
    cli: Option<LmsCli>,
}

impl LmStudioGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cli: None,
        })
    }

    /// Use `lms` for model listing and server start-up.
    pub fn with_cli(mut self, cli: LmsCli) -> Self {
        self.cli = Some(cli);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn cli(&self) -> Result<&LmsCli, GatewayError> {
        self.cli.as_ref().ok_or_else(|| {
            GatewayError::ConnectionError("LM Studio CLI 'lms' is not available".to_string())
        })
    }
}

fn map_send_error(e: reqwest::Error, url: &str) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout(format!("No response from {}", url))
    } else if e.is_connect() {
        GatewayError::ConnectionError(format!(
            "Cannot reach LM Studio at {}. Is the server running? ({})",
            url, e
        ))
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &str, model: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|r| r.error.message().to_string())
        .unwrap_or_else(|_| body.trim().to_string());

    if status == StatusCode::NOT_FOUND || message.to_lowercase().contains("model not found") {
        GatewayError::ModelNotAvailable(format!("{}: {}", model, message))
    } else {
        GatewayError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), message))
    }
}

#[async_trait]
impl LlmGateway for LmStudioGateway {
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse, GatewayError> {
        let url = self.completions_url();
        let request = ChatCompletionRequest::build(model, messages, tools);
        debug!(
            model = %model,
            messages = request.messages.len(),
            tools = tools.len(),
            "Sending chat completion"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_send_error(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body, model));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        let result = body.into_llm_response()?;
        debug!(
            tool_calls = result.tool_calls().len(),
            stop_reason = ?result.stop_reason,
            "Chat completion received"
        );
        Ok(result)
    }

    async fn list_models(&self) -> Result<Vec<ModelRecord>, GatewayError> {
        self.cli()?.list_models().await
    }

    async fn ensure_ready(&self) -> Result<(), GatewayError> {
        match &self.cli {
            Some(cli) => cli.ensure_server_running().await,
            None => {
                info!(base_url = %self.base_url, "No lms CLI; assuming the server is running");
                Ok(())
            }
        }
    }
}
