//! LLM Gateway port
//!
//! Defines the interface for talking to the local model runtime: chat with
//! optional tool definitions, model listing and capability lookup.

use async_trait::async_trait;
use lmagent_domain::{ChatMessage, LlmResponse, ModelRecord, ToolDefinition};
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("No LLM models available. Download one with `lms get` first")]
    NoModels,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for model runtime communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a conversation and get one response.
    ///
    /// With a non-empty `tools` slice the runtime may answer with tool use
    /// blocks instead of (or in addition to) text.
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse, GatewayError>;

    /// All models the runtime knows about
    async fn list_models(&self) -> Result<Vec<ModelRecord>, GatewayError>;

    /// Metadata for one model
    async fn model_info(&self, model_key: &str) -> Result<ModelRecord, GatewayError> {
        self.list_models()
            .await?
            .into_iter()
            .find(|m| m.model_key == model_key)
            .ok_or_else(|| GatewayError::ModelNotAvailable(model_key.to_string()))
    }

    /// Make sure the runtime is up before the first request.
    async fn ensure_ready(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}
