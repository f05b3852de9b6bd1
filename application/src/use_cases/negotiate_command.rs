//! Confirmation negotiation for destructive shell commands
//!
//! Drives a command through [`NegotiationState`] until it resolves to
//! running the original command, moving files to the trash instead, or a
//! cancellation.

use crate::ports::confirmation::ConfirmationPort;
use lmagent_domain::safety::{
    AlternativeChoice, CommandBreakdown, ConfirmationReply, ConfirmationRequest, NegotiationState,
    Resolution, is_destructive,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    /// Declined, cancelled, or input was interrupted
    #[error("Operation cancelled by user")]
    Cancelled,
}

pub struct ConfirmationNegotiator {
    port: Arc<dyn ConfirmationPort>,
}

impl ConfirmationNegotiator {
    pub fn new(port: Arc<dyn ConfirmationPort>) -> Self {
        Self { port }
    }

    /// Decide what to do with `command`.
    ///
    /// Non-destructive commands resolve to [`Resolution::Execute`] without
    /// any prompt.
    pub async fn negotiate(&self, command: &str) -> Result<Resolution, NegotiationError> {
        if !is_destructive(command) {
            return Ok(Resolution::Execute);
        }

        let request = ConfirmationRequest::new(command);
        info!(command = %command, tier = %request.tier, "Destructive command detected");

        let mut state = NegotiationState::Detected;
        loop {
            debug!(?state, "Negotiation step");
            state = match state {
                NegotiationState::Detected => NegotiationState::after_detection(command),

                NegotiationState::SaferAlternativeOffered(plan) => {
                    match self.port.choose_alternative(&request, &plan).await {
                        Ok(AlternativeChoice::Safer) => {
                            info!(expression = %plan.find_expression(), "Using trash instead of rm");
                            return Ok(Resolution::SafeDelete(plan));
                        }
                        Ok(AlternativeChoice::Proceed) => NegotiationState::ConfirmationPrompt,
                        Ok(AlternativeChoice::Cancel) => NegotiationState::Cancelled,
                        Err(e) => {
                            warn!(error = %e, "Alternative prompt interrupted");
                            NegotiationState::Cancelled
                        }
                    }
                }

                NegotiationState::ConfirmationPrompt => match self.port.confirm(&request).await {
                    Ok(ConfirmationReply::Yes) => {
                        info!(command = %command, "Destructive command confirmed");
                        return Ok(Resolution::Execute);
                    }
                    Ok(ConfirmationReply::Details) => {
                        self.port
                            .show_breakdown(&CommandBreakdown::of(command))
                            .await;
                        NegotiationState::ConfirmationPrompt
                    }
                    Ok(ConfirmationReply::No) => NegotiationState::Cancelled,
                    Err(e) => {
                        warn!(error = %e, "Confirmation prompt interrupted");
                        NegotiationState::Cancelled
                    }
                },

                NegotiationState::Cancelled => {
                    info!(command = %command, "Destructive command cancelled");
                    return Err(NegotiationError::Cancelled);
                }
            };
        }
    }
}
