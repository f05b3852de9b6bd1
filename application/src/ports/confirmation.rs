//! Confirmation port for destructive shell commands.
//!
//! # Architecture
//!
//! - **Port**: [`ConfirmationPort`], defined here
//! - **Adapter**: `ConsoleConfirmation` in the presentation layer
//!
//! # Built-in Implementations
//!
//! - [`AutoApproveConfirmation`]: approves every command, preferring the
//!   trash-based alternative when one is offered
//! - [`AutoRejectConfirmation`]: declines every command

use async_trait::async_trait;
use lmagent_domain::{
    AlternativeChoice, CommandBreakdown, ConfirmationReply, ConfirmationRequest, FindDeletePlan,
};
use thiserror::Error;

/// Failures while asking the user, not decisions made by the user.
///
/// The negotiator treats every variant as a cancellation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// End of input or Ctrl+C at the prompt
    #[error("Input interrupted")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(String),
}

/// Port for asking the user about a destructive command.
///
/// Implementations must only return recognised replies; re-prompting on
/// invalid input is their job.
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Ask yes / no / details for `request`.
    async fn confirm(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<ConfirmationReply, ConfirmationError>;

    /// Offer the trash-based alternative for a find-then-remove command.
    async fn choose_alternative(
        &self,
        request: &ConfirmationRequest,
        plan: &FindDeletePlan,
    ) -> Result<AlternativeChoice, ConfirmationError>;

    /// Display the breakdown requested with "details".
    async fn show_breakdown(&self, _breakdown: &CommandBreakdown) {}
}

/// Approves every command without asking.
///
/// # Warning
///
/// Commands run straight on the host shell. Only use this in a throwaway
/// environment.
pub struct AutoApproveConfirmation;

#[async_trait]
impl ConfirmationPort for AutoApproveConfirmation {
    async fn confirm(
        &self,
        _request: &ConfirmationRequest,
    ) -> Result<ConfirmationReply, ConfirmationError> {
        Ok(ConfirmationReply::Yes)
    }

    async fn choose_alternative(
        &self,
        _request: &ConfirmationRequest,
        _plan: &FindDeletePlan,
    ) -> Result<AlternativeChoice, ConfirmationError> {
        Ok(AlternativeChoice::Safer)
    }
}

/// Declines every destructive command. The safest non-interactive mode.
pub struct AutoRejectConfirmation;

#[async_trait]
impl ConfirmationPort for AutoRejectConfirmation {
    async fn confirm(
        &self,
        _request: &ConfirmationRequest,
    ) -> Result<ConfirmationReply, ConfirmationError> {
        Ok(ConfirmationReply::No)
    }

    async fn choose_alternative(
        &self,
        _request: &ConfirmationRequest,
        _plan: &FindDeletePlan,
    ) -> Result<AlternativeChoice, ConfirmationError> {
        Ok(AlternativeChoice::Cancel)
    }
}
