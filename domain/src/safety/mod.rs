//! Command safety: risk classification and confirmation negotiation.
//!
//! - [`risk`]: pattern tables deciding whether a shell command is
//!   destructive and how risky it is
//! - [`negotiation`]: the states and user replies of the confirmation flow,
//!   plus detection of find-then-remove commands that have a trash-based
//!   alternative

pub mod negotiation;
pub mod risk;

pub use negotiation::{
    AlternativeChoice, ConfirmationReply, ConfirmationRequest, FindDeletePlan, NegotiationState,
    Resolution,
};
pub use risk::{CommandBreakdown, RiskTier, classify, is_destructive};
