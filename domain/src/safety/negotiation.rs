//! Confirmation negotiation values
//!
//! A destructive command moves through these states before it runs:
//!
//! ```text
//! Detected ──(find … -exec rm)──▶ SaferAlternativeOffered ──safer──▶ SafeDelete
//!    │                                   │
//!    │                                proceed
//!    ▼                                   ▼
//! ConfirmationPrompt ◀───────────────────┘
//!    ├─ yes     ──▶ Execute
//!    ├─ details ──▶ ConfirmationPrompt (breakdown shown)
//!    └─ no      ──▶ Cancelled
//! ```
//!
//! The loop driving these transitions lives in the application layer; this
//! module only holds the states, the user replies and the plan extraction.

use super::risk::{RiskTier, classify};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static FIND_DELETE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"find\s+(\S+).*?-name\s+["']([^"']+)["'].*?-mtime\s+\+(\d+)"#)
        .expect("find-delete pattern is valid")
});

/// A `find … -exec rm` command reduced to what it selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindDeletePlan {
    pub search_path: String,
    pub name_pattern: String,
    pub older_than_days: u32,
}

impl FindDeletePlan {
    /// Detect a find-then-remove command.
    ///
    /// The command must mention `find`, `rm` and `-exec` and carry a
    /// path, a quoted `-name` pattern and a `-mtime +N` age. Anything else
    /// returns `None` and goes through the plain confirmation prompt.
    pub fn detect(command: &str) -> Option<Self> {
        let lowered = command.to_lowercase();
        if !(lowered.contains("find") && lowered.contains("rm") && lowered.contains("-exec")) {
            return None;
        }
        let caps = FIND_DELETE_RE.captures(command)?;
        Some(Self {
            search_path: caps[1].to_string(),
            name_pattern: caps[2].to_string(),
            older_than_days: caps[3].parse().ok()?,
        })
    }

    /// The `find` expression handed to the safe-delete primitive.
    pub fn find_expression(&self) -> String {
        format!(
            "{} -type f -name '{}' -mtime +{}",
            self.search_path, self.name_pattern, self.older_than_days
        )
    }

    /// Human-readable description of what the plan selects.
    pub fn summary(&self) -> String {
        format!(
            "files matching '{}' under {} older than {} days",
            self.name_pattern, self.search_path, self.older_than_days
        )
    }
}

/// A destructive command awaiting a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub command: String,
    pub tier: RiskTier,
}

impl ConfirmationRequest {
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        let tier = classify(&command);
        Self { command, tier }
    }
}

/// Reply to the yes / no / details prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationReply {
    Yes,
    No,
    Details,
}

impl ConfirmationReply {
    /// Parse user input; `None` means the prompt should be repeated.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "yes" | "y" => Some(Self::Yes),
            "no" | "n" => Some(Self::No),
            "details" | "d" => Some(Self::Details),
            _ => None,
        }
    }
}

/// Reply to the safer-alternative menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlternativeChoice {
    Safer,
    Proceed,
    Cancel,
}

impl AlternativeChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "s" | "safer" | "safe" => Some(Self::Safer),
            "p" | "proceed" | "original" => Some(Self::Proceed),
            "c" | "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Where a command sits in the negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationState {
    Detected,
    SaferAlternativeOffered(FindDeletePlan),
    ConfirmationPrompt,
    Cancelled,
}

impl NegotiationState {
    /// First state for a destructive command.
    pub fn after_detection(command: &str) -> Self {
        match FindDeletePlan::detect(command) {
            Some(plan) => Self::SaferAlternativeOffered(plan),
            None => Self::ConfirmationPrompt,
        }
    }
}

/// How a negotiation ended when the user did not cancel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Run the original command
    Execute,
    /// Move the selected files to the trash instead
    SafeDelete(FindDeletePlan),
}
