//! Interactive confirmation of destructive shell commands.
//!
//! # User Interface
//!
//! ```text
//! ⚠️  POTENTIALLY DESTRUCTIVE COMMAND DETECTED
//! Command: rm -rf build
//! Risk Level: HIGH
//! This command could cause irreversible damage!
//!
//! Do you want to proceed? (yes/no/details):
//! ```
//!
//! For `find ... -name '<pattern>' ... -mtime +N ... -exec rm` commands the
//! user is first offered to move the matches to the trash:
//!
//! ```text
//! SAFER ALTERNATIVE AVAILABLE
//! Choose: (s)afer trash deletion, (p)roceed with original, (c)ancel:
//! ```
//!
//! Ctrl+C or end of input at either prompt is reported as
//! [`ConfirmationError::Interrupted`], which cancels the command.

use async_trait::async_trait;
use colored::Colorize;
use lmagent_application::{ConfirmationError, ConfirmationPort};
use lmagent_domain::{
    AlternativeChoice, CommandBreakdown, ConfirmationReply, ConfirmationRequest, FindDeletePlan,
    RiskTier,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

const CONFIRM_PROMPT: &str = "Do you want to proceed? (yes/no/details): ";
const CONFIRM_RETRY: &str = "Please enter 'yes', 'no', or 'details'";
const CHOICE_PROMPT: &str = "Choose: (s)afer trash deletion, (p)roceed with original, (c)ancel: ";
const CHOICE_RETRY: &str = "Please enter 's' for safer, 'p' to proceed, or 'c' to cancel";

/// Where prompt answers come from
pub trait PromptInput: Send + Sync {
    /// Show `prompt` and read one line.
    fn read_line(&self, prompt: &str) -> rustyline::Result<String>;
}

/// Answers typed at the terminal.
///
/// rustyline keeps the terminal in raw mode while it reads, so Ctrl+C comes
/// back as [`ReadlineError::Interrupted`] instead of a SIGINT.
pub struct TerminalInput;

impl PromptInput for TerminalInput {
    fn read_line(&self, prompt: &str) -> rustyline::Result<String> {
        let mut editor = DefaultEditor::new()?;
        editor.readline(prompt)
    }
}

/// Console adapter for [`ConfirmationPort`].
///
/// Unrecognised answers are re-asked here, so the negotiator only ever sees
/// valid replies.
pub struct ConsoleConfirmation {
    input: Box<dyn PromptInput>,
}

impl ConsoleConfirmation {
    pub fn new() -> Self {
        Self::with_input(TerminalInput)
    }

    pub fn with_input(input: impl PromptInput + 'static) -> Self {
        Self {
            input: Box::new(input),
        }
    }

    fn display_request(&self, request: &ConfirmationRequest) {
        println!();
        println!(
            "{}",
            "⚠️  POTENTIALLY DESTRUCTIVE COMMAND DETECTED".yellow().bold()
        );
        println!("{} {}", "Command:".cyan().bold(), request.command);
        let tier = request.tier.as_str().to_uppercase();
        let tier = match request.tier {
            RiskTier::High => tier.red().bold(),
            RiskTier::Medium => tier.yellow().bold(),
            RiskTier::Low => tier.normal(),
        };
        println!("{} {}", "Risk Level:".cyan().bold(), tier);
        if let Some(warning) = tier_warning(request.tier) {
            println!("{}", warning.yellow());
        }
    }

    /// Read one trimmed answer. Ctrl+C and end of input both cancel.
    fn read_answer(&self, prompt: &str) -> Result<String, ConfirmationError> {
        println!();
        match self.input.read_line(prompt) {
            Ok(line) => Ok(line.trim().to_string()),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", "Operation cancelled.".yellow());
                Err(ConfirmationError::Interrupted)
            }
            Err(e) => Err(ConfirmationError::Io(format!("Failed to read input: {}", e))),
        }
    }
}

impl Default for ConsoleConfirmation {
    fn default() -> Self {
        Self::new()
    }
}

fn tier_warning(tier: RiskTier) -> Option<&'static str> {
    match tier {
        RiskTier::High => Some("This command could cause irreversible damage!"),
        RiskTier::Medium => Some("This command could modify or delete files."),
        RiskTier::Low => None,
    }
}

#[async_trait]
impl ConfirmationPort for ConsoleConfirmation {
    async fn confirm(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<ConfirmationReply, ConfirmationError> {
        self.display_request(request);
        loop {
            let answer = self.read_answer(CONFIRM_PROMPT)?;
            match ConfirmationReply::parse(&answer) {
                Some(reply) => return Ok(reply),
                None => println!("{}", CONFIRM_RETRY),
            }
        }
    }

    async fn choose_alternative(
        &self,
        request: &ConfirmationRequest,
        plan: &FindDeletePlan,
    ) -> Result<AlternativeChoice, ConfirmationError> {
        println!();
        println!("{}", "🔄 SAFER ALTERNATIVE AVAILABLE".green().bold());
        println!("Instead of permanently deleting files, I can move them to trash.");
        println!("{} {}", "Original command:".cyan().bold(), request.command);
        println!("{} {}", "Safer option:".cyan().bold(), plan.summary());
        loop {
            let answer = self.read_answer(CHOICE_PROMPT)?;
            match AlternativeChoice::parse(&answer) {
                Some(choice) => return Ok(choice),
                None => println!("{}", CHOICE_RETRY),
            }
        }
    }

    async fn show_breakdown(&self, breakdown: &CommandBreakdown) {
        println!();
        println!("{}", "Command breakdown:".cyan().bold());
        println!("  Full command: {}", breakdown.command);
        println!("  Risk level:   {}", breakdown.tier);
        for note in breakdown.notes() {
            println!("  - {}", note);
        }
    }
}
