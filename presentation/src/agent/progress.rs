//! Progress reporting while a turn runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lmagent_application::TurnProgress;
use lmagent_domain::{ToolCall, ToolResult};
use std::sync::Mutex;
use std::time::Duration;

/// Shows a "Thinking..." spinner during model requests and one line per
/// tool call.
///
/// The spinner is cleared as soon as the model answers so that a
/// confirmation prompt raised by a tool is never drawn over.
pub struct SpinnerProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn stop(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgress for SpinnerProgress {
    fn on_thinking(&self) {
        self.stop();
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::style());
        pb.set_message("Thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(pb);
        }
    }

    fn on_model_response(&self) {
        self.stop();
    }

    fn on_tool_start(&self, call: &ToolCall) {
        self.stop();
        println!("{}", tool_start_line(call));
    }

    fn on_tool_complete(&self, result: &ToolResult) {
        println!("{}", tool_complete_line(result));
    }

    fn on_interrupted(&self) {
        self.stop();
    }
}

fn tool_start_line(call: &ToolCall) -> String {
    format!(
        "{} {}({})",
        "→".cyan(),
        call.tool_name.bold(),
        call.format_arguments().dimmed()
    )
}

fn tool_complete_line(result: &ToolResult) -> String {
    if result.is_success() {
        format!("  {} {}", "✓".green(), result.tool_name)
    } else if result.is_cancelled() {
        format!("  {} {} cancelled", "✗".yellow(), result.tool_name)
    } else {
        let message = result.error().map(|e| e.message.as_str()).unwrap_or("failed");
        format!("  {} {}: {}", "✗".red(), result.tool_name, message.red())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lmagent_domain::ToolError;

    #[test]
    fn test_tool_lines() {
        colored::control::set_override(false);

        let call = ToolCall::new("read_file").with_arg("path", "notes.txt");
        assert_eq!(tool_start_line(&call), "→ read_file(path=\"notes.txt\")");

        let ok = ToolResult::success("read_file", "hello");
        assert_eq!(tool_complete_line(&ok), "  ✓ read_file");

        let failed = ToolResult::failure("read_file", ToolError::not_found("File notes.txt not found"));
        assert!(tool_complete_line(&failed).contains("not found"));

        let cancelled = ToolResult::failure("terminal", ToolError::cancelled());
        assert_eq!(tool_complete_line(&cancelled), "  ✗ terminal cancelled");
    }

    #[test]
    fn test_spinner_lifecycle() {
        let progress = SpinnerProgress::new();
        progress.on_thinking();
        assert!(progress.spinner.lock().unwrap().is_some());
        progress.on_model_response();
        assert!(progress.spinner.lock().unwrap().is_none());
    }

    #[test]
    fn test_interrupt_clears_spinner() {
        let progress = SpinnerProgress::new();
        progress.on_thinking();
        progress.on_interrupted();
        assert!(progress.spinner.lock().unwrap().is_none());
    }
}
