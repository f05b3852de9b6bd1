//! Console output for the agent shell

use colored::Colorize;
use lmagent_application::DevReport;
use lmagent_domain::dev::{ContextGrowth, SessionSummary, TokenSummary};
use lmagent_domain::{DevCommand, MemoryStats, ModelRecord, ToolCallingMode};
use std::time::Duration;

/// What the startup banner shows
pub struct SessionInfo<'a> {
    pub model: &'a str,
    pub mode: ToolCallingMode,
    pub tools: &'a [String],
    pub dev_mode: bool,
    pub memory: &'a MemoryStats,
}

/// Formats agent output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Welcome box plus session details
    pub fn banner(info: &SessionInfo<'_>) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{}\n",
            "╭─────────────────────────────────────────────────╮".cyan()
        ));
        output.push_str(&format!(
            "{}\n",
            "│              lmagent - Agent Shell              │"
                .cyan()
                .bold()
        ));
        output.push_str(&format!(
            "{}\n\n",
            "╰─────────────────────────────────────────────────╯".cyan()
        ));

        output.push_str(&format!(
            "{} {} ({} tool calling)\n",
            "Model:".cyan().bold(),
            info.model,
            info.mode.as_str()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Tools:".cyan().bold(),
            info.tools.join(", ")
        ));
        output.push_str(&format!(
            "{} {} ({} facts remembered)\n",
            "Memory:".cyan().bold(),
            info.memory.long_term_path,
            info.memory.long_term_entries
        ));

        if info.dev_mode {
            output.push_str(&format!("\n{}\n", "🔧 DEV MODE ENABLED".yellow().bold()));
            output.push_str("   - Token tracking active\n");
            output.push_str("   - Tool call monitoring active\n");
            output.push_str("   - Dev commands enabled (!tokens, !memory, !stats, !clear, !forget, !help)\n");
        }

        output.push_str("\nType 'quit' or 'exit' to stop.\n");
        output.push_str("Type your message and press Enter.\n");
        output
    }

    /// Numbered model listing for `--list-models`
    pub fn model_list(models: &[ModelRecord]) -> String {
        let mut output = format!("{}\n", "Available LLM Models:".cyan().bold());
        if models.is_empty() {
            output.push_str("  (none)\n");
        }
        for (i, model) in models.iter().enumerate() {
            let tools = match model.calling_mode() {
                ToolCallingMode::Native => "native tools",
                ToolCallingMode::PromptBased => "prompt-based tools",
            };
            output.push_str(&format!(
                "{}. {} ({}) [{}]\n",
                i + 1,
                model.label(),
                model.model_key,
                tools
            ));
        }
        output
    }

    pub fn response(text: &str) -> String {
        format!("\n{} {}", "Agent Response:".green().bold(), text)
    }

    pub fn cancelled() -> String {
        "Operation cancelled by user.".yellow().to_string()
    }

    pub fn error(message: &str) -> String {
        format!("{} {}", "Agent error:".red().bold(), message)
    }

    /// Render the answer to a `!` command
    pub fn dev_report(report: &DevReport) -> String {
        match report {
            DevReport::Tokens(summary) => Self::tokens(summary),
            DevReport::Memory {
                stats,
                short_term_tokens,
                long_term_tokens,
            } => Self::memory(stats, *short_term_tokens, *long_term_tokens),
            DevReport::Stats(summary) => Self::stats(summary),
            DevReport::Cleared => format!("{}\n", "Short-term memory cleared.".green()),
            DevReport::Forgotten => format!("{}\n", "Long-term memory cleared.".green()),
            DevReport::Help => Self::help(),
            DevReport::Unknown(command) => format!(
                "{} {}\nType !help for available commands.\n",
                "Unknown dev command:".yellow(),
                command
            ),
        }
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("── {} ──", title).cyan().bold())
    }

    fn tokens(summary: &TokenSummary) -> String {
        let mut output = Self::section_header("Token Usage");
        output.push_str(&format!("  Requests:          {}\n", summary.total_requests));
        output.push_str(&format!(
            "  Estimated tokens:  {}\n",
            summary.total_estimated_tokens
        ));
        output.push_str(&format!(
            "  Average/request:   {:.1}\n",
            summary.average_tokens_per_request
        ));
        output.push_str(&format!(
            "  Session duration:  {}\n",
            format_duration(summary.session_duration)
        ));

        if let Some(last) = &summary.last_request {
            output.push_str("\n  Last request:\n");
            output.push_str(&format!("    User input:      {} chars\n", last.user_input_chars));
            output.push_str(&format!(
                "    Memory context:  {} chars\n",
                last.memory_context_chars
            ));
            output.push_str(&format!(
                "    Total:           {} chars (~{} tokens)\n",
                last.total_chars, last.estimated_tokens
            ));
        }

        match &summary.growth {
            Some(growth) => output.push_str(&Self::growth(growth)),
            None => output.push_str("\n  Context growth:    insufficient data\n"),
        }
        output
    }

    fn growth(growth: &ContextGrowth) -> String {
        format!(
            "\n  Context growth:    {} ({:+.1} chars/request)\n  Current size:      {} chars\n  Peak size:         {} chars\n",
            growth.trend.as_str(),
            growth.average_growth,
            growth.current_size,
            growth.peak_size
        )
    }

    fn memory(stats: &MemoryStats, short_term_tokens: usize, long_term_tokens: usize) -> String {
        let mut output = Self::section_header("Memory");
        output.push_str(&format!(
            "  Short-term:  {}/{} chars ({:.1}%, ~{} tokens)\n",
            stats.short_term_size, stats.short_term_cap, stats.usage_pct, short_term_tokens
        ));
        output.push_str(&format!(
            "  Long-term:   {} entries (~{} tokens)\n",
            stats.long_term_entries, long_term_tokens
        ));
        let status = if stats.file_exists { "exists" } else { "not yet written" };
        output.push_str(&format!(
            "  File:        {} ({})\n",
            stats.long_term_path, status
        ));
        output
    }

    fn stats(summary: &SessionSummary) -> String {
        let mut output = Self::section_header("Session Statistics");
        output.push_str(&format!(
            "  Duration:    {}\n",
            format_duration(summary.session_duration)
        ));
        output.push_str(&format!("  Requests:    {}\n", summary.total_requests));
        output.push_str(&format!(
            "  Tool calls:  {} ({} ok, {} failed, {:.0}% success)\n",
            summary.total_tool_calls,
            summary.successful_tool_calls,
            summary.failed_tool_calls,
            summary.success_rate * 100.0
        ));

        if !summary.tool_usage.is_empty() {
            output.push_str("\n  By tool:\n");
            for (name, usage) in &summary.tool_usage {
                output.push_str(&format!(
                    "    {:<14} {} calls, {} ok, {} failed\n",
                    name, usage.calls, usage.successes, usage.failures
                ));
            }
        }

        if !summary.recent_tool_calls.is_empty() {
            output.push_str("\n  Recent calls:\n");
            for log in &summary.recent_tool_calls {
                let mark = if log.success { "✓".green() } else { "✗".red() };
                output.push_str(&format!("    {} {}({})\n", mark, log.tool_name, log.arguments));
                if let Some(error) = &log.error {
                    output.push_str(&format!("      {}\n", error.red()));
                }
            }
        }
        output
    }

    fn help() -> String {
        let mut output = Self::section_header("Dev Commands");
        for (name, description) in DevCommand::help_entries() {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:<10}", name).yellow(),
                description
            ));
        }
        output
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
