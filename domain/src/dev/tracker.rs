//! Development-mode session tracker
//!
//! Records per-request context sizes and every tool call so the `!tokens`
//! and `!stats` commands can report on the running session. Token counts
//! are estimates (four characters per token).

use crate::memory::{LongTermMemory, ShortTermMemory};
use crate::tool::ToolCall;
use crate::util::preview;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

const CHARS_PER_TOKEN: usize = 4;
const PREVIEW_CHARS: usize = 200;
const GROWTH_WINDOW: usize = 5;
const GROWTH_THRESHOLD: f64 = 50.0;

/// Rough token estimate; at least one token for non-empty text.
pub fn estimate_tokens(text: &str) -> usize {
    let chars = text.chars().count();
    if chars == 0 {
        0
    } else {
        (chars / CHARS_PER_TOKEN).max(1)
    }
}

/// Size breakdown of one prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextStats {
    pub user_input_chars: usize,
    pub memory_context_chars: usize,
    pub short_term_chars: usize,
    pub long_term_chars: usize,
    pub total_chars: usize,
    pub estimated_tokens: usize,
}

impl ContextStats {
    pub fn analyze(
        user_input: &str,
        memory_context: &str,
        short_term: &ShortTermMemory,
        long_term: &LongTermMemory,
    ) -> Self {
        let long_term_chars = if long_term.is_empty() {
            0
        } else {
            long_term.to_compact_json().chars().count()
        };
        let user_input_chars = user_input.chars().count();
        let memory_context_chars = memory_context.chars().count();
        let total_chars = user_input_chars + memory_context_chars;
        Self {
            user_input_chars,
            memory_context_chars,
            short_term_chars: short_term.len(),
            long_term_chars,
            total_chars,
            estimated_tokens: estimate_tokens(&format!("{}{}", user_input, memory_context)),
        }
    }
}

/// One executed tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallLog {
    pub tool_name: String,
    pub arguments: String,
    pub result_preview: String,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthTrend {
    Growing,
    Stable,
    Shrinking,
}

impl GrowthTrend {
    pub fn as_str(&self) -> &str {
        match self {
            GrowthTrend::Growing => "growing",
            GrowthTrend::Stable => "stable",
            GrowthTrend::Shrinking => "shrinking",
        }
    }
}

/// Context growth over the most recent requests
#[derive(Debug, Clone, PartialEq)]
pub struct ContextGrowth {
    pub trend: GrowthTrend,
    pub average_growth: f64,
    pub current_size: usize,
    pub peak_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolUsage {
    pub calls: usize,
    pub successes: usize,
    pub failures: usize,
}

/// Answer to `!tokens`
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSummary {
    pub total_requests: usize,
    pub total_estimated_tokens: usize,
    pub average_tokens_per_request: f64,
    pub session_duration: Duration,
    pub last_request: Option<ContextStats>,
    pub growth: Option<ContextGrowth>,
}

/// Answer to `!stats`
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub session_duration: Duration,
    pub total_requests: usize,
    pub total_tool_calls: usize,
    pub successful_tool_calls: usize,
    pub failed_tool_calls: usize,
    pub success_rate: f64,
    pub tool_usage: BTreeMap<String, ToolUsage>,
    pub recent_tool_calls: Vec<ToolCallLog>,
}

#[derive(Debug, Clone)]
pub struct SessionTracker {
    started: Instant,
    requests: Vec<ContextStats>,
    tool_calls: Vec<ToolCallLog>,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            requests: Vec::new(),
            tool_calls: Vec::new(),
        }
    }

    pub fn record_request(&mut self, stats: ContextStats) {
        self.requests.push(stats);
    }

    pub fn record_tool_call(&mut self, call: &ToolCall, output: &str, error: Option<&str>) {
        self.tool_calls.push(ToolCallLog {
            tool_name: call.tool_name.clone(),
            arguments: call.format_arguments(),
            result_preview: preview(output, PREVIEW_CHARS),
            success: error.is_none(),
            error: error.map(str::to_string),
        });
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    pub fn tool_calls(&self) -> &[ToolCallLog] {
        &self.tool_calls
    }

    pub fn session_duration(&self) -> Duration {
        self.started.elapsed()
    }

    /// `None` until at least two requests have been recorded.
    pub fn context_growth(&self) -> Option<ContextGrowth> {
        if self.requests.len() < 2 {
            return None;
        }
        let window = &self.requests[self.requests.len().saturating_sub(GROWTH_WINDOW)..];
        let deltas: Vec<f64> = window
            .windows(2)
            .map(|pair| pair[1].total_chars as f64 - pair[0].total_chars as f64)
            .collect();
        let average_growth = deltas.iter().sum::<f64>() / deltas.len() as f64;
        let trend = if average_growth > GROWTH_THRESHOLD {
            GrowthTrend::Growing
        } else if average_growth > -GROWTH_THRESHOLD {
            GrowthTrend::Stable
        } else {
            GrowthTrend::Shrinking
        };
        Some(ContextGrowth {
            trend,
            average_growth,
            current_size: window.last().map(|s| s.total_chars).unwrap_or(0),
            peak_size: self.requests.iter().map(|s| s.total_chars).max().unwrap_or(0),
        })
    }

    pub fn token_summary(&self) -> TokenSummary {
        let total: usize = self.requests.iter().map(|s| s.estimated_tokens).sum();
        TokenSummary {
            total_requests: self.requests.len(),
            total_estimated_tokens: total,
            average_tokens_per_request: total as f64 / self.requests.len().max(1) as f64,
            session_duration: self.session_duration(),
            last_request: self.requests.last().cloned(),
            growth: self.context_growth(),
        }
    }

    pub fn session_summary(&self) -> SessionSummary {
        let mut tool_usage: BTreeMap<String, ToolUsage> = BTreeMap::new();
        for log in &self.tool_calls {
            let usage = tool_usage.entry(log.tool_name.clone()).or_default();
            usage.calls += 1;
            if log.success {
                usage.successes += 1;
            } else {
                usage.failures += 1;
            }
        }
        let successful = self.tool_calls.iter().filter(|l| l.success).count();
        let total = self.tool_calls.len();
        SessionSummary {
            session_duration: self.session_duration(),
            total_requests: self.requests.len(),
            total_tool_calls: total,
            successful_tool_calls: successful,
            failed_tool_calls: total - successful,
            success_rate: successful as f64 / total.max(1) as f64,
            tool_usage,
            recent_tool_calls: self.tool_calls.iter().rev().take(5).cloned().collect(),
        }
    }
}
