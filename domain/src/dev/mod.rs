//! Development-mode observability: token estimates, context growth and
//! tool call history, queried through `!` commands.

pub mod command;
pub mod tracker;

pub use command::DevCommand;
pub use tracker::{
    ContextGrowth, ContextStats, GrowthTrend, SessionSummary, SessionTracker, TokenSummary,
    ToolCallLog, ToolUsage, estimate_tokens,
};
