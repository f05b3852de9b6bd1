//! Tool domain value objects: immutable result and error types
//!
//! Every tool execution produces a [`ToolResult`]. Failures carry a
//! [`ToolError`] whose code tells the dispatch loop how to react:
//! `CANCELLED` aborts the whole turn, everything else is folded back into
//! the response as text.

use serde::{Deserialize, Serialize};

/// Error that occurred during tool execution.
///
/// | Code | Description |
/// |------|-------------|
/// | `INVALID_ARGUMENT` | Missing or malformed argument |
/// | `NOT_FOUND` | Unknown tool or missing resource |
/// | `EXECUTION_FAILED` | Runtime failure (I/O, spawn error) |
/// | `PERMISSION_DENIED` | Access denied |
/// | `TIMEOUT` | Command exceeded its time limit |
/// | `CANCELLED` | User declined a destructive command |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "CANCELLED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub const CANCELLED: &'static str = "CANCELLED";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Resource not found: {}", resource.into()))
    }

    pub fn permission_denied(resource: impl Into<String>) -> Self {
        Self::new(
            "PERMISSION_DENIED",
            format!("Permission denied: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    /// The message is used verbatim, e.g. "Command 'x' timed out after 30 seconds".
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new("TIMEOUT", message)
    }

    pub fn cancelled() -> Self {
        Self::new(Self::CANCELLED, "Operation cancelled by user")
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == Self::CANCELLED
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution, carrying output or error information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Output content (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// For file operations: the affected path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// For command execution: exit code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// For delete operations: number of files moved to the trash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.metadata.path = Some(path.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// True when the user declined a destructive command
    pub fn is_cancelled(&self) -> bool {
        self.error.as_ref().is_some_and(ToolError::is_cancelled)
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Text folded back into the response: the output on success,
    /// `Tool error: <message>` on failure.
    pub fn display_text(&self) -> String {
        match (&self.output, &self.error) {
            (Some(output), _) if self.success => output.clone(),
            (_, Some(error)) => format!("Tool error: {}", error.message),
            _ => String::new(),
        }
    }
}
