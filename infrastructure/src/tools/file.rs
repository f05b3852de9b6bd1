//! File operation tools: create_file, read_file, write_file, list_files, delete_files

use super::trash::SafeDelete;
use lmagent_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

/// Tool name constants
pub const CREATE_FILE: &str = "create_file";
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const LIST_FILES: &str = "list_files";
pub const DELETE_FILES: &str = "delete_files";

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum entries returned by list_files
const MAX_LIST_ENTRIES: usize = 1000;

pub fn create_file_definition() -> ToolDefinition {
    ToolDefinition::new(CREATE_FILE, "Create new files with content")
        .with_parameter(ToolParameter::new("path", "File path to create", true))
        .with_parameter(ToolParameter::new("content", "Content to write (default: empty)", false))
}

pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(READ_FILE, "Read contents of existing files")
        .with_parameter(ToolParameter::new("path", "File path to read", true))
}

pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(WRITE_FILE, "Write/overwrite file contents")
        .with_parameter(ToolParameter::new("path", "File path to write", true))
        .with_parameter(ToolParameter::new("content", "Content to write", true))
}

pub fn list_files_definition() -> ToolDefinition {
    ToolDefinition::new(LIST_FILES, "List files in directories with optional filtering")
        .with_parameter(ToolParameter::new("path", "Directory to list", true))
        .with_parameter(ToolParameter::new(
            "pattern",
            "Only files whose name matches this pattern (e.g., '*.log'), searched recursively",
            false,
        ))
        .with_parameter(ToolParameter::new(
            "show_hidden",
            "Include hidden entries (true/false)",
            false,
        ))
}

pub fn delete_files_definition() -> ToolDefinition {
    ToolDefinition::new(
        DELETE_FILES,
        "Safely delete files by moving to trash (not permanent deletion)",
    )
    .with_parameter(ToolParameter::new(
        "path_pattern",
        "Path or find expression selecting the files",
        true,
    ))
    .with_parameter(ToolParameter::new(
        "older_than_days",
        "Only files modified more than this many days ago",
        false,
    ))
}

/// Execute the create_file tool. Parent directories are created as needed.
pub fn execute_create_file(call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let path = match call.require("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(CREATE_FILE, ToolError::invalid_argument(e)),
    };
    let content = call.get("content").unwrap_or("");

    if let Err(e) = write_with_parents(Path::new(path), content) {
        return ToolResult::failure(CREATE_FILE, io_error(e, path, "creating file"));
    }

    ToolResult::success(CREATE_FILE, format!("File {} created successfully", path))
        .with_path(path)
        .with_duration(start.elapsed().as_millis() as u64)
}

/// Execute the read_file tool
pub fn execute_read_file(call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let path_str = match call.require("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(READ_FILE, ToolError::invalid_argument(e)),
    };
    let path = Path::new(path_str);

    if !path.exists() {
        return ToolResult::failure(
            READ_FILE,
            ToolError::new("NOT_FOUND", format!("File {} not found", path_str)),
        );
    }
    if !path.is_file() {
        return ToolResult::failure(
            READ_FILE,
            ToolError::invalid_argument(format!("'{}' is not a file", path_str)),
        );
    }

    match fs::metadata(path) {
        Ok(m) if m.len() > MAX_READ_SIZE => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::invalid_argument(format!(
                    "File too large ({} bytes). Maximum size is {} bytes",
                    m.len(),
                    MAX_READ_SIZE
                )),
            );
        }
        Ok(_) => {}
        Err(e) => return ToolResult::failure(READ_FILE, io_error(e, path_str, "reading file")),
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::execution_failed(format!(
                    "Cannot read {}: file appears to be binary",
                    path_str
                )),
            );
        }
        Err(e) => return ToolResult::failure(READ_FILE, io_error(e, path_str, "reading file")),
    };

    let output = if content.is_empty() {
        "File is empty".to_string()
    } else {
        content
    };

    ToolResult::success(READ_FILE, output)
        .with_path(path_str)
        .with_duration(start.elapsed().as_millis() as u64)
}

/// Execute the write_file tool (overwrites existing content)
pub fn execute_write_file(call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let path = match call.require("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e)),
    };
    let content = match call.require("content") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e)),
    };

    if let Err(e) = write_with_parents(Path::new(path), content) {
        return ToolResult::failure(WRITE_FILE, io_error(e, path, "writing to file"));
    }

    ToolResult::success(WRITE_FILE, format!("Content written to {} successfully", path))
        .with_path(path)
        .with_duration(start.elapsed().as_millis() as u64)
}

/// Execute the list_files tool.
///
/// With a pattern, matching files are searched recursively and listed by
/// path. Without one, the directory's entries are listed by name, with a
/// trailing `/` on subdirectories.
pub fn execute_list_files(call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let dir = match call.require("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(LIST_FILES, ToolError::invalid_argument(e)),
    };
    let show_hidden = call.flag("show_hidden");

    if !Path::new(dir).is_dir() {
        return ToolResult::failure(
            LIST_FILES,
            ToolError::new(
                "NOT_FOUND",
                format!("Error listing files: {} is not a directory", dir),
            ),
        );
    }

    let entries = match call.get("pattern").filter(|p| !p.trim().is_empty()) {
        Some(pattern) => find_matching(dir, pattern, show_hidden),
        None => list_dir(dir, show_hidden),
    };

    let mut entries = match entries {
        Ok(e) => e,
        Err(e) => return ToolResult::failure(LIST_FILES, e),
    };

    let truncated = entries.len() > MAX_LIST_ENTRIES;
    entries.truncate(MAX_LIST_ENTRIES);

    let mut output = if entries.is_empty() {
        "No files found".to_string()
    } else {
        entries.join("\n")
    };
    if truncated {
        output.push_str(&format!("\n... (limited to {} entries)", MAX_LIST_ENTRIES));
    }

    let mut result = ToolResult::success(LIST_FILES, output)
        .with_path(dir)
        .with_duration(start.elapsed().as_millis() as u64);
    result.metadata.file_count = Some(entries.len());
    result
}

/// Execute the delete_files tool by moving the selection to the trash
pub async fn execute_delete_files(call: &ToolCall, safe_delete: &SafeDelete) -> ToolResult {
    let start = Instant::now();

    let path_pattern = match call.require("path_pattern") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(DELETE_FILES, ToolError::invalid_argument(e)),
    };

    let older_than = match call.get("older_than_days").map(str::trim) {
        None | Some("") => None,
        Some(days) => match days.parse::<u32>() {
            Ok(0) => None,
            Ok(n) => Some(n),
            Err(_) => {
                return ToolResult::failure(
                    DELETE_FILES,
                    ToolError::invalid_argument(format!(
                        "older_than_days must be a whole number, got '{}'",
                        days
                    )),
                );
            }
        },
    };

    let expression = match older_than {
        Some(days) => format!("{} -type f -mtime +{}", path_pattern, days),
        None => format!("{} -type f", path_pattern),
    };

    match safe_delete.delete_matching(&expression).await {
        Ok(report) => {
            let mut result = ToolResult::success(DELETE_FILES, report.message())
                .with_duration(start.elapsed().as_millis() as u64);
            result.metadata.file_count = Some(report.moved());
            result
        }
        Err(e) => ToolResult::failure(DELETE_FILES, e),
    }
}

fn write_with_parents(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn io_error(e: std::io::Error, path: &str, action: &str) -> ToolError {
    if e.kind() == ErrorKind::PermissionDenied {
        ToolError::permission_denied(path)
    } else {
        ToolError::execution_failed(format!("Error {} {}: {}", action, path, e))
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn list_dir(dir: &str, show_hidden: bool) -> Result<Vec<String>, ToolError> {
    let read = fs::read_dir(dir).map_err(|e| {
        ToolError::execution_failed(format!("Error listing files: {}", e))
    })?;

    let mut names: Vec<String> = read
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if !show_hidden && is_hidden(&name) {
                return None;
            }
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            Some(if is_dir { format!("{}/", name) } else { name })
        })
        .collect();
    names.sort();
    Ok(names)
}

fn find_matching(dir: &str, pattern: &str, show_hidden: bool) -> Result<Vec<String>, ToolError> {
    let full_pattern = format!("{}/**/{}", dir.trim_end_matches('/'), pattern);
    let options = glob::MatchOptions {
        require_literal_leading_dot: !show_hidden,
        ..Default::default()
    };

    let paths = glob::glob_with(&full_pattern, options).map_err(|e| {
        ToolError::invalid_argument(format!("Invalid file pattern '{}': {}", pattern, e))
    })?;

    let mut files: Vec<String> = paths
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .map(|p| p.display().to_string())
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn path_in(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().to_string()
    }

    #[test]
    fn test_create_file_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "nested/deep/new.txt");

        let call = ToolCall::new(CREATE_FILE)
            .with_arg("path", &path)
            .with_arg("content", "hello");
        let result = execute_create_file(&call);

        assert!(result.is_success());
        assert_eq!(result.output(), Some(format!("File {} created successfully", path).as_str()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_create_file_defaults_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "empty.txt");

        let result = execute_create_file(&ToolCall::new(CREATE_FILE).with_arg("path", &path));

        assert!(result.is_success());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "a.txt");
        fs::write(&path, "line 1\nline 2").unwrap();

        let result = execute_read_file(&ToolCall::new(READ_FILE).with_arg("path", &path));

        assert!(result.is_success());
        assert_eq!(result.output(), Some("line 1\nline 2"));
        assert_eq!(result.metadata.path, Some(path));
    }

    #[test]
    fn test_read_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "empty.txt");
        fs::write(&path, "").unwrap();

        let result = execute_read_file(&ToolCall::new(READ_FILE).with_arg("path", &path));
        assert_eq!(result.output(), Some("File is empty"));
    }

    #[test]
    fn test_read_file_not_found() {
        let result = execute_read_file(
            &ToolCall::new(READ_FILE).with_arg("path", "/nonexistent/lmagent.txt"),
        );

        let error = result.error().unwrap();
        assert_eq!(error.code, "NOT_FOUND");
        assert_eq!(error.message, "File /nonexistent/lmagent.txt not found");
    }

    #[test]
    fn test_read_binary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let result = execute_read_file(&ToolCall::new(READ_FILE).with_arg("path", &path));

        assert!(!result.is_success());
        assert!(result.error().unwrap().message.contains("appears to be binary"));
    }

    #[test]
    fn test_write_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "out.txt");
        fs::write(&path, "old").unwrap();

        let call = ToolCall::new(WRITE_FILE)
            .with_arg("path", &path)
            .with_arg("content", "new");
        let result = execute_write_file(&call);

        assert!(result.is_success());
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_file_requires_content() {
        let result = execute_write_file(&ToolCall::new(WRITE_FILE).with_arg("path", "x.txt"));
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_list_files_hides_dotfiles() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let path = dir.path().to_string_lossy().to_string();

        let result = execute_list_files(&ToolCall::new(LIST_FILES).with_arg("path", &path));
        assert_eq!(result.output(), Some("b.txt\nsub/"));

        let result = execute_list_files(
            &ToolCall::new(LIST_FILES)
                .with_arg("path", &path)
                .with_arg("show_hidden", "true"),
        );
        assert_eq!(result.output(), Some(".hidden\nb.txt\nsub/"));
    }

    #[test]
    fn test_list_files_with_pattern_is_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join("top.log"), "").unwrap();
        fs::write(dir.path().join("logs/inner.log"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let path = dir.path().to_string_lossy().to_string();

        let result = execute_list_files(
            &ToolCall::new(LIST_FILES)
                .with_arg("path", &path)
                .with_arg("pattern", "*.log"),
        );

        let output = result.output().unwrap();
        assert!(output.contains("top.log"));
        assert!(output.contains("inner.log"));
        assert!(!output.contains("notes.txt"));
        assert_eq!(result.metadata.file_count, Some(2));
    }

    #[test]
    fn test_list_files_empty_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();

        let result = execute_list_files(&ToolCall::new(LIST_FILES).with_arg("path", &path));
        assert_eq!(result.output(), Some("No files found"));

        let result = execute_list_files(
            &ToolCall::new(LIST_FILES).with_arg("path", "/nonexistent/lmagent-dir"),
        );
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_delete_files_moves_to_trash() {
        use super::super::shell::SystemShell;
        use super::super::trash::TrashConfig;
        use std::sync::Arc;
        use std::time::Duration;

        let src = tempfile::tempdir().unwrap();
        let trash = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.tmp"), "a").unwrap();
        fs::write(src.path().join("b.tmp"), "b").unwrap();

        let safe_delete = SafeDelete::new(
            Arc::new(SystemShell::new()),
            TrashConfig::in_dir(trash.path()),
            Duration::from_secs(10),
        );
        let call = ToolCall::new(DELETE_FILES)
            .with_arg("path_pattern", src.path().to_string_lossy());
        let result = execute_delete_files(&call, &safe_delete).await;

        assert_eq!(result.output(), Some("Moved 2 file(s) to Trash"));
        assert_eq!(result.metadata.file_count, Some(2));
        assert!(trash.path().join("a.tmp").exists());
        assert!(!src.path().join("b.tmp").exists());
    }

    #[tokio::test]
    async fn test_delete_files_rejects_bad_age() {
        use super::super::shell::SystemShell;
        use super::super::trash::TrashConfig;
        use std::sync::Arc;
        use std::time::Duration;

        let safe_delete = SafeDelete::new(
            Arc::new(SystemShell::new()),
            TrashConfig::in_dir(std::env::temp_dir()),
            Duration::from_secs(10),
        );
        let call = ToolCall::new(DELETE_FILES)
            .with_arg("path_pattern", "/tmp")
            .with_arg("older_than_days", "a week");
        let result = execute_delete_files(&call, &safe_delete).await;

        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }
}
