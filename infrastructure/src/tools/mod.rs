//! Tool implementations for the agent
//!
//! Concrete tools the agent uses to work on the local machine: shell
//! commands behind a confirmation step, file operations, trash-based
//! deletion and a web search placeholder.

pub mod command;
pub mod file;
pub mod shell;
pub mod trash;
pub mod web_search;

mod executor;

pub use executor::LocalToolExecutor;
pub use shell::SystemShell;
pub use trash::{DeleteReport, SafeDelete, TrashConfig};

use lmagent_domain::ToolEntry;
use lmagent_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Definition of a builtin tool, with its parameters, by name
pub fn builtin_definition(name: &str) -> Option<ToolDefinition> {
    match name {
        command::TERMINAL => Some(command::terminal_definition()),
        file::CREATE_FILE => Some(file::create_file_definition()),
        file::READ_FILE => Some(file::read_file_definition()),
        file::WRITE_FILE => Some(file::write_file_definition()),
        file::DELETE_FILES => Some(file::delete_files_definition()),
        file::LIST_FILES => Some(file::list_files_definition()),
        web_search::WEB_SEARCH => Some(web_search::web_search_definition()),
        _ => None,
    }
}

/// Build the session's tool specification from configured entries.
///
/// Configured descriptions replace the builtin ones; unknown names are
/// skipped (configuration validation rejects them earlier).
pub fn tool_spec_from_entries(entries: &[ToolEntry]) -> ToolSpec {
    entries.iter().fold(ToolSpec::new(), |spec, entry| {
        match builtin_definition(&entry.name) {
            Some(def) if entry.description.trim().is_empty() => spec.register(def),
            Some(def) => spec.register(def.with_description(&entry.description)),
            None => {
                tracing::warn!(tool = %entry.name, "Skipping unknown tool");
                spec
            }
        }
    })
}

/// All builtin tools with their default descriptions
pub fn default_tool_spec() -> ToolSpec {
    tool_spec_from_entries(&lmagent_domain::agent::default_tools())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lmagent_domain::agent::config::BUILTIN_TOOL_NAMES;

    #[test]
    fn test_every_builtin_has_a_definition() {
        for name in BUILTIN_TOOL_NAMES {
            let def = builtin_definition(name).unwrap();
            assert_eq!(def.name, *name);
            assert!(def.required_parameters().count() >= 1);
        }
        assert!(builtin_definition("rm_everything").is_none());
    }

    #[test]
    fn test_tool_spec_from_entries() {
        let entries = vec![
            ToolEntry::new("read_file", "Read a file for me"),
            ToolEntry::new("terminal", ""),
            ToolEntry::new("not_a_tool", "ignored"),
        ];
        let spec = tool_spec_from_entries(&entries);

        assert_eq!(spec.names().collect::<Vec<_>>(), vec!["read_file", "terminal"]);
        let read = spec.get("read_file").unwrap();
        assert_eq!(read.description, "Read a file for me");
        assert_eq!(read.parameters.len(), 1);
        assert!(
            spec.get("terminal")
                .unwrap()
                .description
                .starts_with("Execute terminal/shell commands")
        );
    }

    #[test]
    fn test_default_tool_spec() {
        assert_eq!(default_tool_spec().len(), BUILTIN_TOOL_NAMES.len());
    }
}
