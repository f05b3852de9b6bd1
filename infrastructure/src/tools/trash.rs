//! Trash-based deletion
//!
//! Files selected by a `find` expression are relocated to the user's trash
//! instead of being removed. Used by the `delete_files` tool and by the
//! terminal tool when the user picks the safer alternative to
//! `find … -exec rm`.

use lmagent_application::CommandRunner;
use lmagent_domain::tool::value_objects::ToolError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where trashed files go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashConfig {
    /// Destination directory when no trash utility is used
    pub dir: PathBuf,
    /// `trash` executable to delegate to, when one is installed
    pub utility: Option<PathBuf>,
}

impl TrashConfig {
    /// Platform trash directory, plus a `trash` utility found on `PATH`.
    pub fn detect() -> Self {
        Self {
            dir: default_trash_dir(),
            utility: which::which("trash").ok(),
        }
    }

    /// Always move into `dir`, never delegate.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            utility: None,
        }
    }
}

/// `~/.Trash` on macOS, `~/.local/share/Trash/files` elsewhere
pub fn default_trash_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    if cfg!(target_os = "macos") {
        home.join(".Trash")
    } else {
        home.join(".local").join("share").join("Trash").join("files")
    }
}

/// Outcome of one safe-delete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteReport {
    /// `find` failed or listed nothing
    NoMatches { expression: String },
    /// `moved` of `matched` files reached the trash
    Moved { matched: usize, moved: usize },
}

impl DeleteReport {
    pub fn message(&self) -> String {
        match self {
            DeleteReport::NoMatches { expression } => {
                format!("No files found matching pattern: {}", expression)
            }
            DeleteReport::Moved { moved, .. } => format!("Moved {} file(s) to Trash", moved),
        }
    }

    pub fn moved(&self) -> usize {
        match self {
            DeleteReport::NoMatches { .. } => 0,
            DeleteReport::Moved { moved, .. } => *moved,
        }
    }
}

pub struct SafeDelete {
    runner: Arc<dyn CommandRunner>,
    config: TrashConfig,
    timeout: Duration,
}

impl SafeDelete {
    pub fn new(runner: Arc<dyn CommandRunner>, config: TrashConfig, timeout: Duration) -> Self {
        Self {
            runner,
            config,
            timeout,
        }
    }

    /// Move every file listed by `find <expression>` to the trash.
    ///
    /// Files that cannot be moved are skipped and left out of the count.
    pub async fn delete_matching(&self, expression: &str) -> Result<DeleteReport, ToolError> {
        let find_cmd = format!("find {} 2>/dev/null", expression);
        let output = self
            .runner
            .run(&find_cmd, self.timeout)
            .await
            .map_err(|e| ToolError::execution_failed(format!("Error moving files to trash: {}", e)))?;

        let files: Vec<&str> = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if !output.success() || files.is_empty() {
            debug!(expression = %expression, "Nothing to trash");
            return Ok(DeleteReport::NoMatches {
                expression: expression.to_string(),
            });
        }

        let mut moved = 0;
        for file in &files {
            match self.trash_one(Path::new(file)).await {
                Ok(()) => moved += 1,
                Err(e) => warn!(file = %file, error = %e, "Skipping file that could not be trashed"),
            }
        }

        info!(matched = files.len(), moved, "Moved files to trash");
        Ok(DeleteReport::Moved {
            matched: files.len(),
            moved,
        })
    }

    async fn trash_one(&self, file: &Path) -> io::Result<()> {
        match &self.config.utility {
            Some(utility) => self.delegate(utility, file).await,
            None => move_into(&self.config.dir, file).map(|_| ()),
        }
    }

    async fn delegate(&self, utility: &Path, file: &Path) -> io::Result<()> {
        let cmd = format!(
            "'{}' '{}'",
            utility.display(),
            file.display().to_string().replace('\'', r"'\''")
        );
        let output = self
            .runner
            .run(&cmd, self.timeout)
            .await
            .map_err(|e| io::Error::other(e.to_string()))?;
        if output.success() {
            Ok(())
        } else {
            Err(io::Error::other(output.summary()))
        }
    }
}

/// Move `file` into `dir`, returning where it landed.
///
/// An existing name becomes `<stem>_<n><ext>` with the first free `n`.
/// A cross-device move falls back to copy then remove.
pub fn move_into(dir: &Path, file: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let name = file
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let target = free_name(dir, Path::new(name));

    if fs::rename(file, &target).is_err() {
        fs::copy(file, &target)?;
        if let Err(e) = fs::remove_file(file) {
            let _ = fs::remove_file(&target);
            return Err(e);
        }
    }
    Ok(target)
}

fn free_name(dir: &Path, name: &Path) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let candidate = dir.join(format!("{}_{}{}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::tools::shell::SystemShell;

    fn safe_delete(trash: &Path) -> SafeDelete {
        SafeDelete::new(
            Arc::new(SystemShell::new()),
            TrashConfig::in_dir(trash),
            Duration::from_secs(10),
        )
    }

    #[test]
    fn test_move_into_renames_on_collision() {
        let src = tempfile::tempdir().unwrap();
        let trash = tempfile::tempdir().unwrap();
        fs::write(trash.path().join("a.log"), "old").unwrap();
        fs::write(trash.path().join("a_1.log"), "older").unwrap();
        let file = src.path().join("a.log");
        fs::write(&file, "new").unwrap();

        let target = move_into(trash.path(), &file).unwrap();

        assert_eq!(target, trash.path().join("a_2.log"));
        assert!(!file.exists());
        assert_eq!(fs::read_to_string(target).unwrap(), "new");
    }

    #[test]
    fn test_move_into_without_extension() {
        let src = tempfile::tempdir().unwrap();
        let trash = tempfile::tempdir().unwrap();
        fs::write(trash.path().join("notes"), "old").unwrap();
        let file = src.path().join("notes");
        fs::write(&file, "new").unwrap();

        let target = move_into(trash.path(), &file).unwrap();
        assert_eq!(target, trash.path().join("notes_1"));
    }

    #[test]
    fn test_move_into_creates_trash_dir() {
        let src = tempfile::tempdir().unwrap();
        let base = tempfile::tempdir().unwrap();
        let trash = base.path().join("Trash").join("files");
        let file = src.path().join("x.txt");
        fs::write(&file, "x").unwrap();

        move_into(&trash, &file).unwrap();
        assert!(trash.join("x.txt").exists());
    }

    #[tokio::test]
    async fn test_delete_matching_moves_files() {
        let src = tempfile::tempdir().unwrap();
        let trash = tempfile::tempdir().unwrap();
        fs::write(src.path().join("one.log"), "1").unwrap();
        fs::write(src.path().join("two.log"), "2").unwrap();
        fs::write(src.path().join("keep.txt"), "k").unwrap();

        let expr = format!("'{}' -type f -name '*.log'", src.path().display());
        let report = safe_delete(trash.path())
            .delete_matching(&expr)
            .await
            .unwrap();

        assert_eq!(report, DeleteReport::Moved { matched: 2, moved: 2 });
        assert_eq!(report.message(), "Moved 2 file(s) to Trash");
        assert!(!src.path().join("one.log").exists());
        assert!(src.path().join("keep.txt").exists());
        assert!(trash.path().join("one.log").exists());
        assert!(trash.path().join("two.log").exists());
    }

    #[tokio::test]
    async fn test_delete_matching_single_file() {
        let src = tempfile::tempdir().unwrap();
        let trash = tempfile::tempdir().unwrap();
        let file = src.path().join("old.log");
        fs::write(&file, "stale").unwrap();

        let expr = format!("'{}' -type f", file.display());
        let report = safe_delete(trash.path())
            .delete_matching(&expr)
            .await
            .unwrap();

        assert_eq!(report.message(), "Moved 1 file(s) to Trash");
        assert!(!file.exists());
        assert_eq!(
            fs::read_to_string(trash.path().join("old.log")).unwrap(),
            "stale"
        );
    }

    #[tokio::test]
    async fn test_delete_matching_no_matches() {
        let src = tempfile::tempdir().unwrap();
        let trash = tempfile::tempdir().unwrap();

        let expr = format!("'{}' -type f -name '*.log'", src.path().display());
        let report = safe_delete(trash.path())
            .delete_matching(&expr)
            .await
            .unwrap();

        assert_eq!(report.moved(), 0);
        assert_eq!(
            report.message(),
            format!("No files found matching pattern: {}", expr)
        );
    }

    #[tokio::test]
    async fn test_delete_matching_missing_path() {
        let trash = tempfile::tempdir().unwrap();
        let report = safe_delete(trash.path())
            .delete_matching("/nonexistent/lmagent-test -type f")
            .await
            .unwrap();

        assert!(matches!(report, DeleteReport::NoMatches { .. }));
    }

    #[tokio::test]
    async fn test_delete_matching_respects_age() {
        let src = tempfile::tempdir().unwrap();
        let trash = tempfile::tempdir().unwrap();
        fs::write(src.path().join("fresh.log"), "new").unwrap();

        let expr = format!("'{}' -type f -name '*.log' -mtime +7", src.path().display());
        let report = safe_delete(trash.path())
            .delete_matching(&expr)
            .await
            .unwrap();

        assert!(matches!(report, DeleteReport::NoMatches { .. }));
        assert!(src.path().join("fresh.log").exists());
    }
}
