//! Configuration loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Prefix of environment variables that override configuration keys
pub const ENV_PREFIX: &str = "LMAGENT_";

/// Project-level files, lowest priority first
const PROJECT_FILES: &[&str] = &["config.json", "lmagent.toml"];

/// Configuration loader that handles file discovery and merging.
///
/// Priority (lowest to highest):
/// 1. Built-in defaults
/// 2. Global: `$XDG_CONFIG_HOME/lmagent/config.toml` (or platform equivalent)
/// 3. Project: `./config.json`, then `./lmagent.toml`
/// 4. Explicit `--config <path>` (JSON or TOML by extension)
/// 5. `LMAGENT_*` environment variables
///
/// Command line flags are applied on top by the binary.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    global: Option<PathBuf>,
    project_dir: PathBuf,
    explicit: Option<PathBuf>,
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            global: Self::global_config_path(),
            project_dir: PathBuf::from("."),
            explicit: None,
            use_env: true,
        }
    }

    pub fn with_explicit(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.explicit = path.map(Into::into);
        self
    }

    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    pub fn with_global(mut self, path: Option<PathBuf>) -> Self {
        self.global = path;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load configuration from all sources with proper priority
    pub fn load(&self) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(path) = &self.explicit
            && !path.is_file()
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }
        self.figment().extract().map_err(Box::new)
    }

    fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global) = &self.global
            && global.exists()
        {
            figment = figment.merge(Toml::file_exact(global));
        }

        for path in self.project_paths() {
            if path.exists() {
                figment = merge_file(figment, &path);
            }
        }

        if let Some(path) = &self.explicit {
            figment = merge_file(figment, path);
        }

        if self.use_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX));
        }
        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns `<config dir>/lmagent/config.toml`, where the config dir is
    /// `$XDG_CONFIG_HOME` or `~/.config` on Linux.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lmagent").join("config.toml"))
    }

    fn project_paths(&self) -> Vec<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| self.project_dir.join(name))
            .collect()
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(&self) -> Vec<String> {
        let mark = |path: &Path| if path.exists() { "[FOUND]" } else { "[     ]" };
        let mut lines = vec!["Configuration sources (highest priority last):".to_string()];

        lines.push("  [     ] Default:  built-in defaults".to_string());
        if let Some(global) = &self.global {
            lines.push(format!("  {} Global:   {}", mark(global), global.display()));
        }
        for path in self.project_paths() {
            lines.push(format!("  {} Project:  {}", mark(&path), path.display()));
        }
        if let Some(path) = &self.explicit {
            lines.push(format!("  {} Explicit: {}", mark(path), path.display()));
        }
        if self.use_env {
            lines.push(format!("  [     ] Env:      {}* variables", ENV_PREFIX));
        }
        lines
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(&self) {
        for line in self.describe_sources() {
            println!("{}", line);
        }
    }
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        figment.merge(Json::file_exact(path))
    } else {
        figment.merge(Toml::file_exact(path))
    }
}
