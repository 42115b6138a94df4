//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::engine::EngineOptions;

/// Name of the per-project config file, looked up from the working directory upwards
pub const PROJECT_CONFIG_FILE: &str = ".playt.yaml";

/// Playt configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level for stderr output (error, warn, info, debug, trace)
    pub log_level: Option<String>,

    /// Validate variables before `playt render` (default: true)
    pub validate: Option<bool>,

    /// Drop the first newline after a block tag (default: true)
    pub trim_blocks: Option<bool>,

    /// Strip whitespace before a block tag at line start (default: true)
    pub lstrip_blocks: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        Self::load_with(None)
    }

    /// Like [`Config::load`], with an extra explicit config file applied last
    pub fn load_with(explicit: Option<&Path>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/playt/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            config.merge_file(&global_path);
        }

        // 3. Project config (.playt.yaml in cwd or an ancestor)
        if let Some(project_path) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::find_project_config(&cwd))
        {
            config.merge_file(&project_path);
        }

        // 4. Config file given on the command line
        if let Some(path) = explicit {
            config.merge_file(path);
        }

        // 5. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "playt")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Walk up from `start` looking for a project config file
    pub fn find_project_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    fn merge_file(&mut self, path: &Path) {
        if !path.exists() {
            return;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yml::from_str::<Config>(&contents) {
                Ok(layer) => {
                    tracing::debug!(path = %path.display(), "loaded config layer");
                    self.merge(layer);
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config"),
            },
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config"),
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(level) = var("PLAYT_LOG").filter(|v| !v.is_empty()) {
            self.log_level = Some(level);
        }
        if var("PLAYT_NO_VALIDATE").is_some_and(|v| !v.is_empty()) {
            self.validate = Some(false);
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        if other.validate.is_some() {
            self.validate = other.validate;
        }
        if other.trim_blocks.is_some() {
            self.trim_blocks = other.trim_blocks;
        }
        if other.lstrip_blocks.is_some() {
            self.lstrip_blocks = other.lstrip_blocks;
        }
    }

    /// Whether `render` should validate before rendering
    pub fn validate_before_render(&self) -> bool {
        self.validate.unwrap_or(true)
    }

    /// Engine options with unset values defaulted
    pub fn engine_options(&self) -> EngineOptions {
        let defaults = EngineOptions::default();
        EngineOptions {
            trim_blocks: self.trim_blocks.unwrap_or(defaults.trim_blocks),
            lstrip_blocks: self.lstrip_blocks.unwrap_or(defaults.lstrip_blocks),
        }
    }
}
