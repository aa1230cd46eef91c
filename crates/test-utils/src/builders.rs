#![allow(dead_code)]

use std::collections::BTreeMap;
use frontwatch::config::{ConfigFile, ProjectSection, RawConfigFile, StepConfig, WatchSection};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts with the `lint` and `test-single-spec` steps already defined
/// (with inert `echo` commands), since validation requires them; tests that
/// care about real commands can override them via [`Self::with_step`].
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut step = BTreeMap::new();
        step.insert(
            "lint".to_string(),
            StepConfig {
                cmd: "echo lint {files}".to_string(),
            },
        );
        step.insert(
            "test-single-spec".to_string(),
            StepConfig {
                cmd: "echo test {files}".to_string(),
            },
        );

        Self {
            config: RawConfigFile {
                project: ProjectSection::default(),
                watch: WatchSection::default(),
                step,
                pipeline: BTreeMap::new(),
            },
        }
    }

    pub fn with_step(mut self, name: &str, cmd: &str) -> Self {
        self.config.step.insert(
            name.to_string(),
            StepConfig {
                cmd: cmd.to_string(),
            },
        );
        self
    }

    pub fn with_pipeline(mut self, name: &str, entries: &[&str]) -> Self {
        self.config.pipeline.insert(
            name.to_string(),
            entries.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_entry_page(mut self, path: &str) -> Self {
        self.config.project.entry_page = path.to_string();
        self
    }

    pub fn with_spec_suffix(mut self, suffix: &str) -> Self {
        self.config.project.spec_suffix = suffix.to_string();
        self
    }

    pub fn with_mock_script(mut self, path: &str) -> Self {
        self.config.project.mock_script = path.to_string();
        self
    }

    pub fn with_ignore_dir(mut self, name: &str) -> Self {
        self.config.project.ignore_dirs.push(name.to_string());
        self
    }

    pub fn with_file_types(mut self, patterns: &[&str]) -> Self {
        self.config.watch.file_types = patterns.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Build the raw config without validation (for tests that exercise
    /// validation failures directly).
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
