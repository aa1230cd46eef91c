// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [project]
/// entry_page = "index.html"
/// spec_suffix = "-spec.js"
///
/// [watch]
/// file_types = ["*.js", "*.less", "*.html"]
///
/// [step.lint]
/// cmd = "jshint {files}"
///
/// [pipeline]
/// build = ["lint", "compile-css", "cache-templates", "minify-css"]
/// ```
///
/// All sections are optional and have reasonable defaults, except that the
/// `lint` and `test-single-spec` steps must be defined for watch mode to be
/// able to act on script changes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Project-level paths and conventions from `[project]`.
    #[serde(default)]
    pub project: ProjectSection,

    /// Watch settings from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,

    /// All externally implemented build steps from `[step.<name>]`.
    ///
    /// Keys are the *step names* (e.g. `"lint"`, `"compile-css"`).
    #[serde(default)]
    pub step: BTreeMap<String, StepConfig>,

    /// Named step sequences from `[pipeline]`.
    ///
    /// An entry may reference a step, another pipeline, or the builtin
    /// `reread-entry-scripts` task.
    #[serde(default)]
    pub pipeline: BTreeMap<String, Vec<String>>,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// The project's main markup document. Its embedded `<script>` references
    /// define the script manifest fed to the test runner, and a change to it
    /// triggers a manifest refresh.
    #[serde(default = "default_entry_page")]
    pub entry_page: String,

    /// Suffix convention that associates a test spec file with a script
    /// (`foo.js` -> `foo-spec.js`).
    #[serde(default = "default_spec_suffix")]
    pub spec_suffix: String,

    /// Top-level directory names that never contribute glob patterns
    /// (build output, dependencies, temp and release trees).
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    /// Mocking-library script inserted into the test runner's file list
    /// between the script manifest and the spec under test.
    #[serde(default = "default_mock_script")]
    pub mock_script: String,
}

fn default_entry_page() -> String {
    "index.html".to_string()
}

fn default_spec_suffix() -> String {
    "-spec.js".to_string()
}

fn default_ignore_dirs() -> Vec<String> {
    ["node_modules", "bower_components", "dist", "temp", "release"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_mock_script() -> String {
    "bower_components/angular-mocks/angular-mocks.js".to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            entry_page: default_entry_page(),
            spec_suffix: default_spec_suffix(),
            ignore_dirs: default_ignore_dirs(),
            mock_script: default_mock_script(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// File-type patterns expanded per top-level directory when building the
    /// inclusive watch glob set (see `watch::folder_globs`).
    #[serde(default = "default_file_types")]
    pub file_types: Vec<String>,
}

fn default_file_types() -> Vec<String> {
    ["*.js", "*.less", "*.html"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            file_types: default_file_types(),
        }
    }
}

/// `[step.<name>]` section.
///
/// A step is an opaque external collaborator; the orchestrator only decides
/// when to invoke it and with which file scope.
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    /// The command to execute. A `{files}` placeholder is replaced with the
    /// invocation's file scope (space-separated paths).
    pub cmd: String,
}

/// Validated configuration.
///
/// Constructed from [`RawConfigFile`] via `TryFrom` (see `config::validate`),
/// which is the only way to obtain one, so downstream code can rely on step
/// and pipeline references having been checked.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    project: ProjectSection,
    watch: WatchSection,
    step: BTreeMap<String, StepConfig>,
    pipeline: BTreeMap<String, Vec<String>>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        project: ProjectSection,
        watch: WatchSection,
        step: BTreeMap<String, StepConfig>,
        pipeline: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            project,
            watch,
            step,
            pipeline,
        }
    }

    pub fn project(&self) -> &ProjectSection {
        &self.project
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn steps(&self) -> &BTreeMap<String, StepConfig> {
        &self.step
    }

    pub fn pipelines(&self) -> &BTreeMap<String, Vec<String>> {
        &self.pipeline
    }

    /// Command template for a named step, if configured.
    pub fn step_cmd(&self, name: &str) -> Option<&str> {
        self.step.get(name).map(|s| s.cmd.as_str())
    }
}
