// src/engine/mod.rs

//! Incremental task-selection engine.
//!
//! This module ties together:
//! - change classification (is this path a script?)
//! - the selector that maps one change event to an ordered, duplicate-free
//!   task sequence
//! - the main runtime event loop that reacts to:
//!   - file-watch change events
//!   - shutdown signals
//!
//! The pure decision logic lives in [`classify`] and [`selector`]; the
//! async/IO shell is implemented in [`runtime`].

use std::path::PathBuf;

/// Canonical step name type used throughout the engine.
pub type StepName = String;

/// Step the selector scopes to a single changed script.
pub const LINT_STEP: &str = "lint";

/// Step that runs exactly one resolved spec against the script manifest.
pub const TEST_SINGLE_SPEC_STEP: &str = "test-single-spec";

/// Builtin task that re-reads the entry page's script references.
pub const REREAD_TASK: &str = "reread-entry-scripts";

/// What happened to the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Added,
    Changed,
    Deleted,
}

/// A single file-system watch notification, relative to the project root.
///
/// Produced once per notification and consumed synchronously by the selector;
/// the channel between watcher and runtime serializes events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub action: ChangeAction,
}

/// One selected task together with its options payload.
///
/// This is the contract between the selector and the step runner: stable
/// identifiers with an enumerated options record per task, validated here at
/// the boundary rather than left as loose strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskInvocation {
    /// Lint the given files (a single changed file during watch, or the
    /// project-wide script globs at startup).
    Lint { files: Vec<PathBuf> },

    /// Run the test runner against exactly this file list (script manifest,
    /// mock script, then the resolved spec).
    TestSingleSpec { files: Vec<PathBuf> },

    /// Re-read the entry page's script references into the manifest.
    RereadEntryScripts,

    /// An externally configured pipeline step, invoked by name with no file
    /// scope of its own.
    Step { name: StepName },
}

impl TaskInvocation {
    /// Stable identifier for this task, used for deduplication and as the
    /// key into the `[step.<name>]` configuration.
    pub fn id(&self) -> &str {
        match self {
            TaskInvocation::Lint { .. } => LINT_STEP,
            TaskInvocation::TestSingleSpec { .. } => TEST_SINGLE_SPEC_STEP,
            TaskInvocation::RereadEntryScripts => REREAD_TASK,
            TaskInvocation::Step { name } => name.as_str(),
        }
    }
}

/// Ordered sequence of task invocations with no duplicate identifiers.
///
/// Each change event fully determines its own sequence; a new sequence
/// replaces, never appends to, the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSequence {
    tasks: Vec<TaskInvocation>,
}

impl TaskSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an invocation unless a task with the same identifier is
    /// already present (first occurrence wins, order preserved).
    pub fn push(&mut self, invocation: TaskInvocation) {
        if self.tasks.iter().any(|t| t.id() == invocation.id()) {
            return;
        }
        self.tasks.push(invocation);
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskInvocation> {
        self.tasks.iter()
    }

    /// Task identifiers in execution order (handy for logging and tests).
    pub fn ids(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.id()).collect()
    }
}

impl IntoIterator for TaskSequence {
    type Item = TaskInvocation;
    type IntoIter = std::vec::IntoIter<TaskInvocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

impl FromIterator<TaskInvocation> for TaskSequence {
    fn from_iter<I: IntoIterator<Item = TaskInvocation>>(iter: I) -> Self {
        let mut seq = TaskSequence::new();
        for inv in iter {
            seq.push(inv);
        }
        seq
    }
}

/// Events flowing into the runtime from the watcher and signal handlers.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A watched file changed.
    FileChanged(ChangeEvent),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod classify;
pub mod runtime;
pub mod selector;

pub use classify::{classify, FileCategory};
pub use runtime::Runtime;
pub use selector::{select_tasks, spec_path_for, ScriptFileList};
