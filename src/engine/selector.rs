// src/engine/selector.rs

//! Maps a single change event to the tasks that must re-run.
//!
//! This is the pure core of the orchestrator: no channels, no processes, no
//! Tokio. The only IO is the spec-existence probe, which goes through the
//! [`FileSystem`] seam so tests can run entirely in memory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::ProjectSection;
use crate::engine::classify::{classify, FileCategory};
use crate::engine::{ChangeEvent, TaskInvocation, TaskSequence};
use crate::fs::FileSystem;

/// Ordered script paths referenced by the project's entry page.
///
/// Owned by the runtime loop, refreshed only by the `reread-entry-scripts`
/// task, and read here when assembling the test runner's file list.
pub type ScriptFileList = Vec<PathBuf>;

/// Derive the spec path for a script under the configured suffix convention.
///
/// - `foo.js` -> `foo-spec.js`
/// - `foo-spec.js` -> `foo-spec.js` (already a spec; idempotent)
/// - non-script paths -> `None`
pub fn spec_path_for(path: &Path, spec_suffix: &str) -> Option<PathBuf> {
    let name = path.to_string_lossy();
    if name.ends_with(spec_suffix) {
        return Some(path.to_path_buf());
    }
    let stem = name.strip_suffix(".js")?;
    Some(PathBuf::from(format!("{stem}{spec_suffix}")))
}

/// Decide which tasks must run for one change event.
///
/// The result replaces any previously selected sequence; each event fully
/// determines its own task list.
///
/// - Script change: lint just that file, and if a matching spec file exists,
///   run the test runner against `scripts + mock script + spec`. A failed
///   existence probe counts as "no spec" so a single unresolvable event never
///   aborts the watch loop.
/// - Entry-page change: refresh the script manifest.
/// - Anything else: empty sequence, no work.
pub fn select_tasks(
    event: &ChangeEvent,
    fs: &dyn FileSystem,
    root: &Path,
    project: &ProjectSection,
    scripts: &ScriptFileList,
) -> TaskSequence {
    let mut sequence = TaskSequence::new();

    if classify(&event.path) == FileCategory::Script {
        // Lint only the changed file so incremental feedback stays fast.
        sequence.push(TaskInvocation::Lint {
            files: vec![event.path.clone()],
        });

        if let Some(spec) = spec_path_for(&event.path, &project.spec_suffix) {
            if fs.is_file(&root.join(&spec)) {
                let mut files = scripts.clone();
                files.push(PathBuf::from(&project.mock_script));
                files.push(spec);
                sequence.push(TaskInvocation::TestSingleSpec { files });
            } else {
                debug!(spec = %spec.display(), "no matching spec file; skipping test task");
            }
        }
    }

    if event.path == Path::new(&project.entry_page) {
        sequence.push(TaskInvocation::RereadEntryScripts);
    }

    debug!(
        path = %event.path.display(),
        tasks = ?sequence.ids(),
        "selected tasks for change event"
    );

    sequence
}
