// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ConfigFile;
use crate::engine::selector::{select_tasks, ScriptFileList};
use crate::engine::{RuntimeEvent, TaskInvocation, TaskSequence, LINT_STEP, TEST_SINGLE_SPEC_STEP};
use crate::errors::{FrontwatchError, Result};
use crate::exec::{resolve_step, StepBackend, StepOutcome};
use crate::fs::FileSystem;
use crate::markup::read_script_refs;

/// Executes task sequences strictly in order against a [`StepBackend`].
///
/// Owns the script manifest: the `reread-entry-scripts` task is the only
/// writer, the selector (via [`Runtime`]) the only other reader. Tasks run
/// one at a time; no task starts until its predecessor completed.
pub struct SequenceRunner<B: StepBackend> {
    config: ConfigFile,
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    backend: B,
    scripts: ScriptFileList,
}

impl<B: StepBackend> fmt::Debug for SequenceRunner<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceRunner")
            .field("root", &self.root)
            .field("scripts", &self.scripts)
            .finish_non_exhaustive()
    }
}

impl<B: StepBackend> SequenceRunner<B> {
    pub fn new(config: ConfigFile, fs: Arc<dyn FileSystem>, root: PathBuf, backend: B) -> Self {
        Self {
            config,
            fs,
            root,
            backend,
            scripts: ScriptFileList::new(),
        }
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn scripts(&self) -> &ScriptFileList {
        &self.scripts
    }

    /// Execute a sequence for one watch event.
    ///
    /// A failed task aborts the remainder of the sequence but is never fatal:
    /// the project just stays stale until the next qualifying change event.
    pub async fn execute_sequence(&mut self, sequence: TaskSequence) {
        for invocation in sequence {
            let id = invocation.id().to_string();
            match self.execute_invocation(invocation).await {
                Ok(StepOutcome::Success) => {}
                Ok(StepOutcome::Failed(code)) => {
                    warn!(task = %id, exit_code = code, "task failed; dropping rest of sequence");
                    break;
                }
                Err(err) => {
                    error!(task = %id, error = %err, "task errored; dropping rest of sequence");
                    break;
                }
            }
        }
    }

    /// Execute a sequence where failure is fatal (one-shot pipeline runs).
    pub async fn execute_strict(&mut self, sequence: TaskSequence) -> Result<()> {
        for invocation in sequence {
            let id = invocation.id().to_string();
            match self.execute_invocation(invocation).await? {
                StepOutcome::Success => {}
                StepOutcome::Failed(code) => {
                    return Err(FrontwatchError::StepFailed { step: id, code });
                }
            }
        }
        Ok(())
    }

    async fn execute_invocation(&mut self, invocation: TaskInvocation) -> Result<StepOutcome> {
        match invocation {
            TaskInvocation::RereadEntryScripts => {
                let page = self.root.join(&self.config.project().entry_page);
                self.scripts = read_script_refs(self.fs.as_ref(), &page)?;
                info!(count = self.scripts.len(), "refreshed entry-page script manifest");
                Ok(StepOutcome::Success)
            }
            TaskInvocation::Lint { files } => self.run_external(LINT_STEP, &files).await,
            TaskInvocation::TestSingleSpec { files } => {
                self.run_external(TEST_SINGLE_SPEC_STEP, &files).await
            }
            TaskInvocation::Step { name } => self.run_external(&name, &[]).await,
        }
    }

    async fn run_external(&mut self, name: &str, files: &[PathBuf]) -> Result<StepOutcome> {
        let step = resolve_step(&self.config, name, files)?;
        self.backend.run_step(step).await
    }
}

/// Drives task selection in response to [`RuntimeEvent`]s.
///
/// This is the IO shell around the pure selector: it reads events from the
/// watcher channel, selects a sequence per event, and hands it to the
/// [`SequenceRunner`]. Events queue in the channel while a sequence runs, so
/// invocations never overlap.
pub struct Runtime<B: StepBackend> {
    runner: SequenceRunner<B>,
    event_rx: mpsc::Receiver<RuntimeEvent>,
}

impl<B: StepBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}

impl<B: StepBackend> Runtime<B> {
    pub fn new(runner: SequenceRunner<B>, event_rx: mpsc::Receiver<RuntimeEvent>) -> Self {
        Self { runner, event_rx }
    }

    /// Main event loop.
    ///
    /// - Runs the `initial` sequence first (entry-page read + project lint).
    /// - Then consumes `RuntimeEvent`s until shutdown or channel close,
    ///   selecting and executing one sequence per change event.
    pub async fn run(mut self, initial: TaskSequence) -> Result<()> {
        info!("frontwatch runtime started");

        self.runner.execute_sequence(initial).await;

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
                RuntimeEvent::FileChanged(change) => {
                    let sequence = select_tasks(
                        &change,
                        self.runner.fs.as_ref(),
                        &self.runner.root,
                        self.runner.config.project(),
                        &self.runner.scripts,
                    );

                    if sequence.is_empty() {
                        continue;
                    }

                    self.runner.execute_sequence(sequence).await;
                }
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    /// Access the underlying runner.
    pub fn runner(&self) -> &SequenceRunner<B> {
        &self.runner
    }
}
