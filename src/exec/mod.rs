// src/exec/mod.rs

//! Execution of named external build steps.
//!
//! The orchestrator decides *what* runs and in *what order*; everything here
//! treats a step as an opaque command. Steps run strictly sequentially and
//! in-process with respect to the runtime loop: the next step does not start
//! until its predecessor completed.

use std::path::PathBuf;

use crate::config::ConfigFile;
use crate::errors::{FrontwatchError, Result};

pub mod backend;
pub mod step_runner;

pub use backend::{RealStepBackend, StepBackend, StepOutcome};
pub use step_runner::run_step_process;

/// A step resolved against configuration, ready to execute.
///
/// `cmd` is the configured command template with the `{files}` placeholder
/// already substituted with the invocation's file scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStep {
    pub name: String,
    pub cmd: String,
}

/// Look up a step's command template and substitute the file scope.
pub fn resolve_step(cfg: &ConfigFile, name: &str, files: &[PathBuf]) -> Result<ResolvedStep> {
    let template = cfg
        .step_cmd(name)
        .ok_or_else(|| FrontwatchError::UnknownStep(name.to_string()))?;

    let joined = files
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let cmd = template.replace("{files}", &joined);

    Ok(ResolvedStep {
        name: name.to_string(),
        cmd,
    })
}
