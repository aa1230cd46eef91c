// src/exec/backend.rs

//! Pluggable step backend abstraction.
//!
//! The runtime talks to a `StepBackend` instead of spawning processes
//! directly. This makes it easy to swap in a fake backend in tests while
//! keeping the production implementation in [`step_runner`].

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

use super::step_runner::run_step_process;
use super::ResolvedStep;

/// Outcome of a step process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    Failed(i32),
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Success)
    }
}

/// Trait abstracting how resolved steps are executed.
///
/// Production code uses [`RealStepBackend`]; tests can provide their own
/// implementation that records invocations instead of spawning processes.
pub trait StepBackend: Send {
    /// Run a single step to completion and report its outcome.
    ///
    /// Step failure is an outcome, not an `Err`; errors are reserved for the
    /// backend itself being unable to run anything (e.g. spawn failure).
    fn run_step(
        &mut self,
        step: ResolvedStep,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + '_>>;
}

/// Real step backend used in production.
#[derive(Debug, Default)]
pub struct RealStepBackend;

impl RealStepBackend {
    pub fn new() -> Self {
        Self
    }
}

impl StepBackend for RealStepBackend {
    fn run_step(
        &mut self,
        step: ResolvedStep,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + '_>> {
        Box::pin(async move { run_step_process(&step).await })
    }
}
