use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use frontwatch::errors::Result;
use frontwatch::exec::{ResolvedStep, StepBackend, StepOutcome};

/// A fake step backend that:
/// - records every resolved step it was asked to run
/// - reports `Failed(1)` for step names registered via [`Self::failing`],
///   `Success` for everything else.
pub struct FakeStepBackend {
    executed: Arc<Mutex<Vec<ResolvedStep>>>,
    failing: HashSet<String>,
}

impl FakeStepBackend {
    pub fn new(executed: Arc<Mutex<Vec<ResolvedStep>>>) -> Self {
        Self {
            executed,
            failing: HashSet::new(),
        }
    }

    /// Make the named step report failure.
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }
}

impl StepBackend for FakeStepBackend {
    fn run_step(
        &mut self,
        step: ResolvedStep,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + '_>> {
        let executed = Arc::clone(&self.executed);
        let outcome = if self.failing.contains(&step.name) {
            StepOutcome::Failed(1)
        } else {
            StepOutcome::Success
        };

        Box::pin(async move {
            {
                let mut guard = executed.lock().unwrap();
                guard.push(step);
            }
            Ok(outcome)
        })
    }
}
