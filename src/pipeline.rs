// src/pipeline.rs

//! Named pipeline resolution.
//!
//! A pipeline is an ordered alias over steps, other pipelines, and the
//! builtin `reread-entry-scripts` task. Resolution expands aliases
//! depth-first in place and deduplicates, yielding the flat sequence the
//! runner executes. Cyclic references are rejected at config load, so
//! expansion here always terminates.

use crate::config::ConfigFile;
use crate::engine::{TaskInvocation, TaskSequence, REREAD_TASK};
use crate::errors::{FrontwatchError, Result};

/// Resolve a named pipeline into a flat, duplicate-free list of task names.
pub fn resolve_pipeline(cfg: &ConfigFile, name: &str) -> Result<Vec<String>> {
    if !cfg.pipelines().contains_key(name) {
        return Err(FrontwatchError::UnknownPipeline(name.to_string()));
    }

    let mut flat = Vec::new();
    expand_into(cfg, name, &mut flat);
    Ok(flat)
}

fn expand_into(cfg: &ConfigFile, name: &str, flat: &mut Vec<String>) {
    // Presence checked by the caller / config validation.
    let Some(entries) = cfg.pipelines().get(name) else {
        return;
    };

    for entry in entries {
        if cfg.pipelines().contains_key(entry) {
            expand_into(cfg, entry, flat);
        } else if !flat.iter().any(|n| n == entry) {
            flat.push(entry.clone());
        }
    }
}

/// Resolve a named pipeline into an executable [`TaskSequence`].
pub fn pipeline_sequence(cfg: &ConfigFile, name: &str) -> Result<TaskSequence> {
    let names = resolve_pipeline(cfg, name)?;

    let sequence = names
        .into_iter()
        .map(|task| {
            if task == REREAD_TASK {
                TaskInvocation::RereadEntryScripts
            } else {
                TaskInvocation::Step { name: task }
            }
        })
        .collect();

    Ok(sequence)
}
