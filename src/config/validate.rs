// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::engine::{LINT_STEP, REREAD_TASK, TEST_SINGLE_SPEC_STEP};
use crate::errors::{FrontwatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::FrontwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.project,
            raw.watch,
            raw.step,
            raw.pipeline,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_project(cfg)?;
    validate_watch(cfg)?;
    ensure_required_steps(cfg)?;
    validate_pipeline_refs(cfg)?;
    validate_pipeline_dag(cfg)?;
    Ok(())
}

fn validate_project(cfg: &RawConfigFile) -> Result<()> {
    if cfg.project.entry_page.is_empty() {
        return Err(FrontwatchError::ConfigError(
            "[project].entry_page must not be empty".to_string(),
        ));
    }

    // The spec derivation strips a trailing ".js" and appends the suffix, so
    // a suffix that doesn't itself end in ".js" would never be idempotent.
    if !cfg.project.spec_suffix.ends_with(".js") {
        return Err(FrontwatchError::ConfigError(format!(
            "[project].spec_suffix must end with \".js\" (got {:?})",
            cfg.project.spec_suffix
        )));
    }

    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.file_types.is_empty() {
        return Err(FrontwatchError::ConfigError(
            "[watch].file_types must contain at least one pattern".to_string(),
        ));
    }
    Ok(())
}

/// Watch mode reacts to script changes with these two steps, so refusing to
/// start without them beats failing on the first edit.
fn ensure_required_steps(cfg: &RawConfigFile) -> Result<()> {
    for required in [LINT_STEP, TEST_SINGLE_SPEC_STEP] {
        if !cfg.step.contains_key(required) {
            return Err(FrontwatchError::ConfigError(format!(
                "config must define a [step.{required}] section"
            )));
        }
    }
    Ok(())
}

fn validate_pipeline_refs(cfg: &RawConfigFile) -> Result<()> {
    for (name, entries) in cfg.pipeline.iter() {
        if cfg.step.contains_key(name) {
            return Err(FrontwatchError::ConfigError(format!(
                "'{name}' is defined both as a step and as a pipeline"
            )));
        }
        if entries.is_empty() {
            return Err(FrontwatchError::ConfigError(format!(
                "pipeline '{name}' must contain at least one entry"
            )));
        }
        for entry in entries.iter() {
            let known = entry == REREAD_TASK
                || cfg.step.contains_key(entry)
                || cfg.pipeline.contains_key(entry);
            if !known {
                return Err(FrontwatchError::ConfigError(format!(
                    "pipeline '{name}' references unknown step or pipeline '{entry}'"
                )));
            }
        }
    }
    Ok(())
}

fn validate_pipeline_dag(cfg: &RawConfigFile) -> Result<()> {
    // Pipelines may reference other pipelines; build a graph of those
    // references and reject cycles.
    //
    // Edge direction: referenced -> referencing
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.pipeline.keys() {
        graph.add_node(name.as_str());
    }

    for (name, entries) in cfg.pipeline.iter() {
        for entry in entries.iter() {
            if cfg.pipeline.contains_key(entry) {
                graph.add_edge(entry.as_str(), name.as_str(), ());
            }
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(FrontwatchError::PipelineCycle(format!(
                "pipeline '{}' participates in a reference cycle",
                node
            )))
        }
    }
}
