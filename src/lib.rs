// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod markup;
pub mod pipeline;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::ConfigFile;
use crate::engine::runtime::SequenceRunner;
use crate::engine::{Runtime, RuntimeEvent, TaskInvocation, TaskSequence};
use crate::exec::RealStepBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::pipeline::pipeline_sequence;
use crate::watch::{build_folder_globs, compile_globset, spawn_watcher};

/// Pattern expanded per top-level directory when linting the whole project.
const SCRIPT_PATTERN: &str = "*.js";

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - one-shot pipeline runs (`--pipeline`)
/// - folder glob building + file watcher
/// - the selector/runner event loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let root = config_root_dir(&config_path);
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    // One-shot pipeline mode: resolve, execute strictly, exit.
    if let Some(name) = args.pipeline {
        let sequence = pipeline_sequence(&cfg, &name)?;
        info!(pipeline = %name, tasks = ?sequence.ids(), "running pipeline");

        let mut runner = SequenceRunner::new(cfg, fs, root, RealStepBackend::new());
        runner.execute_strict(sequence).await?;
        return Ok(());
    }

    // Watch mode. Establish the file universe first; an unreadable project
    // root is fatal here, once, rather than per event.
    let watch_patterns = build_folder_globs(
        fs.as_ref(),
        &root,
        &cfg.watch().file_types,
        &cfg.project().ignore_dirs,
    )?;
    let watch_set = compile_globset(&watch_patterns)?;
    info!(patterns = ?watch_patterns, "watching folder globs");

    let script_globs = build_folder_globs(
        fs.as_ref(),
        &root,
        &[SCRIPT_PATTERN.to_string()],
        &cfg.project().ignore_dirs,
    )?;

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let _watcher_handle = spawn_watcher(
        root.clone(),
        watch_set,
        cfg.project().entry_page.clone(),
        rt_tx.clone(),
    )?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // Prime state before watching: read the entry page's script manifest,
    // then lint the whole project once.
    let mut initial = TaskSequence::new();
    initial.push(TaskInvocation::RereadEntryScripts);
    initial.push(TaskInvocation::Lint {
        files: script_globs.iter().map(PathBuf::from).collect(),
    });

    let runner = SequenceRunner::new(cfg, fs, root, RealStepBackend::new());
    let runtime = Runtime::new(runner, rt_rx);
    runtime.run(initial).await?;
    Ok(())
}

/// Figure out a sensible project root for watching.
///
/// - If the config path has a non-empty parent (e.g. "configs/Frontwatch.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Frontwatch.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print project settings, steps and pipelines.
fn print_dry_run(cfg: &ConfigFile) {
    println!("frontwatch dry-run");
    println!("  project.entry_page = {}", cfg.project().entry_page);
    println!("  project.spec_suffix = {}", cfg.project().spec_suffix);
    println!("  project.ignore_dirs = {:?}", cfg.project().ignore_dirs);
    println!("  project.mock_script = {}", cfg.project().mock_script);
    println!("  watch.file_types = {:?}", cfg.watch().file_types);
    println!();

    println!("steps ({}):", cfg.steps().len());
    for (name, step) in cfg.steps().iter() {
        println!("  - {name}");
        println!("      cmd: {}", step.cmd);
    }

    if !cfg.pipelines().is_empty() {
        println!();
        println!("pipelines ({}):", cfg.pipelines().len());
        for (name, entries) in cfg.pipelines().iter() {
            println!("  - {name}: {:?}", entries);
        }
    }
}
