// src/exec/step_runner.rs

//! Individual step process runner.

use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::{ResolvedStep, StepOutcome};

/// Run a single step process to completion.
///
/// The step's stdout is forwarded to our stdout and its stderr to our stderr;
/// that stream is the step's own reporting channel (lint findings, test
/// results), while frontwatch's logs stay on stderr via `tracing`.
pub async fn run_step_process(step: &ResolvedStep) -> Result<StepOutcome> {
    info!(step = %step.name, cmd = %step.cmd, "starting step process");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&step.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&step.cmd);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for step '{}'", step.name))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stdout_task = stdout.map(|stdout| {
        tokio::spawn(async move {
            let reader = BufReader::new(stdout);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("{line}");
            }
        })
    });

    let stderr_task = stderr.map(|stderr| {
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                eprintln!("{line}");
            }
        })
    });

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of step '{}'", step.name))?;

    // Drain the forwarders so step output is complete before we report.
    if let Some(task) = stdout_task {
        let _ = task.await;
    }
    if let Some(task) = stderr_task {
        let _ = task.await;
    }

    let code = status.code().unwrap_or(-1);
    let outcome = if status.success() {
        StepOutcome::Success
    } else {
        StepOutcome::Failed(code)
    };

    if status.success() {
        debug!(step = %step.name, "step process exited successfully");
    } else {
        info!(step = %step.name, exit_code = code, "step process failed");
    }

    Ok(outcome)
}
