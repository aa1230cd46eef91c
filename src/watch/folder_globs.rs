// src/watch/folder_globs.rs

use std::path::Path;

use anyhow::Context;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;

/// Build an inclusive glob set covering every first-level project directory.
///
/// Exclusion patterns make glob evaluation scale with total file count; this
/// instead emits one recursive pattern per surviving top-level directory, so
/// cost scales with directory count and users can lay out their tree however
/// they like.
///
/// For each top-level entry of `root`:
/// - skip it if its name is in `ignore_dirs`, starts with `.`, or is not a
///   directory;
/// - otherwise emit `name/**/pattern` for every input pattern.
///
/// The original patterns are appended unmodified at the end so files living
/// directly at the root are still covered. Directory names are sorted, which
/// makes the output reproducible across invocations on an unchanged tree.
///
/// An unreadable `root` is a fatal initialization error: without it the
/// orchestrator cannot establish its file universe.
pub fn build_folder_globs(
    fs: &dyn FileSystem,
    root: &Path,
    patterns: &[String],
    ignore_dirs: &[String],
) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for entry in fs.read_dir(root)? {
        let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if ignore_dirs.iter().any(|d| d == name) || name.starts_with('.') {
            continue;
        }
        if !fs.is_dir(&entry) {
            continue;
        }
        names.push(name.to_string());
    }
    names.sort();

    let mut globs = Vec::with_capacity(names.len() * patterns.len() + patterns.len());
    for name in &names {
        for pattern in patterns {
            globs.push(format!("{name}/**/{pattern}"));
        }
    }
    globs.extend(patterns.iter().cloned());

    debug!(count = globs.len(), "built folder glob patterns");

    Ok(globs)
}

/// Compile string patterns into a `GlobSet` for matching watch event paths.
///
/// `*` must not cross directory separators here, or the appended top-level
/// patterns (e.g. `*.js`) would match nested paths and defeat the ignore
/// list; recursion is expressed only by the explicit `**` segments.
pub fn compile_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    let set = builder.build().context("compiling glob set")?;
    Ok(set)
}
