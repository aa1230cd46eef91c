// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Building the inclusive per-directory glob patterns that define the
//!   project's file universe.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//!
//! It does **not** decide what to run; it only turns filesystem changes into
//! [`crate::engine::ChangeEvent`]s for the selector.

pub mod folder_globs;
pub mod watcher;

pub use folder_globs::{build_folder_globs, compile_globset};
pub use watcher::{spawn_watcher, WatcherHandle};
