// src/engine/classify.rs

use std::path::Path;

/// Category of a changed file.
///
/// Only script changes drive further decisions; everything else is `Other`
/// and the selector separately compares against the entry page path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Script,
    Other,
}

/// Classify a changed path by its suffix.
///
/// `ends_with` is a plain suffix match, so paths shorter than the suffix are
/// simply not scripts rather than a special case.
pub fn classify(path: &Path) -> FileCategory {
    let name = path.to_string_lossy();
    if name.ends_with(".js") {
        FileCategory::Script
    } else {
        FileCategory::Other
    }
}
