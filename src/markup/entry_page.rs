// src/markup/entry_page.rs

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;

/// Extract the ordered `src` references of `<script>` tags in the entry page.
///
/// Tags marked `data-build="exclude"` are skipped; they are development-only
/// includes (e.g. livereload snippets) that must not reach the test runner's
/// file list. Tags without a `src` attribute (inline scripts) are ignored.
pub fn read_script_refs(fs: &dyn FileSystem, entry_page: &Path) -> Result<Vec<PathBuf>> {
    let markup = fs.read_to_string(entry_page)?;

    let tag_re = Regex::new(r"(?is)<script\b[^>]*>")?;
    let src_re = Regex::new(r#"(?i)\bsrc\s*=\s*["']([^"']+)["']"#)?;
    let exclude_re = Regex::new(r#"(?i)\bdata-build\s*=\s*["']exclude["']"#)?;

    let mut refs = Vec::new();
    for tag in tag_re.find_iter(&markup) {
        let tag = tag.as_str();
        if exclude_re.is_match(tag) {
            continue;
        }
        if let Some(caps) = src_re.captures(tag) {
            refs.push(PathBuf::from(&caps[1]));
        }
    }

    debug!(
        entry_page = %entry_page.display(),
        count = refs.len(),
        "read script references from entry page"
    );

    Ok(refs)
}
