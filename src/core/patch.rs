//! Casing cleanup for Go error messages.
//!
//! Go style wants `fmt.Errorf` messages to start lowercase; this walks
//! a source tree and fixes the ones that do not.

use std::fs;
use std::path::Path;

use regex::{Captures, Regex};
use walkdir::WalkDir;

use crate::utils::error::{Result, ToolError};

const ERRORF_PATTERN: &str = r#"fmt\.Errorf\(\s*"([^"]*)""#;

#[derive(Debug, Clone, Copy, Default)]
pub struct PatchOutcome {
    pub files_changed: usize,
    pub fixes: usize,
}

/// Walks `root` for `.go` files and lowercases the first letter of each
/// `fmt.Errorf` message. Files are rewritten only when something
/// actually changed.
pub fn lowercase_error_messages(root: &str) -> Result<PatchOutcome> {
    let pattern = Regex::new(ERRORF_PATTERN).map_err(|e| ToolError::Config {
        message: format!("invalid pattern: {}", e),
    })?;

    let mut outcome = PatchOutcome::default();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }

        let fixes = patch_file(path, &pattern)?;
        if fixes > 0 {
            outcome.files_changed += 1;
            outcome.fixes += fixes;
            tracing::debug!("{}: {} fixes", path.display(), fixes);
        }
    }
    Ok(outcome)
}

fn patch_file(path: &Path, pattern: &Regex) -> Result<usize> {
    let text = fs::read_to_string(path)?;
    let (patched, fixes) = patch_source(&text, pattern);
    if patched != text {
        fs::write(path, patched)?;
    }
    Ok(fixes)
}

/// Applies the rewrite to one file's contents, returning the new text
/// and the number of messages fixed.
pub fn patch_source(text: &str, pattern: &Regex) -> (String, usize) {
    let mut fixes = 0;
    let patched = pattern.replace_all(text, |caps: &Captures| {
        let whole = &caps[0];
        let message = &caps[1];
        let mut chars = message.chars();
        match chars.next() {
            Some(first) if first.is_uppercase() => {
                fixes += 1;
                let lowered: String = first.to_lowercase().chain(chars).collect();
                // Only the first occurrence inside the matched literal.
                whole.replacen(message, &lowered, 1)
            }
            _ => whole.to_string(),
        }
    });
    (patched.into_owned(), fixes)
}
