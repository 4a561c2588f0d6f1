//! Page path normalization and copy-path derivation.

use crate::error::ModelError;

/// Normalizes a page path: leading `/`, no trailing `/` (except root),
/// lowercase, collapsed duplicate slashes.
pub fn normalize_path(raw: &str) -> Result<String, ModelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid(raw, "path must not be empty"));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(invalid(raw, "path must not contain whitespace"));
    }
    if trimmed.contains(['?', '#']) {
        return Err(invalid(raw, "path must not contain a query or fragment"));
    }

    let segments: Vec<String> = trimmed
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect();

    if segments.iter().any(|s| s == "." || s == "..") {
        return Err(invalid(raw, "path must not contain relative segments"));
    }

    Ok(format!("/{}", segments.join("/")))
}

/// Candidate path for the `attempt`-th copy of `path`.
///
/// Attempt 1 appends the bare suffix, later attempts append a counter:
/// `/about` → `/about-copy`, `/about-copy-2`, `/about-copy-3`.
pub fn copy_path(path: &str, suffix: &str, attempt: u32) -> String {
    let base = if path == "/" { "/home" } else { path };
    if attempt <= 1 {
        format!("{base}{suffix}")
    } else {
        format!("{base}{suffix}-{attempt}")
    }
}

fn invalid(path: &str, reason: &str) -> ModelError {
    ModelError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
