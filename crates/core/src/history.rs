//! History record defaults and validation.

use crate::error::CoreError;

/// Title given to a record saved without one.
pub const DEFAULT_TITLE: &str = "Untitled Code";

/// Validate the fields required to save a record.
pub fn validate_required(original_code: &str, language: &str) -> Result<(), CoreError> {
    if !original_code.is_empty() && !language.trim().is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Code and language are required".to_string(),
        ))
    }
}

/// Resolve the title to store: blank or missing titles become [`DEFAULT_TITLE`].
pub fn resolve_title(title: Option<&str>) -> String {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}
