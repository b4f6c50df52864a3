//! Input validation utilities
//!
//! Checks for user input, configuration values and path identifiers.

use crate::error::CliError;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    // Basic URL validation - must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> crate::Result<()> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err(CliError::InvalidArguments(format!(
            "Invalid email '{}': expected name@domain",
            email
        ))
        .into());
    }

    Ok(())
}

/// Validate a monetary amount entered by the user
pub fn validate_amount(field: &str, amount: f64) -> crate::Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CliError::InvalidArguments(format!(
            "{} must be a positive number, got {}",
            field, amount
        ))
        .into());
    }

    Ok(())
}

/// Check that an identifier can be placed in a URL path as a single segment.
pub fn check_path_id(field: &str, id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    if id.contains(['/', '\\', '?', '#']) {
        return Err(format!("{} '{}' contains reserved characters", field, id));
    }
    // URL parsing collapses dot segments, including percent-encoded ones.
    let decoded = id.to_ascii_lowercase().replace("%2e", ".");
    if decoded == "." || decoded == ".." {
        return Err(format!("{} '{}' is not a valid path segment", field, id));
    }
    Ok(())
}
