//! Domain normalization and validation.
//!
//! Blocked sites are stored as bare host names: no scheme, no leading
//! `www.`, no path, port, or credentials, lowercased. The same
//! normalization runs on every add, so `https://www.Example.com/r/all`
//! and `example.com` collide as duplicates.

use crate::error::ValidationError;

/// Normalize a user-entered domain to its canonical stored form.
///
/// Accepts full URLs or bare hosts. Fails when the remainder does not
/// look like a host: at least two labels, alphanumeric/hyphen labels,
/// and an alphabetic TLD of two or more letters.
pub fn normalize_domain(input: &str) -> Result<String, ValidationError> {
    let mut host = input.trim().to_ascii_lowercase();

    if let Some((_, rest)) = host.split_once("://") {
        host = rest.to_string();
    }
    for sep in ['/', '?', '#'] {
        if let Some(idx) = host.find(sep) {
            host.truncate(idx);
        }
    }
    if let Some(idx) = host.rfind('@') {
        host = host[idx + 1..].to_string();
    }
    if let Some(idx) = host.find(':') {
        host.truncate(idx);
    }
    if let Some(stripped) = host.strip_prefix("www.") {
        host = stripped.to_string();
    }

    validate_shape(input, &host)?;
    Ok(host)
}

fn validate_shape(input: &str, host: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidDomain {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if host.is_empty() {
        return Err(invalid("empty host"));
    }
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return Err(invalid("missing top-level domain"));
    }
    for label in &labels {
        if label.is_empty() {
            return Err(invalid("empty label"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("labels may only contain letters, digits and hyphens"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("labels may not start or end with a hyphen"));
        }
    }
    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid("top-level domain must be at least two letters"));
    }
    Ok(())
}
