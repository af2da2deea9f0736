//! Validation of creation input.
//!
//! Plain functions returning a structured [`ValidationError`] that names the
//! offending field. Nothing here touches storage.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Maximum accepted length of a client-supplied slug.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Slugs that would shadow service routes.
const RESERVED_SLUGS: &[&str] = &["url", "health"];

/// URL schemes accepted as redirect targets.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp"];

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("slug pattern is a valid regex"));

/// Input field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Slug,
    Url,
    /// The request body as a whole (unreadable JSON).
    Body,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Slug => f.write_str("slug"),
            Field::Url => f.write_str("url"),
            Field::Body => f.write_str("body"),
        }
    }
}

/// A rejected input field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Raw creation input as received from a client.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub slug: Option<String>,
    pub url: String,
}

/// Creation input that passed validation.
///
/// Both fields are trimmed; the slug keeps its original case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    pub slug: Option<String>,
    pub url: String,
}

/// Validates a creation candidate.
///
/// The URL is checked first so a request with two bad fields reports the URL.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the first invalid field.
pub fn validate(candidate: &Candidate) -> Result<ValidatedInput, ValidationError> {
    let url = validate_url(&candidate.url)?;
    let slug = candidate.slug.as_deref().map(validate_slug).transpose()?;

    Ok(ValidatedInput { slug, url })
}

/// Validates a client-supplied slug and returns it trimmed.
///
/// # Rules
///
/// - Non-empty after trimming, at most [`MAX_SLUG_LENGTH`] characters
/// - Only ASCII letters, digits, underscores and hyphens
/// - Not a reserved route name (case-insensitive)
pub fn validate_slug(slug: &str) -> Result<String, ValidationError> {
    let slug = slug.trim();

    if slug.is_empty() {
        return Err(ValidationError::new(Field::Slug, "must not be empty"));
    }

    if slug.len() > MAX_SLUG_LENGTH {
        return Err(ValidationError::new(
            Field::Slug,
            format!("must be at most {MAX_SLUG_LENGTH} characters"),
        ));
    }

    if !SLUG_REGEX.is_match(slug) {
        return Err(ValidationError::new(
            Field::Slug,
            "may only contain letters, digits, underscores and hyphens",
        ));
    }

    if RESERVED_SLUGS.contains(&slug.to_ascii_lowercase().as_str()) {
        return Err(ValidationError::new(Field::Slug, "is reserved"));
    }

    Ok(slug.to_string())
}

/// Validates a target URL and returns it trimmed.
///
/// The URL must be absolute, use one of the allowed schemes and carry a host.
/// The returned string is the trimmed input, not the parser's serialization,
/// so it must already be usable as a `Location` header: control characters and
/// inner whitespace are rejected rather than silently stripped by the parser.
pub fn validate_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::new(Field::Url, "is required"));
    }

    if url.chars().any(char::is_control) {
        return Err(ValidationError::new(
            Field::Url,
            "contains control characters",
        ));
    }

    if url.chars().any(char::is_whitespace) {
        return Err(ValidationError::new(Field::Url, "contains whitespace"));
    }

    let parsed = Url::parse(url).map_err(|e| ValidationError::new(Field::Url, e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ValidationError::new(
            Field::Url,
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::new(Field::Url, "must include a host"));
    }

    Ok(url.to_string())
}
