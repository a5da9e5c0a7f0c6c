use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Message shown when the coordinator email has the wrong shape
pub const INVALID_EMAIL_MESSAGE: &str =
    "the supplied email is not valid; please enter a valid email.";

/// Reasons a draft cannot be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("the period label is required")]
    EmptyName,

    #[error("the coordinator email is required")]
    EmptyEmail,

    #[error("the supplied email is not valid; please enter a valid email.")]
    InvalidEmail,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        // local@domain.tld, no whitespace or extra '@' in any part
        RegexBuilder::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .case_insensitive(true)
            .build()
            .expect("email pattern is valid")
    })
}

/// Check the local@domain.tld shape. Not an RFC 5322 validator.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Validate draft fields in submit order: name, email presence, email shape
pub fn validate_fields(name: &str, email: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}
