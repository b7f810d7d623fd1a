use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// A form field failed validation. Shown next to the field; blocks submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    MalformedDate(String),
    #[error("due date {0} is in the past")]
    DateInPast(String),
    #[error("'{0}' is not a valid name (letters, spaces, hyphens and apostrophes only)")]
    MalformedName(String),
    #[error("'{0}' is not a valid email address")]
    MalformedEmail(String),
    #[error("'{0}' is not a valid phone number")]
    MalformedPhone(String),
    #[error("passwords do not match")]
    PasswordMismatch,
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\p{L}][\p{L}' -]*$").expect("static regex"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("static regex")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 /-]{4,22}[0-9]$").expect("static regex"))
}

/// Non-empty after trimming
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

/// A due date must parse as `YYYY-MM-DD` and be `today` or later.
pub fn validate_date(value: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required("due date"));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::MalformedDate(value.to_string()))?;
    if date < today {
        return Err(ValidationError::DateInPast(value.to_string()));
    }
    Ok(date)
}

pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    require("name", value)?;
    if name_re().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::MalformedName(value.to_string()))
    }
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    require("email", value)?;
    if email_re().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::MalformedEmail(value.to_string()))
    }
}

/// Phone is optional; when given it must look like a number.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || phone_re().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::MalformedPhone(value.to_string()))
    }
}

pub fn validate_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Required("password"));
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
