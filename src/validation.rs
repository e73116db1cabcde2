use crate::data_models::{Duration, ReadingForm};
use regex::Regex;
use std::sync::LazyLock;
use validator::ValidateLength;

pub const MAX_DESCRIPTION_LENGTH: u64 = 2000;
pub const MAX_PHONE_LENGTH: u64 = 20;

pub const DURATION_REQUIRED: &str = "Duration is required";
pub const INVALID_DURATION: &str = "Please select a valid duration";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const DESCRIPTION_TOO_LONG: &str = "Description must be less than 2000 characters";
pub const PHONE_REQUIRED: &str = "Phone number is required";
pub const PHONE_TOO_LONG: &str = "Phone number must be less than 20 characters";

pub static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Checks a posted reading form and returns every problem found, in a fixed
/// order. An empty list means the form is valid.
///
/// Phone numbers only get a presence and length check since their format
/// varies too much between countries.
pub fn validate(form: &ReadingForm) -> Vec<String> {
    let mut errors = vec![];

    if is_blank(&form.duration) {
        errors.push(DURATION_REQUIRED);
    } else if form.duration.parse::<Duration>().is_err() {
        errors.push(INVALID_DURATION);
    }

    if is_blank(&form.email) {
        errors.push(EMAIL_REQUIRED);
    } else if !is_valid_email(form.email.trim()) {
        errors.push(INVALID_EMAIL);
    }

    if is_blank(&form.description) {
        errors.push(DESCRIPTION_REQUIRED);
    }
    if !form
        .description
        .validate_length(None, Some(MAX_DESCRIPTION_LENGTH), None)
    {
        errors.push(DESCRIPTION_TOO_LONG);
    }

    if is_blank(&form.phone) {
        errors.push(PHONE_REQUIRED);
    }
    if !form.phone.validate_length(None, Some(MAX_PHONE_LENGTH), None) {
        errors.push(PHONE_TOO_LONG);
    }

    errors.into_iter().map(String::from).collect()
}
