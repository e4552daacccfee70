//! Synchronous form validation
//!
//! Field-by-field validators for the auth and profile forms, plus the
//! password strength classifier. Everything here is pure: the same input
//! always yields the same result, and no validator touches I/O, so the whole
//! module is testable without any async plumbing.
//!
//! Per-field error messages accumulate in [`FieldErrors`]; validating one
//! field never clears errors recorded for another field, and clearing is an
//! explicit separate action.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Accepted display-name length range.
pub const NAME_LEN_RANGE: std::ops::RangeInclusive<usize> = 2..=50;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Validate an email address.
///
/// Returns `None` when valid, or the error message to display.
pub fn validate_email(email: &str) -> Option<String> {
    if email.trim().is_empty() {
        return Some("Email is required".to_string());
    }
    if !email_pattern().is_match(email) {
        return Some("Email address is not valid".to_string());
    }
    None
}

/// Validate a password against the minimum length.
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password is required".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    None
}

/// Validate that the confirmation matches the password.
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Option<String> {
    if password != confirmation {
        return Some("Passwords do not match".to_string());
    }
    None
}

/// Validate a display name's length.
pub fn validate_name(name: &str) -> Option<String> {
    let len = name.trim().chars().count();
    if !NAME_LEN_RANGE.contains(&len) {
        return Some(format!(
            "Name must be between {} and {} characters",
            NAME_LEN_RANGE.start(),
            NAME_LEN_RANGE.end()
        ));
    }
    None
}

/// Password strength classes, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    /// Too short or a single character class
    Weak,
    /// Short but mixed, or long but monotonous
    Fair,
    /// Long and mixed
    Good,
    /// Long with lowercase, uppercase, and digits
    Strong,
}

/// Classify a password's strength from its length and character classes.
///
/// Pure and monotonic: growing the password or adding character classes never
/// lowers the classification. Anything shorter than [`MIN_PASSWORD_LEN`] is
/// always [`PasswordStrength::Weak`]; length >= 8 with lowercase, uppercase,
/// and a digit is always [`PasswordStrength::Strong`].
pub fn classify_password_strength(password: &str) -> PasswordStrength {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return PasswordStrength::Weak;
    }

    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_other = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    let classes = [has_lower, has_upper, has_digit, has_other]
        .iter()
        .filter(|&&present| present)
        .count();

    if len >= 8 && has_lower && has_upper && has_digit {
        PasswordStrength::Strong
    } else if len >= 8 && classes >= 2 {
        PasswordStrength::Good
    } else if classes >= 2 || len >= 10 {
        PasswordStrength::Fair
    } else {
        PasswordStrength::Weak
    }
}

/// Accumulated per-field validation errors
///
/// Keyed by field name; each field carries the messages recorded for it in
/// order. Fields are independent: recording or clearing one field leaves the
/// others untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a validator for one field, replacing that field's previous result.
    ///
    /// Other fields' errors are never touched.
    pub fn check(&mut self, field: &str, result: Option<String>) {
        match result {
            Some(message) => {
                self.errors.insert(field.to_string(), vec![message]);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }

    /// Append an error message to a field without replacing existing ones.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Explicitly clear one field's errors.
    pub fn clear(&mut self, field: &str) {
        self.errors.remove(field);
    }

    /// Explicitly clear all fields.
    pub fn clear_all(&mut self) {
        self.errors.clear();
    }

    /// Messages recorded for a field, in insertion order.
    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` when no field has errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fields that currently have errors, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }
}
