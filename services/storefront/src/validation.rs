//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Minimum password length accepted at login and registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum display name length accepted at registration
pub const MIN_NAME_LENGTH: usize = 2;

/// Trim a submitted form field, treating a missing field as empty
pub fn sanitize(input: Option<&str>) -> String {
    input.map(str::trim).unwrap_or_default().to_string()
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format.".to_string());
    }

    Ok(())
}

/// Validate the password length rule shared by login and registration
pub fn validate_password_length(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!("Password must be at least {MIN_PASSWORD_LENGTH} characters."));
    }

    Ok(())
}

/// Validate the registration password mix: one lowercase, one uppercase, one digit
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        }
    }

    if !(has_upper && has_lower && has_digit) {
        return Err(
            "Password must contain an uppercase letter, a lowercase letter, and a digit."
                .to_string(),
        );
    }

    Ok(())
}

/// Validate display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(format!("Name must be at least {MIN_NAME_LENGTH} characters."));
    }

    Ok(())
}

/// Strip whitespace and hyphens from a phone number
pub fn normalize_phone_number(phone_number: &str) -> String {
    phone_number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Validate an Indonesian mobile number (`+62`, `62` or `0` prefix, then 9-13 digits)
pub fn validate_phone_number(phone_number: &str) -> Result<(), String> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^(\+62|62|0)[0-9]{9,13}$").expect("Failed to compile phone regex")
    });

    if !regex.is_match(&normalize_phone_number(phone_number)) {
        return Err(
            "Invalid phone number format. Use an Indonesian number (08xxxxxxxxxx).".to_string(),
        );
    }

    Ok(())
}
