use lazy_static::lazy_static;
use regex::Regex;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 6;

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^\S+@\S+\.\S+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checks a (trimmed) display name.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err("Name is required");
    }
    if len < NAME_MIN_CHARS {
        return Err("Name must be at least 2 characters long");
    }
    if len > NAME_MAX_CHARS {
        return Err("Name cannot exceed 50 characters");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        return Err("Email is required");
    }
    if !is_valid_email(email.trim()) {
        return Err("Please enter a valid email address");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        return Err("Password is required");
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err("Password must be at least 6 characters long");
    }
    Ok(())
}
