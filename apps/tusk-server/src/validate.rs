//! Request field validation rules.
//!
//! Signup and task fields are validated here, before any store access.
//! Messages for failed rules live with the handlers; these functions only
//! answer yes or no.

use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{5,20}$").expect("username regex"));
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").expect("name regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// 5-20 ASCII letters and digits.
pub fn valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// ASCII letters only, non-empty.
pub fn valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 6-20 characters with at least one digit, one lowercase and one uppercase
/// letter.
pub fn valid_password(password: &str) -> bool {
    let len = password.chars().count();
    (6..=20).contains(&len)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
}

/// Titles must have visible content once trimmed.
pub fn valid_title(title: &str) -> bool {
    !title.trim().is_empty()
}
