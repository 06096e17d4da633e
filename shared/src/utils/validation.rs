//! Credential input validation

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length (bcrypt only reads 72 bytes)
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Nickname length bounds
pub const MIN_NICKNAME_LENGTH: usize = 3;
pub const MAX_NICKNAME_LENGTH: usize = 32;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

static NICKNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("nickname regex is valid"));

/// Lower-cases and trims an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks the general shape of an email address
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Checks nickname length and alphabet.
///
/// Nicknames never contain `@`; login identifiers with `@` are always
/// treated as emails.
pub fn is_valid_nickname(nickname: &str) -> bool {
    let len = nickname.chars().count();
    (MIN_NICKNAME_LENGTH..=MAX_NICKNAME_LENGTH).contains(&len) && NICKNAME_REGEX.is_match(nickname)
}

/// Checks password length bounds
pub fn is_valid_password(password: &str) -> bool {
    (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&password.len())
}

/// True when a login identifier should be resolved as an email
pub fn is_email_identifier(identifier: &str) -> bool {
    identifier.contains('@')
}
