//! Phone and email rules. Whole-string matches, compiled once and shared by all workers.

use regex::Regex;
use std::sync::OnceLock;

use crate::InvalidReason;

static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

/// Optional 3-digit area code, then 3 + 4 digits, each group optionally preceded by `-` or space.
fn phone_regex() -> &'static Regex {
    PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^([0-9]{3})?[- ]?([0-9]{3})[- ]?([0-9]{4})$").expect("valid phone regex")
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
    })
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn is_valid_customer(email: &str, phone: &str) -> bool {
    classify(email, phone).is_none()
}

/// Evaluate both rules independently. `None` means valid.
pub fn classify(email: &str, phone: &str) -> Option<InvalidReason> {
    match (is_valid_phone(phone), is_valid_email(email)) {
        (true, true) => None,
        (false, true) => Some(InvalidReason::Phone),
        (true, false) => Some(InvalidReason::Email),
        (false, false) => Some(InvalidReason::PhoneAndEmail),
    }
}
