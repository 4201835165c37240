//! Email address syntax checks.
//!
//! # Invariants
//! - The address is split at the last `@`; both halves must be non-empty.
//! - Non-ASCII domains are checked in their IDNA (punycode) form.

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;

const MAX_EMAIL_CHARS: usize = 320;
const DOMAIN_ALLOWLIST: &[&str] = &["localhost"];

// Dot-atom or quoted-string local part.
static USER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r##"(?i)^(?:[-!#$%&'*+/=?^_`{}|~0-9a-z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9a-z]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")\z"##,
    )
    .expect("valid email user regex")
});

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9-]{2,63}\z")
        .expect("valid email domain regex")
});

static LITERAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[([a-f0-9:.]+)\]\z").expect("valid ip literal regex"));

/// Returns whether `value` is a syntactically valid email address.
///
/// Callers are expected to trim surrounding whitespace first; embedded
/// whitespace is rejected.
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.chars().count() > MAX_EMAIL_CHARS {
        return false;
    }

    let Some((user_part, domain_part)) = value.rsplit_once('@') else {
        return false;
    };

    if !USER_RE.is_match(user_part) {
        return false;
    }

    is_valid_domain(domain_part)
}

fn is_valid_domain(domain: &str) -> bool {
    if DOMAIN_ALLOWLIST
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(domain))
    {
        return true;
    }

    if is_valid_hostname(domain) || is_valid_ip_literal(domain) {
        return true;
    }

    !domain.is_ascii()
        && idna::domain_to_ascii(domain).is_ok_and(|ascii| is_valid_hostname(&ascii))
}

fn is_valid_hostname(domain: &str) -> bool {
    // The top-level label may contain hyphens but must not end with one.
    DOMAIN_RE.is_match(domain) && !domain.ends_with('-')
}

fn is_valid_ip_literal(domain: &str) -> bool {
    LITERAL_RE
        .captures(domain)
        .and_then(|caps| caps.get(1))
        .is_some_and(|literal| literal.as_str().parse::<IpAddr>().is_ok())
}
