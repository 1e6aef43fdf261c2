//! Natural ("alphanumeric-aware") ordering.
//!
//! Every maximal run of ASCII digits is left-padded with zeros to
//! [`PAD_WIDTH`] digits, after which plain lexicographic comparison puts
//! `track2` before `track10`.

use std::cmp::Ordering;

/// Width every digit run is padded to.
pub const PAD_WIDTH: usize = 9;

/// Build the comparison key for `s`.
///
/// Runs longer than [`PAD_WIDTH`] are kept as they are.
pub fn sort_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len() + PAD_WIDTH);
    let mut digits = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        flush_digits(&mut key, &mut digits);
        key.push(c);
    }
    flush_digits(&mut key, &mut digits);
    key
}

fn flush_digits(key: &mut String, digits: &mut String) {
    if digits.is_empty() {
        return;
    }
    for _ in digits.len()..PAD_WIDTH {
        key.push('0');
    }
    key.push_str(digits);
    digits.clear();
}

/// Compare two strings in natural order.
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}
