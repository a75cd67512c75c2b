//! Human-readable order identifiers.
//!
//! Identifiers look like `RT4821939052`: a fixed prefix, the low six digits of the
//! current Unix time in milliseconds and a random four digit suffix. They are short
//! enough to read over the phone but only probabilistically unique; the store's
//! unique constraint is the authority.

use rand::Rng;
use time::OffsetDateTime;

pub const ORDER_ID_PREFIX: &str = "RT";
pub const ORDER_ID_LEN: usize = 12;

const TIME_MODULUS: i128 = 1_000_000;
const SUFFIX_MIN: u16 = 1000;
const SUFFIX_MAX: u16 = 9999;

/// Generate a fresh order identifier from the wall clock and thread-local RNG.
pub fn generate_order_id() -> String {
    let suffix = rand::thread_rng().gen_range(SUFFIX_MIN..=SUFFIX_MAX);
    format_order_id(OffsetDateTime::now_utc(), suffix)
}

/// Assemble an identifier from an instant and a suffix in `1000..=9999`.
pub fn format_order_id(at: OffsetDateTime, suffix: u16) -> String {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    let low = millis.rem_euclid(TIME_MODULUS);
    let suffix = suffix.clamp(SUFFIX_MIN, SUFFIX_MAX);
    format!("{ORDER_ID_PREFIX}{low:06}{suffix}")
}
