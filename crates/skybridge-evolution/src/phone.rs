//! Recipient phone-number normalization
//!
//! The gateway addresses recipients by bare digit strings. Numbers arrive
//! from user input in every imaginable shape (punctuation, trunk zeros,
//! missing country code, pre-2012 eight-digit mobile numbers), so sends
//! normalize to the Brazilian E.164-like form first. This is a
//! fixed-format heuristic, not configurable.

/// Default country code prepended to national numbers
pub const COUNTRY_CODE: &str = "55";

/// Mobile-prefix digit inserted into old-format eight-digit numbers
pub const MOBILE_PREFIX: char = '9';

/// Length of country code + area code in a normalized number
const PREFIX_LEN: usize = 4;

/// Full length of a normalized mobile number (55 + area + 9 digits)
const FULL_LEN: usize = 13;

/// Normalizes a recipient into a bare digit string the gateway accepts
///
/// Steps, in order:
/// 1. strip all non-digit characters
/// 2. strip leading trunk zeros
/// 3. collapse a duplicated country-code prefix (`5555...`)
/// 4. prepend the country code when the remainder is a national number
/// 5. insert the mobile-prefix digit into old-format numbers
pub fn normalize_recipient(input: &str) -> String {
    let mut digits: String = input.chars().filter(char::is_ascii_digit).collect();

    let trimmed = digits.trim_start_matches('0');
    digits = trimmed.to_string();

    // "5555" at the front is a doubled country code, not area code 55
    if digits.starts_with("5555") && digits.len() > FULL_LEN - 1 {
        digits = digits[COUNTRY_CODE.len()..].to_string();
    }

    if digits.len() <= 11 {
        digits = format!("{COUNTRY_CODE}{digits}");
    }

    // 55 + 2-digit area + 8 digits means the mobile prefix is missing
    if digits.starts_with(COUNTRY_CODE) && digits.len() == FULL_LEN - 1 {
        digits.insert(PREFIX_LEN, MOBILE_PREFIX);
    }

    digits
}
