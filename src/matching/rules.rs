//! Business rules gating candidate pairs
//!
//! Stateless predicates evaluated on a pair before any similarity work. A
//! failing rule rejects the pair outright, which keeps the expensive
//! comparisons off the hot path for obviously different people.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Record;

lazy_static! {
    static ref FOUR_DIGIT_YEAR: Regex = Regex::new(r"\d{4}").unwrap();
}

/// Extract the first 4-digit year from a free-form date string.
pub fn extract_year(date: &str) -> Option<i32> {
    FOUR_DIGIT_YEAR.find(date).and_then(|m| m.as_str().parse().ok())
}

/// Parse a birth year that may carry a spurious fractional part: the source
/// view delivers values like `"1998.0"`. Accepted shapes are a decimal
/// digit string with an optional all-zero fraction; anything else is
/// treated as absent.
pub fn parse_jahrgang(jahrgang: &str) -> Option<i32> {
    let jahrgang = jahrgang.trim();
    let (digits, fraction) = match jahrgang.split_once('.') {
        Some((digits, fraction)) => (digits, Some(fraction)),
        None => (jahrgang, None),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(fraction) = fraction {
        if !fraction.bytes().all(|b| b == b'0') {
            return None;
        }
    }
    digits.parse().ok()
}

/// The year a record is compared under: the birth-date year when the date
/// carries one, else the parsed birth year. A parseable `geburtstag`
/// shadows that side's `jahrgang` entirely.
fn effective_year(record: &Record) -> Option<i32> {
    extract_year(&record.geburtstag).or_else(|| parse_jahrgang(&record.jahrgang))
}

/// Date rule: pass when both effective years agree or neither side has
/// one. A half-specified pair is a conflict, not a wildcard: one known and
/// one unknown year rejects the pair.
pub fn check_date_rule(a: &Record, b: &Record) -> bool {
    match (effective_year(a), effective_year(b)) {
        (Some(year_a), Some(year_b)) => year_a == year_b,
        (None, None) => true,
        _ => false,
    }
}

/// Second-name rule for compound surnames.
///
/// A surname like `Rohner-Stassek` may be stored concatenated in `name` on
/// one side and split across `name` and `name2` on the other. Two populated
/// `name2` fields must agree exactly; a single populated `name2` passes
/// only when it is the suffix of the other side's family name.
pub fn check_zweitname(a: &Record, b: &Record) -> bool {
    let name_a = a.name.trim().to_lowercase();
    let name2_a = a.name2.trim().to_lowercase();
    let name_b = b.name.trim().to_lowercase();
    let name2_b = b.name2.trim().to_lowercase();

    match (name2_a.is_empty(), name2_b.is_empty()) {
        (true, true) => true,
        (false, false) => name2_a == name2_b,
        (false, true) => name_b.ends_with(&name2_a),
        (true, false) => name_a.ends_with(&name2_b),
    }
}
