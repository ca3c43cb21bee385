//! Text normalization for names, streets and postal codes
//!
//! Pure, deterministic string functions with no I/O. Every normalizer is
//! total and idempotent: applying it twice yields the same string as
//! applying it once.

use deunicode::deunicode;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Trailing house-number token, e.g. `" 12"` or `" 12a"`
    static ref TRAILING_HOUSE_NUMBER: Regex = Regex::new(r"\s+\d+[a-z]*$").unwrap();
    /// Leading house-number token, e.g. `"12a "`
    static ref LEADING_HOUSE_NUMBER: Regex = Regex::new(r"^\d+[a-z]*\s+").unwrap();
}

/// Canonical forms for trailing street suffixes. Unknown suffixes pass
/// through unchanged.
const STREET_SUFFIXES: &[(&str, &str)] = &[
    ("str.", "strasse"),
    ("straße", "strasse"),
    ("str", "strasse"),
    ("weg", "weg"),
    ("allee", "allee"),
    ("platz", "platz"),
    ("gasse", "gasse"),
    ("ring", "ring"),
];

/// Normalize a person name for comparison, blocking and phonetic seeding.
///
/// Lower-cases and trims, folds the eszett and the German umlauts to their
/// ASCII digraphs so that `Müller` and `Mueller` collapse to the same
/// string, strips any remaining diacritics and collapses whitespace runs.
pub fn normalize_name(name: &str) -> String {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return String::new();
    }

    // Digraph folding must run before the generic diacritic fold, which
    // would otherwise turn `ü` into a bare `u`.
    let name = name
        .replace('ß', "ss")
        .replace('ü', "ue")
        .replace('ä', "ae")
        .replace('ö', "oe");

    collapse_whitespace(&deunicode(&name).to_lowercase())
}

/// Normalize a street for blocking.
///
/// Applies the name normalization, strips a house-number token from either
/// end, drops everything but letters and spaces, and finally canonicalizes
/// a fixed set of trailing suffixes (`hauptstr.` and `hauptstr` both come
/// out as `hauptstrasse`). The suffix step runs last, on the letters-only
/// form, so the function is idempotent on its own output.
pub fn normalize_street(street: &str) -> String {
    let street = normalize_name(street);
    if street.is_empty() {
        return street;
    }

    let street = TRAILING_HOUSE_NUMBER.replace(&street, "").into_owned();
    let street = LEADING_HOUSE_NUMBER.replace(&street, "").into_owned();
    let street: String = street
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == ' ')
        .collect();

    canonicalize_street_suffix(&collapse_whitespace(&street))
}

/// Normalize a postal code: keep digits only, pad left with zeros to five
/// places, truncate to the first five. Input without any digit yields the
/// empty string, so address-less records fall through to the fallback
/// blocking keys instead of sharing a zero-padded bucket.
pub fn normalize_plz(plz: &str) -> String {
    let digits: String = plz.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    let mut plz = format!("{digits:0>5}");
    plz.truncate(5);
    plz
}

fn canonicalize_street_suffix(street: &str) -> String {
    for (suffix, canonical) in STREET_SUFFIXES {
        if let Some(stem) = street.strip_suffix(suffix) {
            return format!("{stem}{canonical}");
        }
    }
    street.to_string()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_umlaut_variants_collapse() {
        assert_eq!(normalize_name("Müller"), "mueller");
        assert_eq!(normalize_name("Mueller"), "mueller");
        assert_eq!(normalize_name("GRÖSSER"), "groesser");
        assert_eq!(normalize_name("Weiß"), "weiss");
        assert_eq!(normalize_name("Bäcker"), normalize_name("Baecker"));
    }

    #[test]
    fn test_name_diacritics_and_whitespace() {
        assert_eq!(normalize_name("  José   García "), "jose garcia");
        assert_eq!(normalize_name("René"), "rene");
        assert_eq!(normalize_name("\t \n"), "");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_name_normalization_is_idempotent() {
        for raw in ["Müller", "  José   García ", "Weißöäü", "12345", "ŁukАsz"] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_street_suffix_canonicalization() {
        assert_eq!(normalize_street("Hauptstr."), "hauptstrasse");
        assert_eq!(normalize_street("Hauptstr"), "hauptstrasse");
        assert_eq!(normalize_street("Hauptstraße"), "hauptstrasse");
        assert_eq!(normalize_street("Hauptstrasse"), "hauptstrasse");
        assert_eq!(normalize_street("Lindenweg"), "lindenweg");
        assert_eq!(normalize_street("Am Ring"), "am ring");
    }

    #[test]
    fn test_street_house_numbers_are_stripped() {
        assert_eq!(normalize_street("Hauptstr. 12"), "hauptstrasse");
        assert_eq!(normalize_street("Hauptstrasse 12a"), "hauptstrasse");
        assert_eq!(normalize_street("12a Hauptstrasse"), "hauptstrasse");
        // A glued house number has no separating whitespace and is removed
        // by the letter filter instead.
        assert_eq!(normalize_street("Lindenweg3"), "lindenweg");
    }

    #[test]
    fn test_street_normalization_is_idempotent() {
        for raw in ["Hauptstr. 12", "Bahnhofstr,", "Müllerstraße 7b", "9 Am Ring"] {
            let once = normalize_street(raw);
            assert_eq!(normalize_street(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_street_empty_and_digits_only() {
        assert_eq!(normalize_street(""), "");
        assert_eq!(normalize_street("   "), "");
        assert_eq!(normalize_street("12345"), "");
    }

    #[test]
    fn test_plz_padding_and_truncation() {
        assert_eq!(normalize_plz("123"), "00123");
        assert_eq!(normalize_plz("80480"), "80480");
        assert_eq!(normalize_plz("804800"), "80480");
        assert_eq!(normalize_plz("D-80480"), "80480");
        assert_eq!(normalize_plz(" 8048 "), "08048");
    }

    #[test]
    fn test_plz_without_digits_stays_empty() {
        assert_eq!(normalize_plz(""), "");
        assert_eq!(normalize_plz("unbekannt"), "");
        assert_eq!(normalize_plz(" - "), "");
    }

    #[test]
    fn test_plz_is_idempotent() {
        for raw in ["123", "804800", "", "abc"] {
            let once = normalize_plz(raw);
            assert_eq!(normalize_plz(&once), once);
        }
    }
}
