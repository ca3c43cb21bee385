//! Cologne Phonetic coding for German name tokens

use rphonetic::{Cologne, Encoder};

/// Compute the Cologne Phonetic code of a name token.
///
/// Empty or whitespace-only input yields the empty code. Equality of two
/// non-empty codes indicates phonetic similarity under German orthography;
/// the digit string itself is opaque to callers.
pub fn cologne_code(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return String::new();
    }
    Cologne.encode(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_code() {
        assert_eq!(cologne_code(""), "");
        assert_eq!(cologne_code("   "), "");
        assert_eq!(cologne_code("\t\n"), "");
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(cologne_code("Müller-Lüdenscheidt"), "65752682");
        assert_eq!(cologne_code("Meyer"), "67");
    }

    #[test]
    fn test_spelling_variants_share_a_code() {
        assert_eq!(cologne_code("Müller"), cologne_code("Mueller"));
        assert_eq!(cologne_code("Meyer"), cologne_code("Maier"));
        assert_eq!(cologne_code("Schmidt"), cologne_code("Schmitt"));
        assert_eq!(cologne_code("Christoph"), cologne_code("Kristof"));
    }

    #[test]
    fn test_different_names_differ() {
        assert_ne!(cologne_code("Müller"), cologne_code("Schulze"));
    }
}
