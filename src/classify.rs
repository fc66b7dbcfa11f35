//! Unit Classifier Module
//!
//! 通貨記号の文字コードから国・地域を判定するモジュール。

use crate::types::Country;

/// 文字コードと国・地域の対応表
const UNIT_TABLE: &[(u32, Country)] = &[
    (165, Country::Japan),   // ¥
    (36, Country::Usa),      // $
    (8364, Country::Europe), // €
];

/// 通貨記号の先頭文字から国・地域を判定する
///
/// 空文字列や対応表にない文字は`Country::Unknown`になります。
pub fn classify(unit: &str) -> Country {
    unit.chars()
        .next()
        .map(|c| c as u32)
        .and_then(|code| {
            UNIT_TABLE
                .iter()
                .find(|(key, _)| *key == code)
                .map(|(_, country)| *country)
        })
        .unwrap_or(Country::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_units() {
        assert_eq!(classify("¥"), Country::Japan);
        assert_eq!(classify("$"), Country::Usa);
        assert_eq!(classify("€"), Country::Europe);
    }

    #[test]
    fn test_labels() {
        assert_eq!(classify("¥").label(), "ژاپن");
        assert_eq!(classify("$").label(), "امریکا");
        assert_eq!(classify("€").label(), "اروپا");
        assert_eq!(classify("£").label(), "Unknown");
    }

    #[test]
    fn test_only_first_char_counts() {
        assert_eq!(classify("$ USD"), Country::Usa);
        assert_eq!(classify("USD $"), Country::Unknown);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(classify(""), Country::Unknown);
        assert_eq!(classify(" "), Country::Unknown);
    }
}
