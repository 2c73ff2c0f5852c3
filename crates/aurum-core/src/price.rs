//! # Price Cipher
//!
//! Shop-floor tags show the price as letters so customers cannot read the
//! cost at a glance, while staff who know the keyword can.
//!
//! ## How It Works
//! ```text
//! keyword:  M O N E Y T A L K S
//! digit:    0 1 2 3 4 5 6 7 8 9
//!
//! 125.50 → "12550" → O N T T M → "ONTTM"
//! ```
//!
//! The price is rendered with exactly two decimals, the separator is dropped,
//! and each digit is replaced by the keyword letter at that index. Because the
//! keyword has ten distinct letters the mapping is a bijection and
//! [`PriceCipher::decode`] can invert it.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Keyword used when none is configured.
pub const DEFAULT_PRICE_KEYWORD: &str = "MONEYTALKS";

/// Ten-letter digit substitution cipher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCipher {
    letters: [char; 10],
}

impl PriceCipher {
    /// Creates a cipher from a keyword.
    ///
    /// The keyword is uppercased and must contain exactly ten distinct ASCII
    /// letters.
    pub fn new(keyword: &str) -> CoreResult<Self> {
        let keyword = keyword.trim().to_ascii_uppercase();
        let chars: Vec<char> = keyword.chars().collect();

        if chars.len() != 10 {
            return Err(CoreError::InvalidPriceKeyword(format!(
                "expected 10 letters, got {}",
                chars.len()
            )));
        }
        if let Some(bad) = chars.iter().find(|c| !c.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidPriceKeyword(format!(
                "'{bad}' is not a letter"
            )));
        }
        for (i, c) in chars.iter().enumerate() {
            if chars[..i].contains(c) {
                return Err(CoreError::InvalidPriceKeyword(format!(
                    "letter '{c}' appears twice"
                )));
            }
        }

        let mut letters = ['A'; 10];
        letters.copy_from_slice(&chars);
        Ok(PriceCipher { letters })
    }

    /// Letter for a single digit.
    #[inline]
    pub fn letter(&self, digit: u8) -> Option<char> {
        self.letters.get(usize::from(digit)).copied()
    }

    /// Encodes a price.
    ///
    /// ## Example
    /// ```rust
    /// use aurum_core::money::Money;
    /// use aurum_core::price::PriceCipher;
    ///
    /// let cipher = PriceCipher::default();
    /// assert_eq!(cipher.codify(Money::from_cents(12550)).unwrap(), "ONTTM");
    /// ```
    pub fn codify(&self, amount: Money) -> CoreResult<String> {
        if amount.is_negative() {
            return Err(CoreError::InvalidPrice(format!(
                "cannot codify negative price {amount}"
            )));
        }

        Ok(amount
            .to_string()
            .bytes()
            .filter(u8::is_ascii_digit)
            .filter_map(|b| self.letter(b - b'0'))
            .collect())
    }

    /// Decodes a cipher string back into a price.
    ///
    /// The last two letters are the cents. Lowercase input is accepted.
    pub fn decode(&self, code: &str) -> CoreResult<Money> {
        let code = code.trim().to_ascii_uppercase();
        if code.chars().count() < 3 {
            return Err(CoreError::InvalidPrice(format!(
                "'{code}' is too short for a price with cents"
            )));
        }

        let mut cents: i64 = 0;
        for c in code.chars() {
            let digit = self
                .letters
                .iter()
                .position(|l| *l == c)
                .ok_or_else(|| CoreError::InvalidPrice(format!("'{c}' is not in the keyword")))?;
            cents = cents
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit as i64))
                .ok_or_else(|| CoreError::InvalidPrice(format!("'{code}' is too large")))?;
        }

        Ok(Money::from_cents(cents))
    }
}

impl Default for PriceCipher {
    fn default() -> Self {
        let mut letters = ['A'; 10];
        for (slot, c) in letters.iter_mut().zip(DEFAULT_PRICE_KEYWORD.chars()) {
            *slot = c;
        }
        PriceCipher { letters }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codify_default_keyword() {
        let cipher = PriceCipher::default();
        assert_eq!(cipher.codify(Money::from_cents(12550)).unwrap(), "ONTTM");
        assert_eq!(cipher.codify(Money::from_cents(0)).unwrap(), "MMM");
        assert_eq!(cipher.codify(Money::from_cents(5)).unwrap(), "MMT");
        assert_eq!(cipher.codify(Money::from_cents(98765)).unwrap(), "SKLAT");
    }

    #[test]
    fn test_codify_rejects_negative() {
        let cipher = PriceCipher::default();
        assert!(matches!(
            cipher.codify(Money::from_cents(-100)),
            Err(CoreError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_default_matches_constructor() {
        assert_eq!(
            PriceCipher::default(),
            PriceCipher::new(DEFAULT_PRICE_KEYWORD).unwrap()
        );
    }

    #[test]
    fn test_keyword_validation() {
        assert!(PriceCipher::new("SHORT").is_err());
        assert!(PriceCipher::new("MONEYTALK5").is_err());
        assert!(PriceCipher::new("MONEYMONEY").is_err());
        assert!(PriceCipher::new("  blacksmith ").is_ok());
    }

    #[test]
    fn test_cipher_is_bijection() {
        for keyword in [DEFAULT_PRICE_KEYWORD, "BLACKSMITH", "pathfinder"] {
            let cipher = PriceCipher::new(keyword).unwrap();
            let letters: Vec<char> = (0..10).filter_map(|d| cipher.letter(d)).collect();
            assert_eq!(letters.len(), 10);
            for (i, a) in letters.iter().enumerate() {
                assert!(!letters[i + 1..].contains(a), "{keyword}: {a} repeats");
            }
        }
    }

    #[test]
    fn test_no_two_digits_share_a_letter_within_one_price() {
        let cipher = PriceCipher::default();
        let amount = Money::from_cents(123_456_789_0);
        let code = cipher.codify(amount).unwrap();
        let digits: Vec<u8> = amount.to_string().bytes().filter(u8::is_ascii_digit).collect();
        for (i, a) in digits.iter().enumerate() {
            for (j, b) in digits.iter().enumerate() {
                let (la, lb) = (code.as_bytes()[i], code.as_bytes()[j]);
                assert_eq!(a == b, la == lb);
            }
        }
    }

    #[test]
    fn test_decode_inverts_codify() {
        let cipher = PriceCipher::new("BLACKSMITH").unwrap();
        for cents in [0, 5, 99, 100, 12550, 4_999_999] {
            let amount = Money::from_cents(cents);
            let code = cipher.codify(amount).unwrap();
            assert_eq!(cipher.decode(&code).unwrap(), amount);
        }
        assert_eq!(cipher.decode("lab").unwrap(), Money::from_cents(120));
        assert!(cipher.decode("ZZZ").is_err());
        assert!(cipher.decode("B").is_err());
    }
}
