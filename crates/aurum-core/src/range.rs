//! # Range Expander
//!
//! Expands compact SKU ranges typed into print and stock screens.
//!
//! ```text
//! "DA050-DA053"    → DA050, DA051, DA052, DA053
//! "DA098-DA101X"   → DA098X, DA099X, DA100X, DA101X   (suffix from end token)
//! "DA050"          → DA050
//! "AB\-12"         → AB-12                             (escaped hyphen)
//! ```
//!
//! Each side of a range is read as `PREFIX DIGITS [LETTERS]`. The numeric
//! width of the start side sets the zero padding of every generated SKU.

use crate::error::{CoreError, CoreResult};

/// Default ceiling on how many SKUs one expansion may produce.
pub const DEFAULT_MAX_RANGE: usize = 500;

/// Expands single range tokens and comma-separated lists of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeExpander {
    max_items: usize,
}

impl Default for RangeExpander {
    fn default() -> Self {
        RangeExpander {
            max_items: DEFAULT_MAX_RANGE,
        }
    }
}

/// One side of a range, split into its parts.
#[derive(Debug, PartialEq, Eq)]
struct RangeSide<'a> {
    prefix: &'a str,
    digits: &'a str,
    number: u64,
    suffix: &'a str,
}

impl RangeExpander {
    /// Creates an expander with a custom ceiling.
    pub fn with_limit(max_items: usize) -> Self {
        RangeExpander { max_items }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Expands one token.
    ///
    /// ## Errors
    /// - `MismatchedRangePrefix` when the alphabetic prefixes differ
    /// - `InvalidRangeOrder` when the end number is below the start number
    /// - `RangeTooLarge` when the inclusive count exceeds the ceiling
    /// - `InvalidRangeToken` when a side has no numeric part
    ///
    /// ## Example
    /// ```rust
    /// use aurum_core::range::RangeExpander;
    ///
    /// let skus = RangeExpander::default().expand("DA050-DA052").unwrap();
    /// assert_eq!(skus, vec!["DA050", "DA051", "DA052"]);
    /// ```
    pub fn expand(&self, token: &str) -> CoreResult<Vec<String>> {
        let token = token.trim().to_ascii_uppercase();
        if token.is_empty() {
            return Ok(Vec::new());
        }

        let Some((start, end)) = split_unescaped_hyphen(&token) else {
            return Ok(vec![token.replace("\\-", "-")]);
        };

        let start_side = parse_side(start.trim())?;
        let end_side = parse_side(end.trim())?;

        if start_side.prefix != end_side.prefix {
            return Err(CoreError::MismatchedRangePrefix {
                start: start_side.prefix.to_string(),
                end: end_side.prefix.to_string(),
            });
        }

        if !start_side.suffix.is_empty() && start_side.suffix != end_side.suffix {
            return Err(CoreError::InvalidRangeToken {
                token: token.clone(),
                reason: format!(
                    "start suffix '{}' differs from end suffix '{}'",
                    start_side.suffix, end_side.suffix
                ),
            });
        }

        if end_side.number < start_side.number {
            return Err(CoreError::InvalidRangeOrder {
                start: start_side.number,
                end: end_side.number,
            });
        }

        // A span of u64::MAX has no representable count; saturate it.
        let count = (end_side.number - start_side.number).saturating_add(1);
        if count > self.max_items as u64 || count == u64::MAX {
            return Err(CoreError::RangeTooLarge {
                count,
                max: self.max_items,
            });
        }

        let width = start_side.digits.len();
        Ok((start_side.number..=end_side.number)
            .map(|n| {
                format!(
                    "{}{:0width$}{}",
                    start_side.prefix,
                    n,
                    end_side.suffix,
                    width = width
                )
            })
            .collect())
    }

    /// Expands a comma/whitespace separated list of tokens.
    ///
    /// Results keep input order with duplicates removed. The ceiling applies
    /// to the combined list.
    pub fn expand_list(&self, input: &str) -> CoreResult<Vec<String>> {
        let mut skus: Vec<String> = Vec::new();

        for token in input
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            for sku in self.expand(token)? {
                if !skus.contains(&sku) {
                    skus.push(sku);
                }
            }
            if skus.len() > self.max_items {
                return Err(CoreError::RangeTooLarge {
                    count: skus.len() as u64,
                    max: self.max_items,
                });
            }
        }

        Ok(skus)
    }
}

/// Splits at the first `-` not preceded by a backslash.
fn split_unescaped_hyphen(token: &str) -> Option<(&str, &str)> {
    let bytes = token.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|&(i, &b)| b == b'-' && (i == 0 || bytes[i - 1] != b'\\'))
        .map(|(i, _)| (&token[..i], &token[i + 1..]))
}

fn parse_side(side: &str) -> CoreResult<RangeSide<'_>> {
    let invalid = |reason: &str| CoreError::InvalidRangeToken {
        token: side.to_string(),
        reason: reason.to_string(),
    };

    let without_suffix = side.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let suffix = &side[without_suffix.len()..];

    let prefix = without_suffix.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &without_suffix[prefix.len()..];

    if digits.is_empty() {
        return Err(invalid("missing numeric part"));
    }

    let number = digits
        .parse::<u64>()
        .map_err(|_| invalid("numeric part is too large"))?;

    Ok(RangeSide {
        prefix,
        digits,
        number,
        suffix,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_range() {
        let skus = RangeExpander::default().expand("DA050-DA063").unwrap();
        assert_eq!(skus.len(), 14);
        assert_eq!(skus.first().map(String::as_str), Some("DA050"));
        assert_eq!(skus.last().map(String::as_str), Some("DA063"));
        assert!(skus.iter().all(|s| s.len() == 5));
        assert_eq!(skus[9], "DA059");
    }

    #[test]
    fn test_plain_sku_is_single_item() {
        let expander = RangeExpander::default();
        assert_eq!(expander.expand("DA050").unwrap(), vec!["DA050"]);
        assert_eq!(expander.expand(" da050x ").unwrap(), vec!["DA050X"]);
        assert_eq!(expander.expand("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_escaped_hyphen_is_literal() {
        let expander = RangeExpander::default();
        assert_eq!(expander.expand("AB\\-12").unwrap(), vec!["AB-12"]);
    }

    #[test]
    fn test_mismatched_prefix() {
        let result = RangeExpander::default().expand("DA050-XR063");
        assert_eq!(
            result,
            Err(CoreError::MismatchedRangePrefix {
                start: "DA".to_string(),
                end: "XR".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_order() {
        let result = RangeExpander::default().expand("DA063-DA050");
        assert_eq!(result, Err(CoreError::InvalidRangeOrder { start: 63, end: 50 }));
    }

    #[test]
    fn test_range_too_large() {
        let result = RangeExpander::default().expand("DA0000-DA0500");
        assert_eq!(result, Err(CoreError::RangeTooLarge { count: 501, max: 500 }));

        let skus = RangeExpander::default().expand("DA0001-DA0500").unwrap();
        assert_eq!(skus.len(), 500);

        let result = RangeExpander::with_limit(3).expand("DA1-DA4");
        assert!(matches!(result, Err(CoreError::RangeTooLarge { .. })));
    }

    #[test]
    fn test_full_u64_span_is_too_large() {
        let result = RangeExpander::default().expand("A0-A18446744073709551615");
        assert_eq!(
            result,
            Err(CoreError::RangeTooLarge {
                count: u64::MAX,
                max: 500
            })
        );

        let result = RangeExpander::with_limit(usize::MAX).expand("A0-A18446744073709551615");
        assert!(matches!(result, Err(CoreError::RangeTooLarge { .. })));

        let result = RangeExpander::default().expand("A1-A18446744073709551615");
        assert!(matches!(result, Err(CoreError::RangeTooLarge { .. })));
    }

    #[test]
    fn test_suffix_copied_from_end_token() {
        let skus = RangeExpander::default().expand("DA098-DA101X").unwrap();
        assert_eq!(skus, vec!["DA098X", "DA099X", "DA100X", "DA101X"]);

        let skus = RangeExpander::default().expand("DA098XK-DA099XK").unwrap();
        assert_eq!(skus, vec!["DA098XK", "DA099XK"]);

        assert!(matches!(
            RangeExpander::default().expand("DA098H-DA099X"),
            Err(CoreError::InvalidRangeToken { .. })
        ));
    }

    #[test]
    fn test_padding_follows_start_width() {
        let skus = RangeExpander::default().expand("R8-R11").unwrap();
        assert_eq!(skus, vec!["R8", "R9", "R10", "R11"]);

        let skus = RangeExpander::default().expand("R008-R11").unwrap();
        assert_eq!(skus, vec!["R008", "R009", "R010", "R011"]);
    }

    #[test]
    fn test_side_without_digits() {
        assert!(matches!(
            RangeExpander::default().expand("DA-DB"),
            Err(CoreError::InvalidRangeToken { .. })
        ));
    }

    #[test]
    fn test_expand_list() {
        let expander = RangeExpander::default();
        let skus = expander.expand_list("DA050-DA052, XR001 DA051;MR220").unwrap();
        assert_eq!(skus, vec!["DA050", "DA051", "DA052", "XR001", "MR220"]);

        let result = RangeExpander::with_limit(4).expand_list("DA1-DA3, DA7-DA8");
        assert!(matches!(result, Err(CoreError::RangeTooLarge { count: 5, max: 4 })));
    }
}
