//! # SKU Codec
//!
//! Decomposes a flat product code into master SKU, finish and stone, and
//! composes it back.
//!
//! ## Decode Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw "δα100χκρχ"                                                         │
//! │       │ normalize_code (trim, Greek layout → Latin, uppercase)          │
//! │       ▼                                                                 │
//! │  "DA100XKRX"                                                            │
//! │       │ Catalog::longest_master_prefix  (DA10 and DA100 both match)     │
//! │       ▼                                                                 │
//! │  master DA100 (women)      suffix "XKRX"                                │
//! │       │ leading finish      "X"  → Gold plated                          │
//! │       │ longest stone code  "KRX" → Rock Crystal  (not "KR" + "X")      │
//! │       ▼                                                                 │
//! │  DecodedSku { DA100, X, KRX, residue: None }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Finish-First Split
//! A suffix that starts with a finish letter is first read as
//! `finish + stone`. If that leaves residue but reading the whole suffix as a
//! stone does not, the stone reading wins (men's `HEM` is Hematite, not
//! Platinum + "EM"). When neither reading is clean, the finish-first reading
//! is kept and its leftover characters are reported as residue.

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::barcode::normalize_code;
use crate::catalog::{Catalog, Product};
use crate::error::{CoreError, CoreResult};
use crate::tables::{finish_name, leading_finish, lustre_name, Gender, StoneTable};

// =============================================================================
// Components
// =============================================================================

/// Finish part of a decoded code. Empty code = lustre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinishComponent {
    pub code: String,
    pub display_name: String,
}

impl FinishComponent {
    pub fn lustre() -> Self {
        FinishComponent {
            code: String::new(),
            display_name: lustre_name().to_string(),
        }
    }
}

/// Stone part of a decoded code. Empty code = no stone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoneComponent {
    pub code: String,
    pub display_name: String,
}

impl StoneComponent {
    pub fn none() -> Self {
        StoneComponent {
            code: String::new(),
            display_name: String::new(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.code.is_empty()
    }
}

/// Result of decoding a code against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DecodedSku {
    /// Master SKU (exists in the catalog).
    pub master: String,
    /// Gender of the matched product, which selected the stone table.
    pub gender: Gender,
    pub finish: FinishComponent,
    pub stone: StoneComponent,
    /// Characters neither table recognized, kept verbatim for display.
    pub residue: Option<String>,
}

impl DecodedSku {
    /// Suffix as stored on variants and batches: finish + stone + residue.
    pub fn suffix(&self) -> String {
        let mut suffix = String::new();
        suffix.push_str(&self.finish.code);
        suffix.push_str(&self.stone.code);
        if let Some(residue) = &self.residue {
            suffix.push_str(residue);
        }
        suffix
    }

    /// Full code, equal to the normalized input.
    pub fn code(&self) -> String {
        format!("{}{}", self.master, self.suffix())
    }

    pub fn has_residue(&self) -> bool {
        self.residue.is_some()
    }

    /// Human-readable label, e.g. `DA050 · Gold plated · Coral`.
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.master.clone(), self.finish.display_name.clone()];
        if !self.stone.is_none() {
            parts.push(self.stone.display_name.clone());
        }
        if let Some(residue) = &self.residue {
            parts.push(format!("?{residue}"));
        }
        parts.join(" · ")
    }
}

// =============================================================================
// Codec
// =============================================================================

/// Decodes a typed or scanned code.
///
/// ## Errors
/// - `UnrecognizedCode` when no catalog master is a prefix of the code
///
/// Residue is not an error here: it is logged and returned on the result.
/// Use [`decode_strict`] to reject it.
///
/// ## Example
/// ```rust,ignore
/// let decoded = decode("DA100X", &catalog)?;
/// assert_eq!(decoded.master, "DA100");
/// assert_eq!(decoded.finish.code, "X");
/// ```
pub fn decode(raw_code: &str, catalog: &Catalog) -> CoreResult<DecodedSku> {
    let code = normalize_code(raw_code);

    let product = catalog
        .longest_master_prefix(&code)
        .ok_or_else(|| CoreError::UnrecognizedCode(code.clone()))?;

    let suffix = &code[product.sku.len()..];
    let decoded = decompose(product, suffix);

    if let Some(residue) = &decoded.residue {
        warn!(
            code = %code,
            master = %decoded.master,
            residue = %residue,
            "Code has unrecognized suffix residue"
        );
    }

    Ok(decoded)
}

/// Like [`decode`] but fails with `AmbiguousResidue` instead of keeping residue.
pub fn decode_strict(raw_code: &str, catalog: &Catalog) -> CoreResult<DecodedSku> {
    let decoded = decode(raw_code, catalog)?;
    match decoded.residue {
        Some(residue) => Err(CoreError::AmbiguousResidue {
            code: decoded.master + &decoded.finish.code + &decoded.stone.code + &residue,
            residue,
        }),
        None => Ok(decoded),
    }
}

/// Composes a code. Left inverse of [`decode`] for every code built from
/// catalog masters and table codes.
pub fn encode(master: &str, finish_code: &str, stone_code: &str) -> String {
    let mut code = String::with_capacity(master.len() + finish_code.len() + stone_code.len());
    code.push_str(master);
    code.push_str(finish_code);
    code.push_str(stone_code);
    code
}

/// Splits a suffix into finish, stone and residue for one product.
fn decompose(product: &Product, suffix: &str) -> DecodedSku {
    let stones = StoneTable::for_gender(product.gender);

    let finish_first = leading_finish(suffix).map(|(code, name)| {
        let (stone, residue) = split_stone(stones, &suffix[code.len()..]);
        (
            FinishComponent {
                code: code.to_string(),
                display_name: name.to_string(),
            },
            stone,
            residue,
        )
    });

    let (finish, stone, residue) = match finish_first {
        Some(reading) if reading.2.is_none() => reading,
        Some(reading) => {
            let (stone, residue) = split_stone(stones, suffix);
            if residue.is_none() {
                (FinishComponent::lustre(), stone, None)
            } else {
                reading
            }
        }
        None => {
            let (stone, residue) = split_stone(stones, suffix);
            (FinishComponent::lustre(), stone, residue)
        }
    };

    DecodedSku {
        master: product.sku.clone(),
        gender: product.gender,
        finish,
        stone,
        residue,
    }
}

/// Matches the longest stone code at the start of `rest`; the tail is residue.
fn split_stone(stones: &StoneTable, rest: &str) -> (StoneComponent, Option<String>) {
    if rest.is_empty() {
        return (StoneComponent::none(), None);
    }

    match stones.longest_prefix(rest) {
        Some((code, name)) => {
            let tail = &rest[code.len()..];
            (
                StoneComponent {
                    code: code.to_string(),
                    display_name: name.to_string(),
                },
                (!tail.is_empty()).then(|| tail.to_string()),
            )
        }
        None => (StoneComponent::none(), Some(rest.to_string())),
    }
}

/// Validates that a finish code exists. Used when composing codes from UI pickers.
pub fn is_known_finish(code: &str) -> bool {
    finish_name(code).is_some()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::catalog;
    use crate::tables::FINISHES;

    #[test]
    fn test_longest_master_wins() {
        let catalog = catalog();
        let decoded = decode("DA100X", &catalog).unwrap();
        assert_eq!(decoded.master, "DA100");
        assert_eq!(decoded.suffix(), "X");
        assert_eq!(decoded.finish.display_name, "Gold plated");
        assert!(decoded.stone.is_none());
    }

    #[test]
    fn test_shorter_master_still_matches() {
        let catalog = catalog();
        let decoded = decode("DA10XKR", &catalog).unwrap();
        assert_eq!(decoded.master, "DA10");
        assert_eq!(decoded.finish.code, "X");
        assert_eq!(decoded.stone.code, "KR");
        assert_eq!(decoded.stone.display_name, "Coral");
    }

    #[test]
    fn test_unrecognized_code() {
        let catalog = catalog();
        assert_eq!(
            decode("ZZ999", &catalog),
            Err(CoreError::UnrecognizedCode("ZZ999".to_string()))
        );
        assert!(decode("", &catalog).is_err());
    }

    #[test]
    fn test_longest_stone_code_wins() {
        let catalog = catalog();
        let decoded = decode("DA100XKRX", &catalog).unwrap();
        assert_eq!(decoded.finish.code, "X");
        assert_eq!(decoded.stone.code, "KRX");
        assert_eq!(decoded.residue, None);
    }

    #[test]
    fn test_gender_selects_stone_table() {
        let catalog = catalog();
        let women = decode("DA050XKR", &catalog).unwrap();
        assert_eq!(women.stone.display_name, "Coral");

        let men = decode("MR220XKR", &catalog).unwrap();
        assert_eq!(men.gender, Gender::Men);
        assert_eq!(men.stone.display_name, "Carnelian");
    }

    #[test]
    fn test_stone_starting_with_finish_letter() {
        let catalog = catalog();
        // Men's HEM is Hematite; "H" + "EM" would leave residue for men.
        let decoded = decode("MR220HEM", &catalog).unwrap();
        assert_eq!(decoded.finish.code, "");
        assert_eq!(decoded.stone.code, "HEM");
        assert_eq!(decoded.residue, None);

        // Women's PRL is Pearl, and "P" + "PRL" is Patina + Pearl.
        let decoded = decode("DA050PPRL", &catalog).unwrap();
        assert_eq!(decoded.finish.code, "P");
        assert_eq!(decoded.stone.code, "PRL");
    }

    #[test]
    fn test_residue_is_preserved() {
        let catalog = catalog();
        let decoded = decode("DA050XKRQQ", &catalog).unwrap();
        assert_eq!(decoded.finish.code, "X");
        assert_eq!(decoded.stone.code, "KR");
        assert_eq!(decoded.residue.as_deref(), Some("QQ"));
        assert_eq!(decoded.suffix(), "XKRQQ");
        assert_eq!(decoded.code(), "DA050XKRQQ");

        let decoded = decode("DA050Q", &catalog).unwrap();
        assert_eq!(decoded.finish.code, "");
        assert!(decoded.stone.is_none());
        assert_eq!(decoded.residue.as_deref(), Some("Q"));
    }

    #[test]
    fn test_decode_strict_rejects_residue() {
        let catalog = catalog();
        assert!(decode_strict("DA050XKR", &catalog).is_ok());
        assert_eq!(
            decode_strict("DA050XKRQQ", &catalog),
            Err(CoreError::AmbiguousResidue {
                code: "DA050XKRQQ".to_string(),
                residue: "QQ".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_normalizes_input() {
        let catalog = catalog();
        // Greek keyboard layout, lowercase, stray whitespace
        let decoded = decode("  δα050χκρ\n", &catalog).unwrap();
        assert_eq!(decoded.code(), "DA050XKR");
    }

    #[test]
    fn test_display_name() {
        let catalog = catalog();
        let decoded = decode("DA050XKR", &catalog).unwrap();
        assert_eq!(decoded.display_name(), "DA050 · Gold plated · Coral");
        let decoded = decode("DA050", &catalog).unwrap();
        assert_eq!(decoded.display_name(), "DA050 · Lustre");
    }

    #[test]
    fn test_round_trip_over_tables() {
        let catalog = catalog();
        for product in catalog.iter() {
            let stones = StoneTable::for_gender(product.gender);
            let stone_codes = std::iter::once("").chain(stones.entries().iter().map(|(c, _)| *c));
            for stone in stone_codes {
                for (finish, _) in FINISHES {
                    let code = encode(&product.sku, finish, stone);
                    let decoded = decode(&code, &catalog).unwrap();
                    assert_eq!(decoded.master, product.sku, "{code}");
                    assert_eq!(decoded.finish.code, *finish, "{code}");
                    assert_eq!(decoded.stone.code, stone, "{code}");
                    assert_eq!(decoded.residue, None, "{code}");
                }
            }
        }
    }

    #[test]
    fn test_is_known_finish() {
        assert!(is_known_finish(""));
        assert!(is_known_finish("D"));
        assert!(!is_known_finish("Z"));
    }
}
