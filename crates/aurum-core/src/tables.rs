//! # Code Tables
//!
//! Static lookup tables for finish and stone codes.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Code Tables                                    │
//! │                                                                         │
//! │  FINISHES (gender-independent)     STONES (tagged by Gender)            │
//! │  ─────────────────────────────     ─────────────────────────────        │
//! │  ""  → Lustre                      Men   → { KR → Carnelian, ... }      │
//! │  "X" → Gold plated                 Women → { KR → Coral, ... }          │
//! │  "H" → Platinum plated                                                  │
//! │  "D" → Two-tone                    Same code, different stone:          │
//! │  "P" → Patina                      the product's gender decides.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tables are `static` slices: built into the binary, shared by every
//! thread, and impossible to mutate at runtime.
//!
//! ## Table Invariant
//! No stone code may equal a finish letter followed by another stone code of
//! the same gender. Otherwise `finish + stone` and `stone` would encode to the
//! same string and decoding could not tell them apart.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Gender
// =============================================================================

/// Catalog gender. Selects which stone table applies to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Raw Tables
// =============================================================================

/// Finish codes. The empty code is the default lustre finish.
pub static FINISHES: &[(&str, &str)] = &[
    ("", "Lustre"),
    ("X", "Gold plated"),
    ("H", "Platinum plated"),
    ("D", "Two-tone"),
    ("P", "Patina"),
];

static STONES_MEN: &[(&str, &str)] = &[
    ("BLK", "Black Agate"),
    ("CZ", "Black Zirconia"),
    ("HEM", "Hematite"),
    ("JAS", "Jasper"),
    ("KR", "Carnelian"),
    ("LAP", "Lapis Lazuli"),
    ("LV", "Lava Stone"),
    ("MAL", "Malachite"),
    ("OB", "Obsidian"),
    ("ONX", "Onyx"),
    ("SOD", "Sodalite"),
    ("TG", "Tiger's Eye"),
    ("TRQ", "Turquoise"),
];

static STONES_WOMEN: &[(&str, &str)] = &[
    ("AM", "Amethyst"),
    ("AQ", "Aquamarine"),
    ("CIT", "Citrine"),
    ("CZ", "Cubic Zirconia"),
    ("EM", "Emerald"),
    ("GAR", "Garnet"),
    ("KR", "Coral"),
    ("KRX", "Rock Crystal"),
    ("LAP", "Lapis Lazuli"),
    ("MAL", "Malachite"),
    ("MOP", "Mother of Pearl"),
    ("ONX", "Onyx"),
    ("PER", "Peridot"),
    ("PRL", "Pearl"),
    ("RUB", "Ruby"),
    ("SAP", "Sapphire"),
    ("TG", "Tiger's Eye"),
    ("TRQ", "Turquoise"),
];

/// Longest stone code in either table.
pub const MAX_STONE_CODE_LEN: usize = 3;

// =============================================================================
// Lookup API
// =============================================================================

/// A stone table for one gender.
#[derive(Debug, Clone, Copy)]
pub struct StoneTable {
    gender: Gender,
    entries: &'static [(&'static str, &'static str)],
}

static MEN_TABLE: StoneTable = StoneTable {
    gender: Gender::Men,
    entries: STONES_MEN,
};

static WOMEN_TABLE: StoneTable = StoneTable {
    gender: Gender::Women,
    entries: STONES_WOMEN,
};

impl StoneTable {
    /// Returns the table for a gender.
    pub fn for_gender(gender: Gender) -> &'static StoneTable {
        match gender {
            Gender::Men => &MEN_TABLE,
            Gender::Women => &WOMEN_TABLE,
        }
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Exact-code lookup.
    pub fn name(&self, code: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| *name)
    }

    /// Finds the longest stone code that `text` starts with.
    ///
    /// Candidate lengths are tried from [`MAX_STONE_CODE_LEN`] down to 1, so
    /// "KRX" wins over "KR" when both are present.
    pub fn longest_prefix(&self, text: &str) -> Option<(&'static str, &'static str)> {
        (1..=MAX_STONE_CODE_LEN.min(text.len()))
            .rev()
            .filter_map(|len| text.get(..len))
            .find_map(|candidate| {
                self.entries
                    .iter()
                    .find(|(c, _)| *c == candidate)
                    .copied()
            })
    }

    /// All `(code, name)` pairs.
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }
}

/// Looks up a finish display name. `""` is lustre.
pub fn finish_name(code: &str) -> Option<&'static str> {
    FINISHES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Returns the finish code if `suffix` starts with a non-empty finish letter.
pub fn leading_finish(suffix: &str) -> Option<(&'static str, &'static str)> {
    FINISHES
        .iter()
        .filter(|(c, _)| !c.is_empty())
        .find(|(c, _)| suffix.starts_with(*c))
        .copied()
}

/// Display name of the lustre finish.
pub fn lustre_name() -> &'static str {
    FINISHES[0].1
}

// =============================================================================
// Unit Tests
// =============================================================================
