//! # Barcode-Safe Text
//!
//! Two character mappings that keep text inside the printable ASCII range
//! (`0x20..=0x7E`) that every 1D/2D symbology used on tags can carry.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  transliterate_for_barcode           normalize_code                     │
//! │  ─────────────────────────           ──────────────                     │
//! │  label text → symbology renderer     scanner/keyboard → SkuCodec        │
//! │  "Δαχτυλίδι Ρόδο" → "Dachtylidi Rodo"  "ΔΑ050ΧΚΡ" → "DA050XKR"          │
//! │  phonetic (ELOT 743 letters)         key position (Greek layout)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A USB scanner is a keyboard. With the Greek layout active it types `Χ`
//! for the X key and `Ρ` for the R key, so scanned codes are mapped back by
//! key position rather than by sound.
//!
//! Both functions are total and idempotent: their output only contains
//! characters they map to themselves.

// =============================================================================
// Transliteration
// =============================================================================

/// Maps text into the symbology-safe ASCII subset.
///
/// ## Rules
/// - Printable ASCII is kept as is
/// - Greek letters use their ELOT 743 Latin letter (`Θ` → `TH`, `Ψ` → `PS`)
/// - Accented Latin letters lose their accent (`é` → `e`, `ß` → `ss`)
/// - Typographic punctuation becomes its ASCII form (`’` → `'`, `–` → `-`)
/// - Whitespace and control characters become a space
/// - Anything else becomes `?`
///
/// ## Example
/// ```rust
/// use aurum_core::barcode::transliterate_for_barcode;
///
/// assert_eq!(transliterate_for_barcode("Δαχτυλίδι"), "Dachtylidi");
/// let once = transliterate_for_barcode("Ψ – ü");
/// assert_eq!(transliterate_for_barcode(&once), once);
/// ```
pub fn transliterate_for_barcode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if is_barcode_safe(c) {
            out.push(c);
        } else if let Some(latin) = latin_equivalent(c) {
            out.push_str(latin);
        } else if c.is_whitespace() || c.is_control() {
            out.push(' ');
        } else {
            out.push('?');
        }
    }
    out
}

/// Checks whether a character passes through [`transliterate_for_barcode`] unchanged.
#[inline]
pub fn is_barcode_safe(c: char) -> bool {
    matches!(c, ' '..='~')
}

/// Normalizes a typed or scanned product code.
///
/// Strips whitespace, maps Greek-layout keystrokes back to the Latin key they
/// share, transliterates anything else, and uppercases.
///
/// ## Example
/// ```rust
/// use aurum_core::barcode::normalize_code;
///
/// assert_eq!(normalize_code(" δα050χκρ\n"), "DA050XKR");
/// ```
pub fn normalize_code(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().filter(|c| !c.is_whitespace()) {
        match greek_key(c) {
            Some(key) => out.push(key),
            None => {
                let mut buf = [0u8; 4];
                out.push_str(&transliterate_for_barcode(c.encode_utf8(&mut buf)));
            }
        }
    }
    out.to_ascii_uppercase()
}

// =============================================================================
// Mapping Tables
// =============================================================================

/// Latin key that produces `c` on a Greek keyboard layout.
fn greek_key(c: char) -> Option<char> {
    let key = match c {
        'Α' | 'α' | 'Ά' | 'ά' => 'A',
        'Β' | 'β' => 'B',
        'Ψ' | 'ψ' => 'C',
        'Δ' | 'δ' => 'D',
        'Ε' | 'ε' | 'Έ' | 'έ' => 'E',
        'Φ' | 'φ' => 'F',
        'Γ' | 'γ' => 'G',
        'Η' | 'η' | 'Ή' | 'ή' => 'H',
        'Ι' | 'ι' | 'Ί' | 'ί' | 'Ϊ' | 'ϊ' | 'ΐ' => 'I',
        'Ξ' | 'ξ' => 'J',
        'Κ' | 'κ' => 'K',
        'Λ' | 'λ' => 'L',
        'Μ' | 'μ' => 'M',
        'Ν' | 'ν' => 'N',
        'Ο' | 'ο' | 'Ό' | 'ό' => 'O',
        'Π' | 'π' => 'P',
        'Ρ' | 'ρ' => 'R',
        'Σ' | 'σ' => 'S',
        'Τ' | 'τ' => 'T',
        'Θ' | 'θ' => 'U',
        'Ω' | 'ω' | 'Ώ' | 'ώ' => 'V',
        'ς' => 'W',
        'Χ' | 'χ' => 'X',
        'Υ' | 'υ' | 'Ύ' | 'ύ' | 'Ϋ' | 'ϋ' | 'ΰ' => 'Y',
        'Ζ' | 'ζ' => 'Z',
        _ => return None,
    };
    Some(key)
}

/// Closest ASCII rendering of a non-ASCII character.
fn latin_equivalent(c: char) -> Option<&'static str> {
    let latin = match c {
        // Greek, upper
        'Α' | 'Ά' => "A",
        'Β' => "V",
        'Γ' => "G",
        'Δ' => "D",
        'Ε' | 'Έ' => "E",
        'Ζ' => "Z",
        'Η' | 'Ή' => "I",
        'Θ' => "TH",
        'Ι' | 'Ί' | 'Ϊ' => "I",
        'Κ' => "K",
        'Λ' => "L",
        'Μ' => "M",
        'Ν' => "N",
        'Ξ' => "X",
        'Ο' | 'Ό' => "O",
        'Π' => "P",
        'Ρ' => "R",
        'Σ' => "S",
        'Τ' => "T",
        'Υ' | 'Ύ' | 'Ϋ' => "Y",
        'Φ' => "F",
        'Χ' => "CH",
        'Ψ' => "PS",
        'Ω' | 'Ώ' => "O",
        // Greek, lower
        'α' | 'ά' => "a",
        'β' => "v",
        'γ' => "g",
        'δ' => "d",
        'ε' | 'έ' => "e",
        'ζ' => "z",
        'η' | 'ή' => "i",
        'θ' => "th",
        'ι' | 'ί' | 'ϊ' | 'ΐ' => "i",
        'κ' => "k",
        'λ' => "l",
        'μ' => "m",
        'ν' => "n",
        'ξ' => "x",
        'ο' | 'ό' => "o",
        'π' => "p",
        'ρ' => "r",
        'σ' | 'ς' => "s",
        'τ' => "t",
        'υ' | 'ύ' | 'ϋ' | 'ΰ' => "y",
        'φ' => "f",
        'χ' => "ch",
        'ψ' => "ps",
        'ω' | 'ώ' => "o",
        // Latin-1 / Latin Extended-A
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' => "A",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'Æ' => "AE",
        'æ' => "ae",
        'Ç' | 'Č' => "C",
        'ç' | 'č' => "c",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' => "E",
        'è' | 'é' | 'ê' | 'ë' | 'ē' => "e",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'Ð' => "D",
        'ð' => "d",
        'Ñ' => "N",
        'ñ' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Š' => "S",
        'š' => "s",
        'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'Ý' | 'Ÿ' => "Y",
        'ý' | 'ÿ' => "y",
        'Ž' => "Z",
        'ž' => "z",
        'Þ' => "TH",
        'þ' => "th",
        'ß' => "ss",
        // Punctuation and symbols
        '‘' | '’' | '‚' | '′' | '´' => "'",
        '“' | '”' | '„' | '«' | '»' | '″' => "\"",
        '‐' | '‑' | '‒' | '–' | '—' | '―' | '−' => "-",
        '…' => "...",
        '·' | '•' => ".",
        '×' => "x",
        '€' => "EUR",
        '°' => "o",
        '\u{00A0}' | '\u{2007}' | '\u{202F}' => " ",
        _ => return None,
    };
    Some(latin)
}

// =============================================================================
// Unit Tests
// =============================================================================
