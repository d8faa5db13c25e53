//! Record set model and TXT value encoding
//!
//! The provider stores TXT contents as quoted string literals, so every
//! comparison against retrieved values happens on the quoted form produced
//! by [`TxtValue::quote`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Record type managed by the solver
pub const TXT: &str = "TXT";

/// TTL (in seconds) given to record sets created by the solver
pub const CHALLENGE_TTL: u32 = 60;

/// All values stored under one (domain, subname, type) key at the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Zone name at the provider (e.g. "example.com")
    #[serde(default)]
    pub domain: String,

    /// Name relative to the zone; empty for the apex
    #[serde(default)]
    pub subname: String,

    /// Record type, always "TXT" here
    #[serde(rename = "type")]
    pub record_type: String,

    /// Ordered record contents
    #[serde(default)]
    pub records: Vec<String>,

    /// Time-to-live in seconds
    #[serde(default)]
    pub ttl: Option<u32>,
}

impl RecordSet {
    /// Create a TXT record set holding a single value
    pub fn txt(domain: impl Into<String>, subname: impl Into<String>, value: &TxtValue) -> Self {
        Self {
            domain: domain.into(),
            subname: subname.into(),
            record_type: TXT.to_string(),
            records: vec![value.as_str().to_string()],
            ttl: Some(CHALLENGE_TTL),
        }
    }

    /// Whether the set already holds `value`
    pub fn contains(&self, value: &TxtValue) -> bool {
        self.records.iter().any(|r| r == value.as_str())
    }
}

/// A TXT record content in its quoted wire form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxtValue(String);

impl TxtValue {
    /// Quote a raw challenge key as a TXT string literal
    ///
    /// Escaping follows Go's `strconv.Quote`. `"` and `\` get a backslash,
    /// C escapes (`\a \b \f \n \r \t \v`) are used where they exist and
    /// other ASCII controls become `\xHH`. Non-ASCII controls, spaces and
    /// format characters become `\uHHHH`; everything else is kept literally.
    pub fn quote(raw: &str) -> Self {
        let mut out = String::with_capacity(raw.len() + 2);
        out.push('"');
        for c in raw.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\u{07}' => out.push_str("\\a"),
                '\u{08}' => out.push_str("\\b"),
                '\u{0c}' => out.push_str("\\f"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '\u{0b}' => out.push_str("\\v"),
                c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
                c if !c.is_ascii() && is_non_printing(c) => {
                    let cp = c as u32;
                    if cp < 0x10000 {
                        out.push_str(&format!("\\u{:04x}", cp));
                    } else {
                        out.push_str(&format!("\\U{:08x}", cp));
                    }
                }
                c => out.push(c),
            }
        }
        out.push('"');
        Self(out)
    }

    /// Recover the raw content from a quoted TXT value
    ///
    /// Accepts every escape [`TxtValue::quote`] produces. Returns `None`
    /// when `quoted` is not a single well-formed literal.
    pub fn unquote(quoted: &str) -> Option<String> {
        let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next()? {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0c}'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'v' => out.push('\u{0b}'),
                    'x' => out.push(hex_char(&mut chars, 2)?),
                    'u' => out.push(hex_char(&mut chars, 4)?),
                    'U' => out.push(hex_char(&mut chars, 8)?),
                    _ => return None,
                },
                '"' => return None,
                c => out.push(c),
            }
        }
        Some(out)
    }

    /// The quoted form as sent to and read from the provider
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Unicode controls, separators other than U+0020, and the common format
// characters. Unassigned and private-use code points pass through.
fn is_non_printing(c: char) -> bool {
    c.is_control()
        || c.is_whitespace()
        || matches!(
            c,
            '\u{ad}' | '\u{200b}'..='\u{200f}' | '\u{202a}'..='\u{202e}' | '\u{2060}'..='\u{2064}' | '\u{feff}'
        )
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    char::from_u32(u32::from_str_radix(&hex, 16).ok()?)
}

impl fmt::Display for TxtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
