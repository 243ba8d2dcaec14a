//! Reference scan.
//!
//! Extracts the `(factor, offset)` references of a predicate in two passes
//! over the text with quoted literals blanked out:
//! 1. explicit `name[k]` references, each with its exact offset;
//! 2. remaining bare identifiers (minus keywords and any base name already
//!    seen with an explicit offset) as offset-0 references.
//!
//! References are ordered by first occurrence and de-duplicated by
//! `(base, offset)`.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex_lite::{Captures, Regex};

use crate::{ParseError, ParseResult};

/// Words that are never factor references.
pub const KEYWORDS: &[&str] = &["and", "or", "not", "in", "is", "True", "False", "None"];

/// One factor reference found in a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    /// Text as written, e.g. `color[-1]` or `color`.
    pub raw: String,
    /// Referenced factor name.
    pub base: String,
    /// Trial offset relative to the current trial.
    pub offset: i64,
    /// Whether the offset was written in brackets.
    pub explicit: bool,
}

impl VarRef {
    pub fn key(&self) -> (&str, i64) {
        (&self.base, self.offset)
    }
}

fn string_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#).expect("static regex is valid")
    })
}

fn indexed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*\[\s*(-?\d+)\s*\]").expect("static regex is valid")
    })
}

fn bracket_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*\s*\[").expect("static regex is valid"))
}

fn ident_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b").expect("static regex is valid"))
}

/// Blank out quoted literals, preserving byte positions.
pub fn strip_strings(expr: &str) -> String {
    string_literal_re()
        .replace_all(expr, |caps: &Captures<'_>| " ".repeat(caps[0].len()))
        .into_owned()
}

/// Scan a predicate for factor references.
pub fn scan_refs(expr: &str) -> ParseResult<Vec<VarRef>> {
    let text = strip_strings(expr);
    let mut found: Vec<(usize, VarRef)> = Vec::new();

    // Pass 1: explicit offsets
    let mut indexed_starts = HashSet::new();
    let mut indexed_bases = HashSet::new();
    for caps in indexed_re().captures_iter(&text) {
        let whole = caps.get(0).map(|m| (m.start(), m.as_str())).unwrap_or((0, ""));
        let base = &caps[1];
        let offset: i64 = caps[2]
            .parse()
            .map_err(|_| ParseError::malformed_offset(whole.1))?;
        indexed_starts.insert(whole.0);
        indexed_bases.insert(base.to_string());
        found.push((
            whole.0,
            VarRef {
                raw: whole.1.to_string(),
                base: base.to_string(),
                offset,
                explicit: true,
            },
        ));
    }

    // Every `name[` must have been consumed by pass 1.
    for m in bracket_open_re().find_iter(&text) {
        if !indexed_starts.contains(&m.start()) {
            let rest = &text[m.start()..];
            let end = rest.find(']').map(|i| i + 1).unwrap_or(rest.len());
            return Err(ParseError::malformed_offset(rest[..end].trim_end()));
        }
    }

    // Pass 2: bare identifiers
    for m in ident_re().find_iter(&text) {
        let name = m.as_str();
        if KEYWORDS.contains(&name)
            || indexed_bases.contains(name)
            || in_number(&text, m.start())
        {
            continue;
        }
        found.push((
            m.start(),
            VarRef {
                raw: name.to_string(),
                base: name.to_string(),
                offset: 0,
                explicit: false,
            },
        ));
    }

    found.sort_by_key(|(pos, _)| *pos);

    let mut seen = HashSet::new();
    Ok(found
        .into_iter()
        .map(|(_, r)| r)
        .filter(|r| seen.insert((r.base.clone(), r.offset)))
        .collect())
}

/// Whether an identifier at `start` is the exponent of a literal like `1.e3`.
fn in_number(text: &str, start: usize) -> bool {
    let before = &text.as_bytes()[..start];
    matches!(before, [.., d, b'.'] if d.is_ascii_digit())
}

/// Trailing trials a predicate needs, including the current one.
pub fn window_width(refs: &[VarRef]) -> usize {
    refs.iter()
        .filter(|r| r.offset < 0)
        .map(|r| r.offset.unsigned_abs() as usize + 1)
        .max()
        .unwrap_or(1)
}
