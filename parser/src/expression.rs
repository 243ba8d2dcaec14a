//! Parsed predicate with its references.

use std::collections::{HashMap, HashSet};

use crate::{parse_expr, scan_refs, window_width, Expr, ParseError, ParseResult, VarRef};

/// A derived-level predicate, parsed once and shared by synthesis and
/// canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    raw: String,
    refs: Vec<VarRef>,
    ast: Expr,
    width: usize,
}

impl Expression {
    /// Parse a predicate and scan its references.
    ///
    /// Fails if the text is outside the grammar, if an offset is not an
    /// integer, or if a factor is read both bare and with an offset.
    pub fn parse(raw: &str) -> ParseResult<Self> {
        let ast = parse_expr(raw)?;
        let refs = scan_refs(raw)?;
        check_slots(&ast, &refs)?;
        let width = window_width(&refs);
        Ok(Self {
            raw: raw.to_string(),
            refs,
            ast,
            width,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn refs(&self) -> &[VarRef] {
        &self.refs
    }

    pub fn ast(&self) -> &Expr {
        &self.ast
    }

    /// Number of consecutive trials the predicate reads, current included.
    pub fn width(&self) -> usize {
        self.width
    }

    /// True if any reference is written `name[k]`.
    pub fn has_explicit_offset(&self) -> bool {
        self.refs.iter().any(|r| r.explicit)
    }

    /// Distinct referenced factor names, in first-occurrence order.
    pub fn base_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.refs
            .iter()
            .map(|r| r.base.as_str())
            .filter(|b| seen.insert(*b))
            .collect()
    }
}

/// The scanned refs and the AST slots must describe the same cells.
fn check_slots(ast: &Expr, refs: &[VarRef]) -> ParseResult<()> {
    let mut indexed: HashMap<&str, (bool, bool)> = HashMap::new();
    let mut slots: HashSet<(&str, i64)> = HashSet::new();

    ast.for_each_slot(&mut |slot| {
        let entry = indexed.entry(slot.name.as_str()).or_default();
        if slot.indexed {
            entry.0 = true;
        } else {
            entry.1 = true;
        }
        slots.insert((slot.name.as_str(), slot.offset));
    });

    if let Some((name, _)) = indexed.iter().find(|(_, (i, b))| *i && *b) {
        return Err(ParseError::mixed_reference(*name));
    }

    let known: HashSet<(&str, i64)> = refs.iter().map(VarRef::key).collect();
    let unscanned = slots.iter().find(|key| !known.contains(*key));
    let phantom = known.iter().find(|key| !slots.contains(*key));
    match unscanned.or(phantom) {
        Some((name, _)) => Err(ParseError::reference_mismatch(*name)),
        None => Ok(()),
    }
}
