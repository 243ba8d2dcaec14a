//! Design model: factors, levels and crossings.
//!
//! A [`Design`] is built once from a design document and is immutable
//! afterwards. Every derived level carries its parsed [`Expression`], so the
//! forward and backward paths never re-read the raw predicate text.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use trial_parser::{Expression, ParseResult};

use crate::{is_identifier, DesignError, DesignResult, FactorId, SynthesisOptions};

// ==================== LEVELS ====================

/// How a level's value is determined, decided once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelKind {
    /// Fixed value chosen by the solver.
    Static,
    /// Predicate over other factors at the same trial.
    WithinDerived,
    /// Predicate over a window of trials, written with `name[k]` offsets.
    WindowDerived,
}

impl LevelKind {
    pub fn is_derived(self) -> bool {
        !matches!(self, LevelKind::Static)
    }
}

/// One level of a factor.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    name: String,
    weight: u32,
    kind: LevelKind,
    expression: Option<Expression>,
}

impl Level {
    /// A static level.
    pub fn fixed(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            kind: LevelKind::Static,
            expression: None,
        }
    }

    /// A derived level. Window or within is decided by the predicate's
    /// references.
    pub fn derived(name: impl Into<String>, expr: &str, weight: u32) -> ParseResult<Self> {
        let expression = Expression::parse(expr)?;
        let kind = if expression.has_explicit_offset() {
            LevelKind::WindowDerived
        } else {
            LevelKind::WithinDerived
        };
        Ok(Self {
            name: name.into(),
            weight,
            kind,
            expression: Some(expression),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn kind(&self) -> LevelKind {
        self.kind
    }

    /// The predicate of a derived level; `None` for static levels.
    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }
}

// ==================== FACTORS ====================

/// A named dimension of the design with its ordered levels.
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    name: String,
    levels: Vec<Level>,
}

impl Factor {
    /// Create a factor. Level names must be unique.
    pub fn new(name: impl Into<String>, levels: Vec<Level>) -> DesignResult<Self> {
        let name = name.into();

        let mut seen = HashSet::new();
        for level in &levels {
            if !seen.insert(level.name()) {
                return Err(DesignError::duplicate_level(&name, level.name()));
            }
        }

        Ok(Self { name, levels })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.name == name)
    }

    pub fn level_names(&self) -> Vec<&str> {
        self.levels.iter().map(|l| l.name.as_str()).collect()
    }

    /// True if no level carries a predicate.
    pub fn is_static(&self) -> bool {
        self.levels.iter().all(|l| l.kind == LevelKind::Static)
    }

    pub fn is_derived(&self) -> bool {
        !self.is_static()
    }

    /// True if any level reads earlier trials.
    pub fn is_window(&self) -> bool {
        self.levels.iter().any(|l| l.kind == LevelKind::WindowDerived)
    }

    /// Predicates of the derived levels, in declaration order.
    pub fn expressions(&self) -> impl Iterator<Item = (&Level, &Expression)> {
        self.levels
            .iter()
            .filter_map(|l| l.expression().map(|e| (l, e)))
    }
}

// ==================== CROSSING ====================

/// Which factors are fully crossed.
///
/// The shape is structural: a list of names is one crossing block, a list of
/// name lists is several independent blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Crossing {
    Flat(Vec<String>),
    Multi(Vec<Vec<String>>),
}

impl Crossing {
    pub fn is_multi(&self) -> bool {
        matches!(self, Crossing::Multi(_))
    }

    /// All crossed names, block by block.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Crossing::Flat(names) => names.iter().map(String::as_str).collect(),
            Crossing::Multi(blocks) => blocks.iter().flatten().map(String::as_str).collect(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Crossing::Flat(names) => names.is_empty(),
            Crossing::Multi(blocks) => blocks.is_empty() || blocks.iter().any(Vec::is_empty),
        }
    }
}

// ==================== DESIGN ====================

/// A validated experimental design.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    factors: Vec<Factor>,
    crossing: Crossing,
    minimum_trials: Option<u32>,
    strategy: Option<String>,
}

impl Design {
    /// Create a design from factors in declaration order.
    pub fn new(factors: Vec<Factor>, crossing: Crossing) -> DesignResult<Self> {
        if factors.is_empty() {
            return Err(DesignError::missing_field("factors"));
        }
        if crossing.is_empty() {
            return Err(DesignError::missing_field("crossing"));
        }

        let mut seen = HashSet::new();
        for factor in &factors {
            if !seen.insert(factor.name()) {
                return Err(DesignError::duplicate_factor(factor.name()));
            }
        }
        for name in crossing.names() {
            if !seen.contains(name) {
                return Err(DesignError::unknown_crossing_factor(name));
            }
        }

        Ok(Self {
            factors,
            crossing,
            minimum_trials: None,
            strategy: None,
        })
    }

    pub fn with_minimum_trials(mut self, n: u32) -> Self {
        self.minimum_trials = Some(n);
        self
    }

    pub fn with_strategy(mut self, name: impl Into<String>) -> DesignResult<Self> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(DesignError::invalid_strategy(name));
        }
        self.strategy = Some(name);
        Ok(self)
    }

    /// Parse a JSON design document.
    pub fn from_json(input: &str) -> DesignResult<Self> {
        let raw: RawDesign = serde_json::from_str(input)?;
        raw.into_design()
    }

    /// Convert an already-parsed JSON design document.
    pub fn from_value(value: serde_json::Value) -> DesignResult<Self> {
        let raw: RawDesign = serde_json::from_value(value)?;
        raw.into_design()
    }

    /// Factors in declaration order.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    pub fn factor(&self, id: FactorId) -> Option<&Factor> {
        self.factors.get(id.index())
    }

    pub fn factor_id(&self, name: &str) -> Option<FactorId> {
        self.factors
            .iter()
            .position(|f| f.name() == name)
            .map(FactorId::from)
    }

    pub fn crossing(&self) -> &Crossing {
        &self.crossing
    }

    /// Options for synthesis: values carried by the design override `defaults`.
    pub fn synthesis_options(&self, defaults: &SynthesisOptions) -> SynthesisOptions {
        let mut options = defaults.clone();
        if let Some(n) = self.minimum_trials {
            options.minimum_trials = n;
        }
        if let Some(strategy) = &self.strategy {
            options.strategy = strategy.clone();
        }
        options
    }
}

// ==================== DOCUMENT FORMAT ====================

/// Design document as received. Every field is optional so that absent
/// keys surface as design errors rather than decoding errors.
#[derive(Debug, Deserialize)]
struct RawDesign {
    factors: Option<Vec<RawFactor>>,
    crossing: Option<Crossing>,
    minimum_trials: Option<u32>,
    strategy: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFactor {
    name: Option<String>,
    levels: Option<Vec<RawLevel>>,
}

#[derive(Debug, Deserialize)]
struct RawLevel {
    name: Option<String>,
    weight: Option<i64>,
    /// `None` when the key is absent, `Some(None)` when it is `null`.
    #[serde(default, deserialize_with = "present")]
    expr: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl RawDesign {
    fn into_design(self) -> DesignResult<Design> {
        let raw_factors = self
            .factors
            .filter(|f| !f.is_empty())
            .ok_or_else(|| DesignError::missing_field("factors"))?;
        let crossing = self
            .crossing
            .ok_or_else(|| DesignError::missing_field("crossing"))?;

        let factors = raw_factors
            .into_iter()
            .enumerate()
            .map(|(i, f)| f.into_factor(i))
            .collect::<DesignResult<Vec<_>>>()?;

        let mut design = Design::new(factors, crossing)?;
        if let Some(n) = self.minimum_trials {
            design = design.with_minimum_trials(n);
        }
        if let Some(strategy) = self.strategy {
            design = design.with_strategy(strategy)?;
        }
        Ok(design)
    }
}

impl RawFactor {
    fn into_factor(self, index: usize) -> DesignResult<Factor> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| DesignError::malformed_factor(index, "factor has no name"))?;
        let raw_levels = self
            .levels
            .filter(|l| !l.is_empty())
            .ok_or_else(|| DesignError::malformed_factor(index, format!("factor '{}' has no levels", name)))?;

        let levels = raw_levels
            .into_iter()
            .enumerate()
            .map(|(i, l)| l.into_level(&name, i))
            .collect::<DesignResult<Vec<_>>>()?;

        let kinds: HashSet<bool> = levels.iter().map(|l| l.kind().is_derived()).collect();
        if kinds.len() > 1 {
            return Err(DesignError::malformed_factor(
                index,
                format!("factor '{}' mixes static and derived levels", name),
            ));
        }

        Factor::new(name, levels)
    }
}

impl RawLevel {
    fn into_level(self, factor: &str, index: usize) -> DesignResult<Level> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| DesignError::malformed_level(factor, index, "level has no name"))?;

        let weight = match self.weight {
            None => 1,
            Some(w) if (1..=u32::MAX as i64).contains(&w) => w as u32,
            Some(w) => {
                return Err(DesignError::malformed_level(
                    factor,
                    index,
                    format!("weight {} is not a positive integer", w),
                ))
            }
        };

        match self.expr {
            None => Ok(Level::fixed(name, weight)),
            Some(None) => Err(DesignError::malformed_level(
                factor,
                index,
                format!("derived level '{}' has no expression", name),
            )),
            Some(Some(expr)) if expr.trim().is_empty() => Err(DesignError::malformed_level(
                factor,
                index,
                format!("derived level '{}' has an empty expression", name),
            )),
            Some(Some(expr)) => Level::derived(&name, &expr, weight)
                .map_err(|e| DesignError::expression(factor, &name, e)),
        }
    }
}

// ==================== TESTS ====================
