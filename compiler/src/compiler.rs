//! Main synthesizer implementation.

use std::fmt::Write as _;

use tracing::debug;
use trial_core::{py_ident, py_str, Crossing, Design, Factor, Level, LevelKind, SynthesisOptions};
use trial_graph::DependencyGraph;

use crate::SynthResult;

const IMPORTS: &str = "Factor, DerivedLevel, WithinTrial, Window, Level, CrossBlock, \
MultiCrossBlock, MinimumTrials, synthesize_trials, print_experiments, tabulate_experiments";

/// The Synthesizer turns a design into solver source text.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    /// Defaults for values the design does not carry.
    options: SynthesisOptions,
}

impl Synthesizer {
    /// Create a synthesizer with the given defaults.
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    /// Synthesize source for a design.
    ///
    /// Identical designs yield byte-identical text.
    pub fn synthesize(&self, design: &Design) -> SynthResult<String> {
        let graph = DependencyGraph::build(design.factors())?;
        let order = graph.topological_order()?;
        let options = design.synthesis_options(&self.options);

        let ordered: Vec<&Factor> = order
            .iter()
            .filter_map(|id| design.factor(*id))
            .collect();

        let decls: Vec<String> = ordered.iter().map(|f| factor_decl(f)).collect();
        let design_list = ident_list(ordered.iter().map(|f| f.name()));

        let mut out = String::new();
        let _ = writeln!(out, "from sweetpea import {}, {}", IMPORTS, options.strategy);
        out.push_str("\n# ---------- factor declarations ----------\n");
        out.push_str(&decls.join("\n\n"));
        out.push_str("\n\n# ---------- design / crossing / block ----------\n");
        let _ = writeln!(out, "design   = {}", design_list);
        let _ = writeln!(out, "crossing = {}", crossing_code(design.crossing()));
        let _ = writeln!(out, "constraints = [MinimumTrials({})]", options.minimum_trials);
        match design.crossing() {
            Crossing::Flat(_) => out.push_str(
                "block = CrossBlock(design=design, crossing=crossing, constraints=constraints)\n",
            ),
            Crossing::Multi(_) => out.push_str(
                "block = MultiCrossBlock(design=design, crossings=crossing, constraints=constraints)\n",
            ),
        }
        let _ = writeln!(
            out,
            "\nexperiments = synthesize_trials(block, {}, sampling_strategy={})",
            options.samples, options.strategy
        );
        out.push_str("print_experiments(block, experiments)\n");
        if !design.crossing().is_multi() {
            out.push_str("tabulate_experiments(block, experiments)\n");
        }

        debug!(
            factors = ordered.len(),
            strategy = %options.strategy,
            multi = design.crossing().is_multi(),
            "synthesized design"
        );
        Ok(out)
    }
}

/// `ident = Factor("name", [levels...])`
fn factor_decl(factor: &Factor) -> String {
    let levels: Vec<String> = factor.levels().iter().map(level_decl).collect();
    format!(
        "{} = Factor({}, [\n    {}\n])",
        py_ident(factor.name()),
        py_str(factor.name()),
        levels.join(",\n    ")
    )
}

fn level_decl(level: &Level) -> String {
    let Some(expr) = level.expression() else {
        return format!("Level(name={}, weight={})", py_str(level.name()), level.weight());
    };

    let params: Vec<String> = expr.base_names().into_iter().map(py_ident).collect();
    let lambda = if params.is_empty() {
        format!("lambda: {}", expr.raw())
    } else {
        format!("lambda {}: {}", params.join(", "), expr.raw())
    };
    let call = match level.kind() {
        LevelKind::WindowDerived => format!(
            "Window({}, [{}], {})",
            lambda,
            params.join(", "),
            expr.width()
        ),
        _ => format!("WithinTrial({}, [{}])", lambda, params.join(", ")),
    };
    format!("DerivedLevel({}, {}, {})", py_str(level.name()), call, level.weight())
}

fn ident_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let idents: Vec<String> = names.map(py_ident).collect();
    format!("[{}]", idents.join(", "))
}

fn crossing_code(crossing: &Crossing) -> String {
    match crossing {
        Crossing::Flat(names) => ident_list(names.iter().map(String::as_str)),
        Crossing::Multi(blocks) => {
            let inner: Vec<String> = blocks
                .iter()
                .map(|b| ident_list(b.iter().map(String::as_str)))
                .collect();
            format!("[{}]", inner.join(", "))
        }
    }
}

/// Synthesize source for a design with default options.
pub fn synthesize(design: &Design) -> SynthResult<String> {
    Synthesizer::default().synthesize(design)
}

/// Parse a JSON design document and synthesize it with default options.
pub fn synthesize_json(input: &str) -> SynthResult<String> {
    let design = Design::from_json(input)?;
    synthesize(&design)
}
