//! Dependency graph storage and ordering.

use std::collections::HashSet;

use tracing::{debug, trace};
use trial_core::{Factor, FactorId};

use crate::{GraphError, GraphResult, NameIndex};

/// One factor in the arena.
#[derive(Debug, Clone)]
struct FactorNode {
    name: String,
    /// Other factors read by this factor's predicates, in declaration order.
    deps: Vec<FactorId>,
}

/// Directed graph from each factor to the factors its derived levels read.
///
/// Nodes live in an arena indexed by [`FactorId`], in declaration order.
/// A factor reading its own earlier trials does not depend on itself.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<FactorNode>,
    index: NameIndex,
}

impl DependencyGraph {
    /// Build the graph for factors in declaration order.
    pub fn build(factors: &[Factor]) -> GraphResult<Self> {
        let mut graph = Self::with_names(factors.iter().map(Factor::name))?;

        for (i, factor) in factors.iter().enumerate() {
            let owner = FactorId::from(i);
            for (level, expression) in factor.expressions() {
                for base in expression.base_names() {
                    let dep = graph.index.get(base).ok_or_else(|| {
                        GraphError::unknown_reference(factor.name(), level.name(), base)
                    })?;
                    graph.add_edge(owner, dep);
                }
            }
        }

        Ok(graph)
    }

    /// Build a graph from explicit `(dependent, dependency)` pairs.
    pub fn from_edges<N: AsRef<str>>(names: &[N], edges: &[(N, N)]) -> GraphResult<Self> {
        let mut graph = Self::with_names(names.iter().map(AsRef::as_ref))?;

        for (from, to) in edges {
            let (from, to) = (from.as_ref(), to.as_ref());
            let owner = graph
                .index
                .get(from)
                .ok_or_else(|| GraphError::unknown_reference(from, "", from))?;
            let dep = graph
                .index
                .get(to)
                .ok_or_else(|| GraphError::unknown_reference(from, "", to))?;
            graph.add_edge(owner, dep);
        }

        Ok(graph)
    }

    fn with_names<'a>(names: impl Iterator<Item = &'a str>) -> GraphResult<Self> {
        let mut graph = Self {
            nodes: Vec::new(),
            index: NameIndex::new(),
        };
        for name in names {
            let id = FactorId::from(graph.nodes.len());
            if !graph.index.insert(name, id) {
                return Err(GraphError::duplicate_factor(name));
            }
            graph.nodes.push(FactorNode {
                name: name.to_string(),
                deps: Vec::new(),
            });
        }
        Ok(graph)
    }

    fn add_edge(&mut self, owner: FactorId, dep: FactorId) {
        if owner == dep {
            return;
        }
        let deps = &mut self.nodes[owner.index()].deps;
        if let Err(pos) = deps.binary_search(&dep) {
            trace!(
                factor = %self.nodes[owner.index()].name,
                depends_on = %self.nodes[dep.index()].name,
                "dependency"
            );
            self.nodes[owner.index()].deps.insert(pos, dep);
        }
    }

    // ==================== Accessors ====================

    /// Number of factors.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<FactorId> {
        self.index.get(name)
    }

    pub fn name(&self, id: FactorId) -> Option<&str> {
        self.nodes.get(id.index()).map(|n| n.name.as_str())
    }

    /// Factors `id` reads, in declaration order.
    pub fn dependencies(&self, id: FactorId) -> &[FactorId] {
        self.nodes
            .get(id.index())
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Names of the factors `name` reads, in declaration order.
    pub fn dependency_names(&self, name: &str) -> Vec<&str> {
        self.id(name)
            .map(|id| {
                self.dependencies(id)
                    .iter()
                    .map(|d| self.nodes[d.index()].name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    // ==================== Ordering ====================

    /// Order factors so every dependency precedes its dependents.
    ///
    /// Each pass moves every factor whose dependencies were all ordered by
    /// earlier passes, scanning in declaration order, so ties always keep
    /// declaration order. A pass that moves nothing means the remaining
    /// factors are stuck on a cycle.
    pub fn topological_order(&self) -> GraphResult<Vec<FactorId>> {
        let mut ordered: Vec<FactorId> = Vec::with_capacity(self.nodes.len());
        let mut resolved: HashSet<FactorId> = HashSet::with_capacity(self.nodes.len());
        let mut remaining: Vec<FactorId> = (0..self.nodes.len()).map(FactorId::from).collect();

        while !remaining.is_empty() {
            let (ready, waiting): (Vec<_>, Vec<_>) = remaining
                .into_iter()
                .partition(|id| self.dependencies(*id).iter().all(|d| resolved.contains(d)));

            if ready.is_empty() {
                let stuck: Vec<&str> = waiting
                    .iter()
                    .map(|id| self.nodes[id.index()].name.as_str())
                    .collect();
                return Err(GraphError::cyclic(stuck));
            }

            resolved.extend(ready.iter().copied());
            ordered.extend(ready);
            remaining = waiting;
        }

        debug!(
            order = ?ordered.iter().map(|id| self.nodes[id.index()].name.as_str()).collect::<Vec<_>>(),
            "topological order"
        );
        Ok(ordered)
    }

    /// Factor names in topological order.
    pub fn sorted_names(&self) -> GraphResult<Vec<&str>> {
        Ok(self
            .topological_order()?
            .into_iter()
            .map(|id| self.nodes[id.index()].name.as_str())
            .collect())
    }
}
