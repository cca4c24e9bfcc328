//! Example-scoped local subgraph construction with adaptive search depth.
//!
//! For one (subject, object) pair the builder collects every edge lying on
//! a connecting chain, probing chain lengths one at a time. The search is
//! self-tuning: while nothing has been found, the length bound may grow
//! past the initially requested maximum, and lengths whose probe finishes
//! quickly are allowed to push the bound further (up to a hard ceiling).
//! Sparse, fast regions of the graph are searched deeper; dense, slow
//! regions are not.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::config::Parameters;
use crate::term::TermId;

use super::Triple;
use super::index::KnowledgeGraph;

/// Depth bounds and the probe timeout for one local-graph search.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    /// Chain length the search always probes up to.
    pub initial_max_len: usize,
    /// Length the search may continue to while nothing has been found.
    pub absolute_max_len: usize,
    /// Hard ceiling on adaptive growth of `absolute_max_len`.
    pub hard_ceiling: usize,
    /// A probe faster than this lets `absolute_max_len` grow by one.
    pub probe_timeout: Duration,
}

impl From<&Parameters> for SearchBudget {
    fn from(params: &Parameters) -> Self {
        Self {
            initial_max_len: params.initial_max_path_length,
            absolute_max_len: params.absolute_max_path_length,
            hard_ceiling: params.path_length_ceiling,
            probe_timeout: params.probe_timeout(),
        }
    }
}

/// A small subgraph scoped to one (subject, object) pair.
///
/// Holds every edge found on a connecting chain, indexed by subject, plus
/// the chain length the search effectively reached. Discarded after the
/// example it was built for has been processed.
#[derive(Debug)]
pub struct LocalGraph {
    by_subject: HashMap<TermId, Vec<Triple>>,
    seen: HashSet<Triple>,
    effective_max_len: usize,
}

impl LocalGraph {
    fn new(effective_max_len: usize) -> Self {
        Self {
            by_subject: HashMap::new(),
            seen: HashSet::new(),
            effective_max_len,
        }
    }

    fn insert(&mut self, triple: Triple) {
        if self.seen.insert(triple) {
            self.by_subject.entry(triple.subject).or_default().push(triple);
        }
    }

    /// All edges leaving `subject`.
    pub fn triples_from(&self, subject: TermId) -> &[Triple] {
        self.by_subject
            .get(&subject)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Chain length the builder effectively searched up to.
    ///
    /// Exceeds the initially requested maximum when the first connecting
    /// path was only found beyond it; path extraction must enumerate up to
    /// this length, not the requested one.
    pub fn effective_max_len(&self) -> usize {
        self.effective_max_len
    }

    /// Number of distinct edges.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no connecting edge was found at all.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Build the local graph for one (subject, object) pair.
///
/// Probes chain lengths from 1 upward, adding every edge of every complete
/// chain of the probed length. Probing continues while the length is within
/// the initial maximum or nothing has been found yet, and always stops once
/// the (adaptively grown) absolute maximum is exceeded.
pub fn build_local_graph(
    graph: &KnowledgeGraph,
    subject: TermId,
    object: TermId,
    budget: &SearchBudget,
) -> LocalGraph {
    let mut local = LocalGraph::new(budget.initial_max_len);
    let mut absolute_max = budget.absolute_max_len.min(budget.hard_ceiling);
    let mut found_any = false;
    let mut current_len = 1;

    while current_len <= absolute_max && (current_len <= budget.initial_max_len || !found_any) {
        let probe_start = Instant::now();
        let edges = chain_edges(graph, subject, object, current_len);
        let elapsed = probe_start.elapsed();

        if !edges.is_empty() {
            if !found_any && current_len > budget.initial_max_len {
                local.effective_max_len = current_len;
            }
            found_any = true;
            for edge in edges {
                local.insert(edge);
            }
        }

        // Cheap probes may push the depth bound further.
        if elapsed < budget.probe_timeout
            && current_len == absolute_max
            && absolute_max < budget.hard_ceiling
        {
            absolute_max += 1;
        }

        current_len += 1;
    }

    local
}

/// Every edge lying on a complete chain of exactly `len` edges from
/// `start` to `goal`. Chains may revisit nodes; the exact-length bound
/// keeps the walk finite.
fn chain_edges(graph: &KnowledgeGraph, start: TermId, goal: TermId, len: usize) -> Vec<Triple> {
    debug_assert!(len >= 1);
    let mut found = Vec::new();
    let mut stack = Vec::with_capacity(len);
    collect_chains(graph, start, goal, len, &mut stack, &mut found);
    found
}

fn collect_chains(
    graph: &KnowledgeGraph,
    node: TermId,
    goal: TermId,
    remaining: usize,
    stack: &mut Vec<Triple>,
    found: &mut Vec<Triple>,
) {
    if remaining == 1 {
        for edge in graph.edges_between(node, goal) {
            found.extend_from_slice(stack);
            found.push(edge);
        }
        return;
    }
    for edge in graph.triples_from(node) {
        stack.push(edge);
        collect_chains(graph, edge.object, goal, remaining - 1, stack, found);
        stack.pop();
    }
}
