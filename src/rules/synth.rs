//! Rule synthesis: turning connecting paths into generalized rules.
//!
//! Each path between an example's subject and object becomes one rule
//! whose body is the path's predicate sequence and whose head is the
//! example's predicate. The per-example pipeline (local graph → paths →
//! rules) is side-effect-free, which is what makes examples the unit of
//! parallel work during mining.

use std::collections::HashSet;

use crate::graph::Triple;
use crate::graph::index::KnowledgeGraph;
use crate::graph::local::{SearchBudget, build_local_graph};
use crate::graph::paths::{Path, extract_paths};

use super::{Polarity, Rule};

/// Generalize paths into rules with the given head statement.
///
/// A length-1 path that *is* the head statement is skipped: a rule cannot
/// be evidence for itself.
pub fn synthesize(paths: &[Path], head: &Triple, polarity: Polarity) -> Vec<Rule> {
    let mut rules = Vec::with_capacity(paths.len());
    for path in paths {
        if path.len() == 1 && path[0] == *head {
            continue;
        }
        let predicates: Vec<_> = path.iter().map(|t| t.predicate).collect();
        rules.push(Rule::from_chain(&predicates, head.predicate, polarity));
    }
    rules
}

/// Run the full per-example pipeline: build the local graph around the
/// statement's endpoints, extract paths up to the effectively searched
/// length, and synthesize deduplicated rules.
pub fn rules_for_example(
    graph: &KnowledgeGraph,
    statement: &Triple,
    polarity: Polarity,
    budget: &SearchBudget,
) -> Vec<Rule> {
    let local = build_local_graph(graph, statement.subject, statement.object, budget);
    let paths = extract_paths(
        &local,
        statement.subject,
        statement.object,
        local.effective_max_len(),
    );
    // Paths differing only in intermediate bindings synthesize the same
    // rule; deduplicate here so coverage sees each rule once per example.
    let mut seen = HashSet::new();
    synthesize(&paths, statement, polarity)
        .into_iter()
        .filter(|rule| seen.insert(rule.clone()))
        .collect()
}
