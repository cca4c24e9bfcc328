//! Bounded-length path extraction from a local graph.
//!
//! Enumerates every distinct chain of edges connecting a subject to an
//! object, one length at a time. Paths that share an edge-label sequence
//! but bind different intermediate nodes are distinct values here; rule
//! synthesis deduplicates them downstream by rule identity.

use crate::term::TermId;

use super::Triple;
use super::local::LocalGraph;

/// An ordered chain of edges where each edge's object is the next edge's
/// subject. Length = number of edges.
pub type Path = Vec<Triple>;

/// Enumerate all paths from `subject` to `object` with 1 to `max_len`
/// edges.
pub fn extract_paths(
    local: &LocalGraph,
    subject: TermId,
    object: TermId,
    max_len: usize,
) -> Vec<Path> {
    let mut paths = Vec::new();
    let mut stack = Vec::new();
    for len in 1..=max_len {
        walk(local, subject, object, len, &mut stack, &mut paths);
    }
    paths
}

fn walk(
    local: &LocalGraph,
    node: TermId,
    goal: TermId,
    remaining: usize,
    stack: &mut Vec<Triple>,
    paths: &mut Vec<Path>,
) {
    for edge in local.triples_from(node) {
        if remaining == 1 {
            if edge.object == goal {
                let mut path = stack.clone();
                path.push(*edge);
                paths.push(path);
            }
        } else {
            stack.push(*edge);
            walk(local, edge.object, goal, remaining - 1, stack, paths);
            stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::index::KnowledgeGraph;
    use crate::graph::local::{SearchBudget, build_local_graph};
    use std::time::Duration;

    fn t(id: u64) -> TermId {
        TermId::new(id).unwrap()
    }

    fn local_for(kg: &KnowledgeGraph, s: TermId, o: TermId) -> LocalGraph {
        build_local_graph(
            kg,
            s,
            o,
            &SearchBudget {
                initial_max_len: 3,
                absolute_max_len: 8,
                hard_ceiling: 100,
                probe_timeout: Duration::from_secs(1),
            },
        )
    }

    #[test]
    fn single_edge_path() {
        let kg = KnowledgeGraph::new();
        kg.insert_triple(&Triple::new(t(1), t(10), t(2)));
        let local = local_for(&kg, t(1), t(2));
        let paths = extract_paths(&local, t(1), t(2), local.effective_max_len());
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0], vec![Triple::new(t(1), t(10), t(2))]);
    }

    #[test]
    fn chain_and_shortcut_are_separate_paths() {
        let kg = KnowledgeGraph::new();
        kg.insert_triple(&Triple::new(t(1), t(10), t(2)));
        kg.insert_triple(&Triple::new(t(2), t(10), t(3)));
        kg.insert_triple(&Triple::new(t(1), t(11), t(3)));
        let local = local_for(&kg, t(1), t(3));
        let paths = extract_paths(&local, t(1), t(3), local.effective_max_len());

        assert_eq!(paths.len(), 2);
        let lengths: Vec<usize> = paths.iter().map(Vec::len).collect();
        assert!(lengths.contains(&1));
        assert!(lengths.contains(&2));
    }

    #[test]
    fn paths_are_properly_linked() {
        let kg = KnowledgeGraph::new();
        kg.insert_triple(&Triple::new(t(1), t(10), t(2)));
        kg.insert_triple(&Triple::new(t(2), t(11), t(3)));
        kg.insert_triple(&Triple::new(t(3), t(12), t(4)));
        let local = local_for(&kg, t(1), t(4));
        let paths = extract_paths(&local, t(1), t(4), local.effective_max_len());

        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert_eq!(path.len(), 3);
        assert_eq!(path[0].subject, t(1));
        for window in path.windows(2) {
            assert_eq!(window[0].object, window[1].subject);
        }
        assert_eq!(path[2].object, t(4));
    }

    #[test]
    fn distinct_intermediates_yield_distinct_paths() {
        // two 2-hop routes with the same predicates through different nodes
        let kg = KnowledgeGraph::new();
        kg.insert_triple(&Triple::new(t(1), t(10), t(2)));
        kg.insert_triple(&Triple::new(t(2), t(10), t(4)));
        kg.insert_triple(&Triple::new(t(1), t(10), t(3)));
        kg.insert_triple(&Triple::new(t(3), t(10), t(4)));
        let local = local_for(&kg, t(1), t(4));
        let paths = extract_paths(&local, t(1), t(4), local.effective_max_len());
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn empty_local_graph_yields_no_paths() {
        let kg = KnowledgeGraph::new();
        let local = local_for(&kg, t(1), t(2));
        assert!(extract_paths(&local, t(1), t(2), 3).is_empty());
    }
}
