//! In-memory knowledge graph with dual-indexing.
//!
//! Uses `petgraph` for the graph structure and `DashMap` for O(1) node
//! lookups. The graph is insert-only: once loaded it is shared read-only
//! across mining workers without further locking discipline.

use std::sync::RwLock;

use dashmap::{DashMap, DashSet};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::term::TermId;

use super::Triple;

/// In-memory knowledge graph backed by petgraph with dual-indexing.
///
/// Edges carry their predicate; parallel edges between the same pair of
/// nodes are kept (one per distinct predicate), exact duplicates are not.
pub struct KnowledgeGraph {
    /// The directed graph: nodes are TermIds, edge weights are predicates.
    graph: RwLock<DiGraph<TermId, TermId>>,
    /// TermId → NodeIndex mapping for O(1) node lookups.
    node_index: DashMap<TermId, NodeIndex>,
    /// Set of inserted triples, for duplicate suppression and existence tests.
    triples: DashSet<Triple>,
}

impl KnowledgeGraph {
    /// Create a new empty knowledge graph.
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(DiGraph::new()),
            node_index: DashMap::new(),
            triples: DashSet::new(),
        }
    }

    /// Ensure a node exists for the given term, returning its NodeIndex.
    fn ensure_node(&self, term: TermId) -> NodeIndex {
        if let Some(idx) = self.node_index.get(&term) {
            return *idx.value();
        }
        let mut graph = self.graph.write().expect("graph lock poisoned");
        // Double-check after acquiring the write lock
        if let Some(idx) = self.node_index.get(&term) {
            return *idx.value();
        }
        let idx = graph.add_node(term);
        self.node_index.insert(term, idx);
        idx
    }

    /// Insert a triple into the graph.
    ///
    /// Creates nodes for subject and object if they don't exist. Returns
    /// `false` if the exact triple was already present (dump files often
    /// repeat triples; path enumeration must not double-count them).
    pub fn insert_triple(&self, triple: &Triple) -> bool {
        if !self.triples.insert(*triple) {
            return false;
        }
        let subj_idx = self.ensure_node(triple.subject);
        let obj_idx = self.ensure_node(triple.object);
        let mut graph = self.graph.write().expect("graph lock poisoned");
        graph.add_edge(subj_idx, obj_idx, triple.predicate);
        true
    }

    /// Exact-pattern existence test.
    pub fn has_triple(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Whether a node exists for the given term.
    pub fn has_node(&self, term: TermId) -> bool {
        self.node_index.contains_key(&term)
    }

    /// All objects reachable from `subject` over `predicate`.
    pub fn objects_of(&self, subject: TermId, predicate: TermId) -> Vec<TermId> {
        let graph = self.graph.read().expect("graph lock poisoned");
        let subj_idx = match self.node_index.get(&subject) {
            Some(idx) => *idx.value(),
            None => return vec![],
        };
        graph
            .edges_directed(subj_idx, Direction::Outgoing)
            .filter(|e| *e.weight() == predicate)
            .filter_map(|e| graph.node_weight(e.target()).copied())
            .collect()
    }

    /// All triples with the given subject.
    pub fn triples_from(&self, subject: TermId) -> Vec<Triple> {
        let graph = self.graph.read().expect("graph lock poisoned");
        let subj_idx = match (self.node_index.get(&subject)).map(|idx| *idx.value()) {
            Some(idx) => idx,
            None => return vec![],
        };
        graph
            .edges_directed(subj_idx, Direction::Outgoing)
            .filter_map(|e| {
                let object = *graph.node_weight(e.target())?;
                Some(Triple::new(subject, *e.weight(), object))
            })
            .collect()
    }

    /// All triples directly connecting `subject` to `object`.
    pub fn edges_between(&self, subject: TermId, object: TermId) -> Vec<Triple> {
        let graph = self.graph.read().expect("graph lock poisoned");
        let (subj_idx, obj_idx) = match (
            self.node_index.get(&subject).map(|idx| *idx.value()),
            self.node_index.get(&object).map(|idx| *idx.value()),
        ) {
            (Some(s), Some(o)) => (s, o),
            _ => return vec![],
        };
        graph
            .edges_connecting(subj_idx, obj_idx)
            .map(|e| Triple::new(subject, *e.weight(), object))
            .collect()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    /// Number of distinct triples.
    pub fn triple_count(&self) -> usize {
        self.triples.len()
    }
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KnowledgeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeGraph")
            .field("nodes", &self.node_count())
            .field("triples", &self.triple_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::TermId;

    fn t(id: u64) -> TermId {
        TermId::new(id).unwrap()
    }

    #[test]
    fn insert_and_query() {
        let kg = KnowledgeGraph::new();
        let (a, rel, b) = (t(1), t(10), t(2));
        assert!(kg.insert_triple(&Triple::new(a, rel, b)));

        assert!(kg.has_node(a));
        assert!(kg.has_node(b));
        assert_eq!(kg.node_count(), 2);
        assert_eq!(kg.triple_count(), 1);
        assert_eq!(kg.objects_of(a, rel), vec![b]);
        assert!(kg.has_triple(&Triple::new(a, rel, b)));
        assert!(!kg.has_triple(&Triple::new(b, rel, a)));
    }

    #[test]
    fn duplicate_triples_are_suppressed() {
        let kg = KnowledgeGraph::new();
        let triple = Triple::new(t(1), t(10), t(2));
        assert!(kg.insert_triple(&triple));
        assert!(!kg.insert_triple(&triple));
        assert_eq!(kg.triple_count(), 1);
        assert_eq!(kg.edges_between(t(1), t(2)).len(), 1);
    }

    #[test]
    fn parallel_edges_with_distinct_predicates() {
        let kg = KnowledgeGraph::new();
        kg.insert_triple(&Triple::new(t(1), t(10), t(2)));
        kg.insert_triple(&Triple::new(t(1), t(11), t(2)));

        let between = kg.edges_between(t(1), t(2));
        assert_eq!(between.len(), 2);
        assert_eq!(kg.objects_of(t(1), t(10)), vec![t(2)]);
    }

    #[test]
    fn triples_from_subject() {
        let kg = KnowledgeGraph::new();
        kg.insert_triple(&Triple::new(t(1), t(10), t(2)));
        kg.insert_triple(&Triple::new(t(1), t(11), t(3)));
        kg.insert_triple(&Triple::new(t(2), t(10), t(3)));

        let from = kg.triples_from(t(1));
        assert_eq!(from.len(), 2);
        assert!(from.iter().all(|tr| tr.subject == t(1)));
    }

    #[test]
    fn empty_queries() {
        let kg = KnowledgeGraph::new();
        assert!(kg.objects_of(t(1), t(2)).is_empty());
        assert!(kg.triples_from(t(1)).is_empty());
        assert!(kg.edges_between(t(1), t(2)).is_empty());
        assert!(!kg.has_node(t(1)));
    }
}
