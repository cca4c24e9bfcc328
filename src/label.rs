//! Human-readable names for graph terms via `rdfs:label`.
//!
//! Scores are logged per statement during evaluation; raw DBpedia-style
//! IRIs make those logs unreadable, so the labeler swaps in the entity's
//! label where the base graph carries one.

use crate::graph::Triple;
use crate::graph::index::KnowledgeGraph;
use crate::term::{Term, TermId, TermTable};
use crate::vocab;

/// Resolves `rdfs:label` annotations from the base graph.
pub struct Labeler<'a> {
    graph: &'a KnowledgeGraph,
    terms: &'a TermTable,
    label_predicate: Option<TermId>,
}

impl<'a> Labeler<'a> {
    pub fn new(graph: &'a KnowledgeGraph, terms: &'a TermTable) -> Self {
        // if the graph never mentions rdfs:label, no term can have one
        let label_predicate = terms.lookup(&Term::iri(vocab::RDFS_LABEL));
        Self {
            graph,
            terms,
            label_predicate,
        }
    }

    /// The term's label if the graph has one, otherwise its N-Triples form.
    pub fn label(&self, term: TermId) -> String {
        self.label_predicate
            .and_then(|label| {
                self.graph
                    .objects_of(term, label)
                    .into_iter()
                    .find_map(|object| match self.terms.resolve(object) {
                        Some(Term::Literal { lexical, .. }) => Some(lexical),
                        _ => None,
                    })
            })
            .unwrap_or_else(|| self.terms.display(term))
    }

    /// Render a statement as `subject predicate object` using labels.
    pub fn statement(&self, statement: &Triple) -> String {
        format!(
            "{} {} {}",
            self.label(statement.subject),
            self.label(statement.predicate),
            self.label(statement.object)
        )
    }
}
