//! Base-graph loading from RDF dump files via oxigraph's parsers.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model as ox;

use crate::error::GraphError;
use crate::term::{Term, TermTable};

use super::Triple;
use super::index::KnowledgeGraph;

/// Convert an oxigraph subject into a veracity term.
pub(crate) fn term_from_subject(subject: &ox::NamedOrBlankNode) -> Term {
    match subject {
        ox::NamedOrBlankNode::NamedNode(n) => Term::iri(n.as_str()),
        ox::NamedOrBlankNode::BlankNode(b) => Term::blank(b.as_str()),
    }
}

/// Convert an oxigraph term into a veracity term.
pub(crate) fn term_from_object(object: &ox::Term) -> Term {
    match object {
        ox::Term::NamedNode(n) => Term::iri(n.as_str()),
        ox::Term::BlankNode(b) => Term::blank(b.as_str()),
        ox::Term::Literal(lit) => {
            if let Some(lang) = lit.language() {
                Term::lang_literal(lit.value(), lang)
            } else {
                Term::typed_literal(lit.value(), lit.datatype().as_str())
            }
        }
    }
}

fn format_for(path: &Path) -> Result<RdfFormat, GraphError> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(RdfFormat::from_extension)
        .ok_or_else(|| GraphError::UnsupportedFormat {
            path: path.display().to_string(),
        })
}

/// Load an RDF dump file into an existing graph. Returns the number of
/// distinct triples added.
pub fn load_into(
    path: &Path,
    terms: &TermTable,
    graph: &KnowledgeGraph,
) -> Result<usize, GraphError> {
    let format = format_for(path)?;
    let file = File::open(path).map_err(|e| GraphError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let started = Instant::now();
    let mut added = 0usize;
    for quad in RdfParser::from_format(format).for_reader(BufReader::new(file)) {
        let quad = quad.map_err(|e| GraphError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let subject = terms.intern(&term_from_subject(&quad.subject))?;
        let predicate = terms.intern(&Term::iri(quad.predicate.as_str()))?;
        let object = terms.intern(&term_from_object(&quad.object))?;
        if graph.insert_triple(&Triple::new(subject, predicate, object)) {
            added += 1;
        }
    }

    tracing::info!(
        path = %path.display(),
        triples = added,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "loaded graph dump"
    );
    Ok(added)
}

/// Load an RDF dump file into a fresh knowledge graph.
pub fn load_graph(path: &Path, terms: &TermTable) -> Result<KnowledgeGraph, GraphError> {
    let graph = KnowledgeGraph::new();
    load_into(path, terms, &graph)?;
    Ok(graph)
}
