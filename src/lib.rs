//! # veracity
//!
//! A rule-mining fact checker for RDF knowledge graphs. Given a base graph
//! and a set of labeled example statements, veracity mines Horn-style
//! inference rules from the paths connecting each example's subject and
//! object, weights them by how well they separate true from false examples,
//! and uses the strongest applicable rule to score unseen statements.
//!
//! ## Architecture
//!
//! - **Terms** (`term`): interned RDF terms (IRIs, blank nodes, literals)
//! - **Knowledge graph** (`graph`): dual-indexed in-memory triple store
//!   (petgraph + DashMap) with local-subgraph construction and bounded
//!   path extraction
//! - **Rules** (`rules`): variablized body-chain rules with polarity,
//!   applicability checking, and a weight-sorted persistent rule store
//! - **Scoring** (`scoring`): parallel rule mining, coverage-based
//!   confidence weighting, and per-statement truth scoring
//! - **Datasets** (`dataset`): reified-statement training/test set loading
//!   and result-file writing
//!
//! ## Library usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use veracity::config::Parameters;
//! use veracity::graph::index::KnowledgeGraph;
//! use veracity::scoring::FactScorer;
//! use veracity::term::TermTable;
//!
//! let terms = Arc::new(TermTable::new());
//! let graph = Arc::new(KnowledgeGraph::new());
//! let params = Parameters::default();
//! let mut scorer = FactScorer::new(graph, terms);
//! // mine from a TrainingSet, then scorer.score(&statement)
//! # let _ = (&params, &mut scorer);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod label;
pub mod rules;
pub mod scoring;
pub mod term;
pub mod vocab;
