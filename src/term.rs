//! RDF terms and the shared term interner.
//!
//! Every node of the knowledge graph — IRI, blank node, or literal — is
//! interned once into a [`TermId`]. The graph, paths, and rules all operate
//! on ids; the [`TermTable`] maps back to full terms at the serialization
//! and logging boundaries.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};

use crate::error::TermError;

/// An RDF term: an IRI, a blank node, or a (possibly tagged) literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// A named resource.
    Iri(String),
    /// A blank node, identified by its local label.
    Blank(String),
    /// A literal with optional language tag or datatype IRI.
    Literal {
        lexical: String,
        language: Option<String>,
        datatype: Option<String>,
    },
}

impl Term {
    /// Create an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Create a blank node term.
    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }

    /// Create a plain literal.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    /// Create a language-tagged literal.
    pub fn lang_literal(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Create a datatyped literal.
    pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    /// The IRI string, if this term is an IRI.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Whether this term is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }
}

fn escape_literal(lexical: &str) -> String {
    lexical
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

impl std::fmt::Display for Term {
    /// N-Triples-style rendering: `<iri>`, `_:label`, `"lex"@en`, `"lex"^^<dt>`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::Literal {
                lexical,
                language,
                datatype,
            } => {
                write!(f, "\"{}\"", escape_literal(lexical))?;
                if let Some(lang) = language {
                    write!(f, "@{lang}")?;
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{dt}>")?;
                }
                Ok(())
            }
        }
    }
}

/// Unique, niche-optimized identifier for an interned term.
///
/// Uses `NonZeroU64` so that `Option<TermId>` is the same size as `TermId`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct TermId(NonZeroU64);

impl TermId {
    /// Create a `TermId` from a raw `u64`. Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(TermId)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t:{}", self.0)
    }
}

/// Thread-safe bidirectional term interner.
///
/// Ids are allocated monotonically from 1. Safe to share across mining
/// workers via `Arc<TermTable>`.
pub struct TermTable {
    ids: DashMap<Term, TermId>,
    terms: DashMap<TermId, Term>,
    next: AtomicU64,
}

impl TermTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            ids: DashMap::new(),
            terms: DashMap::new(),
            next: AtomicU64::new(1),
        }
    }

    /// Intern a term, returning its id. Idempotent.
    pub fn intern(&self, term: &Term) -> Result<TermId, TermError> {
        if let Some(id) = self.ids.get(term) {
            return Ok(*id);
        }
        match self.ids.entry(term.clone()) {
            Entry::Occupied(occupied) => Ok(*occupied.get()),
            Entry::Vacant(vacant) => {
                let raw = self.next.fetch_add(1, Ordering::Relaxed);
                let id = TermId::new(raw).ok_or(TermError::SpaceExhausted)?;
                self.terms.insert(id, term.clone());
                vacant.insert(id);
                Ok(id)
            }
        }
    }

    /// Intern an IRI string.
    pub fn intern_iri(&self, iri: &str) -> Result<TermId, TermError> {
        self.intern(&Term::iri(iri))
    }

    /// Look up the id of an already-interned term.
    pub fn lookup(&self, term: &Term) -> Option<TermId> {
        self.ids.get(term).map(|id| *id)
    }

    /// Resolve an id back to its term.
    pub fn resolve(&self, id: TermId) -> Option<Term> {
        self.terms.get(&id).map(|t| t.clone())
    }

    /// Render an id for logs, falling back to the raw id if unknown.
    pub fn display(&self, id: TermId) -> String {
        match self.resolve(id) {
            Some(term) => term.to_string(),
            None => id.to_string(),
        }
    }

    /// Number of interned terms.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for TermTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TermTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermTable").field("terms", &self.len()).finish()
    }
}
