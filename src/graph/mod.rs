//! Knowledge graph: dual-indexed in-memory triple store.
//!
//! The base graph is loaded once ([`load`]), indexed for fast per-node
//! queries ([`index`]), and stays read-only for the rest of a run. Around
//! each examined statement the miner builds a small example-scoped
//! subgraph ([`local`]) from which bounded-length paths are enumerated
//! ([`paths`]).

pub mod index;
pub mod load;
pub mod local;
pub mod paths;

use serde::{Deserialize, Serialize};

use crate::term::TermId;

/// A triple (subject, predicate, object) over interned terms.
///
/// Also used as a *statement*: a candidate fact under evaluation has the
/// identical shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// The subject of the triple.
    pub subject: TermId,
    /// The predicate (relation) of the triple.
    pub predicate: TermId,
    /// The object of the triple.
    pub object: TermId,
}

impl Triple {
    /// Create a new triple.
    pub fn new(subject: TermId, predicate: TermId, object: TermId) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}
