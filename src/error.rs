//! Rich diagnostic error types for the veracity fact checker.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the veracity fact checker.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum VeracityError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Term(#[from] TermError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Term errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TermError {
    #[error("term interner exhausted: cannot allocate more than u64::MAX term ids")]
    #[diagnostic(
        code(veracity::term::exhausted),
        help(
            "The term ID space is exhausted. This requires 2^64 distinct terms \
             and should never happen in practice — check for an interning loop."
        )
    )]
    SpaceExhausted,
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("failed to read graph dump {path}: {message}")]
    #[diagnostic(
        code(veracity::graph::load),
        help(
            "The dump file could not be read or parsed. Check that the path \
             exists and that the file is valid RDF in the format implied by \
             its extension."
        )
    )]
    Load { path: String, message: String },

    #[error("unsupported RDF format for {path}")]
    #[diagnostic(
        code(veracity::graph::format),
        help("Supported dump formats are N-Triples (.nt) and Turtle (.ttl).")
    )]
    UnsupportedFormat { path: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Term(#[from] TermError),
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("I/O error reading dataset: {source}")]
    #[diagnostic(
        code(veracity::dataset::io),
        help("Check that the dataset file exists and is readable.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("record {record} is truncated: expected {expected} N-Triples lines")]
    #[diagnostic(
        code(veracity::dataset::truncated),
        help(
            "Training records span five lines (type, subject, predicate, \
             object, truth value) and test records four. The file ended in \
             the middle of a record."
        )
    )]
    TruncatedRecord { record: usize, expected: usize },

    #[error("record {record} has no {field} triple")]
    #[diagnostic(
        code(veracity::dataset::missing_field),
        help(
            "Every record must reify its statement with rdf:subject, \
             rdf:predicate and rdf:object plus an rdf:type of rdf:Statement."
        )
    )]
    MissingField { record: usize, field: &'static str },

    #[error("record {record} has a non-numeric truth value: {value}")]
    #[diagnostic(
        code(veracity::dataset::bad_truth_value),
        help("Truth values must be doubles, conventionally 0.0 or 1.0.")
    )]
    BadTruthValue { record: usize, value: String },

    #[error("record {record} failed to parse: {message}")]
    #[diagnostic(
        code(veracity::dataset::parse),
        help("Each line of a record must be a single valid N-Triples triple.")
    )]
    Parse { record: usize, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Term(#[from] TermError),
}

// ---------------------------------------------------------------------------
// Rule errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RuleError {
    #[error("I/O error on rule file: {source}")]
    #[diagnostic(
        code(veracity::rules::io),
        help("Check that the rule file path is readable/writable.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule count header: {header}")]
    #[diagnostic(
        code(veracity::rules::bad_header),
        help(
            "The first line of a rule file must be the decimal number of \
             rule lines that follow. The file is likely corrupt."
        )
    )]
    BadHeader { header: String },

    #[error("malformed rule on line {line}: expected 3 `; `-separated fields, got {fields}")]
    #[diagnostic(
        code(veracity::rules::malformed_line),
        help(
            "Each rule line is `<polarity>; <chain expression>; <weight>`. \
             A different field count indicates corruption, not absence — \
             delete the file to force a fresh mining run."
        )
    )]
    MalformedLine { line: usize, fields: usize },

    #[error("unknown polarity `{token}` on line {line}")]
    #[diagnostic(
        code(veracity::rules::bad_polarity),
        help("The polarity field must be `positive` or `negative`.")
    )]
    BadPolarity { line: usize, token: String },

    #[error("unparseable weight `{value}` on line {line}")]
    #[diagnostic(
        code(veracity::rules::bad_weight),
        help("Weights are decimal doubles with `.` as the separator.")
    )]
    BadWeight { line: usize, value: String },

    #[error("bad chain expression on line {line}: {message}")]
    #[diagnostic(
        code(veracity::rules::bad_chain),
        help(
            "Chain expressions look like \
             `(?e0 <p> ?e1), (?e1 <q> ?e2) -> (?e0 <r> ?e2)`."
        )
    )]
    BadChain { line: usize, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Term(#[from] TermError),
}

// ---------------------------------------------------------------------------
// Scoring errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ScoreError {
    #[error("failed to build mining thread pool: {message}")]
    #[diagnostic(
        code(veracity::score::thread_pool),
        help("Check the configured mining thread count; 0 selects the rayon default.")
    )]
    ThreadPool { message: String },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    #[diagnostic(
        code(veracity::config::io),
        help("Check that the configuration file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {message}")]
    #[diagnostic(
        code(veracity::config::parse),
        help("The configuration file must be TOML with the documented keys.")
    )]
    Parse { path: String, message: String },
}

/// Convenience alias for functions returning veracity results.
pub type VeracityResult<T> = std::result::Result<T, VeracityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_error_converts_to_veracity_error() {
        let err = TermError::SpaceExhausted;
        let top: VeracityError = err.into();
        assert!(matches!(top, VeracityError::Term(TermError::SpaceExhausted)));
    }

    #[test]
    fn rule_error_display_names_the_line() {
        let err = RuleError::MalformedLine { line: 7, fields: 2 };
        let msg = format!("{err}");
        assert!(msg.contains("line 7"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn graph_error_wraps_term_error() {
        let err: GraphError = TermError::SpaceExhausted.into();
        assert!(matches!(err, GraphError::Term(TermError::SpaceExhausted)));
    }
}
