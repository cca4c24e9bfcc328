//! Training and test datasets of reified statements.
//!
//! Both dataset files are N-Triples where each fact is a fixed-size block
//! of consecutive lines reifying one statement:
//!
//! ```text
//! <fact> rdf:type rdf:Statement .
//! <fact> rdf:subject <s> .
//! <fact> rdf:predicate <p> .
//! <fact> rdf:object <o> .
//! <fact> <http://swc2017.aksw.org/hasTruthValue> "1.0"^^xsd:double .
//! ```
//!
//! Training records carry all five lines; test records omit the truth
//! value. The lines of one record may appear in any order within their
//! block, but blocks never interleave.

use std::fs;
use std::io::Write;
use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser};
use tracing::info;

use crate::error::DatasetError;
use crate::graph::Triple;
use crate::graph::load::{term_from_object, term_from_subject};
use crate::term::{Term, TermTable};
use crate::vocab;

/// One labeled fact from a training set.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingEntry {
    /// IRI of the reified statement itself.
    pub fact: Term,
    /// The statement the fact reifies, interned against the base graph.
    pub statement: Triple,
    /// 1.0 for a true fact, 0.0 for a false one.
    pub truth_value: f64,
}

/// One unlabeled fact from a test set.
#[derive(Debug, Clone, PartialEq)]
pub struct TestEntry {
    pub fact: Term,
    pub statement: Triple,
}

#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub entries: Vec<TrainingEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct TestSet {
    pub entries: Vec<TestEntry>,
}

/// The reified pieces of one record, accumulated line by line.
#[derive(Default)]
struct RecordFields {
    fact: Option<Term>,
    subject: Option<Term>,
    predicate: Option<Term>,
    object: Option<Term>,
    truth_value: Option<String>,
}

impl RecordFields {
    fn from_lines(lines: &[&str], record: usize) -> Result<Self, DatasetError> {
        let mut fields = Self::default();
        let parser = RdfParser::from_format(RdfFormat::NTriples);
        let block = lines.join("\n");

        for quad in parser.for_reader(block.as_bytes()) {
            let quad = quad.map_err(|e| DatasetError::Parse {
                record,
                message: e.to_string(),
            })?;
            let subject = term_from_subject(&quad.subject);
            let object = term_from_object(&quad.object);
            match quad.predicate.as_str() {
                vocab::RDF_TYPE if object.as_iri() == Some(vocab::RDF_STATEMENT) => {
                    fields.fact = Some(subject);
                }
                vocab::RDF_SUBJECT => fields.subject = Some(object),
                vocab::RDF_PREDICATE => fields.predicate = Some(object),
                vocab::RDF_OBJECT => fields.object = Some(object),
                vocab::HAS_TRUTH_VALUE => {
                    if let Term::Literal { lexical, .. } = &object {
                        fields.truth_value = Some(lexical.clone());
                    }
                }
                _ => {}
            }
        }
        Ok(fields)
    }

    fn statement(&self, terms: &TermTable, record: usize) -> Result<Triple, DatasetError> {
        Ok(Triple::new(
            terms.intern(require(&self.subject, record, "rdf:subject")?)?,
            terms.intern(require(&self.predicate, record, "rdf:predicate")?)?,
            terms.intern(require(&self.object, record, "rdf:object")?)?,
        ))
    }

    fn fact(self, record: usize) -> Result<Term, DatasetError> {
        self.fact.ok_or(DatasetError::MissingField {
            record,
            field: "rdf:type rdf:Statement",
        })
    }
}

fn require<'a>(
    field: &'a Option<Term>,
    record: usize,
    name: &'static str,
) -> Result<&'a Term, DatasetError> {
    field
        .as_ref()
        .ok_or(DatasetError::MissingField { record, field: name })
}

fn read_records(path: &Path, lines_per_record: usize) -> Result<Vec<Vec<String>>, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io { source })?;
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();

    let mut records = Vec::with_capacity(lines.len() / lines_per_record);
    for (record, chunk) in lines.chunks(lines_per_record).enumerate() {
        if chunk.len() != lines_per_record {
            return Err(DatasetError::TruncatedRecord {
                record,
                expected: lines_per_record,
            });
        }
        records.push(chunk.iter().map(|l| l.to_string()).collect());
    }
    Ok(records)
}

impl TrainingSet {
    /// Parse a five-line-per-record labeled dataset.
    pub fn from_file(path: &Path, terms: &TermTable) -> Result<Self, DatasetError> {
        let mut entries = Vec::new();
        for (record, block) in read_records(path, 5)?.into_iter().enumerate() {
            let lines: Vec<&str> = block.iter().map(String::as_str).collect();
            let fields = RecordFields::from_lines(&lines, record)?;
            let statement = fields.statement(terms, record)?;
            let value = fields.truth_value.clone().ok_or(DatasetError::MissingField {
                record,
                field: "hasTruthValue",
            })?;
            let truth_value: f64 = value.parse().map_err(|_| DatasetError::BadTruthValue {
                record,
                value: value.clone(),
            })?;
            entries.push(TrainingEntry {
                fact: fields.fact(record)?,
                statement,
                truth_value,
            });
        }
        info!(path = %path.display(), entries = entries.len(), "loaded training set");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TestSet {
    /// Parse a four-line-per-record unlabeled dataset.
    pub fn from_file(path: &Path, terms: &TermTable) -> Result<Self, DatasetError> {
        let mut entries = Vec::new();
        for (record, block) in read_records(path, 4)?.into_iter().enumerate() {
            let lines: Vec<&str> = block.iter().map(String::as_str).collect();
            let fields = RecordFields::from_lines(&lines, record)?;
            let statement = fields.statement(terms, record)?;
            entries.push(TestEntry {
                fact: fields.fact(record)?,
                statement,
            });
        }
        info!(path = %path.display(), entries = entries.len(), "loaded test set");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Write scored facts as N-Triples truth-value annotations.
pub fn write_results(results: &[(Term, f64)], path: &Path) -> Result<(), DatasetError> {
    let mut out = Vec::new();
    for (fact, score) in results {
        writeln!(
            out,
            "{fact} <{}> \"{score}\"^^<{}> .",
            vocab::HAS_TRUTH_VALUE,
            vocab::XSD_DOUBLE
        )
        .map_err(|source| DatasetError::Io { source })?;
    }
    fs::write(path, out).map_err(|source| DatasetError::Io { source })?;
    info!(path = %path.display(), facts = results.len(), "wrote result file");
    Ok(())
}
