//! Well-known IRIs used by the dataset format and log labeling.

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:Statement`, the class of reified statements.
pub const RDF_STATEMENT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Statement";
/// `rdf:subject` of a reified statement.
pub const RDF_SUBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#subject";
/// `rdf:predicate` of a reified statement.
pub const RDF_PREDICATE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#predicate";
/// `rdf:object` of a reified statement.
pub const RDF_OBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#object";
/// `rdfs:label`, used to render readable names in logs.
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
/// Truth-value annotation predicate used by the training and result files.
pub const HAS_TRUTH_VALUE: &str = "http://swc2017.aksw.org/hasTruthValue";
/// `xsd:double`, the datatype of truth values and scores.
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
