//! Horn-style inference rules mined from connecting paths.
//!
//! A rule is a variablized body chain plus a head edge linking the chain's
//! endpoints: `(?e0 <p> ?e1), (?e1 <q> ?e2) -> (?e0 <r> ?e2)`. Rule
//! identity is the body, head, and polarity; the confidence weight and
//! coverage counters attached by the weighting pass are deliberately not
//! part of identity, so the same rule discovered from different examples
//! deduplicates.

pub mod apply;
pub mod store;
pub mod synth;

use crate::error::RuleError;
use crate::term::{Term, TermId, TermTable};

/// One edge pattern of a rule: two positional variable slots joined by a
/// concrete predicate. Slot `i` corresponds to the variable `?ei`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeConstraint {
    pub subject_slot: usize,
    pub predicate: TermId,
    pub object_slot: usize,
}

impl EdgeConstraint {
    pub fn new(subject_slot: usize, predicate: TermId, object_slot: usize) -> Self {
        Self {
            subject_slot,
            predicate,
            object_slot,
        }
    }
}

/// Whether a rule was synthesized from a true or a false example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Polarity {
    Positive,
    Negative,
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarity::Positive => write!(f, "positive"),
            Polarity::Negative => write!(f, "negative"),
        }
    }
}

impl std::str::FromStr for Polarity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Polarity::Positive),
            "negative" => Ok(Polarity::Negative),
            _ => Err(()),
        }
    }
}

/// A mined inference rule. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rule {
    /// Body chain: constraint `i` joins `?ei` to `?e(i+1)`.
    pub body: Vec<EdgeConstraint>,
    /// Head edge joining `?e0` to `?e(body.len())`.
    pub head: EdgeConstraint,
    pub polarity: Polarity,
}

impl Rule {
    /// Build a rule from a body predicate chain and a head predicate.
    pub fn from_chain(body_predicates: &[TermId], head_predicate: TermId, polarity: Polarity) -> Self {
        let body = body_predicates
            .iter()
            .enumerate()
            .map(|(i, &p)| EdgeConstraint::new(i, p, i + 1))
            .collect::<Vec<_>>();
        let head = EdgeConstraint::new(0, head_predicate, body_predicates.len());
        Self {
            body,
            head,
            polarity,
        }
    }

    /// Number of edges in the body.
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Canonical compact chain expression, e.g.
    /// `(?e0 <http://ex/p> ?e1) -> (?e0 <http://ex/q> ?e1)`.
    ///
    /// This is the on-disk rule syntax and the form used in logs; it is
    /// parsed back by [`Rule::parse_chain`].
    pub fn chain_expression(&self, terms: &TermTable) -> String {
        let atom = |c: &EdgeConstraint| {
            format!(
                "(?e{} {} ?e{})",
                c.subject_slot,
                terms.display(c.predicate),
                c.object_slot
            )
        };
        let body = self.body.iter().map(atom).collect::<Vec<_>>().join(", ");
        format!("{} -> {}", body, atom(&self.head))
    }

    /// Parse a compact chain expression produced by [`Rule::chain_expression`].
    ///
    /// `line` is only used for error reporting.
    pub fn parse_chain(
        expr: &str,
        polarity: Polarity,
        terms: &TermTable,
        line: usize,
    ) -> Result<Self, RuleError> {
        let bad = |message: String| RuleError::BadChain { line, message };

        let (body_part, head_part) = expr
            .split_once(" -> ")
            .ok_or_else(|| bad("missing ` -> ` separator".into()))?;

        let mut body = Vec::new();
        // `), (` cannot occur inside an IRI (IRIs contain no spaces), so it
        // splits atoms unambiguously.
        for atom in body_part.split("), (") {
            body.push(parse_atom(atom, terms).map_err(&bad)?);
        }
        let head = parse_atom(head_part, terms).map_err(&bad)?;

        if body.is_empty() {
            return Err(bad("empty body".into()));
        }
        for (i, constraint) in body.iter().enumerate() {
            if constraint.subject_slot != i || constraint.object_slot != i + 1 {
                return Err(bad(format!(
                    "body atom {i} does not chain ?e{i} to ?e{}",
                    i + 1
                )));
            }
        }
        if head.subject_slot != 0 || head.object_slot != body.len() {
            return Err(bad("head does not join the chain endpoints".into()));
        }

        Ok(Self {
            body,
            head,
            polarity,
        })
    }
}

fn parse_atom(atom: &str, terms: &TermTable) -> Result<EdgeConstraint, String> {
    let inner = atom.trim().trim_start_matches('(').trim_end_matches(')');
    let mut tokens = inner.split_whitespace();
    let (subject, predicate, object) = match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(s), Some(p), Some(o), None) => (s, p, o),
        _ => return Err(format!("atom `{atom}` is not `?eN <iri> ?eM`")),
    };

    let slot = |token: &str| -> Result<usize, String> {
        token
            .strip_prefix("?e")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| format!("`{token}` is not a slot variable"))
    };
    let iri = predicate
        .strip_prefix('<')
        .and_then(|p| p.strip_suffix('>'))
        .ok_or_else(|| format!("`{predicate}` is not an IRI"))?;

    let predicate = terms
        .intern(&Term::iri(iri))
        .map_err(|e| e.to_string())?;
    Ok(EdgeConstraint::new(slot(subject)?, predicate, slot(object)?))
}

/// How often a rule (and its head-predicate group) covered examples
/// consistently vs. inconsistently with its polarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageCounts {
    /// Covered examples that agree with the rule's polarity.
    pub examples: usize,
    /// Covered examples that contradict the rule's polarity.
    pub counters: usize,
    /// Agreeing examples over all rules sharing the head predicate.
    pub examples_unbound: usize,
    /// Contradicting examples over all rules sharing the head predicate.
    pub counters_unbound: usize,
}

/// A rule together with its confidence weight.
///
/// Lower weight means stronger evidence: 0.0 is a perfectly reliable rule,
/// 1.0 carries no evidence at all.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRule {
    pub rule: Rule,
    pub weight: f64,
    pub coverage: CoverageCounts,
}

impl WeightedRule {
    pub fn new(rule: Rule, weight: f64, coverage: CoverageCounts) -> Self {
        Self {
            rule,
            weight,
            coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TermTable {
        TermTable::new()
    }

    #[test]
    fn from_chain_assigns_sequential_slots() {
        let terms = table();
        let p = terms.intern_iri("http://ex/p").unwrap();
        let q = terms.intern_iri("http://ex/q").unwrap();
        let h = terms.intern_iri("http://ex/h").unwrap();

        let rule = Rule::from_chain(&[p, q], h, Polarity::Positive);
        assert_eq!(rule.body_len(), 2);
        assert_eq!(rule.body[0], EdgeConstraint::new(0, p, 1));
        assert_eq!(rule.body[1], EdgeConstraint::new(1, q, 2));
        assert_eq!(rule.head, EdgeConstraint::new(0, h, 2));
    }

    #[test]
    fn identity_ignores_weight() {
        let terms = table();
        let p = terms.intern_iri("http://ex/p").unwrap();
        let h = terms.intern_iri("http://ex/h").unwrap();
        let rule = Rule::from_chain(&[p], h, Polarity::Positive);

        let a = WeightedRule::new(rule.clone(), 0.1, CoverageCounts::default());
        let b = WeightedRule::new(rule.clone(), 0.9, CoverageCounts::default());
        assert_eq!(a.rule, b.rule);
        assert_ne!(
            Rule {
                polarity: Polarity::Negative,
                ..rule
            },
            a.rule
        );
    }

    #[test]
    fn chain_expression_round_trips() {
        let terms = table();
        let p = terms.intern_iri("http://ex/p").unwrap();
        let q = terms.intern_iri("http://ex/q").unwrap();
        let h = terms.intern_iri("http://ex/h").unwrap();
        let rule = Rule::from_chain(&[p, q], h, Polarity::Negative);

        let expr = rule.chain_expression(&terms);
        assert_eq!(
            expr,
            "(?e0 <http://ex/p> ?e1), (?e1 <http://ex/q> ?e2) -> (?e0 <http://ex/h> ?e2)"
        );
        let parsed = Rule::parse_chain(&expr, Polarity::Negative, &terms, 1).unwrap();
        assert_eq!(parsed, rule);
    }

    #[test]
    fn parenthesized_iris_round_trip() {
        // DBpedia-style IRIs contain parentheses; the atom splitter must
        // not be confused by them
        let terms = table();
        let p = terms.intern_iri("http://ex/Foo_(bar)").unwrap();
        let h = terms.intern_iri("http://ex/h").unwrap();
        let rule = Rule::from_chain(&[p, p], h, Polarity::Positive);

        let expr = rule.chain_expression(&terms);
        let parsed = Rule::parse_chain(&expr, Polarity::Positive, &terms, 1).unwrap();
        assert_eq!(parsed, rule);
    }

    #[test]
    fn broken_chain_is_rejected() {
        let terms = table();
        let err = Rule::parse_chain(
            "(?e0 <http://ex/p> ?e2) -> (?e0 <http://ex/h> ?e1)",
            Polarity::Positive,
            &terms,
            3,
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::BadChain { line: 3, .. }));
    }

    #[test]
    fn missing_arrow_is_rejected() {
        let terms = table();
        let err =
            Rule::parse_chain("(?e0 <http://ex/p> ?e1)", Polarity::Positive, &terms, 9).unwrap_err();
        assert!(matches!(err, RuleError::BadChain { line: 9, .. }));
    }

    #[test]
    fn polarity_round_trips() {
        assert_eq!("positive".parse::<Polarity>().unwrap(), Polarity::Positive);
        assert_eq!("negative".parse::<Polarity>().unwrap(), Polarity::Negative);
        assert!("maybe".parse::<Polarity>().is_err());
        assert_eq!(Polarity::Positive.to_string(), "positive");
    }
}
