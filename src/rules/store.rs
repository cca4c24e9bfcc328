//! Persistent store of weighted rules, partitioned by polarity.
//!
//! Rules are held sorted ascending by weight so that scoring can stop at
//! the first applicable rule and know it is the strongest one. Ties are
//! broken by the canonical chain expression, which makes the on-disk file
//! byte-stable across mining runs.
//!
//! The file format is deliberately plain text so rule sets can be diffed
//! and hand-inspected: a count header line, then one
//! `<polarity>; <chain expression>; <weight>` line per rule.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::RuleError;
use crate::term::TermTable;

use super::{Polarity, Rule, WeightedRule};

/// Weighted rules split by polarity, each side sorted strongest-first
/// (ascending weight, chain expression as tiebreak).
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    positive: Vec<WeightedRule>,
    negative: Vec<WeightedRule>,
}

impl RuleStore {
    /// Partition and sort a freshly weighted rule set.
    pub fn from_rules(rules: Vec<WeightedRule>, terms: &TermTable) -> Self {
        let (positive, negative): (Vec<_>, Vec<_>) = rules
            .into_iter()
            .partition(|r| r.rule.polarity == Polarity::Positive);
        Self {
            positive: sorted(positive, terms),
            negative: sorted(negative, terms),
        }
    }

    pub fn positive(&self) -> &[WeightedRule] {
        &self.positive
    }

    pub fn negative(&self) -> &[WeightedRule] {
        &self.negative
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    /// Write the store to `path`, overwriting any existing file.
    pub fn save(&self, path: &Path, terms: &TermTable) -> Result<(), RuleError> {
        let file = File::create(path).map_err(|source| RuleError::Io { source })?;
        let mut out = BufWriter::new(file);

        let write = |out: &mut BufWriter<File>, rules: &[WeightedRule]| -> std::io::Result<()> {
            for weighted in rules {
                writeln!(
                    out,
                    "{}; {}; {}",
                    weighted.rule.polarity,
                    weighted.rule.chain_expression(terms),
                    weighted.weight
                )?;
            }
            Ok(())
        };

        writeln!(out, "{}", self.len()).map_err(|source| RuleError::Io { source })?;
        write(&mut out, &self.positive).map_err(|source| RuleError::Io { source })?;
        write(&mut out, &self.negative).map_err(|source| RuleError::Io { source })?;
        out.flush().map_err(|source| RuleError::Io { source })?;

        info!(path = %path.display(), rules = self.len(), "saved rule store");
        Ok(())
    }

    /// Load a previously saved store.
    ///
    /// A missing file, an empty file, or a file declaring zero rules all
    /// mean "no usable rule set" and return `Ok(None)` so the caller can
    /// fall back to mining. A present-but-corrupt file is an error: it is
    /// likelier to be a half-written artifact than an intentional state,
    /// and silently re-mining would mask that.
    pub fn load(path: &Path, terms: &TermTable) -> Result<Option<Self>, RuleError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no rule file");
                return Ok(None);
            }
            Err(source) => return Err(RuleError::Io { source }),
        };
        let mut lines = BufReader::new(file).lines();

        let header = match lines.next() {
            Some(line) => line.map_err(|source| RuleError::Io { source })?,
            None => return Ok(None),
        };
        let declared: usize = header
            .trim()
            .parse()
            .map_err(|_| RuleError::BadHeader { header: header.clone() })?;
        if declared == 0 {
            return Ok(None);
        }

        let mut rules = Vec::with_capacity(declared);
        for (i, line) in lines.enumerate() {
            let line = line.map_err(|source| RuleError::Io { source })?;
            if line.trim().is_empty() {
                continue;
            }
            // line 1 is the header
            rules.push(parse_rule_line(&line, i + 2, terms)?);
        }
        if rules.len() != declared {
            return Err(RuleError::BadHeader { header });
        }

        info!(path = %path.display(), rules = rules.len(), "loaded rule store");
        Ok(Some(Self::from_rules(rules, terms)))
    }
}

fn parse_rule_line(line: &str, number: usize, terms: &TermTable) -> Result<WeightedRule, RuleError> {
    let fields: Vec<&str> = line.splitn(3, "; ").collect();
    let &[polarity, chain, weight] = fields.as_slice() else {
        return Err(RuleError::MalformedLine {
            line: number,
            fields: fields.len(),
        });
    };

    let polarity: Polarity = polarity.parse().map_err(|_| RuleError::BadPolarity {
        line: number,
        token: polarity.to_string(),
    })?;
    let rule = Rule::parse_chain(chain, polarity, terms, number)?;
    let weight: f64 = weight.trim().parse().map_err(|_| RuleError::BadWeight {
        line: number,
        value: weight.to_string(),
    })?;

    Ok(WeightedRule::new(rule, weight, Default::default()))
}

/// Sort ascending by weight, then by chain expression. Decorating with the
/// rendered expression up front keeps the comparator cheap and total.
fn sorted(rules: Vec<WeightedRule>, terms: &TermTable) -> Vec<WeightedRule> {
    let mut decorated: Vec<(String, WeightedRule)> = rules
        .into_iter()
        .map(|r| (r.rule.chain_expression(terms), r))
        .collect();
    decorated.sort_by(|(ae, a), (be, b)| a.weight.total_cmp(&b.weight).then_with(|| ae.cmp(be)));
    decorated.into_iter().map(|(_, r)| r).collect()
}
