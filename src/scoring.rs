//! Rule mining, coverage weighting and truth scoring.
//!
//! The [`FactScorer`] owns the mined rule store and drives the two phases
//! of the pipeline: `mine` generates and weights rules from a labeled
//! training set, `score` applies the stored rules to a candidate
//! statement and folds the strongest positive and negative evidence into
//! a truth value in `[0, 1]`.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::{DashMap, DashSet};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Parameters;
use crate::dataset::TrainingSet;
use crate::error::{RuleError, ScoreError};
use crate::graph::Triple;
use crate::graph::index::KnowledgeGraph;
use crate::graph::local::SearchBudget;
use crate::rules::apply::applies;
use crate::rules::store::RuleStore;
use crate::rules::synth::rules_for_example;
use crate::rules::{CoverageCounts, EdgeConstraint, Polarity, Rule, WeightedRule};
use crate::term::{TermId, TermTable};

/// A statement is treated as a positive example at or above this truth
/// value, as a negative one below it.
const TRUTH_THRESHOLD: f64 = 0.5;

fn polarity_of(truth_value: f64) -> Polarity {
    if truth_value >= TRUTH_THRESHOLD {
        Polarity::Positive
    } else {
        Polarity::Negative
    }
}

/// Mines rules from training examples and scores candidate statements.
pub struct FactScorer {
    graph: Arc<KnowledgeGraph>,
    terms: Arc<TermTable>,
    store: RuleStore,
}

impl FactScorer {
    pub fn new(graph: Arc<KnowledgeGraph>, terms: Arc<TermTable>) -> Self {
        Self {
            graph,
            terms,
            store: RuleStore::default(),
        }
    }

    /// Resume from a previously mined rule store.
    pub fn with_store(graph: Arc<KnowledgeGraph>, terms: Arc<TermTable>, store: RuleStore) -> Self {
        Self {
            graph,
            terms,
            store,
        }
    }

    pub fn rule_store(&self) -> &RuleStore {
        &self.store
    }

    /// Mine rules from every training example and weight them by coverage,
    /// replacing any rules the scorer previously held.
    ///
    /// Generation runs one example per rayon task; the coverage maps are
    /// concurrent so tasks record their findings without a global lock.
    pub fn mine(&mut self, training: &TrainingSet, params: &Parameters) -> Result<(), ScoreError> {
        let budget = SearchBudget::from(params);
        let total = training.len();

        // Coverage is keyed by the polarity-free pattern: the positive and
        // negative variant of a rule share one covered-example set, which
        // is where a rule's counter-examples come from. The head-predicate
        // map feeds the unbound denominators of the weight formula.
        // Example indices stand in for the entries.
        let coverage: DashMap<(Vec<EdgeConstraint>, EdgeConstraint), HashSet<usize>> =
            DashMap::new();
        let coverage_head: DashMap<TermId, HashSet<usize>> = DashMap::new();
        let rule_set: DashSet<Rule> = DashSet::new();
        let progress = AtomicUsize::new(0);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.mining_threads)
            .build()
            .map_err(|e| ScoreError::ThreadPool {
                message: e.to_string(),
            })?;

        pool.install(|| {
            training.entries.par_iter().enumerate().for_each(|(index, entry)| {
                let polarity = polarity_of(entry.truth_value);
                let rules = rules_for_example(&self.graph, &entry.statement, polarity, &budget);

                let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
                if rules.is_empty() {
                    warn!(
                        example = done,
                        total,
                        statement = %self.display_statement(&entry.statement),
                        "no rules generated for example"
                    );
                } else {
                    info!(example = done, total, rules = rules.len(), "generated rules");
                }

                for rule in rules {
                    coverage_head
                        .entry(rule.head.predicate)
                        .or_default()
                        .insert(index);
                    coverage
                        .entry((rule.body.clone(), rule.head))
                        .or_default()
                        .insert(index);
                    rule_set.insert(rule);
                }
            });
        });

        let weighted: Vec<WeightedRule> = rule_set
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|rule| {
                let unbound = coverage_head
                    .get(&rule.head.predicate)
                    .map(|entry| count_coverage(training, entry.value(), rule.polarity))
                    .unwrap_or_default();
                let bound = coverage
                    .get(&(rule.body.clone(), rule.head))
                    .map(|entry| count_coverage(training, entry.value(), rule.polarity))
                    .unwrap_or_default();
                let coverage = CoverageCounts {
                    examples: bound.0,
                    counters: bound.1,
                    examples_unbound: unbound.0,
                    counters_unbound: unbound.1,
                };
                let weight = weigh(&coverage, params);
                WeightedRule::new(rule, weight, coverage)
            })
            .collect();

        self.store = RuleStore::from_rules(weighted, &self.terms);
        info!(
            positive = self.store.positive().len(),
            negative = self.store.negative().len(),
            "mined and weighted rules"
        );
        Ok(())
    }

    /// Score a candidate statement against the stored rules.
    ///
    /// Both partitions are sorted ascending by weight, so the first
    /// applicable rule on each side is the strongest available evidence.
    /// Negative rules are only consulted when no positive rule applies:
    /// an applicable positive rule, however weak, suppresses the negative
    /// scan entirely.
    pub fn score(&self, statement: &Triple) -> f64 {
        let strongest = |rules: &[WeightedRule]| {
            rules
                .iter()
                .find(|w| applies(&w.rule, &self.graph, statement))
                .map(|w| {
                    debug!(
                        rule = %w.rule.chain_expression(&self.terms),
                        weight = w.weight,
                        "rule applies"
                    );
                    w.weight
                })
        };

        let min_positive = strongest(self.store.positive());
        let min_negative = match min_positive {
            Some(_) => None,
            None => strongest(self.store.negative()),
        };

        if min_positive.is_none() && min_negative.is_none() {
            info!(
                statement = %self.display_statement(statement),
                "no evidence for or against statement"
            );
        }

        let positive_mass = 1.0 - min_positive.unwrap_or(1.0);
        let negative_mass = 1.0 - min_negative.unwrap_or(1.0);
        ((positive_mass - negative_mass) + 1.0) / 2.0
    }

    /// Persist the current rule store.
    pub fn save_rules(&self, path: &Path) -> Result<(), RuleError> {
        self.store.save(path, &self.terms)
    }

    /// Load a rule store from disk. Returns whether one was found; on
    /// `false` the scorer keeps its current (typically empty) store.
    pub fn load_rules(&mut self, path: &Path) -> Result<bool, RuleError> {
        match RuleStore::load(path, &self.terms)? {
            Some(store) => {
                self.store = store;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn display_statement(&self, statement: &Triple) -> String {
        format!(
            "{} {} {}",
            self.terms.display(statement.subject),
            self.terms.display(statement.predicate),
            self.terms.display(statement.object)
        )
    }
}

/// Count the covered examples that agree with `polarity` and those that
/// contradict it.
fn count_coverage(training: &TrainingSet, covered: &HashSet<usize>, polarity: Polarity) -> (usize, usize) {
    let mut examples = 0;
    let mut counters = 0;
    for &index in covered {
        if polarity_of(training.entries[index].truth_value) == polarity {
            examples += 1;
        } else {
            counters += 1;
        }
    }
    (examples, counters)
}

/// Confidence weight from coverage counts. Lower is stronger.
///
/// A rule that covers no agreeing example gets the neutral weight 1.0
/// rather than a division by zero. Heavily countered rules can push the
/// raw expression above 1.0; it is clamped back so a rule never testifies
/// against its own polarity.
fn weigh(coverage: &CoverageCounts, params: &Parameters) -> f64 {
    let n_examples = coverage.examples as f64;
    let n_counters = coverage.counters as f64;
    if coverage.examples == 0 {
        return 1.0;
    }

    let example_ratio = if coverage.examples_unbound > 0 {
        n_examples / coverage.examples_unbound as f64
    } else {
        0.0
    };
    let counter_ratio = if coverage.counters_unbound > 0 {
        n_counters / coverage.counters_unbound as f64
    } else {
        0.0
    };
    let base = params.alpha * (1.0 - example_ratio) + params.beta * counter_ratio;

    let raw = 1.0 - ((n_examples - n_counters / params.gamma) / n_examples) * (1.0 - base);
    raw.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TrainingEntry;
    use crate::term::Term;

    fn scorer_fixture() -> (Arc<KnowledgeGraph>, Arc<TermTable>) {
        (Arc::new(KnowledgeGraph::new()), Arc::new(TermTable::new()))
    }

    fn intern(terms: &TermTable, iri: &str) -> TermId {
        terms.intern_iri(&format!("http://ex/{iri}")).unwrap()
    }

    fn entry(terms: &TermTable, s: &str, p: &str, o: &str, truth: f64) -> TrainingEntry {
        TrainingEntry {
            fact: Term::iri(format!("http://ex/fact/{s}-{p}-{o}")),
            statement: Triple::new(intern(terms, s), intern(terms, p), intern(terms, o)),
            truth_value: truth,
        }
    }

    fn params() -> Parameters {
        Parameters {
            mining_threads: 1,
            ..Parameters::default()
        }
    }

    /// a friendOf b, b friendOf c and the example `a friendOf c` should
    /// mine the transitivity rule and score a parallel statement high.
    #[test]
    fn mines_and_scores_transitive_pattern() {
        let (graph, terms) = scorer_fixture();
        let friend = intern(&terms, "friendOf");
        for (s, o) in [("a", "b"), ("b", "c"), ("x", "y"), ("y", "z")] {
            graph.insert_triple(&Triple::new(intern(&terms, s), friend, intern(&terms, o)));
        }

        let training = TrainingSet {
            entries: vec![entry(&terms, "a", "friendOf", "c", 1.0)],
        };
        let mut scorer = FactScorer::new(graph, Arc::clone(&terms));
        scorer.mine(&training, &params()).unwrap();
        assert!(!scorer.rule_store().is_empty());

        let unseen = Triple::new(intern(&terms, "x"), friend, intern(&terms, "z"));
        let score = scorer.score(&unseen);
        // the uncontradicted transitivity rule has weight 0.0
        assert_eq!(score, 1.0);
    }

    #[test]
    fn unknown_predicate_scores_neutral() {
        let (graph, terms) = scorer_fixture();
        let statement = Triple::new(
            intern(&terms, "a"),
            intern(&terms, "unheardOf"),
            intern(&terms, "b"),
        );
        let scorer = FactScorer::new(graph, terms);
        assert_eq!(scorer.score(&statement), 0.5);
    }

    #[test]
    fn contradicted_rule_is_weaker_than_clean_rule() {
        let base = CoverageCounts {
            examples: 4,
            counters: 0,
            examples_unbound: 4,
            counters_unbound: 0,
        };
        let contradicted = CoverageCounts {
            examples: 4,
            counters: 1,
            examples_unbound: 4,
            counters_unbound: 1,
        };
        let p = params();
        assert!(weigh(&base, &p) < weigh(&contradicted, &p));
    }

    #[test]
    fn weight_is_neutral_without_agreeing_examples() {
        let coverage = CoverageCounts {
            examples: 0,
            counters: 3,
            examples_unbound: 5,
            counters_unbound: 3,
        };
        assert_eq!(weigh(&coverage, &params()), 1.0);
    }

    #[test]
    fn weight_never_exceeds_one() {
        let coverage = CoverageCounts {
            examples: 1,
            counters: 50,
            examples_unbound: 1,
            counters_unbound: 50,
        };
        assert!(weigh(&coverage, &params()) <= 1.0);
    }

    #[test]
    fn perfect_rule_has_zero_weight() {
        let coverage = CoverageCounts {
            examples: 6,
            counters: 0,
            examples_unbound: 6,
            counters_unbound: 0,
        };
        assert_eq!(weigh(&coverage, &params()), 0.0);
    }

    #[test]
    fn applicable_positive_rule_suppresses_negative_evidence() {
        let (graph, terms) = scorer_fixture();
        let friend = intern(&terms, "friendOf");
        for (s, o) in [("a", "b"), ("b", "c")] {
            graph.insert_triple(&Triple::new(intern(&terms, s), friend, intern(&terms, o)));
        }

        let positive = WeightedRule::new(
            Rule::from_chain(&[friend, friend], friend, Polarity::Positive),
            0.9,
            CoverageCounts::default(),
        );
        let negative = WeightedRule::new(
            Rule::from_chain(&[friend, friend], friend, Polarity::Negative),
            0.0,
            CoverageCounts::default(),
        );
        let store = RuleStore::from_rules(vec![positive, negative], &terms);
        let scorer = FactScorer::with_store(graph, Arc::clone(&terms), store);

        let statement = Triple::new(intern(&terms, "a"), friend, intern(&terms, "c"));
        // weak positive evidence only: (((1-0.9) - 0) + 1) / 2
        assert!((scorer.score(&statement) - 0.55).abs() < 1e-12);
    }

    #[test]
    fn negative_evidence_pulls_score_below_neutral() {
        let (graph, terms) = scorer_fixture();
        let enemy = intern(&terms, "enemyOf");
        let friend = intern(&terms, "friendOf");
        graph.insert_triple(&Triple::new(intern(&terms, "a"), enemy, intern(&terms, "b")));

        let negative = WeightedRule::new(
            Rule::from_chain(&[enemy], friend, Polarity::Negative),
            0.2,
            CoverageCounts::default(),
        );
        let store = RuleStore::from_rules(vec![negative], &terms);
        let scorer = FactScorer::with_store(graph, Arc::clone(&terms), store);

        let statement = Triple::new(intern(&terms, "a"), friend, intern(&terms, "b"));
        // ((0 - (1 - 0.2)) + 1) / 2
        assert!((scorer.score(&statement) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn mining_is_deterministic() {
        let build = || {
            let (graph, terms) = scorer_fixture();
            let friend = intern(&terms, "friendOf");
            let knows = intern(&terms, "knows");
            for (s, p, o) in [
                ("a", friend, "b"),
                ("b", friend, "c"),
                ("a", knows, "b"),
                ("b", knows, "c"),
            ] {
                graph.insert_triple(&Triple::new(intern(&terms, s), p, intern(&terms, o)));
            }
            let training = TrainingSet {
                entries: vec![
                    entry(&terms, "a", "friendOf", "c", 1.0),
                    entry(&terms, "a", "knows", "c", 0.0),
                ],
            };
            let mut scorer = FactScorer::new(graph, Arc::clone(&terms));
            scorer.mine(&training, &params()).unwrap();
            let render = |rules: &[WeightedRule]| {
                rules
                    .iter()
                    .map(|w| format!("{}; {}", w.rule.chain_expression(&terms), w.weight))
                    .collect::<Vec<_>>()
            };
            (render(scorer.rule_store().positive()), render(scorer.rule_store().negative()))
        };

        assert_eq!(build(), build());
    }
}
