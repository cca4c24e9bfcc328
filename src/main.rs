//! veracity CLI: rule-based fact checking over RDF knowledge graphs.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::{info, warn};

use veracity::config::Parameters;
use veracity::dataset::{self, TestSet, TrainingSet};
use veracity::graph::index::KnowledgeGraph;
use veracity::graph::load::{load_graph, load_into};
use veracity::label::Labeler;
use veracity::scoring::FactScorer;
use veracity::term::TermTable;

#[derive(Parser)]
#[command(name = "veracity", version, about = "Rule-based fact checker for RDF knowledge graphs")]
struct Cli {
    /// TOML file with mining and weighting parameters.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worker threads for rule mining (0 = all cores).
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the facts of a test set and write truth-value annotations.
    Check {
        /// RDF dump of the base knowledge graph (.nt or .ttl).
        #[arg(long)]
        dump_file: PathBuf,

        /// Optional ontology file merged into the base graph.
        #[arg(long)]
        owl_file: Option<PathBuf>,

        /// Test set of reified statements to score.
        #[arg(long)]
        test_file: PathBuf,

        /// Rule file to load if present, or to write after mining.
        #[arg(long, default_value = "rules.txt")]
        rules_file: PathBuf,

        /// Training set to mine from when no rule file exists.
        #[arg(long)]
        training_file: Option<PathBuf>,

        /// Where to write the scored facts.
        #[arg(long, default_value = "result.ttl")]
        output_file: PathBuf,
    },

    /// Mine from a training set and report the scoring error on it.
    Evaluate {
        /// RDF dump of the base knowledge graph (.nt or .ttl).
        #[arg(long)]
        dump_file: PathBuf,

        /// Optional ontology file merged into the base graph.
        #[arg(long)]
        owl_file: Option<PathBuf>,

        /// Training set to mine from and evaluate against.
        #[arg(long)]
        training_file: PathBuf,

        /// Render entities via rdfs:label in per-fact output.
        #[arg(long)]
        display_labels: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => Parameters::from_file(path).into_diagnostic()?,
        None => Parameters::default(),
    };
    if let Some(threads) = cli.threads {
        params.mining_threads = threads;
    }

    match cli.command {
        Commands::Check {
            dump_file,
            owl_file,
            test_file,
            rules_file,
            training_file,
            output_file,
        } => {
            let terms = Arc::new(TermTable::new());
            let graph = Arc::new(load_base_graph(&dump_file, owl_file.as_deref(), &terms)?);
            let test = TestSet::from_file(&test_file, &terms).into_diagnostic()?;

            let mut scorer = FactScorer::new(Arc::clone(&graph), Arc::clone(&terms));
            if scorer.load_rules(&rules_file).into_diagnostic()? {
                info!(rules = scorer.rule_store().len(), "reusing stored rules");
            } else {
                let training_file = training_file.ok_or_else(|| {
                    miette::miette!(
                        "no usable rule file at {} and no --training-file to mine from",
                        rules_file.display()
                    )
                })?;
                let training = TrainingSet::from_file(&training_file, &terms).into_diagnostic()?;
                scorer.mine(&training, &params).into_diagnostic()?;
                scorer.save_rules(&rules_file).into_diagnostic()?;
            }

            let results: Vec<_> = test
                .entries
                .iter()
                .map(|entry| (entry.fact.clone(), scorer.score(&entry.statement)))
                .collect();
            dataset::write_results(&results, &output_file).into_diagnostic()?;
            println!("Scored {} facts into {}", results.len(), output_file.display());
        }

        Commands::Evaluate {
            dump_file,
            owl_file,
            training_file,
            display_labels,
        } => {
            let terms = Arc::new(TermTable::new());
            let graph = Arc::new(load_base_graph(&dump_file, owl_file.as_deref(), &terms)?);
            let training = TrainingSet::from_file(&training_file, &terms).into_diagnostic()?;

            let mut scorer = FactScorer::new(Arc::clone(&graph), Arc::clone(&terms));
            scorer.mine(&training, &params).into_diagnostic()?;

            let labeler = Labeler::new(&graph, &terms);
            let mut total_error = 0.0;
            for entry in &training.entries {
                let score = scorer.score(&entry.statement);
                let error = (score - entry.truth_value).abs();
                total_error += error;

                let rendered = if display_labels {
                    labeler.statement(&entry.statement)
                } else {
                    format!(
                        "{} {} {}",
                        terms.display(entry.statement.subject),
                        terms.display(entry.statement.predicate),
                        terms.display(entry.statement.object)
                    )
                };
                if error > 0.5 {
                    warn!(score, expected = entry.truth_value, statement = %rendered, "misclassified");
                } else {
                    info!(score, expected = entry.truth_value, statement = %rendered, "scored");
                }
            }

            let mean_error = if training.is_empty() {
                0.0
            } else {
                total_error / training.len() as f64
            };
            println!(
                "Mean absolute error over {} facts: {mean_error:.4}",
                training.len()
            );
        }
    }

    Ok(())
}

/// Load the dump file and, when given, merge the ontology into it.
fn load_base_graph(
    dump: &std::path::Path,
    owl: Option<&std::path::Path>,
    terms: &TermTable,
) -> Result<KnowledgeGraph> {
    let graph = load_graph(dump, terms).into_diagnostic()?;
    if let Some(owl) = owl {
        load_into(owl, terms, &graph).into_diagnostic()?;
    }
    info!(
        nodes = graph.node_count(),
        triples = graph.triple_count(),
        "base graph ready"
    );
    Ok(graph)
}
