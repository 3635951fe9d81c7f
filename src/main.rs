//! aq-star CLI: learn diagnosis rules from labeled patients.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use aq_star::config::InductionConfig;
use aq_star::dataset::{Dataset, load_patients};
use aq_star::entity::EntityId;
use aq_star::induct::Learner;
use aq_star::rule::{MemoryRuleSink, Rule, apply_rules, publish_rules};

#[derive(Parser)]
#[command(name = "aq-star", version, about = "Star-based rule induction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Learn rules from a labeled dataset and print them.
    Induce {
        /// JSON dataset with catalog and examples.
        #[arg(long)]
        dataset: PathBuf,

        /// TOML induction settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Learn rules, then infer outcomes for unlabeled patients.
    Diagnose {
        /// JSON dataset with catalog and examples.
        #[arg(long)]
        dataset: PathBuf,

        /// JSON array of patients to diagnose.
        #[arg(long)]
        patients: PathBuf,

        /// TOML induction settings.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Manage the induction settings file.
    Config {
        /// Write the default settings to this file.
        #[arg(long)]
        write: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct RuleExport {
    name: String,
    text: String,
    conclusions: Vec<String>,
}

impl From<&Rule> for RuleExport {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name().to_string(),
            text: rule.to_string(),
            conclusions: rule.conclusions().iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Serialize)]
struct Diagnosis {
    id: String,
    rules_fired: usize,
    diseases: Vec<EntityId>,
    tests: Vec<EntityId>,
    treatments: Vec<EntityId>,
    causes: Vec<EntityId>,
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
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Induce {
            dataset,
            config,
            format,
        } => {
            let config = load_config(config.as_deref())?;
            let prefix = config.rule_prefix.clone();
            let dataset = Dataset::load(&dataset)?;
            let rules = Learner::new(&dataset.catalog, config)?.learn(&dataset.training)?;

            let mut sink = MemoryRuleSink::with_catalog(dataset.catalog.clone());
            let report = publish_rules(&mut sink, &rules, &prefix);
            let published: Vec<&Rule> = rules
                .iter()
                .filter(|r| report.accepted.iter().any(|name| name == r.name()))
                .collect();

            match format {
                OutputFormat::Text => {
                    for rule in &published {
                        println!("{}: {rule}", rule.name());
                    }
                    if !report.failures.is_empty() {
                        println!("{} rule(s) rejected", report.failures.len());
                    }
                }
                OutputFormat::Json => {
                    let exports: Vec<RuleExport> =
                        published.iter().map(|r| RuleExport::from(*r)).collect();
                    let json = serde_json::to_string_pretty(&exports).into_diagnostic()?;
                    println!("{json}");
                }
            }
        }

        Commands::Diagnose {
            dataset,
            patients,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let dataset = Dataset::load(&dataset)?;
            let rules = Learner::new(&dataset.catalog, config)?.learn(&dataset.training)?;
            let patients = load_patients(&patients, &dataset.catalog)?;

            let diagnoses: Vec<Diagnosis> = patients
                .into_iter()
                .map(|mut patient| {
                    let rules_fired = apply_rules(&rules, &mut patient);
                    Diagnosis {
                        id: patient.id,
                        rules_fired,
                        diseases: patient.diseases.into_iter().collect(),
                        tests: patient.tests.into_iter().collect(),
                        treatments: patient.treatments.into_iter().collect(),
                        causes: patient.causes.into_iter().collect(),
                    }
                })
                .collect();
            let json = serde_json::to_string_pretty(&diagnoses).into_diagnostic()?;
            println!("{json}");
        }

        Commands::Config { write } => {
            InductionConfig::default().save(&write)?;
            println!("Wrote default configuration to {}", write.display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<InductionConfig> {
    match path {
        Some(path) => Ok(InductionConfig::load(path)?),
        None => Ok(InductionConfig::default()),
    }
}
