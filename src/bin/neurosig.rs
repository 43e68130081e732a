//! neurosig CLI
//!
//! Wires the simulator, classifier and anomaly detector together and prints
//! result records as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use neurosig::{
    AnomalyResult, Analyzer, ClassificationResult, Config, FeatureVector, LabeledPattern, Matrix,
    Metric, Simulator, TrainingFit,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const CONDITIONS: [&str; 3] = ["schizophrenia", "bipolar", "control"];

#[derive(Parser)]
#[command(name = "neurosig")]
#[command(about = "Statistics, nearest-pattern classification and anomaly flagging for multi-channel readings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the similarity metric
    #[arg(short, long, global = true, value_parser = parse_metric)]
    metric: Option<Metric>,

    /// Verbosity level
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on simulated recordings and classify fresh ones
    Demo {
        /// Simulator seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Training samples per condition
        #[arg(long, default_value = "5")]
        per_condition: usize,

        /// Time steps per recording
        #[arg(long, default_value = "32")]
        rows: usize,

        /// Channels per time step
        #[arg(long, default_value = "4")]
        channels: usize,

        /// Unseen probes per condition
        #[arg(long, default_value = "2")]
        probes: usize,
    },

    /// Print the feature vector of a matrix file
    Features {
        /// JSON file holding a nested array of numbers
        input: PathBuf,
    },

    /// Train from a patterns file and classify a matrix file
    Classify {
        /// JSON array of {"pattern": [[...]], "label": "..."}
        #[arg(long)]
        patterns: PathBuf,

        /// JSON file holding the matrix to classify
        input: PathBuf,
    },

    /// Flag outliers in a matrix file
    Detect {
        /// JSON file holding the matrix to inspect
        input: PathBuf,

        /// Label whose threshold (and reference, if given) applies
        #[arg(long)]
        label: Option<String>,

        /// JSON matrix file used as the reference baseline for the label
        #[arg(long, requires = "label")]
        reference: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ProbeReport {
    condition: String,
    index: u64,
    features: FeatureVector,
    classification: ClassificationResult,
    anomaly: AnomalyResult,
}

#[derive(Serialize)]
struct DemoReport {
    metric: Metric,
    patterns: usize,
    training_fit: TrainingFit,
    correct_probes: usize,
    probes: Vec<ProbeReport>,
}

fn parse_metric(s: &str) -> std::result::Result<Metric, String> {
    match s {
        "euclidean" => Ok(Metric::Euclidean),
        "row_normalized" | "row-normalized" => Ok(Metric::RowNormalized),
        "cosine" | "cosine_column_means" | "cosine-column-means" => Ok(Metric::CosineColumnMeans),
        other => Err(format!(
            "unknown metric '{}' (expected euclidean, row_normalized or cosine)",
            other
        )),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level: Level = cli
        .log_level
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid log level '{}'", cli.log_level))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(metric) = cli.metric {
        config.metric = metric;
    }

    let mut analyzer = Analyzer::try_new(config)?;

    match cli.command {
        Commands::Demo {
            seed,
            per_condition,
            rows,
            channels,
            probes,
        } => {
            let sim = Simulator::with_seed(seed);
            analyzer.train(sim.training_set(&CONDITIONS, per_condition, rows, channels)?)?;
            info!(
                patterns = analyzer.store().len(),
                metric = ?analyzer.metric(),
                "trained on simulated recordings"
            );

            // Control recordings double as the anomaly baseline
            for i in 0..per_condition as u64 {
                analyzer.add_reference("control", &sim.sample("control", rows, channels, i))?;
            }

            let mut reports = Vec::new();
            for condition in CONDITIONS {
                for p in 0..probes as u64 {
                    // Indices past the training range are unseen samples
                    let index = per_condition as u64 + p;
                    let matrix = sim.sample(condition, rows, channels, index);
                    reports.push(ProbeReport {
                        condition: condition.to_string(),
                        index,
                        features: analyzer.extract(&matrix),
                        classification: analyzer.classify(&matrix)?,
                        anomaly: analyzer.detect_anomalies(&matrix, Some("control")),
                    });
                }
            }

            let correct_probes = reports
                .iter()
                .filter(|r| r.classification.label == r.condition)
                .count();
            info!(correct_probes, total = reports.len(), "demo finished");

            print_json(&DemoReport {
                metric: analyzer.metric(),
                patterns: analyzer.store().len(),
                training_fit: analyzer.accuracy()?,
                correct_probes,
                probes: reports,
            })?;
        }

        Commands::Features { input } => {
            let matrix: Matrix = read_json(&input)?;
            print_json(&analyzer.extract(&matrix))?;
        }

        Commands::Classify { patterns, input } => {
            let patterns: Vec<LabeledPattern> = read_json(&patterns)?;
            let matrix: Matrix = read_json(&input)?;
            analyzer.train(patterns)?;
            print_json(&analyzer.classify(&matrix)?)?;
        }

        Commands::Detect {
            input,
            label,
            reference,
        } => {
            let matrix: Matrix = read_json(&input)?;
            if let (Some(label), Some(path)) = (&label, &reference) {
                let baseline: Matrix = read_json(path)?;
                analyzer.add_reference(label, &baseline)?;
            }
            print_json(&analyzer.detect_anomalies(&matrix, label.as_deref()))?;
        }
    }

    Ok(())
}
