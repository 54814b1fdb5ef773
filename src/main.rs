use std::error::Error;
use std::path::PathBuf;

use bipolar_mlp::*;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log every checkpoint
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train networks with early stopping and write their artifacts
    Train {
        #[arg(long, value_name = "PATH")]
        train: PathBuf,
        #[arg(long, value_name = "PATH")]
        validation: PathBuf,
        #[arg(long, value_name = "PATH")]
        test: PathBuf,
        /// JSON run configuration; flags override its values
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        #[arg(long, value_name = "INT")]
        hidden: Option<usize>,
        #[arg(long, value_name = "FLOAT")]
        learning_rate: Option<f64>,
        /// Epochs between validation checkpoints
        #[arg(long, value_name = "INT")]
        interval: Option<usize>,
        #[arg(long, value_name = "INT")]
        max_failures: Option<usize>,
        #[arg(long, value_name = "INT")]
        seed: Option<u64>,
        /// Start from all-zero weights instead of random ones
        #[arg(long)]
        zero_init: bool,
        #[arg(long, value_name = "INT")]
        classes: Option<usize>,
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Write the latest checkpoint to disk every N seconds
        #[arg(long, value_name = "SECS")]
        snapshot_secs: Option<u64>,
        #[arg(long, value_name = "INT")]
        runs: Option<usize>,
    },
    /// Error rate, squared error and confusion matrix of a saved network
    Evaluate {
        #[arg(long, value_name = "PATH")]
        network: PathBuf,
        #[arg(long, value_name = "PATH")]
        data: PathBuf,
        #[arg(long, value_name = "INT", default_value_t = report::DEFAULT_CLASSES)]
        classes: usize,
    },
    /// Classify one feature vector
    Predict {
        #[arg(long, value_name = "PATH")]
        network: PathBuf,
        /// Comma separated feature values
        #[arg(long, value_name = "LIST", allow_hyphen_values = true)]
        features: String,
    },
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    init_logging(args.verbose)?;

    match args.command {
        Command::Train {
            train,
            validation,
            test,
            config,
            hidden,
            learning_rate,
            interval,
            max_failures,
            seed,
            zero_init,
            classes,
            out,
            snapshot_secs,
            runs,
        } => {
            let base = match config {
                Some(path) => RunConfig::load_json(path)?,
                None => RunConfig::default(),
            };
            let config = base.merge(RunOverrides {
                hidden,
                learning_rate,
                interval,
                max_failures,
                init: zero_init.then_some(WeightInit::Zero),
                seed,
                classes,
                output_dir: out,
                snapshot_secs,
                runs,
            });
            config.validate()?;

            let train = load_samples(&train)?;
            let validation = load_samples(&validation)?;
            let test = load_samples(&test)?;
            info!(
                "loaded {} training, {} validation and {} test samples",
                train.len(),
                validation.len(),
                test.len()
            );

            let outcome = train_runs(&config, &train, &validation, &test, None)?;
            for run in &outcome.runs {
                if !run.files.failures.is_empty() {
                    warn!("{} artifact(s) could not be written", run.files.failures.len());
                }
                println!(
                    "seed {}: best validation error {:.4} after {} epochs, test error {:.4}, test squared error {:.4}",
                    run.seed,
                    run.report.best_validation_error,
                    run.report.epochs,
                    run.report.test.error_rate,
                    run.report.test.squared_error
                );
            }
            if outcome.summary.runs() > 1 {
                print!("{}", outcome.summary.to_text());
            }
        }
        Command::Evaluate { network, data, classes } => {
            let mut network = Network::load(&network)?;
            let samples = load_samples(&data)?;
            let evaluation = train::evaluate(&samples, &mut network)?;
            let confusion = train::confusion_matrix(&samples, &mut network, classes)?;
            println!("error rate: {:.4}", evaluation.error_rate);
            println!("squared error: {:.4}", evaluation.squared_error);
            print!("{}", confusion.to_table());
        }
        Command::Predict { network, features } => {
            let network = Network::load(&network)?;
            let features = features
                .split(',')
                .map(|cell| {
                    cell.trim()
                        .parse::<f64>()
                        .map_err(|_| MlpError::format(format!("'{}' is not a number", cell.trim())))
                })
                .collect::<Result<Vec<f64>>>()?;
            let (class, outputs) = network.classify(&features)?;
            println!("{}", class);
            info!("outputs: {:?}", outputs);
        }
    }
    Ok(())
}
