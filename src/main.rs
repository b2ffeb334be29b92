use clap::Parser;
use prometheus::Registry;
use std::path::PathBuf;
use tracing::info;

use script_deobfuscator::artifacts::{read_artifact, write_artifact};
use script_deobfuscator::config::{load_config, CliOverrides};
use script_deobfuscator::errors::AppError;
use script_deobfuscator::logger;
use script_deobfuscator::metrics::{render_metrics, Metrics};
use script_deobfuscator::pipeline::{Mode, Pipeline};
use script_deobfuscator::property_access::KeyPolicy;

#[derive(Parser)]
#[command(name = "script-deobfuscator", version)]
struct Cli {
    /// Obfuscated script to read
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the rewritten script
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = Mode::Full)]
    stage: Mode,

    /// JSON or YAML file with rename and string lookup tables
    #[arg(short, long)]
    rules: Option<PathBuf>,

    #[arg(long)]
    decode_escapes: bool,

    #[arg(long)]
    fold_booleans: bool,

    /// permissive or identifier-only
    #[arg(long)]
    key_policy: Option<KeyPolicy>,

    /// Write the run's counters here in Prometheus text format
    #[arg(long)]
    metrics: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    logger::init_logging();
    let cli = Cli::parse();

    let overrides = CliOverrides {
        decode_escapes: cli.decode_escapes,
        fold_booleans: cli.fold_booleans,
        key_policy: cli.key_policy,
    };
    let cfg = load_config(cli.rules.as_deref(), &overrides)?;

    let registry = Registry::new();
    let metrics = Metrics::new(&registry)?;
    let pipeline = Pipeline::new(&cfg)?.with_metrics(metrics);

    info!(input = %cli.input.display(), stage = ?cli.stage, "Deobfuscating");
    let source = read_artifact(&cli.input).await?;
    let output = pipeline.run(&source, cli.stage);
    info!(rewrites = output.report.total(), "Pipeline finished");
    write_artifact(&cli.output, &output.text).await?;
    if let Some(path) = &cli.metrics {
        write_artifact(path, &render_metrics(&registry)?).await?;
    }

    match cli.stage {
        Mode::HexOnly => println!(
            "Hex literal normalization complete: {}",
            cli.output.display()
        ),
        Mode::Full | Mode::Resume => {
            println!("Deobfuscation complete: {}", cli.output.display())
        }
    }
    Ok(())
}
