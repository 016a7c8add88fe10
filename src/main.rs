//! AttestedQuery CLI
//!
//! Command-line driver: runs the protocol end to end over a random table, or
//! runs setup alone and persists the result.

use anyhow::{bail, Context};
use attested_query::database::{SetupStorage, StorageFormat};
use attested_query::field::{EncodedPosition, FieldUtils};
use attested_query::index::{CommittedIndex, InvertedIndex};
use attested_query::utils::{Helpers, Logger};
use attested_query::{
    AggregateQuery, AggregationKind, Answer, Dataset, PairingContext, ProtocolConfig,
    ProtocolError, Prover, Setup, SetupRecord, VerificationReport, Verifier,
};
use clap::{Args, Parser, Subcommand};
use halo2curves::bn256::Fr;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "attested_query")]
#[command(about = "Verifiable queries over committed tables", long_about = None)]
#[command(version = attested_query::VERSION)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct WorkloadArgs {
    /// JSON configuration file; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rows
    #[arg(long)]
    rows: Option<usize>,

    /// Number of columns
    #[arg(long)]
    cols: Option<usize>,

    /// Column aggregated and bound to the MIN key
    #[arg(long)]
    column: Option<usize>,

    /// Largest random cell value
    #[arg(long)]
    max_value: Option<u64>,
}

impl WorkloadArgs {
    fn load(&self) -> anyhow::Result<ProtocolConfig> {
        let mut config = match &self.config {
            Some(path) => ProtocolConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ProtocolConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.n_row = rows;
            config.answer_size = config.answer_size.min(rows);
        }
        if let Some(cols) = self.cols {
            config.n_col = cols;
        }
        if let Some(column) = self.column {
            config.selected_column = column;
        }
        if let Some(max_value) = self.max_value {
            config.max_value = max_value;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run setup, prove and verify one query over a random table
    Run {
        #[command(flatten)]
        workload: WorkloadArgs,

        /// Aggregate to prove
        #[arg(short, long, value_enum)]
        aggregation: Option<AggregationKind>,

        /// Number of rows the query returns
        #[arg(long)]
        answer_size: Option<usize>,

        /// Drop one answer posting from the prover's index before proving
        #[arg(long)]
        tamper: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run setup over a random table and save it
    Setup {
        #[command(flatten)]
        workload: WorkloadArgs,

        /// Output file for the prover's setup record
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for the verifier's public setup
        #[arg(short, long)]
        public: Option<PathBuf>,

        /// Storage format; guessed from the file extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<StorageFormat>,
    },
}

#[derive(Serialize)]
struct Timings {
    setup: f64,
    prove: f64,
    verify: f64,
}

#[derive(Serialize)]
struct RunReport {
    config: ProtocolConfig,
    tampered: bool,
    fingerprint: String,
    aggregate: Option<String>,
    report: VerificationReport,
    accepted: bool,
    timings: Timings,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    Logger::init_with_level(Logger::level_from_verbosity(cli.verbose));

    match cli.command {
        Commands::Run {
            workload,
            aggregation,
            answer_size,
            tamper,
            json,
        } => {
            let mut config = workload.load()?;
            if let Some(kind) = aggregation {
                config.aggregation = kind;
            }
            if let Some(size) = answer_size {
                config.answer_size = size;
            }
            config.validate()?;

            let report = run(&config, tamper)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "rows={} aggregation={:?} answer={} accepted={}",
                    config.n_row, config.aggregation, config.answer_size, report.accepted
                );
                println!(
                    "setup {:.3}s, prove {:.3}s, verify {:.3}s",
                    report.timings.setup, report.timings.prove, report.timings.verify
                );
            }
            if !report.accepted && !tamper {
                bail!("honest run was rejected");
            }
        }
        Commands::Setup {
            workload,
            output,
            public,
            format,
        } => {
            let config = workload.load()?;
            config.validate()?;

            let ctx = PairingContext::new();
            let dataset = Helpers::random_dataset(&config, &mut rand::rng())?;
            let start = Instant::now();
            let record = Setup::run(&ctx, &dataset, config.selected_column)?;
            log::info!("setup took {}", Helpers::format_duration(start.elapsed()));

            let storage = SetupStorage::new(format.unwrap_or_else(|| StorageFormat::from_path(&output)));
            storage
                .save_record(&record, &output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("setup record written to {}", output.display());
            println!("public fingerprint {}", record.public().fingerprint());

            if let Some(path) = public {
                let storage =
                    SetupStorage::new(format.unwrap_or_else(|| StorageFormat::from_path(&path)));
                storage
                    .save_public(&record.public(), &path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                println!(
                    "public setup written to {} ({})",
                    path.display(),
                    Helpers::format_bytes(size)
                );
            }
        }
    }

    Ok(())
}

fn run(config: &ProtocolConfig, tamper: bool) -> anyhow::Result<RunReport> {
    let ctx = PairingContext::new();
    let mut rng = rand::rng();
    let dataset = Helpers::random_dataset(config, &mut rng)?;
    let rows = Helpers::sample_rows(config.n_row, config.answer_size, &mut rng);
    let answer = Answer::select(&dataset, &rows)?;
    let aggregate = AggregateQuery::for_column(config.aggregation, &dataset, config.selected_column)?
        .map(|query| (config.selected_column, query));

    let start = Instant::now();
    let record = Setup::run(&ctx, &dataset, config.selected_column)?;
    let public = record.public();
    let setup_time = start.elapsed();

    let mut prover_record = record.clone();
    if tamper {
        prover_record.committed_index = tampered_index(&ctx, &record, &dataset, &answer)?;
    }

    let start = Instant::now();
    let prover = Prover::new(&ctx, &record.keys);
    let proof = match prover.prove_query(&prover_record, &dataset, &answer, aggregate) {
        Ok(proof) => Some(proof),
        Err(ProtocolError::KeyNotIndexed(key)) if tamper => {
            log::warn!("prover cannot open hidden value {}", key);
            None
        }
        Err(e) => return Err(e.into()),
    };
    let prove_time = start.elapsed();

    let start = Instant::now();
    let report = match &proof {
        Some(proof) => {
            Verifier::new(&ctx, &public.keys).verify_all(&public, &config.request(), &answer, proof)
        }
        None => VerificationReport {
            correctness: None,
            completeness: false,
            aggregation: None,
        },
    };
    let verify_time = start.elapsed();

    let aggregate_value = proof
        .as_ref()
        .and_then(|p| p.aggregation.as_ref())
        .map(|agg| display_value(&agg.proof.value()));

    Ok(RunReport {
        config: config.clone(),
        tampered: tamper,
        fingerprint: public.fingerprint(),
        aggregate: aggregate_value,
        accepted: report.is_accepted(),
        report,
        timings: Timings {
            setup: setup_time.as_secs_f64(),
            prove: prove_time.as_secs_f64(),
            verify: verify_time.as_secs_f64(),
        },
    })
}

/// Decimal when the value fits a u64, hex otherwise
fn display_value(value: &Fr) -> String {
    FieldUtils::to_u64(value)
        .map(|v| v.to_string())
        .unwrap_or_else(|| format!("0x{}", FieldUtils::to_hex(value)))
}

/// Commit the full index with the first answer cell's posting removed
fn tampered_index(
    ctx: &PairingContext,
    record: &SetupRecord,
    dataset: &Dataset,
    answer: &Answer,
) -> anyhow::Result<CommittedIndex> {
    let (row, value) = match (answer.row_indexes().first(), answer.rows().first()) {
        (Some(&row), Some(values)) => (row, values[0]),
        _ => bail!("--tamper needs a non-empty answer"),
    };

    let position = EncodedPosition::encode(row as u64, 0)?;
    let index = InvertedIndex::build(dataset)?.without_position(&value, position);
    log::info!("dropping posting ({}, 0) of value {}", row, FieldUtils::to_hex(&value));

    let keys = &record.keys;
    Ok(CommittedIndex::build(
        ctx,
        &keys.public.vc,
        &keys.secret.vc,
        &keys.public.set,
        &keys.secret.set,
        &index,
    )?)
}
