//! Connections evaluation - CLI
//!
//! Sweeps similarity baselines and language-model agents over a puzzle
//! dataset, builds the partition table, and lets a human play.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use connections_eval::{
    commands::{
        Baseline, BaselineSolver, RunLimits, SweepConfig, results_file_name, run_agent, run_baseline,
        run_enumerate, run_play,
    },
    config::Config,
    core::PuzzleSet,
    engine::{GameConfig, Mode},
    output::{print_enumeration_result, print_summary, print_sweep_outcome},
    provider::{BackoffPolicy, ChatModel, OpenAiClient, OpenAiEmbedder, RetryingModel},
    report::{ResultStore, Summary},
    solver::{
        agent::AgentOptions,
        partition::PartitionTable,
        similarity::{Aggregation, Embedder, EmbeddingTable},
    },
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "connections_eval",
    about = "Evaluate embedding baselines and language-model agents on Connections puzzles",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Puzzle dataset (JSON); the bundled sample is used when omitted
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Directory for result files
    #[arg(short, long, global = true, default_value = "results")]
    results: PathBuf,

    /// More logging: -v for info, -vv for debug (RUST_LOG overrides)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate all partitions of 16 words and save the table
    Enumerate {
        /// Output file
        #[arg(short, long, default_value = "data/partitions.bin")]
        output: PathBuf,
    },

    /// Run an embedding baseline
    Baseline {
        /// ranking (similarity ranking) or kmeans (clustering)
        #[arg(short, long, default_value = "ranking")]
        solver: BaselineSolver,

        /// Precomputed embeddings (JSON object of word to vector)
        #[arg(long, conflicts_with = "embedding_model")]
        embeddings: Option<PathBuf>,

        /// Embedding model served by the OpenAI-compatible endpoint
        #[arg(long)]
        embedding_model: Option<String>,

        /// iterative or all-at-once (default: iterative for ranking, all-at-once for kmeans)
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Group score: mean, median, min or max
        #[arg(short, long, default_value = "mean")]
        aggregation: Aggregation,

        /// Partition table for all-at-once mode (built if missing)
        #[arg(long, default_value = "data/partitions.bin")]
        partitions: PathBuf,

        /// Incorrect guesses allowed per puzzle; large enough that the
        /// baseline keeps guessing until it solves
        #[arg(short, long, default_value_t = 500)]
        guesses: usize,

        /// Puzzle ids, e.g. "1-250" or "1,4,9" (default: all)
        #[arg(long)]
        ids: Option<String>,

        /// Worker threads (0 = one per core)
        #[arg(short = 'j', long, default_value_t = 0)]
        threads: usize,

        /// Seed for the word shuffle
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a language-model agent
    Agent {
        /// Chat model name
        #[arg(long)]
        model: String,

        /// iterative or all-at-once
        #[arg(short, long, default_value = "iterative")]
        mode: Mode,

        /// Seeds; every puzzle is played once per seed
        #[arg(long, value_delimiter = ',', default_value = "0")]
        seeds: Vec<u64>,

        /// Ask the model to reason before answering
        #[arg(long)]
        chain_of_thought: bool,

        /// Prepend a system prompt
        #[arg(long)]
        system_prompt: bool,

        /// Incorrect guesses allowed per puzzle
        #[arg(short, long, default_value_t = 5)]
        guesses: usize,

        /// Abandon a puzzle after this many invalid answers
        #[arg(long, default_value_t = 5)]
        invalid_limit: usize,

        /// Puzzle ids, e.g. "1-250" or "1,4,9" (default: all)
        #[arg(long)]
        ids: Option<String>,

        /// Worker threads (0 = one per core)
        #[arg(short = 'j', long, default_value_t = 0)]
        threads: usize,

        /// Give up on a rate-limited call after this many retries
        #[arg(long)]
        max_retries: Option<u32>,

        /// Completion token limit
        #[arg(long, default_value_t = 1024)]
        max_tokens: u32,

        /// Sampling temperature
        #[arg(long, default_value_t = 0.0)]
        temperature: f32,
    },

    /// Play a puzzle yourself
    Play {
        /// Puzzle id (1-based)
        #[arg(long, default_value_t = 1)]
        id: u32,

        /// iterative or all-at-once
        #[arg(short, long, default_value = "iterative")]
        mode: Mode,

        /// Incorrect guesses allowed
        #[arg(short, long, default_value_t = 4)]
        guesses: usize,

        /// Seed for the word shuffle
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Summarize a result file
    Summary {
        /// Result file written by `baseline` or `agent`
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Enumerate { output } => {
            let result = run_enumerate(&output)?;
            print_enumeration_result(&result);
            Ok(())
        }
        Commands::Baseline {
            solver,
            embeddings,
            embedding_model,
            mode,
            aggregation,
            partitions,
            guesses,
            ids,
            threads,
            seed,
        } => {
            let mode = mode.unwrap_or_else(|| solver.default_mode());
            if solver == BaselineSolver::KMeans && mode == Mode::Iterative {
                bail!("The kmeans baseline only plays all-at-once");
            }
            let (embedder, model) = load_embedder(embeddings.as_deref(), embedding_model)?;
            let puzzles = load_puzzles(cli.data.as_deref())?;
            let ids = select_ids(&puzzles, ids.as_deref())?;

            let partitions = match (solver, mode) {
                (BaselineSolver::KMeans, _) | (_, Mode::Iterative) => None,
                (BaselineSolver::Ranking, Mode::AllAtOnce) => Some(Arc::new(
                    PartitionTable::load_or_build(&partitions).with_context(|| {
                        format!("Failed to load partition table {}", partitions.display())
                    })?,
                )),
            };
            let baseline = Baseline {
                solver,
                embedder,
                aggregation,
                partitions,
                seed,
            };
            let config = SweepConfig {
                game: GameConfig::new(mode, guesses),
                limits: RunLimits::default(),
                threads,
                model: model.clone(),
                chain_of_thought: None,
            };

            let name = match (solver, mode) {
                (BaselineSolver::KMeans, _) => "kmeans".to_string(),
                (BaselineSolver::Ranking, Mode::Iterative) => format!("single_group-{aggregation}"),
                (BaselineSolver::Ranking, Mode::AllAtOnce) => {
                    format!("full_partition-{aggregation}")
                }
            };
            let path = cli.results.join(results_file_name(&name, &model, None));
            let mut store = ResultStore::open(&path)?;

            let outcome = run_baseline(&puzzles, &ids, &baseline, &config, &mut store)?;
            print_sweep_outcome(&outcome, &path);
            print_summary(&Summary::from_records(store.records()), &path);
            Ok(())
        }
        Commands::Agent {
            model,
            mode,
            seeds,
            chain_of_thought,
            system_prompt,
            guesses,
            invalid_limit,
            ids,
            threads,
            max_retries,
            max_tokens,
            temperature,
        } => {
            // Fail before touching any puzzle if credentials are missing
            let provider = Config::from_env()?;
            let puzzles = load_puzzles(cli.data.as_deref())?;
            let ids = select_ids(&puzzles, ids.as_deref())?;

            let backoff = BackoffPolicy {
                max_retries,
                ..BackoffPolicy::default()
            };
            let chat: Arc<dyn ChatModel> =
                Arc::new(RetryingModel::new(OpenAiClient::new(provider), backoff));

            let options = AgentOptions {
                model: model.clone(),
                max_tokens,
                temperature,
                use_system_prompt: system_prompt,
                chain_of_thought,
            };
            let config = SweepConfig {
                game: GameConfig::new(mode, guesses),
                limits: RunLimits { invalid_limit },
                threads,
                model: model.clone(),
                chain_of_thought: Some(chain_of_thought),
            };

            let solver = format!("agent-{mode}");
            let path = cli
                .results
                .join(results_file_name(&solver, &model, Some(chain_of_thought)));
            let mut store = ResultStore::open(&path)?;

            let outcome = run_agent(&puzzles, &ids, &seeds, chat, &options, &config, &mut store)?;
            print_sweep_outcome(&outcome, &path);
            print_summary(&Summary::from_records(store.records()), &path);
            Ok(())
        }
        Commands::Play {
            id,
            mode,
            guesses,
            seed,
        } => {
            let puzzles = load_puzzles(cli.data.as_deref())?;
            let puzzle = puzzles.get(id)?.clone();
            let config = GameConfig::new(mode, guesses);
            let config = seed.map_or(config, |seed| config.with_seed(seed));
            run_play(puzzle, config)
        }
        Commands::Summary { file } => {
            if !file.exists() {
                bail!("Result file {} does not exist", file.display());
            }
            let store = ResultStore::open(&file)?;
            print_summary(&Summary::from_records(store.records()), &file);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_puzzles(path: Option<&Path>) -> Result<PuzzleSet> {
    let puzzles = match path {
        Some(path) => PuzzleSet::load(path)
            .with_context(|| format!("Failed to load puzzles from {}", path.display()))?,
        None => PuzzleSet::sample()?,
    };
    info!(puzzles = puzzles.len(), "loaded puzzle set");
    Ok(puzzles)
}

/// Pick the embedding source and the name recorded with results
fn load_embedder(
    table: Option<&Path>,
    model: Option<String>,
) -> Result<(Arc<dyn Embedder>, String)> {
    match (table, model) {
        (Some(path), _) => {
            let table = EmbeddingTable::load(path)
                .with_context(|| format!("Failed to load embeddings from {}", path.display()))?;
            let name = path
                .file_stem()
                .map_or_else(|| "embeddings".to_string(), |s| s.to_string_lossy().into_owned());
            Ok((Arc::new(table), name))
        }
        (None, Some(model)) => {
            let client = OpenAiClient::new(Config::from_env()?);
            Ok((Arc::new(OpenAiEmbedder::new(client, model.clone())), model))
        }
        (None, None) => bail!("Pass --embeddings <FILE> or --embedding-model <NAME>"),
    }
}

/// Parse "1-3,7" style id lists; `None` selects every puzzle
fn select_ids(puzzles: &PuzzleSet, list: Option<&str>) -> Result<Vec<u32>> {
    let Some(list) = list else {
        return Ok(puzzles.ids().collect());
    };

    let mut ids = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some((start, end)) = part.split_once('-') {
            let start: u32 = start.trim().parse().with_context(|| format!("Bad id range {part:?}"))?;
            let end: u32 = end.trim().parse().with_context(|| format!("Bad id range {part:?}"))?;
            if start > end {
                bail!("Empty id range {part:?}");
            }
            ids.extend(start..=end);
        } else {
            ids.push(part.parse().with_context(|| format!("Bad puzzle id {part:?}"))?);
        }
    }
    Ok(ids)
}
