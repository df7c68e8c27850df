//! jigsaw CLI: duplicate removal and board placement for the assembly robot.

use clap::{Args, Parser, Subcommand};
use jigsaw::{pipeline, AssemblyConfig, ClusteringMode};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "jigsaw")]
#[command(about = "Deduplicate photographed jigsaw pieces and place them on the solved board")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON log lines (tracing builds only).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove duplicate pieces from a directory of side records.
    Dedupe(DedupeArgs),

    /// Place a solved board and write per-piece placement records.
    Place(PlaceArgs),

    /// Run dedupe, then place the survivors.
    Assemble(AssembleArgs),

    /// Print the default configuration as JSON.
    Config {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct CommonArgs {
    /// Path to a JSON config; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct DedupeArgs {
    /// Batch metadata JSON with the camera position of every photo.
    #[arg(long)]
    batch: PathBuf,

    /// Directory holding `side_{id}_{n}.json` records and outlines.
    #[arg(long)]
    input: PathBuf,

    /// Directory that receives the surviving pieces.
    #[arg(long)]
    output: PathBuf,

    /// Fail unless exactly this many pieces survive.
    #[arg(long)]
    expected: Option<usize>,

    /// Group duplicates transitively instead of in anchor order.
    #[arg(long)]
    transitive: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Clone, Args)]
struct PlaceArgs {
    /// Solved board JSON (piece id and orientation per cell).
    #[arg(long)]
    board: PathBuf,

    /// Directory holding the (deduplicated) side records.
    #[arg(long)]
    pieces: PathBuf,

    /// Directory that receives placement records and `board.svg`.
    #[arg(long)]
    output: PathBuf,

    /// Dedupe report used for mismatch flags; defaults to the one in `--pieces`.
    #[arg(long)]
    dedupe_report: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Clone, Args)]
struct AssembleArgs {
    #[arg(long)]
    batch: PathBuf,

    #[arg(long)]
    input: PathBuf,

    #[arg(long)]
    board: PathBuf,

    /// Work directory; survivors go to `deduped/`, placement to `solution/`.
    #[arg(long)]
    work: PathBuf,

    /// Expected piece count; defaults to the number of board cells.
    #[arg(long)]
    expected: Option<usize>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Dedupe(args) => run_dedupe(&args),
        Commands::Place(args) => run_place(&args),
        Commands::Assemble(args) => run_assemble(&args),
        Commands::Config { out } => run_config(out.as_deref()),
    }
}

#[cfg(feature = "tracing")]
fn init_logging(_verbose: u8, json: bool) {
    let _ = tracing_log::LogTracer::init();
    jigsaw::core::init_tracing(json);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: u8, _json: bool) {
    let _ = jigsaw::core::init_with_level(jigsaw::core::level_for_verbosity(verbose));
}

fn load_config(common: &CommonArgs) -> CliResult<AssemblyConfig> {
    Ok(pipeline::load_config(common.config.as_deref())?)
}

// ── dedupe ────────────────────────────────────────────────────────────

fn run_dedupe(args: &DedupeArgs) -> CliResult<()> {
    let mut cfg = load_config(&args.common)?;
    if args.expected.is_some() {
        cfg.expected_piece_count = args.expected;
    }
    if args.transitive {
        cfg.clustering = ClusteringMode::Transitive;
    }

    let report = pipeline::run_dedupe(&args.batch, &args.input, &args.output, &cfg)?;
    println!(
        "{} pieces in, {} unique, {} removed",
        report.input_count,
        report.unique_count(),
        report.removed_count()
    );
    Ok(())
}

// ── place ─────────────────────────────────────────────────────────────

fn run_place(args: &PlaceArgs) -> CliResult<()> {
    let cfg = load_config(&args.common)?;
    let placement = pipeline::run_place(
        &args.board,
        &args.pieces,
        &args.output,
        &cfg,
        args.dedupe_report.as_deref(),
    )?;
    println!(
        "placed {} pieces on a {}x{} board ({:.1} x {:.1} px)",
        placement.pieces.len(),
        placement.width,
        placement.height,
        placement.board_width,
        placement.board_height
    );
    Ok(())
}

// ── assemble ──────────────────────────────────────────────────────────

fn run_assemble(args: &AssembleArgs) -> CliResult<()> {
    let mut cfg = load_config(&args.common)?;
    if args.expected.is_some() {
        cfg.expected_piece_count = args.expected;
    }
    let (report, placement) =
        pipeline::run_assemble(&args.batch, &args.input, &args.board, &args.work, &cfg)?;
    println!("{} unique pieces", report.unique_count());
    println!(
        "placed {} pieces into {}",
        placement.pieces.len(),
        args.work.join(pipeline::SOLUTION_DIR).display()
    );
    Ok(())
}

// ── config ────────────────────────────────────────────────────────────

fn run_config(out: Option<&Path>) -> CliResult<()> {
    let cfg = AssemblyConfig::default();
    match out {
        Some(path) => cfg.write_json(path)?,
        None => println!("{}", serde_json::to_string_pretty(&cfg)?),
    }
    Ok(())
}
