//! Blackjack simulation binary.
//!
//! Plays many rounds under a stand-on-N player policy and reports outcome
//! frequencies, bust rates and the dealer's final-total distribution.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use blackjack_table::sim::{AlwaysStand, Policy, SimConfig, SimStats, Simulator, StandOn};

#[derive(Parser, Debug)]
#[command(about = "Simulate blackjack rounds under a fixed player policy")]
struct Args {
    /// Number of rounds to play
    #[arg(short, long, default_value_t = 1_000_000)]
    rounds: u64,

    /// Player stands on this total or higher (0 = never hit)
    #[arg(short, long, default_value_t = 17)]
    threshold: u32,

    /// Base random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Rounds per batch
    #[arg(long, default_value_t = 10_000)]
    batch_size: u64,

    /// Worker threads (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Write statistics to this JSON file
    #[arg(short, long)]
    output: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let mut config = SimConfig::default().with_batch_size(args.batch_size);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }

    println!("=== Blackjack Simulation ===\n");

    let stats = if args.threshold == 0 {
        simulate(AlwaysStand, config, args.rounds)?
    } else {
        simulate(StandOn::checked(args.threshold)?, config, args.rounds)?
    };

    println!();
    stats.print_summary();

    if let Some(path) = args.output {
        stats.save_json(&path)?;
        println!("\nSaved JSON: {}", path);
    }

    Ok(())
}

fn simulate<P: Policy>(
    policy: P,
    config: SimConfig,
    rounds: u64,
) -> Result<SimStats, Box<dyn std::error::Error>> {
    println!("Policy: {} | Rounds: {}", policy.name(), rounds);

    let progress = ProgressBar::new(rounds);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} rounds ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let simulator = Simulator::new(policy, config)?;
    let stats = simulator.run_with_progress(rounds, |n| progress.inc(n))?;
    progress.finish();

    Ok(stats)
}
