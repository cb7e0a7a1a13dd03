//! Monte Carlo simulation of many rounds.
//!
//! Rounds are split into fixed-size batches. Each batch gets its own RNG
//! seeded from the base seed and the batch index, so a seeded run produces
//! the same statistics on any number of threads.

use std::fs::File;
use std::io::Write;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::policy::{Decision, Policy};
use crate::engine::{deal_initial, player_hit, stand_and_resolve, Hand, Outcome};

/// Configuration for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Rounds per batch (one RNG per batch).
    pub batch_size: u64,

    /// Worker threads. `None` uses the rayon default.
    pub num_threads: Option<usize>,

    /// Base seed. `None` picks one at random.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            batch_size: 10_000,
            num_threads: None,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Builder method: set batch size.
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Builder method: set number of threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.batch_size == 0 {
            return Err(SimError::InvalidBatchSize);
        }
        if self.num_threads == Some(0) {
            return Err(SimError::InvalidThreads);
        }
        Ok(())
    }
}

/// Errors from setting up a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("batch size must be greater than zero")]
    InvalidBatchSize,
    #[error("thread count must be greater than zero")]
    InvalidThreads,
    #[error("policy threshold {0} is out of range [1, 21]")]
    InvalidThreshold(u32),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Aggregate results of simulated rounds, one unit wagered per round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    /// Policy that played the rounds.
    pub policy: String,
    /// Base seed of the run.
    pub seed: u64,
    pub rounds: u64,
    pub won: u64,
    pub lost: u64,
    pub tied: u64,
    pub player_busts: u64,
    pub dealer_busts: u64,
    /// Two-card 21s dealt to the player (paid as ordinary wins).
    pub naturals: u64,
    /// Net units won by the player.
    pub net: i64,
    /// Dealer's final total, counted only when the dealer played out.
    pub dealer_totals: FxHashMap<u32, u64>,
    /// Player's final total.
    pub player_totals: FxHashMap<u32, u64>,
    pub elapsed_seconds: f64,
    pub rounds_per_second: f64,
}

impl SimStats {
    /// Count one round.
    pub fn record(&mut self, player: &Hand, dealer: &Hand, outcome: Outcome, dealer_played: bool) {
        self.rounds += 1;
        match outcome {
            Outcome::Won => self.won += 1,
            Outcome::Lost => self.lost += 1,
            Outcome::Tied => self.tied += 1,
        }
        self.net += i64::from(outcome.sign());

        if player.is_bust() {
            self.player_busts += 1;
        }
        if player.is_natural() {
            self.naturals += 1;
        }
        *self.player_totals.entry(player.total()).or_insert(0) += 1;

        if dealer_played {
            if dealer.is_bust() {
                self.dealer_busts += 1;
            }
            *self.dealer_totals.entry(dealer.total()).or_insert(0) += 1;
        }
    }

    /// Combine two partial results.
    pub fn merge(mut self, other: SimStats) -> SimStats {
        self.rounds += other.rounds;
        self.won += other.won;
        self.lost += other.lost;
        self.tied += other.tied;
        self.player_busts += other.player_busts;
        self.dealer_busts += other.dealer_busts;
        self.naturals += other.naturals;
        self.net += other.net;
        for (total, count) in other.dealer_totals {
            *self.dealer_totals.entry(total).or_insert(0) += count;
        }
        for (total, count) in other.player_totals {
            *self.player_totals.entry(total).or_insert(0) += count;
        }
        self
    }

    /// Fraction of rounds won.
    pub fn win_rate(&self) -> f64 {
        self.ratio(self.won)
    }

    /// Fraction of rounds lost.
    pub fn loss_rate(&self) -> f64 {
        self.ratio(self.lost)
    }

    /// Fraction of rounds tied.
    pub fn tie_rate(&self) -> f64 {
        self.ratio(self.tied)
    }

    /// Average units won per unit wagered.
    pub fn expected_value(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.net as f64 / self.rounds as f64
        }
    }

    fn ratio(&self, count: u64) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            count as f64 / self.rounds as f64
        }
    }

    /// Update rounds per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.rounds_per_second = self.rounds as f64 / self.elapsed_seconds;
        }
    }

    /// Dealer final totals in ascending order.
    pub fn sorted_dealer_totals(&self) -> Vec<(u32, u64)> {
        let mut totals: Vec<(u32, u64)> = self.dealer_totals.iter().map(|(&t, &c)| (t, c)).collect();
        totals.sort_unstable();
        totals
    }

    /// Write the stats as pretty JSON.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("========================================");
        println!("  Policy: {} | Seed: {}", self.policy, self.seed);
        println!("  Rounds: {} ({:.0}/s)", self.rounds, self.rounds_per_second);
        println!("========================================");
        println!("  Won:   {:>10} ({:>5.2}%)", self.won, self.win_rate() * 100.0);
        println!("  Lost:  {:>10} ({:>5.2}%)", self.lost, self.loss_rate() * 100.0);
        println!("  Tied:  {:>10} ({:>5.2}%)", self.tied, self.tie_rate() * 100.0);
        println!("  Player busts: {}", self.player_busts);
        println!("  Dealer busts: {}", self.dealer_busts);
        println!("  Naturals:     {}", self.naturals);
        println!("  EV per unit:  {:+.4}", self.expected_value());
        println!();
        println!("  Dealer final totals:");
        for (total, count) in self.sorted_dealer_totals() {
            println!("    {:>2}: {}", total, count);
        }
    }
}

/// Play one round under `policy`, one unit wagered.
///
/// Returns the final hands, the outcome and whether the dealer played out.
pub fn play_round<P, R>(policy: &P, rng: &mut R) -> (Hand, Hand, Outcome, bool)
where
    P: Policy + ?Sized,
    R: Rng + ?Sized,
{
    let (mut player, dealer) = deal_initial(rng);
    let up = dealer.cards()[0];

    while policy.decide(&player, up) == Decision::Hit {
        player = player_hit(player, rng);
        if player.is_bust() {
            return (player, dealer, Outcome::Lost, false);
        }
    }

    let (dealer, outcome) = stand_and_resolve(&player, dealer, rng);
    (player, dealer, outcome, true)
}

/// Runs rounds in parallel batches under a single policy.
pub struct Simulator<P: Policy> {
    policy: P,
    config: SimConfig,
}

impl<P: Policy> Simulator<P> {
    /// Create a simulator.
    pub fn new(policy: P, config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { policy, config })
    }

    /// The policy being simulated.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Play `rounds` rounds.
    pub fn run(&self, rounds: u64) -> Result<SimStats, SimError> {
        self.run_with_progress(rounds, |_| {})
    }

    /// Play `rounds` rounds, calling `on_batch` with each finished batch size.
    pub fn run_with_progress<F>(&self, rounds: u64, on_batch: F) -> Result<SimStats, SimError>
    where
        F: Fn(u64) + Sync,
    {
        let start = Instant::now();
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let batch_size = self.config.batch_size;
        let num_batches = rounds.div_ceil(batch_size);

        let simulate = || {
            (0..num_batches)
                .into_par_iter()
                .map(|batch| {
                    let size = batch_size.min(rounds - batch * batch_size);
                    let stats = self.play_batch(seed.wrapping_add(batch), size);
                    on_batch(size);
                    stats
                })
                .reduce(SimStats::default, SimStats::merge)
        };

        let mut stats = match self.config.num_threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(simulate),
            None => simulate(),
        };

        stats.policy = self.policy.name();
        stats.seed = seed;
        stats.elapsed_seconds = start.elapsed().as_secs_f64();
        stats.update_rate();

        info!(
            policy = %stats.policy,
            rounds = stats.rounds,
            ev = stats.expected_value(),
            elapsed = stats.elapsed_seconds,
            "simulation finished"
        );
        Ok(stats)
    }

    fn play_batch(&self, seed: u64, rounds: u64) -> SimStats {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut stats = SimStats::default();
        for _ in 0..rounds {
            let (player, dealer, outcome, dealer_played) = play_round(&self.policy, &mut rng);
            stats.record(&player, &dealer, outcome, dealer_played);
        }
        stats
    }
}
