//! Interactive blackjack table.
//!
//! Reads wagers and hit/stand decisions from stdin. Results are settled
//! against the casino backend when `--api-url` is given, otherwise against an
//! in-process ledger.

use std::io::{self, BufRead, Write};

use clap::Parser;

use blackjack_table::settlement::{HttpSettlement, Ledger, Settlement, UserId};
use blackjack_table::table::{RoundReport, SettlementStatus, Table, TableConfig, Turn};
use blackjack_table::Outcome;

#[derive(Parser, Debug)]
#[command(about = "Play blackjack at the terminal")]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<String>,

    /// User id reported to the settlement service
    #[arg(short, long)]
    user: Option<String>,

    /// Settlement service base URL, e.g. http://localhost:3001
    #[arg(long)]
    api_url: Option<String>,

    /// Starting balance
    #[arg(short, long)]
    balance: Option<f64>,

    /// Random seed for reproducible dealing
    #[arg(short, long)]
    seed: Option<u64>,

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
        .with_writer(io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => TableConfig::from_json_file(path)?,
        None => TableConfig::default(),
    };
    if let Some(user) = &args.user {
        config = config.with_user(UserId::parse(user));
    }
    if let Some(url) = args.api_url {
        config = config.with_api_url(url);
    }
    if let Some(balance) = args.balance {
        config = config.with_starting_balance(balance);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let settlement: Box<dyn Settlement> = match &config.api_url {
        Some(url) => Box::new(HttpSettlement::new(url, config.request_timeout())?),
        None => Box::new(Ledger::new(config.starting_balance)),
    };
    let mut table = Table::new(config, settlement)?;

    println!("=== 21 Blackjack ===\n");
    if let Err(e) = table.refresh_balance() {
        println!("Could not fetch the user's funds: {}", e);
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let line = match prompt(
            &mut input,
            &format!("\nFunds: ${:.2}. Wager (q to quit): ", table.balance()),
        )? {
            Some(line) => line,
            None => break,
        };
        if line.eq_ignore_ascii_case("q") {
            break;
        }

        let wager: f64 = match line.parse() {
            Ok(w) => w,
            Err(_) => {
                println!("Enter a valid amount greater than 0");
                continue;
            }
        };

        match table.place_bet(wager) {
            Ok(round) => {
                println!("Dealer: {}", round.dealer());
                println!("You:    {}", round.player());
            }
            Err(e) => {
                println!("{}", e);
                continue;
            }
        }

        loop {
            let action = match prompt(&mut input, "[h]it or [s]tand: ")? {
                Some(action) => action,
                None => return Ok(()),
            };

            match action.to_ascii_lowercase().as_str() {
                "h" | "hit" => match table.hit()? {
                    Turn::Continue { .. } => {
                        if let Some(round) = table.round() {
                            println!("You:    {}", round.player());
                        }
                    }
                    Turn::Resolved(report) => {
                        show_report(&report);
                        break;
                    }
                },
                "s" | "stand" => {
                    let report = table.stand()?;
                    show_report(&report);
                    break;
                }
                _ => println!("Type h or s"),
            }
        }
    }

    println!("\nRounds played: {}. Final funds: ${:.2}", table.rounds_played(), table.balance());
    Ok(())
}

fn prompt<R: BufRead>(input: &mut R, message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn show_report(report: &RoundReport) {
    println!("Dealer: {}", report.dealer);
    println!("You:    {}", report.player);

    let message = match report.outcome {
        Outcome::Lost if report.player_bust() => "You went over. You lose!",
        Outcome::Lost => "Dealer wins. You lose!",
        Outcome::Won => "You win!",
        Outcome::Tied => "Push.",
    };
    println!("{}", message);

    match &report.settlement {
        SettlementStatus::Settled { balance } => println!("Funds: ${:.2}", balance),
        SettlementStatus::Failed { message } => println!("{}", message),
    }
}
