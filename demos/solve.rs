// demos/solve.rs
// Run with:
//   RUST_LOG=info cargo run --release --example solve -- [rank ordinal] [generations]

use idle_path::economy::{Catalog, EconomyState, Milestone};
use idle_path::search::{Evolver, SearchConfig};

fn hms(secs: u128) -> String {
    format!("{}h{:02}m{:02}s", secs / 3600, secs / 60 % 60, secs % 60)
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let rank: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(3);
    let generations: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(100);

    let catalog = Catalog::standard();
    let goal = Milestone::Rank(rank);
    let config = SearchConfig::default().with_generations(generations);

    let evolver = match Evolver::new(&catalog, EconomyState::new(&catalog), goal, config) {
        Ok(e) => e,
        Err(e) => {
            log::error!("cannot start search: {e}");
            std::process::exit(1);
        }
    };
    let outcome = match evolver.run() {
        Ok(o) => o,
        Err(e) => {
            log::error!("search failed: {e}");
            std::process::exit(1);
        }
    };

    println!("== best path to {} ==", goal.describe(&catalog));
    match outcome.best.report(&catalog) {
        Ok(report) => {
            for (i, step) in report.steps.iter().enumerate() {
                println!("{:>3}. {:<40} +{:<12} {}", i + 1, step.description, hms(step.seconds), step.summary);
            }
            println!("total: {} ({} s)", hms(report.total_seconds), report.total_seconds);
        }
        Err(e) => log::error!("best path failed to replay: {e}"),
    }
    println!(
        "generations: {}, champions kept: {}, cancelled: {}",
        outcome.generations,
        outcome.history.len(),
        outcome.cancelled
    );
}
