//! Headless Heatfall runner (default binary).
//!
//! Plays a seeded local match between automated players through the lobby host,
//! prints the rankings as JSON and updates the best score of the local profile.

use anyhow::Result;

use heatfall::adapter::{HostConfig, LobbyMessage};
use heatfall::cli::{parse_match_args, USAGE};
use heatfall::local_match::run_match;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(config) = parse_match_args(&args, HostConfig::from_env())? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let outcome = run_match(&config)?;

    let rankings = LobbyMessage::Rankings {
        rankings: outcome.rankings,
    };
    println!("{}", rankings.to_line()?);

    if outcome.new_best {
        println!(
            "New best score for {}: {}",
            config.host.profile, outcome.best_score
        );
    } else {
        println!(
            "Score {} (best for {}: {})",
            outcome.local_score, config.host.profile, outcome.best_score
        );
    }
    Ok(())
}
