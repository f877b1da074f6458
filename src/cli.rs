//! Command-line parsing for the headless runner.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::adapter::HostConfig;

pub const USAGE: &str = "\
usage: heatfall [--seed N] [--players N] [--max-turns N] [--profile NAME] [--best-score-path PATH]

Runs a local match of automated players on one seed and prints the rankings.
Defaults come from HEATFALL_SEED, HEATFALL_PROFILE and HEATFALL_BEST_SCORE_PATH.";

pub const DEFAULT_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;
pub const DEFAULT_MAX_TURNS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub host: HostConfig,
    pub players: usize,
    /// Sessions still alive at this turn retire with their current score
    pub max_turns: u32,
}

impl MatchConfig {
    pub fn new(host: HostConfig) -> Self {
        Self {
            host,
            players: DEFAULT_PLAYERS,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

/// Parse arguments (without the program name) on top of `base`.
///
/// Returns `Ok(None)` when help was requested.
pub fn parse_match_args(args: &[String], base: HostConfig) -> Result<Option<MatchConfig>> {
    let mut config = MatchConfig::new(base);
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-h" | "--help" => return Ok(None),
            "--seed" => {
                config.host.seed = parse_value(args, &mut i, flag)?;
            }
            "--players" => {
                let n: usize = parse_value(args, &mut i, flag)?;
                if n == 0 || n > MAX_PLAYERS {
                    return Err(anyhow!(
                        "heatfall: --players must be between 1 and {}, got {}",
                        MAX_PLAYERS,
                        n
                    ));
                }
                config.players = n;
            }
            "--max-turns" => {
                let n: u32 = parse_value(args, &mut i, flag)?;
                if n == 0 {
                    return Err(anyhow!("heatfall: --max-turns must be positive"));
                }
                config.max_turns = n;
            }
            "--profile" => {
                let v = value_of(args, &mut i, flag)?;
                if v.trim().is_empty() {
                    return Err(anyhow!("heatfall: --profile must not be empty"));
                }
                config.host.profile = v.trim().to_string();
            }
            "--best-score-path" => {
                config.host.best_score_path = PathBuf::from(value_of(args, &mut i, flag)?);
            }
            other => {
                return Err(anyhow!("heatfall: unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(Some(config))
}

fn value_of<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("heatfall: missing value for {}", flag))
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T> {
    let v = value_of(args, i, flag)?;
    v.parse::<T>()
        .map_err(|_| anyhow!("heatfall: invalid {} value: {}", flag, v))
}
