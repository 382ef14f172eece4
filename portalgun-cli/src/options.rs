use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};

pub const USAGE_MSG: &str = "Incorrect parameters:
No arguments: portalgun
Only one argument like: portalgun 1
A non-existent Morty: portalgun --boxes 3 --morty unknownMorty

Usage examples:
  portalgun --boxes 3 --morty classic --rounds 3
  portalgun 3 ./mortys/picky.json

Notes:
- --boxes  : integer > 2 (default: 3)
- --morty  : builtin name (classic|lazy) or path to a JSON Morty descriptor
- --rounds : optional number of rounds to run then exit";

/// Flags that make sense on their own, without a game to configure.
const STANDALONE_FLAGS: [&str; 5] = ["--list-strategies", "--help", "-h", "--version", "-V"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Table on the console
    Console,
    /// Machine-readable summary
    Json,
    /// Markdown table
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "portalgun", version)]
#[command(about = "Find Rick's portal gun: a provably fair Monty Hall game against Morty")]
pub struct Args {
    /// Box count and/or Morty given positionally, e.g. `portalgun 3 classic`
    #[arg(value_name = "BOXES|MORTY", num_args = 0..=2)]
    pub positional: Vec<String>,

    /// Number of boxes (integer > 2)
    #[arg(long, value_parser = parse_boxes)]
    pub boxes: Option<u32>,

    /// Built-in Morty (classic, lazy) or path to a JSON Morty descriptor
    #[arg(long)]
    pub morty: Option<String>,

    /// Play this many rounds and exit instead of asking after each round
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub rounds: Option<u32>,

    /// Seed Morty's generator for a reproducible (and therefore predictable) session
    #[arg(long)]
    pub seed: Option<u64>,

    /// Format of the final statistics
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub report: ReportFormat,

    /// List the built-in Mortys and exit
    #[arg(long)]
    pub list_strategies: bool,
}

/// Fully resolved game configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOptions {
    pub boxes: u32,
    pub morty: String,
    pub rounds: Option<u32>,
    pub seed: Option<u64>,
    pub report: ReportFormat,
}

pub const DEFAULT_BOXES: u32 = 3;

fn parse_boxes(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(boxes) if boxes > 2 => Ok(boxes),
        _ => Err("boxes must be an integer > 2.".to_string()),
    }
}

/// Too few raw arguments to describe a game.
#[must_use]
pub fn too_few_arguments(raw: &[String]) -> bool {
    raw.len() < 2 && !raw.iter().any(|arg| STANDALONE_FLAGS.contains(&arg.as_str()))
}

impl Args {
    /// Merge flags and positionals; flags win.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid positional box count, conflicting
    /// positionals, or a missing Morty.
    pub fn into_options(self) -> Result<GameOptions> {
        let mut boxes = self.boxes;
        let mut morty = self.morty;
        for token in self.positional {
            if token.parse::<i64>().is_ok() {
                if boxes.is_some() {
                    bail!("box count given twice: {token}");
                }
                boxes = Some(parse_boxes(&token).map_err(anyhow::Error::msg)?);
            } else {
                if morty.is_some() {
                    bail!("Morty given twice: {token}");
                }
                morty = Some(token);
            }
        }
        let Some(morty) = morty else {
            bail!("--morty is required");
        };
        Ok(GameOptions {
            boxes: boxes.unwrap_or(DEFAULT_BOXES),
            morty,
            rounds: self.rounds,
            seed: self.seed,
            report: self.report,
        })
    }
}
