mod narrator;
mod options;
mod reports;

use std::io::{self, Write, stdout};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use portalgun_game::{
    AnswerError, GameError, LineAnswers, RoundLimit, RoundOrchestrator, SessionSummary, Strategy,
    StrategyRegistry,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use narrator::ConsoleNarrator;
use options::{Args, GameOptions, ReportFormat, USAGE_MSG, too_few_arguments};

fn main() -> ExitCode {
    env_logger::init();
    let raw: Vec<String> = std::env::args().skip(1).collect();

    if too_few_arguments(&raw) {
        eprintln!("{USAGE_MSG}");
        return ExitCode::FAILURE;
    }

    let args = match Args::try_parse_from(std::env::args()) {
        Ok(args) => args,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return usage_failure(&anyhow::Error::from(err)),
    };

    if args.list_strategies {
        return exit_with(list_strategies(&mut stdout().lock()));
    }

    let opts = match args.into_options() {
        Ok(opts) => opts,
        Err(err) => return usage_failure(&err),
    };

    let strategy = match StrategyRegistry::new().resolve(&opts.morty) {
        Ok(strategy) => strategy,
        Err(err) => return usage_failure(&anyhow::Error::from(err)),
    };

    exit_with(play(&opts, strategy))
}

fn usage_failure(err: &anyhow::Error) -> ExitCode {
    eprintln!("{USAGE_MSG}");
    eprintln!("\nDetails: {err:#}");
    ExitCode::FAILURE
}

fn exit_with(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn list_strategies(out: &mut dyn Write) -> Result<()> {
    let registry = StrategyRegistry::new();
    writeln!(out, "Available strategies:")?;
    for builtin in registry.builtins() {
        let strategy = (builtin.build)();
        writeln!(out, "  {:10} - {}", builtin.name, strategy.describe())?;
    }
    writeln!(
        out,
        "Any other value is read as the path of a JSON Morty descriptor."
    )?;
    Ok(())
}

fn play(opts: &GameOptions, strategy: Box<dyn Strategy>) -> Result<()> {
    let rng = match opts.seed {
        Some(seed) => {
            log::warn!("seeded session: Morty's secrets are reproducible from seed {seed}");
            ChaCha20Rng::seed_from_u64(seed)
        }
        None => ChaCha20Rng::from_entropy(),
    };

    let mut game = RoundOrchestrator::new(opts.boxes, strategy, rng)
        .context("cannot start the game")?;
    println!(
        "{}",
        format!("Loaded Morty: {} ({} boxes)", game.strategy().name(), game.boxes()).green()
    );
    println!("{}", game.strategy().describe());
    let mut answers = LineAnswers::new(io::stdin().lock(), stdout())
        .with_rejection_style(|message| message.red().to_string());
    let mut narrator = ConsoleNarrator::new(stdout());

    let outcome = game.run_session(
        RoundLimit::from(opts.rounds),
        &mut answers,
        &mut narrator,
    );
    let (summary, cut_short) = match outcome {
        Ok(summary) => (summary, None),
        Err(GameError::Answer(err @ AnswerError::Closed { .. })) => {
            log::warn!("{err}");
            (game.summary(), Some(err))
        }
        Err(err) => return Err(err).context("round failed"),
    };

    write_report(opts.report, &summary)?;

    match cut_short {
        Some(err) => Err(anyhow::Error::from(err).context(format!(
            "session ended early after {} completed rounds",
            summary.rounds
        ))),
        None => Ok(()),
    }
}

fn write_report(format: ReportFormat, summary: &SessionSummary) -> Result<()> {
    let mut out = stdout().lock();
    match format {
        ReportFormat::Console => reports::write_console_report(&mut out, summary),
        ReportFormat::Json => reports::write_json_report(&mut out, summary),
        ReportFormat::Markdown => reports::write_markdown_report(&mut out, summary),
    }?;
    out.flush().context("flushing report")
}
