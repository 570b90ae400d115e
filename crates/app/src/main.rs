use std::fmt;
use std::path::PathBuf;

use quiz_core::model::RoundId;
use quiz_core::{AgeGroup, SubmitOutcome, Theme};
use services::{Clock, QuizRound, RoundBuilder, RoundError, RoundEvent, RoundLoop};
use storage::repository::Storage;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, prelude::*};

mod config;
mod deck;
mod terminal;

use config::AppConfig;
use deck::DeckFile;
use terminal::{Terminal, parse_answer};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingDeck,
    InvalidLimit { raw: String },
    InvalidAgeGroup { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingDeck => write!(f, "no deck given (use --deck or QUIZ_DECK)"),
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
            ArgsError::InvalidAgeGroup { raw } => write!(f, "invalid --age-group value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app play --deck <file.toml> [--config <file.toml>] [--age-group <g>]");
    eprintln!("           [--shuffle] [--limit <n>] [--json]");
    eprintln!();
    eprintln!("Answers are read from stdin: y/yes/t/true/1 or n/no/f/false/0.");
    eprintln!("Press Enter to move on when auto-advance is off.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DECK, QUIZ_CONFIG, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    deck: PathBuf,
    config: Option<PathBuf>,
    age_group: Option<AgeGroup>,
    shuffle: bool,
    limit: Option<usize>,
    json: bool,
}

impl Args {
    fn parse_play(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut deck = env("QUIZ_DECK").map(PathBuf::from);
        let mut config = env("QUIZ_CONFIG").map(PathBuf::from);
        let mut age_group = None;
        let mut shuffle = false;
        let mut limit = None;
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--deck" => deck = Some(require_value(args, "--deck")?.into()),
                "--config" => config = Some(require_value(args, "--config")?.into()),
                "--age-group" => {
                    let value = require_value(args, "--age-group")?;
                    let parsed = value
                        .parse::<AgeGroup>()
                        .map_err(|_| ArgsError::InvalidAgeGroup { raw: value.clone() })?;
                    age_group = Some(parsed);
                }
                "--shuffle" => shuffle = true,
                "--limit" => {
                    let value = require_value(args, "--limit")?;
                    let parsed: usize = value
                        .parse()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| ArgsError::InvalidLimit { raw: value.clone() })?;
                    limit = Some(parsed);
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            deck: deck.ok_or(ArgsError::MissingDeck)?,
            config,
            age_group,
            shuffle,
            limit,
            json,
        })
    }
}

/// Logs go to stderr so they never interleave with the quiz on stdout.
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(tracing_fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    match argv.next().as_deref() {
        Some("play") => {}
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(other) => {
            eprintln!("unknown subcommand: {other}");
            print_usage();
            return Err(ArgsError::UnknownArg(other.to_owned()).into());
        }
    }

    let parsed = Args::parse_play(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    let config = parsed
        .config
        .as_deref()
        .map(AppConfig::load)
        .unwrap_or_default();
    let settings = config.settings()?;
    let age_group = match parsed.age_group {
        Some(group) => group,
        None => config.age_group()?.unwrap_or_default(),
    };

    let prompts = DeckFile::load(&parsed.deck)?.into_prompts()?;
    let plan = RoundBuilder::new(prompts)
        .with_shuffle(parsed.shuffle)
        .with_limit(parsed.limit)
        .build();

    let clock = Clock::default_clock();
    let round = QuizRound::new(RoundId::new(1), plan, clock.now())?;
    let total = round.total_prompts();
    let storage = Storage::in_memory();
    let mut round_loop = RoundLoop::new(
        settings,
        Theme::for_age_group(age_group),
        clock,
        round,
        &storage,
    );
    let mut terminal = Terminal::new(std::io::stdout(), parsed.json);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let first = round_loop.start()?;
    terminal.prompt(&first, 1, total)?;

    loop {
        tokio::select! {
            event = round_loop.next_event() => {
                let Some(event) = event? else { break };
                render(&mut terminal, &round_loop, &event)?;
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    match input_closed(&mut round_loop, settings.auto_advance()).await? {
                        AfterInput::KeepPlaying => continue,
                        AfterInput::Ended(event) => {
                            if let Some(event) = event {
                                render(&mut terminal, &round_loop, &event)?;
                            }
                            break;
                        }
                    }
                };
                match parse_answer(&line) {
                    Some(answer) => {
                        if round_loop.submit(answer)? == SubmitOutcome::Ignored {
                            terminal.note("answer ignored")?;
                        }
                    }
                    None if line.trim().is_empty() => match round_loop.advance().await {
                        Ok(event) => render(&mut terminal, &round_loop, &event)?,
                        Err(RoundError::Pending) => {}
                        Err(err) => return Err(err.into()),
                    },
                    None => terminal.note("answer with y or n")?,
                }
            }
        }
    }

    round_loop.dismiss()?;
    Ok(())
}

/// What the play loop does once stdin reaches end of file.
#[derive(Debug, PartialEq)]
enum AfterInput {
    /// Timers still carry the round to its end.
    KeepPlaying,
    /// Nothing can advance the round any more, so it was ended here.
    Ended(Option<RoundEvent>),
}

async fn input_closed(
    round_loop: &mut RoundLoop,
    auto_advance: bool,
) -> Result<AfterInput, RoundError> {
    if auto_advance {
        return Ok(AfterInput::KeepPlaying);
    }
    Ok(AfterInput::Ended(round_loop.finish().await?))
}

fn render(
    terminal: &mut Terminal<std::io::Stdout>,
    round_loop: &RoundLoop,
    event: &RoundEvent,
) -> std::io::Result<()> {
    if let RoundEvent::Presented(prompt) = event {
        let progress = round_loop.round().progress();
        return terminal.prompt(prompt, progress.answered + 1, progress.total);
    }
    terminal.event(event)
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
