//! Find the fastest routes between two stations from the command line.
//!
//! With both stations given the search runs straight away. Otherwise the
//! missing stations and the start time are asked for interactively, with
//! station names completed from the network.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::Parser;
use inquire::autocompletion::{Autocomplete, Replacement};
use inquire::validator::Validation;
use inquire::{CustomUserError, Text};
use tracing::debug;

use metro_router::domain::Network;
use metro_router::logging::init_logger;
use metro_router::planner::{Router, RouterConfig};
use metro_router::timings::{BandedTimings, TimingsConfig};
use metro_router::topology;

/// Find one or more routes between stations of a metro network.
#[derive(Debug, Parser)]
#[command(name = "find-route", version)]
struct Args {
    /// Station to travel from (asked for when omitted)
    source: Option<String>,

    /// Station to travel to (asked for when omitted)
    destination: Option<String>,

    /// Time of travel as YYYY-MM-DDTHH:MM in network local time
    #[arg(long, value_parser = parse_time, conflicts_with = "untimed")]
    at: Option<NaiveDateTime>,

    /// Cost every hop and change at one minute, ignoring timings
    #[arg(long)]
    untimed: bool,

    /// Stations map JSON file
    #[arg(long, default_value = "data/stations-map.json")]
    stations_map: PathBuf,

    /// Line timings JSON file (built-in Singapore timings when omitted)
    #[arg(long)]
    timings: Option<PathBuf>,

    /// Show at most this many routes
    #[arg(long)]
    max_results: Option<usize>,
}

fn parse_time(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {e}"))
}

/// Parse an answer to the start time prompt. Blank means now.
fn parse_start_time(s: &str) -> Result<Option<NaiveDateTime>, String> {
    let s = s.trim();
    if s.is_empty() {
        Ok(None)
    } else {
        parse_time(s).map(Some)
    }
}

/// When to search at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TravelTime {
    At(NaiveDateTime),
    Now,
    Untimed,
}

/// A fully specified search.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Query {
    source: String,
    destination: String,
    time: TravelTime,
}

/// Completes station names by prefix.
#[derive(Debug, Clone)]
struct StationCompleter {
    names: Vec<String>,
}

impl StationCompleter {
    fn new(network: &Network) -> Self {
        let mut names: Vec<String> = network
            .stations()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        names.sort();
        Self { names }
    }

    /// Station names starting with `input`, ignoring case.
    fn suggestions(&self, input: &str) -> Vec<String> {
        let prefix = input.trim().to_lowercase();
        self.names
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl Autocomplete for StationCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self.suggestions(input))
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion.or_else(|| self.suggestions(input).into_iter().next()))
    }
}

/// Source of answers for the interactive questions.
trait Prompter {
    fn station(&mut self, message: &str, completer: &StationCompleter) -> Result<String, Box<dyn Error>>;

    /// `None` means travel now.
    fn start_time(&mut self) -> Result<Option<NaiveDateTime>, Box<dyn Error>>;
}

/// Asks on the terminal.
struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn station(&mut self, message: &str, completer: &StationCompleter) -> Result<String, Box<dyn Error>> {
        let known = completer.clone();
        let answer = Text::new(message)
            .with_autocomplete(completer.clone())
            .with_validator(move |s: &str| {
                Ok(if known.contains(s.trim()) {
                    Validation::Valid
                } else {
                    Validation::Invalid(format!("no station called \"{}\"", s.trim()).into())
                })
            })
            .prompt()?;
        Ok(answer.trim().to_string())
    }

    fn start_time(&mut self) -> Result<Option<NaiveDateTime>, Box<dyn Error>> {
        let answer = Text::new("Please enter the start time of the travel (YYYY-MM-DDTHH:MM):")
            .with_help_message("Leave blank to travel now")
            .with_validator(|s: &str| {
                Ok(match parse_start_time(s) {
                    Ok(_) => Validation::Valid,
                    Err(e) => Validation::Invalid(e.into()),
                })
            })
            .prompt()?;
        Ok(parse_start_time(&answer)?)
    }
}

/// Fill in whatever the command line left out by asking `prompter`.
///
/// The start time is only asked for when a station was asked for and neither
/// `--at` nor `--untimed` was given.
fn build_query(
    args: &Args,
    completer: &StationCompleter,
    prompter: &mut impl Prompter,
) -> Result<Query, Box<dyn Error>> {
    let interactive = args.source.is_none() || args.destination.is_none();

    let source = match &args.source {
        Some(source) => source.clone(),
        None => prompter.station("Please enter the source station:", completer)?,
    };
    let destination = match &args.destination {
        Some(destination) => destination.clone(),
        None => prompter.station("Please enter the destination station:", completer)?,
    };

    let time = match (args.untimed, args.at) {
        (true, _) => TravelTime::Untimed,
        (false, Some(at)) => TravelTime::At(at),
        (false, None) if interactive => match prompter.start_time()? {
            Some(at) => TravelTime::At(at),
            None => TravelTime::Now,
        },
        (false, None) => TravelTime::Now,
    };

    Ok(Query {
        source,
        destination,
        time,
    })
}

fn main() -> ExitCode {
    init_logger();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let network = topology::load_file(&args.stations_map)?;
    let timings = match &args.timings {
        Some(path) => BandedTimings::new(TimingsConfig::load(path)?)?,
        None => BandedTimings::singapore(),
    };
    debug!(
        lines = network.lines().len(),
        stations = network.stations().len(),
        "Loaded network"
    );

    let completer = StationCompleter::new(&network);
    let query = build_query(args, &completer, &mut TerminalPrompter)?;

    let at = match query.time {
        TravelTime::At(at) => Some(at),
        TravelTime::Now => Some(timings.local_now()),
        TravelTime::Untimed => None,
    };

    let config = RouterConfig {
        max_results: args.max_results,
        ..RouterConfig::default()
    };
    let router = Router::new(&network, &timings, &config);
    let result = router.find_routes(&query.source, &query.destination, at)?;

    println!(
        "Found [{}] routes from [{}] to [{}].",
        result.routes.len(),
        query.source,
        query.destination
    );
    for route in &result.routes {
        println!();
        println!("{route}");
    }

    Ok(())
}
