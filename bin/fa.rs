use finite_automata::prelude::*;

use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("fa")
        .about("Finite automata: simulation, determinization and minimization")
        .subcommand_required(true)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .global(true)
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["warn", "info", "debug", "trace"])
                .default_missing_value("info"),
        )
        .subcommand(
            Command::new("simulate")
                .about("decides whether the automaton accepts the input, prints `true` or `false`")
                .arg(Arg::new("automaton").required(true))
                .arg(Arg::new("input").required(true).allow_hyphen_values(true))
                .arg(
                    Arg::new("frontier")
                        .long("frontier")
                        .action(ArgAction::SetTrue)
                        .help("track the set of reachable states instead of branching"),
                ),
        )
        .subcommand(
            Command::new("determinize")
                .about("applies the subset construction and writes the resulting automaton")
                .arg(Arg::new("nfa").required(true))
                .arg(Arg::new("dfa").required(true)),
        )
        .subcommand(
            Command::new("minimize")
                .about("determinizes and minimizes the automaton and writes the result")
                .arg(Arg::new("nfa").required(true))
                .arg(Arg::new("minimized").required(true))
                .arg(
                    Arg::new("canonical")
                        .long("canonical")
                        .action(ArgAction::SetTrue)
                        .help("compare successor classes instead of successor states"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("prints the transition table of the automaton")
                .arg(Arg::new("automaton").required(true)),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Word(#[from] WordParseError),
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
    #[error("could not write automaton: {0}")]
    Io(#[from] std::io::Error),
}

fn path<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .expect("required arguments are enforced by clap")
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    match matches.subcommand() {
        Some(("simulate", sub)) => {
            let aut = Automaton::from_file(path(sub, "automaton"))?;
            let word = Word::try_from_str(path(sub, "input"))?;
            let strategy = if sub.get_flag("frontier") {
                Simulation::Frontier
            } else {
                Simulation::Branching
            };
            debug!("simulating {strategy:?} on word {word:?}");

            let start = std::time::Instant::now();
            let accepted = aut.accepts_with(&word, strategy);
            info!("simulation took {}µs", start.elapsed().as_micros());
            println!("{accepted}");
        }
        Some(("determinize", sub)) => {
            let nfa = Automaton::from_file(path(sub, "nfa"))?;
            debug!("read automaton with {} states", nfa.size());

            let start = std::time::Instant::now();
            let construction = nfa.subset_construction();
            info!(
                "subset construction produced {} states in {}µs",
                construction.dfa().size(),
                start.elapsed().as_micros()
            );
            trace!("{construction:?}");
            construction.dfa().to_file(path(sub, "dfa"))?;
        }
        Some(("minimize", sub)) => {
            let nfa = Automaton::from_file(path(sub, "nfa"))?;
            debug!("read automaton with {} states", nfa.size());

            let start = std::time::Instant::now();
            let dfa = nfa.determinize();
            info!(
                "subset construction produced {} states in {}µs",
                dfa.size(),
                start.elapsed().as_micros()
            );

            let start = std::time::Instant::now();
            let minimized = if sub.get_flag("canonical") {
                dfa.minimize_canonical()?
            } else {
                dfa.minimize()?
            };
            info!(
                "minimization produced {} states in {}µs",
                minimized.size(),
                start.elapsed().as_micros()
            );
            minimized.to_file(path(sub, "minimized"))?;
        }
        Some(("show", sub)) => {
            let aut = Automaton::from_file(path(sub, "automaton"))?;
            println!("{aut:?}");
        }
        _ => unreachable!(),
    }
    Ok(())
}

pub fn main() {
    let matches = cli().get_matches();

    setup_logging(&matches);

    if let Err(e) = run(&matches) {
        error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_subcommands() {
        let matches = cli()
            .try_get_matches_from(["fa", "-v=debug", "simulate", "aut.txt", "10000", "--frontier"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "simulate");
        assert_eq!(path(sub, "input"), "10000");
        assert!(sub.get_flag("frontier"));

        let matches = cli()
            .try_get_matches_from(["fa", "minimize", "nfa.txt", "min.txt", "--canonical"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(sub.get_flag("canonical"));

        assert!(cli().try_get_matches_from(["fa", "determinize", "nfa.txt"]).is_err());
    }
}
