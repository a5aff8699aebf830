use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;

use clap::{App, AppSettings, Arg, ArgMatches};
use thiserror::Error;
use tracing::Level;

use genpoints::format::format_g;
use genpoints::optimize::{optimize, SearchConfig};
use genpoints::plot::write_scatter_png;
use genpoints::sequence::MAX_DIMENSION;
use genpoints::stats::{measure_scramble, print_stats, write_stats_image};
use genpoints::{generate_points, Error, GenRequest, Sequence};

const PLOT_RESOLUTION: usize = 512;
const DEFAULT_BIAS_ROUNDS: u32 = 1 << 16;
const DEFAULT_SEARCH_ROUNDS: u32 = 1 << 14;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Gen(#[from] Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() {
    let sequences = sequence_list();
    let args = App::new("genpoints")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates low-discrepancy sample sequences with Owen scrambling")
        .setting(AppSettings::AllowNegativeNumbers)
        .after_help(sequences.as_str())
        .arg(
            Arg::with_name("seq")
                .help("The sequence to generate")
                .index(1),
        )
        .arg(
            Arg::with_name("count")
                .help("Number of samples [default: 16]")
                .index(2),
        )
        .arg(
            Arg::with_name("dim")
                .help("Dimension, 0 through 4 [default: 0]")
                .index(3),
        )
        .arg(
            Arg::with_name("seed")
                .help("Seed [default: 1]")
                .index(4),
        )
        .arg(
            Arg::with_name("strict")
                .long("strict")
                .help("Reject a negative count or out-of-range dimension instead of clamping"),
        )
        .arg(
            Arg::with_name("plot")
                .long("plot")
                .value_name("FILE")
                .takes_value(true)
                .help("Also write a PNG scatter plot of this dimension and the next"),
        )
        .arg(
            Arg::with_name("bias")
                .long("bias")
                .help("Measure the avalanche bias of the sequence's scramble instead"),
        )
        .arg(
            Arg::with_name("bias_image")
                .long("bias-image")
                .value_name("FILE")
                .takes_value(true)
                .requires("bias")
                .help("Write the measured bias matrices as a PNG"),
        )
        .arg(
            Arg::with_name("rounds")
                .long("rounds")
                .value_name("N")
                .takes_value(true)
                .help("Bias measurement rounds [default: 65536, or 16384 per candidate with --optimize]"),
        )
        .arg(
            Arg::with_name("optimize")
                .long("optimize")
                .conflicts_with("bias")
                .help("Search for better constants for the sequence's scramble instead"),
        )
        .arg(
            Arg::with_name("iterations")
                .long("iterations")
                .value_name("N")
                .takes_value(true)
                .requires("optimize")
                .help("Candidate op lists to try [default: 64]"),
        )
        .arg(
            Arg::with_name("candidates")
                .long("candidates")
                .value_name("N")
                .takes_value(true)
                .requires("optimize")
                .help("Best op lists to keep and print [default: 8]"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more (repeat for more detail)"),
        )
        .get_matches();

    init_tracing(args.occurrences_of("verbose"));

    let seq_name = match args.value_of("seq") {
        Some(name) => name,
        None => {
            print!("{}", usage());
            process::exit(1);
        }
    };

    match run(seq_name, &args) {
        Ok(()) => {}
        Err(CliError::Gen(err @ Error::UnknownSequence(_))) => {
            // Fatal at the command line.
            eprintln!("{}", err);
            process::abort();
        }
        Err(CliError::Gen(err)) => {
            eprintln!("genpoints: {}", err);
            eprint!("{}", usage());
            process::exit(1);
        }
        Err(CliError::Io(err)) => {
            eprintln!("genpoints: {}", err);
            process::exit(2);
        }
    }
}

fn run(seq_name: &str, args: &ArgMatches) -> Result<(), CliError> {
    let sequence: Sequence = seq_name.parse()?;
    let count = parse_int(args, "count", 16)?;
    let dim = parse_int(args, "dim", 0)?;
    // Like a C `int` converted to `uint32_t`.
    let seed = parse_int(args, "seed", 1)? as u32;

    let request = if args.is_present("strict") {
        GenRequest::strict(sequence, count, dim, seed)?
    } else {
        let request = GenRequest::clamped(sequence, count, dim, seed);
        if request.count as i64 != count || request.dimension as i64 != dim {
            tracing::info!(
                count = request.count,
                dim = request.dimension,
                "out-of-range arguments were clamped"
            );
        }
        request
    };

    if args.is_present("bias") {
        return run_bias(&request, args);
    }
    if args.is_present("optimize") {
        return run_optimize(&request, args);
    }

    let points = request.generate()?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for x in points.iter() {
        writeln!(out, "{}", format_g(*x as f64))?;
    }
    out.flush()?;

    if let Some(path) = args.value_of("plot") {
        let other_dim = (request.dimension + 1) % (MAX_DIMENSION + 1);
        let ys = generate_points(request.sequence, request.count, other_dim, request.seed)?;
        let xy: Vec<(f32, f32)> = points.iter().copied().zip(ys.into_iter()).collect();
        write_scatter_png(&xy, PLOT_RESOLUTION, &mut File::create(path)?)?;
        tracing::info!(path, dims = ?(request.dimension, other_dim), "wrote plot");
    }

    Ok(())
}

fn run_bias(request: &GenRequest, args: &ArgMatches) -> Result<(), CliError> {
    let scramble = request
        .sequence
        .scramble()
        .ok_or(Error::NoScramble(request.sequence))?;
    let rounds = parse_count(args, "rounds", DEFAULT_BIAS_ROUNDS)?;

    let stats = measure_scramble(scramble, rounds, request.seed as u64);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Scramble: {}", scramble)?;
    print_stats(&stats, &mut out)?;

    if let Some(path) = args.value_of("bias_image") {
        write_stats_image(&stats, &mut File::create(path)?)?;
        tracing::info!(path, "wrote bias image");
    }

    Ok(())
}

fn run_optimize(request: &GenRequest, args: &ArgMatches) -> Result<(), CliError> {
    let scramble = request
        .sequence
        .scramble()
        .ok_or(Error::NoScramble(request.sequence))?;
    let start = scramble.hash_ops().ok_or(Error::NotAnOpList(scramble))?;
    let config = SearchConfig {
        rounds: parse_count(args, "iterations", 64)? as usize,
        candidates: parse_count(args, "candidates", 8)? as usize,
        stat_rounds: parse_count(args, "rounds", DEFAULT_SEARCH_ROUNDS)?,
        seed: request.seed as u64,
    };
    tracing::info!(%scramble, ?config, "searching for constants");

    let candidates = optimize(start, &config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for candidate in candidates.iter() {
        writeln!(out, "Score: {:.6}", candidate.score)?;
        let ops: Vec<String> = candidate.ops.iter().map(|op| op.to_string()).collect();
        writeln!(out, "&[{}]", ops.join(", "))?;
        print_stats(&candidate.stats, &mut out)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Parses an optional non-negative count.
fn parse_count(args: &ArgMatches, name: &'static str, default: u32) -> Result<u32, Error> {
    match args.value_of(name) {
        None => Ok(default),
        Some(text) => text.trim().parse().map_err(|_| Error::InvalidNumber {
            name,
            value: text.to_string(),
        }),
    }
}

/// Parses an optional integer argument.
fn parse_int(args: &ArgMatches, name: &'static str, default: i64) -> Result<i64, Error> {
    match args.value_of(name) {
        None => Ok(default),
        Some(text) => text.trim().parse().map_err(|_| Error::InvalidNumber {
            name,
            value: text.to_string(),
        }),
    }
}

fn sequence_list() -> String {
    let mut text = String::from("seq is one of:\n");
    for seq in Sequence::ALL.iter() {
        text.push_str("   ");
        text.push_str(seq.name());
        text.push('\n');
    }
    text
}

fn usage() -> String {
    format!(
        "Usage: genpoints [seq] [N=16] [dim=0] [seed=1]\n{}",
        sequence_list()
    )
}

fn init_tracing(verbosity: u64) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}
