// Enable warnings for all clippy lints.
#![warn(
    clippy::correctness,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::pedantic,
    clippy::cargo,
    clippy::restriction
)]
// Selectively disable warnings for some lints.
#![allow(
    clippy::indexing_slicing, // Allow `vec[i]` indexing.
    clippy::module_name_repetitions,  // Allow name repetitions in module and type names.
    clippy::use_debug, // Debug formatting is useful.
    clippy::float_arithmetic, // Needed.
    clippy::integer_arithmetic, // Needed.
    clippy::integer_division, // Needed.
    clippy::multiple_crate_versions, // Beyond our control.
    clippy::missing_docs_in_private_items, // Disabled.
    clippy::missing_inline_in_public_items, // Not considered for now.
    clippy::implicit_return, // Allow.
    clippy::use_self, // Too pedantic.
    clippy::shadow_same,
    clippy::result_expect_used,
    clippy::unknown_clippy_lints
)]
// Mark some lints as errors.
#![deny(clippy::print_stdout)]

use clap::{arg_enum, value_t, App, Arg, ArgMatches};
use itertools::Itertools;
use log::{info, Level};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use vcpart::config::{HdrfConfig, StateKind};
use vcpart::error::VcError;
use vcpart::graph::loader::{load_edge_list, LoadOptions, DEFAULT_SEPARATOR};
use vcpart::partitioning::driver::Partitioner;
use vcpart::partitioning::output::{check_partitions_writable, write_partitions, write_stats};
use vcpart::util::logger::init_logger_with_level;
use vcpart::util::memory_usage::log_memory_usage;
use vcpart::util::timer::VcTimer;

arg_enum! {
    #[derive(PartialEq, Debug)]
    pub enum LogLevel {
        Error,
        Warn,
        Info,
        Debug,
        Trace,
    }
}

arg_enum! {
    #[derive(PartialEq, Debug)]
    pub enum StateArg {
        Basic,
        Coordinated,
    }
}

fn main() -> Result<(), VcError> {
    // Parse command line arguments.
    let matches = App::new("vcpart")
        .about("Streaming vertex-cut partitioning of edge lists with HDRF")
        .arg(
            Arg::from_usage("-l, --loglevel=[LEVEL] 'Set the log level'")
                .possible_values(&LogLevel::variants())
                .case_insensitive(true),
        )
        .arg(
            Arg::from_usage("--state=[STATE] 'Shared partition state to use'")
                .possible_values(&StateArg::variants())
                .case_insensitive(true),
        )
        .args_from_usage(
            "-p, --partitions=<P> 'Number of partitions'
            --lambda=[LAMBDA] 'Weight of the balance term'
            --epsilon=[EPSILON] 'Smoothing of the balance term'
            --retry-limit=[MICROS] 'Lock wait ceiling in microseconds'
            -t, --threads=[THREADS] 'Number of worker threads'
            --seed=[SEED] 'Seed for the worker random generators'
            -s, --separator=[CHAR] 'Column separator of the edge file'
            -c, --comment=[CHAR] 'Lines starting with this character are skipped'
            --has-headers 'The edge file has a header line'
            --randomize 'Shuffle the edges before partitioning'
            -o, --output-dir=[DIR] 'Write one edge list file per partition into this directory'
            --stats-file=[FILE] 'Write the partitioning stats as csv into this file'
            <edge_file> 'Edge list file with one source and target per line'",
        )
        .get_matches();

    setup_logger(&matches)?;

    let config = parse_config(&matches)?;
    if matches.is_present("output-dir") {
        check_partitions_writable(&config)?;
    }
    let separator = parse_char(&matches, "separator")?;
    let comment_char = parse_char(&matches, "comment")?;
    let options = LoadOptions::new(separator, comment_char, matches.is_present("has-headers"));

    let edge_file = matches
        .value_of("edge_file")
        .ok_or_else(|| VcError::Config("Edge file is required".to_owned()))?;
    let mut graph = load_edge_list(edge_file, &options)?;

    if matches.is_present("randomize") {
        let timer = VcTimer::now();
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        graph.randomize_edges(&mut rng);
        info!("Shuffled {} edges in {}", graph.edges_count(), timer.elapsed().to_seconds_string());
    }
    log_memory_usage(format_args!("edges loaded"));

    let partitioner = Partitioner::new(config)?;
    let output = partitioner.partition(graph.edges())?;
    log_memory_usage(format_args!("edges partitioned"));

    let state = output.state.as_state();
    info!("Edge loads: [{}]", state.machine_loads().iter().join(", "));
    if let Some(tracker) = state.vertex_load_tracking() {
        info!(
            "Vertex loads: [{}]",
            (0..state.num_partitions()).map(|p| tracker.machine_load_vertices(p)).join(", ")
        );
    }
    info!("Lock retries: {}", output.lock_retries);

    if let Some(output_dir) = matches.value_of("output-dir") {
        let coordinated = output.state.as_coordinated().ok_or_else(|| {
            VcError::Config("Writing partitions needs the coordinated state".to_owned())
        })?;
        write_partitions(&graph, coordinated, output_dir, separator.unwrap_or(DEFAULT_SEPARATOR))?;
    }
    if let Some(stats_file) = matches.value_of("stats-file") {
        write_stats(&output.stats, stats_file)?;
    }

    Ok(())
}

fn parse_config(matches: &ArgMatches) -> Result<HdrfConfig, VcError> {
    let num_partitions = value_t!(matches, "partitions", usize)
        .map_err(|e| VcError::Config(format!("Invalid number of partitions: {}", e)))?;
    let mut config = HdrfConfig::with_partitions(num_partitions);
    if matches.is_present("lambda") {
        config.lambda = value_t!(matches, "lambda", f64)
            .map_err(|e| VcError::Config(format!("Invalid lambda: {}", e)))?;
    }
    if matches.is_present("epsilon") {
        config.epsilon = value_t!(matches, "epsilon", f64)
            .map_err(|e| VcError::Config(format!("Invalid epsilon: {}", e)))?;
    }
    if matches.is_present("retry-limit") {
        config.retry_limit_micros = value_t!(matches, "retry-limit", u64)
            .map_err(|e| VcError::Config(format!("Invalid retry limit: {}", e)))?;
    }
    if matches.is_present("threads") {
        config.threads = value_t!(matches, "threads", usize)
            .map_err(|e| VcError::Config(format!("Invalid number of threads: {}", e)))?;
    }
    if matches.is_present("seed") {
        config.seed = Some(
            value_t!(matches, "seed", u64)
                .map_err(|e| VcError::Config(format!("Invalid seed: {}", e)))?,
        );
    }
    config.state_kind = match value_t!(matches, "state", StateArg).unwrap_or(StateArg::Coordinated)
    {
        StateArg::Basic => StateKind::Basic,
        StateArg::Coordinated => StateKind::Coordinated,
    };
    Ok(config)
}

fn parse_char(matches: &ArgMatches, name: &str) -> Result<Option<u8>, VcError> {
    match matches.value_of(name) {
        None => Ok(None),
        Some("\\t") => Ok(Some(b'\t')),
        Some(value) if value.len() == 1 => Ok(value.bytes().next()),
        Some(value) => Err(VcError::Config(format!(
            "Expected a single character for '{}', found '{}'",
            name, value
        ))),
    }
}

fn setup_logger(matches: &ArgMatches) -> Result<(), VcError> {
    // Set log level.
    let log_level = match value_t!(matches, "loglevel", LogLevel).unwrap_or(LogLevel::Info) {
        LogLevel::Error => Level::Error,
        LogLevel::Warn => Level::Warn,
        LogLevel::Info => Level::Info,
        LogLevel::Debug => Level::Debug,
        LogLevel::Trace => Level::Trace,
    };
    init_logger_with_level(log_level)
}
