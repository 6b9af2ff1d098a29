//! Command-line interface for the precompiler
//!
//! Usage:
//!   precompiler --src-file `<file>` --output-file `<file>` [--include-path `<dir>`...]
//!               [--pipeline `<name>`] [--config `<file>`] [--line-length `<n>`]
//!               [--report `<file>`] [-v...]
//!   precompiler --list-pipelines

use clap::{Arg, ArgAction, ArgMatches, Command};
use precompiler::precompiler::error::SettingsError;
use precompiler::precompiler::merging::SearchPaths;
use precompiler::precompiler::pipeline::{PipelineExecutor, PipelineRegistry};
use precompiler::precompiler::settings::{Loader, Settings};
use std::path::PathBuf;

fn main() {
    let matches = Command::new("precompiler")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Merges a C/C++ translation unit and applies instrumentation rewrites")
        .arg_required_else_help(true)
        .arg(
            Arg::new("include-path")
                .long("include-path")
                .help("Include search directories, probed in order")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("src-file")
                .long("src-file")
                .help("Root source file to process")
                .required_unless_present("list-pipelines"),
        )
        .arg(
            Arg::new("output-file")
                .long("output-file")
                .help("Where to write the processed translation unit")
                .required_unless_present("list-pipelines"),
        )
        .arg(
            Arg::new("pipeline")
                .long("pipeline")
                .short('p')
                .help("Pipeline to run (e.g., 'full', 'source-under-test')")
                .default_value("full"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in settings and ./precompiler.toml"),
        )
        .arg(
            Arg::new("line-length")
                .long("line-length")
                .help("Width used for doc-comment wrapping and separator rules")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Also write a JSON merge report to this file"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Trace include resolution (-vv for stage details)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("list-pipelines")
                .long("list-pipelines")
                .help("List available pipelines")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    if matches.get_flag("list-pipelines") {
        handle_list_pipelines_command();
        return;
    }

    let settings = load_settings(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    handle_run_command(&matches, settings);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Settings file picked up from the working directory when present
const LOCAL_SETTINGS: &str = "precompiler.toml";

fn load_settings(matches: &ArgMatches) -> Result<Settings, SettingsError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_SETTINGS);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(&length) = matches.get_one::<u32>("line-length") {
        loader = loader.set_override("doc_log.line_length", i64::from(length))?;
    }
    loader.build()
}

/// Merge, rewrite and write one translation unit
fn handle_run_command(matches: &ArgMatches, settings: Settings) {
    let src_file = matches
        .get_one::<String>("src-file")
        .map(PathBuf::from)
        .expect("src-file is required unless listing pipelines");
    let output_file = matches
        .get_one::<String>("output-file")
        .map(PathBuf::from)
        .expect("output-file is required unless listing pipelines");
    let pipeline = matches.get_one::<String>("pipeline").unwrap();
    let report = matches.get_one::<String>("report").map(PathBuf::from);
    let include_paths: Vec<String> = matches
        .get_many::<String>("include-path")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let search = SearchPaths::from_cwd(include_paths).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    for dir in search.dirs() {
        log::info!("include path: {}", dir.display());
    }

    let executor = PipelineExecutor::with_settings(settings);
    if let Err(e) = executor.execute_to_file(
        pipeline,
        &src_file,
        &search,
        &output_file,
        report.as_deref(),
    ) {
        eprintln!("Error: {}", e);
        if executor.registry().get(pipeline).is_none() {
            eprintln!("\nAvailable pipelines:");
            for spec in executor.registry().list_all() {
                eprintln!("  {} - {}", spec.name, spec.description);
            }
        }
        std::process::exit(1);
    }
}

/// Handle the list-pipelines command
fn handle_list_pipelines_command() {
    println!("Available pipelines:\n");
    for spec in PipelineRegistry::with_defaults().list_all() {
        let stages: Vec<String> = spec.stages.iter().map(ToString::to_string).collect();
        println!("  {}", spec.name);
        println!("    {}", spec.description);
        println!("    stages: merge, {}", stages.join(", "));
        if !spec.aliases.is_empty() {
            println!("    aliases: {}", spec.aliases.join(", "));
        }
        println!();
    }
}
