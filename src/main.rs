//! cellgraph - run spreadsheet command scripts against a reactive cell store

mod config;
mod error;
mod script;

use anyhow::{Context, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::Config;
use script::Runner;

fn print_usage() {
    eprintln!("Usage: cellgraph [OPTIONS] [SCRIPT]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [SCRIPT]                  Command script to run (default: stdin)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <COMMAND>   Run a single command before the script (can be repeated)");
    eprintln!("      --config <FILE>       Read settings from FILE instead of the user config");
    eprintln!("      --no-config           Ignore config files");
    eprintln!("      --log-level <LEVEL>   Log filter when RUST_LOG is unset (default: warn)");
    eprintln!("      --dump                Print the whole sheet after all commands ran");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  set <ID> <TEXT...>        Set a cell (empty text clears it)");
    eprintln!("  delete <ID>               Clear a cell");
    eprintln!("  show <ID>                 Print a cell's value");
    eprintln!("  contents <ID>             Print a cell's raw contents");
    eprintln!("  dump                      Print every cell and the dependency links");
}

struct Args {
    script: Option<PathBuf>,
    commands: Vec<String>,
    config_file: Option<PathBuf>,
    no_config: bool,
    log_level: Option<String>,
    dump: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();

    let mut parsed = Args {
        script: None,
        commands: Vec::new(),
        config_file: None,
        no_config: false,
        log_level: None,
        dump: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a value");
                    std::process::exit(1);
                }
                parsed.commands.push(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                parsed.config_file = Some(PathBuf::from(&args[i]));
            }
            "--no-config" => parsed.no_config = true,
            "--log-level" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --log-level requires a value");
                    std::process::exit(1);
                }
                parsed.log_level = Some(args[i].to_string());
            }
            "--dump" => parsed.dump = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if parsed.script.is_none() {
                    parsed.script = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    parsed
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<usize> {
    let (config, warnings) = if args.no_config {
        (Config::default(), Vec::new())
    } else {
        config::load_config(args.config_file.as_deref())
    };

    init_logging(args.log_level.as_deref().unwrap_or(&config.log_level));
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut runner = Runner::new(io::stdout().lock(), io::stderr());

    for (idx, command) in args.commands.iter().enumerate() {
        runner.run_line(command, idx + 1)?;
    }

    if let Some(path) = &args.script {
        let file = File::open(path)
            .with_context(|| format!("Failed to open script {}", path.display()))?;
        runner
            .run_script(BufReader::new(file))
            .with_context(|| format!("Failed to run script {}", path.display()))?;
    } else if args.commands.is_empty() {
        runner.run_script(io::stdin().lock())?;
    }

    if args.dump || config.dump_on_exit {
        runner.dump()?;
    }
    runner.flush()?;

    Ok(runner.failures())
}

fn main() {
    let args = parse_args();
    match run(args) {
        Ok(0) => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
