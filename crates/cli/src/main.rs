//! callorder CLI: control a call-order log directory from the shell.
//!
//! - `callorder enable` / `disable`: create or remove the marker file
//! - `callorder list` / `show N`: inspect recorded entries
//! - `callorder verify A.op B.op ...`: exit 1 unless the log has exactly that order

mod commands;
mod parse;

use std::process;

use callorder::{CallLog, DirectorySink, RecordingConfig, Sink, SinkOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use parse::{matches_to_action, matches_to_location, verbosity_filter, CliAction, Location};

fn main() {
    let matches = build_cli().get_matches();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_filter(&matches)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(&matches) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn run(matches: &clap::ArgMatches) -> Result<(), String> {
    let action = matches_to_action(matches)?;
    let options = sink_options(matches_to_location(matches)).map_err(|e| e.to_string())?;
    execute(action, &options).map_err(|e| e.to_string())
}

fn sink_options(location: Location) -> callorder::Result<SinkOptions> {
    match location {
        Location::Base(base) => Ok(SinkOptions::new(base)),
        Location::Config(path) => Ok(RecordingConfig::from_file(&path)?.sink),
    }
}

fn execute(action: CliAction, options: &SinkOptions) -> callorder::Result<()> {
    let sink = DirectorySink::new(options.clone());
    match action {
        CliAction::Enable => {
            sink.enable()?;
            info!(dir = %sink.log_dir().display(), "recording enabled");
            println!("recording enabled in {}", sink.log_dir().display());
        }
        CliAction::Disable => {
            sink.disable()?;
            println!("recording disabled");
        }
        CliAction::Status => {
            let state = if sink.is_active() { "on" } else { "off" };
            println!("recording {} ({})", state, sink.log_dir().display());
            println!("{} entries", sink.entry_paths()?.len());
        }
        CliAction::List => {
            let log = CallLog::load(options)?;
            for (sequence, name) in log.method_names().iter().enumerate() {
                println!("{:>6}  {}", sequence, name);
            }
        }
        CliAction::Show { sequence } => {
            let path = options.entry_path(sequence);
            let text = std::fs::read_to_string(&path)?;
            let entry = callorder::decode_entry(&text)?;
            println!("{}", entry.method_name());
            for (name, value) in entry.arguments() {
                println!("  {} = {}", name, value);
            }
            if !entry.stack_trace().is_empty() {
                println!("stack:\n{}", entry.stack_trace());
            }
        }
        CliAction::Clear => {
            let removed = sink.clear()?;
            println!("removed {} entries", removed);
        }
        CliAction::Verify { expected } => {
            let log = CallLog::load(options)?;
            let expected: Vec<&str> = expected.iter().map(String::as_str).collect();
            log.assert_order(&expected)?;
            println!("{} calls in expected order", log.len());
        }
    }
    Ok(())
}
