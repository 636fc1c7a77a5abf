//! Clap command tree for the `callorder` binary.

use clap::{Arg, ArgAction, Command};

/// Build the top-level command.
pub fn build_cli() -> Command {
    Command::new("callorder")
        .about("Switch call-order recording on and off and inspect recorded logs")
        .subcommand_required(true)
        .arg(
            Arg::new("base")
                .long("base")
                .short('b')
                .global(true)
                .help("Workspace directory holding the log directory"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .conflicts_with("base")
                .help("Recording configuration file (TOML)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace)"),
        )
        .subcommand(Command::new("enable").about("Create the log directory and marker file"))
        .subcommand(Command::new("disable").about("Remove the marker file, keeping entries"))
        .subcommand(Command::new("status").about("Show whether recording is on"))
        .subcommand(Command::new("list").about("List recorded method names in order"))
        .subcommand(
            Command::new("show")
                .about("Print one decoded entry")
                .arg(Arg::new("sequence").required(true).help("Entry sequence number")),
        )
        .subcommand(Command::new("clear").about("Delete every recorded entry"))
        .subcommand(
            Command::new("verify")
                .about("Compare the recorded order against an expected one")
                .arg(
                    Arg::new("expected")
                        .num_args(0..)
                        .action(ArgAction::Append)
                        .help("Expected qualified method names, in order"),
                ),
        )
}
