//! ArgMatches → CliAction conversion.

use std::path::PathBuf;

use clap::ArgMatches;

/// What the user asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    Enable,
    Disable,
    Status,
    List,
    Show { sequence: u64 },
    Clear,
    Verify { expected: Vec<String> },
}

/// Where the log directory comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum Location {
    /// Workspace directory, default layout
    Base(PathBuf),
    /// Recording configuration file
    Config(PathBuf),
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "enable" => Ok(CliAction::Enable),
        "disable" => Ok(CliAction::Disable),
        "status" => Ok(CliAction::Status),
        "list" => Ok(CliAction::List),
        "clear" => Ok(CliAction::Clear),
        "show" => {
            let raw = sub_matches
                .get_one::<String>("sequence")
                .ok_or("Missing sequence number")?;
            let sequence = raw
                .parse::<u64>()
                .map_err(|e| format!("Invalid sequence number {}: {}", raw, e))?;
            Ok(CliAction::Show { sequence })
        }
        "verify" => {
            let expected = sub_matches
                .get_many::<String>("expected")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            Ok(CliAction::Verify { expected })
        }
        other => Err(format!("Unknown command: {}", other)),
    }
}

/// Log directory location; the current directory when neither flag is given.
pub fn matches_to_location(matches: &ArgMatches) -> Location {
    if let Some(config) = matches.get_one::<String>("config") {
        return Location::Config(PathBuf::from(config));
    }
    let base = matches
        .get_one::<String>("base")
        .map(|s| s.as_str())
        .unwrap_or(".");
    Location::Base(PathBuf::from(base))
}

/// Default log filter for the `-v` count
pub fn verbosity_filter(matches: &ArgMatches) -> &'static str {
    match matches.get_count("verbose") {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}
