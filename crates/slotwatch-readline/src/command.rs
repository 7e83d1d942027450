use slotwatch_core::{Result, SlotwatchError, TargetMonth};

/// Slash commands with their one-line help, in display order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/find", "Search the current month for available dates"),
    ("/alert", "Turn real-time alerts on or off (/alert on|off)"),
    ("/next", "Go to the next month and search it"),
    ("/prev", "Go to the previous month and search it"),
    ("/month", "Jump to a month and search it (/month YYYY-MM)"),
    ("/country", "Select a country (/country India)"),
    ("/consulate", "Select a consulate of the current country"),
    ("/visa", "Select a visa type (/visa H-1B)"),
    ("/locations", "List countries, consulates and visa types"),
    ("/show", "Show the calendar for the current month"),
    ("/status", "Show the current search and status line"),
    ("/help", "Show this help"),
    ("/quit", "Exit"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Find,
    Alert(bool),
    Next,
    Prev,
    Month(TargetMonth),
    Country(String),
    Consulate(String),
    Visa(String),
    Locations,
    Show,
    Status,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ReplCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line == "quit" || line == "exit" {
        return Ok(Some(ReplCommand::Quit));
    }

    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        "/find" | "/search" => ReplCommand::Find,
        "/alert" => match arg.to_ascii_lowercase().as_str() {
            "on" => ReplCommand::Alert(true),
            "off" => ReplCommand::Alert(false),
            _ => return Err(SlotwatchError::invalid_input("usage: /alert on|off")),
        },
        "/next" => ReplCommand::Next,
        "/prev" => ReplCommand::Prev,
        "/month" => ReplCommand::Month(arg.parse()?),
        "/country" => ReplCommand::Country(required(arg, "/country <name>")?),
        "/consulate" => ReplCommand::Consulate(required(arg, "/consulate <name>")?),
        "/visa" => ReplCommand::Visa(required(arg, "/visa <type>")?),
        "/locations" => ReplCommand::Locations,
        "/show" => ReplCommand::Show,
        "/status" => ReplCommand::Status,
        "/help" => ReplCommand::Help,
        "/quit" | "/exit" => ReplCommand::Quit,
        other => {
            return Err(SlotwatchError::invalid_input(format!(
                "Unknown command '{other}'. Type /help for the list."
            )));
        }
    };
    Ok(Some(command))
}

fn required(arg: &str, usage: &str) -> Result<String> {
    if arg.is_empty() {
        Err(SlotwatchError::invalid_input(format!("usage: {usage}")))
    } else {
        Ok(arg.to_string())
    }
}
