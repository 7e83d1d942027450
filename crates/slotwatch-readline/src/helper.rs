use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::{Arc, RwLock};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use slotwatch_core::query::catalog;

use crate::command::COMMANDS;

/// rustyline helper: slash-command completion, hints and highlighting.
///
/// Arguments of `/country`, `/consulate`, `/visa` and `/alert` complete from
/// the location catalog; consulates follow the currently selected country.
#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
    country: Arc<RwLock<String>>,
}

impl CliHelper {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            commands: COMMANDS.iter().map(|(name, _)| name.to_string()).collect(),
            country: Arc::new(RwLock::new(country.into())),
        }
    }

    /// Shared handle the REPL updates when the country changes.
    pub fn country_handle(&self) -> Arc<RwLock<String>> {
        Arc::clone(&self.country)
    }

    fn argument_candidates(&self, command: &str) -> Vec<String> {
        match command {
            "/alert" => vec!["on".to_string(), "off".to_string()],
            "/country" => catalog::COUNTRIES
                .iter()
                .map(|c| c.name.to_string())
                .collect(),
            "/consulate" => {
                let country = self
                    .country
                    .read()
                    .map(|c| c.clone())
                    .unwrap_or_default();
                catalog::consulates(&country)
                    .iter()
                    .map(|c| c.name.to_string())
                    .collect()
            }
            "/visa" => catalog::VISA_TYPES.iter().map(|v| v.to_string()).collect(),
            _ => Vec::new(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        match line.split_once(' ') {
            None => {
                let candidates = self
                    .commands
                    .iter()
                    .filter(|cmd| cmd.starts_with(line))
                    .map(|cmd| Pair {
                        display: cmd.clone(),
                        replacement: cmd.clone(),
                    })
                    .collect();
                Ok((0, candidates))
            }
            Some((command, partial)) => {
                let start = command.len() + 1;
                let partial = partial.to_ascii_lowercase();
                let candidates = self
                    .argument_candidates(command)
                    .into_iter()
                    .filter(|arg| arg.to_ascii_lowercase().starts_with(&partial))
                    .map(|arg| Pair {
                        display: arg.clone(),
                        replacement: arg,
                    })
                    .collect();
                Ok((start, candidates))
            }
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}
