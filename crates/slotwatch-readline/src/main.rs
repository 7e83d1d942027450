mod command;
mod helper;
mod render;

use std::sync::{Arc, RwLock};

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use slotwatch_application::{AppContext, ControllerEvent, PollingController};
use slotwatch_core::query::catalog;
use slotwatch_core::{ScanKind, TargetMonth};
use slotwatch_infrastructure::SlotwatchPaths;

use crate::command::{ReplCommand, parse_command};
use crate::helper::CliHelper;

/// Logs go to a daily file under the logs directory so the prompt stays clean.
fn init_logging(paths: &SlotwatchPaths) -> Result<WorkerGuard> {
    let logs_dir = paths.logs_dir()?;
    std::fs::create_dir_all(&logs_dir)?;

    let appender = tracing_appender::rolling::daily(&logs_dir, "slotwatch-readline.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slotwatch=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

async fn print_calendar(controller: &PollingController) {
    let snapshot = controller.snapshot().await;
    println!("{}", render::calendar(&snapshot, today()));
    println!("{}", render::status_line(&snapshot));
}

/// Prints controller events as they arrive.
async fn print_events(
    controller: Arc<PollingController>,
    mut events: mpsc::UnboundedReceiver<ControllerEvent>,
) {
    while let Some(event) = events.recv().await {
        match event {
            ControllerEvent::ScanStarted {
                kind: ScanKind::Initial,
            } => {
                let snapshot = controller.snapshot().await;
                println!("{}", render::status_line(&snapshot));
            }
            ControllerEvent::ScanFinished {
                kind: ScanKind::Initial,
                ..
            } => print_calendar(&controller).await,
            ControllerEvent::NewDatesFound { dates } => {
                println!();
                println!("{}", render::alert_card(&dates));
                print_calendar(&controller).await;
            }
            ControllerEvent::HighlightsExpired { dates } => {
                let list = dates
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{}", format!("No longer new: {list}").bright_black());
            }
            ControllerEvent::AlertingEnabled { .. } | ControllerEvent::AlertingDisabled => {
                let snapshot = controller.snapshot().await;
                println!("{}", render::status_line(&snapshot));
            }
            ControllerEvent::ContextChanged { query, month } => {
                println!(
                    "{}",
                    render::context_line(&query, month, controller.phase().await)
                );
            }
            ControllerEvent::ScanStarted { .. } | ControllerEvent::ScanFinished { .. } => {}
        }
    }
}

/// Runs a one-shot search in the background; results arrive as events.
fn spawn_search(controller: &Arc<PollingController>) {
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        controller.start_one_shot().await;
    });
}

async fn go_to_month(controller: &Arc<PollingController>, month: TargetMonth) {
    controller.change_month(month).await;
    spawn_search(controller);
}

/// Executes one command. Returns `false` when the REPL should exit.
async fn handle_command(
    command: ReplCommand,
    controller: &Arc<PollingController>,
    country: &Arc<RwLock<String>>,
) -> bool {
    match command {
        ReplCommand::Find => spawn_search(controller),
        ReplCommand::Alert(true) => {
            if let Err(e) = controller.enable_alerting().await {
                tracing::debug!("Enable alerts rejected: {}", e);
                println!(
                    "{}",
                    "A search is still running. Enable alerts once it finishes.".yellow()
                );
            }
        }
        ReplCommand::Alert(false) => {
            if !controller.disable_alerting().await {
                println!("{}", "Alerts are already off.".bright_black());
            }
        }
        ReplCommand::Next => {
            let month = controller.month().await.next();
            go_to_month(controller, month).await;
        }
        ReplCommand::Prev => {
            let month = controller.month().await.prev();
            go_to_month(controller, month).await;
        }
        ReplCommand::Month(month) => go_to_month(controller, month).await,
        ReplCommand::Country(name) => match catalog::find_country(&name) {
            Some(found) => {
                let query = controller.query().await.with_country(found.name);
                controller.change_query(query).await;
                if let Ok(mut current) = country.write() {
                    *current = found.name.to_string();
                }
            }
            None => {
                let known = catalog::COUNTRIES
                    .iter()
                    .map(|c| c.name)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{}", format!("Unknown country '{name}'. Choose one of: {known}").red());
            }
        },
        ReplCommand::Consulate(name) => {
            let query = controller.query().await;
            match catalog::find_consulate(&query.country, &name) {
                Some(found) => {
                    controller.change_query(query.with_consulate(found.value)).await;
                }
                None => {
                    let known = catalog::consulates(&query.country)
                        .iter()
                        .map(|c| c.name)
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!(
                        "{}",
                        format!("No consulate '{name}' in {}. Choose one of: {known}", query.country)
                            .red()
                    );
                }
            }
        }
        ReplCommand::Visa(name) => match catalog::find_visa_type(&name) {
            Some(visa) => {
                let query = controller.query().await.with_visa_type(visa);
                controller.change_query(query).await;
            }
            None => {
                println!(
                    "{}",
                    format!(
                        "Unknown visa type '{name}'. Choose one of: {}",
                        catalog::VISA_TYPES.join(", ")
                    )
                    .red()
                );
            }
        },
        ReplCommand::Locations => {
            println!("{}", render::locations(&controller.query().await));
        }
        ReplCommand::Show => print_calendar(controller).await,
        ReplCommand::Status => {
            let snapshot = controller.snapshot().await;
            println!(
                "{}",
                render::context_line(&snapshot.query, snapshot.month, snapshot.phase)
            );
            println!("{}", render::status_line(&snapshot));
        }
        ReplCommand::Help => println!("{}", render::help()),
        ReplCommand::Quit => return false,
    }
    true
}

/// Entry point for the Slotwatch REPL.
///
/// Loads configuration and credentials, builds one polling controller for
/// the configured location and the current month, then reads slash commands
/// until `/quit`. Controller events are printed by a background task.
#[tokio::main]
async fn main() -> Result<()> {
    let paths = SlotwatchPaths::new(None);
    let _log_guard = init_logging(&paths)?;

    let context = match AppContext::load(paths).await {
        Ok(context) => context,
        Err(e) => {
            eprintln!("{}", format!("{e:#}").red());
            return Err(e);
        }
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let query = context.default_query();
    let controller = Arc::new(context.controller(
        query.clone(),
        TargetMonth::current(),
        Some(event_tx),
    ));
    let printer = tokio::spawn(print_events(Arc::clone(&controller), event_rx));

    let helper = CliHelper::new(query.country.clone());
    let country = helper.country_handle();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Slotwatch ===".bright_magenta().bold());
    println!(
        "{}",
        render::context_line(&query, controller.month().await, controller.phase().await)
    );
    println!(
        "{}",
        "Type '/find' to search, '/alert on' for real-time alerts, '/help' for all commands."
            .bright_black()
    );
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if !handle_command(command, &controller, &country).await {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    controller.shutdown().await;
    printer.abort();
    tracing::info!("REPL exited");

    Ok(())
}
