//! Terminal rendering of controller snapshots.

use chrono::{Datelike, NaiveDate};
use colored::{ColoredString, Colorize};
use slotwatch_application::ControllerSnapshot;
use slotwatch_core::query::catalog;
use slotwatch_core::{AppointmentQuery, DateKey, Phase, ScanOutcome, TargetMonth};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const GRID_WIDTH: usize = 27;

/// Sunday-first month grid.
///
/// Cells are marked `*` for newly found dates and `+` for available ones, so
/// the grid still reads without color. Today is underlined.
pub fn calendar(snapshot: &ControllerSnapshot, today: NaiveDate) -> String {
    let month = snapshot.month;
    let title = format!("{} {}", month.name(), month.year());

    let mut lines = vec![
        format!("{:^width$}", title, width = GRID_WIDTH).trim_end().bold().to_string(),
        WEEKDAYS.join(" ").bright_black().to_string(),
    ];

    let offset = month.first_weekday().num_days_from_sunday() as usize;
    let mut cells = vec!["   ".to_string(); offset];
    cells.extend(month.dates().iter().map(|date| cell(date, snapshot, today)));

    for week in cells.chunks(7) {
        lines.push(week.join(" ").trim_end().to_string());
    }
    lines.push(legend());
    lines.join("\n")
}

fn cell(date: &DateKey, snapshot: &ControllerSnapshot, today: NaiveDate) -> String {
    let day = date.to_date().day();
    let is_new = snapshot.is_highlighted(date);
    let is_available = snapshot.is_available(date);

    let marker = if is_new {
        '*'
    } else if is_available {
        '+'
    } else {
        ' '
    };
    let text = format!("{day:>2}{marker}");

    let mut styled: ColoredString = if is_new {
        text.black().on_bright_green().bold()
    } else if is_available {
        text.green().bold()
    } else {
        text.normal()
    };
    if date.to_date() == today {
        styled = styled.underline();
    }
    styled.to_string()
}

fn legend() -> String {
    format!(
        "{}  {}",
        "+ available".green(),
        "* newly found".bright_green().bold()
    )
}

/// The status line, colored by outcome.
pub fn status_line(snapshot: &ControllerSnapshot) -> String {
    let text = snapshot.status_text.as_str();
    let styled = match (&snapshot.outcome, snapshot.phase) {
        (outcome, _) if outcome.is_new_dates() => text.bright_green().bold(),
        (_, phase) if phase.is_busy() => format!("… {text}").bright_blue(),
        (ScanOutcome::Failed, _) => text.red(),
        (ScanOutcome::NoResults, _) => text.yellow(),
        _ => text.bright_blue(),
    };
    styled.to_string()
}

/// One line describing what is being searched.
pub fn context_line(query: &AppointmentQuery, month: TargetMonth, phase: Phase) -> String {
    let alerts = if phase.is_alerting() {
        "alerts on".bright_green().to_string()
    } else {
        "alerts off".bright_black().to_string()
    };
    format!(
        "{} · {} · {} {} · {}",
        query.consulate.bold(),
        query.visa_type,
        month.name(),
        month.year(),
        alerts
    )
}

/// Announcement for dates found by an alert scan.
pub fn alert_card(dates: &[DateKey]) -> String {
    let mut lines = vec!["🎉 New appointment found!".bright_green().bold().to_string()];
    for date in dates {
        let pretty = date.to_date().format("%A, %B %-d, %Y").to_string();
        lines.push(format!("   • {}", pretty.green()));
    }
    lines.join("\n")
}

/// The location catalog with the current selection marked.
pub fn locations(query: &AppointmentQuery) -> String {
    let mut lines = vec!["Countries and consulates:".bold().to_string()];
    for country in catalog::COUNTRIES {
        let selected_country = country.name.eq_ignore_ascii_case(&query.country);
        let header = if selected_country {
            format!("› {}", country.name).bright_cyan().bold().to_string()
        } else {
            format!("  {}", country.name)
        };
        lines.push(header);
        for consulate in country.consulates {
            let mark = if selected_country && consulate.value == query.consulate {
                "›"
            } else {
                " "
            };
            lines.push(format!("    {mark} {}", consulate.name));
        }
    }

    lines.push("Visa types:".bold().to_string());
    for visa in catalog::VISA_TYPES {
        let mark = if *visa == query.visa_type { "›" } else { " " };
        lines.push(format!("  {mark} {visa}"));
    }
    lines.join("\n")
}

pub fn help() -> String {
    let mut lines = vec!["Commands:".bold().to_string()];
    for (name, description) in crate::command::COMMANDS {
        lines.push(format!("  {:<12} {}", name.bright_cyan(), description));
    }
    lines.join("\n")
}
