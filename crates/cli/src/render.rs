//! Text dashboard rendering.

use ansi_term::Colour;
use chrono::Local;
use clap::ValueEnum;
use paceboard_core::{
    ActivityFeed, DashboardView, PaceStatus, PacingResult, ProgressBand, TargetProgress,
    TerminalStat, Transaction,
};
use paceboard_monitor::DashboardState;

/// ANSI sequence clearing the screen and homing the cursor.
pub const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

const BAR_WIDTH: usize = 30;

/// Screen arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Cards stacked one per line
    Compact,
    /// Cards side by side, for wall-mounted screens
    Wide,
}

impl Layout {
    /// `--tv` always forces the wide layout.
    pub fn resolve(requested: Layout, tv: bool) -> Layout {
        if tv {
            Layout::Wide
        } else {
            requested
        }
    }
}

/// Render whatever the monitor currently holds.
pub fn render_state(state: &DashboardState, layout: Layout) -> String {
    match state {
        DashboardState::Loading => "Loading dashboard data...\n".to_string(),
        DashboardState::Failed { error, at } => format!(
            "Error\nFailed to load dashboard data\n  {}\n  at {}\n\nPress Enter to retry.\n",
            error,
            at.with_timezone(&Local).format("%H:%M:%S")
        ),
        DashboardState::Ready { view, last_error } => {
            let mut out = render_view(view, layout);
            if let Some(error) = last_error {
                out.push_str(&format!(
                    "\n! Last refresh failed, showing data from {}: {}\n",
                    view.fetched_at.with_timezone(&Local).format("%H:%M:%S"),
                    error
                ));
            }
            out
        }
    }
}

/// Render a full dashboard view.
pub fn render_view(view: &DashboardView, layout: Layout) -> String {
    let snapshot = &view.snapshot;
    let calendar = &view.pacing.calendar;
    let mut out = String::new();

    out.push_str(&format!(
        "Daily Performance Dashboard    Last Updated: {}\n",
        view.fetched_at.with_timezone(&Local).format("%H:%M:%S")
    ));
    out.push_str(&format!(
        "Day {} of {} - {} days left\n\n",
        calendar.days_elapsed, calendar.days_in_month, calendar.days_remaining
    ));

    let cards = [
        (
            "Total Transactions (Today)",
            format_count(snapshot.total_transactions_today),
        ),
        ("Today's Turnover", format_currency(snapshot.today_turnover)),
        ("Total Month Target", format_currency(snapshot.target_till_date)),
    ];
    match layout {
        Layout::Wide => {
            let line: Vec<String> = cards
                .iter()
                .map(|(title, value)| format!("{}: {}", title, value))
                .collect();
            out.push_str(&line.join("   |   "));
            out.push('\n');
        }
        Layout::Compact => {
            for (title, value) in &cards {
                out.push_str(&format!("{:<28}{}\n", title, value));
            }
        }
    }
    out.push('\n');

    out.push_str(&progress_row(
        "Monthly Turnover",
        &view.turnover_progress,
        &view.pacing.turnover,
        format_currency,
        |need| format!("{}/day", format_currency(need)),
    ));
    out.push_str(&progress_row(
        "Monthly Transactions",
        &view.transactions_progress,
        &view.pacing.transactions,
        format_count,
        |need| format!("{}/day", format_count(need.ceil())),
    ));
    out.push('\n');

    match &snapshot.feed {
        ActivityFeed::TerminalStats(rows) => {
            out.push_str("Terminal Breakdown (today)\n");
            out.push_str(&terminal_table(rows));
        }
        ActivityFeed::LastTransactions(rows) => {
            out.push_str("Last Transactions\n");
            out.push_str(&transaction_table(rows));
        }
    }

    out
}

fn progress_row(
    title: &str,
    progress: &TargetProgress,
    pacing: &PacingResult,
    amount: fn(f64) -> String,
    need: impl Fn(f64) -> String,
) -> String {
    format!(
        "{:<22}{} / {}\n  {} {:>5.1}%  {}\n  Need {} - Projected {}\n",
        title,
        amount(progress.achieved),
        amount(progress.target),
        band_colour(progress.band).paint(progress_bar(progress.display_percentage, BAR_WIDTH)),
        progress.display_percentage,
        pace_colour(pacing.pace_status).paint(format!("[{}]", pacing.pace_status.label())),
        need(pacing.needed_per_day),
        amount(pacing.projected_end_of_month),
    )
}

/// Bar colour for a progress band.
fn band_colour(band: ProgressBand) -> Colour {
    match band {
        ProgressBand::Strong => Colour::Green,
        ProgressBand::Moderate => Colour::Yellow,
        ProgressBand::Weak => Colour::Red,
    }
}

/// Badge colour for a pace classification.
fn pace_colour(status: PaceStatus) -> Colour {
    match status {
        PaceStatus::Ahead => Colour::Green,
        PaceStatus::OnTrack => Colour::Cyan,
        PaceStatus::Behind => Colour::Red,
    }
}

fn terminal_table(rows: &[TerminalStat]) -> String {
    if rows.is_empty() {
        return "  No transactions today\n".to_string();
    }

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|stat| {
            vec![
                stat.point.clone(),
                format_count(stat.transactions),
                format_currency(stat.turnover),
            ]
        })
        .collect();

    table(
        &["Terminal", "Transactions", "Turnover (PKR)"],
        &[false, true, true],
        &body,
    )
}

fn transaction_table(rows: &[Transaction]) -> String {
    if rows.is_empty() {
        return "  No transactions yet\n".to_string();
    }

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|tx| {
            let amount = if tx.is_failed() {
                "ERROR".to_string()
            } else {
                format_currency(tx.amount)
            };
            vec![
                tx.terminal_id.clone(),
                tx.transaction_id.clone(),
                amount,
                tx.timestamp.clone(),
            ]
        })
        .collect();

    table(
        &["Terminal", "Transaction", "Amount", "Time"],
        &[false, false, true, false],
        &body,
    )
}

/// Render a column-aligned table.
fn table(headers: &[&str], right_align: &[bool], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = table_line(headers, &widths, right_align);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    out.push_str(&table_line(&rule, &widths, right_align));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&table_line(&cells, &widths, right_align));
    }
    out
}

fn table_line(cells: &[&str], widths: &[usize], right_align: &[bool]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(right_align)
        .map(|((cell, width), right)| {
            if *right {
                format!("{:>width$}", cell, width = *width)
            } else {
                format!("{:<width$}", cell, width = *width)
            }
        })
        .collect();
    format!("  {}\n", padded.join("  ").trim_end())
}

/// PKR amount with thousands separators and no decimals.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}PKR {}", sign, group_thousands(rounded.abs() as u64))
}

/// Whole count with thousands separators.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(rounded.abs() as u64))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fixed-width bar for a percentage in [0, 100].
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
