//! Dashboard snapshot model - one polled payload.

use serde::{Deserialize, Deserializer, Serialize};

/// The full metrics payload for one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Transactions processed today across all terminals
    pub total_transactions_today: f64,

    /// Turnover processed today
    pub today_turnover: f64,

    /// Turnover month-to-date
    pub turnover_till_date: f64,

    /// Transaction count month-to-date
    pub transactions_mtd: f64,

    /// Full-month turnover target
    pub target_till_date: f64,

    /// Turnover achievement against target, as reported by the backend
    pub target_achievement_percentage: f64,

    /// Full-month transaction target, when the backend supplies one
    pub transactions_target: Option<f64>,

    /// Per-terminal or per-transaction activity list
    pub feed: ActivityFeed,
}

/// Which activity list a payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Per-terminal totals for today
    TerminalStats,
    /// Most recent individual transactions
    LastTransactions,
}

impl ViewMode {
    /// Wire name, also the JSON key holding the list.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::TerminalStats => "terminal_stats",
            ViewMode::LastTransactions => "last_transactions",
        }
    }

    /// Parse a wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "terminal_stats" => Some(ViewMode::TerminalStats),
            "last_transactions" => Some(ViewMode::LastTransactions),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity list, discriminated by view mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view_mode", content = "entries", rename_all = "snake_case")]
pub enum ActivityFeed {
    /// One row per terminal
    TerminalStats(Vec<TerminalStat>),
    /// One row per transaction
    LastTransactions(Vec<Transaction>),
}

impl ActivityFeed {
    /// The feed's view mode.
    pub fn mode(&self) -> ViewMode {
        match self {
            ActivityFeed::TerminalStats(_) => ViewMode::TerminalStats,
            ActivityFeed::LastTransactions(_) => ViewMode::LastTransactions,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            ActivityFeed::TerminalStats(rows) => rows.len(),
            ActivityFeed::LastTransactions(rows) => rows.len(),
        }
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Today's totals for one terminal or location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalStat {
    /// Terminal or location name
    pub point: String,

    /// Transactions today; backends may send it as an integral float
    pub transactions: f64,

    /// Turnover today
    pub turnover: f64,
}

/// A single transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Terminal that processed it
    #[serde(deserialize_with = "string_or_number")]
    pub terminal_id: String,

    /// Transaction reference
    #[serde(deserialize_with = "string_or_number")]
    pub transaction_id: String,

    /// Amount; exactly zero marks a failed transaction
    pub amount: f64,

    /// Timestamp as sent by the backend
    pub timestamp: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Identifier {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

/// Accept an identifier sent either as a string or as a bare number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Identifier::deserialize(deserializer)? {
        Identifier::Text(s) => s,
        Identifier::Signed(n) => n.to_string(),
        Identifier::Unsigned(n) => n.to_string(),
        Identifier::Float(n) => n.to_string(),
    })
}

/// How a transaction entry should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionOutcome {
    /// A real sale
    Completed,
    /// Errored at the terminal (zero amount sentinel)
    Failed,
}

impl Transaction {
    /// Classify the entry. A zero amount is never a valid sale.
    pub fn outcome(&self) -> TransactionOutcome {
        if self.amount == 0.0 {
            TransactionOutcome::Failed
        } else {
            TransactionOutcome::Completed
        }
    }

    /// True for the zero-amount sentinel.
    pub fn is_failed(&self) -> bool {
        self.outcome() == TransactionOutcome::Failed
    }
}
