//! Response-shape validation.
//!
//! A payload either validates completely or is rejected; no partially
//! decoded snapshot ever leaves this module.

use crate::error::{ClientError, Result};
use paceboard_core::{ActivityFeed, DashboardSnapshot, TerminalStat, Transaction, ViewMode};
use serde_json::{Map, Value};

/// Top-level fields that must be present as JSON numbers.
pub const REQUIRED_NUMBERS: [&str; 6] = [
    "total_transactions_today",
    "today_turnover",
    "turnover_till_date",
    "transactions_mtd",
    "target_till_date",
    "target_achievement_percentage",
];

/// Optional discriminator naming the activity list.
pub const VIEW_MODE_KEY: &str = "view_mode";

/// Optional monthly transaction target.
pub const TRANSACTIONS_TARGET_KEY: &str = "transactions_target";

/// Parse and validate a raw response body.
pub fn parse_snapshot(body: &[u8]) -> Result<DashboardSnapshot> {
    let value: Value = serde_json::from_slice(body)?;
    validate_snapshot(&value)
}

/// Validate a decoded JSON value against the dashboard contract.
pub fn validate_snapshot(value: &Value) -> Result<DashboardSnapshot> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid("expected a JSON object"))?;

    let total_transactions_today = number_field(object, "total_transactions_today")?;
    let today_turnover = number_field(object, "today_turnover")?;
    let turnover_till_date = number_field(object, "turnover_till_date")?;
    let transactions_mtd = number_field(object, "transactions_mtd")?;
    let target_till_date = number_field(object, "target_till_date")?;
    let target_achievement_percentage = number_field(object, "target_achievement_percentage")?;

    let transactions_target = match object.get(TRANSACTIONS_TARGET_KEY) {
        None | Some(Value::Null) => None,
        Some(_) => Some(number_field(object, TRANSACTIONS_TARGET_KEY)?),
    };

    let mode = resolve_view_mode(object)?;
    let feed = decode_feed(object, mode)?;

    Ok(DashboardSnapshot {
        total_transactions_today,
        today_turnover,
        turnover_till_date,
        transactions_mtd,
        target_till_date,
        target_achievement_percentage,
        transactions_target,
        feed,
    })
}

/// Pick the view mode from the discriminator, or infer it from the list key.
fn resolve_view_mode(object: &Map<String, Value>) -> Result<ViewMode> {
    match object.get(VIEW_MODE_KEY) {
        Some(Value::String(raw)) => ViewMode::parse(raw)
            .ok_or_else(|| invalid(format!("unknown view mode `{}`", raw))),
        Some(other) => Err(invalid(format!(
            "field `{}` must be a string, got {}",
            VIEW_MODE_KEY,
            type_name(other)
        ))),
        None => {
            let has_stats = object.contains_key(ViewMode::TerminalStats.as_str());
            let has_transactions = object.contains_key(ViewMode::LastTransactions.as_str());
            match (has_stats, has_transactions) {
                (true, false) => Ok(ViewMode::TerminalStats),
                (false, true) => Ok(ViewMode::LastTransactions),
                (true, true) => Err(invalid(
                    "both `terminal_stats` and `last_transactions` present without `view_mode`",
                )),
                (false, false) => Err(invalid(
                    "missing activity list (`terminal_stats` or `last_transactions`)",
                )),
            }
        }
    }
}

fn decode_feed(object: &Map<String, Value>, mode: ViewMode) -> Result<ActivityFeed> {
    let key = mode.as_str();
    let list = match object.get(key) {
        Some(list @ Value::Array(_)) => list.clone(),
        Some(other) => {
            return Err(invalid(format!(
                "field `{}` must be a list, got {}",
                key,
                type_name(other)
            )))
        }
        None => return Err(invalid(format!("missing field `{}`", key))),
    };

    let entry_error = |e: serde_json::Error| invalid(format!("invalid `{}` entry: {}", key, e));

    Ok(match mode {
        ViewMode::TerminalStats => ActivityFeed::TerminalStats(
            serde_json::from_value::<Vec<TerminalStat>>(list).map_err(entry_error)?,
        ),
        ViewMode::LastTransactions => ActivityFeed::LastTransactions(
            serde_json::from_value::<Vec<Transaction>>(list).map_err(entry_error)?,
        ),
    })
}

fn number_field(object: &Map<String, Value>, key: &str) -> Result<f64> {
    match object.get(key) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| invalid(format!("field `{}` is out of range", key))),
        Some(other) => Err(invalid(format!(
            "field `{}` must be a number, got {}",
            key,
            type_name(other)
        ))),
        None => Err(invalid(format!("missing field `{}`", key))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn invalid(message: impl Into<String>) -> ClientError {
    ClientError::Validation(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use paceboard_core::TransactionOutcome;
    use serde_json::json;

    fn stats_payload() -> Value {
        json!({
            "terminal_stats": [
                { "point": "Mall Road", "transactions": 120, "turnover": 350000.0 },
                { "point": "DHA Phase 5", "transactions": 64, "turnover": 181250.5 }
            ],
            "total_transactions_today": 184,
            "today_turnover": 531250.5,
            "turnover_till_date": 4200000,
            "transactions_mtd": 9800,
            "target_till_date": 12000000,
            "target_achievement_percentage": 35.0,
            "days_elapsed": 10,
            "turnover_pace_status": "ahead"
        })
    }

    fn transactions_payload() -> Value {
        json!({
            "last_transactions": [
                { "terminal_id": "T-01", "transaction_id": "A1", "amount": 2500.0, "timestamp": "10:02" },
                { "terminal_id": "T-02", "transaction_id": "A2", "amount": 0, "timestamp": "10:05" }
            ],
            "total_transactions_today": 2,
            "today_turnover": 2500,
            "turnover_till_date": 90000,
            "transactions_mtd": 40,
            "target_till_date": 300000,
            "target_achievement_percentage": 30
        })
    }

    #[test]
    fn test_terminal_stats_payload() {
        let snapshot = validate_snapshot(&stats_payload()).unwrap();

        assert_eq!(snapshot.total_transactions_today, 184.0);
        assert_eq!(snapshot.target_till_date, 12_000_000.0);
        assert_eq!(snapshot.transactions_target, None);
        match &snapshot.feed {
            ActivityFeed::TerminalStats(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].point, "Mall Road");
                assert_eq!(rows[1].transactions, 64.0);
            }
            other => panic!("unexpected feed: {:?}", other),
        }
    }

    #[test]
    fn test_last_transactions_payload_keeps_failed_entries() {
        let snapshot = validate_snapshot(&transactions_payload()).unwrap();

        match &snapshot.feed {
            ActivityFeed::LastTransactions(rows) => {
                assert_eq!(rows[0].outcome(), TransactionOutcome::Completed);
                assert_eq!(rows[1].outcome(), TransactionOutcome::Failed);
            }
            other => panic!("unexpected feed: {:?}", other),
        }
    }

    #[test]
    fn test_missing_numeric_field_rejected() {
        let mut payload = stats_payload();
        payload.as_object_mut().unwrap().remove("today_turnover");

        let err = validate_snapshot(&payload).unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref m) if m.contains("today_turnover")));
    }

    #[test]
    fn test_every_required_number_checked() {
        for key in REQUIRED_NUMBERS {
            let mut payload = transactions_payload();
            payload[key] = json!(null);
            assert!(validate_snapshot(&payload).is_err(), "{} accepted as null", key);
        }
    }

    #[test]
    fn test_string_number_rejected() {
        let mut payload = stats_payload();
        payload["transactions_mtd"] = json!("9800");

        let err = validate_snapshot(&payload).unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref m) if m.contains("must be a number")));
    }

    #[test]
    fn test_non_list_feed_rejected() {
        let mut payload = transactions_payload();
        payload["last_transactions"] = json!({ "terminal_id": "T-01" });

        let err = validate_snapshot(&payload).unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref m) if m.contains("must be a list")));
    }

    #[test]
    fn test_ambiguous_feed_rejected() {
        let mut payload = stats_payload();
        payload["last_transactions"] = json!([]);

        let err = validate_snapshot(&payload).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_view_mode_discriminates() {
        let mut payload = stats_payload();
        payload["last_transactions"] = json!([]);
        payload["view_mode"] = json!("last_transactions");

        let snapshot = validate_snapshot(&payload).unwrap();
        assert_eq!(snapshot.feed.mode(), ViewMode::LastTransactions);
        assert!(snapshot.feed.is_empty());
    }

    #[test]
    fn test_unknown_view_mode_rejected() {
        let mut payload = stats_payload();
        payload["view_mode"] = json!("tv");
        assert!(validate_snapshot(&payload).is_err());
    }

    #[test]
    fn test_missing_feed_rejected() {
        let mut payload = stats_payload();
        payload.as_object_mut().unwrap().remove("terminal_stats");
        assert!(validate_snapshot(&payload).is_err());
    }

    #[test]
    fn test_malformed_entry_rejected() {
        let mut payload = stats_payload();
        payload["terminal_stats"][1]["turnover"] = json!("lots");

        let err = validate_snapshot(&payload).unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref m) if m.contains("terminal_stats")));
    }

    #[test]
    fn test_float_terminal_count_accepted() {
        let mut payload = stats_payload();
        payload["terminal_stats"][0]["transactions"] = json!(12.0);

        let snapshot = validate_snapshot(&payload).unwrap();
        match &snapshot.feed {
            ActivityFeed::TerminalStats(rows) => assert_eq!(rows[0].transactions, 12.0),
            other => panic!("unexpected feed: {:?}", other),
        }
    }

    #[test]
    fn test_numeric_ids_accepted() {
        let mut payload = transactions_payload();
        payload["last_transactions"][0]["terminal_id"] = json!(1001);
        payload["last_transactions"][1]["transaction_id"] = json!(552);

        let snapshot = validate_snapshot(&payload).unwrap();
        match &snapshot.feed {
            ActivityFeed::LastTransactions(rows) => {
                assert_eq!(rows[0].terminal_id, "1001");
                assert_eq!(rows[1].transaction_id, "552");
                assert!(rows[1].is_failed());
            }
            other => panic!("unexpected feed: {:?}", other),
        }
    }

    #[test]
    fn test_transactions_target_optional() {
        let mut payload = stats_payload();
        payload["transactions_target"] = json!(30000);
        assert_eq!(validate_snapshot(&payload).unwrap().transactions_target, Some(30_000.0));

        payload["transactions_target"] = json!(null);
        assert_eq!(validate_snapshot(&payload).unwrap().transactions_target, None);

        payload["transactions_target"] = json!("30000");
        assert!(validate_snapshot(&payload).is_err());
    }

    #[test]
    fn test_non_object_and_bad_json() {
        assert!(matches!(
            validate_snapshot(&json!([1, 2, 3])),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(parse_snapshot(b"<html>"), Err(ClientError::Decode(_))));
    }
}
