//! Selection and formatting of the rows shown in the transaction table.

use api_types::transaction::{Transaction, TransactionId, TransactionKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::OrderingPolicy;

pub const INVALID_DATE: &str = "Invalid Date";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub description: String,
}

/// How dates are shown in the table.
#[derive(Debug, Clone)]
pub struct DateDisplay {
    pub timezone: Tz,
    pub format: String,
}

impl Default for DateDisplay {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            format: "%d %b %Y".to_string(),
        }
    }
}

impl DateDisplay {
    pub fn format(&self, raw: &str) -> String {
        match parse_instant(raw, self.timezone) {
            Some(instant) => instant
                .with_timezone(&self.timezone)
                .format(&self.format)
                .to_string(),
            None => INVALID_DATE.to_string(),
        }
    }
}

/// Parses an ISO-8601 timestamp. Values without an offset are read as local
/// time in `tz`; bare dates as UTC midnight.
pub fn parse_instant(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Picks at most `limit` entries according to `policy`.
///
/// `Insertion` returns the tail of the sequence in its current order.
/// `Date` returns the latest entries by date, oldest first; unparseable
/// dates sort before everything else.
pub fn visible<'a>(
    items: &'a [Transaction],
    policy: OrderingPolicy,
    limit: usize,
) -> Vec<&'a Transaction> {
    match policy {
        OrderingPolicy::Insertion => {
            let start = items.len().saturating_sub(limit);
            items[start..].iter().collect()
        }
        OrderingPolicy::Date => {
            let mut dated: Vec<_> = items
                .iter()
                .map(|tx| (parse_instant(&tx.date, Tz::UTC), tx))
                .collect();
            dated.sort_by(|a, b| a.0.cmp(&b.0));
            let start = dated.len().saturating_sub(limit);
            dated.into_iter().skip(start).map(|(_, tx)| tx).collect()
        }
    }
}

pub fn rows(
    items: &[Transaction],
    policy: OrderingPolicy,
    limit: usize,
    dates: &DateDisplay,
) -> Vec<RowView> {
    visible(items, policy, limit)
        .into_iter()
        .map(|tx| RowView {
            id: tx.id.clone(),
            kind: tx.kind.clone(),
            amount: tx.amount.to_string(),
            category: tx.category.clone(),
            date: dates.format(&tx.date),
            description: tx.description.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use api_types::transaction::Amount;

    use super::*;

    fn tx(id: u64, date: &str) -> Transaction {
        Transaction {
            id: id.into(),
            kind: TransactionKind::Income,
            category: "salary".to_string(),
            amount: Amount::Number(id as f64),
            date: date.to_string(),
            description: format!("entry {id}"),
        }
    }

    fn ids(items: Vec<&Transaction>) -> Vec<String> {
        items.into_iter().map(|tx| tx.id.to_string()).collect()
    }

    #[test]
    fn insertion_policy_takes_the_tail_in_order() {
        let items: Vec<_> = (1..=15).map(|i| tx(i, "2024-01-01T00:00:00Z")).collect();
        let shown = ids(visible(&items, OrderingPolicy::Insertion, 10));
        let expected: Vec<String> = (6..=15).map(|i| i.to_string()).collect();
        assert_eq!(shown, expected);
    }

    #[test]
    fn short_sequences_are_shown_whole() {
        let items: Vec<_> = (1..=3).map(|i| tx(i, "")).collect();
        assert_eq!(visible(&items, OrderingPolicy::Insertion, 10).len(), 3);
        assert!(visible(&[], OrderingPolicy::Date, 10).is_empty());
    }

    #[test]
    fn insertion_policy_ignores_dates() {
        let items = vec![
            tx(1, "2024-03-01T00:00:00Z"),
            tx(2, "2020-01-01T00:00:00Z"),
            tx(3, "2024-02-01T00:00:00Z"),
        ];
        assert_eq!(ids(visible(&items, OrderingPolicy::Insertion, 2)), ["2", "3"]);
    }

    #[test]
    fn date_policy_takes_latest_by_date() {
        let items = vec![
            tx(1, "2024-03-01T00:00:00Z"),
            tx(2, "2020-01-01T00:00:00Z"),
            tx(3, "not a date"),
            tx(4, "2024-02-01T00:00:00Z"),
        ];
        assert_eq!(ids(visible(&items, OrderingPolicy::Date, 2)), ["4", "1"]);
        assert_eq!(
            ids(visible(&items, OrderingPolicy::Date, 10)),
            ["3", "2", "4", "1"]
        );
    }

    #[test]
    fn dates_are_formatted_in_the_configured_zone() {
        let display = DateDisplay {
            timezone: chrono_tz::Asia::Tokyo,
            format: "%Y-%m-%d".to_string(),
        };
        assert_eq!(display.format("2024-05-01T20:00:00Z"), "2024-05-02");
        assert_eq!(display.format("2024-05-01T20:00:00"), "2024-05-01");
        assert_eq!(display.format("2024-05-01"), "2024-05-01");
        assert_eq!(display.format("yesterday"), INVALID_DATE);
    }

    #[test]
    fn rows_carry_literal_fields() {
        let items = vec![tx(1, "2024-05-01T10:00:00.123Z")];
        let rows = rows(&items, OrderingPolicy::Insertion, 10, &DateDisplay::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id.as_str(), "1");
        assert_eq!(rows[0].amount, "1");
        assert_eq!(rows[0].category, "salary");
        assert_eq!(rows[0].date, "01 May 2024");
        assert_eq!(rows[0].description, "entry 1");
    }
}
