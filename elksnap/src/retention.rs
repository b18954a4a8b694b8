//! Date-partitioned index retention

use chrono::{Days, NaiveDate};

pub const DEFAULT_INDEX_PREFIX: &str = "logstash-";

/// Indices older than this many days are removed.
pub const RETENTION_DAYS: u32 = 7;

/// Date suffix used by daily indices, e.g. `logstash-2024.03.01`.
pub const INDEX_DATE_FORMAT: &str = "%Y.%m.%d";

/// Name of the index that just fell out of the retention window.
pub fn stale_index_name(prefix: &str, today: NaiveDate, window_days: u32) -> String {
    let cutoff = today
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN);
    format!("{}{}", prefix, cutoff.format(INDEX_DATE_FORMAT))
}

/// What happened to the stale index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    /// Not connected; no request was sent
    Skipped,
    Deleted { index: String },
    NotFound { index: String },
    Failed { index: String, reason: String },
}

impl PruneOutcome {
    pub fn index(&self) -> Option<&str> {
        match self {
            PruneOutcome::Skipped => None,
            PruneOutcome::Deleted { index }
            | PruneOutcome::NotFound { index }
            | PruneOutcome::Failed { index, .. } => Some(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_seven_days_back() {
        assert_eq!(
            stale_index_name("logstash-", date(2024, 3, 20), 7),
            "logstash-2024.03.13"
        );
    }

    #[test]
    fn test_crosses_month_and_leap_day() {
        assert_eq!(
            stale_index_name("logstash-", date(2024, 3, 5), 7),
            "logstash-2024.02.27"
        );
        assert_eq!(
            stale_index_name("logstash-", date(2024, 3, 7), 7),
            "logstash-2024.02.29"
        );
    }

    #[test]
    fn test_crosses_year() {
        assert_eq!(
            stale_index_name("filebeat-", date(2025, 1, 3), 7),
            "filebeat-2024.12.27"
        );
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(stale_index_name("", date(2023, 10, 8), 7), "2023.10.01");
    }

    #[test]
    fn test_outcome_index() {
        assert_eq!(PruneOutcome::Skipped.index(), None);
        let outcome = PruneOutcome::NotFound {
            index: "logstash-2024.01.01".into(),
        };
        assert_eq!(outcome.index(), Some("logstash-2024.01.01"));
    }
}
