use chrono::{DateTime, SecondsFormat, Utc};

/// Key of the single `info` row recording the most recent startup.
pub const LAST_RUN_KEY: &str = "lastrun";

/// Formats a startup timestamp the way it is stored in the `info` table,
/// e.g. `2026-10-17T09:15:00.123Z`.
pub fn last_run_value(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
