use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Renders as `yyyy-MM-dd'T'HH:mm:ss.SSSZ`, e.g. `2008-09-03T14:02:34.287+0400`.
pub const TIMESTAMP_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimestampZone {
    #[default]
    Local,
    Utc,
}

impl std::str::FromStr for TimestampZone {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(format!("unknown timestamp zone `{other}` (expected `local` or `utc`)")),
        }
    }
}

pub fn format_timestamp(epoch_millis: i64, zone: TimestampZone) -> String {
    let instant = instant_from_millis(epoch_millis);
    match zone {
        TimestampZone::Utc => instant.format(TIMESTAMP_PATTERN).to_string(),
        TimestampZone::Local => instant
            .with_timezone(&Local)
            .format(TIMESTAMP_PATTERN)
            .to_string(),
    }
}

// Saturates instead of failing so formatting stays total over i64.
fn instant_from_millis(epoch_millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(epoch_millis).unwrap_or(if epoch_millis < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

#[cfg(test)]
#[path = "timestamp_test.rs"]
mod tests;
