//! Timestamp rendering.
//!
//! The gateway stamps every message with epoch seconds; messages expose the
//! stamp formatted as `YYYY-MM-DD HH:MM:SS` in a chosen [`Clock`].

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::trace;

/// The clock timestamps are rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clock {
    /// The local offset of the running process, falling back to UTC when it
    /// cannot be determined.
    #[default]
    Local,
    /// Coordinated universal time.
    Utc,
}

impl Clock {
    /// Returns the offset this clock currently resolves to.
    pub fn offset(self) -> UtcOffset {
        match self {
            Self::Utc => UtcOffset::UTC,
            Self::Local => UtcOffset::current_local_offset().unwrap_or_else(|e| {
                trace!(error = %e, "local offset unavailable, using UTC");
                UtcOffset::UTC
            }),
        }
    }
}

/// Formats epoch seconds as `YYYY-MM-DD HH:MM:SS` in the given clock.
///
/// Returns `None` if the timestamp is out of the representable range.
pub fn format_timestamp(secs: i64, clock: Clock) -> Option<String> {
    let instant = OffsetDateTime::from_unix_timestamp(secs).ok()?;
    instant
        .checked_to_offset(clock.offset())?
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .ok()
}
