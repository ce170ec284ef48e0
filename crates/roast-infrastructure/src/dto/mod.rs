//! Storage DTOs.
//!
//! The persisted JSON uses camelCase names and RFC 3339 date strings.
//! Domain types never derive the wire shape directly; conversion goes
//! through these DTOs so the stored format can stay stable.

mod message;
mod session;

pub use message::{MessageDTO, RoastTierDTO, SenderDTO};
pub use session::SessionDTO;

use chrono::{DateTime, SecondsFormat, Utc};
use roast_core::error::Result;

pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
