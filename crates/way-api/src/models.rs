//! Response models for the v2 API.
//!
//! Every endpoint wraps its payload in the same envelope:
//! `{ "meta": { "code", "errorType", "errorDetail" }, "response": ... }`.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use serde::Deserialize;

/// The outer wrapper common to every v2 response. The payload is kept as raw
/// JSON so a non-200 `meta` can be reported without trying to parse a payload
/// that is not there.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub meta: Meta,
    #[serde(default)]
    pub response: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub code: u16,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_detail: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckinsResponse {
    pub checkins: CheckinPage,
}

/// One page of the authenticated user's check-in history.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckinPage {
    /// Total check-ins on the account, not the page size.
    pub count: u32,
    pub items: Vec<Checkin>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkin {
    pub id: String,

    /// Epoch seconds at check-in time.
    pub created_at: i64,

    /// Minutes offset from UTC at the check-in's location.
    #[serde(default)]
    pub timezone_offset: Option<i32>,

    /// The user's message attached to the check-in, if any.
    #[serde(default)]
    pub shout: Option<String>,

    /// Absent for venueless ("off the grid") check-ins.
    #[serde(default)]
    pub venue: Option<Venue>,
}

impl Checkin {
    /// Check-in instant in the timezone where it happened.
    ///
    /// Falls back to UTC when the offset is absent or out of range.
    #[must_use]
    pub fn local_time(&self) -> DateTime<FixedOffset> {
        let offset_secs = self.timezone_offset.unwrap_or(0).saturating_mul(60);
        let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());
        Utc.timestamp_opt(self.created_at, 0)
            .single()
            .unwrap_or_default()
            .with_timezone(&offset)
    }

    #[must_use]
    pub fn venue_name(&self) -> &str {
        self.venue.as_ref().map_or("(off the grid)", |venue| venue.name.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<VenueLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl VenueLocation {
    /// "City, State, Country" from whichever parts are present.
    #[must_use]
    pub fn summary(&self) -> String {
        [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
