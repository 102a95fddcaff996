use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The persisted credential: one access token plus issuance metadata.
///
/// Stored as camelCase JSON in the credential file. `expires_in` is omitted
/// when the provider did not return a lifetime; an absent lifetime means the
/// token never expires by local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub access_token: String,

    /// Local-clock milliseconds since the epoch at issuance.
    pub created_at: i64,

    /// Lifetime in seconds, when the provider reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

impl CredentialRecord {
    /// Build a record stamped with the current local clock.
    #[must_use]
    pub fn issued_now(access_token: String, expires_in: Option<u64>) -> Self {
        Self {
            access_token,
            created_at: Utc::now().timestamp_millis(),
            expires_in,
        }
    }

    /// The authoritative expiry instant in epoch milliseconds, when one exists.
    #[must_use]
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.expires_in
            .map(|secs| self.created_at.saturating_add((secs as i64).saturating_mul(1000)))
    }

    /// Local time check only. No lifetime means the record never expires.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self.expires_at_ms() {
            Some(expiry) => Utc::now().timestamp_millis() <= expiry,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn record(age_secs: i64, expires_in: Option<u64>) -> CredentialRecord {
        CredentialRecord {
            access_token: "tok".into(),
            created_at: Utc::now().timestamp_millis() - age_secs * 1000,
            expires_in,
        }
    }

    #[rstest]
    #[case::expired(1000, Some(10), false)]
    #[case::still_fresh(5, Some(3600), true)]
    #[case::no_lifetime_old(1000, None, true)]
    #[case::no_lifetime_ancient(86_400 * 365 * 10, None, true)]
    fn validity(#[case] age_secs: i64, #[case] expires_in: Option<u64>, #[case] expected: bool) {
        assert_eq!(record(age_secs, expires_in).is_valid(), expected);
    }

    #[test]
    fn expiry_instant_is_created_at_plus_lifetime() {
        let record = CredentialRecord {
            access_token: "tok".into(),
            created_at: 1_000_000,
            expires_in: Some(30),
        };
        assert_eq!(record.expires_at_ms(), Some(1_030_000));
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_lifetime() {
        let record = CredentialRecord {
            access_token: "tok_xyz".into(),
            created_at: 42,
            expires_in: None,
        };
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"{"accessToken":"tok_xyz","createdAt":42}"#);
    }

    #[test]
    fn round_trips_with_lifetime() {
        let record = CredentialRecord {
            access_token: "tok_xyz".into(),
            created_at: 42,
            expires_in: Some(3600),
        };
        let json = serde_json::to_string(&record).expect("serialize");
        let parsed: CredentialRecord = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, record);
    }
}
