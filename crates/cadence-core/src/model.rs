//! Domain records and value types.
//!
//! Records carry plain foreign-key ids; cross-entity navigation happens
//! through explicit store queries, never through back-pointers.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A timestamp that may or may not carry a UTC offset.
///
/// Submitted activity timestamps and program boundaries arrive in both
/// forms, and the difference is meaningful to the validation rules, so the
/// distinction is kept instead of coercing everything to UTC.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl EventTime {
    /// Parse RFC 3339 text, or a plain "YYYY-MM-DDTHH:MM:SS" local datetime.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
            return Ok(EventTime::Zoned(zoned));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
            .map(EventTime::Naive)
            .map_err(|_| ValidationError::UnparsableTimestamp(text.to_string()))
    }

    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        EventTime::Zoned(instant.fixed_offset())
    }

    /// Calendar day of the local wall time.
    pub fn day(&self) -> NaiveDate {
        match self {
            EventTime::Naive(dt) => dt.date(),
            EventTime::Zoned(dt) => dt.date_naive(),
        }
    }

    /// Same calendar day at midnight, keeping the offset if one is present.
    pub fn at_start_of_day(&self) -> Self {
        match self {
            EventTime::Naive(dt) => EventTime::Naive(dt.date().and_time(NaiveTime::MIN)),
            EventTime::Zoned(dt) => {
                let midnight = dt.date_naive().and_time(NaiveTime::MIN);
                match midnight.and_local_timezone(*dt.offset()).single() {
                    Some(zoned) => EventTime::Zoned(zoned),
                    // Fixed offsets never make midnight ambiguous; keep the
                    // wall time if chrono ever disagrees.
                    None => EventTime::Naive(midnight),
                }
            }
        }
    }

    /// Compare two timestamps, adopting an offset when exactly one side is
    /// naive.
    ///
    /// When one side is naive and the other zoned, the naive side is read as
    /// if it carried the zoned side's offset, which reduces to comparing wall
    /// times. Two naive values compare as wall times; two zoned values
    /// compare as instants. Inherited quirk: adopting the other side's offset
    /// can shift which day a submission effectively lands on, so alignment
    /// applies to comparisons only and the stored value keeps its original
    /// form.
    pub fn cmp_adopting_offset(&self, other: &EventTime) -> Ordering {
        match (self, other) {
            (EventTime::Naive(a), EventTime::Naive(b)) => a.cmp(b),
            (EventTime::Zoned(a), EventTime::Zoned(b)) => a.cmp(b),
            (EventTime::Naive(a), EventTime::Zoned(b)) => a.cmp(&b.naive_local()),
            (EventTime::Zoned(a), EventTime::Naive(b)) => a.naive_local().cmp(b),
        }
    }

    /// Storage form: RFC 3339 for zoned values, plain local datetime for
    /// naive ones, so round-tripping preserves awareness.
    pub fn to_storage(&self) -> String {
        match self {
            EventTime::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            EventTime::Zoned(dt) => dt.to_rfc3339(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_storage())
    }
}

impl Serialize for EventTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_storage())
    }
}

impl<'de> Deserialize<'de> for EventTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        EventTime::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub slack_id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    pub name: String,
    pub slack_channel: String,
    pub start_date: EventTime,
    /// Open-ended program when absent.
    pub end_date: Option<EventTime>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub user_id: i64,
    pub program_id: i64,
    pub description: String,
    pub evidence_url: Option<String>,
    pub performed_at: EventTime,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub user_id: i64,
    pub program_id: i64,
    /// "YYYY-MM" cycle this award was earned in.
    pub cycle_reference: String,
    pub is_notified: bool,
    pub created_at: DateTime<Utc>,
}

/// An award that has not been announced yet, joined with the identity
/// needed to mention its owner.
#[derive(Debug, Clone)]
pub struct PendingAward {
    pub achievement_id: i64,
    pub slack_id: String,
    pub display_name: String,
}

/// Candidate activity as submitted, before validation.
#[derive(Debug, Clone, Default)]
pub struct ActivitySubmission {
    pub description: String,
    pub evidence_url: Option<String>,
    /// Defaults to "now" when absent.
    pub performed_at: Option<EventTime>,
}

/// Validated activity ready for insertion.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: i64,
    pub program_id: i64,
    pub description: String,
    pub evidence_url: Option<String>,
    pub performed_at: EventTime,
}

/// Typed partial update for an activity. `None` fields are left untouched.
/// Optional fields are doubly wrapped: `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct ActivityPatch {
    pub description: Option<String>,
    pub evidence_url: Option<Option<String>>,
    pub performed_at: Option<EventTime>,
}

impl ActivityPatch {
    /// Apply the provided fields onto an existing record.
    ///
    /// `performed_at` must be validated by the caller before merging.
    pub fn merge_into(self, activity: &mut Activity) {
        if let Some(description) = self.description {
            activity.description = description;
        }
        if let Some(evidence_url) = self.evidence_url {
            activity.evidence_url = evidence_url;
        }
        if let Some(performed_at) = self.performed_at {
            activity.performed_at = performed_at;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewProgram {
    pub name: String,
    pub slack_channel: String,
    pub start_date: EventTime,
    pub end_date: Option<EventTime>,
}

/// Typed partial update for a program. `None` fields are left untouched.
/// `end_date: Some(None)` clears the end date, making the program open-ended.
#[derive(Debug, Clone, Default)]
pub struct ProgramPatch {
    pub name: Option<String>,
    pub slack_channel: Option<String>,
    pub start_date: Option<EventTime>,
    pub end_date: Option<Option<EventTime>>,
}

impl ProgramPatch {
    pub fn merge_into(self, program: &mut Program) {
        if let Some(name) = self.name {
            program.name = name;
        }
        if let Some(slack_channel) = self.slack_channel {
            program.slack_channel = slack_channel;
        }
        if let Some(start_date) = self.start_date {
            program.start_date = start_date.at_start_of_day();
        }
        if let Some(end_date) = self.end_date {
            program.end_date = end_date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_as_zoned() {
        let parsed = EventTime::parse("2025-01-15T10:30:00-03:00").unwrap();
        assert!(matches!(parsed, EventTime::Zoned(_)));
        assert_eq!(parsed.day(), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn parses_plain_datetime_as_naive() {
        let parsed = EventTime::parse("2025-01-15T10:30:00").unwrap();
        assert!(matches!(parsed, EventTime::Naive(_)));
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(EventTime::parse("not-a-date").is_err());
        assert!(EventTime::parse("2025-01-15").is_err());
    }

    #[test]
    fn storage_form_round_trips_awareness() {
        for text in ["2025-01-15T10:30:00", "2025-01-15T10:30:00+02:00"] {
            let parsed = EventTime::parse(text).unwrap();
            let reparsed = EventTime::parse(&parsed.to_storage()).unwrap();
            assert_eq!(parsed, reparsed);
        }
    }

    #[test]
    fn naive_side_adopts_zoned_offset() {
        // 10:00 naive vs 09:00-03:00: as instants the zoned value is 12:00
        // UTC, but offset adoption compares wall times, so naive is later.
        let naive = EventTime::parse("2025-01-15T10:00:00").unwrap();
        let zoned = EventTime::parse("2025-01-15T09:00:00-03:00").unwrap();
        assert_eq!(naive.cmp_adopting_offset(&zoned), Ordering::Greater);
        assert_eq!(zoned.cmp_adopting_offset(&naive), Ordering::Less);
    }

    #[test]
    fn zoned_pair_compares_as_instants() {
        let a = EventTime::parse("2025-01-15T10:00:00+00:00").unwrap();
        let b = EventTime::parse("2025-01-15T08:00:00-03:00").unwrap();
        // 08:00-03:00 is 11:00 UTC
        assert_eq!(a.cmp_adopting_offset(&b), Ordering::Less);
    }

    #[test]
    fn start_of_day_keeps_offset() {
        let zoned = EventTime::parse("2025-01-15T10:30:00-03:00").unwrap();
        assert_eq!(zoned.at_start_of_day().to_storage(), "2025-01-15T00:00:00-03:00");

        let naive = EventTime::parse("2025-01-15T10:30:00").unwrap();
        assert_eq!(naive.at_start_of_day().to_storage(), "2025-01-15T00:00:00");
    }

    #[test]
    fn patch_merge_applies_only_provided_fields() {
        let mut activity = Activity {
            id: 1,
            user_id: 1,
            program_id: 1,
            description: "ride".into(),
            evidence_url: None,
            performed_at: EventTime::parse("2025-01-15T10:00:00").unwrap(),
            created_at: Utc::now(),
        };

        ActivityPatch {
            description: Some("long ride".into()),
            ..Default::default()
        }
        .merge_into(&mut activity);

        assert_eq!(activity.description, "long ride");
        assert!(activity.evidence_url.is_none());
        assert_eq!(
            activity.performed_at,
            EventTime::parse("2025-01-15T10:00:00").unwrap()
        );
    }

    #[test]
    fn patch_clears_optional_fields() {
        let mut activity = Activity {
            id: 1,
            user_id: 1,
            program_id: 1,
            description: "ride".into(),
            evidence_url: Some("https://example.com/ride".into()),
            performed_at: EventTime::parse("2025-01-15T10:00:00").unwrap(),
            created_at: Utc::now(),
        };

        ActivityPatch {
            evidence_url: Some(None),
            ..Default::default()
        }
        .merge_into(&mut activity);
        assert!(activity.evidence_url.is_none());

        let mut program = Program {
            id: 1,
            name: "Cycle Challenge".into(),
            slack_channel: "#cycling".into(),
            start_date: EventTime::parse("2025-01-01T00:00:00").unwrap(),
            end_date: Some(EventTime::parse("2025-06-30T23:59:59").unwrap()),
            created_at: Utc::now(),
        };

        ProgramPatch {
            end_date: Some(None),
            ..Default::default()
        }
        .merge_into(&mut program);
        assert!(program.end_date.is_none());
    }
}
