//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use cadence_core::{
    ActivityService, ActivitySubmission, Clock, Database, Directory, EventTime, NewProgram,
    Notifier, NotificationError, Program,
};

/// Clock pinned to a single instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn utc(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn event(text: &str) -> EventTime {
    EventTime::parse(text).unwrap()
}

/// Notifier that records sent messages and can be told to fail.
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn send_message(&self, channel: &str, text: &str) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::DeliveryFailed {
                channel: channel.to_string(),
                message: "connection reset".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }
}

/// A program starting 2025-01-01, open-ended, bound to `channel`.
pub fn seed_program(db: &Database, name: &str, channel: &str) -> Program {
    db.insert_program(&NewProgram {
        name: name.into(),
        slack_channel: channel.into(),
        start_date: event("2025-01-01T00:00:00"),
        end_date: None,
    })
    .unwrap()
}

/// Log `count` activities on distinct days of 2025-01 for `slack_id`.
pub fn log_january_activities(
    db: &Database,
    clock: &dyn Clock,
    channel: &str,
    slack_id: &str,
    count: u32,
) {
    let service = ActivityService::new(db, db, clock);
    for day in 1..=count {
        service
            .log_activity(
                channel,
                slack_id,
                ActivitySubmission {
                    description: format!("ride on day {day}"),
                    evidence_url: None,
                    performed_at: Some(event(&format!("2025-01-{day:02}T10:00:00"))),
                },
            )
            .unwrap();
    }
}
