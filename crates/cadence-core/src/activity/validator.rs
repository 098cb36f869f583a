//! Admission rules for activity submissions.
//!
//! Pure decision functions: the caller persists only after both checks
//! pass, so a rejected submission never leaves a partial write behind.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{BusinessRuleError, Result};
use crate::model::{Activity, EventTime, Program};

/// Resolve and validate a submission's timestamp against the program window.
///
/// An absent candidate defaults to `now`. The resolved timestamp must not be
/// in the future and must fall inside `[start_date, end_date]`, with the
/// upper bound open when the program has no end date. Mixed-awareness
/// comparisons follow [`EventTime::cmp_adopting_offset`].
pub fn resolve_performed_at(
    program: &Program,
    candidate: Option<EventTime>,
    now: DateTime<Utc>,
) -> Result<EventTime> {
    let now = EventTime::from_utc(now);
    let performed_at = candidate.unwrap_or_else(|| now.clone());

    if performed_at.cmp_adopting_offset(&now) == Ordering::Greater {
        return Err(BusinessRuleError::FutureActivityDate.into());
    }

    if performed_at.cmp_adopting_offset(&program.start_date) == Ordering::Less {
        return Err(BusinessRuleError::OutsideProgramWindow.into());
    }

    if let Some(end_date) = &program.end_date {
        if performed_at.cmp_adopting_offset(end_date) == Ordering::Greater {
            return Err(BusinessRuleError::OutsideProgramWindow.into());
        }
    }

    Ok(performed_at)
}

/// Reject the submission when another activity already occupies the day.
pub fn ensure_no_same_day(existing: Option<&Activity>, day: NaiveDate) -> Result<()> {
    if existing.is_some() {
        return Err(BusinessRuleError::DuplicateActivityForDay { day }.into());
    }
    Ok(())
}
