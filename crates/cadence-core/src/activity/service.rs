//! Member-facing activity operations.
//!
//! Each operation is a fresh read-validate-write pass over the injected
//! store; the service keeps no state of its own.

use chrono::Datelike;
use tracing::{debug, info};

use crate::activity::validator::{ensure_no_same_day, resolve_performed_at};
use crate::clock::Clock;
use crate::cycle::CycleRef;
use crate::error::{BusinessRuleError, CoreError, Result};
use crate::model::{Activity, ActivityPatch, ActivitySubmission, NewActivity, Program, User};
use crate::storage::{ActivityStore, Directory};

/// Outcome of logging or amending an activity: the record id plus the
/// member's month-to-date count, for immediate feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySummary {
    pub id: i64,
    pub count_month: i64,
}

pub struct ActivityService<'a> {
    store: &'a dyn ActivityStore,
    directory: &'a dyn Directory,
    clock: &'a dyn Clock,
}

impl<'a> ActivityService<'a> {
    pub fn new(
        store: &'a dyn ActivityStore,
        directory: &'a dyn Directory,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            store,
            directory,
            clock,
        }
    }

    /// Log an activity against the program bound to `channel`.
    ///
    /// Unknown members are registered on the fly with their slack id as the
    /// display name.
    pub fn log_activity(
        &self,
        channel: &str,
        slack_id: &str,
        submission: ActivitySubmission,
    ) -> Result<ActivitySummary> {
        let user = self.ensure_user(slack_id)?;
        let program = self.resolve_channel_program(channel)?;
        let performed_at =
            resolve_performed_at(&program, submission.performed_at, self.clock.now())?;

        let day = performed_at.day();
        let existing = self.store.find_same_day(program.id, user.id, day, None)?;
        ensure_no_same_day(existing.as_ref(), day)?;

        let id = self.store.insert_activity(&NewActivity {
            user_id: user.id,
            program_id: program.id,
            description: submission.description,
            evidence_url: submission.evidence_url,
            performed_at: performed_at.clone(),
        })?;

        let count_month = self
            .store
            .count_for_user_in_month(user.id, day.year(), day.month())?;

        info!(
            activity_id = id,
            slack_id,
            program = %program.name,
            day = %day,
            count_month,
            "activity logged"
        );

        Ok(ActivitySummary { id, count_month })
    }

    /// Apply a partial update to the member's own activity.
    ///
    /// A changed `performed_at` is re-validated against the program window
    /// and the per-day rule, excluding the record itself from the same-day
    /// lookup.
    pub fn amend_activity(
        &self,
        id: i64,
        slack_id: &str,
        mut patch: ActivityPatch,
    ) -> Result<ActivitySummary> {
        let mut activity = self
            .store
            .find_by_id_for_user(id, slack_id)?
            .ok_or_else(|| CoreError::not_found("Activity", id))?;

        let program = self
            .directory
            .find_program_by_id(activity.program_id)?
            .ok_or_else(|| CoreError::not_found("Program", activity.program_id))?;

        if let Some(candidate) = patch.performed_at.take() {
            if candidate != activity.performed_at {
                let resolved =
                    resolve_performed_at(&program, Some(candidate), self.clock.now())?;
                let day = resolved.day();
                let existing =
                    self.store
                        .find_same_day(program.id, activity.user_id, day, Some(id))?;
                ensure_no_same_day(existing.as_ref(), day)?;
                patch.performed_at = Some(resolved);
            }
        }

        patch.merge_into(&mut activity);
        self.store.update_activity(&activity)?;

        let day = activity.performed_at.day();
        let count_month =
            self.store
                .count_for_user_in_month(activity.user_id, day.year(), day.month())?;

        info!(activity_id = id, slack_id, "activity amended");

        Ok(ActivitySummary { id, count_month })
    }

    /// Remove the member's own activity.
    ///
    /// Only allowed while the activity's month is the current or previous
    /// calendar month.
    pub fn remove_activity(&self, id: i64, slack_id: &str) -> Result<()> {
        let activity = self
            .store
            .find_by_id_for_user(id, slack_id)?
            .ok_or_else(|| CoreError::not_found("Activity", id))?;

        let current = CycleRef::of(self.clock.now().date_naive());
        let day = activity.performed_at.day();
        if !current.contains(day) && !current.previous().contains(day) {
            return Err(BusinessRuleError::EditWindowClosed.into());
        }

        self.store.delete_activity(id)?;
        debug!(activity_id = id, slack_id, "activity removed");
        Ok(())
    }

    /// The member's activities in a cycle, across programs.
    pub fn activities_for_user(&self, slack_id: &str, cycle: &str) -> Result<Vec<Activity>> {
        let user = self.require_user(slack_id)?;
        let cycle = CycleRef::parse(cycle)?;
        Ok(self
            .store
            .find_for_user_in_month(user.id, cycle.year, cycle.month)?)
    }

    /// The member's activities in a cycle, restricted to a channel's program.
    pub fn activities_for_user_in_channel(
        &self,
        channel: &str,
        slack_id: &str,
        cycle: &str,
    ) -> Result<Vec<Activity>> {
        let user = self.require_user(slack_id)?;
        let cycle = CycleRef::parse(cycle)?;
        Ok(self.store.find_for_user_in_channel_month(
            user.id,
            channel,
            cycle.year,
            cycle.month,
        )?)
    }

    /// The member's activity, or `NotFound` when the id does not exist or
    /// belongs to someone else.
    pub fn activity_for_user(&self, id: i64, slack_id: &str) -> Result<Activity> {
        self.store
            .find_by_id_for_user(id, slack_id)?
            .ok_or_else(|| CoreError::not_found("Activity", id))
    }

    fn ensure_user(&self, slack_id: &str) -> Result<User> {
        if let Some(user) = self.directory.find_user_by_slack_id(slack_id)? {
            return Ok(user);
        }
        let user = self.directory.create_user(slack_id, slack_id)?;
        debug!(slack_id, user_id = user.id, "member registered on first activity");
        Ok(user)
    }

    fn require_user(&self, slack_id: &str) -> Result<User> {
        self.directory
            .find_user_by_slack_id(slack_id)?
            .ok_or_else(|| CoreError::not_found("User", slack_id))
    }

    fn resolve_channel_program(&self, channel: &str) -> Result<Program> {
        let mut programs = self.directory.find_programs_by_channel(channel)?;
        match programs.len() {
            0 => Err(CoreError::not_found("Program", channel)),
            1 => Ok(programs.remove(0)),
            count => Err(BusinessRuleError::AmbiguousChannel {
                channel: channel.to_string(),
                count,
            }
            .into()),
        }
    }
}
