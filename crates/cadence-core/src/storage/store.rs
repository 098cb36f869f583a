//! Store traits consumed by the engine components.
//!
//! Components receive these as constructor arguments; [`super::Database`]
//! implements all of them over SQLite. Every query is scoped by program
//! and/or user so no operation can observe another program's records.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::DatabaseError;
use crate::model::{Activity, NewActivity, NewProgram, PendingAward, Program, User};

/// Persistence operations for activities.
pub trait ActivityStore {
    fn insert_activity(&self, activity: &NewActivity) -> Result<i64, DatabaseError>;

    /// Fetch an activity only if it belongs to the given member.
    fn find_by_id_for_user(&self, id: i64, slack_id: &str)
        -> Result<Option<Activity>, DatabaseError>;

    /// The activity already registered for this user/program/day, if any.
    /// `exclude_id` lets an update skip its own record.
    fn find_same_day(
        &self,
        program_id: i64,
        user_id: i64,
        day: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<Option<Activity>, DatabaseError>;

    /// Activities logged by a user in a calendar month, across programs.
    fn count_for_user_in_month(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<i64, DatabaseError>;

    fn find_for_user_in_month(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<Activity>, DatabaseError>;

    fn find_for_user_in_channel_month(
        &self,
        user_id: i64,
        slack_channel: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<Activity>, DatabaseError>;

    /// Users whose activity count in the program and month reached `goal`.
    fn users_completed_in_month(
        &self,
        program_id: i64,
        year: i32,
        month: u32,
        goal: i64,
    ) -> Result<Vec<i64>, DatabaseError>;

    fn update_activity(&self, activity: &Activity) -> Result<(), DatabaseError>;

    fn delete_activity(&self, id: i64) -> Result<(), DatabaseError>;
}

/// Persistence operations for achievements.
pub trait AwardStore {
    /// Of `user_ids`, the subset already awarded for (program, cycle).
    fn existing_award_user_ids(
        &self,
        program_id: i64,
        cycle_reference: &str,
        user_ids: &[i64],
    ) -> Result<HashSet<i64>, DatabaseError>;

    /// Insert one award per user id as a single atomic batch.
    ///
    /// A uniqueness violation on (user, program, cycle) means the award
    /// already exists and must be skipped, not treated as a failure.
    /// Returns the user ids actually inserted.
    fn insert_awards(
        &self,
        program_id: i64,
        cycle_reference: &str,
        user_ids: &[i64],
    ) -> Result<Vec<i64>, DatabaseError>;

    /// Awards for (program, cycle) that have not been announced yet.
    fn pending_awards(
        &self,
        program_id: i64,
        cycle_reference: &str,
    ) -> Result<Vec<PendingAward>, DatabaseError>;

    /// Flip `is_notified` for the given awards in one update.
    fn mark_notified(&self, achievement_ids: &[i64]) -> Result<(), DatabaseError>;
}

/// Program and user lookup/registration.
pub trait Directory {
    fn find_program_by_id(&self, id: i64) -> Result<Option<Program>, DatabaseError>;

    fn find_program_by_name(&self, name: &str) -> Result<Option<Program>, DatabaseError>;

    fn find_program_by_name_and_channel(
        &self,
        name: &str,
        slack_channel: &str,
    ) -> Result<Option<Program>, DatabaseError>;

    fn find_programs_by_channel(
        &self,
        slack_channel: &str,
    ) -> Result<Vec<Program>, DatabaseError>;

    fn all_programs(&self) -> Result<Vec<Program>, DatabaseError>;

    fn insert_program(&self, program: &NewProgram) -> Result<Program, DatabaseError>;

    fn update_program(&self, program: &Program) -> Result<(), DatabaseError>;

    fn find_user_by_slack_id(&self, slack_id: &str) -> Result<Option<User>, DatabaseError>;

    fn create_user(&self, slack_id: &str, display_name: &str) -> Result<User, DatabaseError>;

    fn all_users(&self) -> Result<Vec<User>, DatabaseError>;

    /// Display names for the given user ids, in id order.
    fn display_names(&self, user_ids: &[i64]) -> Result<Vec<String>, DatabaseError>;
}
