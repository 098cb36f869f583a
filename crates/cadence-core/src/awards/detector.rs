//! Monthly goal-completion detection.

use crate::cycle::CycleRef;
use crate::error::Result;
use crate::storage::ActivityStore;

/// Activities required within one cycle to earn an award.
pub const MONTHLY_GOAL: i64 = 12;

/// Finds the users who met the participation goal for a cycle.
pub struct CompletionDetector<'a> {
    activities: &'a dyn ActivityStore,
}

impl<'a> CompletionDetector<'a> {
    pub fn new(activities: &'a dyn ActivityStore) -> Self {
        Self { activities }
    }

    /// User ids with at least `goal` activities in the program during the
    /// cycle's calendar month. An empty result is a normal outcome.
    pub fn find_completed_users(
        &self,
        program_id: i64,
        cycle: CycleRef,
        goal: i64,
    ) -> Result<Vec<i64>> {
        Ok(self
            .activities
            .users_completed_in_month(program_id, cycle.year, cycle.month, goal)?)
    }
}
