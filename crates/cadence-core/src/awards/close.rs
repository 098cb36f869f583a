//! Cycle-close orchestration.

use tracing::{debug, info};

use crate::awards::batch::{AchievementBatchEngine, BatchOutcome};
use crate::awards::detector::{CompletionDetector, MONTHLY_GOAL};
use crate::cycle::CycleRef;
use crate::error::{CoreError, Result};
use crate::storage::Directory;

/// Composes completion detection and batch award creation into one
/// cycle-close operation.
///
/// Holds no state between invocations; each call is a fresh
/// read-compute-write pass, safe to repeat for the same program and cycle.
pub struct CycleCloser<'a> {
    directory: &'a dyn Directory,
    detector: CompletionDetector<'a>,
    engine: AchievementBatchEngine<'a>,
    goal: i64,
}

impl<'a> CycleCloser<'a> {
    pub fn new(
        directory: &'a dyn Directory,
        detector: CompletionDetector<'a>,
        engine: AchievementBatchEngine<'a>,
    ) -> Self {
        Self {
            directory,
            detector,
            engine,
            goal: MONTHLY_GOAL,
        }
    }

    /// Override the participation goal (deployment config or tests).
    pub fn with_goal(mut self, goal: i64) -> Self {
        self.goal = goal;
        self
    }

    /// Close a cycle for the named program.
    ///
    /// Returns `Ok(None)` when nobody met the goal: closing an empty cycle
    /// is a valid terminal state, not an error.
    pub fn close_cycle(
        &self,
        program_name: &str,
        cycle: CycleRef,
    ) -> Result<Option<BatchOutcome>> {
        info!(program = program_name, cycle = %cycle, "closing program cycle");

        let program = self
            .directory
            .find_program_by_name(program_name)?
            .ok_or_else(|| CoreError::not_found("Program", program_name))?;

        let user_ids = self
            .detector
            .find_completed_users(program.id, cycle, self.goal)?;

        if user_ids.is_empty() {
            debug!(program = program_name, cycle = %cycle, "no users met the goal");
            return Ok(None);
        }

        self.engine
            .create_batch(program.id, &program.name, cycle, &user_ids)
            .map(Some)
    }
}
