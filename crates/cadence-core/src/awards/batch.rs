//! Idempotent batch creation of awards.

use tracing::{debug, info, warn};

use crate::cycle::CycleRef;
use crate::error::Result;
use crate::storage::{AwardStore, Directory};

/// Result of one batch pass: how many awards were created and for whom.
/// Users who already held an award for the cycle are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub total_created: usize,
    pub program_name: String,
    pub cycle_reference: String,
    pub users: Vec<String>,
}

/// Creates awards for a set of users, exactly once per user/program/cycle.
pub struct AchievementBatchEngine<'a> {
    awards: &'a dyn AwardStore,
    directory: &'a dyn Directory,
}

impl<'a> AchievementBatchEngine<'a> {
    pub fn new(awards: &'a dyn AwardStore, directory: &'a dyn Directory) -> Self {
        Self { awards, directory }
    }

    /// Create one award per user id, skipping users already awarded for the
    /// cycle. The write is a single atomic batch; retrying with the same
    /// arguments creates nothing on the second pass.
    pub fn create_batch(
        &self,
        program_id: i64,
        program_name: &str,
        cycle: CycleRef,
        user_ids: &[i64],
    ) -> Result<BatchOutcome> {
        let cycle_reference = cycle.to_string();
        info!(
            program_id,
            cycle = %cycle_reference,
            candidates = user_ids.len(),
            "starting achievement batch"
        );

        let existing =
            self.awards
                .existing_award_user_ids(program_id, &cycle_reference, user_ids)?;
        if !existing.is_empty() {
            debug!(skipped = existing.len(), "awards already exist for some users");
        }

        let new_user_ids: Vec<i64> = user_ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect();

        let created = if new_user_ids.is_empty() {
            Vec::new()
        } else {
            self.awards
                .insert_awards(program_id, &cycle_reference, &new_user_ids)?
        };

        // Name resolution is best-effort: a failed lookup must not undo a
        // committed batch.
        let users = if created.is_empty() {
            Vec::new()
        } else {
            match self.directory.display_names(&created) {
                Ok(names) => names,
                Err(err) => {
                    warn!(error = %err, "display name lookup failed after batch commit");
                    Vec::new()
                }
            }
        };

        info!(
            created = created.len(),
            skipped = existing.len(),
            "achievement batch completed"
        );

        Ok(BatchOutcome {
            total_created: created.len(),
            program_name: program_name.to_string(),
            cycle_reference,
            users,
        })
    }
}
