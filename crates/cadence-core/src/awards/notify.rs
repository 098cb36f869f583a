//! Announcement of earned awards to the program's channel.

use tracing::info;

use crate::cycle::CycleRef;
use crate::error::{CoreError, Result};
use crate::integrations::Notifier;
use crate::model::PendingAward;
use crate::storage::{AwardStore, Directory};

/// Result of one notification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOutcome {
    pub total_notified: usize,
    pub message: String,
    pub users: Vec<String>,
}

/// Sends one congratulation message per (program, cycle) covering every
/// award not yet announced, then marks those awards notified.
pub struct NotificationDispatcher<'a> {
    awards: &'a dyn AwardStore,
    directory: &'a dyn Directory,
    notifier: &'a dyn Notifier,
}

impl<'a> NotificationDispatcher<'a> {
    pub fn new(
        awards: &'a dyn AwardStore,
        directory: &'a dyn Directory,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            awards,
            directory,
            notifier,
        }
    }

    /// Announce pending awards for a program and cycle.
    ///
    /// Nothing pending is a successful no-op and makes no external call.
    /// Awards are marked notified only after the send succeeds, so a failed
    /// delivery leaves the whole batch eligible for retry (at-least-once).
    pub fn notify(&self, program_name: &str, cycle: CycleRef) -> Result<NotifyOutcome> {
        let program = self
            .directory
            .find_program_by_name(program_name)?
            .ok_or_else(|| CoreError::not_found("Program", program_name))?;

        let cycle_reference = cycle.to_string();
        let pending = self.awards.pending_awards(program.id, &cycle_reference)?;

        if pending.is_empty() {
            info!(
                program = program_name,
                cycle = %cycle_reference,
                "no awards pending notification"
            );
            return Ok(NotifyOutcome {
                total_notified: 0,
                message: "No pending achievements to notify.".to_string(),
                users: Vec::new(),
            });
        }

        let (message, users) = build_message(&pending, &program.name, cycle);
        self.notifier.send_message(&program.slack_channel, &message)?;

        let ids: Vec<i64> = pending.iter().map(|award| award.achievement_id).collect();
        self.awards.mark_notified(&ids)?;

        info!(
            program = program_name,
            cycle = %cycle_reference,
            total_notified = pending.len(),
            "award notifications sent"
        );

        Ok(NotifyOutcome {
            total_notified: pending.len(),
            message,
            users,
        })
    }
}

/// One message mentioning every pending user.
fn build_message(
    pending: &[PendingAward],
    program_name: &str,
    cycle: CycleRef,
) -> (String, Vec<String>) {
    let mentions: Vec<String> = pending
        .iter()
        .map(|award| format!("<@{}>", award.slack_id))
        .collect();
    let users: Vec<String> = pending
        .iter()
        .map(|award| award.display_name.clone())
        .collect();

    let message = format!(
        "{}! Congratulations on completing the {} challenge for cycle {}!",
        mentions.join(", "),
        program_name,
        cycle
    );

    (message, users)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_mentions_every_pending_user() {
        let pending = vec![
            PendingAward {
                achievement_id: 1,
                slack_id: "U111".into(),
                display_name: "Ana".into(),
            },
            PendingAward {
                achievement_id: 2,
                slack_id: "U222".into(),
                display_name: "Bruno".into(),
            },
        ];
        let cycle = CycleRef::parse("2025-01").unwrap();

        let (message, users) = build_message(&pending, "Cycle Challenge", cycle);
        assert_eq!(
            message,
            "<@U111>, <@U222>! Congratulations on completing the Cycle Challenge challenge for cycle 2025-01!"
        );
        assert_eq!(users, vec!["Ana".to_string(), "Bruno".to_string()]);
    }
}
