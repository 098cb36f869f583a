//! Award lifecycle: completion detection, idempotent batch creation,
//! notification, and the cycle-close orchestration that ties them together.

pub mod batch;
pub mod close;
pub mod detector;
pub mod notify;

pub use batch::{AchievementBatchEngine, BatchOutcome};
pub use close::CycleCloser;
pub use detector::{CompletionDetector, MONTHLY_GOAL};
pub use notify::{NotificationDispatcher, NotifyOutcome};
