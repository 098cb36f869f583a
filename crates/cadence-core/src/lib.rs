//! # Cadence Core Library
//!
//! This library provides the core business logic for Cadence, a tracker for
//! time-boxed incentive programs: members log dated activities against a
//! program, and at the close of each monthly cycle the engine awards
//! everyone who met the participation goal, exactly once per
//! user/program/cycle, then announces the awards in the program's channel.
//!
//! ## Architecture
//!
//! - **Activity**: admission rules (program window, no future dates, one
//!   activity per day) and the member-facing logging service
//! - **Awards**: completion detection, idempotent batch award creation,
//!   notification dispatch, and cycle-close orchestration
//! - **Storage**: SQLite-backed stores and TOML-based configuration
//! - **Integrations**: outbound chat transport (Slack)
//!
//! Components take their collaborators (stores, notifier, clock) as
//! constructor arguments; the engine holds no long-lived state of its own.
//!
//! ## Key Components
//!
//! - [`ActivityService`]: validated activity logging
//! - [`CycleCloser`]: one-shot cycle close (detect completions, create awards)
//! - [`NotificationDispatcher`]: announce pending awards, at-least-once
//! - [`Database`]: SQLite persistence implementing the store traits

pub mod activity;
pub mod awards;
pub mod clock;
pub mod cycle;
pub mod error;
pub mod integrations;
pub mod model;
pub mod registry;
pub mod storage;

pub use activity::service::ActivitySummary;
pub use activity::ActivityService;
pub use awards::{
    AchievementBatchEngine, BatchOutcome, CompletionDetector, CycleCloser,
    NotificationDispatcher, NotifyOutcome, MONTHLY_GOAL,
};
pub use clock::{Clock, SystemClock};
pub use cycle::CycleRef;
pub use error::{
    BusinessRuleError, CoreError, DatabaseError, NotificationError, Result, ValidationError,
};
pub use integrations::{Notifier, SlackNotifier};
pub use model::{
    Achievement, Activity, ActivityPatch, ActivitySubmission, EventTime, NewActivity,
    NewProgram, PendingAward, Program, ProgramPatch, User,
};
pub use registry::{ProgramRegistry, UserRegistry};
pub use storage::{ActivityStore, AwardStore, Config, Database, Directory};
