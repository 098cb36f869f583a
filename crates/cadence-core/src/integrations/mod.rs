//! External chat integrations.

pub mod slack;
pub mod traits;

pub use slack::SlackNotifier;
pub use traits::Notifier;
