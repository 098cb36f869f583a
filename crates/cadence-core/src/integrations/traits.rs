use crate::error::NotificationError;

/// Outbound chat transport.
///
/// Implementations are stateless between calls; the dispatcher treats a
/// returned error as "nothing was delivered" and leaves its awards
/// unmarked for retry.
pub trait Notifier: Send + Sync {
    /// Deliver one message to a channel.
    fn send_message(&self, channel: &str, text: &str) -> Result<(), NotificationError>;
}
