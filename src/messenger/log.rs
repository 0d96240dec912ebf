use super::Messenger;
use crate::reminder::ReminderMessage;
use async_trait::async_trait;
use tracing::info;

/// Writes summaries to the log instead of sending them anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMessenger;

#[async_trait]
impl Messenger for LogMessenger {
    fn id(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, message: &ReminderMessage) -> anyhow::Result<()> {
        info!(
            technician = %message.technician_id,
            overdue = message.overdue_count,
            body = %message.body,
            "overdue summary"
        );
        Ok(())
    }
}
