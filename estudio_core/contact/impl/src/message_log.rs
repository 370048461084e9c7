use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use estudio_core_contact_contracts::ContactMessageLog;
use estudio_di::Build;
use estudio_models::contact::{ContactMessage, ContactMessageId};
use tracing::debug;

/// Keeps every accepted message in memory for the lifetime of the process.
/// Not a durable store, just enough to inspect recent traffic.
#[derive(Debug, Clone, Default, Build)]
pub struct InMemoryContactMessageLog {
    #[state]
    state: Arc<State>,
}

#[derive(Debug, Default)]
struct State {
    messages: Mutex<HashMap<ContactMessageId, ContactMessage>>,
}

impl ContactMessageLog for InMemoryContactMessageLog {
    async fn record(&self, id: ContactMessageId, message: &ContactMessage) -> anyhow::Result<()> {
        let mut messages = self
            .state
            .messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        messages.insert(id, message.clone());
        debug!(%id, total = messages.len(), "recorded contact message");
        Ok(())
    }
}

impl InMemoryContactMessageLog {
    pub fn get(&self, id: ContactMessageId) -> Option<ContactMessage> {
        self.state
            .messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.state
            .messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use estudio_models::contact::ContactFormData;
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn records_and_reads_back() {
        // Arrange
        let form = ContactFormData {
            name: "Yuki Tanaka".into(),
            email: "yuki@example.jp".into(),
            subject: Some("見積もり".into()),
            message: "ウェブサイトの見積もりをお願いします。".into(),
            website: String::new(),
        };
        let message = ContactMessage::new(
            &form,
            Utc.with_ymd_and_hms(2025, 3, 2, 9, 30, 0).unwrap(),
        )
        .unwrap();
        let id = ContactMessageId::from(Uuid::from_u128(1));

        let sut = InMemoryContactMessageLog::default();

        // Act
        sut.record(id, &message).await.unwrap();

        // Assert
        assert_eq!(sut.get(id), Some(message));
        assert_eq!(sut.len(), 1);
        assert_eq!(sut.get(ContactMessageId::from(Uuid::from_u128(2))), None);
    }
}
