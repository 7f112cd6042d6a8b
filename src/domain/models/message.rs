use chrono::{DateTime, Utc};

use crate::domain::errors::DomainError;

pub type MessageId = i64;

/// Longest deliverable content, counted in UTF-8 bytes.
pub const MAX_CONTENT_LENGTH: usize = 160;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageStatus {
    Pending,
    Sent,
    Failed { reason: String },
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Sent => "sent",
            MessageStatus::Failed { .. } => "failed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, MessageStatus::Pending)
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub recipient: String,
    pub content: String,
    pub status: MessageStatus,
    pub external_message_id: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    pub fn new_pending(id: MessageId, recipient: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            recipient,
            content,
            status: MessageStatus::Pending,
            external_message_id: None,
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    pub fn exceeds_max_length(&self) -> bool {
        self.content_length() > MAX_CONTENT_LENGTH
    }

    pub fn mark_sent(
        &mut self,
        external_message_id: String,
        sent_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = MessageStatus::Sent;
        self.external_message_id = Some(external_message_id);
        self.sent_at = Some(sent_at);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = MessageStatus::Failed {
            reason: reason.into(),
        };
        self.updated_at = Utc::now();
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.status.is_pending() {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                id: self.id,
                status: self.status.as_str(),
            })
        }
    }
}
