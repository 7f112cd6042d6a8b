use thiserror::Error;

use crate::domain::models::MessageId;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("message {0} not found")]
    NotFound(MessageId),
    #[error("message {id} is already {status}")]
    InvalidTransition { id: MessageId, status: &'static str },
}
