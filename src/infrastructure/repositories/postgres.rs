use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};

use crate::domain::{
    errors::DomainError,
    models::{Message, MessageId, MessageStatus},
    repositories::MessageRepository,
};

pub type PgPool = Pool<Postgres>;

#[derive(Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn get_pending_messages(&self, limit: u32) -> anyhow::Result<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, recipient, content, status, external_message_id, error_text,
                   sent_at, created_at, updated_at
            FROM messages
            WHERE status = 'pending'
            ORDER BY created_at ASC, id ASC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Message::try_from).collect()
    }

    async fn mark_as_sent(
        &self,
        id: MessageId,
        external_message_id: &str,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = 'sent',
                external_message_id = $2,
                sent_at = $3,
                updated_at = $4
            WHERE id = $1
              AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(external_message_id)
        .bind(sent_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(id).into());
        }
        Ok(())
    }

    async fn mark_as_failed(&self, id: MessageId, reason: &str) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = 'failed',
                error_text = $2,
                updated_at = $3
            WHERE id = $1
              AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(reason)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(id).into());
        }
        Ok(())
    }

    async fn list_sent_messages(&self, limit: u32, offset: u32) -> anyhow::Result<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, recipient, content, status, external_message_id, error_text,
                   sent_at, created_at, updated_at
            FROM messages
            WHERE status = 'sent'
            ORDER BY sent_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Message::try_from).collect()
    }
}

#[derive(FromRow)]
struct MessageRecord {
    id: i64,
    recipient: String,
    content: String,
    status: String,
    external_message_id: Option<String>,
    error_text: Option<String>,
    sent_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MessageRecord> for Message {
    type Error = anyhow::Error;

    fn try_from(value: MessageRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            recipient: value.recipient,
            content: value.content,
            status: message_status_from_fields(&value.status, value.error_text)?,
            external_message_id: value.external_message_id,
            sent_at: value.sent_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

fn message_status_from_fields(status: &str, reason: Option<String>) -> anyhow::Result<MessageStatus> {
    Ok(match status {
        "pending" => MessageStatus::Pending,
        "sent" => MessageStatus::Sent,
        "failed" => MessageStatus::Failed {
            reason: reason.unwrap_or_else(|| "failed".to_string()),
        },
        other => anyhow::bail!("unknown message status {other}"),
    })
}
