use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use redis::aio::MultiplexedConnection;
use tracing::debug;

use crate::domain::{models::MessageId, repositories::SentMessageCache};

pub const SENT_MESSAGE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Mirrors sent messages into `message:{id}` hashes.
#[derive(Clone)]
pub struct RedisSentMessageCache {
    conn: MultiplexedConnection,
}

impl RedisSentMessageCache {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

fn sent_message_key(id: MessageId) -> String {
    format!("message:{id}")
}

fn sent_message_fields(external_message_id: &str, sent_at: DateTime<Utc>) -> [(&'static str, String); 2] {
    [
        ("messageId", external_message_id.to_string()),
        ("sentAt", sent_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    ]
}

#[async_trait]
impl SentMessageCache for RedisSentMessageCache {
    async fn cache_sent_message(
        &self,
        id: MessageId,
        external_message_id: &str,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let key = sent_message_key(id);
        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .hset_multiple(&key, &sent_message_fields(external_message_id, sent_at))
            .ignore()
            .expire(&key, SENT_MESSAGE_TTL.as_secs() as usize)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!(message_id = id, key = %key, "cached sent message");
        Ok(())
    }
}
