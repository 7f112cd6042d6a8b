use poem_openapi::Object;

use crate::presentation::models::MessageStatusDto;

#[derive(Object)]
pub struct SchedulerActionResponseDto {
    pub status: String,
}

#[derive(Object)]
pub struct SchedulerStateDto {
    pub running: bool,
}

#[derive(Object)]
pub struct DispatchReportDto {
    pub fetched: u32,
    pub sent: u32,
    pub failed: u32,
}

#[derive(Object)]
#[oai(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: i64,
    pub recipient: String,
    pub content: String,
    pub status: MessageStatusDto,
    pub external_message_id: Option<String>,
    pub error: Option<String>,
    pub sent_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
