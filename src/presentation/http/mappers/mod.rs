use crate::{
    application::services::DispatchReport,
    domain::models::{Message, MessageStatus},
    presentation::{
        http::responses::{DispatchReportDto, MessageDto},
        models::MessageStatusDto,
    },
};

pub fn map_message(message: &Message) -> MessageDto {
    MessageDto {
        id: message.id,
        recipient: message.recipient.clone(),
        content: message.content.clone(),
        status: MessageStatusDto::from(&message.status),
        external_message_id: message.external_message_id.clone(),
        error: extract_error(&message.status),
        sent_at: message.sent_at.map(|at| at.to_rfc3339()),
        created_at: message.created_at.to_rfc3339(),
        updated_at: message.updated_at.to_rfc3339(),
    }
}

pub fn map_report(report: &DispatchReport) -> DispatchReportDto {
    DispatchReportDto {
        fetched: report.fetched as u32,
        sent: report.sent as u32,
        failed: report.failed as u32,
    }
}

fn extract_error(status: &MessageStatus) -> Option<String> {
    match status {
        MessageStatus::Failed { reason } => Some(reason.clone()),
        _ => None,
    }
}
