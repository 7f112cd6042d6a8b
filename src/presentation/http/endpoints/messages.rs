use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, param::Query, payload::Json};

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags, internal_error},
    mappers::{map_message, map_report},
    requests::DispatchRequestDto,
    responses::{DispatchReportDto, MessageDto},
};

pub const DEFAULT_SENT_PAGE_SIZE: u32 = 50;

#[derive(Clone)]
pub struct MessagesEndpoints {
    state: Arc<ApiState>,
}

impl MessagesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl MessagesEndpoints {
    /// Sent messages, most recently sent first.
    #[oai(
        path = "/messages/sent",
        method = "get",
        tag = EndpointsTags::Messages,
    )]
    pub async fn list_sent(
        &self,
        limit: Query<Option<u32>>,
        offset: Query<Option<u32>>,
    ) -> PoemResult<Json<Vec<MessageDto>>> {
        let limit = match limit.0 {
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_SENT_PAGE_SIZE,
        };

        let messages = self
            .state
            .dispatch_service
            .list_sent_messages(limit, offset.0.unwrap_or(0))
            .await
            .map_err(internal_error)?;

        Ok(Json(messages.iter().map(map_message).collect()))
    }

    /// Runs one dispatch cycle right away, waiting for any cycle in flight.
    #[oai(
        path = "/messages/dispatch",
        method = "post",
        tag = EndpointsTags::Messages,
    )]
    pub async fn dispatch(
        &self,
        request: Json<DispatchRequestDto>,
    ) -> PoemResult<Json<DispatchReportDto>> {
        let report = self
            .state
            .scheduler
            .dispatch_now(request.limit)
            .await
            .map_err(internal_error)?;

        Ok(Json(map_report(&report)))
    }
}
