use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, payload::Json};
use tracing::info;

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags, bad_request},
    requests::SchedulerActionRequestDto,
    responses::{SchedulerActionResponseDto, SchedulerStateDto},
};

#[derive(Clone)]
pub struct SchedulerEndpoints {
    state: Arc<ApiState>,
}

impl SchedulerEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl SchedulerEndpoints {
    /// Starts or stops the periodic dispatch loop.
    #[oai(
        path = "/scheduler",
        method = "post",
        tag = EndpointsTags::Scheduler,
    )]
    pub async fn control(
        &self,
        request: Json<SchedulerActionRequestDto>,
    ) -> PoemResult<Json<SchedulerActionResponseDto>> {
        let action = request.action.trim().to_ascii_lowercase();
        info!(action = %action, "scheduler control requested");

        let status = match action.as_str() {
            "start" => {
                self.state.scheduler.start().await;
                "started"
            }
            "stop" => {
                self.state.scheduler.stop().await;
                "stopped"
            }
            _ => return Err(bad_request("invalid action, use 'start' or 'stop'")),
        };

        Ok(Json(SchedulerActionResponseDto {
            status: status.to_string(),
        }))
    }

    #[oai(
        path = "/scheduler",
        method = "get",
        tag = EndpointsTags::Scheduler,
    )]
    pub async fn status(&self) -> Json<SchedulerStateDto> {
        Json(SchedulerStateDto {
            running: self.state.scheduler.is_running().await,
        })
    }
}
