use std::sync::Arc;

use poem::http::StatusCode;
use poem_openapi::Tags;

use crate::application::{Scheduler, services::DispatchService};

#[derive(Clone)]
pub struct ApiState {
    pub scheduler: Arc<Scheduler>,
    pub dispatch_service: Arc<DispatchService>,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Scheduler,
    Messages,
}

pub(crate) fn internal_error(err: anyhow::Error) -> poem::Error {
    poem::Error::from_string(format!("{err:#}"), StatusCode::INTERNAL_SERVER_ERROR)
}

pub(crate) fn bad_request(message: impl Into<String>) -> poem::Error {
    poem::Error::from_string(message, StatusCode::BAD_REQUEST)
}
