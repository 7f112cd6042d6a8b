use std::sync::Arc;

use poem::Route;
use poem_openapi::OpenApiService;

use crate::presentation::http::endpoints::{
    health::HealthEndpoints,
    messages::MessagesEndpoints,
    root::ApiState,
    scheduler::SchedulerEndpoints,
};

pub mod endpoints;
pub mod mappers;
pub mod requests;
pub mod responses;

pub const API_TITLE: &str = "Auto Sender API";

/// Mounts the API under `/api` and the Swagger UI at `/`.
pub fn build_app(state: Arc<ApiState>, server_url: &str) -> Route {
    let api_service = OpenApiService::new(
        (
            HealthEndpoints,
            SchedulerEndpoints::new(state.clone()),
            MessagesEndpoints::new(state),
        ),
        API_TITLE,
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("{server_url}/api"));
    let ui = api_service.swagger_ui();

    Route::new().nest("/api", api_service).nest("/", ui)
}
