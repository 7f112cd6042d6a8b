use poem_openapi::Object;

use crate::application::SchedulerConfig;

#[derive(Object, Debug)]
pub struct SchedulerActionRequestDto {
    /// `start` or `stop`
    pub action: String,
}

#[derive(Object, Debug)]
pub struct DispatchRequestDto {
    #[oai(default = "default_dispatch_limit", validator(minimum(value = "1"), maximum(value = "100")))]
    pub limit: u32,
}

fn default_dispatch_limit() -> u32 {
    SchedulerConfig::default().batch_size
}
