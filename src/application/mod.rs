pub mod scheduler;
pub mod services;

pub use scheduler::{Scheduler, SchedulerConfig};
