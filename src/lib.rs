pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
