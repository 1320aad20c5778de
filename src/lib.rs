#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod digest;
pub mod error;
pub mod exec;
pub mod notify;
pub mod scheduler;
pub mod telemetry;
pub mod types;
pub mod util;

pub type Result<T> = std::result::Result<T, error::Error>;
