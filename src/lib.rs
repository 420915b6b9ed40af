pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::http_transport::HttpProcedureTransport;
pub use app::VoucherApp;
pub use config::AppConfig;
pub use core::gateway::{GatewayState, ProcedureGateway};
pub use utils::error::{Result, VoucherError};
