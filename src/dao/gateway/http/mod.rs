mod client;
mod config;

pub use client::HttpGateway;
pub use config::GatewayConfig;
