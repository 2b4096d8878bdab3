//! Library crate for courtside-back, exposing modules for binaries and integration tests.

/// Application configuration.
pub mod config;
/// Access to the upstream platform API.
pub mod dao;
mod dto;
mod error;
/// HTTP routers and handlers.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Domain model and shared application state.
pub mod state;

#[cfg(test)]
mod test_support;
