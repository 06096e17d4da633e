//! # Keystone HTTP API
//!
//! Actix-web surface over the credential flow and session lifecycle.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
