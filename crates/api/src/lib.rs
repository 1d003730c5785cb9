//! HTTP API: form actions, routing, and request/response mapping.

pub mod actions;
pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
