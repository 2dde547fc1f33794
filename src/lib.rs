//! # Todo API Backend Library
//!
//! A TODO-item service exposing CRUD and bulk operations over HTTP. Requests flow through
//! three layers:
//!
//! route → service (validation, business rules) → storage (swappable backend)
//!
//! ## Architecture
//!
//! The application is built using:
//! - **Axum**: HTTP server and routing
//! - **SQLx**: optional SQLite persistence
//! - **Tokio**: async runtime; the in-memory store is guarded by a single `tokio` mutex
//! - **Serde**: JSON request and response bodies
//!
//! ## Core Components
//!
//! - [`app`]: Router assembly with middleware, CORS and static files
//! - [`config`]: Layered configuration (embedded defaults, files, environment)
//! - [`db`]: SQLite pool construction and schema initialization
//! - [`error`]: Error taxonomy and its mapping to HTTP responses
//! - [`middleware`]: Security headers and request timing
//! - [`routes`]: HTTP endpoint handlers
//! - [`service`]: Validation and orchestration over storage
//! - [`state`]: Shared application state and backend selection
//! - [`storage`]: Storage contract plus in-memory and SQLite implementations
//! - [`types`]: Data transfer objects

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod state;
pub mod storage;
pub mod types;

#[cfg(test)]
mod tests;
