//! HTTP API: server wiring, routing, and request/response mapping for plants.

pub mod app;
pub mod middleware;
