//! Recommendation gateway.
//!
//! Protected endpoints validate the caller's bearer token against an identity
//! provider and forward the raw `Authorization` value verbatim to the internal
//! itinerary service.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
