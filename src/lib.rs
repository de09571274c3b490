//! Marketing Copy Relay
//!
//! This library provides the core functionality for the copymill system:
//! a client for an external generation engine reached over a webhook, a
//! normalizer that turns the engine's loosely structured replies into
//! content records, a version ledger for revisions, and the HTTP relay
//! that receives and serves asynchronous job results.

pub mod app_state;
pub mod config;
pub mod db;
pub mod models;
pub mod parser;
pub mod routes;
pub mod services;
pub mod session;
