pub mod auth;
pub mod engine;
pub mod normalizer;
pub mod poller;
pub mod result_store;
