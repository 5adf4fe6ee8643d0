//! Single-user task tracker served over HTTP, persisted as one JSON document.

pub mod build_info;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod server;
pub mod store;
