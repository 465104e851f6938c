pub mod apis;
pub mod app;
pub mod bootstrap;
pub mod common;
pub mod config;
pub mod infra;
pub mod observability;
pub mod scheduler;
