pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod search;
pub mod session;
pub mod store;
pub mod tmdb;
