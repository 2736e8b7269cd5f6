pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod maintenance;
pub mod middleware;
pub mod openapi;
pub mod state;
