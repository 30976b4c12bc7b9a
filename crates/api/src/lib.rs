//! HTTP front end: configuration, routing, handlers and HTML views.

pub mod app;
pub mod config;
pub mod middleware;
