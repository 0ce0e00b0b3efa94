//! # ProjectFlow API Server Library
//!
//! HTTP surface of ProjectFlow: routing, request extraction, error mapping
//! and configuration. Domain rules live in `projectflow-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from the environment
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validated JSON bodies, ID paths and the ownership guard
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
