//! Modalink Kernel Library
//!
//! Server-side rendering and REST surface for modal links. Exposed as a
//! library for integration testing; the `modalink` binary runs the server.

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod middleware;
pub mod modal;
pub mod models;
pub mod routes;
pub mod state;
