//! HTTP middleware components.
//!
//! Provides the editor bearer-token guard.

pub mod editor_auth;

pub use editor_auth::require_editor;
