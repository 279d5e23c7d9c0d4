//! projsync CLI library
//!
//! Exposes the command modules for integration testing; the binary lives in
//! main.rs.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
