//! Test utilities shared across the jirest workspace
//!
//! This crate provides common testing infrastructure including:
//! - `.netrc` isolation in a temporary home directory ([`NetrcGuard`])
//! - Temporary fixture files for upload and download tests ([`FixtureDir`])
//! - Capturing formatted `tracing` output ([`LogCapture`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod files;
pub mod logs;
pub mod netrc;

// Re-export commonly used items
pub use files::FixtureDir;
pub use logs::LogCapture;
pub use netrc::NetrcGuard;
