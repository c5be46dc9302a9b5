//! Shared test utilities for the remix build pipeline workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for a temporary app directory
//! - [`commands`]: stand-in build commands with a chosen outcome

pub mod commands;
pub mod project;

pub use project::TestProject;
