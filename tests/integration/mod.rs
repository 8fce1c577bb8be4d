//! Integration test suite for bds-updater
//!
//! End-to-end tests of the update workflow through the public library API and
//! through the `bds-update` binary. Network access is replaced by a local
//! `httpmock` server; nothing here talks to the real links API.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **commands**: the binary (`update`, `--check`, `--rollback`, argument errors)
//! - **http**: links API resolver and HTTP downloader against a mock server
//! - **workflow**: the orchestrator with scripted collaborators

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod commands;
