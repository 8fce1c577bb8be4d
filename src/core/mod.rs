//! Core types shared by the updater
//!
//! # Error Management
//!
//! - **Strongly-typed errors** ([`UpdateError`]) naming the stage that stopped a run
//! - **User-friendly contexts** ([`ErrorContext`]) with details and suggestions
//! - [`user_friendly_error`] converts any [`anyhow::Error`] for display in `main`

pub mod error;

pub use error::{ErrorContext, UpdateError, user_friendly_error};
