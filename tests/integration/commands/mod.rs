//! Tests that drive the `bds-update` binary.

mod check;
mod rollback;
mod update;
