//! # Command Implementations
//!
//! Each subcommand of the `versions-aggregate` binary lives in its own
//! module with an `Args` struct (where it takes arguments) and an `execute`
//! function called from `cli.rs`.

pub mod aggregate;
pub mod completions;
pub mod projects;
pub mod validate;
