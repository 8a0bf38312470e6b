//! CLI module
//!
//! Command-line interface for calling a configured REST resource.
//!
//! # Commands
//!
//! - `index` - Fetch one page of a resource
//! - `get` - Fetch one record by id
//! - `all` - Fetch every page of a resource
//! - `create` / `update` / `delete` - Write records
//! - `resources` - List configured resource names

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
