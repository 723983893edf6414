//! igotifier CLI library
//!
//! Flag parsing and signal handling for the `igotifier` binary, split out
//! so integration tests and the binary share them.

pub mod args;
pub mod signal;

pub use args::Cli;
