// Allow dead code for public API functions that may not be used internally
// but are part of the library's exposed interface
#![allow(dead_code)]

pub mod cli;
pub mod config;
pub mod export;
pub mod fetch;
pub mod matcher;
pub mod parser;
pub mod runner;

pub use matcher::{Outcome, ValidationResult};
pub use runner::{FileKind, RunError, ValidationRun};
