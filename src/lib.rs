pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod exec;
pub mod git;
pub mod ui;
pub mod workflow;

pub use error::{ReleaseError, Result};
