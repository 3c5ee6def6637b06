//! Command-line entry points

pub mod orchestration;
