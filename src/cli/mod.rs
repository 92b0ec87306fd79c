//! Command-line interface: argument parsing and terminal output

pub mod args;
pub mod output;
