//! `n2c` command-line interface.

pub mod cli;
pub mod commands;
