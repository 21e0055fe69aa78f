//! Command line interface for building concept stores and trying out
//! expansions.

pub mod args;
pub mod commands;
pub mod output;
