//! Command-line front end for `serts-typegen`.
//!
//! Reads a descriptor document, translates it and writes the TypeScript files
//! below an output directory. Configuration is layered from
//! `~/.config/serts/config.toml`, `.serts/config.toml` and command-line flags.

pub mod commands;
pub mod config;
pub mod load;
pub mod output;
pub mod writer;
