//! streamframe CLI library
//!
//! Command-line front end for the streamframe decoders: reads a file or
//! stdin, decodes it into batches and prints each batch with the offset a
//! caller would checkpoint after it.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

pub use error::{CliError, CliResult};
