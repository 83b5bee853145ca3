//! Input handling module

use crate::error::CliError;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

/// Where the stream is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input
    Stdin,
    /// A file on disk
    File(PathBuf),
}

impl InputSource {
    /// Interpret a command-line argument, `-` meaning stdin
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }

    /// Open the source for reading
    pub fn open(&self) -> Result<Box<dyn Read + Send>> {
        match self {
            InputSource::Stdin => Ok(Box::new(io::stdin())),
            InputSource::File(path) => {
                if !path.exists() {
                    return Err(CliError::InputNotFound(path.display().to_string()).into());
                }
                let file = File::open(path)
                    .with_context(|| format!("Failed to open input: {}", path.display()))?;
                Ok(Box::new(file))
            }
        }
    }

    /// Name used in log messages
    pub fn describe(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }
}
