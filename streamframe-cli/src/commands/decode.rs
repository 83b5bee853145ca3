//! Decode command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::InputSource;
use crate::output::{BatchFormatter, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use streamframe_core::{BatchDecoder, DecoderOption, DecoderOptions, RecordBatch};
use streamframe_text::{LogBatch, TextLogCodec};

/// Arguments for the decode command
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Input file, or `-` for stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "jsonl")]
    pub format: OutputFormat,

    /// How records are split
    #[arg(long, value_enum, default_value = "delimited")]
    pub framing: Framing,

    /// Flush a batch after this many record bytes (0 disables)
    #[arg(long, value_name = "N")]
    pub flush_bytes: Option<u64>,

    /// Flush a batch after this many records (0 disables)
    #[arg(long, value_name = "N")]
    pub flush_items: Option<u64>,

    /// Bytes to skip before the first record
    #[arg(long, value_name = "N")]
    pub offset: Option<u64>,

    /// Separator regular expression for delimited framing
    #[arg(long, value_name = "RE")]
    pub separator: Option<String>,

    /// Character set of the input
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "STREAMFRAME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Record framing strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Framing {
    /// Split on the configured separator pattern
    Delimited,
    /// Newline delimited, trimmed, blank lines skipped
    Line,
}

/// Totals reported when a decode run ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Batches written
    pub batches: usize,
    /// Records written
    pub records: usize,
    /// Offset after the last batch
    pub offset: u64,
}

impl DecodeArgs {
    /// Execute the decode command
    pub fn execute(&self) -> Result<()> {
        self.init_logging()?;

        log::info!("Starting decode");
        log::debug!("Arguments: {:?}", self);

        let config = self.resolve_config()?;
        let codec = config
            .text
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        let source = InputSource::parse(&self.input);
        log::info!("Reading {}", source.describe());
        let reader = source.open()?;
        let mut decoder = self.open_decoder(&codec, reader, config.decoder)?;

        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output: {}", path.display())
            })?)),
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };
        let mut formatter = self.format.formatter(writer);

        let summary = run(decoder.as_mut(), formatter.as_mut())?;
        log::info!(
            "Decoded {} records in {} batches, offset {}",
            summary.records,
            summary.batches,
            summary.offset
        );
        Ok(())
    }

    /// Load the config file and apply command-line overrides on top
    pub fn resolve_config(&self) -> Result<CliConfig> {
        let mut config = CliConfig::load(self.config.as_deref())?;

        for option in self.decoder_overrides() {
            option.apply(&mut config.decoder);
        }
        if let Some(separator) = &self.separator {
            config.text.unmarshaling_separator = separator.clone();
        }
        if let Some(encoding) = &self.encoding {
            config.text.encoding = encoding.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn decoder_overrides(&self) -> Vec<DecoderOption> {
        let mut overrides = Vec::new();
        if let Some(bytes) = self.flush_bytes {
            overrides.push(DecoderOption::FlushBytes(bytes));
        }
        if let Some(items) = self.flush_items {
            overrides.push(DecoderOption::FlushItems(items));
        }
        if let Some(offset) = self.offset {
            overrides.push(DecoderOption::Offset(offset));
        }
        overrides
    }

    fn open_decoder<R: Read + 'static>(
        &self,
        codec: &TextLogCodec,
        reader: R,
        options: DecoderOptions,
    ) -> Result<Box<dyn BatchDecoder<Batch = LogBatch>>> {
        let decoder: Box<dyn BatchDecoder<Batch = LogBatch>> = match self.framing {
            Framing::Delimited => Box::new(codec.new_logs_decoder(reader, options)?),
            Framing::Line => Box::new(codec.new_line_logs_decoder(reader, options)?),
        };
        Ok(decoder)
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A second init in the same process keeps the first logger.
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }

        Ok(())
    }
}

/// Drive `decoder` to the end of the stream, writing every batch
///
/// Records decoded before a failure are written before the error is
/// returned, together with the offset a retry should resume from.
pub fn run(
    decoder: &mut dyn BatchDecoder<Batch = LogBatch>,
    formatter: &mut dyn BatchFormatter,
) -> Result<DecodeSummary> {
    let mut summary = DecodeSummary {
        offset: decoder.offset(),
        ..Default::default()
    };

    loop {
        match decoder.decode() {
            Ok(Some(batch)) => {
                summary.offset = decoder.offset();
                summary.batches += 1;
                summary.records += batch.len();
                formatter.format_batch(&batch, summary.offset)?;
            }
            Ok(None) => break,
            Err(err) => {
                summary.offset = decoder.offset();
                if !err.partial.is_empty() {
                    summary.batches += 1;
                    summary.records += err.partial.len();
                    formatter.format_batch(&err.partial, summary.offset)?;
                }
                formatter.finish()?;
                return Err(CliError::DecodeFailed {
                    offset: summary.offset,
                    message: err.source.to_string(),
                }
                .into());
            }
        }
    }

    formatter.finish()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TextFormatter;
    use std::io::{Cursor, Write as _};
    use tempfile::NamedTempFile;

    fn args(input: &str) -> DecodeArgs {
        DecodeArgs {
            input: input.to_string(),
            output: None,
            format: OutputFormat::Jsonl,
            framing: Framing::Delimited,
            flush_bytes: None,
            flush_items: None,
            offset: None,
            separator: None,
            encoding: None,
            config: None,
            quiet: true,
            verbose: 0,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "[decoder]\nflush_items = 5\noffset = 3\n\n[text]\nencoding = \"latin1\"\n"
        )
        .unwrap();

        let mut args = args("-");
        args.config = Some(file.path().to_path_buf());
        args.flush_items = Some(2);
        args.separator = Some(",".to_string());

        let config = args.resolve_config().unwrap();
        assert_eq!(config.decoder.flush_items, 2);
        assert_eq!(config.decoder.offset, 3);
        assert_eq!(config.text.encoding, "latin1");
        assert_eq!(config.text.unmarshaling_separator, ",");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut args = args("-");
        args.encoding = Some("not-a-charset".to_string());
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn test_run_reports_offsets() {
        let codec = TextLogCodec::default();
        let mut decoder = args("-")
            .open_decoder(
                &codec,
                Cursor::new(b"a\nb\nc\n".to_vec()),
                DecoderOptions::default().with_flush_items(2),
            )
            .unwrap();

        let mut out = Vec::new();
        let summary = {
            let mut formatter = TextFormatter::new(&mut out);
            run(decoder.as_mut(), &mut formatter).unwrap()
        };

        assert_eq!(
            summary,
            DecodeSummary {
                batches: 2,
                records: 3,
                offset: 6,
            }
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# batch 1 offset=4 records=2\na\nb\n# batch 2 offset=6 records=1\nc\n"
        );
    }

    #[test]
    fn test_run_writes_partial_batch_on_error() {
        let codec = TextLogCodec::default().with_max_record_size(4);
        let mut decoder = args("-")
            .open_decoder(
                &codec,
                Cursor::new(b"ok\nwaytoolong\n".to_vec()),
                DecoderOptions::default(),
            )
            .unwrap();

        let mut out = Vec::new();
        let err = {
            let mut formatter = TextFormatter::new(&mut out);
            run(decoder.as_mut(), &mut formatter).unwrap_err()
        };

        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::DecodeFailed { offset: 3, .. })
        ));
        assert!(String::from_utf8(out).unwrap().contains("\nok\n"));
    }
}
