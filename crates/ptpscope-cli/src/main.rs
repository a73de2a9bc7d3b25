use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use ptpscope_core::{
    DissectOptions, PcapFileSource, PtpFieldOrder, RecordSource, SourceError, dissect_source,
};
use tracing_subscriber::EnvFilter;

mod render;

use render::{OutputFormat, Renderer};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PTPSCOPE_BUILD_COMMIT"),
    ", ",
    env!("PTPSCOPE_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  ptpscope pcap dissect capture.pcap\n  ptpscope pcap dissect capture.pcap --ptp-only --format json -o ptp.jsonl\n  ptpscope pcap decode 'captures/*.pcap' -v";

#[derive(Parser, Debug)]
#[command(name = "ptpscope")]
#[command(version = VERSION)]
#[command(
    about = "Layered dissector for PTP (IEEE 1588) traffic in pcap captures.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on classic libpcap inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode every record layer by layer, down to PTP messages.
    #[command(alias = "decode")]
    #[command(after_help = EXAMPLES)]
    Dissect {
        /// Path to a .pcap file (a glob matching exactly one file is accepted)
        input: PathBuf,

        /// Report only records that carry a PTP message
        #[arg(long)]
        ptp_only: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Accept captures whose link type is not Ethernet
        #[arg(long)]
        allow_non_ethernet: bool,

        /// Read multi-byte PTP fields little-endian in byte-swapped files
        #[arg(long)]
        ptp_file_order: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Dissect {
                input,
                ptp_only,
                format,
                output,
                allow_non_ethernet,
                ptp_file_order,
            } => {
                let options = DissectOptions {
                    ptp_only,
                    allow_non_ethernet,
                    ptp_field_order: if ptp_file_order {
                        PtpFieldOrder::FileRelative
                    } else {
                        PtpFieldOrder::Wire
                    },
                };
                cmd_pcap_dissect(&input, output.as_deref(), format, &options)
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<SourceError> for CliError {
    fn from(err: SourceError) -> Self {
        let hint = match &err {
            SourceError::Format { magic } if is_pcapng_magic(*magic) => Some(
                "pcapng is not supported; convert with `editcap -F pcap in.pcapng out.pcap`"
                    .to_string(),
            ),
            SourceError::Format { .. } => {
                Some("expected a classic libpcap file (magic a1b2c3d4)".to_string())
            }
            SourceError::UnsupportedLinkType { .. } => {
                Some("use --allow-non-ethernet to decode raw IP captures".to_string())
            }
            SourceError::OversizedRecord { .. } => {
                Some("the record header is probably corrupt".to_string())
            }
            SourceError::TruncatedFile { .. } => {
                Some("the capture may still be being written, or was cut short".to_string())
            }
            _ => None,
        };
        CliError::new(err.to_string(), hint)
    }
}

fn is_pcapng_magic(magic: u32) -> bool {
    magic == u32::from_ne_bytes([0x0a, 0x0d, 0x0d, 0x0a])
}

fn cmd_pcap_dissect(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    options: &DissectOptions,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(input)?;
    validate_input_file(&resolved_input)?;
    if let Some(output) = output {
        ensure_distinct_output(&resolved_input, output)?;
    }

    let mut source = PcapFileSource::open(&resolved_input, &options.reader_options())?;

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut renderer = Renderer::new(writer, format);
    renderer
        .capture(source.header())
        .context("Failed to write output")?;

    let mut write_error: Option<io::Error> = None;
    let summary = dissect_source(&mut source, options, |dissection| {
        match renderer.record(dissection) {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => {
                write_error = Some(err);
                ControlFlow::Break(())
            }
        }
    })?;

    if let Some(err) = write_error {
        // A closed stdout pipe (e.g. `| head`) is not a failure.
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(anyhow::Error::new(err).context("Failed to write output").into());
    }
    renderer.finish(&summary).context("Failed to write output")?;

    if let Some(output) = output {
        tracing::info!(path = %output.display(), "output written");
    }

    match summary.truncated_file {
        Some(note) => Err(CliError::new(
            note,
            Some("records before the truncation point were decoded".to_string()),
        )),
        None => Ok(()),
    }
}

fn ensure_distinct_output(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let Ok(output_dir) = fs::canonicalize(&output_dir) else {
        return Ok(());
    };
    let Some(file_name) = output.file_name() else {
        return Err(CliError::new(
            format!("invalid output path: {}", output.display()),
            None,
        ));
    };
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass the path of a .pcap capture file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass the path of a .pcap capture file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single capture file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
