//! jzip command-line driver
//!
//! ## Usage
//!
//! ```bash
//! # Compress to notes.txt.jzip
//! jzip compress notes.txt
//!
//! # Chunked body with text dictionary paths
//! jzip compress notes.txt --chunked --chunk-size 4096 --text-paths
//!
//! # Restore notes.txt (overwriting it)
//! jzip decompress notes.txt.jzip --force
//!
//! # Compress and decompress in memory, printing per-stage timings
//! jzip roundtrip notes.txt
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use jzip::config::DriverConfig;
use jzip::driver::{compress_file, decompress_file, roundtrip_file, DriverError};

#[derive(Parser, Debug)]
#[command(name = "jzip")]
#[command(version)]
#[command(about = "Static Huffman byte-stream compressor", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "JZIP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Configuration file path (JSON)
    #[arg(short, long, global = true, env = "JZIP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file (default output: <file>.jzip)
    Compress {
        input: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,

        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Decompress a .jzip file (default output strips .jzip, else appends .out)
    Decompress {
        input: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,

        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Compress and decompress in memory, verify and print stage timings
    Roundtrip {
        input: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,
    },
}

#[derive(Args, Debug)]
struct CodecArgs {
    /// Write the body in independently decodable chunks
    #[arg(long, env = "JZIP_CHUNKED")]
    chunked: bool,

    /// Payload bytes per chunk (implies --chunked)
    #[arg(long, env = "JZIP_CHUNK_SIZE")]
    chunk_size: Option<usize>,

    /// Write dictionary paths as ASCII '0'/'1'
    #[arg(long, env = "JZIP_TEXT_PATHS")]
    text_paths: bool,

    /// Drop an unfinished trailing code instead of failing
    #[arg(long, env = "JZIP_LENIENT")]
    lenient: bool,

    /// Largest accepted input in MB
    #[arg(long, env = "JZIP_MAX_INPUT_MB")]
    max_input_mb: Option<u64>,
}

impl CodecArgs {
    /// Apply flags given on the command line over `config`.
    fn apply(&self, config: &mut DriverConfig) {
        if self.chunked || self.chunk_size.is_some() {
            config.chunked = true;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if self.text_paths {
            config.text_paths = true;
        }
        if self.lenient {
            config.lenient = true;
        }
        if let Some(mb) = self.max_input_mb {
            config.max_input_mb = mb;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = DriverConfig::load(cli.config.as_ref())?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    // Initialize logging
    let level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(err) = run(cli.command, config) {
        error!(kind = err.kind(), category = err.category(), "{}", err);
        return Err(err.into());
    }

    Ok(())
}

fn run(command: Command, mut config: DriverConfig) -> Result<(), DriverError> {
    match command {
        Command::Compress {
            input,
            output,
            force,
            codec,
        } => {
            codec.apply(&mut config);
            let (written, report) = compress_file(&input, output.as_deref(), &config, force)?;
            info!("wrote {}", written.display());
            println!("{}", report);
        }
        Command::Decompress {
            input,
            output,
            force,
            codec,
        } => {
            codec.apply(&mut config);
            let (written, report) = decompress_file(&input, output.as_deref(), &config, force)?;
            info!("wrote {}", written.display());
            println!("{}", report);
        }
        Command::Roundtrip { input, codec } => {
            codec.apply(&mut config);
            let report = roundtrip_file(&input, &config)?;
            println!("{}", report);
            println!("Roundtrip OK");
        }
    }

    Ok(())
}
