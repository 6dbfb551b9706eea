use anyhow::Context;
use clap::Parser;
use sheetmark::config::Config;
use sheetmark::logging::LogFormat;
use sheetmark::watermark::Watermarker;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Sheetmark - stamp a diagonal text watermark across an image
#[derive(Parser, Debug)]
#[command(name = "sheetmark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image, or "-" for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output PNG, or "-" for stdout
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Watermark text (overrides the config file)
    #[arg(short, long)]
    text: Option<String>,

    /// TrueType/OpenType font file (overrides the config file)
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output format (overrides the config file)
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if is_stdio(path) {
        let mut data = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut data)
            .context("Failed to read image from stdin")?;
        Ok(data)
    } else {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn write_output(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    if is_stdio(path) {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(data)
            .and_then(|_| stdout.flush())
            .context("Failed to write image to stdout")
    } else {
        std::fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn run(args: Args, mut config: Config) -> anyhow::Result<()> {
    if let Some(text) = args.text {
        config.watermark.text = text;
    }
    if let Some(font) = args.font {
        config.watermark.font_path = Some(font);
    }

    let watermarker = Watermarker::new(config.watermark)?;

    let input = read_input(&args.input)?;
    let output = watermarker
        .apply(&input)
        .with_context(|| format!("Failed to watermark {}", args.input.display()))?;
    write_output(&args.output, &output)?;

    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        text = %watermarker.config().text,
        input_bytes = input.len(),
        output_bytes = output.len(),
        "Watermark applied"
    );

    Ok(())
}

fn main() {
    let args = Args::parse();

    // Load configuration before logging so the file can pick the log format
    let config = match &args.config {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }),
        None => Config::default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let log_format = args.log_format.unwrap_or(config.log_format);
    if let Err(e) = sheetmark::logging::init_subscriber(log_format) {
        eprintln!("Failed to initialize logging subsystem: {}", e);
        std::process::exit(1);
    }

    if let Some(path) = &args.config {
        tracing::info!(
            config_file = %path.display(),
            text = %config.watermark.text,
            font_path = ?config.watermark.font_path,
            "Configuration loaded successfully"
        );
    }

    if let Err(e) = run(args, config) {
        tracing::error!(error = %format!("{:#}", e), "Watermarking failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
