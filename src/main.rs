use anyhow::Context;
use clap::Parser;
use is_terminal::IsTerminal;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tintfmt::{CustomizableFormatter, ErrorStrategy, FormatterConfig, LogStream};

#[derive(Parser)]
#[command(name = "tintfmt")]
#[command(about = "Pretty-print JSON log streams with customizable colors")]
#[command(version)]
struct Args {
    /// Input file (default: stdin)
    #[arg(value_name = "FILE")]
    input_file: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short = 'c', long = "config")]
    config_file: Option<PathBuf>,

    /// Fields to leave out of the data section (comma-separated)
    #[arg(short = 'e', long = "exclude", value_delimiter = ',')]
    exclude: Vec<String>,

    /// Render data without decoration
    #[arg(long)]
    plain: bool,

    /// Spaces in front of stack traces
    #[arg(long, value_name = "N")]
    trace_indent: Option<usize>,

    /// Data renderer: pretty, json or logfmt
    #[arg(short = 'r', long)]
    renderer: Option<String>,

    /// strftime pattern for timestamps
    #[arg(long, value_name = "PATTERN")]
    datetime_format: Option<String>,

    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Do not start from the built-in severity colors
    #[arg(long)]
    no_default_colors: bool,

    /// Fail on first invalid line instead of skipping it
    #[arg(long)]
    fail_fast: bool,

    /// Debug mode - log formatter decisions to stderr
    #[arg(long)]
    debug: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output_file: Option<PathBuf>,
}

impl Args {
    fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color || self.output_file.is_some() {
            false
        } else {
            io::stdout().is_terminal()
        }
    }

    /// Config file values, then command line overrides
    fn formatter_config(&self) -> anyhow::Result<FormatterConfig> {
        let mut config = match &self.config_file {
            Some(path) => FormatterConfig::from_file(path)?,
            None => FormatterConfig::default(),
        };

        config.excluded_fields.extend(self.exclude.iter().cloned());
        if self.plain {
            config.plain = true;
        }
        if let Some(indent) = self.trace_indent {
            config.trace_indent = indent;
        }
        if let Some(renderer) = &self.renderer {
            config.renderer = renderer.clone();
        }
        if let Some(pattern) = &self.datetime_format {
            config.datetime_format = Some(pattern.clone());
        }
        if self.no_default_colors {
            config.load_default_colors = false;
        }
        if !self.use_colors() {
            config.colors.clear();
            config.load_default_colors = false;
            config.plain = true;
        }
        Ok(config)
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = args.formatter_config()?;
    let formatter =
        CustomizableFormatter::from_config(&config).context("Failed to set up formatter")?;
    let error_strategy = if args.fail_fast {
        ErrorStrategy::FailFast
    } else {
        ErrorStrategy::Skip
    };
    let stream = LogStream::new(formatter, error_strategy);

    // Set up input
    let input: Box<dyn BufRead> = if let Some(input_path) = &args.input_file {
        let file = File::open(input_path).with_context(|| {
            format!("Failed to open input file '{}'", input_path.display())
        })?;
        Box::new(BufReader::new(file))
    } else {
        Box::new(BufReader::new(io::stdin()))
    };

    // Set up output
    let mut output: Box<dyn Write> = if let Some(output_path) = &args.output_file {
        let file = File::create(output_path).with_context(|| {
            format!("Failed to create output file '{}'", output_path.display())
        })?;
        Box::new(io::BufWriter::new(file))
    } else {
        Box::new(io::BufWriter::new(io::stdout()))
    };

    let stats = stream
        .process(input, &mut output)
        .context("Processing failed")?;

    // Ensure output is flushed
    output.flush()?;

    tracing::debug!(
        lines = stats.lines,
        records = stats.records,
        skipped = stats.skipped,
        "finished"
    );

    Ok(())
}
