//! datefield command-line interface

use anyhow::Result;
use clap::{Parser, Subcommand};
use datefield::cli::field::FieldOptions;
use datefield::cli::output::{self, OutputFormat};
use datefield::cli::range::BoundArg;
use datefield::cli::{classify, format, fuzzy, range, resolve};
use datefield::types::TimeUnit;
use std::path::PathBuf;

/// Date field command-line tool
#[derive(Parser)]
#[command(name = "datefield")]
#[command(author, version, about = "Resolve date field values, date math and range queries", long_about = None)]
struct Cli {
    /// Field mapping file (JSON)
    #[arg(short, long, global = true)]
    mapping: Option<PathBuf>,

    /// Display format, overriding the mapping
    #[arg(short = 'F', long, global = true)]
    format: Option<String>,

    /// Resolution of bare integers (milliseconds, seconds, minutes, hours, days)
    #[arg(short = 'r', long, global = true)]
    numeric_resolution: Option<TimeUnit>,

    /// Pin "now" to this value instead of the system clock
    #[arg(long, global = true, allow_hyphen_values = true)]
    now: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve values to instants
    Resolve {
        /// Values to resolve (timestamps, date math or numbers)
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Print stored millisecond values
    Format {
        /// Milliseconds since the epoch
        #[arg(allow_negative_numbers = true)]
        millis: Vec<i64>,
    },

    /// Build a range query
    Range {
        /// Exclusive lower bound
        #[arg(long, conflicts_with = "gte", allow_hyphen_values = true)]
        gt: Option<String>,

        /// Inclusive lower bound
        #[arg(long, allow_hyphen_values = true)]
        gte: Option<String>,

        /// Exclusive upper bound
        #[arg(long, conflicts_with = "lte", allow_hyphen_values = true)]
        lt: Option<String>,

        /// Inclusive upper bound
        #[arg(long, allow_hyphen_values = true)]
        lte: Option<String>,
    },

    /// Report whether query bounds can be cached
    Classify {
        /// Bound expressions
        #[arg(allow_hyphen_values = true)]
        expressions: Vec<String>,
    },

    /// Build a similarity window around a value
    Fuzzy {
        /// Center value
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Tolerance such as 1d, 1.5h or a number of milliseconds
        tolerance: String,
    },
}

fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);
    init_logger(cli.verbose);

    let field = FieldOptions {
        mapping: cli.mapping,
        format: cli.format,
        numeric_resolution: cli.numeric_resolution,
        now: cli.now,
    };
    let output_format = OutputFormat::from_flag(cli.json);

    let result: Result<()> = match cli.command {
        Commands::Resolve { values } => resolve::run(resolve::ResolveConfig {
            field,
            values,
            output_format,
        }),

        Commands::Format { millis } => format::run(format::FormatConfig {
            field,
            millis,
            output_format,
        }),

        Commands::Range { gt, gte, lt, lte } => range::run(range::RangeConfig {
            field,
            lower: BoundArg::from_flags(gt, gte),
            upper: BoundArg::from_flags(lt, lte),
            output_format,
        }),

        Commands::Classify { expressions } => classify::run(classify::ClassifyConfig {
            expressions,
            output_format,
        }),

        Commands::Fuzzy { value, tolerance } => fuzzy::run(fuzzy::FuzzyConfig {
            field,
            value,
            tolerance,
            output_format,
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
