use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputFormat;

const ABOUT: &str = "Find types that implement a specified interface in Go source code.";

const EXAMPLES: &str = "\
Examples:
  goimpl --interface discovery.SwaggerSchemaInterface --path ~/go/src/k8s.io/kubernetes/pkg/client/typed/discovery
  goimpl --interface datastore.RawInterface --path ./luci/gae/service/datastore --format json";

/// Command line arguments of `goimpl`.
#[derive(Parser, Debug, Clone)]
#[command(name = "goimpl", version, about = ABOUT, long_about = None, after_help = EXAMPLES)]
pub struct Args {
    /// File or directory to search, absolute or relative
    #[arg(short, long, value_name = "PATH")]
    pub path: PathBuf,

    /// Interface to find implementing types for, as packageName.InterfaceName
    #[arg(short, long, value_name = "PKG.NAME")]
    pub interface: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Report concrete types only, leaving out interfaces that implement the target
    #[arg(long)]
    pub concrete_only: bool,

    /// Disable coloured plain output
    #[arg(long)]
    pub no_color: bool,

    /// Only analyse the root directory, not its subdirectories
    #[arg(long)]
    pub no_recurse: bool,

    /// Ignore `_test.go` files
    #[arg(long)]
    pub skip_tests: bool,

    /// Number of collector threads (defaults to the available parallelism)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// `-v`/`-q` counters.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Verbosity {
    /// Use verbose output (or `-vv` and `-vvv` for more verbose output)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, overrides_with = "quiet")]
    verbose: u8,

    /// Only print errors
    #[arg(long, short = 'q', action = clap::ArgAction::Count, overrides_with = "verbose")]
    quiet: u8,
}

impl Verbosity {
    pub fn level(&self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;

        if self.quiet > 0 {
            return LevelFilter::ERROR;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
