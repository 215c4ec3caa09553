//! Command line surface of `goimpl`.

mod args;
mod logging;

pub use args::{Args, Verbosity};
pub use logging::{LOG_ENV, setup_tracing};

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use crate::analysis::{Config, ImplError, InterfaceName, find_implementers};
use crate::output::{OutputOptions, render};
use crate::project::WalkOptions;

/// Parse arguments, run the query and print the results.
pub fn main() -> ExitCode {
    let args = Args::parse();
    setup_tracing(args.verbosity.level());
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("goimpl: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Build the configuration from `args`. Fails before any file is touched.
pub fn config_from_args(args: &Args) -> Result<Config, ImplError> {
    let interface: InterfaceName = args.interface.parse()?;
    let walk = WalkOptions {
        recursive: !args.no_recurse,
        include_tests: !args.skip_tests,
        ..WalkOptions::default()
    };
    let mut config = Config::new(&args.path, interface)
        .with_concrete_only(args.concrete_only)
        .with_walk(walk);
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    Ok(config)
}

/// Run one query; nothing is printed unless it succeeds.
pub fn run(args: &Args) -> Result<(), ImplError> {
    let config = config_from_args(args)?;
    let options = OutputOptions {
        format: args.format,
        color: !args.no_color,
    };

    let results = find_implementers(&config)?;
    let text = render(&results, &options)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| ImplError::output(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_parses_all_flags() {
        let args = Args::try_parse_from([
            "goimpl",
            "--path",
            "internal/testdata",
            "--interface",
            "testpkg.Foo",
            "--format",
            "json",
            "--concrete-only",
            "--no-color",
            "--no-recurse",
            "--skip-tests",
            "--workers",
            "3",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        let config = config_from_args(&args).unwrap();
        assert!(config.concrete_only);
        assert!(!config.walk.recursive);
        assert!(!config.walk.include_tests);
        assert_eq!(config.workers, 3);
        assert_eq!(config.interface.to_string(), "testpkg.Foo");
        assert_eq!(args.verbosity.level(), tracing::level_filters::LevelFilter::DEBUG);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["goimpl", "-p", ".", "-i", "p.I"]).unwrap();
        assert_eq!(args.format, OutputFormat::Plain);
        assert!(!args.no_color);
        assert_eq!(args.verbosity.level(), tracing::level_filters::LevelFilter::WARN);
    }

    #[test]
    fn test_missing_flags_and_bad_format_are_usage_errors() {
        assert!(Args::try_parse_from(["goimpl", "--path", "."]).is_err());
        assert!(Args::try_parse_from(["goimpl", "-p", ".", "-i", "p.I", "-f", "yaml"]).is_err());
    }

    #[test]
    fn test_bad_interface_fails_before_running() {
        let args = Args::try_parse_from(["goimpl", "-p", "/does/not/exist", "-i", "Foo"]).unwrap();
        assert!(matches!(config_from_args(&args), Err(ImplError::Usage(_))));
        assert!(matches!(run(&args), Err(ImplError::Usage(_))));
    }
}
