use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the `-v`/`-q` level, in `EnvFilter` syntax.
pub const LOG_ENV: &str = "GOIMPL_LOG";

/// Install a stderr subscriber. `GOIMPL_LOG` wins over `level` when set.
pub fn setup_tracing(level: LevelFilter) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::default().add_directive(level.into()),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(level >= LevelFilter::DEBUG)
        .without_time()
        .try_init();
    if installed.is_err() {
        tracing::debug!("a tracing subscriber is already installed");
    }
}
