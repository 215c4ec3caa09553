//! Query engine: which declared types satisfy interface X?
//!
//! ```text
//! Config
//!   ↓  UnitWalker          root → compilation units
//!   ↓  SymbolCollector     unit → symbols (via a Frontend)
//!   ↓  Aggregator          worker pool fan-in → SymbolUniverse
//!   ↓  ImportIndex         imported owners → scanned packages
//!   ↓  ImplementerMatcher  universe + target → MatchResults
//! ```

mod aggregator;
mod collector;
mod config;
mod error;
mod imports;
mod matcher;
mod universe;


pub use aggregator::Aggregator;
pub use collector::SymbolCollector;
pub use config::{Config, DEFAULT_CHANNEL_CAPACITY, InterfaceName};
pub use error::{ImplError, ResolutionError};
pub use imports::ImportIndex;
pub use matcher::{ImplementerMatcher, MatchResult, SeenTable};
pub use universe::SymbolUniverse;

use tokio_util::sync::CancellationToken;

use crate::frontend::{Frontend, GoFrontend};
use crate::project::UnitWalker;

/// Find every implementer of `config.interface` under `config.root` using
/// the Go frontend.
pub fn find_implementers(config: &Config) -> Result<Vec<MatchResult>, ImplError> {
    find_implementers_with(config, GoFrontend::new(), &CancellationToken::new())
}

/// [`find_implementers`] with a custom frontend and a cancellation token.
pub fn find_implementers_with<F: Frontend>(
    config: &Config,
    frontend: F,
    cancel: &CancellationToken,
) -> Result<Vec<MatchResult>, ImplError> {
    let units = UnitWalker::new(config.walk).units_for_path(&config.root)?;
    tracing::debug!(
        root = %config.root.display(),
        units = units.len(),
        "discovered compilation units"
    );

    let imports = ImportIndex::new(&units);
    let collector = SymbolCollector::new(frontend);
    let mut universe = Aggregator::new(config.workers, config.channel_capacity)
        .aggregate(&collector, units, cancel)?;
    imports.localize(&mut universe);

    let results = ImplementerMatcher::new(&universe)
        .concrete_only(config.concrete_only)
        .find(&config.interface);
    tracing::info!(
        interface = %config.interface,
        symbols = universe.len(),
        matches = results.len(),
        "query finished"
    );
    Ok(results)
}
