//! Fan-in: collect every compilation unit on a worker pool and merge the
//! symbol streams into one universe.
//!
//! ```text
//! units ──► [unit channel] ──► worker 0..N ──► [symbol channel, bounded] ─┐
//!                                   │                                      ├─► aggregator
//!                                   └────────► [error channel] ────────────┘
//! ```
//!
//! The aggregator `select!`s over both channels until every worker has
//! hung up. The first failure cancels the shared token so workers skip the
//! units they have not started; symbols already in flight are still drained
//! so no worker blocks on a full channel.

use std::thread;

use crossbeam_channel::{Receiver, Sender, never, select};
use tokio_util::sync::CancellationToken;

use super::collector::SymbolCollector;
use super::{ImplError, ResolutionError, SymbolUniverse};
use crate::frontend::Frontend;
use crate::hir::Symbol;
use crate::project::CompilationUnit;

/// Worker pool settings for one aggregation.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    workers: usize,
    channel_capacity: usize,
}

impl Aggregator {
    pub fn new(workers: usize, channel_capacity: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Collect all `units` and merge their symbols.
    ///
    /// Returns the first resolution failure observed, if any. Cancelling
    /// `cancel` from outside stops the run with [`ImplError::Cancelled`].
    pub fn aggregate<F: Frontend>(
        &self,
        collector: &SymbolCollector<F>,
        units: Vec<CompilationUnit>,
        cancel: &CancellationToken,
    ) -> Result<SymbolUniverse, ImplError> {
        let worker_count = self.workers.min(units.len()).max(1);
        let unit_count = units.len();
        let run = cancel.child_token();

        let (unit_tx, unit_rx) = crossbeam_channel::unbounded::<CompilationUnit>();
        for unit in units {
            // The receiver is still held here, so this cannot fail.
            let _ = unit_tx.send(unit);
        }
        drop(unit_tx);

        let (symbol_tx, symbol_rx) = crossbeam_channel::bounded::<Symbol>(self.channel_capacity);
        let (error_tx, error_rx) = crossbeam_channel::bounded::<ResolutionError>(worker_count);

        tracing::debug!(units = unit_count, workers = worker_count, "aggregating symbols");

        let (universe, first_error, panicked) = thread::scope(|scope| {
            let handles: Vec<_> = (0..worker_count)
                .map(|index| {
                    let units = unit_rx.clone();
                    let symbols = symbol_tx.clone();
                    let errors = error_tx.clone();
                    let run = &run;
                    scope.spawn(move || run_worker(index, collector, units, symbols, errors, run))
                })
                .collect();
            // Channels disconnect once every worker has exited.
            drop(unit_rx);
            drop(symbol_tx);
            drop(error_tx);

            let (universe, first_error) = drain(symbol_rx, error_rx, &run);

            let panicked = handles
                .into_iter()
                .map(|handle| handle.join())
                .filter(Result::is_err)
                .count();
            (universe, first_error, panicked)
        });

        if panicked > 0 {
            tracing::error!(panicked, "collector workers panicked");
            return Err(ImplError::WorkerPanicked);
        }
        if let Some(err) = first_error {
            return Err(err.into());
        }
        if cancel.is_cancelled() {
            return Err(ImplError::Cancelled);
        }
        tracing::debug!(symbols = universe.len(), "aggregation finished");
        Ok(universe)
    }
}

/// Read both channels until all senders are gone.
fn drain(
    mut symbols: Receiver<Symbol>,
    mut errors: Receiver<ResolutionError>,
    run: &CancellationToken,
) -> (SymbolUniverse, Option<ResolutionError>) {
    let mut universe = SymbolUniverse::new();
    let mut first_error: Option<ResolutionError> = None;
    let mut open = 2;

    while open > 0 {
        select! {
            recv(symbols) -> msg => match msg {
                Ok(symbol) => universe.push(symbol),
                Err(_) => {
                    symbols = never();
                    open -= 1;
                }
            },
            recv(errors) -> msg => match msg {
                Ok(err) => {
                    run.cancel();
                    if first_error.is_none() {
                        tracing::debug!(unit = %err.unit().display(), "first failure, cancelling");
                        first_error = Some(err);
                    } else {
                        tracing::trace!(error = %err, "dropping later failure");
                    }
                }
                Err(_) => {
                    errors = never();
                    open -= 1;
                }
            },
        }
    }

    (universe, first_error)
}

fn run_worker<F: Frontend>(
    index: usize,
    collector: &SymbolCollector<F>,
    units: Receiver<CompilationUnit>,
    symbols: Sender<Symbol>,
    errors: Sender<ResolutionError>,
    run: &CancellationToken,
) {
    for unit in units.iter() {
        if run.is_cancelled() {
            tracing::trace!(worker = index, unit = %unit.path().display(), "skipping unit");
            continue;
        }
        match collector.collect(&unit) {
            Ok(produced) => {
                for symbol in produced {
                    if symbols.send(symbol).is_err() {
                        return;
                    }
                }
            }
            Err(err) => {
                run.cancel();
                let _ = errors.send(err);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::{FakeFrontend, unit};

    fn collector(frontend: FakeFrontend) -> SymbolCollector<FakeFrontend> {
        SymbolCollector::new(frontend)
    }

    #[test]
    fn test_merges_every_unit() {
        let frontend = FakeFrontend::new()
            .with_unit("a", &["a.I", "a.T"])
            .with_unit("b", &["b.U"])
            .with_unit("c", &[]);
        let units = vec![unit("a"), unit("b"), unit("c")];
        let universe = Aggregator::new(2, 1)
            .aggregate(&collector(frontend), units, &CancellationToken::new())
            .unwrap();
        let mut names: Vec<_> = universe.iter().map(|s| s.type_string()).collect();
        names.sort();
        assert_eq!(names, vec!["a.I", "a.T", "b.U"]);
    }

    #[test]
    fn test_no_units_is_empty() {
        let universe = Aggregator::new(4, 8)
            .aggregate(&collector(FakeFrontend::new()), Vec::new(), &CancellationToken::new())
            .unwrap();
        assert!(universe.is_empty());
    }

    #[test]
    fn test_failure_aborts_the_whole_run() {
        let mut frontend = FakeFrontend::new().with_failure("bad");
        for i in 0..16 {
            frontend = frontend.with_unit(&format!("ok{i}"), &["p.T", "p.U", "p.V"]);
        }
        let mut units = vec![unit("bad")];
        units.extend((0..16).map(|i| unit(&format!("ok{i}"))));
        let err = Aggregator::new(3, 1)
            .aggregate(&collector(frontend), units, &CancellationToken::new())
            .unwrap_err();
        let ImplError::Resolution(err) = err else {
            panic!("expected a resolution error, got {err:?}");
        };
        assert_eq!(err.unit(), std::path::Path::new("bad"));
    }

    #[test]
    fn test_panicking_worker_is_reported() {
        let frontend = FakeFrontend::new().with_panic("boom").with_unit("ok", &["p.T"]);
        let err = Aggregator::new(2, 4)
            .aggregate(
                &collector(frontend),
                vec![unit("boom"), unit("ok")],
                &CancellationToken::new(),
            )
            .unwrap_err();
        assert!(matches!(err, ImplError::WorkerPanicked));
    }

    #[test]
    fn test_external_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let frontend = FakeFrontend::new().with_unit("a", &["a.T"]);
        let err = Aggregator::new(1, 1)
            .aggregate(&collector(frontend), vec![unit("a")], &cancel)
            .unwrap_err();
        assert!(matches!(err, ImplError::Cancelled));
    }
}
