//! Race-based reconciliation of competing acquisition strategies.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::{info, instrument, warn};

use super::error::{AcquireError, StrategyFailure};
use super::{Acquired, AcquisitionStrategy};

/// Runs registered strategies concurrently and accepts the first success.
///
/// # Concurrency Model
///
/// - Strategies are interleaved tasks on the caller's event loop, not OS
///   threads; every wait, timer, and file operation is a suspension point.
/// - "First success wins" is a total order over completion, not start:
///   whichever strategy transitions to success first is authoritative.
/// - On first success the remaining futures are dropped. That drop is the
///   cancellation request; it is cooperative, so a losing strategy may still
///   finish one unit of work, but its result is discarded and its scratch
///   files are removed by their drop guards.
/// - Dropping the `acquire` future itself (caller-level cancellation)
///   cancels every strategy the same way.
pub struct AcquisitionEngine {
    strategies: Vec<Arc<dyn AcquisitionStrategy>>,
}

impl AcquisitionEngine {
    /// Creates an engine with no strategies registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Registers a strategy. Registration order carries no preference; the
    /// race decides.
    pub fn register(&mut self, strategy: Arc<dyn AcquisitionStrategy>) {
        self.strategies.push(strategy);
    }

    /// Number of registered strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if no strategies are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Races all strategies with `timeout` as each one's budget and returns
    /// the first successful payload with its provenance tag.
    ///
    /// Which strategy wins is run-dependent and explicitly not guaranteed.
    ///
    /// # Errors
    ///
    /// [`AcquireError::AllStrategiesFailed`] with every per-strategy reason
    /// if no strategy produced bytes; [`AcquireError::NoStrategies`] if none
    /// are registered.
    #[instrument(skip(self))]
    pub async fn acquire(&self, timeout: Duration) -> Result<Acquired, AcquireError> {
        if self.strategies.is_empty() {
            return Err(AcquireError::NoStrategies);
        }

        let mut in_flight: FuturesUnordered<_> = self
            .strategies
            .iter()
            .map(|strategy| {
                let strategy = Arc::clone(strategy);
                async move { (strategy.name(), strategy.run(timeout).await) }
            })
            .collect();

        let mut failures = Vec::with_capacity(self.strategies.len());
        while let Some((name, outcome)) = in_flight.next().await {
            match outcome {
                Ok(bytes) => {
                    info!(
                        strategy = name,
                        bytes = bytes.len(),
                        "acquisition strategy won the race"
                    );
                    // Dropping `in_flight` here is the cancellation request
                    // for every still-pending strategy.
                    return Ok(Acquired {
                        bytes,
                        strategy: name,
                    });
                }
                Err(reason) => {
                    warn!(strategy = name, error = %reason, "acquisition strategy failed");
                    failures.push(StrategyFailure::new(name, reason));
                }
            }
        }

        Err(AcquireError::all_failed(failures))
    }
}

impl Default for AcquisitionEngine {
    fn default() -> Self {
        Self::new()
    }
}
