//! Aggregator engine
//!
//! One `enrich` call:
//! 1. Fetches the order for the seller. Any failure here is returned to the
//!    caller and no branch is started.
//! 2. Spawns the offer, product and image branches as independent tasks.
//!    Each task converts its lookup result into an `EnrichmentOutcome`, so no
//!    error crosses the task boundary.
//! 3. Joins all three against a single deadline. A branch still running at
//!    the deadline counts as a failure and is aborted (or detached, per
//!    `cancel_on_timeout`).
//! 4. Merges the outcomes into an `EnrichedOrder`.
//!
//! Each branch owns its own join handle, so completion order has no effect
//! on the result. With `cancel_on_timeout` set, dropping the `enrich` future
//! before it resolves also aborts every branch still in flight.

use crate::composite::EnrichedOrder;
use crate::merge;
use crate::outcome::{Branch, BranchFailure, EnrichmentOutcome};
use crate::ports::{LookupError, Ports};
use oagg_common::config::AggregatorSection;
use oagg_common::models::{FilterCriteria, Order, SortCriteria};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// The only ways `enrich` can fail
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Order service failed; carries the original cause
    #[error("Order lookup failed for seller {seller_id}: {source}")]
    RootLookup {
        seller_id: i64,
        #[source]
        source: LookupError,
    },

    #[error("No order found for seller {0}")]
    RootNotFound(i64),
}

/// Fan-out tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Deadline for all branches together, measured from dispatch
    pub branch_budget: Duration,
    /// Abort branches still running at the deadline instead of detaching them
    pub cancel_on_timeout: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        AggregatorSection::default().into()
    }
}

impl From<&AggregatorSection> for AggregatorConfig {
    fn from(section: &AggregatorSection) -> Self {
        Self {
            branch_budget: section.branch_budget(),
            cancel_on_timeout: section.cancel_on_timeout,
        }
    }
}

impl From<AggregatorSection> for AggregatorConfig {
    fn from(section: AggregatorSection) -> Self {
        Self::from(&section)
    }
}

/// Image query issued for an order: its product's images, largest first
pub fn image_criteria(order: &Order) -> (SortCriteria, FilterCriteria) {
    (
        SortCriteria::largest_first(),
        FilterCriteria::for_product(order.product_id),
    )
}

/// Order enrichment engine
///
/// Cheap to clone; every `enrich` call owns its own per-invocation state.
#[derive(Clone)]
pub struct Aggregator {
    ports: Ports,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(ports: Ports, config: AggregatorConfig) -> Self {
        Self { ports, config }
    }

    /// Fetch the seller's order and enrich it with offer, product and images
    ///
    /// # Errors
    /// Only when the order itself cannot be resolved. Enrichment failures
    /// degrade to the sentinel values documented in `merge`.
    pub async fn enrich(&self, seller_id: i64) -> Result<EnrichedOrder, EnrichError> {
        let invocation_id = Uuid::new_v4();
        let span = info_span!("enrich", %invocation_id, seller_id);
        self.enrich_inner(seller_id).instrument(span).await
    }

    async fn enrich_inner(&self, seller_id: i64) -> Result<EnrichedOrder, EnrichError> {
        let started = Instant::now();

        let order = match self.ports.orders.fetch_order(seller_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                warn!("No order for seller");
                return Err(EnrichError::RootNotFound(seller_id));
            }
            Err(source) => {
                warn!(error = %source, "Order lookup failed");
                return Err(EnrichError::RootLookup { seller_id, source });
            }
        };
        debug!(
            order_id = order.id,
            offer_id = order.offer_id,
            product_id = order.product_id,
            "Order resolved"
        );

        let deadline = Instant::now() + self.config.branch_budget;

        let offer_task = {
            let offers = Arc::clone(&self.ports.offers);
            let offer_id = order.offer_id;
            self.spawn_branch(
                async move { EnrichmentOutcome::from(offers.fetch_offer(offer_id).await) },
            )
        };

        let product_task = {
            let products = Arc::clone(&self.ports.products);
            let product_id = order.product_id;
            self.spawn_branch(
                async move { EnrichmentOutcome::from(products.fetch_product(product_id).await) },
            )
        };

        let image_task = {
            let images = Arc::clone(&self.ports.images);
            let (sort, filter) = image_criteria(&order);
            self.spawn_branch(async move {
                EnrichmentOutcome::from(images.fetch_images(&sort, &filter).await.map(Some))
            })
        };

        let (offer, product, images) = tokio::join!(
            self.settle(Branch::Offer, offer_task, deadline),
            self.settle(Branch::Product, product_task, deadline),
            self.settle(Branch::Images, image_task, deadline),
        );

        let enriched = merge::merge(&order, offer, product, images);

        info!(
            order_id = enriched.id,
            complete = enriched.status.is_complete(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Order enriched"
        );

        Ok(enriched)
    }

    /// Spawn one branch inside the current `enrich` span
    fn spawn_branch<T, F>(&self, branch: F) -> BranchTask<T>
    where
        T: Send + 'static,
        F: Future<Output = EnrichmentOutcome<T>> + Send + 'static,
    {
        BranchTask {
            handle: tokio::spawn(branch.in_current_span()),
            abort_on_drop: self.config.cancel_on_timeout,
        }
    }

    /// Wait for one branch until the shared deadline
    ///
    /// A timed-out branch is aborted or detached when `task` is dropped on
    /// return.
    async fn settle<T>(
        &self,
        branch: Branch,
        mut task: BranchTask<T>,
        deadline: Instant,
    ) -> EnrichmentOutcome<T> {
        let outcome = match tokio::time::timeout_at(deadline, &mut task.handle).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => {
                EnrichmentOutcome::Failure(BranchFailure::Aborted(join_error.to_string()))
            }
            Err(_) => {
                EnrichmentOutcome::Failure(BranchFailure::TimedOut(self.config.branch_budget))
            }
        };

        match &outcome {
            EnrichmentOutcome::Success(_) => debug!(branch = %branch, "Branch succeeded"),
            EnrichmentOutcome::Empty => {
                warn!(branch = %branch, "Branch returned no data, using default")
            }
            EnrichmentOutcome::Failure(cause) => {
                warn!(branch = %branch, error = %cause, "Branch failed, using default")
            }
        }

        outcome
    }
}

/// Join handle of one in-flight branch
///
/// Owned by the `enrich` call that spawned it. When `abort_on_drop` is set,
/// dropping it aborts the task, whether `settle` gave up at the deadline or
/// the caller dropped `enrich` early. Aborting a finished task is a no-op.
struct BranchTask<T> {
    handle: JoinHandle<EnrichmentOutcome<T>>,
    abort_on_drop: bool,
}

impl<T> Drop for BranchTask<T> {
    fn drop(&mut self) {
        if self.abort_on_drop {
            self.handle.abort();
        }
    }
}
