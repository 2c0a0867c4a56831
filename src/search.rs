use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, warn};

use crate::remote::MealApi;
use crate::render::{Mode, RenderUnit, SearchPanel, render};

/// What happened to one search input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; the panel was emptied without a network call
    Cleared,
    /// The panel now shows this many results
    Results(usize),
    /// The remote call failed; the panel shows the failure
    Failed(String),
    /// A newer input arrived first; this one left the panel alone
    Superseded,
}

/// Drives the search panel from user input.
///
/// Every input takes a new generation. Only the newest generation may touch
/// the panel, so a slow response that lands after a newer one is dropped.
/// In-flight requests are never cancelled.
pub struct SearchController<A> {
    api: A,
    debounce: Duration,
    generation: AtomicU64,
    panel: RwLock<SearchPanel>,
}

impl<A: MealApi> SearchController<A> {
    pub fn new(api: A, debounce: Duration) -> Self {
        Self {
            api,
            debounce,
            generation: AtomicU64::new(0),
            panel: RwLock::new(SearchPanel::new()),
        }
    }

    /// Handle an input change once it has settled for the debounce period
    pub async fn settle(&self, query: &str) -> SearchOutcome {
        let generation = self.next_generation();
        tokio::time::sleep(self.debounce).await;

        if !self.is_current(generation) {
            debug!(query, "Input superseded before settling");
            return SearchOutcome::Superseded;
        }

        self.run(generation, query).await
    }

    /// Search immediately, skipping the debounce
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let generation = self.next_generation();
        self.run(generation, query).await
    }

    async fn run(&self, generation: u64, query: &str) -> SearchOutcome {
        let query = query.trim();

        if query.is_empty() {
            return self.apply(generation, SearchOutcome::Cleared, |panel| panel.clear());
        }

        debug!(query, generation, "Searching");
        match self.api.search(query).await {
            Ok(meals) => {
                let units = render(&meals, Mode::Search);
                self.apply(generation, SearchOutcome::Results(units.len()), |panel| {
                    panel.replace(units)
                })
            }
            Err(e) => {
                let message = e.to_string();
                warn!(query, error = %message, "Search failed");
                self.apply(generation, SearchOutcome::Failed(message.clone()), |panel| {
                    panel.fail(message)
                })
            }
        }
    }

    /// Update the panel if `generation` is still the newest input
    fn apply(
        &self,
        generation: u64,
        outcome: SearchOutcome,
        update: impl FnOnce(&mut SearchPanel),
    ) -> SearchOutcome {
        let mut panel = self.panel.write().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(generation) {
            debug!(generation, "Discarding stale search response");
            return SearchOutcome::Superseded;
        }
        update(&mut panel);
        outcome
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Current search panel contents
    pub fn results(&self) -> Vec<RenderUnit> {
        self.panel
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .units()
            .to_vec()
    }

    /// Failure message shown in place of results, if any
    pub fn failure(&self) -> Option<String> {
        self.panel
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .failure()
            .map(String::from)
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
