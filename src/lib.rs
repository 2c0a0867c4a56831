pub mod config;
pub mod detail;
pub mod error;
pub mod meal;
pub mod registry;
pub mod remote;
pub mod render;
pub mod search;
pub mod store;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::error::AppError;
use crate::registry::FavouritesRegistry;
use crate::search::SearchController;

// Re-export key types for convenience
pub use crate::detail::DetailView;
pub use crate::meal::{Ingredient, MealDetail, MealSummary};
pub use crate::registry::{AddResult, RemoveResult};
pub use crate::remote::{MealApi, MealDbClient};
pub use crate::render::{Action, Mode, RenderUnit};
pub use crate::search::SearchOutcome;
pub use crate::store::{FileStore, MemoryStore, PersistentStore};

/// Thread-safe favourites registry
pub type SharedRegistry<S> = Arc<RwLock<FavouritesRegistry<S>>>;

/// Session backed by the favourites file and TheMealDB
pub type DefaultSession = Session<FileStore, MealDbClient>;

/// Result of dispatching a render action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Add(AddResult),
    Remove(RemoveResult),
}

impl Dispatched {
    /// Message to show the user, if the outcome warrants one
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Dispatched::Add(AddResult::Added) => Some("Meal added to favourites!"),
            Dispatched::Add(AddResult::AlreadyPresent) => Some("Meal is already in favourites."),
            Dispatched::Remove(_) => None,
        }
    }
}

/// Main interface: favourites, search and detail lookups over one remote API
pub struct Session<S, A> {
    registry: SharedRegistry<S>,
    search: Arc<SearchController<A>>,
}

impl<S, A> Clone for Session<S, A> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            search: Arc::clone(&self.search),
        }
    }
}

impl DefaultSession {
    /// Open the favourites slot and remote client described by `config`
    pub fn open(config: &Config) -> Self {
        let store = FileStore::new(config.favourites_path());
        let api = MealDbClient::new(config.api_base().clone());
        Self::new(store, api, config.debounce())
    }
}

impl<S: PersistentStore, A: MealApi> Session<S, A> {
    /// Hydrate favourites from `store` and wire search to `api`
    pub fn new(store: S, api: A, debounce: Duration) -> Self {
        Self {
            registry: Arc::new(RwLock::new(FavouritesRegistry::hydrate(store))),
            search: Arc::new(SearchController::new(api, debounce)),
        }
    }

    fn registry(&self) -> Result<RwLockReadGuard<'_, FavouritesRegistry<S>>, AppError> {
        self.registry
            .read()
            .map_err(|e| AppError::Lock(e.to_string()))
    }

    fn registry_mut(&self) -> Result<RwLockWriteGuard<'_, FavouritesRegistry<S>>, AppError> {
        self.registry
            .write()
            .map_err(|e| AppError::Lock(e.to_string()))
    }

    /// Execute the action bound to a rendered entry
    pub fn dispatch(&self, action: Action) -> Result<Dispatched, AppError> {
        debug!(id = action.id(), label = action.label(), "Dispatching");
        let mut registry = self.registry_mut()?;
        match action {
            Action::Add(meal) => Ok(Dispatched::Add(registry.add(meal)?)),
            Action::Remove(id) => Ok(Dispatched::Remove(registry.remove(&id)?)),
        }
    }

    pub fn add(&self, meal: MealSummary) -> Result<AddResult, AppError> {
        self.registry_mut()?.add(meal)
    }

    pub fn remove(&self, id: &str) -> Result<RemoveResult, AppError> {
        self.registry_mut()?.remove(id)
    }

    pub fn is_favourite(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.registry()?.contains(id))
    }

    /// Favourites panel contents, in insertion order
    pub fn favourites(&self) -> Result<Vec<RenderUnit>, AppError> {
        Ok(self.registry()?.panel().to_vec())
    }

    pub fn favourite_meals(&self) -> Result<Vec<MealSummary>, AppError> {
        Ok(self.registry()?.list().to_vec())
    }

    /// Search immediately and replace the search panel
    pub async fn search(&self, query: &str) -> SearchOutcome {
        self.search.search(query).await
    }

    /// Search once the input has settled
    pub async fn settle(&self, query: &str) -> SearchOutcome {
        self.search.settle(query).await
    }

    pub fn search_results(&self) -> Vec<RenderUnit> {
        self.search.results()
    }

    pub fn search_failure(&self) -> Option<String> {
        self.search.failure()
    }

    pub async fn lookup(&self, id: &str) -> Result<Option<MealDetail>, AppError> {
        self.search.api().lookup(id).await
    }

    /// Detail projection for `id`
    pub async fn show(&self, id: &str) -> Result<Option<DetailView>, AppError> {
        Ok(self.lookup(id).await?.as_ref().map(DetailView::from))
    }

    /// Look up `id` remotely and add it to favourites
    pub async fn add_by_id(&self, id: &str) -> Result<AddResult, AppError> {
        if self.is_favourite(id)? {
            return Ok(AddResult::AlreadyPresent);
        }
        let detail = self
            .lookup(id)
            .await?
            .ok_or_else(|| AppError::MealNotFound(id.to_string()))?;
        self.add(detail.summary)
    }
}
