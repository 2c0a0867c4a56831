use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::AppError;
use crate::meal::MealSummary;
use crate::render::{FavouritesPanel, RenderUnit};
use crate::store::PersistentStore;

/// Outcome of adding a favourite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    Added,
    AlreadyPresent,
}

/// Outcome of removing a favourite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveResult {
    Removed,
    NotFound,
}

/// Authoritative in-memory favourites, flushed to the store on every change.
///
/// The registry is the only writer of its store. After every mutating call
/// returns (successfully or not) the ids held here match what a fresh
/// `store.read()` would return.
pub struct FavouritesRegistry<S> {
    store: S,
    meals: Vec<MealSummary>,
    ids: HashSet<String>,
    panel: FavouritesPanel,
}

impl<S: PersistentStore> FavouritesRegistry<S> {
    /// Load favourites from the store and render the favourites panel
    pub fn hydrate(store: S) -> Self {
        let mut meals = Vec::new();
        let mut ids = HashSet::new();

        for meal in store.read() {
            if meal.id.trim().is_empty() {
                warn!(name = %meal.name, "Skipping stored favourite without an id");
            } else if ids.insert(meal.id.clone()) {
                meals.push(meal);
            } else {
                warn!(id = %meal.id, "Skipping duplicate stored favourite");
            }
        }

        let mut panel = FavouritesPanel::new();
        panel.hydrate(&meals);

        info!(count = meals.len(), "Loaded favourites");

        Self {
            store,
            meals,
            ids,
            panel,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&MealSummary> {
        if !self.contains(id) {
            return None;
        }
        self.meals.iter().find(|meal| meal.id == id)
    }

    /// Add `meal`; a blank id is rejected as malformed
    pub fn add(&mut self, meal: MealSummary) -> Result<AddResult, AppError> {
        if meal.id.trim().is_empty() {
            return Err(AppError::MalformedMeal(format!(
                "meal {:?} has a blank idMeal",
                meal.name
            )));
        }
        if self.contains(&meal.id) {
            return Ok(AddResult::AlreadyPresent);
        }

        self.meals.push(meal.clone());
        if let Err(e) = self.store.write(&self.meals) {
            self.meals.pop();
            return Err(e);
        }

        self.ids.insert(meal.id.clone());
        self.panel.append(&meal);

        info!(id = %meal.id, name = %meal.name, "Added favourite");
        Ok(AddResult::Added)
    }

    pub fn remove(&mut self, id: &str) -> Result<RemoveResult, AppError> {
        let Some(pos) = self.meals.iter().position(|meal| meal.id == id) else {
            return Ok(RemoveResult::NotFound);
        };

        let meal = self.meals.remove(pos);
        if let Err(e) = self.store.write(&self.meals) {
            self.meals.insert(pos, meal);
            return Err(e);
        }

        self.ids.remove(id);
        self.panel.remove(id);

        info!(id, "Removed favourite");
        Ok(RemoveResult::Removed)
    }

    /// Favourites in insertion order
    pub fn list(&self) -> &[MealSummary] {
        &self.meals
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    /// The favourites panel as currently rendered
    pub fn panel(&self) -> &[RenderUnit] {
        self.panel.units()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
