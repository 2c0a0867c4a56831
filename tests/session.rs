use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use meal_favourites::error::AppError;
use meal_favourites::{
    Action, AddResult, FileStore, MealApi, MealDetail, MealSummary, PersistentStore,
    RemoveResult, SearchOutcome, Session,
};
use serde_json::json;

/// Fixed catalogue standing in for TheMealDB
#[derive(Clone)]
struct Catalogue {
    records: Arc<HashMap<String, serde_json::Value>>,
}

impl Catalogue {
    fn new() -> Self {
        let records = [
            json!({
                "idMeal": "52977",
                "strMeal": "Corba",
                "strMealThumb": "https://example.org/corba.jpg",
                "strInstructions": "Pick through your lentils.",
                "strIngredient1": "Lentils",
                "strMeasure1": "1 cup",
                "strIngredient2": "",
                "strIngredient3": "Onion",
                "strMeasure3": "1 large",
            }),
            json!({
                "idMeal": "53060",
                "strMeal": "Burek",
                "strMealThumb": "https://example.org/burek.jpg",
                "strInstructions": "Fry the filling.",
                "strIngredient1": "Filo Pastry",
                "strMeasure1": "1 Packet",
            }),
        ];

        let records = records
            .into_iter()
            .map(|r| (r["idMeal"].as_str().unwrap_or_default().to_string(), r))
            .collect();
        Self {
            records: Arc::new(records),
        }
    }
}

impl MealApi for Catalogue {
    async fn search(&self, query: &str) -> Result<Vec<MealSummary>, AppError> {
        let query = query.to_lowercase();
        let mut meals: Vec<MealSummary> = self
            .records
            .values()
            .map(|r| serde_json::from_value(r.clone()))
            .collect::<Result<_, _>>()?;
        meals.retain(|m| m.name.to_lowercase().contains(&query));
        meals.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(meals)
    }

    async fn lookup(&self, id: &str) -> Result<Option<MealDetail>, AppError> {
        self.records
            .get(id)
            .map(MealDetail::from_record)
            .transpose()
    }
}

fn open(dir: &std::path::Path) -> Session<FileStore, Catalogue> {
    let store = FileStore::new(dir.join("favourites.json"));
    Session::new(store, Catalogue::new(), Duration::ZERO)
}

#[tokio::test]
async fn test_search_add_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let session = open(dir.path());

    assert_eq!(session.search("corba").await, SearchOutcome::Results(1));
    let hit = session.search_results().remove(0);
    assert_eq!(hit.action.label(), "Add to Favourites");

    let dispatched = session.dispatch(hit.action.clone()).unwrap();
    assert_eq!(dispatched.notice(), Some("Meal added to favourites!"));
    let again = session.dispatch(hit.action).unwrap();
    assert_eq!(again.notice(), Some("Meal is already in favourites."));

    assert_eq!(session.add_by_id("53060").await.unwrap(), AddResult::Added);

    // A fresh session sees the same favourites in the same order
    drop(session);
    let reopened = open(dir.path());
    let ids: Vec<_> = reopened
        .favourites()
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(ids, vec!["52977", "53060"]);
}

#[tokio::test]
async fn test_remove_updates_store_and_panel() {
    let dir = tempfile::tempdir().unwrap();
    let session = open(dir.path());

    session.add_by_id("52977").await.unwrap();
    session.add_by_id("53060").await.unwrap();

    let first = session.favourites().unwrap().remove(0);
    assert_eq!(first.action, Action::Remove("52977".to_string()));
    session.dispatch(first.action).unwrap();

    assert_eq!(session.remove("52977").unwrap(), RemoveResult::NotFound);
    assert_eq!(session.favourites().unwrap().len(), 1);

    let stored = FileStore::new(dir.path().join("favourites.json")).read();
    assert_eq!(
        stored,
        vec![MealSummary::new(
            "53060",
            "Burek",
            "https://example.org/burek.jpg"
        )]
    );
}

#[tokio::test]
async fn test_show_compacts_ingredients() {
    let dir = tempfile::tempdir().unwrap();
    let session = open(dir.path());

    let view = session.show("52977").await.unwrap().unwrap();
    assert_eq!(view.ingredient_lines(), vec!["Lentils - 1 cup", "Onion - 1 large"]);
    assert_eq!(view.instructions, "Pick through your lentils.");

    assert!(session.show("1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_favourites_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("favourites.json"), "not json at all").unwrap();

    let session = open(dir.path());
    assert!(session.favourites().unwrap().is_empty());

    // The first mutation overwrites the corrupt slot
    session.add_by_id("53060").await.unwrap();
    assert_eq!(open(dir.path()).favourite_meals().unwrap().len(), 1);
}
