use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Number of numbered ingredient/measure slots in a TheMealDB record
pub const INGREDIENT_SLOTS: usize = 20;

/// Lightweight meal record used in list displays and persisted as a favourite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "null_as_empty")]
    pub thumbnail: String,
}

impl MealSummary {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail: thumbnail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measure: measure.into(),
        }
    }
}

/// Full meal record with a dense, ordered ingredient list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealDetail {
    pub summary: MealSummary,
    pub instructions: String,
    pub ingredients: Vec<Ingredient>,
}

impl MealDetail {
    /// Build a detail from a raw lookup record, compacting the numbered slots
    pub fn from_record(record: &Value) -> Result<Self, AppError> {
        let id = extract_str(record, "idMeal")
            .ok_or_else(|| AppError::MalformedMeal("missing idMeal".to_string()))?;
        let name = extract_str(record, "strMeal")
            .ok_or_else(|| AppError::MalformedMeal(format!("meal {} has no strMeal", id)))?;

        Ok(Self {
            summary: MealSummary::new(
                id,
                name,
                extract_str(record, "strMealThumb").unwrap_or_default(),
            ),
            instructions: extract_str(record, "strInstructions").unwrap_or_default(),
            ingredients: compact_ingredients(record),
        })
    }

    pub fn id(&self) -> &str {
        &self.summary.id
    }

    /// Ingredients as (name, measure) pairs
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.ingredients
            .iter()
            .map(|i| (i.name.as_str(), i.measure.as_str()))
            .collect()
    }
}

/// Collapse `strIngredientN`/`strMeasureN` slots into a dense list.
///
/// Slots with a missing, null or blank ingredient are skipped; the relative
/// order of the remaining slots is kept.
pub fn compact_ingredients(record: &Value) -> Vec<Ingredient> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let name = extract_str(record, &format!("strIngredient{}", slot))?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let measure = extract_str(record, &format!("strMeasure{}", slot)).unwrap_or_default();
            Some(Ingredient::new(name, measure.trim()))
        })
        .collect()
}

fn extract_str(record: &Value, field: &str) -> Option<String> {
    match record.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_skips_empty_slots() {
        let record = json!({
            "idMeal": "52977",
            "strMeal": "Corba",
            "strIngredient1": "Salt",
            "strMeasure1": "1 tsp",
            "strIngredient2": "",
            "strMeasure2": "",
            "strIngredient3": "Pepper",
            "strMeasure3": "to taste",
            "strIngredient4": null,
            "strMeasure4": null,
        });

        let detail = MealDetail::from_record(&record).unwrap();
        assert_eq!(
            detail.pairs(),
            vec![("Salt", "1 tsp"), ("Pepper", "to taste")]
        );
    }

    #[test]
    fn test_compact_keeps_late_slots_in_order() {
        let record = json!({
            "strIngredient20": "Parsley",
            "strMeasure20": "garnish",
            "strIngredient7": " Lentils ",
            "strMeasure7": null,
            "strIngredient8": "   ",
            "strMeasure8": "2 cups",
            "strIngredient21": "Ignored",
        });

        assert_eq!(
            compact_ingredients(&record),
            vec![Ingredient::new("Lentils", ""), Ingredient::new("Parsley", "garnish")]
        );
    }

    #[test]
    fn test_from_record_requires_identity() {
        let missing_id = json!({"strMeal": "Corba"});
        assert!(matches!(
            MealDetail::from_record(&missing_id),
            Err(AppError::MalformedMeal(_))
        ));

        let missing_name = json!({"idMeal": "52977"});
        assert!(MealDetail::from_record(&missing_name).is_err());
    }

    #[test]
    fn test_summary_wire_names() {
        let meal: MealSummary = serde_json::from_value(json!({
            "idMeal": "52977",
            "strMeal": "Corba",
            "strMealThumb": null,
            "strCategory": "Side",
        }))
        .unwrap();

        assert_eq!(meal, MealSummary::new("52977", "Corba", ""));

        let value = serde_json::to_value(&meal).unwrap();
        assert_eq!(value["idMeal"], "52977");
        assert_eq!(value["strMeal"], "Corba");
    }
}
