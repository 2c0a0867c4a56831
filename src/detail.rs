use std::fmt;

use crate::meal::{Ingredient, MealDetail};

/// Read-only projection of one meal for the detail display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
}

impl DetailView {
    /// Ingredients formatted as list items, e.g. `Salt - 1 tsp`
    pub fn ingredient_lines(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|i| {
                if i.measure.is_empty() {
                    i.name.clone()
                } else {
                    format!("{} - {}", i.name, i.measure)
                }
            })
            .collect()
    }
}

impl From<&MealDetail> for DetailView {
    fn from(detail: &MealDetail) -> Self {
        Self {
            id: detail.summary.id.clone(),
            name: detail.summary.name.clone(),
            image: detail.summary.thumbnail.clone(),
            ingredients: detail.ingredients.clone(),
            instructions: detail.instructions.clone(),
        }
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        if !self.image.is_empty() {
            writeln!(f, "{}", self.image)?;
        }
        writeln!(f)?;
        writeln!(f, "Ingredients")?;
        for line in self.ingredient_lines() {
            writeln!(f, "  - {}", line)?;
        }
        writeln!(f)?;
        writeln!(f, "Instructions")?;
        write!(f, "{}", self.instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal::MealSummary;

    fn detail() -> MealDetail {
        MealDetail {
            summary: MealSummary::new("52977", "Corba", "https://example.org/corba.jpg"),
            instructions: "Pick through your lentils.".to_string(),
            ingredients: vec![
                Ingredient::new("Lentils", "1 cup"),
                Ingredient::new("Salt", ""),
            ],
        }
    }

    #[test]
    fn test_ingredient_lines() {
        let view = DetailView::from(&detail());
        assert_eq!(view.ingredient_lines(), vec!["Lentils - 1 cup", "Salt"]);
    }

    #[test]
    fn test_display_layout() {
        let text = DetailView::from(&detail()).to_string();
        assert!(text.starts_with("Corba\nhttps://example.org/corba.jpg\n"));
        assert!(text.contains("Ingredients\n  - Lentils - 1 cup\n  - Salt\n"));
        assert!(text.ends_with("Instructions\nPick through your lentils."));
    }
}
