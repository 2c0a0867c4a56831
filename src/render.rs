use crate::meal::MealSummary;

/// Which panel a list is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Search results, each offering "add"
    Search,
    /// Favourites, each offering "remove"
    Favourites,
}

/// Action bound to one rendered entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(MealSummary),
    Remove(String),
}

impl Action {
    /// Identifier of the meal the action targets
    pub fn id(&self) -> &str {
        match self {
            Action::Add(meal) => &meal.id,
            Action::Remove(id) => id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::Add(_) => "Add to Favourites",
            Action::Remove(_) => "Remove from Favourites",
        }
    }
}

/// One renderable entry: display fields plus its bound action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderUnit {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub action: Action,
}

/// Project a single summary for the given mode
pub fn render_one(meal: &MealSummary, mode: Mode) -> RenderUnit {
    let action = match mode {
        Mode::Search => Action::Add(meal.clone()),
        Mode::Favourites => Action::Remove(meal.id.clone()),
    };

    RenderUnit {
        id: meal.id.clone(),
        name: meal.name.clone(),
        thumbnail: meal.thumbnail.clone(),
        action,
    }
}

/// Project a list of summaries, preserving order
pub fn render(meals: &[MealSummary], mode: Mode) -> Vec<RenderUnit> {
    meals.iter().map(|meal| render_one(meal, mode)).collect()
}

/// Search results panel; every response replaces it wholesale
#[derive(Debug, Clone, Default)]
pub struct SearchPanel {
    units: Vec<RenderUnit>,
    failure: Option<String>,
}

impl SearchPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, units: Vec<RenderUnit>) {
        self.units = units;
        self.failure = None;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Show a failed search instead of an empty result list
    pub fn fail(&mut self, message: impl Into<String>) {
        self.units.clear();
        self.failure = Some(message.into());
    }

    pub fn units(&self) -> &[RenderUnit] {
        &self.units
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

/// Favourites panel; updated incrementally as the registry changes
#[derive(Debug, Clone, Default)]
pub struct FavouritesPanel {
    units: Vec<RenderUnit>,
}

impl FavouritesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk render at startup
    pub fn hydrate(&mut self, meals: &[MealSummary]) {
        self.units = render(meals, Mode::Favourites);
    }

    pub fn append(&mut self, meal: &MealSummary) {
        self.units.push(render_one(meal, Mode::Favourites));
    }

    /// Remove the entry for `id` wherever it sits
    pub fn remove(&mut self, id: &str) -> bool {
        match self.units.iter().position(|unit| unit.id == id) {
            Some(pos) => {
                self.units.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn units(&self) -> &[RenderUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
