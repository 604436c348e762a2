mod draft;
mod operations;

pub use draft::RecipeDraft;
pub use operations::{MemoryRecipeStore, RecipeOperations};
pub use serde_json;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error as ThisError;
use time::OffsetDateTime;

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown recipe category: {0}")]
    UnknownCategory(String),
    #[error("Recipe name must not be empty")]
    MissingName,
    #[error("Recipe author must not be empty")]
    MissingAuthor,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::Dessert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breakfast => "breakfast",
            Category::Lunch => "lunch",
            Category::Dinner => "dinner",
            Category::Dessert => "dessert",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Lunch => "Lunch",
            Category::Dinner => "Dinner",
            Category::Dessert => "Dessert",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Breakfast => "🍳",
            Category::Lunch => "🥗",
            Category::Dinner => "🍽️",
            Category::Dessert => "🧁",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ModelError::UnknownCategory(s.to_string()))
    }
}

/// Which recipes a listing should return.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub const FILTERS: [CategoryFilter; 5] = [
        CategoryFilter::All,
        CategoryFilter::Only(Category::Breakfast),
        CategoryFilter::Only(Category::Lunch),
        CategoryFilter::Only(Category::Dinner),
        CategoryFilter::Only(Category::Dessert),
    ];

    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => only == category,
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(*category),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All Recipes",
            CategoryFilter::Only(category) => category.label(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CategoryFilter::All => "📚",
            CategoryFilter::Only(category) => category.icon(),
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct RecipeId(pub i64);

impl Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    pub author: String,
    pub category: Category,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Recipe {
    /// Checks the fields a recipe cannot be stored without.
    pub fn validate(&self) -> Result<(), ModelError> {
        if is_blank(&self.name) {
            return Err(ModelError::MissingName);
        }
        if is_blank(&self.author) {
            return Err(ModelError::MissingAuthor);
        }
        Ok(())
    }

    /// Drops blank ingredient and step entries, keeping the order of the rest.
    pub fn normalized(mut self) -> Self {
        self.ingredients = without_blanks(self.ingredients);
        self.steps = without_blanks(self.steps);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeWithId {
    pub id: RecipeId,
    pub data: Recipe,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipesResponse {
    pub recipes: Vec<RecipeWithId>,
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub(crate) fn without_blanks(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .filter(|entry| !is_blank(entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn pancakes() -> Recipe {
        Recipe {
            name: "Pancakes".into(),
            author: "Al".into(),
            category: Category::Breakfast,
            ingredients: vec!["Flour".into(), "".into(), "Milk".into()],
            steps: vec!["Mix".into(), "  ".into()],
            created_at: datetime!(2024-03-01 08:30 UTC),
        }
    }

    #[test]
    fn category_filter_parses_all_and_categories() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "dessert".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Dessert))
        );
        assert_eq!(
            "brunch".parse::<CategoryFilter>(),
            Err(ModelError::UnknownCategory("brunch".into()))
        );
    }

    #[test]
    fn category_filter_matching() {
        assert!(CategoryFilter::All.matches(&Category::Dinner));
        assert!(CategoryFilter::Only(Category::Lunch).matches(&Category::Lunch));
        assert!(!CategoryFilter::Only(Category::Lunch).matches(&Category::Dinner));
    }

    #[test]
    fn labels_follow_dropdown_text() {
        assert_eq!(CategoryFilter::All.label(), "All Recipes");
        assert_eq!(CategoryFilter::Only(Category::Dessert).label(), "Dessert");
        assert_eq!(CategoryFilter::FILTERS[0], CategoryFilter::All);
        assert_eq!(CategoryFilter::FILTERS.len(), Category::ALL.len() + 1);
    }

    #[test]
    fn recipe_json_uses_document_field_names() {
        let json = serde_json::to_value(pancakes()).unwrap();
        assert_eq!(json["category"], "breakfast");
        assert_eq!(json["createdAt"], "2024-03-01T08:30:00Z");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn filter_serialises_as_plain_string() {
        let json = serde_json::to_string(&CategoryFilter::Only(Category::Lunch)).unwrap();
        assert_eq!(json, "\"lunch\"");
        let filter: CategoryFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(filter, CategoryFilter::All);
    }

    #[test]
    fn normalized_drops_blank_entries_in_order() {
        let recipe = pancakes().normalized();
        assert_eq!(recipe.ingredients, vec!["Flour", "Milk"]);
        assert_eq!(recipe.steps, vec!["Mix"]);
    }

    #[test]
    fn validate_requires_name_then_author() {
        let mut recipe = pancakes();
        assert_eq!(recipe.validate(), Ok(()));
        recipe.author = " ".into();
        assert_eq!(recipe.validate(), Err(ModelError::MissingAuthor));
        recipe.name = String::new();
        assert_eq!(recipe.validate(), Err(ModelError::MissingName));
    }
}
