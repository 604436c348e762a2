use async_trait::async_trait;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::{Mutex, PoisonError};

use crate::{CategoryFilter, Recipe, RecipeId, RecipeWithId};

/// The three things the catalog asks of whatever stores its recipes.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RecipeOperations {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn list_recipes(&self, filter: CategoryFilter) -> Result<Vec<RecipeWithId>, Self::Error>;

    async fn add_recipe(&self, recipe: Recipe) -> Result<RecipeWithId, Self::Error>;

    /// Returns `false` when there was no recipe with that id.
    async fn delete_recipe(&self, id: RecipeId) -> Result<bool, Self::Error>;
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    recipes: BTreeMap<RecipeId, Recipe>,
}

/// Keeps recipes in process. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    state: Mutex<MemoryState>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recipes
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RecipeOperations for MemoryRecipeStore {
    type Error = Infallible;

    async fn list_recipes(&self, filter: CategoryFilter) -> Result<Vec<RecipeWithId>, Infallible> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .recipes
            .iter()
            .filter(|(_, recipe)| filter.matches(&recipe.category))
            .map(|(id, recipe)| RecipeWithId {
                id: *id,
                data: recipe.clone(),
            })
            .collect())
    }

    async fn add_recipe(&self, recipe: Recipe) -> Result<RecipeWithId, Infallible> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.last_id += 1;
        let id = RecipeId(state.last_id);
        state.recipes.insert(id, recipe.clone());
        Ok(RecipeWithId { id, data: recipe })
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<bool, Infallible> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state.recipes.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;
    use time::macros::datetime;

    fn recipe(name: &str, category: Category) -> Recipe {
        Recipe {
            name: name.into(),
            author: "Al".into(),
            category,
            ingredients: vec!["salt".into()],
            steps: vec!["cook".into()],
            created_at: datetime!(2024-05-05 12:00 UTC),
        }
    }

    #[tokio::test]
    async fn list_all_and_by_category() {
        let store = MemoryRecipeStore::new();
        store.add_recipe(recipe("Omelette", Category::Breakfast)).await.unwrap();
        store.add_recipe(recipe("Stew", Category::Dinner)).await.unwrap();
        store.add_recipe(recipe("Porridge", Category::Breakfast)).await.unwrap();

        let all = store.list_recipes(CategoryFilter::All).await.unwrap();
        assert_eq!(all.len(), 3);

        let breakfast = store
            .list_recipes(CategoryFilter::Only(Category::Breakfast))
            .await
            .unwrap();
        assert_eq!(breakfast.len(), 2);
        assert!(breakfast
            .iter()
            .all(|recipe| recipe.data.category == Category::Breakfast));

        let dessert = store
            .list_recipes(CategoryFilter::Only(Category::Dessert))
            .await
            .unwrap();
        assert!(dessert.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let store = MemoryRecipeStore::new();
        let first = store.add_recipe(recipe("Salad", Category::Lunch)).await.unwrap();
        let second = store.add_recipe(recipe("Wrap", Category::Lunch)).await.unwrap();
        assert_ne!(first.id, second.id);

        assert!(store.delete_recipe(first.id).await.unwrap());
        assert!(!store.delete_recipe(first.id).await.unwrap());

        let left = store.list_recipes(CategoryFilter::All).await.unwrap();
        assert_eq!(left, vec![second]);
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        let store = MemoryRecipeStore::new();
        let first = store.add_recipe(recipe("Cake", Category::Dessert)).await.unwrap();
        store.delete_recipe(first.id).await.unwrap();
        let second = store.add_recipe(recipe("Pie", Category::Dessert)).await.unwrap();
        assert!(second.id > first.id);
        assert_eq!(store.len(), 1);
    }
}
