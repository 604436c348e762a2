//! State behind the recipe browser screen.
//!
//! Every data operation comes in two halves: `begin_*` flips the flags and
//! hands back what the store call needs, `finish_*` applies the outcome. The
//! UI awaits the store between the two; the async helpers at the bottom do
//! the same against any [`RecipeOperations`].

use cookbook_model::{
    CategoryFilter, Recipe, RecipeDraft, RecipeId, RecipeOperations, RecipeWithId,
};
use log::{error, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::Display;
use time::OffsetDateTime;

pub const LOAD_FAILED: &str = "Failed to load recipes";
pub const ADD_FAILED: &str = "Failed to add recipe";
pub const DELETE_FAILED: &str = "Failed to delete recipe";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeBrowser {
    recipes: Vec<RecipeWithId>,
    filter: CategoryFilter,
    selected: Option<RecipeId>,
    show_dropdown: bool,
    show_add_form: bool,
    loading: bool,
    error: Option<&'static str>,
    draft: RecipeDraft,
}

impl RecipeBrowser {
    pub fn recipes(&self) -> &[RecipeWithId] {
        &self.recipes
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn selected_id(&self) -> Option<RecipeId> {
        self.selected
    }

    pub fn selected_recipe(&self) -> Option<&RecipeWithId> {
        let selected = self.selected?;
        self.recipes.iter().find(|recipe| recipe.id == selected)
    }

    pub fn show_dropdown(&self) -> bool {
        self.show_dropdown
    }

    pub fn show_add_form(&self) -> bool {
        self.show_add_form
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut RecipeDraft {
        &mut self.draft
    }

    pub fn can_pick_random(&self) -> bool {
        !self.loading && !self.recipes.is_empty()
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && self.draft.is_submittable()
    }

    pub fn toggle_dropdown(&mut self) {
        self.show_dropdown = !self.show_dropdown;
    }

    /// Switches the filter. The caller reloads afterwards.
    pub fn select_category(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        self.show_dropdown = false;
        self.selected = None;
    }

    /// Only recipes that are currently loaded can be selected.
    pub fn select(&mut self, id: RecipeId) -> bool {
        if self.recipes.iter().any(|recipe| recipe.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn pick_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<RecipeId> {
        let id = self.recipes.choose(rng)?.id;
        self.selected = Some(id);
        Some(id)
    }

    pub fn open_add_form(&mut self) {
        self.show_add_form = true;
    }

    pub fn close_add_form(&mut self) {
        self.show_add_form = false;
    }

    pub fn begin_load(&mut self) -> CategoryFilter {
        self.loading = true;
        self.error = None;
        self.filter
    }

    pub fn finish_load<E: Display>(&mut self, result: Result<Vec<RecipeWithId>, E>) {
        self.loading = false;
        match result {
            Ok(recipes) => {
                self.recipes = recipes;
                if self.selected_recipe().is_none() {
                    self.selected = self.recipes.first().map(|recipe| recipe.id);
                }
            }
            Err(err) => {
                error!("Error getting recipes: {err}");
                self.recipes.clear();
                self.selected = None;
                self.error = Some(LOAD_FAILED);
            }
        }
    }

    /// `None` means the draft is missing a name or author and nothing should
    /// be sent to the store.
    pub fn begin_add(&mut self, now: OffsetDateTime) -> Option<Recipe> {
        match self.draft.validate(now) {
            Ok(recipe) => {
                self.loading = true;
                self.error = None;
                Some(recipe)
            }
            Err(err) => {
                warn!("Not adding recipe: {err}");
                None
            }
        }
    }

    /// On success the draft is reset and the form closed. The caller reloads.
    pub fn finish_add<E: Display>(&mut self, result: Result<RecipeWithId, E>) -> bool {
        self.loading = false;
        match result {
            Ok(_) => {
                self.draft = RecipeDraft::default();
                self.show_add_form = false;
                true
            }
            Err(err) => {
                error!("Error adding recipe: {err}");
                self.error = Some(ADD_FAILED);
                false
            }
        }
    }

    pub fn begin_delete(&mut self, id: RecipeId) -> RecipeId {
        self.loading = true;
        self.error = None;
        id
    }

    pub fn finish_delete<E: Display>(&mut self, id: RecipeId, result: Result<bool, E>) {
        self.loading = false;
        match result {
            Ok(existed) => {
                if !existed {
                    warn!("Recipe {id} was already gone");
                }
                self.recipes.retain(|recipe| recipe.id != id);
                if self.selected == Some(id) {
                    self.selected = None;
                }
            }
            Err(err) => {
                error!("Error deleting recipe {id}: {err}");
                self.error = Some(DELETE_FAILED);
            }
        }
    }

    pub async fn load<O: RecipeOperations>(&mut self, ops: &O) {
        let filter = self.begin_load();
        let result = ops.list_recipes(filter).await;
        self.finish_load(result);
    }

    pub async fn change_category<O: RecipeOperations>(&mut self, ops: &O, filter: CategoryFilter) {
        self.select_category(filter);
        self.load(ops).await;
    }

    /// Returns whether the recipe was stored.
    pub async fn add<O: RecipeOperations>(&mut self, ops: &O, now: OffsetDateTime) -> bool {
        let Some(recipe) = self.begin_add(now) else {
            return false;
        };
        let result = ops.add_recipe(recipe).await;
        let added = self.finish_add(result);
        if added {
            self.load(ops).await;
        }
        added
    }

    pub async fn delete<O: RecipeOperations>(&mut self, ops: &O, id: RecipeId) {
        let id = self.begin_delete(id);
        let result = ops.delete_recipe(id).await;
        self.finish_delete(id, result);
    }
}
