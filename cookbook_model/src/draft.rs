use time::OffsetDateTime;

use crate::{is_blank, without_blanks, Category, ModelError, Recipe};

/// The add-recipe form as the user is filling it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub author: String,
    pub category: Category,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        RecipeDraft {
            name: String::new(),
            author: String::new(),
            category: Category::Breakfast,
            ingredients: vec![String::new()],
            steps: vec![String::new()],
        }
    }
}

impl RecipeDraft {
    pub fn add_ingredient_field(&mut self) {
        self.ingredients.push(String::new());
    }

    pub fn add_step_field(&mut self) {
        self.steps.push(String::new());
    }

    /// The last remaining field is never removed.
    pub fn remove_ingredient(&mut self, idx: usize) -> bool {
        remove_field(&mut self.ingredients, idx)
    }

    pub fn remove_step(&mut self, idx: usize) -> bool {
        remove_field(&mut self.steps, idx)
    }

    pub fn set_ingredient(&mut self, idx: usize, value: impl Into<String>) -> bool {
        set_field(&mut self.ingredients, idx, value.into())
    }

    pub fn set_step(&mut self, idx: usize, value: impl Into<String>) -> bool {
        set_field(&mut self.steps, idx, value.into())
    }

    pub fn is_submittable(&self) -> bool {
        !is_blank(&self.name) && !is_blank(&self.author)
    }

    /// Turns the draft into a storable recipe stamped with `created_at`.
    pub fn validate(&self, created_at: OffsetDateTime) -> Result<Recipe, ModelError> {
        let recipe = Recipe {
            name: self.name.clone(),
            author: self.author.clone(),
            category: self.category,
            ingredients: without_blanks(self.ingredients.clone()),
            steps: without_blanks(self.steps.clone()),
            created_at,
        };
        recipe.validate()?;
        Ok(recipe)
    }
}

fn remove_field(fields: &mut Vec<String>, idx: usize) -> bool {
    if fields.len() <= 1 || idx >= fields.len() {
        return false;
    }
    fields.remove(idx);
    true
}

fn set_field(fields: &mut [String], idx: usize, value: String) -> bool {
    match fields.get_mut(idx) {
        Some(field) => {
            *field = value;
            true
        }
        None => false,
    }
}
