use async_trait::async_trait;
use cookbook_model::{
    CategoryFilter, Recipe, RecipeId, RecipeOperations, RecipeWithId, RecipesResponse,
};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to do some HTTP: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Bad response: {0}")]
    Http(String),
}

async fn response_http_err<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await?;
        Err(Error::Http(format!("{status} – {text}")))
    } else {
        Ok(resp.json::<T>().await?)
    }
}

/// Talks to the recipe routes of the cookbook server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn recipes_url(&self) -> String {
        format!("{}/api/v1/recipes", self.base_url)
    }

    pub fn list_url(&self, filter: CategoryFilter) -> String {
        format!("{}?category={filter}", self.recipes_url())
    }

    pub fn recipe_url(&self, id: RecipeId) -> String {
        format!("{}/{id}", self.recipes_url())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RecipeOperations for ApiClient {
    type Error = Error;

    async fn list_recipes(&self, filter: CategoryFilter) -> Result<Vec<RecipeWithId>, Error> {
        let resp = self.client.get(self.list_url(filter)).send().await?;
        let RecipesResponse { recipes } = response_http_err(resp).await?;
        Ok(recipes)
    }

    async fn add_recipe(&self, recipe: Recipe) -> Result<RecipeWithId, Error> {
        let resp = self
            .client
            .put(self.recipes_url())
            .json(&recipe)
            .send()
            .await?;
        response_http_err(resp).await
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<bool, Error> {
        let resp = self.client.delete(self.recipe_url(id)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        response_http_err::<()>(resp).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_backend::recipe_service::recipe_routes;
    use cookbook_model::{Category, MemoryRecipeStore};
    use std::sync::Arc;
    use time::macros::datetime;
    use tokio::net::TcpListener;

    async fn serve_memory_store() -> ApiClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = recipe_routes(Arc::new(MemoryRecipeStore::new()));
        tokio::spawn(async move { axum::serve(listener, router).await });
        ApiClient::new(format!("http://{addr}"))
    }

    fn soup(author: &str) -> Recipe {
        Recipe {
            name: "Soup".into(),
            author: author.into(),
            category: Category::Lunch,
            ingredients: vec!["water".into(), " ".into()],
            steps: vec!["boil".into()],
            created_at: datetime!(2024-03-01 12:00 UTC),
        }
    }

    #[test]
    fn urls_hang_off_the_base() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.recipes_url(), "http://localhost:8080/api/v1/recipes");
        assert_eq!(
            client.list_url(CategoryFilter::All),
            "http://localhost:8080/api/v1/recipes?category=all"
        );
        assert_eq!(
            client.list_url(CategoryFilter::Only(Category::Dinner)),
            "http://localhost:8080/api/v1/recipes?category=dinner"
        );
        assert_eq!(
            client.recipe_url(RecipeId(42)),
            "http://localhost:8080/api/v1/recipes/42"
        );
    }

    #[tokio::test]
    async fn talks_to_the_recipe_routes() {
        let client = serve_memory_store().await;

        let added = client.add_recipe(soup("Bea")).await.unwrap();
        assert_eq!(added.data.ingredients, vec!["water"]);

        let lunch = client
            .list_recipes(CategoryFilter::Only(Category::Lunch))
            .await
            .unwrap();
        assert_eq!(lunch, vec![added.clone()]);
        let dinner = client
            .list_recipes(CategoryFilter::Only(Category::Dinner))
            .await
            .unwrap();
        assert!(dinner.is_empty());

        assert!(client.delete_recipe(added.id).await.unwrap());
        assert!(!client.delete_recipe(added.id).await.unwrap());
    }

    #[tokio::test]
    async fn rejected_recipes_carry_status_and_body() {
        let client = serve_memory_store().await;

        match client.add_recipe(soup("  ")).await {
            Err(Error::Http(msg)) => {
                assert!(msg.starts_with("400 Bad Request"), "{msg}");
                assert!(msg.contains("Recipe author must not be empty"), "{msg}");
            }
            other => panic!("expected an http error, got {other:?}"),
        }
        assert!(client.list_recipes(CategoryFilter::All).await.unwrap().is_empty());
    }
}
