use crate::db::DBAccess;
use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use cookbook_model::{
    serde_json, CategoryFilter, ModelError, Recipe, RecipeId, RecipeOperations, RecipeWithId,
    RecipesResponse,
};
use futures_util::{StreamExt, TryStreamExt};
use serde::Deserialize;
use sqlx::FromRow;
use std::sync::Arc;
use thiserror::Error as ThisError;
use time::OffsetDateTime;
use tracing::{error, info, warn};

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Database Error: {0}")]
    DB(#[from] sqlx::Error),
    #[error("Stored recipe is malformed: {0}")]
    Model(#[from] ModelError),
    #[error("Invalid recipe: {0}")]
    Invalid(ModelError),
    #[error("Recipe {0} not found")]
    NotFound(RecipeId),
    #[error("Recipe store failed: {0}")]
    Store(String),
}
type Result<T> = std::result::Result<T, Error>;

impl Error {
    fn store<E: std::error::Error>(err: E) -> Error {
        Error::Store(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Invalid(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::DB(_) | Error::Model(_) | Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Postgres backed recipe collection.
pub struct RecipeAccess {
    db_access: Arc<DBAccess>,
}

#[derive(Debug, FromRow)]
pub struct RecipeRep {
    id: i64,
    name: String,
    author: String,
    category: String,
    ingredients: sqlx::types::Json<Vec<String>>,
    steps: sqlx::types::Json<Vec<String>>,
    created_at: OffsetDateTime,
}

impl RecipeRep {
    pub fn model(self) -> Result<RecipeWithId> {
        Ok(RecipeWithId {
            id: RecipeId(self.id),
            data: Recipe {
                name: self.name,
                author: self.author,
                category: self.category.parse()?,
                ingredients: self.ingredients.0,
                steps: self.steps.0,
                created_at: self.created_at,
            },
        })
    }
}

impl RecipeAccess {
    pub fn new(db_access: &Arc<DBAccess>) -> Self {
        RecipeAccess {
            db_access: Arc::clone(db_access),
        }
    }
}

#[async_trait]
impl RecipeOperations for RecipeAccess {
    type Error = Error;

    async fn list_recipes(&self, filter: CategoryFilter) -> Result<Vec<RecipeWithId>> {
        let data = sqlx::query_as::<_, RecipeRep>(
            r#"
SELECT
    id,
    name,
    author,
    category,
    ingredients,
    steps,
    created_at
FROM recipes
WHERE ($1::TEXT IS NULL OR category = $1)
ORDER BY id"#,
        )
        .bind(filter.category().map(|category| category.as_str()))
        .fetch(self.db_access.get_pool())
        .map(|rep_res: std::result::Result<RecipeRep, sqlx::Error>| -> Result<RecipeWithId> {
            rep_res?.model()
        })
        .try_collect::<Vec<_>>()
        .await?;
        Ok(data)
    }

    async fn add_recipe(&self, recipe: Recipe) -> Result<RecipeWithId> {
        let id: i64 = sqlx::query_scalar(
            r#"
INSERT INTO recipes (
    name,
    author,
    category,
    ingredients,
    steps,
    created_at
) VALUES (
    $1,
    $2,
    $3,
    $4,
    $5,
    $6
) RETURNING id
            "#,
        )
        .bind(&recipe.name)
        .bind(&recipe.author)
        .bind(recipe.category.as_str())
        .bind(sqlx::types::Json(recipe.ingredients.clone()))
        .bind(sqlx::types::Json(recipe.steps.clone()))
        .bind(recipe.created_at)
        .fetch_one(self.db_access.get_pool())
        .await?;
        Ok(RecipeWithId {
            id: RecipeId(id),
            data: recipe,
        })
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<bool> {
        let done = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id.0)
            .execute(self.db_access.get_pool())
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

/// Routes for the recipe collection, served under `/api/v1`.
pub fn recipe_routes<S>(store: Arc<S>) -> Router
where
    S: RecipeOperations + Send + Sync + 'static,
{
    Router::new()
        .route("/api/v1/recipes", get(get_all::<S>).put(put::<S>))
        .route("/api/v1/recipes/:id", delete(delete_one::<S>))
        .with_state(store)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: CategoryFilter,
}

pub(crate) async fn get_all<S>(
    State(store): State<Arc<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<RecipesResponse>>
where
    S: RecipeOperations + Send + Sync + 'static,
{
    let recipes = store.list_recipes(query.category).await.map_err(|err| {
        error!("Error getting recipes for {}: {err}", query.category);
        Error::store(err)
    })?;
    Ok(Json(RecipesResponse { recipes }))
}

pub(crate) async fn put<S>(
    State(store): State<Arc<S>>,
    Json(recipe): Json<Recipe>,
) -> Result<Json<RecipeWithId>>
where
    S: RecipeOperations + Send + Sync + 'static,
{
    let recipe = recipe.normalized();
    recipe.validate().map_err(|err| {
        warn!("Rejected recipe: {err}");
        Error::Invalid(err)
    })?;
    let added = store.add_recipe(recipe).await.map_err(|err| {
        error!("Error adding recipe: {err}");
        Error::store(err)
    })?;
    info!("Added recipe {}", added.id);
    Ok(Json(added))
}

pub(crate) async fn delete_one<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<i64>,
) -> Result<Json<()>>
where
    S: RecipeOperations + Send + Sync + 'static,
{
    let id = RecipeId(id);
    let deleted = store.delete_recipe(id).await.map_err(|err| {
        error!("Error deleting recipe {id}: {err}");
        Error::store(err)
    })?;
    if deleted {
        info!("Deleted recipe {id}");
        Ok(Json(()))
    } else {
        Err(Error::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use cookbook_model::{Category, MemoryRecipeStore};
    use time::macros::datetime;
    use tower::ServiceExt;

    struct BrokenStore;

    #[derive(Debug, ThisError)]
    #[error("connection refused")]
    struct Refused;

    #[async_trait]
    impl RecipeOperations for BrokenStore {
        type Error = Refused;

        async fn list_recipes(
            &self,
            _filter: CategoryFilter,
        ) -> std::result::Result<Vec<RecipeWithId>, Refused> {
            Err(Refused)
        }

        async fn add_recipe(&self, _recipe: Recipe) -> std::result::Result<RecipeWithId, Refused> {
            Err(Refused)
        }

        async fn delete_recipe(&self, _id: RecipeId) -> std::result::Result<bool, Refused> {
            Err(Refused)
        }
    }

    fn recipe(name: &str, category: Category) -> Recipe {
        Recipe {
            name: name.into(),
            author: "Al".into(),
            category,
            ingredients: vec!["Flour".into(), "".into(), "Milk".into()],
            steps: vec!["Mix".into(), " ".into()],
            created_at: datetime!(2024-03-01 08:30 UTC),
        }
    }

    async fn send(router: Router, method: Method, uri: &str, body: Option<&Recipe>) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(recipe) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(recipe).unwrap())),
            None => request.body(Body::empty()),
        };
        router.oneshot(request.unwrap()).await.unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn put_strips_blank_entries() {
        let store = Arc::new(MemoryRecipeStore::new());
        let router = recipe_routes(Arc::clone(&store));

        let response = send(
            router,
            Method::PUT,
            "/api/v1/recipes",
            Some(&recipe("Pancakes", Category::Breakfast)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let added: RecipeWithId = json(response).await;
        assert_eq!(added.data.ingredients, vec!["Flour", "Milk"]);
        assert_eq!(added.data.steps, vec!["Mix"]);

        let stored = store.list_recipes(CategoryFilter::All).await.unwrap();
        assert_eq!(stored, vec![added]);
    }

    #[tokio::test]
    async fn put_without_author_is_rejected() {
        let store = Arc::new(MemoryRecipeStore::new());
        let mut nameless = recipe("Soup", Category::Lunch);
        nameless.author = String::new();

        let response = send(
            recipe_routes(Arc::clone(&store)),
            Method::PUT,
            "/api/v1/recipes",
            Some(&nameless),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn get_filters_by_category() {
        let store = Arc::new(MemoryRecipeStore::new());
        store.add_recipe(recipe("Pancakes", Category::Breakfast)).await.unwrap();
        store.add_recipe(recipe("Brownies", Category::Dessert)).await.unwrap();
        let router = recipe_routes(store);

        let all: RecipesResponse =
            json(send(router.clone(), Method::GET, "/api/v1/recipes", None).await).await;
        assert_eq!(all.recipes.len(), 2);

        let all_explicit: RecipesResponse = json(
            send(router.clone(), Method::GET, "/api/v1/recipes?category=all", None).await,
        )
        .await;
        assert_eq!(all_explicit, all);

        let dessert: RecipesResponse = json(
            send(router.clone(), Method::GET, "/api/v1/recipes?category=dessert", None).await,
        )
        .await;
        assert_eq!(dessert.recipes.len(), 1);
        assert_eq!(dessert.recipes[0].data.name, "Brownies");

        let bad = send(router, Method::GET, "/api/v1/recipes?category=brunch", None).await;
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_removes_then_reports_missing() {
        let store = Arc::new(MemoryRecipeStore::new());
        let added = store.add_recipe(recipe("Stew", Category::Dinner)).await.unwrap();
        let kept = store.add_recipe(recipe("Roast", Category::Dinner)).await.unwrap();
        let router = recipe_routes(Arc::clone(&store));
        let uri = format!("/api/v1/recipes/{}", added.id);

        let response = send(router.clone(), Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.list_recipes(CategoryFilter::All).await.unwrap(), vec![kept]);

        let again = send(router, Method::DELETE, &uri, None).await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_failures_are_internal_errors() {
        let router = recipe_routes(Arc::new(BrokenStore));

        let list = send(router.clone(), Method::GET, "/api/v1/recipes", None).await;
        assert_eq!(list.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = json(list).await;
        assert_eq!(body["error"], "Recipe store failed: connection refused");

        let add = send(
            router.clone(),
            Method::PUT,
            "/api/v1/recipes",
            Some(&recipe("Tacos", Category::Dinner)),
        )
        .await;
        assert_eq!(add.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let delete = send(router, Method::DELETE, "/api/v1/recipes/7", None).await;
        assert_eq!(delete.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rows_with_unknown_category_are_rejected() {
        let rep = RecipeRep {
            id: 3,
            name: "Mystery".into(),
            author: "Al".into(),
            category: "brunch".into(),
            ingredients: sqlx::types::Json(vec![]),
            steps: sqlx::types::Json(vec![]),
            created_at: datetime!(2024-03-01 08:30 UTC),
        };
        assert!(matches!(
            rep.model(),
            Err(Error::Model(ModelError::UnknownCategory(_)))
        ));
    }
}
