//! # Meal Planner Backend
//!
//! All non-UI logic of the family meal planner.
//!
//! ```text
//! IO Layer (REST API, mappers)
//!     ↓
//! Domain Layer (services, commands, pure calculations)
//!     ↓
//! Storage Layer (CSV/YAML/JSON files under the data directory)
//! ```
//!
//! The AI functions sit beside the domain behind the [`ai::AiClient`] trait.

pub mod ai;
pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Path, Request, State},
    http::{HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ai::{AiClient, OpenAiClient};
use crate::config::AppConfig;
use crate::domain::{
    ChildService, LeftoverService, MealPlanService, PantryService, RecipeService,
    ShoppingListService, StatisticsService,
};
use crate::io::rest::error::error_response;
use crate::io::rest::{
    child_apis, leftover_apis, meal_plan_apis, pantry_apis, recipe_apis, shopping_list_apis,
    statistics_apis,
};
use crate::storage::csv::photo_store::MAX_PHOTO_BYTES;
use crate::storage::csv::CsvConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub child_service: ChildService,
    pub recipe_service: RecipeService,
    pub meal_plan_service: MealPlanService,
    pub leftover_service: LeftoverService,
    pub pantry_service: PantryService,
    pub shopping_list_service: ShoppingListService,
    pub statistics_service: StatisticsService,
}

impl AppState {
    /// Wire every service to one storage connection and AI client.
    /// `public_url` prefixes the URLs of stored photos.
    pub fn new(connection: CsvConnection, ai_client: Arc<dyn AiClient>, public_url: &str) -> Self {
        let child_service = ChildService::new(connection.clone());
        let files_base_url = format!("{}/files", public_url.trim_end_matches('/'));

        Self {
            recipe_service: RecipeService::new(connection.clone(), child_service.clone(), ai_client.clone()),
            meal_plan_service: MealPlanService::new(connection.clone()),
            leftover_service: LeftoverService::new(connection.clone(), ai_client, files_base_url),
            pantry_service: PantryService::new(connection.clone()),
            shopping_list_service: ShoppingListService::new(connection.clone()),
            statistics_service: StatisticsService::new(connection),
            child_service,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_dir.display());
    let connection = CsvConnection::new(&config.data_dir)?;

    info!("Setting up AI client for {}", config.ai.base_url);
    let ai_client: Arc<dyn AiClient> = Arc::new(OpenAiClient::new(config.ai.clone())?);

    info!("Setting up application state");
    Ok(AppState::new(connection, ai_client, &config.public_url))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let profile_routes = Router::new()
        .route(
            "/children",
            get(child_apis::list_children).post(child_apis::create_child),
        )
        .route(
            "/children/:child_id",
            get(child_apis::get_child)
                .put(child_apis::update_child)
                .delete(child_apis::delete_child),
        )
        .route("/recipes", get(recipe_apis::list_recipes))
        .route("/recipes/generate", post(recipe_apis::generate_recipes))
        .route(
            "/recipes/:recipe_id",
            get(recipe_apis::get_recipe).delete(recipe_apis::delete_recipe),
        )
        .route(
            "/meal-plans",
            get(meal_plan_apis::get_week).put(meal_plan_apis::assign_meal),
        )
        .route("/meal-plans/:plan_id", delete(meal_plan_apis::remove_meal))
        .route(
            "/leftovers",
            get(leftover_apis::list_leftovers).post(leftover_apis::create_leftover),
        )
        .route("/leftovers/analyze", post(leftover_apis::analyze_leftovers))
        .route(
            "/leftovers/:leftover_id",
            put(leftover_apis::update_leftover).delete(leftover_apis::delete_leftover),
        )
        .route(
            "/leftovers/:leftover_id/photos",
            post(leftover_apis::upload_photo).layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES)),
        )
        .route(
            "/pantry",
            get(pantry_apis::list_pantry).post(pantry_apis::upsert_pantry_item),
        )
        .route("/pantry/:item_id", delete(pantry_apis::delete_pantry_item))
        .route("/shopping-list", get(shopping_list_apis::get_shopping_list))
        .route(
            "/shopping-list/generate",
            post(shopping_list_apis::generate_shopping_list),
        )
        .route(
            "/shopping-list/items/:index",
            put(shopping_list_apis::update_shopping_item),
        )
        .route("/statistics", get(statistics_apis::get_statistics));

    Ok(Router::new()
        .nest("/api/profiles/:profile_id", profile_routes)
        .route("/files/:profile_id/photos/:file_name", get(serve_photo))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}

async fn health() -> &'static str {
    "ok"
}

/// Serve an uploaded photo; other files in the data directory stay private
async fn serve_photo(
    State(state): State<AppState>,
    Path((profile_id, file_name)): Path<(String, String)>,
    request: Request,
) -> Response {
    let path = match state.leftover_service.photo_file(&profile_id, &file_name) {
        Ok(path) => path,
        Err(e) => return error_response("serve photo", e),
    };
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::stub::StubAiClient;
    use crate::storage::csv::test_utils::TestEnvironment;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, StatusCode};
    use serde_json::{json, Value};

    struct TestApp {
        router: Router,
        _env: TestEnvironment,
    }

    async fn setup_test(ai: StubAiClient) -> TestApp {
        let env = TestEnvironment::new().await.unwrap();
        let state = AppState::new(env.connection.clone(), Arc::new(ai), "http://localhost:3000");
        let router = create_router(state, "http://localhost:8080").unwrap();
        TestApp { router, _env: env }
    }

    impl TestApp {
        async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let mut builder = axum::http::Request::builder().method(method).uri(uri);
            let body = match body {
                Some(json) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };
            self.send_request(builder.body(body).unwrap()).await
        }

        async fn send_request(&self, request: axum::http::Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            (status, value)
        }
    }

    const RECIPES: &str = r#"[
        {"title": "Chicken Rice", "ingredients": [{"item": "rice", "quantity": 1, "unit": "cup"}, {"item": "chicken", "quantity": 200, "unit": "g"}], "nutritional_info": {"calories": 450}},
        {"title": "Peanut Noodles", "allergens": ["peanuts"]}
    ]"#;

    #[tokio::test]
    async fn test_health() {
        let app = setup_test(StubAiClient::default()).await;
        let (status, body) = app.send("GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("ok".to_string()));
    }

    #[tokio::test]
    async fn test_child_lifecycle() {
        let app = setup_test(StubAiClient::default()).await;

        let (status, body) = app
            .send(
                "POST",
                "/api/profiles/family/children",
                Some(json!({"name": "Alice", "birth_date": "2019-05-01", "allergies": ["peanuts"]})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let child_id = body["child"]["id"].as_str().unwrap().to_string();
        assert!(body["child"]["age"]["years"].as_u64().unwrap() >= 5);

        let (status, _) = app
            .send(
                "POST",
                "/api/profiles/family/children",
                Some(json!({"name": "alice", "birth_date": "2020-01-01"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = app
            .send(
                "POST",
                "/api/profiles/family/children",
                Some(json!({"name": "Bob", "birth_date": "yesterday"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send(
                "PUT",
                &format!("/api/profiles/family/children/{}", child_id),
                Some(json!({"preferences": ["soup"]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["child"]["preferences"], json!(["soup"]));

        let (status, body) = app.send("GET", "/api/profiles/family/children", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["children"].as_array().unwrap().len(), 1);

        let uri = format!("/api/profiles/family/children/{}", child_id);
        let (status, _) = app.send("DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send("GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_profile_id_is_rejected() {
        let app = setup_test(StubAiClient::default()).await;
        let (status, _) = app.send("GET", "/api/profiles/bad.profile/children", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_plan_and_shop() {
        let app = setup_test(StubAiClient::with_recipes(RECIPES)).await;

        let (_, body) = app
            .send(
                "POST",
                "/api/profiles/family/children",
                Some(json!({"name": "Alice", "birth_date": "2019-05-01", "allergies": ["peanuts"]})),
            )
            .await;
        let child_id = body["child"]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(
                "POST",
                "/api/profiles/family/recipes/generate",
                Some(json!({"child_ids": [child_id], "meal_type": "dinner", "count": 2})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["recipes"].as_array().unwrap().len(), 1);
        assert_eq!(body["skipped_incompatible"], json!(1));
        let recipe_id = body["recipes"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(
                "GET",
                &format!("/api/profiles/family/recipes?child_ids={}&meal_type=dinner", child_id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recipes"][0]["title"], json!("Chicken Rice"));

        let (status, _) = app
            .send("GET", "/api/profiles/family/recipes?meal_type=brunch", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send(
                "PUT",
                "/api/profiles/family/meal-plans",
                Some(json!({"child_id": child_id, "recipe_id": recipe_id, "date": "2025-03-11", "meal_time": "dinner"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meal_plan"]["recipe_title"], json!("Chicken Rice"));

        let (status, body) = app
            .send("GET", "/api/profiles/family/meal-plans?week_start=2025-03-10", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"].as_array().unwrap().len(), 7);
        assert_eq!(body["days"][1]["meals"][0]["recipe_id"], json!(recipe_id));

        let (status, _) = app
            .send(
                "POST",
                "/api/profiles/family/pantry",
                Some(json!({"name": "Rice", "quantity": 5, "unit": "cup"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .send(
                "POST",
                "/api/profiles/family/shopping-list/generate",
                Some(json!({"start_date": "2025-03-10", "end_date": "2025-03-16"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["items"],
            json!([{"item": "chicken", "quantity": 200.0, "unit": "g", "checked": false}])
        );

        let (status, body) = app
            .send(
                "PUT",
                "/api/profiles/family/shopping-list/items/0",
                Some(json!({"checked": true})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["checked"], json!(true));

        let (status, body) = app
            .send(
                "GET",
                "/api/profiles/family/statistics?start_date=2025-03-10&end_date=2025-03-16",
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_meals"], json!(1));
        assert_eq!(body["nutrition_totals"]["calories"], json!(450.0));
    }

    #[tokio::test]
    async fn test_remove_meal_and_pantry_item() {
        let app = setup_test(StubAiClient::with_recipes(RECIPES)).await;

        let (_, body) = app
            .send(
                "POST",
                "/api/profiles/family/children",
                Some(json!({"name": "Ben", "birth_date": "2020-01-15"})),
            )
            .await;
        let child_id = body["child"]["id"].as_str().unwrap().to_string();
        let (_, body) = app
            .send(
                "POST",
                "/api/profiles/family/recipes/generate",
                Some(json!({"child_ids": [child_id], "meal_type": "lunch", "count": 2})),
            )
            .await;
        let recipe_id = body["recipes"][0]["id"].as_str().unwrap().to_string();

        let (_, body) = app
            .send(
                "PUT",
                "/api/profiles/family/meal-plans",
                Some(json!({"child_id": child_id, "recipe_id": recipe_id, "date": "2025-03-11", "meal_time": "lunch"})),
            )
            .await;
        let plan_uri = format!("/api/profiles/family/meal-plans/{}", body["meal_plan"]["id"].as_str().unwrap());

        let (status, _) = app.send("DELETE", &plan_uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send("DELETE", &plan_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = app
            .send(
                "POST",
                "/api/profiles/family/pantry",
                Some(json!({"name": "Oats", "quantity": 2, "unit": "cup"})),
            )
            .await;
        let item_uri = format!("/api/profiles/family/pantry/{}", body["id"].as_str().unwrap());

        let (status, _) = app.send("DELETE", &item_uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send("DELETE", &item_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = app.send("GET", "/api/profiles/family/pantry", None).await;
        assert_eq!(body["items"], json!([]));
    }

    #[tokio::test]
    async fn test_ai_failure_is_bad_gateway() {
        let app = setup_test(StubAiClient::default()).await;
        let (_, body) = app
            .send(
                "POST",
                "/api/profiles/family/children",
                Some(json!({"name": "Alice", "birth_date": "2019-05-01"})),
            )
            .await;
        let child_id = body["child"]["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .send(
                "POST",
                "/api/profiles/family/recipes/generate",
                Some(json!({"child_ids": [child_id], "meal_type": "lunch"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_leftover_photo_upload_and_serving() {
        let app = setup_test(StubAiClient::with_analysis("Use the rice today.")).await;

        let (status, body) = app
            .send(
                "POST",
                "/api/profiles/family/leftovers",
                Some(json!({"ingredient_name": "rice", "quantity": 2, "unit": "cups", "expiry_date": "2025-03-14"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let leftover_id = body["leftover"]["id"].as_str().unwrap().to_string();

        let request = axum::http::Request::builder()
            .method("POST")
            .uri(format!("/api/profiles/family/leftovers/{}/photos", leftover_id))
            .header(header::CONTENT_TYPE, "image/jpeg")
            .body(Body::from(&b"fake-jpeg"[..]))
            .unwrap();
        let (status, body) = app.send_request(request).await;
        assert_eq!(status, StatusCode::CREATED);
        let url = body["leftover"]["photos"][0].as_str().unwrap().to_string();
        let path = url.strip_prefix("http://localhost:3000").unwrap().to_string();
        assert!(path.starts_with("/files/family/photos/"));

        let (status, body) = app.send("GET", &path, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("fake-jpeg".to_string()));

        let (status, _) = app.send("GET", "/files/family/photos/leftovers.csv", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = axum::http::Request::builder()
            .method("POST")
            .uri(format!("/api/profiles/family/leftovers/{}/photos", leftover_id))
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("not an image"))
            .unwrap();
        let (status, _) = app.send_request(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send("POST", "/api/profiles/family/leftovers/analyze", Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"], json!("Use the rice today."));
    }
}
