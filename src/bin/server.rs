use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use meal_favourites::config::Config;
use meal_favourites::error::AppError;
use meal_favourites::{
    Action, AddResult, DefaultSession, DetailView, Dispatched, MealSummary, RemoveResult,
    RenderUnit, SearchOutcome,
};

// === API Documentation ===

#[derive(OpenApi)]
#[openapi(
    paths(search, get_meal, list_favourites, add_favourite, remove_favourite),
    components(
        schemas(
            SearchParams,
            SearchResponse,
            RenderUnitResponse,
            ActionResponse,
            DetailResponse,
            IngredientResponse,
            FavouritesResponse,
            AddFavouriteRequest,
            AddFavouriteResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "search", description = "Recipe search and detail endpoints"),
        (name = "favourites", description = "Favourites management endpoints")
    )
)]
struct ApiDoc;

// === Request/Response Types ===

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
struct SearchParams {
    /// Meal name to search for; blank clears the results
    #[serde(default)]
    q: String,
}

/// The action bound to a rendered entry
#[derive(Debug, Serialize, ToSchema)]
struct ActionResponse {
    /// "add" or "remove"
    kind: String,
    /// Button label
    label: String,
    /// Meal the action targets
    meal_id: String,
}

/// One rendered meal entry
#[derive(Debug, Serialize, ToSchema)]
struct RenderUnitResponse {
    id: String,
    name: String,
    thumbnail: String,
    action: ActionResponse,
}

impl From<RenderUnit> for RenderUnitResponse {
    fn from(unit: RenderUnit) -> Self {
        let kind = match unit.action {
            Action::Add(_) => "add",
            Action::Remove(_) => "remove",
        };
        Self {
            action: ActionResponse {
                kind: kind.to_string(),
                label: unit.action.label().to_string(),
                meal_id: unit.action.id().to_string(),
            },
            id: unit.id,
            name: unit.name,
            thumbnail: unit.thumbnail,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
struct SearchResponse {
    /// "results", "cleared", "failed" or "superseded"
    status: String,
    /// Search panel contents after this request
    results: Vec<RenderUnitResponse>,
    count: usize,
    /// Failure message when status is "failed"
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
struct IngredientResponse {
    name: String,
    measure: String,
}

#[derive(Debug, Serialize, ToSchema)]
struct DetailResponse {
    id: String,
    name: String,
    image: String,
    ingredients: Vec<IngredientResponse>,
    instructions: String,
}

impl From<DetailView> for DetailResponse {
    fn from(view: DetailView) -> Self {
        Self {
            id: view.id,
            name: view.name,
            image: view.image,
            ingredients: view
                .ingredients
                .into_iter()
                .map(|i| IngredientResponse {
                    name: i.name,
                    measure: i.measure,
                })
                .collect(),
            instructions: view.instructions,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
struct FavouritesResponse {
    favourites: Vec<RenderUnitResponse>,
    count: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
struct AddFavouriteRequest {
    /// Meal ID (idMeal)
    id: String,
    name: String,
    #[serde(default)]
    thumbnail: String,
}

#[derive(Debug, Serialize, ToSchema)]
struct AddFavouriteResponse {
    /// "added" or "already_present"
    result: String,
    /// Message to show the user
    notice: Option<String>,
    /// Favourites count after the request
    count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
struct ErrorResponse {
    /// Error message
    error: String,
}

// === Helper Functions ===

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn units(units: Vec<RenderUnit>) -> Vec<RenderUnitResponse> {
    units.into_iter().map(RenderUnitResponse::from).collect()
}

// === Handlers ===

/// Search meals by name and return the search panel
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(SearchParams),
    responses(
        (status = 200, description = "Search panel contents", body = SearchResponse),
        (status = 502, description = "Remote search failed", body = SearchResponse),
    )
)]
async fn search(
    State(session): State<DefaultSession>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let outcome = session.search(&params.q).await;
    let results = units(session.search_results());

    let (status_code, status, error) = match outcome {
        SearchOutcome::Results(_) => (StatusCode::OK, "results", None),
        SearchOutcome::Cleared => (StatusCode::OK, "cleared", None),
        SearchOutcome::Superseded => (StatusCode::OK, "superseded", None),
        SearchOutcome::Failed(e) => (StatusCode::BAD_GATEWAY, "failed", Some(e)),
    };

    let response = SearchResponse {
        status: status.to_string(),
        count: results.len(),
        results,
        error,
    };
    (status_code, Json(response)).into_response()
}

/// Get ingredients and instructions for a meal
#[utoipa::path(
    get,
    path = "/meals/{meal_id}",
    tag = "search",
    params(
        ("meal_id" = String, Path, description = "Meal ID (idMeal)")
    ),
    responses(
        (status = 200, description = "Meal detail", body = DetailResponse),
        (status = 404, description = "Meal not found", body = ErrorResponse),
        (status = 502, description = "Remote lookup failed", body = ErrorResponse),
    )
)]
async fn get_meal(
    State(session): State<DefaultSession>,
    Path(meal_id): Path<String>,
) -> impl IntoResponse {
    match session.show(&meal_id).await {
        Ok(Some(view)) => (StatusCode::OK, Json(DetailResponse::from(view))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Meal not found"),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, format!("Lookup failed: {}", e)),
    }
}

/// List favourites in the order they were added
#[utoipa::path(
    get,
    path = "/favourites",
    tag = "favourites",
    responses(
        (status = 200, description = "Favourites panel", body = FavouritesResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn list_favourites(State(session): State<DefaultSession>) -> impl IntoResponse {
    match session.favourites() {
        Ok(favourites) => {
            let favourites = units(favourites);
            let count = favourites.len();
            (StatusCode::OK, Json(FavouritesResponse { favourites, count })).into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// Add a meal to favourites
#[utoipa::path(
    post,
    path = "/favourites",
    tag = "favourites",
    request_body = AddFavouriteRequest,
    responses(
        (status = 201, description = "Meal added", body = AddFavouriteResponse),
        (status = 200, description = "Meal was already a favourite", body = AddFavouriteResponse),
        (status = 400, description = "Blank meal id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn add_favourite(
    State(session): State<DefaultSession>,
    Json(req): Json<AddFavouriteRequest>,
) -> impl IntoResponse {
    if req.id.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Meal id must not be blank");
    }
    let meal = MealSummary::new(req.id, req.name, req.thumbnail);

    let result = tokio::task::spawn_blocking(move || {
        let dispatched = session.dispatch(Action::Add(meal))?;
        let count = session.favourites()?.len();
        Ok::<_, AppError>((dispatched, count))
    })
    .await;

    match result {
        Ok(Ok((dispatched, count))) => {
            let (status, label) = match dispatched {
                Dispatched::Add(AddResult::Added) => (StatusCode::CREATED, "added"),
                _ => (StatusCode::OK, "already_present"),
            };
            let response = AddFavouriteResponse {
                result: label.to_string(),
                notice: dispatched.notice().map(String::from),
                count,
            };
            (status, Json(response)).into_response()
        }
        Ok(Err(e @ AppError::MalformedMeal(_))) => error_response(StatusCode::BAD_REQUEST, e),
        Ok(Err(e)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to add favourite: {}", e),
        ),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Task join error: {}", e),
        ),
    }
}

/// Remove a meal from favourites
#[utoipa::path(
    delete,
    path = "/favourites/{meal_id}",
    tag = "favourites",
    params(
        ("meal_id" = String, Path, description = "Meal ID to remove")
    ),
    responses(
        (status = 204, description = "Favourite removed"),
        (status = 404, description = "Meal is not a favourite", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn remove_favourite(
    State(session): State<DefaultSession>,
    Path(meal_id): Path<String>,
) -> impl IntoResponse {
    let result =
        tokio::task::spawn_blocking(move || session.dispatch(Action::Remove(meal_id))).await;

    match result {
        Ok(Ok(Dispatched::Remove(RemoveResult::NotFound))) => {
            error_response(StatusCode::NOT_FOUND, "Meal is not a favourite")
        }
        Ok(Ok(_)) => StatusCode::NO_CONTENT.into_response(),
        Ok(Err(e)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to remove favourite: {}", e),
        ),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Task join error: {}", e),
        ),
    }
}

// === Main ===

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr().to_string();
    let port = config.port();

    info!(path = %config.favourites_path().display(), "Opening favourites");
    let session = DefaultSession::open(&config);
    info!("Loaded {} favourites", session.favourites()?.len());

    let swagger = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    let app = Router::new()
        .merge(swagger)
        .route("/", get(|| async { Redirect::permanent("/swagger-ui") }))
        .route("/search", get(search))
        .route("/meals/{meal_id}", get(get_meal))
        .route("/favourites", get(list_favourites).post(add_favourite))
        .route("/favourites/{meal_id}", delete(remove_favourite))
        .with_state(session)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    info!("Server running at http://{}:{}", bind_addr, port);
    info!(
        "Swagger UI available at http://{}:{}/swagger-ui/",
        bind_addr, port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
