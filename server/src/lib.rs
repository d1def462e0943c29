//! REST API for the todo tracker.
//!
//! `/api/todos` lists and creates, `/api/todos/{id}` reads, updates and
//! deletes a single todo, `/api/test` answers liveness probes. Bodies use the
//! `{success, data | message | error}` envelope from [`model::Envelope`].

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod repo;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use error::AppError;
pub use model::{CreateTodo, Envelope, Health, Todo, UpdateTodo};

pub type Db = SqlitePool;

const COLLECTION_ALLOW: &str = "GET, POST";
const ITEM_ALLOW: &str = "GET, PUT, DELETE";

pub fn app(db: Db) -> Router {
    Router::new()
        .route(
            "/api/todos",
            get(list_todos)
                .post(create_todo)
                .fallback(collection_not_allowed),
        )
        .route(
            "/api/todos/{id}",
            get(get_todo)
                .put(update_todo)
                .delete(delete_todo)
                .fallback(item_not_allowed),
        )
        .route("/api/test", any(health))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app(db)).await
}

async fn list_todos(State(db): State<Db>) -> Result<Json<Envelope<Vec<Todo>>>, AppError> {
    let todos = repo::list(&db).await?;
    Ok(Json(Envelope::data(todos)))
}

/// Titles are checked here as well as in the client form, so a blank or
/// whitespace-only title is a 422 `Validation` error rather than a stored row.
async fn create_todo(
    State(db): State<Db>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Todo>>), AppError> {
    let Json(input) = payload?;
    require_title(&input.title)?;
    let todo = repo::create(&db, input).await?;
    tracing::info!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(Envelope::data(todo))))
}

async fn get_todo(
    State(db): State<Db>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Envelope<Todo>>, AppError> {
    let Path(id) = path?;
    let todo = repo::find(&db, id).await?;
    Ok(Json(Envelope::data(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Envelope<Todo>>, AppError> {
    let Path(id) = path?;
    let Json(input) = payload?;
    if let Some(title) = &input.title {
        require_title(title)?;
    }
    let todo = repo::update(&db, id, input).await?;
    tracing::info!(%id, status = todo.status, "todo updated");
    Ok(Json(Envelope::data(todo)))
}

async fn delete_todo(
    State(db): State<Db>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Envelope<()>>, AppError> {
    let Path(id) = path?;
    repo::delete(&db, id).await?;
    tracing::info!(%id, "todo deleted");
    Ok(Json(Envelope::message("Todo deleted successfully")))
}

async fn health(method: Method) -> Json<Health> {
    Json(Health {
        success: true,
        message: "API is running".to_string(),
        timestamp: Utc::now(),
        method: method.to_string(),
    })
}

async fn collection_not_allowed(method: Method) -> Response {
    method_not_allowed(&method, COLLECTION_ALLOW)
}

async fn item_not_allowed(method: Method) -> Response {
    method_not_allowed(&method, ITEM_ALLOW)
}

fn method_not_allowed(method: &Method, allow: &'static str) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, allow)],
        format!("Method {method} Not Allowed"),
    )
        .into_response()
}

fn require_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}
