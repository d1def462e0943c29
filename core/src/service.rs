//! Named todo operations over the REST endpoints.
//!
//! Each function maps to one verb on `/api/todos` or `/api/todos/{id}` and
//! unwraps the `{success, data}` envelope.

use serde::de::IgnoredAny;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{CreateTodo, Envelope, Todo, UpdateTodo};

const TODOS_PATH: &str = "/api/todos";

#[derive(Debug, Clone)]
pub struct TodoService<T> {
    client: ApiClient<T>,
}

impl TodoService<UreqTransport> {
    /// Service talking to `base_url` over ureq.
    pub fn connect(base_url: &str) -> Self {
        Self::new(ApiClient::new(base_url, UreqTransport::new()))
    }
}

impl<T: Transport> TodoService<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    pub fn get_all_todos(&self) -> Result<Vec<Todo>, ApiError> {
        self.client
            .get::<Envelope<Vec<Todo>>>(TODOS_PATH)
            .and_then(into_data)
            .inspect_err(|e| log_failure("get_all_todos", e))
    }

    pub fn get_todo_by_id(&self, id: Uuid) -> Result<Todo, ApiError> {
        self.client
            .get::<Envelope<Todo>>(&item_path(id))
            .and_then(into_data)
            .inspect_err(|e| log_failure("get_todo_by_id", e))
    }

    pub fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        self.client
            .post::<_, Envelope<Todo>>(TODOS_PATH, input)
            .and_then(into_data)
            .inspect_err(|e| log_failure("create_todo", e))
    }

    pub fn update_todo(&self, id: Uuid, input: &UpdateTodo) -> Result<Todo, ApiError> {
        self.client
            .put::<_, Envelope<Todo>>(&item_path(id), input)
            .and_then(into_data)
            .inspect_err(|e| log_failure("update_todo", e))
    }

    /// Returns the server's confirmation message.
    pub fn delete_todo(&self, id: Uuid) -> Result<String, ApiError> {
        self.client
            .delete::<Envelope<IgnoredAny>>(&item_path(id))
            .and_then(|envelope| {
                check_success(&envelope)?;
                Ok(envelope.message.unwrap_or_default())
            })
            .inspect_err(|e| log_failure("delete_todo", e))
    }
}

fn item_path(id: Uuid) -> String {
    format!("{TODOS_PATH}/{id}")
}

fn into_data<D>(envelope: Envelope<D>) -> Result<D, ApiError> {
    check_success(&envelope)?;
    envelope
        .data
        .ok_or_else(|| ApiError::DeserializationError("response envelope has no data".to_string()))
}

fn check_success<D>(envelope: &Envelope<D>) -> Result<(), ApiError> {
    if envelope.success {
        return Ok(());
    }
    Err(ApiError::Rejected(
        envelope
            .error
            .clone()
            .unwrap_or_else(|| "request failed".to_string()),
    ))
}

fn log_failure(operation: &'static str, error: &ApiError) {
    tracing::error!(operation, %error, "todo service call failed");
}
