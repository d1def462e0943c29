//! Client core for the todo service.
//!
//! # Overview
//! Layers, bottom up:
//! - [`http`] / [`transport`]: requests and responses as plain data, and the
//!   [`Transport`] trait that executes them (ureq in production).
//! - [`client`]: verb helpers (`get`, `post`, `put`, `delete`) against a base URL.
//! - [`service`]: named todo operations mapped onto the REST endpoints.
//! - [`store`]: the client-side todo list with change subscriptions.
//! - [`page`]: the form/list/edit controller driving the other layers.
//!
//! # Design
//! - Everything is synchronous and single-threaded; the page owns its store.
//! - The store changes only after the server confirms a mutation.
//! - DTOs are defined independently from the server crate; the integration
//!   test catches schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod page;
pub mod service;
pub mod store;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use page::{Dialog, EditDraft, TodoForm, TodoPage};
pub use service::TodoService;
pub use store::{SubscriptionId, TodoState, TodoStore};
pub use transport::{Transport, UreqTransport};
pub use types::{CreateTodo, Envelope, Todo, UpdateTodo};
