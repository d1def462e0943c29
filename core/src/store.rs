//! Client-side cache of the todo list.
//!
//! `TodoStore` owns a [`TodoState`] and is only mutated through its action
//! methods. Each effective mutation notifies every subscriber with the new
//! state. Nothing is derived or memoized; views recompute counts from
//! `todos` when they render.

use std::fmt;

use uuid::Uuid;

use crate::types::{Todo, UpdateTodo};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoState {
    /// Newest first, matching the server's order.
    pub todos: Vec<Todo>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Handle returned by [`TodoStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&TodoState)>;

#[derive(Default)]
pub struct TodoStore {
    state: TodoState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TodoState {
        &self.state
    }

    pub fn todos(&self) -> &[Todo] {
        &self.state.todos
    }

    pub fn get(&self, id: Uuid) -> Option<&Todo> {
        self.state.todos.iter().find(|todo| todo.id == id)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&TodoState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Replace the whole list.
    pub fn set_todos(&mut self, todos: Vec<Todo>) {
        self.state.todos = todos;
        self.notify();
    }

    /// Insert at the head of the list.
    pub fn add_todo(&mut self, todo: Todo) {
        self.state.todos.insert(0, todo);
        self.notify();
    }

    /// Shallow-merge the fields present in `patch` into the todo with `id`.
    /// Returns `false` and leaves the list alone when `id` is unknown.
    pub fn update_todo(&mut self, id: Uuid, patch: &UpdateTodo) -> bool {
        let Some(todo) = self.state.todos.iter_mut().find(|todo| todo.id == id) else {
            return false;
        };
        if let Some(title) = &patch.title {
            todo.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            todo.description.clone_from(description);
        }
        if let Some(status) = patch.status {
            todo.status = status;
        }
        self.notify();
        true
    }

    pub fn remove_todo(&mut self, id: Uuid) -> bool {
        let before = self.state.todos.len();
        self.state.todos.retain(|todo| todo.id != id);
        if self.state.todos.len() == before {
            return false;
        }
        self.notify();
        true
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
        self.notify();
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.state.error = error;
        self.notify();
    }

    /// Back to an empty, idle state. Subscribers stay registered.
    pub fn reset(&mut self) {
        self.state = TodoState::default();
        self.notify();
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }
}
