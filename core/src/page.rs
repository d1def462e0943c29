//! The todo page: create form, list, and per-row inline editing.
//!
//! # Design
//! `TodoPage` wires user actions to [`TodoService`] calls and applies the
//! result to its [`TodoStore`] only after the server confirms. A failed call
//! is logged, recorded in the store's `error`, and surfaced through
//! [`Dialog::alert`]; the todo list is left as it was.

use std::fmt;

use uuid::Uuid;

use crate::error::ApiError;
use crate::service::TodoService;
use crate::store::{TodoState, TodoStore};
use crate::transport::Transport;
use crate::types::{CreateTodo, UpdateTodo};

/// Blocking prompts shown to the user.
pub trait Dialog {
    fn confirm(&mut self, message: &str) -> bool;
    fn alert(&mut self, message: &str);
}

/// Contents of the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
}

/// Uncommitted edits for the row being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: Uuid,
    pub title: String,
    pub description: String,
}

pub struct TodoPage<T, D> {
    service: TodoService<T>,
    store: TodoStore,
    dialog: D,
    form: TodoForm,
    editing: Option<EditDraft>,
}

impl<T: Transport, D: Dialog> TodoPage<T, D> {
    pub fn new(service: TodoService<T>, store: TodoStore, dialog: D) -> Self {
        Self {
            service,
            store,
            dialog,
            form: TodoForm::default(),
            editing: None,
        }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TodoStore {
        &mut self.store
    }

    pub fn dialog(&self) -> &D {
        &self.dialog
    }

    pub fn form(&self) -> &TodoForm {
        &self.form
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    /// Id of the todo shown at 1-based `position`.
    pub fn todo_id_at(&self, position: usize) -> Option<Uuid> {
        let index = position.checked_sub(1)?;
        self.store.todos().get(index).map(|todo| todo.id)
    }

    /// Load the full list from the server.
    pub fn mount(&mut self) -> bool {
        self.store.set_loading(true);
        let loaded = match self.service.get_all_todos() {
            Ok(todos) => {
                self.store.set_todos(todos);
                self.store.set_error(None);
                true
            }
            Err(e) => {
                self.fail("Failed to load todos", e);
                false
            }
        };
        self.store.set_loading(false);
        loaded
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
    }

    /// Create a todo from the form, prepend it, and clear the form.
    pub fn submit(&mut self) -> bool {
        if self.form.title.trim().is_empty() {
            self.dialog.alert("Please enter a title");
            return false;
        }

        let input = CreateTodo {
            title: self.form.title.clone(),
            description: non_blank(&self.form.description),
        };

        self.store.set_loading(true);
        let created = match self.service.create_todo(&input) {
            Ok(todo) => {
                tracing::info!(id = %todo.id, "todo created");
                self.store.add_todo(todo);
                self.form = TodoForm::default();
                true
            }
            Err(e) => {
                self.fail("Failed to create todo", e);
                false
            }
        };
        self.store.set_loading(false);
        created
    }

    /// Flip the completion flag of `id`.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        let Some(status) = self.store.get(id).map(|todo| todo.status) else {
            return false;
        };
        self.apply_update(id, &UpdateTodo::status(!status))
    }

    /// Enter editing mode for `id`, seeding the drafts from the row.
    pub fn start_edit(&mut self, id: Uuid) -> bool {
        let Some(todo) = self.store.get(id) else {
            return false;
        };
        self.editing = Some(EditDraft {
            id,
            title: todo.title.clone(),
            description: todo.description.clone().unwrap_or_default(),
        });
        true
    }

    pub fn set_edit_title(&mut self, title: impl Into<String>) -> bool {
        match &mut self.editing {
            Some(draft) => {
                draft.title = title.into();
                true
            }
            None => false,
        }
    }

    pub fn set_edit_description(&mut self, description: impl Into<String>) -> bool {
        match &mut self.editing {
            Some(draft) => {
                draft.description = description.into();
                true
            }
            None => false,
        }
    }

    /// Drop the drafts without saving.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the drafts to the server and leave editing mode on success.
    pub fn save_edit(&mut self) -> bool {
        let Some(draft) = self.editing.clone() else {
            return false;
        };
        if draft.title.trim().is_empty() {
            self.dialog.alert("Title cannot be empty");
            return false;
        }

        let saved = self.apply_update(draft.id, &UpdateTodo::edit(draft.title, draft.description));
        if saved {
            self.editing = None;
        }
        saved
    }

    /// Ask for confirmation, then delete `id`.
    pub fn delete(&mut self, id: Uuid) -> bool {
        if !self
            .dialog
            .confirm("Are you sure you want to delete this todo?")
        {
            return false;
        }

        match self.service.delete_todo(id) {
            Ok(_) => {
                tracing::info!(%id, "todo deleted");
                self.store.remove_todo(id);
                if self.editing.as_ref().is_some_and(|draft| draft.id == id) {
                    self.editing = None;
                }
                true
            }
            Err(e) => {
                self.fail("Failed to delete todo", e);
                false
            }
        }
    }

    pub fn render(&self) -> String {
        PageView {
            state: self.store.state(),
            editing: self.editing.as_ref(),
        }
        .to_string()
    }

    fn apply_update(&mut self, id: Uuid, update: &UpdateTodo) -> bool {
        match self.service.update_todo(id, update) {
            Ok(todo) => {
                self.store.update_todo(id, &UpdateTodo::from(&todo));
                true
            }
            Err(e) => {
                self.fail("Failed to update todo", e);
                false
            }
        }
    }

    fn fail(&mut self, message: &str, error: ApiError) {
        tracing::error!(%error, "{message}");
        self.store.set_error(Some(error.to_string()));
        self.dialog.alert(message);
    }
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

struct PageView<'a> {
    state: &'a TodoState,
    editing: Option<&'a EditDraft>,
}

impl fmt::Display for PageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let todos = &self.state.todos;
        writeln!(f, "Todo App")?;
        writeln!(f, "Tasks ({} total)", todos.len())?;

        if todos.is_empty() {
            if self.state.loading {
                writeln!(f, "  Loading...")?;
            } else {
                writeln!(f, "  No todos yet. Add one from the form.")?;
            }
            return Ok(());
        }

        for (index, todo) in todos.iter().enumerate() {
            let position = index + 1;
            match self.editing.filter(|draft| draft.id == todo.id) {
                Some(draft) => {
                    writeln!(f, "{position:>3}. (editing) {}", draft.title)?;
                    writeln!(f, "       description: {}", draft.description)?;
                }
                None => {
                    let mark = if todo.status { 'x' } else { ' ' };
                    writeln!(f, "{position:>3}. [{mark}] {}", todo.title)?;
                    if let Some(description) = todo.description.as_deref().filter(|d| !d.is_empty()) {
                        writeln!(f, "       {description}")?;
                    }
                    writeln!(f, "       created {}", todo.created_at.format("%d %b %Y %H:%M UTC"))?;
                }
            }
        }

        let completed = todos.iter().filter(|todo| todo.status).count();
        let pending = todos.iter().filter(|todo| !todo.status).count();
        writeln!(
            f,
            "Total: {}  Completed: {completed}  Pending: {pending}",
            todos.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};
    use std::rc::Rc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::client::ApiClient;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};
    use crate::types::Todo;

    /// In-memory stand-in for the REST API.
    #[derive(Clone, Default)]
    struct FakeApi {
        todos: Rc<RefCell<Vec<Todo>>>,
        down: Rc<RefCell<bool>>,
        calls: Rc<RefCell<usize>>,
    }

    impl FakeApi {
        fn with(todos: Vec<Todo>) -> Self {
            let api = Self::default();
            *api.todos.borrow_mut() = todos;
            api
        }

        fn go_down(&self) {
            *self.down.borrow_mut() = true;
        }

        fn ok(status: u16, body: serde_json::Value) -> HttpResponse {
            HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }
        }
    }

    impl Transport for FakeApi {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            *self.calls.borrow_mut() += 1;
            if *self.down.borrow() {
                return Err(ApiError::TransportError("connection refused".to_string()));
            }

            let mut todos = self.todos.borrow_mut();
            let id = request
                .path
                .strip_prefix("/api/todos/")
                .map(|raw| Uuid::parse_str(raw).unwrap());
            let body: serde_json::Value = request
                .body
                .as_deref()
                .map(|b| serde_json::from_str(b).unwrap())
                .unwrap_or_default();

            let response = match (request.method, id) {
                (HttpMethod::Get, None) => Self::ok(200, serde_json::json!({"success": true, "data": *todos})),
                (HttpMethod::Post, None) => {
                    let todo = Todo {
                        id: Uuid::from_u128(100 + todos.len() as u128),
                        title: body["title"].as_str().unwrap().to_string(),
                        description: body["description"].as_str().map(str::to_string),
                        status: false,
                        created_at: Utc::now(),
                    };
                    todos.insert(0, todo.clone());
                    Self::ok(201, serde_json::json!({"success": true, "data": todo}))
                }
                (HttpMethod::Put, Some(id)) => match todos.iter_mut().find(|t| t.id == id) {
                    Some(todo) => {
                        let update: UpdateTodo = serde_json::from_value(body).unwrap();
                        if let Some(title) = update.title {
                            todo.title = title;
                        }
                        if let Some(description) = update.description {
                            todo.description = description;
                        }
                        if let Some(status) = update.status {
                            todo.status = status;
                        }
                        Self::ok(200, serde_json::json!({"success": true, "data": todo}))
                    }
                    None => Self::ok(404, serde_json::json!({"success": false, "error": "Todo not found"})),
                },
                (HttpMethod::Delete, Some(id)) => {
                    todos.retain(|t| t.id != id);
                    Self::ok(200, serde_json::json!({"success": true, "message": "Todo deleted successfully"}))
                }
                _ => Self::ok(405, serde_json::json!({})),
            };
            Ok(response)
        }
    }

    /// Answers confirmations from a script and records alerts.
    #[derive(Default)]
    struct ScriptedDialog {
        answers: VecDeque<bool>,
        alerts: Vec<String>,
        confirms: usize,
    }

    impl Dialog for ScriptedDialog {
        fn confirm(&mut self, _message: &str) -> bool {
            self.confirms += 1;
            self.answers.pop_front().unwrap_or(false)
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    fn todo(n: u128, title: &str, status: bool) -> Todo {
        Todo {
            id: Uuid::from_u128(n),
            title: title.to_string(),
            description: None,
            status,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, n as u32, 0).unwrap(),
        }
    }

    fn page(api: &FakeApi) -> TodoPage<FakeApi, ScriptedDialog> {
        let service = TodoService::new(ApiClient::new("", api.clone()));
        TodoPage::new(service, TodoStore::new(), ScriptedDialog::default())
    }

    fn mounted(todos: Vec<Todo>) -> (FakeApi, TodoPage<FakeApi, ScriptedDialog>) {
        let api = FakeApi::with(todos);
        let mut page = page(&api);
        assert!(page.mount());
        (api, page)
    }

    #[test]
    fn mount_populates_store() {
        let (_, page) = mounted(vec![todo(2, "b", false), todo(1, "a", true)]);
        let titles: Vec<&str> = page.store().todos().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["b", "a"]);
        assert!(!page.store().state().loading);
        assert!(page.store().state().error.is_none());
    }

    #[test]
    fn mount_failure_alerts_and_keeps_list() {
        let api = FakeApi::default();
        api.go_down();
        let mut page = page(&api);

        assert!(!page.mount());
        assert_eq!(page.dialog().alerts, ["Failed to load todos"]);
        assert!(page.store().todos().is_empty());
        assert!(!page.store().state().loading);
        assert!(page.store().state().error.is_some());
    }

    #[test]
    fn submit_prepends_and_clears_form() {
        let (_, mut page) = mounted(vec![todo(1, "old", false)]);
        page.set_title("Buy milk");
        page.set_description("2 litres");

        assert!(page.submit());
        let first = &page.store().todos()[0];
        assert_eq!(first.title, "Buy milk");
        assert_eq!(first.description.as_deref(), Some("2 litres"));
        assert!(!first.status);
        assert_eq!(page.form(), &TodoForm::default());
    }

    #[test]
    fn blank_title_is_rejected_locally() {
        let (api, mut page) = mounted(Vec::new());
        let calls = *api.calls.borrow();
        page.set_title("   ");

        assert!(!page.submit());
        assert_eq!(page.dialog().alerts, ["Please enter a title"]);
        assert_eq!(*api.calls.borrow(), calls);
    }

    #[test]
    fn failed_create_keeps_form_and_list() {
        let (api, mut page) = mounted(vec![todo(1, "old", false)]);
        api.go_down();
        page.set_title("Buy milk");

        assert!(!page.submit());
        assert_eq!(page.store().todos().len(), 1);
        assert_eq!(page.form().title, "Buy milk");
        assert_eq!(page.dialog().alerts, ["Failed to create todo"]);
    }

    #[test]
    fn toggle_round_trips() {
        let (_, mut page) = mounted(vec![todo(1, "a", false)]);
        let id = Uuid::from_u128(1);

        assert!(page.toggle(id));
        assert!(page.store().get(id).unwrap().status);
        assert!(page.toggle(id));
        assert!(!page.store().get(id).unwrap().status);
    }

    #[test]
    fn failed_toggle_leaves_store() {
        let (api, mut page) = mounted(vec![todo(1, "a", false)]);
        api.go_down();

        assert!(!page.toggle(Uuid::from_u128(1)));
        assert!(!page.store().todos()[0].status);
        assert_eq!(page.dialog().alerts, ["Failed to update todo"]);
    }

    #[test]
    fn edit_save_patches_row() {
        let (_, mut page) = mounted(vec![todo(1, "a", false)]);
        let id = Uuid::from_u128(1);

        assert!(page.start_edit(id));
        assert_eq!(page.editing().unwrap().description, "");
        page.set_edit_title("renamed");
        page.set_edit_description("details");
        assert!(page.save_edit());

        assert!(page.editing().is_none());
        let row = page.store().get(id).unwrap();
        assert_eq!(row.title, "renamed");
        assert_eq!(row.description.as_deref(), Some("details"));
    }

    #[test]
    fn cancel_discards_drafts() {
        let (api, mut page) = mounted(vec![todo(1, "a", false)]);
        let calls = *api.calls.borrow();

        page.start_edit(Uuid::from_u128(1));
        page.set_edit_title("never saved");
        page.cancel_edit();

        assert!(page.editing().is_none());
        assert!(!page.set_edit_title("ignored"));
        assert_eq!(page.store().todos()[0].title, "a");
        assert_eq!(*api.calls.borrow(), calls);
    }

    #[test]
    fn blank_edit_title_is_rejected() {
        let (_, mut page) = mounted(vec![todo(1, "a", false)]);
        page.start_edit(Uuid::from_u128(1));
        page.set_edit_title(" ");

        assert!(!page.save_edit());
        assert!(page.editing().is_some());
        assert_eq!(page.dialog().alerts, ["Title cannot be empty"]);
    }

    #[test]
    fn delete_requires_confirmation() {
        let (api, mut page) = mounted(vec![todo(1, "a", false)]);
        let id = Uuid::from_u128(1);

        assert!(!page.delete(id));
        assert_eq!(page.store().todos().len(), 1);
        assert_eq!(api.todos.borrow().len(), 1);

        page.dialog.answers.push_back(true);
        assert!(page.delete(id));
        assert!(page.store().todos().is_empty());
        assert!(api.todos.borrow().is_empty());
        assert_eq!(page.dialog().confirms, 2);
    }

    #[test]
    fn subscribers_follow_page_actions() {
        let (_, mut page) = mounted(Vec::new());
        let lengths = Rc::new(RefCell::new(HashMap::new()));
        let sink = Rc::clone(&lengths);
        page.store_mut().subscribe(move |state| {
            *sink.borrow_mut().entry(state.todos.len()).or_insert(0) += 1;
        });

        page.set_title("one");
        page.submit();
        assert!(lengths.borrow().contains_key(&1));
    }

    #[test]
    fn todo_positions_are_one_based() {
        let (_, page) = mounted(vec![todo(2, "b", false), todo(1, "a", false)]);
        assert_eq!(page.todo_id_at(1), Some(Uuid::from_u128(2)));
        assert_eq!(page.todo_id_at(2), Some(Uuid::from_u128(1)));
        assert_eq!(page.todo_id_at(0), None);
        assert_eq!(page.todo_id_at(3), None);
    }

    #[test]
    fn render_shows_rows_and_counts() {
        let (_, mut page) = mounted(vec![todo(2, "Walk dog", true), todo(1, "Buy milk", false)]);
        page.start_edit(Uuid::from_u128(1));
        page.set_edit_title("Buy oat milk");

        let view = page.render();
        assert!(view.contains("  1. [x] Walk dog"));
        assert!(view.contains("created 01 May 2024 10:02 UTC"));
        assert!(view.contains("  2. (editing) Buy oat milk"));
        assert!(view.contains("Total: 2  Completed: 1  Pending: 1"));
    }

    #[test]
    fn render_empty_list() {
        let (_, page) = mounted(Vec::new());
        let view = page.render();
        assert!(view.contains("No todos yet"));
        assert!(!view.contains("Total:"));
    }
}
