//! Todo persistence. Each function issues a single SQL statement.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::{CreateTodo, Todo, UpdateTodo};

const COLUMNS: &str = "id, title, description, status, created_at";

/// All todos, newest first. Insertion order breaks `created_at` ties.
pub async fn list(pool: &SqlitePool) -> Result<Vec<Todo>, AppError> {
    let todos = sqlx::query_as::<_, Todo>(&format!(
        "SELECT {COLUMNS} FROM todos ORDER BY created_at DESC, rowid DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(todos)
}

pub async fn create(pool: &SqlitePool, input: CreateTodo) -> Result<Todo, AppError> {
    let todo = Todo {
        id: Uuid::new_v4(),
        title: input.title,
        description: input.description,
        status: false,
        created_at: Utc::now(),
    };

    sqlx::query(&format!(
        "INSERT INTO todos ({COLUMNS}) VALUES (?, ?, ?, ?, ?)"
    ))
    .bind(todo.id)
    .bind(&todo.title)
    .bind(&todo.description)
    .bind(todo.status)
    .bind(todo.created_at)
    .execute(pool)
    .await?;

    Ok(todo)
}

pub async fn find(pool: &SqlitePool, id: Uuid) -> Result<Todo, AppError> {
    sqlx::query_as::<_, Todo>(&format!("SELECT {COLUMNS} FROM todos WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn update(pool: &SqlitePool, id: Uuid, input: UpdateTodo) -> Result<Todo, AppError> {
    sqlx::query_as::<_, Todo>(&format!(
        "UPDATE todos SET
            title = COALESCE(?, title),
            description = CASE WHEN ? THEN ? ELSE description END,
            status = COALESCE(?, status)
         WHERE id = ?
         RETURNING {COLUMNS}"
    ))
    .bind(input.title)
    .bind(input.description.is_some())
    .bind(input.description.flatten())
    .bind(input.status)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn pool() -> SqlitePool {
        db::connect("sqlite::memory:", 1).await.unwrap()
    }

    fn new_todo(title: &str) -> CreateTodo {
        CreateTodo {
            title: title.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_status_to_pending() {
        let pool = pool().await;
        let todo = create(&pool, new_todo("Buy milk")).await.unwrap();
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.status);
        assert_eq!(find(&pool, todo.id).await.unwrap(), todo);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let pool = pool().await;
        let first = create(&pool, new_todo("first")).await.unwrap();
        let second = create(&pool, new_todo("second")).await.unwrap();
        let third = create(&pool, new_todo("third")).await.unwrap();

        let ids: Vec<Uuid> = list(&pool).await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let pool = pool().await;
        let todo = create(
            &pool,
            CreateTodo {
                title: "Walk dog".to_string(),
                description: Some("around the block".to_string()),
            },
        )
        .await
        .unwrap();

        let updated = update(
            &pool,
            todo.id,
            UpdateTodo {
                status: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(updated.status);
        assert_eq!(updated.title, "Walk dog");
        assert_eq!(updated.description.as_deref(), Some("around the block"));
        assert_eq!(updated.created_at, todo.created_at);
    }

    #[tokio::test]
    async fn null_description_clears_column() {
        let pool = pool().await;
        let todo = create(
            &pool,
            CreateTodo {
                title: "a".to_string(),
                description: Some("d".to_string()),
            },
        )
        .await
        .unwrap();

        let updated = update(
            &pool,
            todo.id,
            UpdateTodo {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(updated.title, "a");
        assert_eq!(find(&pool, todo.id).await.unwrap().description, None);
    }

    #[tokio::test]
    async fn description_can_be_replaced() {
        let pool = pool().await;
        let todo = create(&pool, new_todo("a")).await.unwrap();
        let updated = update(
            &pool,
            todo.id,
            UpdateTodo {
                description: Some(Some("new".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.description.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let pool = pool().await;
        let id = Uuid::new_v4();
        assert!(matches!(find(&pool, id).await, Err(AppError::NotFound)));
        assert!(matches!(
            update(&pool, id, UpdateTodo::default()).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(delete(&pool, id).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let pool = pool().await;
        let todo = create(&pool, new_todo("gone soon")).await.unwrap();
        delete(&pool, todo.id).await.unwrap();
        assert!(matches!(find(&pool, todo.id).await, Err(AppError::NotFound)));
    }
}
