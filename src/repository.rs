use crate::{
    error::RepositoryError,
    models::{ReminderItem, ReminderList, UpdateReminderItemRequest},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Repository Trait
///
/// The storage contract behind the API and reminders routers. Every method is
/// scoped by `owner` (the session username): a list or item that belongs to
/// someone else behaves exactly like one that does not exist.
///
/// **Send + Sync + async_trait** make `Arc<dyn Repository>` shareable across
/// Axum's request tasks.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Reminder Lists ---
    async fn get_lists(&self, owner: &str) -> Result<Vec<ReminderList>, RepositoryError>;
    async fn get_list(&self, owner: &str, id: Uuid) -> Result<Option<ReminderList>, RepositoryError>;
    async fn create_list(&self, owner: &str, name: &str) -> Result<ReminderList, RepositoryError>;
    async fn rename_list(
        &self,
        owner: &str,
        id: Uuid,
        name: &str,
    ) -> Result<Option<ReminderList>, RepositoryError>;
    /// Deletes the list with its items. Returns false if nothing was deleted.
    async fn delete_list(&self, owner: &str, id: Uuid) -> Result<bool, RepositoryError>;

    // --- Reminder Items ---
    async fn get_items(&self, owner: &str, list_id: Uuid) -> Result<Vec<ReminderItem>, RepositoryError>;
    async fn get_item(&self, owner: &str, id: Uuid) -> Result<Option<ReminderItem>, RepositoryError>;
    /// Returns `None` when the parent list is missing or not owned by `owner`.
    async fn create_item(
        &self,
        owner: &str,
        list_id: Uuid,
        description: &str,
    ) -> Result<Option<ReminderItem>, RepositoryError>;
    async fn update_item(
        &self,
        owner: &str,
        id: Uuid,
        update: UpdateReminderItemRequest,
    ) -> Result<Option<ReminderItem>, RepositoryError>;
    async fn delete_item(&self, owner: &str, id: Uuid) -> Result<bool, RepositoryError>;

    // --- Page Selection ---
    // The list whose items the reminders page shows.
    async fn get_selected_list(&self, owner: &str) -> Result<Option<Uuid>, RepositoryError>;
    async fn set_selected_list(&self, owner: &str, list_id: Option<Uuid>) -> Result<(), RepositoryError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const LIST_COLUMNS: &str = "id, owner, name, created_at";
const ITEM_COLUMNS: &str = "id, list_id, owner, description, completed, created_at";

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled migrations in `migrations/`.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_lists(&self, owner: &str) -> Result<Vec<ReminderList>, RepositoryError> {
        let lists = sqlx::query_as::<_, ReminderList>(&format!(
            "SELECT {LIST_COLUMNS} FROM reminder_lists WHERE owner = $1 ORDER BY created_at ASC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(lists)
    }

    async fn get_list(&self, owner: &str, id: Uuid) -> Result<Option<ReminderList>, RepositoryError> {
        let list = sqlx::query_as::<_, ReminderList>(&format!(
            "SELECT {LIST_COLUMNS} FROM reminder_lists WHERE id = $1 AND owner = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(list)
    }

    async fn create_list(&self, owner: &str, name: &str) -> Result<ReminderList, RepositoryError> {
        let list = sqlx::query_as::<_, ReminderList>(&format!(
            "INSERT INTO reminder_lists (id, owner, name, created_at) VALUES ($1, $2, $3, NOW()) \
             RETURNING {LIST_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(list)
    }

    async fn rename_list(
        &self,
        owner: &str,
        id: Uuid,
        name: &str,
    ) -> Result<Option<ReminderList>, RepositoryError> {
        let list = sqlx::query_as::<_, ReminderList>(&format!(
            "UPDATE reminder_lists SET name = $1 WHERE id = $2 AND owner = $3 RETURNING {LIST_COLUMNS}"
        ))
        .bind(name)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(list)
    }

    /// Items go with the list through `ON DELETE CASCADE`; the selection row
    /// is nulled through `ON DELETE SET NULL`.
    async fn delete_list(&self, owner: &str, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM reminder_lists WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_items(&self, owner: &str, list_id: Uuid) -> Result<Vec<ReminderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, ReminderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM reminder_items WHERE list_id = $1 AND owner = $2 \
             ORDER BY created_at ASC"
        ))
        .bind(list_id)
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn get_item(&self, owner: &str, id: Uuid) -> Result<Option<ReminderItem>, RepositoryError> {
        let item = sqlx::query_as::<_, ReminderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM reminder_items WHERE id = $1 AND owner = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn create_item(
        &self,
        owner: &str,
        list_id: Uuid,
        description: &str,
    ) -> Result<Option<ReminderItem>, RepositoryError> {
        // The SELECT yields no row for a foreign or missing list, so nothing is inserted.
        let item = sqlx::query_as::<_, ReminderItem>(&format!(
            "INSERT INTO reminder_items (id, list_id, owner, description, completed, created_at) \
             SELECT $1, l.id, l.owner, $2, false, NOW() FROM reminder_lists l \
             WHERE l.id = $3 AND l.owner = $4 \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(description)
        .bind(list_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    /// Partial update: `COALESCE` keeps the stored value for omitted fields.
    async fn update_item(
        &self,
        owner: &str,
        id: Uuid,
        update: UpdateReminderItemRequest,
    ) -> Result<Option<ReminderItem>, RepositoryError> {
        let item = sqlx::query_as::<_, ReminderItem>(&format!(
            "UPDATE reminder_items SET \
                description = COALESCE($1, description), \
                completed = COALESCE($2, completed) \
             WHERE id = $3 AND owner = $4 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(update.description)
        .bind(update.completed)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn delete_item(&self, owner: &str, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM reminder_items WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_selected_list(&self, owner: &str) -> Result<Option<Uuid>, RepositoryError> {
        let selected: Option<(Option<Uuid>,)> =
            sqlx::query_as("SELECT list_id FROM selected_lists WHERE owner = $1")
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?;
        Ok(selected.and_then(|(list_id,)| list_id))
    }

    async fn set_selected_list(&self, owner: &str, list_id: Option<Uuid>) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO selected_lists (owner, list_id) VALUES ($1, $2) \
             ON CONFLICT (owner) DO UPDATE SET list_id = EXCLUDED.list_id",
        )
        .bind(owner)
        .bind(list_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// Vectors keep insertion order, which is the display order.
#[derive(Default)]
struct MemoryStore {
    lists: Vec<ReminderList>,
    items: Vec<ReminderItem>,
    selected: HashMap<String, Uuid>,
}

/// MemoryRepository
///
/// In-process `Repository` used when no `DATABASE_URL` is configured and by the
/// test suite. Data lives for the lifetime of the process.
#[derive(Default)]
pub struct MemoryRepository {
    store: RwLock<MemoryStore>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_lists(&self, owner: &str) -> Result<Vec<ReminderList>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .lists
            .iter()
            .filter(|list| list.owner == owner)
            .cloned()
            .collect())
    }

    async fn get_list(&self, owner: &str, id: Uuid) -> Result<Option<ReminderList>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .lists
            .iter()
            .find(|list| list.id == id && list.owner == owner)
            .cloned())
    }

    async fn create_list(&self, owner: &str, name: &str) -> Result<ReminderList, RepositoryError> {
        let list = ReminderList {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.store.write().await.lists.push(list.clone());
        Ok(list)
    }

    async fn rename_list(
        &self,
        owner: &str,
        id: Uuid,
        name: &str,
    ) -> Result<Option<ReminderList>, RepositoryError> {
        let mut store = self.store.write().await;
        Ok(store
            .lists
            .iter_mut()
            .find(|list| list.id == id && list.owner == owner)
            .map(|list| {
                list.name = name.to_string();
                list.clone()
            }))
    }

    async fn delete_list(&self, owner: &str, id: Uuid) -> Result<bool, RepositoryError> {
        let mut store = self.store.write().await;
        let before = store.lists.len();
        store.lists.retain(|list| !(list.id == id && list.owner == owner));
        if store.lists.len() == before {
            return Ok(false);
        }
        store.items.retain(|item| item.list_id != id);
        if store.selected.get(owner) == Some(&id) {
            store.selected.remove(owner);
        }
        Ok(true)
    }

    async fn get_items(&self, owner: &str, list_id: Uuid) -> Result<Vec<ReminderItem>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .items
            .iter()
            .filter(|item| item.list_id == list_id && item.owner == owner)
            .cloned()
            .collect())
    }

    async fn get_item(&self, owner: &str, id: Uuid) -> Result<Option<ReminderItem>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .items
            .iter()
            .find(|item| item.id == id && item.owner == owner)
            .cloned())
    }

    async fn create_item(
        &self,
        owner: &str,
        list_id: Uuid,
        description: &str,
    ) -> Result<Option<ReminderItem>, RepositoryError> {
        let mut store = self.store.write().await;
        if !store
            .lists
            .iter()
            .any(|list| list.id == list_id && list.owner == owner)
        {
            return Ok(None);
        }
        let item = ReminderItem {
            id: Uuid::new_v4(),
            list_id,
            owner: owner.to_string(),
            description: description.to_string(),
            completed: false,
            created_at: Utc::now(),
        };
        store.items.push(item.clone());
        Ok(Some(item))
    }

    async fn update_item(
        &self,
        owner: &str,
        id: Uuid,
        update: UpdateReminderItemRequest,
    ) -> Result<Option<ReminderItem>, RepositoryError> {
        let mut store = self.store.write().await;
        Ok(store
            .items
            .iter_mut()
            .find(|item| item.id == id && item.owner == owner)
            .map(|item| {
                if let Some(description) = update.description {
                    item.description = description;
                }
                if let Some(completed) = update.completed {
                    item.completed = completed;
                }
                item.clone()
            }))
    }

    async fn delete_item(&self, owner: &str, id: Uuid) -> Result<bool, RepositoryError> {
        let mut store = self.store.write().await;
        let before = store.items.len();
        store.items.retain(|item| !(item.id == id && item.owner == owner));
        Ok(store.items.len() < before)
    }

    async fn get_selected_list(&self, owner: &str) -> Result<Option<Uuid>, RepositoryError> {
        Ok(self.store.read().await.selected.get(owner).copied())
    }

    async fn set_selected_list(&self, owner: &str, list_id: Option<Uuid>) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        match list_id {
            Some(id) => store.selected.insert(owner.to_string(), id),
            None => store.selected.remove(owner),
        };
        Ok(())
    }
}
