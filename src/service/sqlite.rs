//! SQLite-backed item service
//!
//! Stores every list in one database file. Item order is an integer `position`
//! per list, rewritten as 0, 1, 2, ... after each move or delete so positions
//! stay dense.

use async_trait::async_trait;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

use super::{Notifier, NotifierConfig, ServiceError, ServiceResult, Subscription, TodoService};
use crate::model::{ItemUpdate, ListId, NewTodoItem, TodoItem, TodoItemStatus};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS lists (
        list_id TEXT PRIMARY KEY
    );
    CREATE TABLE IF NOT EXISTS items (
        uid TEXT PRIMARY KEY,
        list_id TEXT NOT NULL REFERENCES lists(list_id),
        position INTEGER NOT NULL,
        summary TEXT NOT NULL,
        description TEXT,
        due TEXT,
        status TEXT NOT NULL,
        parent TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_items_list ON items(list_id, position);
";

/// Item service persisting to SQLite (std::sync::Mutex because Connection is !Sync)
pub struct SqliteTodoService {
    conn: Mutex<Connection>,
    notifier: Notifier,
}

impl SqliteTodoService {
    /// Open or create a database file
    pub fn open(path: &Path, config: NotifierConfig) -> ServiceResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ServiceError::Database(e.to_string()))?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;

        tracing::info!("Opened item database at {:?}", path);
        Self::with_connection(conn, config)
    }

    /// Database that lives only as long as the service
    pub fn open_in_memory(config: NotifierConfig) -> ServiceResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, config)
    }

    fn with_connection(conn: Connection, config: NotifierConfig) -> ServiceResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            notifier: Notifier::new(config),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, conn: &Connection, list: &ListId) -> ServiceResult<()> {
        let items = load_items(conn, list)?;
        self.notifier.publish(list, items);
        Ok(())
    }
}

fn ensure_list(conn: &Connection, list: &ListId) -> ServiceResult<()> {
    let exists: Option<String> = conn
        .query_row(
            "SELECT list_id FROM lists WHERE list_id = ?",
            params![list.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    exists
        .map(|_| ())
        .ok_or_else(|| ServiceError::ListNotFound(list.to_string()))
}

fn load_items(conn: &Connection, list: &ListId) -> ServiceResult<Vec<TodoItem>> {
    let mut stmt = conn.prepare_cached(
        "SELECT uid, summary, description, due, status, parent
         FROM items WHERE list_id = ? ORDER BY position, rowid",
    )?;

    let rows = stmt.query_map(params![list.as_str()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut items = Vec::new();
    for row in rows {
        let (uid, summary, description, due, status, parent) = row?;
        let status = TodoItemStatus::parse(&status)
            .ok_or_else(|| ServiceError::Database(format!("Invalid status {:?} for {}", status, uid)))?;
        items.push(TodoItem {
            uid,
            summary,
            description,
            due,
            status,
            parent,
        });
    }
    Ok(items)
}

/// Rewrite positions to match `uids` order
fn write_positions(conn: &Connection, list: &ListId, uids: &[String]) -> ServiceResult<()> {
    let mut stmt =
        conn.prepare_cached("UPDATE items SET position = ? WHERE list_id = ? AND uid = ?")?;
    for (position, uid) in uids.iter().enumerate() {
        stmt.execute(params![position as i64, list.as_str(), uid])?;
    }
    Ok(())
}

fn item_exists(conn: &Connection, list: &ListId, uid: &str) -> ServiceResult<bool> {
    Ok(item_parent(conn, list, uid)?.is_some())
}

/// Parent column of an item, or `None` if the item does not exist
fn item_parent(conn: &Connection, list: &ListId, uid: &str) -> ServiceResult<Option<Option<String>>> {
    let found = conn
        .query_row(
            "SELECT parent FROM items WHERE list_id = ? AND uid = ?",
            params![list.as_str(), uid],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()?;
    Ok(found)
}

#[async_trait]
impl TodoService for SqliteTodoService {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn lists(&self) -> ServiceResult<Vec<ListId>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT list_id FROM lists ORDER BY list_id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        ids.into_iter()
            .map(|id| ListId::parse(&id).map_err(|e| ServiceError::Database(e.to_string())))
            .collect()
    }

    async fn create_list(&self, list: &ListId) -> ServiceResult<bool> {
        let conn = self.lock();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO lists (list_id) VALUES (?)",
            params![list.as_str()],
        )?;
        if inserted > 0 {
            tracing::info!(list = %list, "Created list");
        }
        Ok(inserted > 0)
    }

    async fn delete_list(&self, list: &ListId) -> ServiceResult<()> {
        let mut conn = self.lock();
        ensure_list(&conn, list)?;

        let tx = conn.transaction()?;
        let items = tx.execute("DELETE FROM items WHERE list_id = ?", params![list.as_str()])?;
        tx.execute("DELETE FROM lists WHERE list_id = ?", params![list.as_str()])?;
        tx.commit()?;

        let subscribers = self.notifier.subscriber_count(list);
        self.notifier.remove(list);
        tracing::info!(list = %list, items, subscribers, "Deleted list");
        Ok(())
    }

    async fn items(&self, list: &ListId) -> ServiceResult<Vec<TodoItem>> {
        let conn = self.lock();
        ensure_list(&conn, list)?;
        load_items(&conn, list)
    }

    async fn subscribe(&self, list: &ListId) -> ServiceResult<Subscription> {
        let conn = self.lock();
        ensure_list(&conn, list)?;
        let snapshot = load_items(&conn, list)?;
        let receiver = self.notifier.subscribe(list);
        tracing::debug!(list = %list, service = self.name(), "Subscribed");
        Ok(Subscription::new(list.clone(), snapshot, receiver))
    }

    async fn create(&self, list: &ListId, item: NewTodoItem) -> ServiceResult<TodoItem> {
        if item.summary.trim().is_empty() {
            return Err(ServiceError::InvalidItem("summary must not be empty".to_string()));
        }

        let conn = self.lock();
        ensure_list(&conn, list)?;
        if let Some(parent) = &item.parent {
            match item_parent(&conn, list, parent)? {
                None => return Err(ServiceError::item_not_found(list, parent.clone())),
                Some(Some(_)) => {
                    return Err(ServiceError::InvalidItem(format!(
                        "parent {} is itself a sub item",
                        parent
                    )))
                }
                Some(None) => {}
            }
        }

        let next_position: i64 = conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM items WHERE list_id = ?",
            params![list.as_str()],
            |row| row.get(0),
        )?;

        let created = item.into_item(Uuid::new_v4().to_string());
        conn.execute(
            "INSERT INTO items (uid, list_id, position, summary, description, due, status, parent)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                created.uid,
                list.as_str(),
                next_position,
                created.summary,
                created.description,
                created.due,
                created.status.as_str(),
                created.parent,
            ],
        )?;

        self.publish(&conn, list)?;
        tracing::debug!(list = %list, uid = %created.uid, "Created item");
        Ok(created)
    }

    async fn update(&self, list: &ListId, update: ItemUpdate) -> ServiceResult<TodoItem> {
        let conn = self.lock();
        ensure_list(&conn, list)?;

        let mut item = load_items(&conn, list)?
            .into_iter()
            .find(|i| i.uid == update.uid)
            .ok_or_else(|| ServiceError::item_not_found(list, update.uid.clone()))?;
        update.apply_to(&mut item);

        conn.execute(
            "UPDATE items SET summary = ?, description = ?, due = ?, status = ?
             WHERE list_id = ? AND uid = ?",
            params![
                item.summary,
                item.description,
                item.due,
                item.status.as_str(),
                list.as_str(),
                item.uid,
            ],
        )?;

        self.publish(&conn, list)?;
        Ok(item)
    }

    async fn delete(&self, list: &ListId, uids: &[String]) -> ServiceResult<()> {
        let mut conn = self.lock();
        ensure_list(&conn, list)?;

        let tx = conn.transaction()?;
        for (i, uid) in uids.iter().enumerate() {
            if uids[..i].contains(uid) {
                continue;
            }
            if !item_exists(&tx, list, uid)? {
                // Dropping the transaction rolls back earlier deletes
                return Err(ServiceError::item_not_found(list, uid.clone()));
            }
            tx.execute(
                "DELETE FROM items WHERE list_id = ? AND uid = ?",
                params![list.as_str(), uid],
            )?;
        }
        let remaining: Vec<String> = load_items(&tx, list)?.into_iter().map(|i| i.uid).collect();
        write_positions(&tx, list, &remaining)?;
        tx.commit()?;

        self.publish(&conn, list)?;
        tracing::debug!(list = %list, count = uids.len(), "Deleted items");
        Ok(())
    }

    async fn move_item(&self, list: &ListId, uid: &str, after: Option<&str>) -> ServiceResult<()> {
        let mut conn = self.lock();
        ensure_list(&conn, list)?;

        let mut order: Vec<String> = load_items(&conn, list)?.into_iter().map(|i| i.uid).collect();
        let from = order
            .iter()
            .position(|u| u == uid)
            .ok_or_else(|| ServiceError::item_not_found(list, uid))?;
        if let Some(after) = after {
            if !order.iter().any(|u| u == after) {
                return Err(ServiceError::item_not_found(list, after));
            }
        }
        if after == Some(uid) {
            return Ok(());
        }

        let moved = order.remove(from);
        let to = match after {
            None => 0,
            Some(after) => order
                .iter()
                .position(|u| u == after)
                .map(|p| p + 1)
                .unwrap_or(order.len()),
        };
        order.insert(to, moved);

        let tx = conn.transaction()?;
        write_positions(&tx, list, &order)?;
        tx.commit()?;

        self.publish(&conn, list)?;
        tracing::debug!(list = %list, uid = %uid, after = ?after, "Moved item");
        Ok(())
    }
}
