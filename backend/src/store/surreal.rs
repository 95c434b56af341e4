//! SurrealDB-backed user store.
//!
//! Supports runtime protocol selection via URL scheme:
//! - `ws://` / `wss://` - WebSocket connections
//! - `http://` / `https://` - HTTP connections
//! - `mem://` - In-memory database (for testing)
//!
//! Records live in the `users` table keyed by the user's UUID string.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use user_api_common::{NewUser, User, UserId, UserPatch};

use super::{Result, StoreError, UserStore};
use crate::config::{sanitize_url, DatabaseConfig};

/// SurrealDB client type alias using the `Any` engine for runtime protocol selection
pub type SurrealClient = Surreal<Any>;

const TABLE: &str = "users";

/// Projection that flattens the record id into the plain string the API exposes.
const USER_FIELDS: &str =
    "record::id(id) AS id, firstName, lastName, email, createdAt, updatedAt";

/// Timestamps are written as fixed-width RFC 3339 strings (nanoseconds, `Z`
/// suffix) so that `ORDER BY createdAt` is chronological.
mod fixed_width {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }
}

/// Document written on create.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserContent {
    first_name: String,
    last_name: String,
    email: String,
    #[serde(with = "fixed_width")]
    created_at: DateTime<Utc>,
    #[serde(with = "fixed_width")]
    updated_at: DateTime<Utc>,
}

/// Fields merged into an existing document on update.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(with = "fixed_width")]
    updated_at: DateTime<Utc>,
}

/// Stored document as returned by `RETURN BEFORE` / `RETURN AFTER`.
///
/// The record id comes back as a `users:⟨uuid⟩` thing; callers already hold
/// the id, so it is not read here.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    first_name: String,
    last_name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserDocument {
    fn into_user(self, id: &UserId) -> User {
        User {
            id: id.to_string(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User store backed by a single shared SurrealDB client.
///
/// The client is created unconnected; until [`SurrealUserStore::connect`]
/// succeeds every operation fails with a [`StoreError`].
///
/// Every operation is a single SurrealQL statement, so each one runs in its
/// own transaction against exactly one record.
pub struct SurrealUserStore {
    client: SurrealClient,
    config: DatabaseConfig,
}

impl SurrealUserStore {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            client: Surreal::init(),
            config,
        }
    }

    /// Open the connection, authenticate if credentials are configured,
    /// select namespace/database and make sure the table exists.
    pub async fn connect(&self) -> Result<()> {
        let url_safe = sanitize_url(&self.config.url);
        tracing::debug!("Connecting to SurrealDB: {}", url_safe);

        self.client.connect(self.config.url.as_str()).await?;

        if let (Some(username), Some(password)) = (&self.config.username, &self.config.password) {
            self.client
                .signin(Root {
                    username: username.as_str(),
                    password: password.as_str(),
                })
                .await?;
        }

        self.client
            .use_ns(self.config.namespace.as_str())
            .use_db(self.config.database.as_str())
            .await?;

        self.initialize().await?;

        tracing::info!(
            "SurrealDB connected: url={}, ns={}, db={}",
            url_safe,
            self.config.namespace,
            self.config.database
        );
        Ok(())
    }

    async fn initialize(&self) -> Result<()> {
        self.client
            .query(format!("DEFINE TABLE IF NOT EXISTS {TABLE} SCHEMALESS"))
            .await?
            .check()
            .map_err(|e| StoreError::Database(format!("Failed to initialize users table: {}", e)))?;
        Ok(())
    }

    async fn insert(&self, id: UserId, user: NewUser, now: DateTime<Utc>) -> Result<User> {
        let content = UserContent {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: now,
            updated_at: now,
        };

        let mut response = self
            .client
            .query(format!(
                "CREATE type::thing('{TABLE}', $id) CONTENT $data RETURN AFTER"
            ))
            .bind(("id", id.to_string()))
            .bind(("data", content))
            .await?
            .check()?;

        let documents: Vec<UserDocument> = response.take(0)?;
        let created = documents
            .into_iter()
            .next()
            .map(|doc| doc.into_user(&id))
            .ok_or_else(|| StoreError::Database(format!("Created user {} was not returned", id)))?;

        tracing::debug!("Created user: {}", created.id);
        Ok(created)
    }
}

#[async_trait]
impl UserStore for SurrealUserStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        self.insert(UserId::new(), user, Utc::now()).await
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let mut response = self
            .client
            .query(format!(
                "SELECT {USER_FIELDS} FROM {TABLE} ORDER BY createdAt ASC"
            ))
            .await?
            .check()?;

        Ok(response.take(0)?)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let mut response = self
            .client
            .query(format!(
                "SELECT {USER_FIELDS} FROM type::thing('{TABLE}', $id)"
            ))
            .bind(("id", id.to_string()))
            .await?
            .check()?;

        let users: Vec<User> = response.take(0)?;
        Ok(users.into_iter().next())
    }

    async fn update_by_id(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>> {
        let changes = UserChanges {
            first_name: patch.first_name,
            last_name: patch.last_name,
            email: patch.email,
            updated_at: Utc::now(),
        };

        // UPDATE on a record id never creates it; an unknown id returns nothing.
        let mut response = self
            .client
            .query(format!(
                "UPDATE type::thing('{TABLE}', $id) MERGE $changes RETURN AFTER"
            ))
            .bind(("id", id.to_string()))
            .bind(("changes", changes))
            .await?
            .check()?;

        let documents: Vec<UserDocument> = response.take(0)?;
        Ok(documents.into_iter().next().map(|doc| doc.into_user(id)))
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let mut response = self
            .client
            .query(format!("DELETE type::thing('{TABLE}', $id) RETURN BEFORE"))
            .bind(("id", id.to_string()))
            .await?
            .check()?;

        let documents: Vec<UserDocument> = response.take(0)?;
        let deleted = documents.into_iter().next().map(|doc| doc.into_user(id));
        if deleted.is_some() {
            tracing::debug!("Deleted user: {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;

    fn mem_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "mem://".to_string(),
            namespace: "test".to_string(),
            database: "test".to_string(),
            username: None,
            password: None,
        }
    }

    async fn connected_store() -> SurrealUserStore {
        let store = SurrealUserStore::new(mem_config());
        store.connect().await.unwrap();
        store
    }

    fn new_user(first: &str) -> NewUser {
        NewUser {
            first_name: first.to_string(),
            last_name: "Dewdney".to_string(),
            email: "alv@gmail.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = connected_store().await;

        let created = store.create(new_user("Alvin")).await.unwrap();
        assert!(created.id.parse::<UserId>().is_ok());
        assert_eq!(created.first_name, "Alvin");
        assert_eq!(created.created_at, created.updated_at);

        let id: UserId = created.id.parse().unwrap();
        let found = store.find_by_id(&id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_find_all_in_creation_order() {
        let store = connected_store().await;
        assert!(store.find_all().await.unwrap().is_empty());

        store.create(new_user("First")).await.unwrap();
        store.create(new_user("Second")).await.unwrap();

        let users = store.find_all().await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.first_name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = connected_store().await;
        let created = store.create(new_user("Alvin")).await.unwrap();
        let id: UserId = created.id.parse().unwrap();

        let patch = UserPatch {
            first_name: Some("X".to_string()),
            ..Default::default()
        };
        let updated = store.update_by_id(&id, patch).await.unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.first_name, "X");
        assert_eq!(updated.last_name, created.last_name);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_does_not_create() {
        let store = connected_store().await;
        let id = UserId::new();

        let patch = UserPatch {
            email: Some("x@example.com".to_string()),
            ..Default::default()
        };
        assert!(store.update_by_id(&id, patch).await.unwrap().is_none());
        assert!(store.find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_previous_record() {
        let store = connected_store().await;
        let created = store.create(new_user("Alvin")).await.unwrap();
        let id: UserId = created.id.parse().unwrap();

        let deleted = store.delete_by_id(&id).await.unwrap();
        assert_eq!(deleted, Some(created));
        assert!(store.find_by_id(&id).await.unwrap().is_none());
        assert!(store.delete_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deletes_remove_record_once() {
        let store = Arc::new(connected_store().await);
        let created = store.create(new_user("Alvin")).await.unwrap();
        let id: UserId = created.id.parse().unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.delete_by_id(&id).await })
            })
            .collect();

        let mut removed = 0;
        for handle in handles {
            // A losing writer sees either no record or a transaction conflict.
            if let Ok(Some(user)) = handle.await.unwrap() {
                assert_eq!(user, created);
                removed += 1;
            }
        }
        assert_eq!(removed, 1);
        assert!(store.find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_orders_across_fraction_widths() {
        let store = connected_store().await;
        let whole_second = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let later = whole_second + chrono::Duration::milliseconds(100);

        // Inserted out of order: the later record first.
        store.insert(UserId::new(), new_user("Later"), later).await.unwrap();
        store
            .insert(UserId::new(), new_user("Earlier"), whole_second)
            .await
            .unwrap();

        let users = store.find_all().await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.first_name.as_str()).collect();
        assert_eq!(names, vec!["Earlier", "Later"]);
        assert_eq!(users[0].created_at, whole_second);
        assert_eq!(users[1].created_at, later);
    }

    #[tokio::test]
    async fn test_timestamps_stored_fixed_width() {
        let store = connected_store().await;
        let whole_second = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        store
            .insert(UserId::new(), new_user("Alvin"), whole_second)
            .await
            .unwrap();

        let mut response = store
            .client
            .query(format!("SELECT VALUE createdAt FROM {TABLE}"))
            .await
            .unwrap();
        let stored: Vec<String> = response.take(0).unwrap();
        assert_eq!(stored, vec!["2024-01-15T10:00:00.000000000Z".to_string()]);
    }

    #[tokio::test]
    async fn test_unconnected_store_fails() {
        let store = SurrealUserStore::new(mem_config());
        assert!(store.find_all().await.is_err());
        assert!(store.create(new_user("Alvin")).await.is_err());
    }
}
