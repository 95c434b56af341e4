use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use user_api_common::{NewUser, User, UserId, UserPatch};

use crate::store::{Result, UserStore};

/// In-memory user store with the same semantics as the SurrealDB store.
///
/// Records are kept in insertion order, which is also creation order.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let now = Utc::now();
        let created = User {
            id: UserId::new().to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: now,
            updated_at: now,
        };
        self.users.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let id = id.to_string();
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_by_id(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>> {
        let id = id.to_string();
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let id = id.to_string();
        let mut users = self.users.write().await;
        let position = users.iter().position(|u| u.id == id);
        Ok(position.map(|i| users.remove(i)))
    }
}
