use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use clinichub_core::error::AppError;
use clinichub_core::result::AppResult;
use clinichub_core::types::{Page, PageRequest};
use clinichub_entity::user::{CreateUser, StaffFilter, User, UserRole};

use crate::store::{EMAIL_TAKEN_MESSAGE, UserStore};

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    rows: RwLock<HashMap<Uuid, User>>,
}

fn newest_first(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    users
}

fn email_taken(rows: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    rows.values()
        .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut rows = self.rows.write().await;
        if email_taken(&rows, &data.email, None) {
            return Err(AppError::conflict(EMAIL_TAKEN_MESSAGE));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: data.email.clone(),
            name: data.name.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            is_active: data.is_active,
            created_at: Utc::now(),
            last_login_at: None,
        };
        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn replace_credentials(&self, id: Uuid, data: &CreateUser) -> AppResult<User> {
        let mut rows = self.rows.write().await;
        if email_taken(&rows, &data.email, Some(id)) {
            return Err(AppError::conflict(EMAIL_TAKEN_MESSAGE));
        }
        let user = rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.email = data.email.clone();
        user.name = data.name.clone();
        user.password_hash = data.password_hash.clone();
        user.role = data.role;
        user.is_active = data.is_active;
        Ok(user.clone())
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        Ok(newest_first(self.rows.read().await.values().cloned().collect()))
    }

    async fn list_staff(&self, filter: &StaffFilter, page: &PageRequest) -> AppResult<Page<User>> {
        let matching = newest_first(
            self.rows
                .read()
                .await
                .values()
                .filter(|u| filter.matches(u))
                .cloned()
                .collect(),
        );
        let total = matching.len() as u64;
        Ok(Page::new(page.slice(matching), page, total))
    }

    async fn list_active_by_roles(&self, roles: &[UserRole]) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .rows
            .read()
            .await
            .values()
            .filter(|u| u.is_active && roles.contains(&u.role))
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(user) = self.rows.write().await.get_mut(&id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<User>> {
        Ok(self.rows.write().await.get_mut(&id).map(|user| {
            user.is_active = active;
            user.clone()
        }))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(email: &str, role: UserRole) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            name: "Test".to_string(),
            password_hash: "hash".to_string(),
            role,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::default();
        store.create(&account("a@b.com", UserRole::Staff)).await.unwrap();

        let err = store
            .create(&account("A@B.com", UserRole::Nurse))
            .await
            .unwrap_err();
        assert_eq!(err.kind, clinichub_core::error::ErrorKind::Conflict);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_active_by_roles_skips_inactive() {
        let store = MemoryUserStore::default();
        let admin = store.create(&account("admin@c.test", UserRole::Admin)).await.unwrap();
        store.create(&account("desk@c.test", UserRole::Receptionist)).await.unwrap();
        store.create(&account("doc@c.test", UserRole::Doctor)).await.unwrap();
        store.set_active(admin.id, false).await.unwrap();

        let found = store
            .list_active_by_roles(&[UserRole::Admin, UserRole::Receptionist])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].role, UserRole::Receptionist);
    }
}
