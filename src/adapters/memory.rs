use crate::domain::model::NewUser;
use crate::domain::ports::UserStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// User store backed by a `Vec`, used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<Mutex<Vec<NewUser>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn users(&self) -> Vec<NewUser> {
        self.users.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_id_by_email(&self, email: &str) -> Result<Option<i64>> {
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .position(|u| u.email == email)
            .map(|idx| idx as i64 + 1))
    }

    async fn insert(&self, user: &NewUser) -> Result<i64> {
        let mut users = self.users.lock().await;
        users.push(user.clone());
        Ok(users.len() as i64)
    }
}
