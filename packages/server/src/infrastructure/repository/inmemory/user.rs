//! InMemory User Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Identity, RepositoryError, User, UserRepository};

pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Identity, User>>,
}

impl InMemoryUserRepository {
    pub fn new(users: Vec<User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.email.clone(), user))
            .collect();
        Self {
            users: Mutex::new(users),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &Identity) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users.get(email).cloned())
    }
}
