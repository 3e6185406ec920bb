use async_trait::async_trait;
use uuid::Uuid;

use super::domain::CurrentUser;
use crate::errors::ServiceError;

/// Loads the user behind an authenticated request.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Active (not soft-deleted) user by id.
    async fn find_active(&self, id: Uuid) -> Result<Option<CurrentUser>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<HashMap<Uuid, CurrentUser>>,
    }

    impl MockUserRepository {
        pub fn with_users(users: impl IntoIterator<Item = CurrentUser>) -> Self {
            let repo = Self::default();
            for u in users {
                repo.insert(u);
            }
            repo
        }

        pub fn insert(&self, user: CurrentUser) {
            self.users.lock().unwrap().insert(user.id, user);
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_active(&self, id: Uuid) -> Result<Option<CurrentUser>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(&id).cloned())
        }
    }
}
