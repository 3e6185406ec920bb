use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::domain::CurrentUser;
use crate::auth::repository::UserRepository;
use crate::errors::ServiceError;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_active(&self, id: Uuid) -> Result<Option<CurrentUser>, ServiceError> {
        let found = models::user::find_active(&self.db, id).await?;
        Ok(found.map(CurrentUser::from))
    }
}
