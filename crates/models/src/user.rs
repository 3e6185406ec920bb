use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::account;
use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    /// Comma separated permission names.
    pub permissions: String,
    pub created_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Permission names with whitespace and empty entries removed.
    pub fn permission_names(&self) -> Vec<&str> {
        parse_permissions(&self.permissions)
    }
}

pub fn parse_permissions(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).filter(|p| !p.is_empty()).collect()
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Account,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Account => Entity::belongs_to(account::Entity).from(Column::AccountId).to(account::Column::Id).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') { return Err(errors::ModelError::Validation("invalid email".into())); }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    account_id: Uuid,
    email: &str,
    name: &str,
    is_admin: bool,
    permissions: &[&str],
) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    validate_name(name)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        account_id: Set(account_id),
        email: Set(email.to_string()),
        name: Set(name.to_string()),
        is_admin: Set(is_admin),
        permissions: Set(permissions.join(",")),
        created_at: Set(Utc::now().into()),
        deleted_at: Set(None),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Load a user that has not been soft-deleted.
pub async fn find_active(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    let found = Entity::find_by_id(id)
        .filter(Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(found)
}
