use sea_orm::{entity::prelude::*, ConnectionTrait, QuerySelect, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{account, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub public_id: i64,
    pub account_id: Uuid,
    /// Owner
    pub user_id: Uuid,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub currency_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    pub fn display_name(&self) -> String {
        display_name(self.name.as_deref(), self.first_name.as_deref(), self.last_name.as_deref(), self.email.as_deref())
    }
}

/// Name shown for a client: its own name, else the primary contact's name, else the contact email.
pub fn display_name(name: Option<&str>, first_name: Option<&str>, last_name: Option<&str>, email: Option<&str>) -> String {
    fn non_empty(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|s| !s.is_empty())
    }
    if let Some(name) = non_empty(name) {
        return name.to_string();
    }
    match (non_empty(first_name), non_empty(last_name)) {
        (Some(f), Some(l)) => format!("{f} {l}"),
        (Some(f), None) => f.to_string(),
        (None, Some(l)) => l.to_string(),
        (None, None) => non_empty(email).unwrap_or_default().to_string(),
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Account }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Account => Entity::belongs_to(account::Entity)
                .from(Column::AccountId)
                .to(account::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn next_public_id<C: ConnectionTrait>(db: &C, account_id: Uuid) -> Result<i64, errors::ModelError> {
    let max: Option<Option<i64>> = Entity::find()
        .select_only()
        .column_as(Column::PublicId.max(), "max_public_id")
        .filter(Column::AccountId.eq(account_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(max.flatten().unwrap_or(0) + 1)
}

/// Private id of the client with `public_id` in `account_id`, soft-deleted rows included.
pub async fn private_id<C: ConnectionTrait>(db: &C, account_id: Uuid, public_id: i64) -> Result<Option<i64>, errors::ModelError> {
    let found = Entity::find()
        .filter(Column::AccountId.eq(account_id))
        .filter(Column::PublicId.eq(public_id))
        .one(db)
        .await?;
    Ok(found.map(|c| c.id))
}

pub async fn create(
    db: &DatabaseConnection,
    account_id: Uuid,
    user_id: Uuid,
    name: Option<&str>,
    currency_id: i32,
) -> Result<Model, errors::ModelError> {
    let public_id = next_public_id(db, account_id).await?;
    let am = ActiveModel {
        public_id: Set(public_id),
        account_id: Set(account_id),
        user_id: Set(user_id),
        name: Set(name.map(str::to_string)),
        first_name: Set(None),
        last_name: Set(None),
        email: Set(None),
        currency_id: Set(currency_id),
        created_at: Set(Utc::now().into()),
        deleted_at: Set(None),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
