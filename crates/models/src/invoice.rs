use sea_orm::{entity::prelude::*, ConnectionTrait, QuerySelect, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{client, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub public_id: i64,
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub client_id: i64,
    pub invoice_number: String,
    pub created_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Client }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Client => Entity::belongs_to(client::Entity)
                .from(Column::ClientId)
                .to(client::Column::Id)
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

pub async fn create(db: &DatabaseConnection, client: &client::Model, user_id: Uuid, invoice_number: &str) -> Result<Model, errors::ModelError> {
    if invoice_number.trim().is_empty() { return Err(errors::ModelError::Validation("invoice number required".into())); }
    let public_id = next_public_id(db, client.account_id).await?;
    let am = ActiveModel {
        public_id: Set(public_id),
        account_id: Set(client.account_id),
        user_id: Set(user_id),
        client_id: Set(client.id),
        invoice_number: Set(invoice_number.to_string()),
        created_at: Set(Utc::now().into()),
        deleted_at: Set(None),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
