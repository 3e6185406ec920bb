use sea_orm::{entity::prelude::*, ConnectionTrait, QuerySelect};
use rust_decimal::Decimal;
use chrono::NaiveDate;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{account, client, errors, invoice, vendor};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub public_id: i64,
    pub account_id: Uuid,
    /// Owner
    pub user_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub expense_currency_id: i32,
    pub invoice_currency_id: i32,
    #[sea_orm(column_type = "Decimal(Some((13, 4)))")]
    pub exchange_rate: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub public_notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub private_notes: Option<String>,
    pub should_be_invoiced: bool,
    pub invoice_id: Option<i64>,
    pub vendor_id: Option<i64>,
    pub client_id: Option<i64>,
    pub is_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

/// Status shown for an expense. Never stored; invoice creation moves an
/// expense from logged/pending to invoiced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Logged,
    Pending,
    Invoiced,
}

impl ExpenseStatus {
    pub fn derive(invoice_id: Option<i64>, should_be_invoiced: bool) -> Self {
        if invoice_id.is_some() {
            ExpenseStatus::Invoiced
        } else if should_be_invoiced {
            ExpenseStatus::Pending
        } else {
            ExpenseStatus::Logged
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Account,
    Invoice,
    Vendor,
    Client,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Account => Entity::belongs_to(account::Entity)
                .from(Column::AccountId)
                .to(account::Column::Id)
                .into(),
            Relation::Invoice => Entity::belongs_to(invoice::Entity)
                .from(Column::InvoiceId)
                .to(invoice::Column::Id)
                .into(),
            Relation::Vendor => Entity::belongs_to(vendor::Entity)
                .from(Column::VendorId)
                .to(vendor::Column::Id)
                .into(),
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

pub async fn find_by_public_id<C: ConnectionTrait>(db: &C, account_id: Uuid, public_id: i64) -> Result<Option<Model>, errors::ModelError> {
    let found = Entity::find()
        .filter(Column::AccountId.eq(account_id))
        .filter(Column::PublicId.eq(public_id))
        .one(db)
        .await?;
    Ok(found)
}

pub fn validate_exchange_rate(rate: Decimal) -> Result<(), errors::ModelError> {
    if rate <= Decimal::ZERO {
        return Err(errors::ModelError::Validation("exchange_rate must be positive".into()));
    }
    Ok(())
}
