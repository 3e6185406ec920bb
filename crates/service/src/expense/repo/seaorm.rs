use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use common::pagination::Pagination;
use models::{account, client, expense, invoice, vendor};

use crate::auth::{CurrentUser, EntityType, Permissions};
use crate::datatable::Page;
use crate::errors::ServiceError;
use crate::expense::domain::{ExpenseData, ExpenseQuery, ExpenseRow};
use crate::expense::repository::ExpenseRepository;

pub struct SeaOrmExpenseRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ExpenseRepository for SeaOrmExpenseRepository {
    async fn client_private_id(&self, account_id: Uuid, public_id: i64) -> Result<Option<i64>, ServiceError> {
        Ok(client::private_id(&self.db, account_id, public_id).await?)
    }

    async fn vendor_private_id(&self, account_id: Uuid, public_id: i64) -> Result<Option<i64>, ServiceError> {
        Ok(vendor::private_id(&self.db, account_id, public_id).await?)
    }

    async fn save(&self, user: &CurrentUser, data: ExpenseData, check_sub_permissions: bool) -> Result<expense::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let saved = save_in(&txn, user, data, check_sub_permissions).await?;
        txn.commit().await?;
        Ok(saved)
    }

    async fn fetch(&self, query: &ExpenseQuery, pagination: Pagination) -> Result<Page<ExpenseRow>, ServiceError> {
        let mut select = expense::Entity::find()
            .select_only()
            .columns([
                expense::Column::PublicId,
                expense::Column::AccountId,
                expense::Column::UserId,
                expense::Column::Amount,
                expense::Column::ExchangeRate,
                expense::Column::ExpenseDate,
                expense::Column::ExpenseCurrencyId,
                expense::Column::InvoiceCurrencyId,
                expense::Column::PublicNotes,
                expense::Column::ShouldBeInvoiced,
                expense::Column::IsDeleted,
                expense::Column::DeletedAt,
                expense::Column::InvoiceId,
            ])
            .column_as(invoice::Column::PublicId, "invoice_public_id")
            .column_as(invoice::Column::UserId, "invoice_user_id")
            .column_as(vendor::Column::PublicId, "vendor_public_id")
            .column_as(vendor::Column::UserId, "vendor_user_id")
            .column_as(vendor::Column::Name, "vendor_name")
            .column_as(client::Column::PublicId, "client_public_id")
            .column_as(client::Column::UserId, "client_user_id")
            .column_as(client::Column::Name, "client_name")
            .column_as(client::Column::FirstName, "client_first_name")
            .column_as(client::Column::LastName, "client_last_name")
            .column_as(client::Column::Email, "client_email")
            .join(JoinType::LeftJoin, expense::Relation::Invoice.def())
            .join(JoinType::LeftJoin, expense::Relation::Vendor.def())
            .join(JoinType::LeftJoin, expense::Relation::Client.def())
            .filter(expense::Column::AccountId.eq(query.account_id));

        if !query.include_deleted {
            select = select.filter(expense::Column::DeletedAt.is_null());
        }
        if let Some(vendor_public_id) = query.vendor_public_id {
            select = select.filter(vendor::Column::PublicId.eq(vendor_public_id));
        }
        if let Some(owner_id) = query.owner_id {
            select = select.filter(expense::Column::UserId.eq(owner_id));
        }
        if let Some(search) = &query.search {
            select = select.filter(search_condition(search));
        }

        let (idx, per_page) = pagination.normalize();
        let paginator = select
            .order_by_desc(expense::Column::ExpenseDate)
            .order_by_desc(expense::Column::PublicId)
            .into_model::<ExpenseRow>()
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(idx).await?;
        Ok(Page { rows, total })
    }
}

/// `search` as a literal substring, case-insensitive, of notes, client or vendor fields.
fn search_condition(search: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
    let like = |col: Expr| Expr::expr(Func::lower(col)).like(LikeExpr::new(pattern.as_str()).escape('\\'));
    Condition::any()
        .add(like(Expr::col((expense::Entity, expense::Column::PublicNotes))))
        .add(like(Expr::col((client::Entity, client::Column::Name))))
        .add(like(Expr::col((client::Entity, client::Column::FirstName))))
        .add(like(Expr::col((client::Entity, client::Column::LastName))))
        .add(like(Expr::col((client::Entity, client::Column::Email))))
        .add(like(Expr::col((vendor::Entity, vendor::Column::Name))))
}

fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

async fn save_in<C: ConnectionTrait>(
    db: &C,
    user: &CurrentUser,
    data: ExpenseData,
    check_sub_permissions: bool,
) -> Result<expense::Model, ServiceError> {
    let now = Utc::now().fixed_offset();

    let existing = match data.public_id {
        Some(public_id) => {
            let found = expense::find_by_public_id(db, user.account_id, public_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("expense"))?;
            if !user.can_edit_item(&found) {
                return Err(ServiceError::Forbidden("expense not editable".into()));
            }
            Some(found)
        }
        None => None,
    };

    let mut am: expense::ActiveModel = match &existing {
        Some(found) => found.clone().into(),
        None => {
            let account = account::Entity::find_by_id(user.account_id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("account"))?;
            expense::ActiveModel {
                public_id: Set(expense::next_public_id(db, user.account_id).await?),
                account_id: Set(user.account_id),
                user_id: Set(user.id),
                amount: Set(data.amount.ok_or_else(|| ServiceError::Validation("amount is required".into()))?),
                expense_date: Set(data
                    .expense_date
                    .ok_or_else(|| ServiceError::Validation("expense_date is required".into()))?),
                expense_currency_id: Set(account.currency_id),
                invoice_currency_id: Set(account.currency_id),
                exchange_rate: Set(Decimal::ONE),
                public_notes: Set(None),
                private_notes: Set(None),
                should_be_invoiced: Set(false),
                invoice_id: Set(None),
                vendor_id: Set(None),
                client_id: Set(None),
                is_deleted: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
                ..Default::default()
            }
        }
    };

    if let Some(v) = data.amount { am.amount = Set(v); }
    if let Some(v) = data.expense_date { am.expense_date = Set(v); }
    if let Some(v) = data.expense_currency_id { am.expense_currency_id = Set(v); }
    if let Some(v) = data.invoice_currency_id { am.invoice_currency_id = Set(v); }
    if let Some(rate) = data.exchange_rate {
        expense::validate_exchange_rate(rate)?;
        am.exchange_rate = Set(rate);
    }
    if data.public_notes.is_some() { am.public_notes = Set(data.public_notes); }
    if data.private_notes.is_some() { am.private_notes = Set(data.private_notes); }
    if let Some(v) = data.should_be_invoiced { am.should_be_invoiced = Set(v); }

    let client_id = data.client.apply(existing.as_ref().and_then(|e| e.client_id));
    let vendor_id = data.vendor.apply(existing.as_ref().and_then(|e| e.vendor_id));
    if check_sub_permissions {
        if let Some(id) = client_id {
            let owner = client::Entity::find_by_id(id).one(db).await?.map(|c| c.user_id);
            ensure_viewable(user, EntityType::Client, owner)?;
        }
        if let Some(id) = vendor_id {
            let owner = vendor::Entity::find_by_id(id).one(db).await?.map(|v| v.user_id);
            ensure_viewable(user, EntityType::Vendor, owner)?;
        }
    }
    am.client_id = Set(client_id);
    am.vendor_id = Set(vendor_id);
    am.updated_at = Set(now);

    let saved = if existing.is_some() { am.update(db).await? } else { am.insert(db).await? };
    tracing::debug!(public_id = saved.public_id, created = existing.is_none(), "expense_persisted");
    Ok(saved)
}

fn ensure_viewable(user: &CurrentUser, entity: EntityType, owner: Option<Uuid>) -> Result<(), ServiceError> {
    match owner {
        Some(owner) if user.can_view_item_by_owner(entity, owner) => Ok(()),
        Some(_) => Err(ServiceError::Forbidden(format!("{entity} not viewable"))),
        None => Err(ServiceError::not_found(entity.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    fn user() -> CurrentUser {
        CurrentUser { id: Uuid::new_v4(), account_id: Uuid::new_v4(), is_admin: false, permissions: vec![] }
    }

    fn client_model(account_id: Uuid, id: i64, public_id: i64) -> client::Model {
        client::Model {
            id,
            public_id,
            account_id,
            user_id: Uuid::new_v4(),
            name: Some("Acme".into()),
            first_name: None,
            last_name: None,
            email: None,
            currency_id: 1,
            created_at: Utc::now().fixed_offset(),
            deleted_at: None,
        }
    }

    fn expense_model(account_id: Uuid, user_id: Uuid, public_id: i64) -> expense::Model {
        let now = Utc::now().fixed_offset();
        expense::Model {
            id: 100 + public_id,
            public_id,
            account_id,
            user_id,
            amount: dec!(10),
            expense_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            expense_currency_id: 1,
            invoice_currency_id: 1,
            exchange_rate: dec!(1),
            public_notes: None,
            private_notes: None,
            should_be_invoiced: false,
            invoice_id: None,
            vendor_id: None,
            client_id: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn client_private_id_resolves_within_account() {
        let account = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![client_model(account, 11, 3)], vec![]])
            .into_connection();
        let repo = SeaOrmExpenseRepository { db };
        assert_eq!(repo.client_private_id(account, 3).await.unwrap(), Some(11));
        assert_eq!(repo.client_private_id(account, 4).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_of_missing_expense_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<expense::Model>::new()])
            .into_connection();
        let repo = SeaOrmExpenseRepository { db };
        let data = ExpenseData { public_id: Some(9), ..Default::default() };
        let err = repo.save(&user(), data, false).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_of_foreign_expense_is_forbidden() {
        let u = user();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![expense_model(u.account_id, Uuid::new_v4(), 2)]])
            .into_connection();
        let repo = SeaOrmExpenseRepository { db };
        let data = ExpenseData { public_id: Some(2), amount: Some(dec!(5)), ..Default::default() };
        let err = repo.save(&u, data, false).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[test]
    fn search_wildcards_are_literal() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("toner"), "toner");

        let stmt = expense::Entity::find().filter(search_condition("50%")).build(DatabaseBackend::Postgres);
        assert!(stmt.sql.contains("ESCAPE"), "{}", stmt.sql);
        let values = stmt.values.expect("bound values").0;
        assert!(values.contains(&sea_orm::Value::from("%50\\%%")));
    }

    #[test]
    fn sub_permission_check() {
        let u = user();
        assert!(ensure_viewable(&u, EntityType::Client, Some(u.id)).is_ok());
        assert!(matches!(ensure_viewable(&u, EntityType::Client, Some(Uuid::new_v4())), Err(ServiceError::Forbidden(_))));
        assert!(matches!(ensure_viewable(&u, EntityType::Vendor, None), Err(ServiceError::NotFound(_))));
    }
}

#[cfg(test)]
mod live {
    use super::*;
    use crate::expense::domain::Link;
    use crate::test_support::get_db;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn save_and_list_joined_rows() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };

        let acct = account::create(&db, &format!("acct_{}", Uuid::new_v4()), 3).await?;
        let owner = models::user::create(&db, acct.id, &format!("{}@example.com", Uuid::new_v4()), "Owner", false, &[]).await?;
        let c = client::create(&db, acct.id, owner.id, Some("Acme"), 3).await?;
        let v = vendor::create(&db, acct.id, owner.id, "Paper Co").await?;
        let user = CurrentUser::from(owner);
        let repo = SeaOrmExpenseRepository { db };

        let data = ExpenseData {
            amount: Some(dec!(42.5)),
            expense_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 2),
            public_notes: Some("printer toner".into()),
            client: Link::Set(c.id),
            vendor: Link::Set(v.id),
            ..Default::default()
        };
        let saved = repo.save(&user, data, true).await?;
        assert_eq!(saved.public_id, 1);
        assert_eq!(saved.expense_currency_id, 3);
        assert_eq!(saved.exchange_rate, dec!(1));

        let page = repo.fetch(&ExpenseQuery::find(acct.id, Some("TONER"), false), Pagination::default()).await?;
        assert_eq!(page.total, 1);
        let row = &page.rows[0];
        assert_eq!(row.vendor_name.as_deref(), Some("Paper Co"));
        assert_eq!(row.client_public_id, Some(c.public_id));
        assert_eq!(row.invoice_public_id, None);

        let vendor_page = repo.fetch(&ExpenseQuery::find_vendor(acct.id, v.public_id), Pagination::default()).await?;
        assert_eq!(vendor_page.total, 1);

        let cleared = repo
            .save(&user, ExpenseData { public_id: Some(1), vendor: Link::Clear, ..Default::default() }, true)
            .await?;
        assert_eq!(cleared.vendor_id, None);
        assert_eq!(cleared.client_id, Some(c.id));

        account::Entity::delete_by_id(acct.id).exec(&repo.db).await?;
        Ok(())
    }
}
