use async_trait::async_trait;
use uuid::Uuid;

use common::pagination::Pagination;
use models::expense;

use super::domain::{ExpenseData, ExpenseQuery, ExpenseRow};
use crate::auth::CurrentUser;
use crate::datatable::Page;
use crate::errors::ServiceError;

/// Persistence for expenses and the lookups `ExpenseService` needs.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Private id of the client with `public_id` in the account, if any.
    async fn client_private_id(&self, account_id: Uuid, public_id: i64) -> Result<Option<i64>, ServiceError>;
    /// Private id of the vendor with `public_id` in the account, if any.
    async fn vendor_private_id(&self, account_id: Uuid, public_id: i64) -> Result<Option<i64>, ServiceError>;
    /// Create or update. With `check_sub_permissions`, a linked client or
    /// vendor must be viewable by `user`.
    async fn save(&self, user: &CurrentUser, data: ExpenseData, check_sub_permissions: bool) -> Result<expense::Model, ServiceError>;
    /// One page of rows matching `query`, newest first.
    async fn fetch(&self, query: &ExpenseQuery, pagination: Pagination) -> Result<Page<ExpenseRow>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::auth::{EntityType, Permissions};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Linkable record: private id plus owner.
    #[derive(Debug, Clone, Copy)]
    struct Linked {
        private_id: i64,
        owner_id: Uuid,
    }

    #[derive(Default)]
    struct State {
        clients: HashMap<(Uuid, i64), Linked>,
        vendors: HashMap<(Uuid, i64), Linked>,
        expenses: Vec<expense::Model>,
        rows: Vec<ExpenseRow>,
    }

    #[derive(Default)]
    pub struct MockExpenseRepository {
        state: Mutex<State>,
    }

    impl MockExpenseRepository {
        pub fn new() -> Self { Self::default() }

        pub fn add_client(&self, account_id: Uuid, public_id: i64, private_id: i64, owner_id: Uuid) {
            self.state.lock().unwrap().clients.insert((account_id, public_id), Linked { private_id, owner_id });
        }

        pub fn add_vendor(&self, account_id: Uuid, public_id: i64, private_id: i64, owner_id: Uuid) {
            self.state.lock().unwrap().vendors.insert((account_id, public_id), Linked { private_id, owner_id });
        }

        /// Listed rows returned by `fetch`.
        pub fn add_row(&self, row: ExpenseRow) {
            self.state.lock().unwrap().rows.push(row);
        }

        /// Expenses persisted through `save`.
        pub fn saved(&self) -> Vec<expense::Model> {
            self.state.lock().unwrap().expenses.clone()
        }
    }

    fn check_link(user: &CurrentUser, entity: EntityType, links: &HashMap<(Uuid, i64), Linked>, private_id: Option<i64>) -> Result<(), ServiceError> {
        let Some(private_id) = private_id else { return Ok(()) };
        let owner = links.values().find(|l| l.private_id == private_id).map(|l| l.owner_id);
        match owner {
            Some(owner) if user.can_view_item_by_owner(entity, owner) => Ok(()),
            Some(_) => Err(ServiceError::Forbidden(format!("{entity} not viewable"))),
            None => Err(ServiceError::not_found(entity.as_str())),
        }
    }

    #[async_trait]
    impl ExpenseRepository for MockExpenseRepository {
        async fn client_private_id(&self, account_id: Uuid, public_id: i64) -> Result<Option<i64>, ServiceError> {
            let st = self.state.lock().unwrap();
            Ok(st.clients.get(&(account_id, public_id)).map(|l| l.private_id))
        }

        async fn vendor_private_id(&self, account_id: Uuid, public_id: i64) -> Result<Option<i64>, ServiceError> {
            let st = self.state.lock().unwrap();
            Ok(st.vendors.get(&(account_id, public_id)).map(|l| l.private_id))
        }

        async fn save(&self, user: &CurrentUser, data: ExpenseData, check_sub_permissions: bool) -> Result<expense::Model, ServiceError> {
            let mut st = self.state.lock().unwrap();
            let now = Utc::now().fixed_offset();

            let mut model = match data.public_id {
                Some(public_id) => {
                    let existing = st
                        .expenses
                        .iter()
                        .find(|e| e.account_id == user.account_id && e.public_id == public_id)
                        .cloned()
                        .ok_or_else(|| ServiceError::not_found("expense"))?;
                    if !user.can_edit_item(&existing) {
                        return Err(ServiceError::Forbidden("expense not editable".into()));
                    }
                    existing
                }
                None => {
                    let next = st.expenses.iter().filter(|e| e.account_id == user.account_id).map(|e| e.public_id).max().unwrap_or(0) + 1;
                    expense::Model {
                        id: st.expenses.len() as i64 + 1,
                        public_id: next,
                        account_id: user.account_id,
                        user_id: user.id,
                        amount: data.amount.ok_or_else(|| ServiceError::Validation("amount is required".into()))?,
                        expense_date: data.expense_date.ok_or_else(|| ServiceError::Validation("expense_date is required".into()))?,
                        expense_currency_id: 1,
                        invoice_currency_id: 1,
                        exchange_rate: Decimal::ONE,
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
            };

            if let Some(v) = data.amount { model.amount = v; }
            if let Some(v) = data.expense_date { model.expense_date = v; }
            if let Some(v) = data.expense_currency_id { model.expense_currency_id = v; }
            if let Some(v) = data.invoice_currency_id { model.invoice_currency_id = v; }
            if let Some(v) = data.exchange_rate { model.exchange_rate = v; }
            if data.public_notes.is_some() { model.public_notes = data.public_notes; }
            if data.private_notes.is_some() { model.private_notes = data.private_notes; }
            if let Some(v) = data.should_be_invoiced { model.should_be_invoiced = v; }
            model.client_id = data.client.apply(model.client_id);
            model.vendor_id = data.vendor.apply(model.vendor_id);
            model.updated_at = now;
            models::expense::validate_exchange_rate(model.exchange_rate)?;

            if check_sub_permissions {
                check_link(user, EntityType::Client, &st.clients, model.client_id)?;
                check_link(user, EntityType::Vendor, &st.vendors, model.vendor_id)?;
            }

            match st.expenses.iter_mut().find(|e| e.id == model.id) {
                Some(slot) => *slot = model.clone(),
                None => st.expenses.push(model.clone()),
            }
            Ok(model)
        }

        async fn fetch(&self, query: &ExpenseQuery, pagination: Pagination) -> Result<Page<ExpenseRow>, ServiceError> {
            let st = self.state.lock().unwrap();
            let mut rows: Vec<ExpenseRow> = st.rows.iter().filter(|r| query.matches(r)).cloned().collect();
            rows.sort_by(|a, b| b.expense_date.cmp(&a.expense_date).then(b.public_id.cmp(&a.public_id)));
            let total = rows.len() as u64;
            let (idx, per_page) = pagination.normalize();
            let rows = rows.into_iter().skip((idx * per_page) as usize).take(per_page as usize).collect();
            Ok(Page { rows, total })
        }
    }
}
