use std::sync::Arc;

use tracing::{info, instrument};

use common::pagination::Pagination;
use models::expense;

use super::actions::{ExpenseAction, VendorExpenseAction};
use super::columns::{ExpenseColumn, VendorExpenseColumn};
use super::domain::{ExpenseData, ExpenseInput, ExpenseQuery, ExpenseRow, ExpenseView, Link};
use super::repository::ExpenseRepository;
use crate::auth::{CurrentUser, EntityType, Permission, Permissions};
use crate::datatable::{DatatableResponse, DatatableService, Page};
use crate::errors::ServiceError;
use crate::view::ViewContext;

/// Saves expenses and renders the expense datatables.
pub struct ExpenseService<R: ExpenseRepository + ?Sized> {
    repo: Arc<R>,
    view: ViewContext,
}

impl<R: ExpenseRepository + ?Sized> ExpenseService<R> {
    pub fn new(repo: Arc<R>, view: ViewContext) -> Self { Self { repo, view } }

    /// Resolve client/vendor public ids, then create or update through the repository.
    #[instrument(skip(self, user, input), fields(user_id = %user.id, public_id = ?input.public_id))]
    pub async fn save(
        &self,
        user: &CurrentUser,
        input: ExpenseInput,
        check_sub_permissions: bool,
    ) -> Result<expense::Model, ServiceError> {
        let client = match input.client_id {
            None => Link::Keep,
            Some(0) => Link::Clear,
            Some(public_id) => Link::Set(
                self.repo
                    .client_private_id(user.account_id, public_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("client"))?,
            ),
        };
        let vendor = match input.vendor_id {
            None => Link::Keep,
            Some(0) => Link::Clear,
            Some(public_id) => Link::Set(
                self.repo
                    .vendor_private_id(user.account_id, public_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("vendor"))?,
            ),
        };

        let data = ExpenseData { client, vendor, ..ExpenseData::from_input(input) };
        let saved = self.repo.save(user, data, check_sub_permissions).await?;
        info!(public_id = saved.public_id, "expense_saved");
        Ok(saved)
    }

    /// Expenses of the user's account. Users without `view_all` only see their own.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn get_datatable(
        &self,
        user: &CurrentUser,
        search: Option<&str>,
        include_deleted: bool,
        pagination: Pagination,
    ) -> Result<DatatableResponse, ServiceError> {
        let mut query = ExpenseQuery::find(user.account_id, search, include_deleted);
        if !user.has_permission(Permission::ViewAll) {
            query = query.owned_by(user.id);
        }
        let page = self.views(user, self.repo.fetch(&query, pagination).await?);

        let table = DatatableService::new(&self.view).create_datatable(
            EntityType::Expense,
            &page,
            pagination,
            &ExpenseColumn::ALL,
            &ExpenseAction::ALL,
            true,
        );
        info!(rows = table.rows.len(), total = table.total, "expense_datatable_rendered");
        Ok(table)
    }

    /// Live expenses of one vendor, without checkboxes or row actions.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn get_datatable_vendor(
        &self,
        user: &CurrentUser,
        vendor_public_id: i64,
        pagination: Pagination,
    ) -> Result<DatatableResponse, ServiceError> {
        let query = ExpenseQuery::find_vendor(user.account_id, vendor_public_id);
        let page = self.views(user, self.repo.fetch(&query, pagination).await?);

        let table = DatatableService::new(&self.view).create_datatable::<_, _, VendorExpenseAction>(
            EntityType::Expense,
            &page,
            pagination,
            &VendorExpenseColumn::ALL,
            &[],
            false,
        );
        info!(rows = table.rows.len(), total = table.total, "vendor_expense_datatable_rendered");
        Ok(table)
    }

    fn views(&self, user: &CurrentUser, page: Page<ExpenseRow>) -> Page<ExpenseView> {
        Page {
            rows: page.rows.into_iter().map(|row| ExpenseView::new(row, user)).collect(),
            total: page.total,
        }
    }
}
