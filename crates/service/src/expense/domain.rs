use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{EntityType, Owned, Permissions};
use crate::datatable::DatatableRow;

/// Save request as received from a client. `client_id` and `vendor_id` are
/// public ids; `Some(0)` unlinks, `None` leaves the link unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseInput {
    /// Public id of the expense to update; absent creates a new expense.
    #[serde(default)]
    pub public_id: Option<i64>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub expense_date: Option<NaiveDate>,
    #[serde(default)]
    pub expense_currency_id: Option<i32>,
    #[serde(default)]
    pub invoice_currency_id: Option<i32>,
    #[serde(default)]
    pub exchange_rate: Option<Decimal>,
    #[serde(default)]
    pub public_notes: Option<String>,
    #[serde(default)]
    pub private_notes: Option<String>,
    #[serde(default)]
    pub should_be_invoiced: Option<bool>,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub vendor_id: Option<i64>,
}

/// Change to a foreign-key link, in private ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Link {
    #[default]
    Keep,
    Clear,
    Set(i64),
}

impl Link {
    /// Apply to the current value of the column.
    pub fn apply(self, current: Option<i64>) -> Option<i64> {
        match self {
            Link::Keep => current,
            Link::Clear => None,
            Link::Set(id) => Some(id),
        }
    }
}

/// Save request after public ids were resolved; what the repository persists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseData {
    pub public_id: Option<i64>,
    pub amount: Option<Decimal>,
    pub expense_date: Option<NaiveDate>,
    pub expense_currency_id: Option<i32>,
    pub invoice_currency_id: Option<i32>,
    pub exchange_rate: Option<Decimal>,
    pub public_notes: Option<String>,
    pub private_notes: Option<String>,
    pub should_be_invoiced: Option<bool>,
    pub client: Link,
    pub vendor: Link,
}

impl ExpenseData {
    /// Copy every field except the client/vendor links, which need resolving.
    pub fn from_input(input: ExpenseInput) -> Self {
        Self {
            public_id: input.public_id,
            amount: input.amount,
            expense_date: input.expense_date,
            expense_currency_id: input.expense_currency_id,
            invoice_currency_id: input.invoice_currency_id,
            exchange_rate: input.exchange_rate,
            public_notes: input.public_notes,
            private_notes: input.private_notes,
            should_be_invoiced: input.should_be_invoiced,
            client: Link::Keep,
            vendor: Link::Keep,
        }
    }
}

/// One expense joined with its vendor, client and invoice, as listed in a datatable.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct ExpenseRow {
    pub public_id: i64,
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub exchange_rate: Decimal,
    pub expense_date: NaiveDate,
    pub expense_currency_id: i32,
    pub invoice_currency_id: i32,
    pub public_notes: Option<String>,
    pub should_be_invoiced: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub invoice_id: Option<i64>,
    pub invoice_public_id: Option<i64>,
    pub invoice_user_id: Option<Uuid>,
    pub vendor_public_id: Option<i64>,
    pub vendor_user_id: Option<Uuid>,
    pub vendor_name: Option<String>,
    pub client_public_id: Option<i64>,
    pub client_user_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub client_first_name: Option<String>,
    pub client_last_name: Option<String>,
    pub client_email: Option<String>,
}

impl ExpenseRow {
    pub fn client_display_name(&self) -> String {
        models::client::display_name(
            self.client_name.as_deref(),
            self.client_first_name.as_deref(),
            self.client_last_name.as_deref(),
            self.client_email.as_deref(),
        )
    }
}

impl Owned for ExpenseRow {
    fn entity_type(&self) -> EntityType { EntityType::Expense }
    fn owner_id(&self) -> Uuid { self.user_id }
}

/// Filter for listing expenses. Built by [`ExpenseQuery::find`] or
/// [`ExpenseQuery::find_vendor`] and optionally narrowed to one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseQuery {
    pub account_id: Uuid,
    pub search: Option<String>,
    pub vendor_public_id: Option<i64>,
    pub owner_id: Option<Uuid>,
    pub include_deleted: bool,
}

impl ExpenseQuery {
    /// All expenses of the account matching `search` (notes, client or vendor name).
    pub fn find(account_id: Uuid, search: Option<&str>, include_deleted: bool) -> Self {
        let search = search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        Self { account_id, search, vendor_public_id: None, owner_id: None, include_deleted }
    }

    /// Live expenses of one vendor.
    pub fn find_vendor(account_id: Uuid, vendor_public_id: i64) -> Self {
        Self { account_id, search: None, vendor_public_id: Some(vendor_public_id), owner_id: None, include_deleted: false }
    }

    pub fn owned_by(mut self, user_id: Uuid) -> Self {
        self.owner_id = Some(user_id);
        self
    }

    /// In-memory equivalent of the SQL filter.
    pub fn matches(&self, row: &ExpenseRow) -> bool {
        if row.account_id != self.account_id {
            return false;
        }
        if !self.include_deleted && row.deleted_at.is_some() {
            return false;
        }
        if self.vendor_public_id.is_some() && row.vendor_public_id != self.vendor_public_id {
            return false;
        }
        if self.owner_id.is_some_and(|owner| owner != row.user_id) {
            return false;
        }
        match &self.search {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [&row.public_notes, &row.client_name, &row.client_first_name, &row.client_last_name, &row.client_email, &row.vendor_name]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

/// What the viewer may do with one row, resolved once before rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCapabilities {
    pub can_edit: bool,
    pub can_view_vendor: bool,
    pub can_view_client: bool,
    pub can_edit_invoice: bool,
    pub can_create_invoice: bool,
}

impl RowCapabilities {
    pub fn resolve(row: &ExpenseRow, perms: &dyn Permissions) -> Self {
        Self {
            can_edit: perms.can_edit_item(row),
            can_view_vendor: row
                .vendor_user_id
                .is_some_and(|owner| perms.can_view_item_by_owner(EntityType::Vendor, owner)),
            can_view_client: row
                .client_user_id
                .is_some_and(|owner| perms.can_view_item_by_owner(EntityType::Client, owner)),
            can_edit_invoice: row
                .invoice_user_id
                .is_some_and(|owner| perms.can_edit_item_by_owner(EntityType::Invoice, owner)),
            can_create_invoice: perms.can_create(EntityType::Invoice),
        }
    }
}

/// Row plus the viewer's capabilities; what columns and actions render.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseView {
    pub row: ExpenseRow,
    pub caps: RowCapabilities,
}

impl ExpenseView {
    pub fn new(row: ExpenseRow, perms: &dyn Permissions) -> Self {
        let caps = RowCapabilities::resolve(&row, perms);
        Self { row, caps }
    }
}

impl DatatableRow for ExpenseView {
    fn public_id(&self) -> i64 { self.row.public_id }
    fn can_edit(&self) -> bool { self.caps.can_edit }
    fn is_archived(&self) -> bool { self.row.deleted_at.is_some() }
    fn is_deleted(&self) -> bool { self.row.is_deleted }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use rust_decimal_macros::dec;

    /// Live, unlinked USD expense of 100 owned by `user_id`.
    pub fn row(account_id: Uuid, user_id: Uuid, public_id: i64) -> ExpenseRow {
        ExpenseRow {
            public_id,
            account_id,
            user_id,
            amount: dec!(100),
            exchange_rate: dec!(1),
            expense_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            expense_currency_id: 1,
            invoice_currency_id: 1,
            public_notes: None,
            should_be_invoiced: false,
            is_deleted: false,
            deleted_at: None,
            invoice_id: None,
            invoice_public_id: None,
            invoice_user_id: None,
            vendor_public_id: None,
            vendor_user_id: None,
            vendor_name: None,
            client_public_id: None,
            client_user_id: None,
            client_name: None,
            client_first_name: None,
            client_last_name: None,
            client_email: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::row;
    use super::*;
    use crate::auth::{CurrentUser, Permission};

    fn user(permissions: Vec<Permission>) -> CurrentUser {
        CurrentUser { id: Uuid::new_v4(), account_id: Uuid::new_v4(), is_admin: false, permissions }
    }

    #[test]
    fn link_apply() {
        assert_eq!(Link::Keep.apply(Some(4)), Some(4));
        assert_eq!(Link::Clear.apply(Some(4)), None);
        assert_eq!(Link::Set(9).apply(None), Some(9));
    }

    #[test]
    fn capabilities_for_owner_without_grants() {
        let u = user(vec![]);
        let mut r = row(u.account_id, u.id, 1);
        r.vendor_user_id = Some(Uuid::new_v4());
        r.client_user_id = Some(u.id);
        r.invoice_user_id = Some(u.id);
        let caps = RowCapabilities::resolve(&r, &u);
        assert_eq!(
            caps,
            RowCapabilities { can_edit: true, can_view_vendor: false, can_view_client: true, can_edit_invoice: true, can_create_invoice: false }
        );
    }

    #[test]
    fn capabilities_without_links_are_false() {
        let u = user(vec![Permission::ViewAll, Permission::CreateAll]);
        let caps = RowCapabilities::resolve(&row(u.account_id, Uuid::new_v4(), 1), &u);
        assert!(!caps.can_edit);
        assert!(!caps.can_view_vendor);
        assert!(!caps.can_view_client);
        assert!(!caps.can_edit_invoice);
        assert!(caps.can_create_invoice);
    }

    #[test]
    fn query_search_is_case_insensitive() {
        let account = Uuid::new_v4();
        let mut r = row(account, Uuid::new_v4(), 1);
        r.vendor_name = Some("Office Depot".into());
        assert!(ExpenseQuery::find(account, Some("depot"), false).matches(&r));
        assert!(!ExpenseQuery::find(account, Some("staples"), false).matches(&r));
        assert!(ExpenseQuery::find(account, Some("   "), false).matches(&r));
        assert!(!ExpenseQuery::find(Uuid::new_v4(), None, false).matches(&r));
    }

    #[test]
    fn query_owner_and_trash_filters() {
        let account = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let mut r = row(account, owner, 1);
        assert!(ExpenseQuery::find(account, None, false).owned_by(owner).matches(&r));
        assert!(!ExpenseQuery::find(account, None, false).owned_by(Uuid::new_v4()).matches(&r));
        r.deleted_at = Some(chrono::Utc::now().into());
        assert!(!ExpenseQuery::find(account, None, false).matches(&r));
        assert!(ExpenseQuery::find(account, None, true).matches(&r));
        assert!(!ExpenseQuery::find_vendor(account, 5).matches(&r));
    }
}
