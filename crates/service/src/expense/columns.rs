use models::expense::ExpenseStatus;
use rust_decimal::Decimal;

use super::domain::ExpenseView;
use crate::datatable::DatatableColumn;
use crate::view::html::{escape, link_to};
use crate::view::money::round_half_up;
use crate::view::{Translator, ViewContext};

/// Maximum characters of public notes shown in the expense list.
pub const NOTES_PREVIEW_CHARS: usize = 100;

/// Columns of the main expense list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseColumn {
    VendorName,
    ClientName,
    ExpenseDate,
    Amount,
    PublicNotes,
    Status,
}

impl ExpenseColumn {
    pub const ALL: [ExpenseColumn; 6] = [
        ExpenseColumn::VendorName,
        ExpenseColumn::ClientName,
        ExpenseColumn::ExpenseDate,
        ExpenseColumn::Amount,
        ExpenseColumn::PublicNotes,
        ExpenseColumn::Status,
    ];
}

impl DatatableColumn<ExpenseView> for ExpenseColumn {
    fn key(&self) -> &'static str {
        match self {
            ExpenseColumn::VendorName => "vendor_name",
            ExpenseColumn::ClientName => "client_name",
            ExpenseColumn::ExpenseDate => "expense_date",
            ExpenseColumn::Amount => "amount",
            ExpenseColumn::PublicNotes => "public_notes",
            ExpenseColumn::Status => "expense_status_id",
        }
    }

    fn render(&self, view: &ExpenseView, ctx: &ViewContext) -> String {
        let row = &view.row;
        match self {
            ExpenseColumn::VendorName => match row.vendor_public_id {
                None => String::new(),
                Some(vendor_id) => {
                    let name = row.vendor_name.as_deref().unwrap_or_default();
                    if view.caps.can_view_vendor {
                        link_to(&ctx.urls.to(&format!("vendors/{vendor_id}")), name)
                    } else {
                        escape(name)
                    }
                }
            },
            ExpenseColumn::ClientName => match row.client_public_id {
                None => String::new(),
                Some(client_id) => {
                    let name = row.client_display_name();
                    if view.caps.can_view_client {
                        link_to(&ctx.urls.to(&format!("clients/{client_id}")), &name)
                    } else {
                        escape(&name)
                    }
                }
            },
            ExpenseColumn::ExpenseDate => {
                let date = ctx.dates.format(row.expense_date);
                if view.caps.can_edit {
                    link_to(&ctx.urls.to(&format!("expenses/{}/edit", row.public_id)), &date)
                } else {
                    escape(&date)
                }
            }
            ExpenseColumn::Amount => {
                let original = ctx.money.format(row.amount, row.expense_currency_id);
                if row.exchange_rate != Decimal::ONE {
                    let converted = round_half_up(row.amount * row.exchange_rate, 2);
                    format!("{original} | {}", ctx.money.format(converted, row.invoice_currency_id))
                } else {
                    original
                }
            }
            ExpenseColumn::PublicNotes => match &row.public_notes {
                Some(notes) => escape(&notes.chars().take(NOTES_PREVIEW_CHARS).collect::<String>()),
                None => String::new(),
            },
            ExpenseColumn::Status => {
                status_label(row.invoice_id, row.should_be_invoiced, ctx.translator.as_ref())
            }
        }
    }
}

/// Columns of the expense list embedded in a vendor page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorExpenseColumn {
    ExpenseDate,
    Amount,
    PublicNotes,
    /// Always rendered empty.
    InvoiceId,
}

impl VendorExpenseColumn {
    pub const ALL: [VendorExpenseColumn; 4] = [
        VendorExpenseColumn::ExpenseDate,
        VendorExpenseColumn::Amount,
        VendorExpenseColumn::PublicNotes,
        VendorExpenseColumn::InvoiceId,
    ];
}

impl DatatableColumn<ExpenseView> for VendorExpenseColumn {
    fn key(&self) -> &'static str {
        match self {
            VendorExpenseColumn::ExpenseDate => "expense_date",
            VendorExpenseColumn::Amount => "amount",
            VendorExpenseColumn::PublicNotes => "public_notes",
            VendorExpenseColumn::InvoiceId => "invoice_id",
        }
    }

    fn render(&self, view: &ExpenseView, ctx: &ViewContext) -> String {
        let row = &view.row;
        match self {
            VendorExpenseColumn::ExpenseDate => escape(&ctx.dates.format(row.expense_date)),
            VendorExpenseColumn::Amount => ctx.money.format_plain(row.amount),
            VendorExpenseColumn::PublicNotes => row.public_notes.as_deref().map(escape).unwrap_or_default(),
            VendorExpenseColumn::InvoiceId => String::new(),
        }
    }
}

/// Badge for the derived status: invoiced (success), pending (warning) or logged (primary).
pub fn status_label(invoice_id: Option<i64>, should_be_invoiced: bool, translator: &dyn Translator) -> String {
    let (key, class) = match ExpenseStatus::derive(invoice_id, should_be_invoiced) {
        ExpenseStatus::Invoiced => ("invoiced", "success"),
        ExpenseStatus::Pending => ("pending", "warning"),
        ExpenseStatus::Logged => ("logged", "primary"),
    };
    format!("<h4><div class=\"label label-{class}\">{}</div></h4>", escape(&translator.trans(key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CurrentUser, Permission};
    use crate::expense::domain::fixtures::row;
    use crate::expense::domain::ExpenseRow;
    use crate::view::EnglishTranslator;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn ctx() -> ViewContext { ViewContext::with_defaults("", "%Y-%m-%d") }

    fn viewer(permissions: Vec<Permission>) -> CurrentUser {
        CurrentUser { id: Uuid::new_v4(), account_id: Uuid::new_v4(), is_admin: false, permissions }
    }

    fn view_as(user: &CurrentUser, row: ExpenseRow) -> ExpenseView { ExpenseView::new(row, user) }

    #[test]
    fn amount_shows_conversion_only_when_rate_differs() {
        let u = viewer(vec![]);
        let mut r = row(u.account_id, u.id, 1);
        assert_eq!(ExpenseColumn::Amount.render(&view_as(&u, r.clone()), &ctx()), "$100.00");

        r.exchange_rate = dec!(1.2);
        r.invoice_currency_id = 3;
        assert_eq!(ExpenseColumn::Amount.render(&view_as(&u, r), &ctx()), "$100.00 | €120.00");
    }

    #[test]
    fn converted_amount_rounds_half_away_from_zero() {
        let u = viewer(vec![]);
        let mut r = row(u.account_id, u.id, 1);
        r.amount = dec!(10.01);
        r.exchange_rate = dec!(0.5);
        assert_eq!(ExpenseColumn::Amount.render(&view_as(&u, r), &ctx()), "$10.01 | $5.01");
    }

    #[test]
    fn notes_truncated_to_preview_length() {
        let u = viewer(vec![]);
        let mut r = row(u.account_id, u.id, 1);
        assert_eq!(ExpenseColumn::PublicNotes.render(&view_as(&u, r.clone()), &ctx()), "");

        r.public_notes = Some("é".repeat(150));
        let rendered = ExpenseColumn::PublicNotes.render(&view_as(&u, r.clone()), &ctx());
        assert_eq!(rendered.chars().count(), 100);

        let vendor_rendered = VendorExpenseColumn::PublicNotes.render(&view_as(&u, r), &ctx());
        assert_eq!(vendor_rendered.chars().count(), 150);
    }

    #[test]
    fn vendor_link_depends_on_permission() {
        let u = viewer(vec![]);
        let mut r = row(u.account_id, u.id, 1);
        assert_eq!(ExpenseColumn::VendorName.render(&view_as(&u, r.clone()), &ctx()), "");

        r.vendor_public_id = Some(4);
        r.vendor_name = Some("Paper & Co".into());
        r.vendor_user_id = Some(u.id);
        assert_eq!(ExpenseColumn::VendorName.render(&view_as(&u, r.clone()), &ctx()), "<a href=\"/vendors/4\">Paper &amp; Co</a>");

        r.vendor_user_id = Some(Uuid::new_v4());
        assert_eq!(ExpenseColumn::VendorName.render(&view_as(&u, r), &ctx()), "Paper &amp; Co");
    }

    #[test]
    fn client_column_uses_display_name() {
        let u = viewer(vec![Permission::ViewAll]);
        let mut r = row(u.account_id, u.id, 1);
        r.client_public_id = Some(2);
        r.client_user_id = Some(Uuid::new_v4());
        r.client_first_name = Some("Jane".into());
        r.client_last_name = Some("Doe".into());
        assert_eq!(ExpenseColumn::ClientName.render(&view_as(&u, r.clone()), &ctx()), "<a href=\"/clients/2\">Jane Doe</a>");

        let stranger = viewer(vec![]);
        assert_eq!(ExpenseColumn::ClientName.render(&view_as(&stranger, r), &ctx()), "Jane Doe");
    }

    #[test]
    fn date_links_to_edit_page_for_editors() {
        let u = viewer(vec![]);
        let r = row(u.account_id, u.id, 9);
        assert_eq!(ExpenseColumn::ExpenseDate.render(&view_as(&u, r.clone()), &ctx()), "<a href=\"/expenses/9/edit\">2024-01-15</a>");
        let other = viewer(vec![Permission::ViewAll]);
        assert_eq!(ExpenseColumn::ExpenseDate.render(&view_as(&other, r), &ctx()), "2024-01-15");
    }

    #[test]
    fn status_label_variants() {
        let t = EnglishTranslator;
        assert_eq!(status_label(Some(1), false, &t), "<h4><div class=\"label label-success\">Invoiced</div></h4>");
        assert_eq!(status_label(None, true, &t), "<h4><div class=\"label label-warning\">Pending</div></h4>");
        assert_eq!(status_label(None, false, &t), "<h4><div class=\"label label-primary\">Logged</div></h4>");
    }

    #[test]
    fn vendor_columns_are_plain_and_hide_invoice() {
        let u = viewer(vec![]);
        let mut r = row(u.account_id, u.id, 1);
        r.amount = dec!(1234.5);
        r.invoice_id = Some(77);
        r.invoice_public_id = Some(3);
        let v = view_as(&u, r);
        assert_eq!(VendorExpenseColumn::Amount.render(&v, &ctx()), "1,234.50");
        assert_eq!(VendorExpenseColumn::InvoiceId.render(&v, &ctx()), "");
        assert_eq!(VendorExpenseColumn::ExpenseDate.render(&v, &ctx()), "2024-01-15");
    }
}
