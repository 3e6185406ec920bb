use super::domain::ExpenseView;
use crate::datatable::DatatableAction;
use crate::view::ViewContext;

/// Row actions of the main expense list, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseAction {
    Edit,
    ViewInvoice,
    InvoiceExpense,
}

impl ExpenseAction {
    pub const ALL: [ExpenseAction; 3] = [ExpenseAction::Edit, ExpenseAction::ViewInvoice, ExpenseAction::InvoiceExpense];
}

impl DatatableAction<ExpenseView> for ExpenseAction {
    fn label_key(&self) -> &'static str {
        match self {
            ExpenseAction::Edit => "edit_expense",
            ExpenseAction::ViewInvoice => "view_invoice",
            ExpenseAction::InvoiceExpense => "invoice_expense",
        }
    }

    fn url(&self, view: &ExpenseView, ctx: &ViewContext) -> String {
        let row = &view.row;
        match self {
            ExpenseAction::Edit => ctx.urls.to(&format!("expenses/{}/edit", row.public_id)),
            ExpenseAction::ViewInvoice => {
                ctx.urls.to(&format!("invoices/{}/edit", row.invoice_public_id.unwrap_or_default()))
            }
            ExpenseAction::InvoiceExpense => format!("javascript:invoiceEntity({})", row.public_id),
        }
    }

    fn visible(&self, view: &ExpenseView) -> bool {
        let row = &view.row;
        match self {
            ExpenseAction::Edit => view.caps.can_edit,
            ExpenseAction::ViewInvoice => row.invoice_public_id.is_some() && view.caps.can_edit_invoice,
            ExpenseAction::InvoiceExpense => {
                row.invoice_id.is_none() && row.deleted_at.is_none() && view.caps.can_create_invoice
            }
        }
    }
}

/// The vendor page lists expenses without an action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorExpenseAction {}

impl DatatableAction<ExpenseView> for VendorExpenseAction {
    fn label_key(&self) -> &'static str { match *self {} }
    fn url(&self, _view: &ExpenseView, _ctx: &ViewContext) -> String { match *self {} }
    fn visible(&self, _view: &ExpenseView) -> bool { match *self {} }
}
