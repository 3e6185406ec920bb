/// Looks up display strings by key.
pub trait Translator: Send + Sync {
    fn trans(&self, key: &str) -> String;
}

/// Built-in English strings. Unknown keys come back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishTranslator;

impl Translator for EnglishTranslator {
    fn trans(&self, key: &str) -> String {
        let text = match key {
            "vendor_name" => "Vendor",
            "client_name" => "Client",
            "expense_date" => "Date",
            "amount" => "Amount",
            "public_notes" => "Public Notes",
            "expense_status_id" => "Status",
            "invoice_id" => "Invoice",
            "action" => "Action",
            "select" => "Select",
            "edit_expense" => "Edit Expense",
            "view_invoice" => "View Invoice",
            "invoice_expense" => "Invoice Expense",
            "archive_expense" => "Archive Expense",
            "restore_expense" => "Restore Expense",
            "delete_expense" => "Delete Expense",
            "invoiced" => "Invoiced",
            "pending" => "Pending",
            "logged" => "Logged",
            other => other,
        };
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_keys() {
        assert_eq!(EnglishTranslator.trans("invoice_expense"), "Invoice Expense");
        assert_eq!(EnglishTranslator.trans("no_such_key"), "no_such_key");
    }
}
