//! Create `expense` table.
//!
//! Status is never stored; it is derived from `invoice_id` and `should_be_invoiced`.
use sea_orm_migration::{prelude::*, schema::*};
use sea_orm_migration::sea_orm::sea_query::TableCreateStatement;

#[derive(DeriveMigrationName)]
pub struct Migration;

impl Migration {
    pub(crate) fn table() -> TableCreateStatement {
        Table::create()
            .table(Expense::Table)
            .if_not_exists()
            .col(big_integer(Expense::Id).auto_increment().primary_key())
            .col(big_integer(Expense::PublicId).not_null())
            .col(uuid(Expense::AccountId).not_null())
            .col(uuid(Expense::UserId).not_null())
            .col(decimal_len(Expense::Amount, 15, 2).not_null())
            .col(date(Expense::ExpenseDate).not_null())
            .col(integer(Expense::ExpenseCurrencyId).not_null())
            .col(integer(Expense::InvoiceCurrencyId).not_null())
            .col(decimal_len(Expense::ExchangeRate, 13, 4).not_null().default(1))
            .col(text_null(Expense::PublicNotes))
            .col(text_null(Expense::PrivateNotes))
            .col(boolean(Expense::ShouldBeInvoiced).not_null().default(false))
            .col(big_integer_null(Expense::InvoiceId))
            .col(big_integer_null(Expense::VendorId))
            .col(big_integer_null(Expense::ClientId))
            .col(boolean(Expense::IsDeleted).not_null().default(false))
            .col(timestamp_with_time_zone(Expense::CreatedAt).not_null())
            .col(timestamp_with_time_zone(Expense::UpdatedAt).not_null())
            .col(timestamp_with_time_zone_null(Expense::DeletedAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_expense_account")
                    .from(Expense::Table, Expense::AccountId)
                    .to(Account::Table, Account::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_expense_invoice")
                    .from(Expense::Table, Expense::InvoiceId)
                    .to(Invoice::Table, Invoice::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_expense_vendor")
                    .from(Expense::Table, Expense::VendorId)
                    .to(Vendor::Table, Vendor::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_expense_client")
                    .from(Expense::Table, Expense::ClientId)
                    .to(Client::Table, Client::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned()
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(Migration::table()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Expense::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Expense {
    Table,
    Id,
    PublicId,
    AccountId,
    UserId,
    Amount,
    ExpenseDate,
    ExpenseCurrencyId,
    InvoiceCurrencyId,
    ExchangeRate,
    PublicNotes,
    PrivateNotes,
    ShouldBeInvoiced,
    InvoiceId,
    VendorId,
    ClientId,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Account { Table, Id }

#[derive(DeriveIden)]
enum Invoice { Table, Id }

#[derive(DeriveIden)]
enum Vendor { Table, Id }

#[derive(DeriveIden)]
enum Client { Table, Id }
