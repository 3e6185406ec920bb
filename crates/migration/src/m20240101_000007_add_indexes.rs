use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const PUBLIC_ID_TABLES: [(&str, &str); 4] = [
    ("uniq_client_account_public_id", "client"),
    ("uniq_vendor_account_public_id", "vendor"),
    ("uniq_invoice_account_public_id", "invoice"),
    ("uniq_expense_account_public_id", "expense"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Public ids: composite unique (account_id, public_id)
        for (name, table) in PUBLIC_ID_TABLES {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Alias::new(table))
                        .col(Alias::new("account_id"))
                        .col(Alias::new("public_id"))
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        // Expense: owner filter used by the datatable
        manager
            .create_index(
                Index::create()
                    .name("idx_expense_user")
                    .table(Expense::Table)
                    .col(Expense::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_expense_vendor")
                    .table(Expense::Table)
                    .col(Expense::VendorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_expense_vendor").table(Expense::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_expense_user").table(Expense::Table).to_owned())
            .await?;
        for (name, table) in PUBLIC_ID_TABLES {
            manager
                .drop_index(Index::drop().name(name).table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Expense { Table, UserId, VendorId }
