//! Create `invoice` table with FK to `client`.
use sea_orm_migration::{prelude::*, schema::*};
use sea_orm_migration::sea_orm::sea_query::TableCreateStatement;

#[derive(DeriveMigrationName)]
pub struct Migration;

impl Migration {
    pub(crate) fn table() -> TableCreateStatement {
        Table::create()
            .table(Invoice::Table)
            .if_not_exists()
            .col(big_integer(Invoice::Id).auto_increment().primary_key())
            .col(big_integer(Invoice::PublicId).not_null())
            .col(uuid(Invoice::AccountId).not_null())
            .col(uuid(Invoice::UserId).not_null())
            .col(big_integer(Invoice::ClientId).not_null())
            .col(string_len(Invoice::InvoiceNumber, 64).not_null())
            .col(timestamp_with_time_zone(Invoice::CreatedAt).not_null())
            .col(timestamp_with_time_zone_null(Invoice::DeletedAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_invoice_client")
                    .from(Invoice::Table, Invoice::ClientId)
                    .to(Client::Table, Client::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::Cascade),
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
        manager.drop_table(Table::drop().table(Invoice::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Invoice { Table, Id, PublicId, AccountId, UserId, ClientId, InvoiceNumber, CreatedAt, DeletedAt }

#[derive(DeriveIden)]
enum Client { Table, Id }

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::sea_query::{PostgresQueryBuilder, SchemaStatementBuilder};

    #[test]
    fn id_is_bigserial_primary_key() {
        let sql = Migration::table().to_string(PostgresQueryBuilder);
        assert!(sql.contains("\"id\" bigserial"), "{sql}");
        assert!(sql.contains("PRIMARY KEY"), "{sql}");
    }
}
