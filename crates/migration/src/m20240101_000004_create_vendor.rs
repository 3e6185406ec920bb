//! Create `vendor` table.
use sea_orm_migration::{prelude::*, schema::*};
use sea_orm_migration::sea_orm::sea_query::TableCreateStatement;

#[derive(DeriveMigrationName)]
pub struct Migration;

impl Migration {
    pub(crate) fn table() -> TableCreateStatement {
        Table::create()
            .table(Vendor::Table)
            .if_not_exists()
            .col(big_integer(Vendor::Id).auto_increment().primary_key())
            .col(big_integer(Vendor::PublicId).not_null())
            .col(uuid(Vendor::AccountId).not_null())
            .col(uuid(Vendor::UserId).not_null())
            .col(string_len(Vendor::Name, 255).not_null())
            .col(timestamp_with_time_zone(Vendor::CreatedAt).not_null())
            .col(timestamp_with_time_zone_null(Vendor::DeletedAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_vendor_account")
                    .from(Vendor::Table, Vendor::AccountId)
                    .to(Account::Table, Account::Id)
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
        manager.drop_table(Table::drop().table(Vendor::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Vendor { Table, Id, PublicId, AccountId, UserId, Name, CreatedAt, DeletedAt }

#[derive(DeriveIden)]
enum Account { Table, Id }

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
