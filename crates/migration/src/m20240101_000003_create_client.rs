//! Create `client` table.
//!
//! The primary contact is folded into the client row.
use sea_orm_migration::{prelude::*, schema::*};
use sea_orm_migration::sea_orm::sea_query::TableCreateStatement;

#[derive(DeriveMigrationName)]
pub struct Migration;

impl Migration {
    pub(crate) fn table() -> TableCreateStatement {
        Table::create()
            .table(Client::Table)
            .if_not_exists()
            .col(big_integer(Client::Id).auto_increment().primary_key())
            .col(big_integer(Client::PublicId).not_null())
            .col(uuid(Client::AccountId).not_null())
            .col(uuid(Client::UserId).not_null())
            .col(string_len_null(Client::Name, 255))
            .col(string_len_null(Client::FirstName, 128))
            .col(string_len_null(Client::LastName, 128))
            .col(string_len_null(Client::Email, 255))
            .col(integer(Client::CurrencyId).not_null().default(1))
            .col(timestamp_with_time_zone(Client::CreatedAt).not_null())
            .col(timestamp_with_time_zone_null(Client::DeletedAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_client_account")
                    .from(Client::Table, Client::AccountId)
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
        manager.drop_table(Table::drop().table(Client::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Client { Table, Id, PublicId, AccountId, UserId, Name, FirstName, LastName, Email, CurrencyId, CreatedAt, DeletedAt }

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
