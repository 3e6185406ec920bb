//! Live database tests. They skip when `SKIP_DB_TESTS` is set or no database is reachable.

use migration::MigratorTrait;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::{account, client, db, invoice, user, vendor};

async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

#[tokio::test]
async fn public_ids_are_sequential_per_account() -> anyhow::Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let acct = account::create(&db, &format!("acct_{}", Uuid::new_v4()), 1).await?;
    let other = account::create(&db, &format!("acct_{}", Uuid::new_v4()), 1).await?;
    let owner = user::create(&db, acct.id, &format!("{}@example.com", Uuid::new_v4()), "Owner", false, &["view_all"]).await?;

    let first = client::create(&db, acct.id, owner.id, Some("First"), 1).await?;
    let second = client::create(&db, acct.id, owner.id, Some("Second"), 1).await?;
    assert_eq!(first.public_id, 1);
    assert_eq!(second.public_id, 2);
    assert_eq!(client::next_public_id(&db, other.id).await?, 1);

    assert_eq!(client::private_id(&db, acct.id, second.public_id).await?, Some(second.id));
    assert_eq!(client::private_id(&db, other.id, second.public_id).await?, None);

    let v = vendor::create(&db, acct.id, owner.id, "Paper Co").await?;
    assert_eq!(vendor::private_id(&db, acct.id, v.public_id).await?, Some(v.id));

    let inv = invoice::create(&db, &first, owner.id, "0001").await?;
    assert_eq!(inv.public_id, 1);

    account::Entity::delete_by_id(acct.id).exec(&db).await?;
    account::Entity::delete_by_id(other.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn find_active_ignores_soft_deleted_users() -> anyhow::Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let acct = account::create(&db, &format!("acct_{}", Uuid::new_v4()), 1).await?;
    let u = user::create(&db, acct.id, &format!("{}@example.com", Uuid::new_v4()), "Active", true, &[]).await?;
    assert!(user::find_active(&db, u.id).await?.is_some());
    assert!(user::find_active(&db, Uuid::new_v4()).await?.is_none());

    account::Entity::delete_by_id(acct.id).exec(&db).await?;
    Ok(())
}
