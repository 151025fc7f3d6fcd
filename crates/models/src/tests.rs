//! Database-backed CRUD tests. They need a reachable PostgreSQL at
//! `DATABASE_URL` and are skipped when `SKIP_DB_TESTS` is set or the
//! connection fails.

use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::{advertisement, category, db, errors::ModelError, user};

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

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
async fn category_crud_and_alias_uniqueness() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let alias = unique("books");
    let created = category::create(&db, "Books", &alias).await?;
    assert_eq!(created.alias, alias);

    let by_alias = category::find_by_alias(&db, &alias).await?.expect("by alias");
    assert_eq!(by_alias.id, created.id);

    let dup = category::create(&db, "Books again", &alias).await;
    assert!(matches!(dup, Err(ModelError::Constraint(_))));

    let updated = category::update(&db, created.id, Some("Paper books"), None).await?;
    assert_eq!(updated.name, "Paper books");
    assert_eq!(updated.alias, alias);

    category::delete(&db, created.id).await?;
    assert!(category::find(&db, created.id).await?.is_none());
    assert!(matches!(category::delete(&db, created.id).await, Err(ModelError::NotFound("category"))));
    Ok(())
}

#[tokio::test]
async fn advertisement_crud_and_search() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let cat = category::create(&db, "Bikes", &unique("bikes")).await?;
    let owner = user::create(&db, &format!("{}@example.com", unique("rider")), "Rider").await?;
    let marker = unique("Bike");

    let ad = advertisement::create(&db, advertisement::NewAdvertisement {
        title: &marker,
        description: "Red bike",
        price: 100,
        currency: "USD",
        category_id: cat.id,
        user_id: owner.id,
    })
    .await?;

    let found = advertisement::search_by_title(&db, &marker.to_uppercase()).await?;
    assert!(found.iter().any(|a| a.id == ad.id));

    let changed = advertisement::update(&db, ad.id, advertisement::AdvertisementChanges {
        price: Some(150),
        ..Default::default()
    })
    .await?;
    assert_eq!(changed.price, 150);
    assert_eq!(changed.title, marker);

    // The category is still referenced
    assert!(matches!(category::delete(&db, cat.id).await, Err(ModelError::Constraint(_))));

    advertisement::delete(&db, ad.id).await?;
    category::delete(&db, cat.id).await?;
    user::delete(&db, owner.id).await?;
    Ok(())
}
