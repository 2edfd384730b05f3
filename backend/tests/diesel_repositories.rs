//! Diesel adapters against a live PostgreSQL database.
//!
//! Runs only when `TEST_DATABASE_URL` points at a disposable database; every
//! run truncates the events, lookups and users tables first.

use std::env;
use std::path::PathBuf;

use diesel_async::RunQueryDsl;
use events_backend::domain::ports::{
    EventRepository, EventRepositoryError, LoginService, LookupRepository, LookupRepositoryError,
    SeedingResult,
};
use events_backend::domain::{
    EntityName, ErrorCode, EventDraft, EventId, EventOrdering, EventQuery, LoginCredentials,
    LookupId, LookupKind,
};
use events_backend::outbound::persistence::{
    DbPool, DieselEventRepository, DieselLoginService, DieselLookupRepository, PoolConfig,
    apply_migrations,
};
use events_backend::seeding::load_seed_events;
use pagination::PageRequest;

const TEST_DATABASE_URL_ENV: &str = "TEST_DATABASE_URL";

fn name(raw: &str) -> EntityName {
    EntityName::new(raw).expect("valid name")
}

fn draft(event: &str, location: &str, category: &str) -> EventDraft {
    EventDraft::new(name(event), name(location), name(category))
}

fn page(size: u32) -> PageRequest {
    PageRequest::first(size).expect("positive page size")
}

async fn fresh_pool(url: String) -> DbPool {
    let migration_url = url.clone();
    tokio::task::spawn_blocking(move || apply_migrations(&migration_url))
        .await
        .expect("migration task")
        .expect("migrations apply");
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(2))
        .await
        .expect("pool connects");
    let mut conn = pool.get().await.expect("connection");
    diesel::sql_query("TRUNCATE events, locations, categories, users RESTART IDENTITY CASCADE")
        .execute(&mut conn)
        .await
        .expect("truncate tables");
    drop(conn);
    pool
}

#[tokio::test]
async fn diesel_adapters_round_trip_against_postgres() {
    let Ok(url) = env::var(TEST_DATABASE_URL_ENV) else {
        return;
    };
    let pool = fresh_pool(url).await;
    let events = DieselEventRepository::new(pool.clone());
    let lookups = DieselLookupRepository::new(pool.clone());
    let login = DieselLoginService::new(pool);

    // Seeding fills an empty store once.
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("seed-events.json");
    let drafts = load_seed_events(&fixture).expect("seed fixture");
    assert_eq!(
        events.seed_if_empty(&drafts).await.expect("seed"),
        SeedingResult::Applied { inserted: 10 }
    );
    assert_eq!(
        events.seed_if_empty(&drafts).await.expect("reseed"),
        SeedingResult::AlreadySeeded
    );

    // Filters and ordering.
    let london_sports = EventQuery {
        ordering: EventOrdering::default(),
        location: Some("London".to_owned()),
        category: Some("sports".to_owned()),
    };
    let listing = events.list(&london_sports, page(10)).await.expect("filtered list");
    assert_eq!(listing.total, 2);
    let ids: Vec<i64> = listing.items.iter().map(|event| event.id.get()).collect();
    assert_eq!(ids, vec![2, 5]);

    let by_location = EventQuery {
        ordering: "-location".parse().expect("ordering"),
        ..EventQuery::default()
    };
    let listing = events.list(&by_location, page(3)).await.expect("ordered list");
    assert_eq!(listing.total, 10);
    let ids: Vec<i64> = listing.items.iter().map(|event| event.id.get()).collect();
    // Manchester first, then London with ties broken by ascending id.
    assert_eq!(ids, vec![6, 1, 2]);

    // Writes resolve lookups by name.
    let yoga = events
        .create(&draft("Yoga", "Leeds", "sports"))
        .await
        .expect("create event");
    assert_eq!(yoga.id, EventId::new(11));
    let locations = lookups.list(LookupKind::Location, page(10)).await.expect("locations");
    assert_eq!(locations.total, 5);
    let leeds = locations
        .items
        .iter()
        .find(|summary| summary.name.as_str() == "Leeds")
        .expect("Leeds created");
    assert_eq!(leeds.event_count, 1);

    let duplicate = events.create(&draft("Yoga", "York", "sports")).await;
    assert!(matches!(duplicate, Err(EventRepositoryError::DuplicateName { .. })));
    let still = lookups.list(LookupKind::Location, page(10)).await.expect("locations");
    assert_eq!(still.total, 5, "failed write must not leave a new location");

    let renamed = events
        .update(yoga.id, &draft("Evening Yoga", "Leeds", "wellbeing"))
        .await
        .expect("update")
        .expect("event exists");
    assert_eq!(renamed.category.as_str(), "wellbeing");
    assert!(events.update(EventId::new(99), &draft("Ghost", "Leeds", "sports")).await.expect("update").is_none());

    // Lookup writes.
    let duplicate_lookup = lookups.create(LookupKind::Category, &name("sports")).await;
    assert!(matches!(
        duplicate_lookup,
        Err(LookupRepositoryError::DuplicateName { .. })
    ));
    let detail = lookups
        .find(LookupKind::Category, LookupId::new(2))
        .await
        .expect("find")
        .expect("sports exists");
    assert_eq!(detail.lookup.name.as_str(), "sports");
    assert_eq!(detail.events.len(), 4);

    // Deleting a lookup cascades to its events.
    assert!(lookups.delete(LookupKind::Category, LookupId::new(2)).await.expect("delete"));
    let remaining = events.list(&EventQuery::default(), page(20)).await.expect("list");
    assert_eq!(remaining.total, 7);
    assert!(remaining.items.iter().all(|event| event.category.as_str() != "sports"));
    assert!(!lookups.delete(LookupKind::Category, LookupId::new(2)).await.expect("delete"));

    assert!(events.delete(yoga.id).await.expect("delete event"));
    assert!(events.find(yoga.id).await.expect("find").is_none());

    // Accounts.
    let user_id = login
        .upsert_account("admin", "s3cret".to_owned())
        .await
        .expect("create account");
    let good = LoginCredentials::try_from_parts("admin", "s3cret").expect("credentials");
    assert_eq!(login.authenticate(&good).await.expect("authenticates"), user_id);
    let bad = LoginCredentials::try_from_parts("admin", "guess").expect("credentials");
    let err = login.authenticate(&bad).await.expect_err("wrong password");
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    let same_id = login
        .upsert_account("admin", "rotated".to_owned())
        .await
        .expect("reset password");
    assert_eq!(same_id, user_id);
    assert!(login.authenticate(&good).await.is_err());
}
