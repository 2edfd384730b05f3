//! PostgreSQL-backed `EventRepository`.
//!
//! Listing joins events to both lookup tables so filters and ordering apply
//! to related names. Writes resolve both names and write the event inside
//! one transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;
use tracing::debug;

use super::diesel_helpers::{
    StoreFailure, classify_diesel_error, classify_pool_error, to_count, to_sql_bound,
};
use super::lookup_resolution::{find_or_create_category, find_or_create_location};
use super::models::{EventValues, EventWithNamesRow};
use super::pool::DbPool;
use super::schema::{categories, events, locations};
use crate::domain::ports::{EventRepository, EventRepositoryError, SeedingResult};
use crate::domain::{
    EntityName, Event, EventDraft, EventId, EventQuery, Listing, OrderField, SortDirection,
};

/// Diesel implementation of [`EventRepository`].
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(failure: StoreFailure, name: Option<&EntityName>) -> EventRepositoryError {
    match (failure, name) {
        (StoreFailure::UniqueViolation, Some(name)) => {
            EventRepositoryError::duplicate_name(name.as_str())
        }
        (StoreFailure::UniqueViolation, None) => {
            EventRepositoryError::query("unique constraint violated")
        }
        (StoreFailure::Connection(message), _) => EventRepositoryError::connection(message),
        (StoreFailure::Query(message), _) => EventRepositoryError::query(message),
    }
}

fn pool_error(error: super::pool::PoolError) -> EventRepositoryError {
    to_port_error(classify_pool_error(error), None)
}

fn convert_rows(rows: Vec<EventWithNamesRow>) -> Result<Vec<Event>, EventRepositoryError> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(EventRepositoryError::query))
        .collect()
}

/// Resolve the draft's lookups and return the column values to write.
async fn resolve_values<'a>(
    conn: &mut AsyncPgConnection,
    draft: &'a EventDraft,
) -> QueryResult<EventValues<'a>> {
    let location_id = find_or_create_location(conn, draft.location.as_str()).await?;
    let category_id = find_or_create_category(conn, draft.category.as_str()).await?;
    Ok(EventValues {
        name: draft.name.as_str(),
        location_id,
        category_id,
    })
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn list(
        &self,
        query: &EventQuery,
        page: PageRequest,
    ) -> Result<Listing<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let mut count_query = events::table
            .inner_join(locations::table)
            .inner_join(categories::table)
            .select(diesel::dsl::count_star())
            .into_boxed();
        let mut rows_query = events::table
            .inner_join(locations::table)
            .inner_join(categories::table)
            .select((events::id, events::name, locations::name, categories::name))
            .into_boxed();

        if let Some(location) = query.location.as_deref() {
            count_query = count_query.filter(locations::name.eq(location));
            rows_query = rows_query.filter(locations::name.eq(location));
        }
        if let Some(category) = query.category.as_deref() {
            count_query = count_query.filter(categories::name.eq(category));
            rows_query = rows_query.filter(categories::name.eq(category));
        }

        rows_query = match (query.ordering.field, query.ordering.direction) {
            (OrderField::Id, SortDirection::Ascending) => rows_query.order_by(events::id.asc()),
            (OrderField::Id, SortDirection::Descending) => rows_query.order_by(events::id.desc()),
            (OrderField::Name, SortDirection::Ascending) => {
                rows_query.order_by((events::name.asc(), events::id.asc()))
            }
            (OrderField::Name, SortDirection::Descending) => {
                rows_query.order_by((events::name.desc(), events::id.asc()))
            }
            (OrderField::Location, SortDirection::Ascending) => {
                rows_query.order_by((locations::name.asc(), events::id.asc()))
            }
            (OrderField::Location, SortDirection::Descending) => {
                rows_query.order_by((locations::name.desc(), events::id.asc()))
            }
            (OrderField::Category, SortDirection::Ascending) => {
                rows_query.order_by((categories::name.asc(), events::id.asc()))
            }
            (OrderField::Category, SortDirection::Descending) => {
                rows_query.order_by((categories::name.desc(), events::id.asc()))
            }
        };

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(|err| to_port_error(classify_diesel_error(err, "count events"), None))?;
        let rows: Vec<EventWithNamesRow> = rows_query
            .limit(to_sql_bound(page.limit()))
            .offset(to_sql_bound(page.offset()))
            .load(&mut conn)
            .await
            .map_err(|err| to_port_error(classify_diesel_error(err, "list events"), None))?;

        debug!(total, returned = rows.len(), "listed events");
        Ok(Listing::new(to_count(total), convert_rows(rows)?))
    }

    async fn find(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<EventWithNamesRow> = events::table
            .inner_join(locations::table)
            .inner_join(categories::table)
            .filter(events::id.eq(id.get()))
            .select((events::id, events::name, locations::name, categories::name))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| to_port_error(classify_diesel_error(err, "find event"), None))?;
        row.map(|found| found.into_domain().map_err(EventRepositoryError::query))
            .transpose()
    }

    async fn create(&self, draft: &EventDraft) -> Result<Event, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let id = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let values = resolve_values(conn, draft).await?;
                    diesel::insert_into(events::table)
                        .values(&values)
                        .returning(events::id)
                        .get_result::<i64>(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| {
                to_port_error(classify_diesel_error(err, "create event"), Some(&draft.name))
            })?;
        Ok(draft.clone().into_event(EventId::new(id)))
    }

    async fn update(
        &self,
        id: EventId,
        draft: &EventDraft,
    ) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let existing = events::table
                        .find(id.get())
                        .select(events::id)
                        .for_update()
                        .first::<i64>(conn)
                        .await
                        .optional()?;
                    if existing.is_none() {
                        return Ok(false);
                    }
                    let values = resolve_values(conn, draft).await?;
                    diesel::update(events::table.find(id.get()))
                        .set(&values)
                        .execute(conn)
                        .await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| {
                to_port_error(classify_diesel_error(err, "update event"), Some(&draft.name))
            })?;
        Ok(updated.then(|| draft.clone().into_event(id)))
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(events::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| to_port_error(classify_diesel_error(err, "delete event"), None))?;
        Ok(deleted > 0)
    }

    async fn seed_if_empty(
        &self,
        drafts: &[EventDraft],
    ) -> Result<SeedingResult, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let existing: i64 = events::table.count().get_result(conn).await?;
                if existing > 0 {
                    return Ok(SeedingResult::AlreadySeeded);
                }
                let mut inserted = 0_usize;
                for draft in drafts {
                    let values = resolve_values(conn, draft).await?;
                    inserted += diesel::insert_into(events::table)
                        .values(&values)
                        .on_conflict(events::name)
                        .do_nothing()
                        .execute(conn)
                        .await?;
                }
                Ok(SeedingResult::Applied { inserted })
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| to_port_error(classify_diesel_error(err, "seed events"), None))
    }
}
