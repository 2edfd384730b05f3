//! PostgreSQL-backed `LookupRepository` serving both locations and categories.
//!
//! Event counts for the list view are one grouped count over the page's ids;
//! related events are only loaded for the detail view.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use tracing::debug;

use super::diesel_helpers::{
    StoreFailure, classify_diesel_error, classify_pool_error, to_count, to_sql_bound,
};
use super::lookup_resolution::with_lookup_table;
use super::models::EventWithNamesRow;
use super::pool::{DbPool, PoolError};
use super::schema::{categories, events, locations};
use crate::domain::ports::{LookupRepository, LookupRepositoryError};
use crate::domain::{
    EntityName, Event, Listing, Lookup, LookupDetail, LookupId, LookupKind, LookupSummary,
};

/// Diesel implementation of [`LookupRepository`].
#[derive(Clone)]
pub struct DieselLookupRepository {
    pool: DbPool,
}

impl DieselLookupRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(
    failure: StoreFailure,
    kind: LookupKind,
    name: Option<&EntityName>,
) -> LookupRepositoryError {
    match (failure, name) {
        (StoreFailure::UniqueViolation, Some(name)) => {
            LookupRepositoryError::duplicate_name(kind, name.as_str())
        }
        (StoreFailure::UniqueViolation, None) => {
            LookupRepositoryError::query(format!("{kind} unique constraint violated"))
        }
        (StoreFailure::Connection(message), _) => LookupRepositoryError::connection(message),
        (StoreFailure::Query(message), _) => LookupRepositoryError::query(message),
    }
}

fn pool_error(kind: LookupKind) -> impl Fn(PoolError) -> LookupRepositoryError {
    move |error| to_port_error(classify_pool_error(error), kind, None)
}

fn diesel_error(
    kind: LookupKind,
    operation: &'static str,
) -> impl Fn(diesel::result::Error) -> LookupRepositoryError {
    move |error| to_port_error(classify_diesel_error(error, operation), kind, None)
}

fn into_lookup(kind: LookupKind, id: i64, name: String) -> Result<Lookup, LookupRepositoryError> {
    let name = EntityName::new(name)
        .map_err(|err| LookupRepositoryError::query(format!("{kind} {id}: {err}")))?;
    Ok(Lookup {
        id: LookupId::new(id),
        name,
    })
}

#[async_trait]
impl LookupRepository for DieselLookupRepository {
    async fn list(
        &self,
        kind: LookupKind,
        page: PageRequest,
    ) -> Result<Listing<LookupSummary>, LookupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error(kind))?;
        let (total, rows, counts) = with_lookup_table!(kind, lookup, fk => {
            let total: i64 = lookup::table
                .count()
                .get_result(&mut conn)
                .await
                .map_err(diesel_error(kind, "count lookups"))?;
            let rows: Vec<(i64, String)> = lookup::table
                .select((lookup::id, lookup::name))
                .order_by(lookup::id.asc())
                .limit(to_sql_bound(page.limit()))
                .offset(to_sql_bound(page.offset()))
                .load(&mut conn)
                .await
                .map_err(diesel_error(kind, "list lookups"))?;
            let ids: Vec<i64> = rows.iter().map(|(id, _)| *id).collect();
            let counts: Vec<(i64, i64)> = events::table
                .filter(fk.eq_any(ids))
                .group_by(fk)
                .select((fk, diesel::dsl::count_star()))
                .load(&mut conn)
                .await
                .map_err(diesel_error(kind, "count lookup events"))?;
            (total, rows, counts)
        });

        let counts: HashMap<i64, i64> = counts.into_iter().collect();
        let items = rows
            .into_iter()
            .map(|(id, name)| {
                let event_count = counts.get(&id).copied().map_or(0, to_count);
                into_lookup(kind, id, name).map(|found| LookupSummary::summarize(found, event_count))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(%kind, total, returned = items.len(), "listed lookups");
        Ok(Listing::new(to_count(total), items))
    }

    async fn find(
        &self,
        kind: LookupKind,
        id: LookupId,
    ) -> Result<Option<LookupDetail>, LookupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error(kind))?;
        let found = with_lookup_table!(kind, lookup, fk => {
            let row: Option<(i64, String)> = lookup::table
                .find(id.get())
                .select((lookup::id, lookup::name))
                .first(&mut conn)
                .await
                .optional()
                .map_err(diesel_error(kind, "find lookup"))?;
            match row {
                None => None,
                Some((lookup_id, name)) => {
                    let events: Vec<EventWithNamesRow> = events::table
                        .inner_join(locations::table)
                        .inner_join(categories::table)
                        .filter(fk.eq(lookup_id))
                        .select((events::id, events::name, locations::name, categories::name))
                        .order_by(events::id.asc())
                        .load(&mut conn)
                        .await
                        .map_err(diesel_error(kind, "load lookup events"))?;
                    Some((lookup_id, name, events))
                }
            }
        });

        let Some((lookup_id, name, rows)) = found else {
            return Ok(None);
        };
        let lookup = into_lookup(kind, lookup_id, name)?;
        let events = rows
            .into_iter()
            .map(|row| row.into_domain().map_err(LookupRepositoryError::query))
            .collect::<Result<Vec<Event>, _>>()?;
        Ok(Some(LookupDetail { lookup, events }))
    }

    async fn create(
        &self,
        kind: LookupKind,
        name: &EntityName,
    ) -> Result<Lookup, LookupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error(kind))?;
        let id: i64 = with_lookup_table!(kind, lookup, _fk => {
            diesel::insert_into(lookup::table)
                .values(lookup::name.eq(name.as_str()))
                .returning(lookup::id)
                .get_result(&mut conn)
                .await
                .map_err(|err| {
                    to_port_error(classify_diesel_error(err, "create lookup"), kind, Some(name))
                })?
        });
        Ok(Lookup {
            id: LookupId::new(id),
            name: name.clone(),
        })
    }

    async fn rename(
        &self,
        kind: LookupKind,
        id: LookupId,
        name: &EntityName,
    ) -> Result<Option<Lookup>, LookupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error(kind))?;
        let renamed: Option<i64> = with_lookup_table!(kind, lookup, _fk => {
            diesel::update(lookup::table.find(id.get()))
                .set(lookup::name.eq(name.as_str()))
                .returning(lookup::id)
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(|err| {
                    to_port_error(classify_diesel_error(err, "rename lookup"), kind, Some(name))
                })?
        });
        Ok(renamed.map(|_| Lookup {
            id,
            name: name.clone(),
        }))
    }

    async fn delete(&self, kind: LookupKind, id: LookupId) -> Result<bool, LookupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error(kind))?;
        let deleted = with_lookup_table!(kind, lookup, _fk => {
            diesel::delete(lookup::table.find(id.get()))
                .execute(&mut conn)
                .await
                .map_err(diesel_error(kind, "delete lookup"))?
        });
        Ok(deleted > 0)
    }
}
