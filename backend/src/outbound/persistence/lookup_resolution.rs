//! Get-or-create resolution of locations and categories by name.
//!
//! Resolution is one `INSERT .. ON CONFLICT (name) DO UPDATE .. RETURNING id`
//! statement, so the unique index guarantees a single row per name even when
//! concurrent writers race on the same new name.

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::LookupKind;

/// Run `$body` with `$table` bound to the lookup table module for `$kind`
/// and `$fk` bound to the matching `events` foreign key column.
macro_rules! with_lookup_table {
    ($kind:expr, $table:ident, $fk:ident => $body:block) => {
        match $kind {
            $crate::domain::LookupKind::Location => {
                use $crate::outbound::persistence::schema::locations as $table;
                let $fk = $crate::outbound::persistence::schema::events::location_id;
                $body
            }
            $crate::domain::LookupKind::Category => {
                use $crate::outbound::persistence::schema::categories as $table;
                let $fk = $crate::outbound::persistence::schema::events::category_id;
                $body
            }
        }
    };
}

pub(crate) use with_lookup_table;

/// Return the id of the lookup named `name`, inserting it when absent.
pub(crate) async fn find_or_create(
    conn: &mut AsyncPgConnection,
    kind: LookupKind,
    name: &str,
) -> QueryResult<i64> {
    with_lookup_table!(kind, lookup, _fk => {
        diesel::insert_into(lookup::table)
            .values(lookup::name.eq(name))
            .on_conflict(lookup::name)
            .do_update()
            .set(lookup::name.eq(excluded(lookup::name)))
            .returning(lookup::id)
            .get_result(conn)
            .await
    })
}

/// Resolve a location by exact name, creating it when absent.
pub(crate) async fn find_or_create_location(
    conn: &mut AsyncPgConnection,
    name: &str,
) -> QueryResult<i64> {
    find_or_create(conn, LookupKind::Location, name).await
}

/// Resolve a category by exact name, creating it when absent.
pub(crate) async fn find_or_create_category(
    conn: &mut AsyncPgConnection,
    name: &str,
) -> QueryResult<i64> {
    find_or_create(conn, LookupKind::Category, name).await
}
