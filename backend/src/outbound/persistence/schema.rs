//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Places where events happen. `name` is unique.
    locations (id) {
        id -> Int8,
        name -> Text,
    }
}

diesel::table! {
    /// Event categories. `name` is unique.
    categories (id) {
        id -> Int8,
        name -> Text,
    }
}

diesel::table! {
    /// Events. `name` is unique; both foreign keys cascade on delete.
    events (id) {
        id -> Int8,
        name -> Text,
        location_id -> Int8,
        category_id -> Int8,
    }
}

diesel::table! {
    /// Accounts allowed to open a write session.
    users (id) {
        id -> Uuid,
        username -> Text,
        password_hash -> Text,
    }
}

diesel::joinable!(events -> locations (location_id));
diesel::joinable!(events -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(categories, events, locations, users);
