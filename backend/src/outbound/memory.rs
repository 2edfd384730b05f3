//! In-memory adapter implementing the event and lookup ports.
//!
//! Used when no database is configured and by the HTTP test suites. It keeps
//! the relational rules of the PostgreSQL schema: unique names per table,
//! get-or-create of lookups, and cascading deletes from lookups to events.
//! Text ordering is byte-wise rather than collation aware.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{
    EventRepository, EventRepositoryError, LookupRepository, LookupRepositoryError, SeedingResult,
};
use crate::domain::{
    EntityName, Event, EventDraft, EventId, EventQuery, Listing, Lookup, LookupDetail, LookupId,
    LookupKind, LookupSummary,
};

#[derive(Debug, Clone)]
struct StoredEvent {
    name: EntityName,
    location_id: i64,
    category_id: i64,
}

#[derive(Debug, Default)]
struct State {
    next_event_id: i64,
    next_location_id: i64,
    next_category_id: i64,
    events: BTreeMap<i64, StoredEvent>,
    locations: BTreeMap<i64, EntityName>,
    categories: BTreeMap<i64, EntityName>,
}

impl State {
    fn table(&self, kind: LookupKind) -> &BTreeMap<i64, EntityName> {
        match kind {
            LookupKind::Location => &self.locations,
            LookupKind::Category => &self.categories,
        }
    }

    fn table_mut(&mut self, kind: LookupKind) -> &mut BTreeMap<i64, EntityName> {
        match kind {
            LookupKind::Location => &mut self.locations,
            LookupKind::Category => &mut self.categories,
        }
    }

    fn next_lookup_id(&mut self, kind: LookupKind) -> i64 {
        let counter = match kind {
            LookupKind::Location => &mut self.next_location_id,
            LookupKind::Category => &mut self.next_category_id,
        };
        *counter += 1;
        *counter
    }

    fn lookup_id_by_name(&self, kind: LookupKind, name: &EntityName) -> Option<i64> {
        self.table(kind)
            .iter()
            .find_map(|(id, existing)| (existing == name).then_some(*id))
    }

    fn find_or_create(&mut self, kind: LookupKind, name: &EntityName) -> i64 {
        if let Some(id) = self.lookup_id_by_name(kind, name) {
            return id;
        }
        let id = self.next_lookup_id(kind);
        self.table_mut(kind).insert(id, name.clone());
        id
    }

    fn event_name_taken(&self, name: &EntityName, except: Option<i64>) -> bool {
        self.events
            .iter()
            .any(|(id, event)| Some(*id) != except && &event.name == name)
    }

    fn fk(event: &StoredEvent, kind: LookupKind) -> i64 {
        match kind {
            LookupKind::Location => event.location_id,
            LookupKind::Category => event.category_id,
        }
    }

    fn materialize(&self, id: i64, stored: &StoredEvent) -> Result<Event, String> {
        let location = self
            .locations
            .get(&stored.location_id)
            .ok_or_else(|| format!("event {id}: dangling location {}", stored.location_id))?;
        let category = self
            .categories
            .get(&stored.category_id)
            .ok_or_else(|| format!("event {id}: dangling category {}", stored.category_id))?;
        Ok(Event {
            id: EventId::new(id),
            name: stored.name.clone(),
            location: location.clone(),
            category: category.clone(),
        })
    }

    fn write_event(&mut self, id: i64, draft: &EventDraft) {
        let location_id = self.find_or_create(LookupKind::Location, &draft.location);
        let category_id = self.find_or_create(LookupKind::Category, &draft.category);
        self.events.insert(
            id,
            StoredEvent {
                name: draft.name.clone(),
                location_id,
                category_id,
            },
        );
    }
}

fn window(page: PageRequest) -> (usize, usize) {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    (offset, limit)
}

fn to_total(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

const POISONED: &str = "in-memory store lock poisoned";

/// Shared in-memory store; clones observe the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn list(
        &self,
        query: &EventQuery,
        page: PageRequest,
    ) -> Result<Listing<Event>, EventRepositoryError> {
        let state = self.lock().map_err(EventRepositoryError::query)?;
        let mut matching = state
            .events
            .iter()
            .map(|(id, stored)| state.materialize(*id, stored))
            .collect::<Result<Vec<_>, _>>()
            .map_err(EventRepositoryError::query)?;
        matching.retain(|event| query.matches(event));
        matching.sort_by(|left, right| query.ordering.compare(left, right));

        let total = to_total(matching.len());
        let (offset, limit) = window(page);
        let items = matching.into_iter().skip(offset).take(limit).collect();
        Ok(Listing::new(total, items))
    }

    async fn find(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let state = self.lock().map_err(EventRepositoryError::query)?;
        state
            .events
            .get(&id.get())
            .map(|stored| state.materialize(id.get(), stored))
            .transpose()
            .map_err(EventRepositoryError::query)
    }

    async fn create(&self, draft: &EventDraft) -> Result<Event, EventRepositoryError> {
        let mut state = self.lock().map_err(EventRepositoryError::query)?;
        if state.event_name_taken(&draft.name, None) {
            return Err(EventRepositoryError::duplicate_name(draft.name.as_str()));
        }
        state.next_event_id += 1;
        let id = state.next_event_id;
        state.write_event(id, draft);
        Ok(draft.clone().into_event(EventId::new(id)))
    }

    async fn update(
        &self,
        id: EventId,
        draft: &EventDraft,
    ) -> Result<Option<Event>, EventRepositoryError> {
        let mut state = self.lock().map_err(EventRepositoryError::query)?;
        if !state.events.contains_key(&id.get()) {
            return Ok(None);
        }
        if state.event_name_taken(&draft.name, Some(id.get())) {
            return Err(EventRepositoryError::duplicate_name(draft.name.as_str()));
        }
        state.write_event(id.get(), draft);
        Ok(Some(draft.clone().into_event(id)))
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError> {
        let mut state = self.lock().map_err(EventRepositoryError::query)?;
        Ok(state.events.remove(&id.get()).is_some())
    }

    async fn seed_if_empty(
        &self,
        drafts: &[EventDraft],
    ) -> Result<SeedingResult, EventRepositoryError> {
        let mut state = self.lock().map_err(EventRepositoryError::query)?;
        if !state.events.is_empty() {
            return Ok(SeedingResult::AlreadySeeded);
        }
        let mut inserted = 0;
        for draft in drafts {
            if state.event_name_taken(&draft.name, None) {
                continue;
            }
            state.next_event_id += 1;
            let id = state.next_event_id;
            state.write_event(id, draft);
            inserted += 1;
        }
        Ok(SeedingResult::Applied { inserted })
    }
}

#[async_trait]
impl LookupRepository for InMemoryStore {
    async fn list(
        &self,
        kind: LookupKind,
        page: PageRequest,
    ) -> Result<Listing<LookupSummary>, LookupRepositoryError> {
        let state = self.lock().map_err(LookupRepositoryError::query)?;
        let table = state.table(kind);
        let (offset, limit) = window(page);
        let items = table
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(id, name)| {
                let count = state
                    .events
                    .values()
                    .filter(|event| State::fk(event, kind) == *id)
                    .count();
                LookupSummary::summarize(
                    Lookup {
                        id: LookupId::new(*id),
                        name: name.clone(),
                    },
                    to_total(count),
                )
            })
            .collect();
        Ok(Listing::new(to_total(table.len()), items))
    }

    async fn find(
        &self,
        kind: LookupKind,
        id: LookupId,
    ) -> Result<Option<LookupDetail>, LookupRepositoryError> {
        let state = self.lock().map_err(LookupRepositoryError::query)?;
        let Some(name) = state.table(kind).get(&id.get()) else {
            return Ok(None);
        };
        let events = state
            .events
            .iter()
            .filter(|(_, event)| State::fk(event, kind) == id.get())
            .map(|(event_id, stored)| state.materialize(*event_id, stored))
            .collect::<Result<Vec<_>, _>>()
            .map_err(LookupRepositoryError::query)?;
        Ok(Some(LookupDetail {
            lookup: Lookup {
                id,
                name: name.clone(),
            },
            events,
        }))
    }

    async fn create(
        &self,
        kind: LookupKind,
        name: &EntityName,
    ) -> Result<Lookup, LookupRepositoryError> {
        let mut state = self.lock().map_err(LookupRepositoryError::query)?;
        if state.lookup_id_by_name(kind, name).is_some() {
            return Err(LookupRepositoryError::duplicate_name(kind, name.as_str()));
        }
        let id = state.find_or_create(kind, name);
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
        let mut state = self.lock().map_err(LookupRepositoryError::query)?;
        if !state.table(kind).contains_key(&id.get()) {
            return Ok(None);
        }
        if state
            .lookup_id_by_name(kind, name)
            .is_some_and(|existing| existing != id.get())
        {
            return Err(LookupRepositoryError::duplicate_name(kind, name.as_str()));
        }
        state.table_mut(kind).insert(id.get(), name.clone());
        Ok(Some(Lookup {
            id,
            name: name.clone(),
        }))
    }

    async fn delete(&self, kind: LookupKind, id: LookupId) -> Result<bool, LookupRepositoryError> {
        let mut state = self.lock().map_err(LookupRepositoryError::query)?;
        if state.table_mut(kind).remove(&id.get()).is_none() {
            return Ok(false);
        }
        state
            .events
            .retain(|_, event| State::fk(event, kind) != id.get());
        Ok(true)
    }
}
