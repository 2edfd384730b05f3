//! Event endpoints.
//!
//! ```text
//! GET    /event/?order_by=&location=&category=&page=
//! POST   /event/
//! GET    /event/{id}/
//! PUT    /event/{id}/
//! DELETE /event/{id}/
//! ```
//!
//! The list view reduces each event to `url, eventID, name, category`; the
//! detail view always carries the location too.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use pagination::Paginated;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Event, EventDraft, EventId, EventOrdering, EventQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::resource_not_found;
use crate::inbound::http::links::Links;
use crate::inbound::http::paging::{page_request, paginate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    CATEGORY, LOCATION, NAME, field_errors, invalid_order_field_error, require_name,
};

/// Full event representation used by detail, create, and update responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventBody {
    /// Surrogate key.
    #[serde(rename = "eventID")]
    pub event_id: i64,
    /// Absolute detail URL.
    pub url: String,
    #[schema(example = "Yoga")]
    pub name: String,
    /// Category name.
    #[schema(example = "sports")]
    pub category: String,
    /// Location name.
    #[schema(example = "Leeds")]
    pub location: String,
}

impl EventBody {
    pub(crate) fn from_event(event: &Event, links: &Links) -> Self {
        Self {
            event_id: event.id.get(),
            url: links.event(event.id),
            name: event.name.to_string(),
            category: event.category.to_string(),
            location: event.location.to_string(),
        }
    }
}

/// Reduced list representation. Field order is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventListItem {
    pub url: String,
    #[serde(rename = "eventID")]
    pub event_id: i64,
    pub name: String,
    pub category: String,
}

impl From<EventBody> for EventListItem {
    fn from(body: EventBody) -> Self {
        Self {
            url: body.url,
            event_id: body.event_id,
            name: body.name,
            category: body.category,
        }
    }
}

/// Create and update payload. Location and category are names; unknown
/// names are created on the fly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EventPayload {
    #[schema(example = "Yoga")]
    pub name: Option<String>,
    #[schema(example = "Leeds")]
    pub location: Option<String>,
    #[schema(example = "sports")]
    pub category: Option<String>,
}

impl TryFrom<EventPayload> for EventDraft {
    type Error = Error;

    fn try_from(payload: EventPayload) -> Result<Self, Self::Error> {
        let name = require_name(payload.name, NAME);
        let location = require_name(payload.location, LOCATION);
        let category = require_name(payload.category, CATEGORY);
        match (name, location, category) {
            (Ok(name), Ok(location), Ok(category)) => {
                Ok(EventDraft::new(name, location, category))
            }
            (name, location, category) => Err(field_errors(
                [name.err(), location.err(), category.err()]
                    .into_iter()
                    .flatten(),
            )),
        }
    }
}

/// Query parameters of the event list. A blank `order_by` means the default
/// ordering; filters match their value exactly, even when empty.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventListParams {
    /// `id`, `eventID`, `name`, `location` or `category`, optionally
    /// prefixed with `-` for descending order.
    pub order_by: Option<String>,
    /// Exact location name.
    pub location: Option<String>,
    /// Exact category name.
    pub category: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

impl EventListParams {
    pub(crate) fn to_query(&self) -> Result<EventQuery, Error> {
        let ordering = match present(self.order_by.as_deref()) {
            None => EventOrdering::default(),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| invalid_order_field_error(raw))?,
        };
        Ok(EventQuery {
            ordering,
            location: self.location.clone(),
            category: self.category.clone(),
        })
    }
}

/// List events, filtered, ordered and paginated.
#[utoipa::path(
    get,
    path = "/event/",
    params(EventListParams),
    responses(
        (status = 200, description = "Page of events", body = crate::inbound::http::schemas::EventPageSchema),
        (status = 400, description = "Invalid ordering", body = Error),
        (status = 404, description = "Invalid page", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["events"],
    operation_id = "listEvents",
    security([])
)]
#[get("/")]
pub async fn list_events(
    state: web::Data<HttpState>,
    req: HttpRequest,
    params: web::Query<EventListParams>,
) -> ApiResult<web::Json<Paginated<EventListItem>>> {
    let params = params.into_inner();
    let query = params.to_query()?;
    let page = page_request(params.page.as_deref(), state.page_size)?;
    let listing = state.events.list(&query, page).await?;

    let links = Links::from_request(&req);
    let base = links.current(&req)?;
    let envelope = paginate(page, listing.total, listing.items, &base)?;
    Ok(web::Json(envelope.map(|event| {
        EventListItem::from(EventBody::from_event(&event, &links))
    })))
}

/// Create an event.
#[utoipa::path(
    post,
    path = "/event/",
    request_body = EventPayload,
    responses(
        (status = 201, description = "Created", body = EventBody),
        (status = 400, description = "Invalid payload or duplicate name", body = Error),
        (status = 403, description = "Not authenticated", body = Error)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/")]
pub async fn create_event(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<EventPayload>,
) -> ApiResult<HttpResponse> {
    let draft = EventDraft::try_from(payload.into_inner())?;
    let event = state.events.create(&draft).await?;
    let links = Links::from_request(&req);
    Ok(HttpResponse::Created().json(EventBody::from_event(&event, &links)))
}

/// Fetch one event.
#[utoipa::path(
    get,
    path = "/event/{id}/",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = EventBody),
        (status = 404, description = "Unknown id", body = Error)
    ),
    tags = ["events"],
    operation_id = "getEvent",
    security([])
)]
#[get("/{id}/")]
pub async fn get_event(
    state: web::Data<HttpState>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> ApiResult<web::Json<EventBody>> {
    let event = state
        .events
        .find(EventId::new(id.into_inner()))
        .await?
        .ok_or_else(resource_not_found)?;
    Ok(web::Json(EventBody::from_event(&event, &Links::from_request(&req))))
}

/// Replace an event's name, location and category.
#[utoipa::path(
    put,
    path = "/event/{id}/",
    params(("id" = i64, Path, description = "Event id")),
    request_body = EventPayload,
    responses(
        (status = 200, description = "Updated", body = EventBody),
        (status = 400, description = "Invalid payload or duplicate name", body = Error),
        (status = 403, description = "Not authenticated", body = Error),
        (status = 404, description = "Unknown id", body = Error)
    ),
    tags = ["events"],
    operation_id = "updateEvent"
)]
#[put("/{id}/")]
pub async fn update_event(
    state: web::Data<HttpState>,
    req: HttpRequest,
    id: web::Path<i64>,
    payload: web::Json<EventPayload>,
) -> ApiResult<web::Json<EventBody>> {
    let draft = EventDraft::try_from(payload.into_inner())?;
    let event = state
        .events
        .update(EventId::new(id.into_inner()), &draft)
        .await?
        .ok_or_else(resource_not_found)?;
    Ok(web::Json(EventBody::from_event(&event, &Links::from_request(&req))))
}

/// Delete an event.
#[utoipa::path(
    delete,
    path = "/event/{id}/",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not authenticated", body = Error),
        (status = 404, description = "Unknown id", body = Error)
    ),
    tags = ["events"],
    operation_id = "deleteEvent"
)]
#[delete("/{id}/")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    if state.events.delete(EventId::new(id.into_inner())).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(resource_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityName, OrderField, SortDirection};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn params(order_by: Option<&str>, location: Option<&str>) -> EventListParams {
        EventListParams {
            order_by: order_by.map(str::to_owned),
            location: location.map(str::to_owned),
            ..EventListParams::default()
        }
    }

    #[rstest]
    #[case(None, OrderField::Id, SortDirection::Ascending)]
    #[case(Some(""), OrderField::Id, SortDirection::Ascending)]
    #[case(Some("category"), OrderField::Category, SortDirection::Ascending)]
    #[case(Some("-location"), OrderField::Location, SortDirection::Descending)]
    #[case(Some("eventID"), OrderField::Id, SortDirection::Ascending)]
    fn order_by_is_parsed(
        #[case] raw: Option<&str>,
        #[case] field: OrderField,
        #[case] direction: SortDirection,
    ) {
        let query = params(raw, None).to_query().expect("valid query");
        assert_eq!(query.ordering.field, field);
        assert_eq!(query.ordering.direction, direction);
    }

    #[rstest]
    fn unknown_order_field_is_a_validation_error() {
        let err = params(Some("price"), None).to_query().expect_err("invalid");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "order_by", "value": "price", "code": "invalid_order_field" }))
        );
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), Some(""))]
    #[case(Some("Leeds "), Some("Leeds "))]
    fn filters_are_kept_verbatim_when_present(
        #[case] raw: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let query = params(None, raw).to_query().expect("query");
        assert_eq!(query.location.as_deref(), expected);
    }

    #[rstest]
    fn list_items_serialise_four_fields_in_order() {
        let event = Event {
            id: EventId::new(3),
            name: EntityName::new("Yoga").expect("name"),
            location: EntityName::new("Leeds").expect("name"),
            category: EntityName::new("sports").expect("name"),
        };
        let links = Links::with_origin("http://host");
        let item = EventListItem::from(EventBody::from_event(&event, &links));
        let text = serde_json::to_string(&item).expect("serialise");
        assert_eq!(
            text,
            r#"{"url":"http://host/event/3/","eventID":3,"name":"Yoga","category":"sports"}"#
        );
        let value: Value = serde_json::from_str(&text).expect("json");
        assert!(value.get("location").is_none());
    }

    #[rstest]
    #[case(EventPayload { name: None, location: Some("Leeds".into()), category: Some("sports".into()) }, "name", "missing_field")]
    #[case(EventPayload { name: Some("Yoga".into()), location: Some(" ".into()), category: Some("sports".into()) }, "location", "blank")]
    #[case(EventPayload { name: Some("Yoga".into()), location: Some("Leeds".into()), category: None }, "category", "missing_field")]
    fn invalid_payloads_name_the_field(
        #[case] payload: EventPayload,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = EventDraft::try_from(payload).expect_err("invalid payload");
        assert_eq!(err.details(), Some(&json!({ "field": field, "code": code })));
    }

    #[rstest]
    fn every_invalid_field_is_reported() {
        let payload = EventPayload {
            name: Some(" ".into()),
            location: None,
            category: None,
        };
        let err = EventDraft::try_from(payload).expect_err("invalid payload");
        let fields = err
            .details()
            .and_then(|details| details.get("fields"))
            .and_then(Value::as_array)
            .expect("field list");
        let names: Vec<_> = fields.iter().filter_map(|f| f["field"].as_str()).collect();
        assert_eq!(names, ["name", "location", "category"]);
    }
}
