//! Location and category endpoints.
//!
//! ```text
//! GET    /location/            GET    /category/
//! POST   /location/            POST   /category/
//! GET    /location/{id}/       GET    /category/{id}/
//! PUT    /location/{id}/       PUT    /category/{id}/
//! DELETE /location/{id}/       DELETE /category/{id}/
//! ```
//!
//! Both kinds share one implementation; `lookup_endpoints!` stamps out the
//! per-kind handlers so each path is documented on its own.

use actix_web::{HttpRequest, HttpResponse, web};
use pagination::Paginated;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, LookupDetail, LookupId, LookupKind, LookupSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::resource_not_found;
use crate::inbound::http::events::EventBody;
use crate::inbound::http::links::Links;
use crate::inbound::http::paging::{page_request, paginate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{NAME, require_name};

/// List representation: related events collapsed to a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LookupListItem {
    pub url: String,
    #[schema(example = "London")]
    pub name: String,
    /// Number of events referring to this entry.
    #[serde(rename = "numEvents")]
    pub num_events: u64,
}

impl LookupListItem {
    fn from_summary(kind: LookupKind, summary: LookupSummary, links: &Links) -> Self {
        Self {
            url: links.lookup(kind, summary.id),
            name: summary.name.to_string(),
            num_events: summary.event_count,
        }
    }
}

/// Detail representation with every related event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LookupBody {
    pub url: String,
    #[schema(example = "London")]
    pub name: String,
    pub events: Vec<EventBody>,
}

impl LookupBody {
    fn from_detail(kind: LookupKind, detail: &LookupDetail, links: &Links) -> Self {
        Self {
            url: links.lookup(kind, detail.lookup.id),
            name: detail.lookup.name.to_string(),
            events: detail
                .events
                .iter()
                .map(|event| EventBody::from_event(event, links))
                .collect(),
        }
    }
}

/// Create and rename payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LookupPayload {
    #[schema(example = "London")]
    pub name: Option<String>,
}

/// Query parameters of lookup lists.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number.
    pub page: Option<String>,
}

pub(crate) async fn list_lookups(
    kind: LookupKind,
    state: web::Data<HttpState>,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<Paginated<LookupListItem>>> {
    let page = page_request(params.page.as_deref(), state.page_size)?;
    let listing = state.lookups.list(kind, page).await?;
    let links = Links::from_request(&req);
    let base = links.current(&req)?;
    let envelope = paginate(page, listing.total, listing.items, &base)?;
    Ok(web::Json(envelope.map(|summary| {
        LookupListItem::from_summary(kind, summary, &links)
    })))
}

pub(crate) async fn create_lookup(
    kind: LookupKind,
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<LookupPayload>,
) -> ApiResult<HttpResponse> {
    let name = require_name(payload.into_inner().name, NAME)?;
    let lookup = state.lookups.create(kind, &name).await?;
    let detail = LookupDetail {
        lookup,
        events: Vec::new(),
    };
    let links = Links::from_request(&req);
    Ok(HttpResponse::Created().json(LookupBody::from_detail(kind, &detail, &links)))
}

async fn load_detail(
    kind: LookupKind,
    state: &HttpState,
    id: LookupId,
) -> Result<LookupDetail, Error> {
    state
        .lookups
        .find(kind, id)
        .await?
        .ok_or_else(resource_not_found)
}

pub(crate) async fn get_lookup(
    kind: LookupKind,
    state: web::Data<HttpState>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> ApiResult<web::Json<LookupBody>> {
    let detail = load_detail(kind, &state, LookupId::new(id.into_inner())).await?;
    let links = Links::from_request(&req);
    Ok(web::Json(LookupBody::from_detail(kind, &detail, &links)))
}

pub(crate) async fn rename_lookup(
    kind: LookupKind,
    state: web::Data<HttpState>,
    req: HttpRequest,
    id: web::Path<i64>,
    payload: web::Json<LookupPayload>,
) -> ApiResult<web::Json<LookupBody>> {
    let name = require_name(payload.into_inner().name, NAME)?;
    let id = LookupId::new(id.into_inner());
    state
        .lookups
        .rename(kind, id, &name)
        .await?
        .ok_or_else(resource_not_found)?;
    let detail = load_detail(kind, &state, id).await?;
    let links = Links::from_request(&req);
    Ok(web::Json(LookupBody::from_detail(kind, &detail, &links)))
}

pub(crate) async fn delete_lookup(
    kind: LookupKind,
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    if state
        .lookups
        .delete(kind, LookupId::new(id.into_inner()))
        .await?
    {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(resource_not_found())
    }
}

/// Generate the documented handlers for one lookup kind.
macro_rules! lookup_endpoints {
    (
        $module:ident,
        kind = $kind:expr,
        tag = $tag:tt,
        collection = $collection:tt,
        item = $item:tt,
        ops = [$list_op:tt, $create_op:tt, $get_op:tt, $rename_op:tt, $delete_op:tt] $(,)?
    ) => {
        pub mod $module {
            //! Handlers bound to one lookup kind.

            use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
            use pagination::Paginated;

            use super::{LookupBody, LookupListItem, LookupPayload, PageParams};
            use crate::domain::Error;
            use crate::inbound::http::ApiResult;
            use crate::inbound::http::state::HttpState;

            /// List entries with their event counts.
            #[utoipa::path(
                get,
                path = $collection,
                params(PageParams),
                responses(
                    (status = 200, description = "Page of entries", body = crate::inbound::http::schemas::LookupPageSchema),
                    (status = 404, description = "Invalid page", body = Error)
                ),
                tags = [$tag],
                operation_id = $list_op,
                security([])
            )]
            #[get("/")]
            pub async fn list(
                state: web::Data<HttpState>,
                req: HttpRequest,
                params: web::Query<PageParams>,
            ) -> ApiResult<web::Json<Paginated<LookupListItem>>> {
                super::list_lookups($kind, state, req, params).await
            }

            /// Create an entry.
            #[utoipa::path(
                post,
                path = $collection,
                request_body = LookupPayload,
                responses(
                    (status = 201, description = "Created", body = LookupBody),
                    (status = 400, description = "Invalid payload or duplicate name", body = Error),
                    (status = 403, description = "Not authenticated", body = Error)
                ),
                tags = [$tag],
                operation_id = $create_op
            )]
            #[post("/")]
            pub async fn create(
                state: web::Data<HttpState>,
                req: HttpRequest,
                payload: web::Json<LookupPayload>,
            ) -> ApiResult<HttpResponse> {
                super::create_lookup($kind, state, req, payload).await
            }

            /// Fetch an entry with all of its events.
            #[utoipa::path(
                get,
                path = $item,
                params(("id" = i64, Path, description = "Entry id")),
                responses(
                    (status = 200, description = "Entry", body = LookupBody),
                    (status = 404, description = "Unknown id", body = Error)
                ),
                tags = [$tag],
                operation_id = $get_op,
                security([])
            )]
            #[get("/{id}/")]
            pub async fn detail(
                state: web::Data<HttpState>,
                req: HttpRequest,
                id: web::Path<i64>,
            ) -> ApiResult<web::Json<LookupBody>> {
                super::get_lookup($kind, state, req, id).await
            }

            /// Rename an entry.
            #[utoipa::path(
                put,
                path = $item,
                params(("id" = i64, Path, description = "Entry id")),
                request_body = LookupPayload,
                responses(
                    (status = 200, description = "Renamed", body = LookupBody),
                    (status = 400, description = "Invalid payload or duplicate name", body = Error),
                    (status = 403, description = "Not authenticated", body = Error),
                    (status = 404, description = "Unknown id", body = Error)
                ),
                tags = [$tag],
                operation_id = $rename_op
            )]
            #[put("/{id}/")]
            pub async fn rename(
                state: web::Data<HttpState>,
                req: HttpRequest,
                id: web::Path<i64>,
                payload: web::Json<LookupPayload>,
            ) -> ApiResult<web::Json<LookupBody>> {
                super::rename_lookup($kind, state, req, id, payload).await
            }

            /// Delete an entry and, by cascade, its events.
            #[utoipa::path(
                delete,
                path = $item,
                params(("id" = i64, Path, description = "Entry id")),
                responses(
                    (status = 204, description = "Deleted"),
                    (status = 403, description = "Not authenticated", body = Error),
                    (status = 404, description = "Unknown id", body = Error)
                ),
                tags = [$tag],
                operation_id = $delete_op
            )]
            #[delete("/{id}/")]
            pub async fn remove(
                state: web::Data<HttpState>,
                id: web::Path<i64>,
            ) -> ApiResult<HttpResponse> {
                super::delete_lookup($kind, state, id).await
            }
        }
    };
}

lookup_endpoints!(
    locations,
    kind = crate::domain::LookupKind::Location,
    tag = "locations",
    collection = "/location/",
    item = "/location/{id}/",
    ops = ["listLocations", "createLocation", "getLocation", "renameLocation", "deleteLocation"],
);

lookup_endpoints!(
    categories,
    kind = crate::domain::LookupKind::Category,
    tag = "categories",
    collection = "/category/",
    item = "/category/{id}/",
    ops = ["listCategories", "createCategory", "getCategory", "renameCategory", "deleteCategory"],
);
