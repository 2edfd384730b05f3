//! API root listing the collection endpoints.

use actix_web::{HttpRequest, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::LookupKind;
use crate::inbound::http::links::{EVENTS_SEGMENT, Links};

/// Absolute links to each collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiRoot {
    #[schema(example = "http://localhost:8080/event/")]
    pub events: String,
    #[schema(example = "http://localhost:8080/location/")]
    pub locations: String,
    #[schema(example = "http://localhost:8080/category/")]
    pub categories: String,
}

impl ApiRoot {
    pub(crate) fn new(links: &Links) -> Self {
        Self {
            events: links.collection(EVENTS_SEGMENT),
            locations: links.collection(LookupKind::Location.label()),
            categories: links.collection(LookupKind::Category.label()),
        }
    }
}

/// Link map of the API.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Collection links", body = ApiRoot)),
    tags = ["root"],
    operation_id = "apiRoot",
    security([])
)]
#[get("/")]
pub async fn api_root(req: HttpRequest) -> web::Json<ApiRoot> {
    web::Json(ApiRoot::new(&Links::from_request(&req)))
}
