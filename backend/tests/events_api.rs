//! HTTP behaviour of the event collection over the in-memory store.

// Each suite uses a different subset of the shared helpers.
#[allow(dead_code, reason = "helpers are shared across integration suites")]
mod support;

use actix_web::http::Method;
use events_backend::domain::TRACE_ID_HEADER;
use events_backend::outbound::memory::InMemoryStore;
use rstest::rstest;
use serde_json::{Value, json};

use support::{events_app, login, request, seeded_store, send, session_settings, state_for, url};

fn names(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|item| item["name"].as_str().expect("name").to_owned())
        .collect()
}

#[actix_web::test]
async fn root_links_every_collection() {
    let session = session_settings();
    let app = events_app!(state_for(&InMemoryStore::new(), 10), session);

    let (status, body) = send(&app, request(Method::GET, "/").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "events": url("/event/"),
            "locations": url("/location/"),
            "categories": url("/category/"),
        })
    );
}

#[actix_web::test]
async fn empty_collection_lists_an_empty_first_page() {
    let session = session_settings();
    let app = events_app!(state_for(&InMemoryStore::new(), 10), session);

    let (status, body) = send(&app, request(Method::GET, "/event/").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "count": 0, "next": null, "previous": null, "results": [] })
    );
}

#[actix_web::test]
async fn list_items_carry_exactly_four_fields() {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);

    let (status, body) = send(&app, request(Method::GET, "/event/").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 10);
    assert_eq!(
        body["results"][0],
        json!({
            "url": url("/event/1/"),
            "eventID": 1,
            "name": "John's Pottery Class",
            "category": "arts and craft",
        })
    );
}

#[rstest]
#[case("/event/?location=London", 4)]
#[case("/event/?location=london", 0)]
#[case("/event/?category=sports", 4)]
#[case("/event/?location=London&category=sports", 2)]
#[case("/event/?location=Bristol&category=sports", 0)]
#[case("/event/?location=", 0)]
#[case("/event/?category=%20", 0)]
#[actix_web::test]
async fn filters_match_names_exactly(#[case] uri: &str, #[case] expected: u64) {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);

    let (status, body) = send(&app, request(Method::GET, uri).to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], expected);
}

#[rstest]
#[case("name", "Advanced Portrait Painting", "¿Cómo estás?: Introduction to Spanish")]
#[case("-name", "¿Cómo estás?: Introduction to Spanish", "Advanced Portrait Painting")]
#[case("-eventID", "Advanced Portrait Painting", "John's Pottery Class")]
#[actix_web::test]
async fn order_by_sorts_the_whole_collection(
    #[case] order_by: &str,
    #[case] first: &str,
    #[case] last: &str,
) {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);

    let uri = format!("/event/?order_by={order_by}");
    let (status, body) = send(&app, request(Method::GET, &uri).to_request()).await;
    assert_eq!(status, 200);
    let names = names(&body);
    assert_eq!(names.first().map(String::as_str), Some(first));
    assert_eq!(names.last().map(String::as_str), Some(last));
}

// Locations sort Birmingham, Bristol, London, Manchester; categories sort arts and craft, language, sports.
#[rstest]
#[case("location", &[4, 7, 8, 9, 10, 1, 2, 3, 5, 6])]
#[case("category", &[1, 4, 10, 3, 8, 9, 2, 5, 6, 7])]
#[actix_web::test]
async fn ordering_by_lookup_name_breaks_ties_by_id(#[case] order_by: &str, #[case] expected: &[i64]) {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);

    let uri = format!("/event/?order_by={order_by}");
    let (_, body) = send(&app, request(Method::GET, &uri).to_request()).await;
    let ids: Vec<i64> = body["results"]
        .as_array()
        .expect("results")
        .iter()
        .map(|item| item["eventID"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, expected);
}

#[actix_web::test]
async fn unknown_order_field_is_rejected() {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);

    let (status, body) = send(&app, request(Method::GET, "/event/?order_by=price").to_request()).await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "invalid_order_field");
    assert_eq!(body["details"]["value"], "price");
}

#[actix_web::test]
async fn pages_link_to_their_neighbours() {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 3), session);

    let (status, body) = send(&app, request(Method::GET, "/event/?page=2").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 10);
    assert_eq!(body["next"], url("/event/?page=3"));
    assert_eq!(body["previous"], url("/event/"));
    assert_eq!(body["results"].as_array().map(Vec::len), Some(3));

    let (_, last) = send(&app, request(Method::GET, "/event/?page=4").to_request()).await;
    assert_eq!(last["next"], Value::Null);
    assert_eq!(last["previous"], url("/event/?page=3"));
    assert_eq!(last["results"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn page_links_keep_the_filters() {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 3), session);

    let (_, first) = send(&app, request(Method::GET, "/event/?location=London").to_request()).await;
    assert_eq!(first["next"], url("/event/?location=London&page=2"));

    let (_, second) = send(
        &app,
        request(Method::GET, "/event/?location=London&page=2").to_request(),
    )
    .await;
    assert_eq!(second["previous"], url("/event/?location=London"));
    assert_eq!(second["next"], Value::Null);
}

#[rstest]
#[case("0")]
#[case("5")]
#[case("two")]
#[actix_web::test]
async fn invalid_pages_are_not_found(#[case] page: &str) {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 3), session);

    let uri = format!("/event/?page={page}");
    let (status, body) = send(&app, request(Method::GET, &uri).to_request()).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Invalid page.");
}

#[actix_web::test]
async fn detail_includes_the_location() {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);

    let (status, body) = send(&app, request(Method::GET, "/event/6/").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "eventID": 6,
            "url": url("/event/6/"),
            "name": "Archery: Ages 8-12",
            "category": "sports",
            "location": "Manchester",
        })
    );
}

#[rstest]
#[case("/event/99/")]
#[case("/event/abc/")]
#[actix_web::test]
async fn unknown_events_are_not_found(#[case] uri: &str) {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);

    let (status, body) = send(&app, request(Method::GET, uri).to_request()).await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn create_resolves_new_and_existing_names() {
    let store = seeded_store().await;
    let session = session_settings();
    let app = events_app!(state_for(&store, 10), session);
    let cookie = login(&app).await;

    let (status, body) = send(
        &app,
        request(Method::POST, "/event/")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Yoga", "location": "Leeds", "category": "sports" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["eventID"], 11);
    assert_eq!(body["url"], url("/event/11/"));
    assert_eq!(body["location"], "Leeds");

    let (_, leeds) = send(&app, request(Method::GET, "/location/5/").to_request()).await;
    assert_eq!(leeds["name"], "Leeds");
    assert_eq!(leeds["events"][0]["name"], "Yoga");

    let (_, sports) = send(&app, request(Method::GET, "/category/?page=1").to_request()).await;
    assert_eq!(sports["count"], 3, "no duplicate category is created");
}

#[rstest]
#[case(json!({ "location": "Leeds", "category": "sports" }), "name", "missing_field")]
#[case(json!({ "name": "Yoga", "location": "   ", "category": "sports" }), "location", "blank")]
#[case(json!({ "name": "Yoga", "location": "Leeds" }), "category", "missing_field")]
#[actix_web::test]
async fn invalid_payloads_name_the_offending_field(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let session = session_settings();
    let app = events_app!(state_for(&InMemoryStore::new(), 10), session);
    let cookie = login(&app).await;

    let (status, body) = send(
        &app,
        request(Method::POST, "/event/")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["details"], json!({ "field": field, "code": code }));
}

#[actix_web::test]
async fn empty_payload_reports_every_field() {
    let session = session_settings();
    let app = events_app!(state_for(&InMemoryStore::new(), 10), session);
    let cookie = login(&app).await;

    let (status, body) = send(
        &app,
        request(Method::POST, "/event/")
            .cookie(cookie)
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["details"]["field"], "name");
    assert_eq!(
        body["details"]["fields"],
        json!([
            { "field": "name", "code": "missing_field" },
            { "field": "location", "code": "missing_field" },
            { "field": "category", "code": "missing_field" },
        ])
    );
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let session = session_settings();
    let app = events_app!(state_for(&InMemoryStore::new(), 10), session);
    let cookie = login(&app).await;

    let (status, body) = send(
        &app,
        request(Method::POST, "/event/")
            .cookie(cookie)
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["details"]["code"], "invalid_body");
}

#[actix_web::test]
async fn duplicate_event_names_are_rejected() {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);
    let cookie = login(&app).await;

    let (status, body) = send(
        &app,
        request(Method::POST, "/event/")
            .cookie(cookie)
            .set_json(json!({
                "name": "French for Toddlers",
                "location": "Leeds",
                "category": "language",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["details"]["code"], "not_unique");
}

#[actix_web::test]
async fn update_replaces_every_field() {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);
    let cookie = login(&app).await;

    let (status, body) = send(
        &app,
        request(Method::PUT, "/event/3/")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "French for Tots", "location": "Paris", "category": "language" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["eventID"], 3);
    assert_eq!(body["location"], "Paris");

    let (_, detail) = send(&app, request(Method::GET, "/event/3/").to_request()).await;
    assert_eq!(detail["name"], "French for Tots");

    let (status, _) = send(
        &app,
        request(Method::PUT, "/event/99/")
            .cookie(cookie)
            .set_json(json!({ "name": "Ghost", "location": "Paris", "category": "language" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_web::test]
async fn delete_removes_the_event_once() {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);
    let cookie = login(&app).await;

    let (status, body) = send(
        &app,
        request(Method::DELETE, "/event/1/").cookie(cookie.clone()).to_request(),
    )
    .await;
    assert_eq!(status, 204);
    assert_eq!(body, Value::Null);

    let (status, _) = send(
        &app,
        request(Method::DELETE, "/event/1/").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(status, 404);

    let (_, list) = send(&app, request(Method::GET, "/event/").to_request()).await;
    assert_eq!(list["count"], 9);
}

#[actix_web::test]
async fn responses_carry_a_trace_id() {
    let session = session_settings();
    let app = events_app!(state_for(&InMemoryStore::new(), 10), session);

    let res = actix_web::test::call_service(&app, request(Method::GET, "/event/42/").to_request()).await;
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = actix_web::test::read_body_json(res).await;
    assert_eq!(body["traceId"], header);
}

async fn collections<S, B>(app: &S) -> Vec<Value>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let mut bodies = Vec::new();
    for uri in ["/event/", "/location/", "/category/"] {
        let (_, body) = send(app, request(Method::GET, uri).to_request()).await;
        bodies.push(body);
    }
    bodies
}

#[rstest]
#[case(Method::POST, "/event/")]
#[case(Method::PUT, "/event/1/")]
#[case(Method::DELETE, "/event/1/")]
#[case(Method::POST, "/location/")]
#[case(Method::PUT, "/location/1/")]
#[case(Method::DELETE, "/location/1/")]
#[case(Method::POST, "/category/")]
#[case(Method::PUT, "/category/1/")]
#[case(Method::DELETE, "/category/1/")]
#[actix_web::test]
async fn anonymous_writes_are_forbidden_and_change_nothing(
    #[case] method: Method,
    #[case] uri: &str,
) {
    let session = session_settings();
    let app = events_app!(state_for(&seeded_store().await, 10), session);
    let before = collections(&app).await;

    let (status, body) = send(
        &app,
        request(method, uri)
            .set_json(json!({ "name": "Yoga", "location": "Leeds", "category": "sports" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(body["code"], "forbidden");

    assert_eq!(collections(&app).await, before);
}
