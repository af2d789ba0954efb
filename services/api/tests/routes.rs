use api_lib::{
    adapters::{InMemoryStore, TemplateMessageAdapter},
    config::Config,
    web::{router, AppState},
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    router(Arc::new(AppState {
        db: Arc::new(InMemoryStore::new()),
        config: Arc::new(Config::default()),
        suggestions: Arc::new(TemplateMessageAdapter),
    }))
}

async fn send(app: &Router, user: Option<Uuid>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header("x-user-id", user.to_string());
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, json)
}

fn address_book() -> Value {
    json!({
        "contacts": [
            { "id": "1", "name": "Mom", "phoneNumbers": ["555-0101"] },
            { "id": "2", "name": "Bob Smith Enterprises Spam", "phoneNumbers": ["555-0102"] },
            { "id": "3", "name": "Office Line", "phoneNumbers": ["555-0103"] },
            { "id": "4", "name": "Jane Doe", "phoneNumbers": ["555-0104"] },
            { "id": "5", "name": "Aunt Carol" },
            { "id": "6", "name": "Pallavi", "phoneNumbers": ["555-0106"] },
            { "id": "7", "phoneNumbers": ["555-0107"] }
        ]
    })
}

async fn imported(app: &Router, user: Uuid) {
    let (status, body) = send(app, Some(user), "POST", "/contacts/import", Some(address_book())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total": 7, "kept": 4 }));
}

#[tokio::test]
async fn health_needs_no_identity() {
    let (status, body) = send(&app(), None, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_or_invalid_identity_is_unauthorized() {
    let app = app();
    let (status, _) = send(&app, None, "GET", "/contacts", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/contacts")
        .header("x-user-id", "not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn import_filters_and_classifies() {
    let app = app();
    let user = Uuid::new_v4();
    imported(&app, user).await;

    let (status, body) = send(&app, Some(user), "GET", "/contacts", None).await;
    assert_eq!(status, StatusCode::OK);
    let contacts = body["contacts"].as_array().unwrap();
    let summary: Vec<(&str, &str, &str)> = contacts
        .iter()
        .map(|c| {
            (
                c["id"].as_str().unwrap(),
                c["relationship"].as_str().unwrap(),
                c["group"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        [
            ("1", "Mother", "Family"),
            ("3", "Work", "Work"),
            ("4", "Contact", "Contacts"),
            ("5", "Aunt", "Family"),
        ]
    );
}

#[tokio::test]
async fn reimporting_a_duplicated_id_stores_the_first_entry() {
    let app = app();
    let user = Uuid::new_v4();
    let book = json!({ "contacts": [
        { "id": "1", "name": "Mom", "phoneNumbers": ["555-0100"] },
        { "id": "1", "name": "Dad", "phoneNumbers": ["555-0101"] },
        { "id": "2", "name": "Sister", "phoneNumbers": ["555-0102"] },
    ]});
    for _ in 0..2 {
        let (status, body) = send(&app, Some(user), "POST", "/contacts/import", Some(book.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["kept"], 2);
    }

    let (_, body) = send(&app, Some(user), "GET", "/contacts", None).await;
    let names: Vec<&str> = body["contacts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Mom", "Sister"]);
}

#[tokio::test]
async fn contacts_are_private_to_each_user() {
    let app = app();
    imported(&app, Uuid::new_v4()).await;

    let (status, body) = send(&app, Some(Uuid::new_v4()), "GET", "/contacts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["contacts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn logging_an_interaction_moves_a_contact_down_the_view() {
    let app = app();
    let user = Uuid::new_v4();
    imported(&app, user).await;

    let (status, body) = send(&app, Some(user), "GET", "/contacts/view", None).await;
    assert_eq!(status, StatusCode::OK);
    let family: Vec<&str> = body["groups"]["Family"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(family, ["1", "5"], "never-contacted ties keep import order");
    assert_eq!(body["groups"]["Family"][0]["urgency"], "none");

    let (status, body) = send(
        &app,
        Some(user),
        "POST",
        "/contacts/1/interactions",
        Some(json!({ "type": "call", "note": "  Talked about the garden  " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["interaction"]["type"], "call");
    assert_eq!(body["interaction"]["note"], "Talked about the garden");

    let (_, body) = send(&app, Some(user), "GET", "/contacts/view", None).await;
    let family = body["groups"]["Family"].as_array().unwrap();
    assert_eq!(family[0]["id"], "5");
    assert_eq!(family[1]["id"], "1");
    assert_eq!(family[1]["daysSinceContact"], 0);
    assert_eq!(family[1]["urgency"], "recent");
    assert_eq!(family[1]["lastInteractionType"], "call");
    assert_eq!(family[1]["lastInteractionLabel"], "Phone Call");
    assert_eq!(family[1]["groupColor"], "#ff6b6b");
    assert_eq!(body["groups"]["Work"][0]["groupColor"], "#4ecdc4");
}

#[tokio::test]
async fn interaction_validation() {
    let app = app();
    let user = Uuid::new_v4();
    imported(&app, user).await;

    let long_note = "x".repeat(101);
    let (status, _) = send(
        &app,
        Some(user),
        "POST",
        "/contacts/1/interactions",
        Some(json!({ "type": "text", "note": long_note })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Some(user),
        "POST",
        "/contacts/unknown/interactions",
        Some(json!({ "type": "text" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Some(user), "GET", "/interactions", None).await;
    assert!(body["interactions"].as_array().unwrap().is_empty(), "rejected entries are not logged");
}

#[tokio::test]
async fn interactions_keep_logging_order() {
    let app = app();
    let user = Uuid::new_v4();
    imported(&app, user).await;

    for (contact, kind) in [("1", "call"), ("3", "text"), ("1", "video-call")] {
        let uri = format!("/contacts/{contact}/interactions");
        let (status, _) = send(&app, Some(user), "POST", &uri, Some(json!({ "type": kind }))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, Some(user), "GET", "/interactions", None).await;
    let kinds: Vec<&str> = body["interactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["call", "text", "video-call"]);

    let (_, body) = send(&app, Some(user), "GET", "/interactions?contactId=1", None).await;
    assert_eq!(body["interactions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn goals_lifecycle() {
    let app = app();
    let user = Uuid::new_v4();
    imported(&app, user).await;

    let (status, _) = send(
        &app,
        Some(user),
        "POST",
        "/goals",
        Some(json!({ "contactId": "1", "frequency": "hourly" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Some(user),
        "POST",
        "/goals",
        Some(json!({ "contactId": "1", "frequency": "weekly", "method": "call" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let goal_id = body["goal"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["goal"]["contactName"], "Mom");
    assert_eq!(body["goal"]["frequencyLabel"], "Weekly");
    assert_eq!(body["goal"]["status"]["status"], "no-contact-yet");
    assert_eq!(body["goal"]["isDue"], true);

    let (_, body) = send(&app, Some(user), "GET", "/goals/due", None).await;
    assert_eq!(body["goals"].as_array().unwrap().len(), 1);

    send(&app, Some(user), "POST", "/contacts/1/interactions", Some(json!({ "type": "call" }))).await;
    let (_, body) = send(&app, Some(user), "GET", "/goals", None).await;
    assert_eq!(body["goals"][0]["status"]["status"], "on-track");
    assert_eq!(body["goals"][0]["statusText"], "Due in 7 days");
    let (_, body) = send(&app, Some(user), "GET", "/goals/due", None).await;
    assert!(body["goals"].as_array().unwrap().is_empty());

    let toggle = format!("/goals/{goal_id}/toggle");
    let (status, body) = send(&app, Some(user), "POST", &toggle, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"]["isActive"], false);
    assert_eq!(body["goal"]["status"]["status"], "inactive");
    let (_, body) = send(&app, Some(user), "POST", &toggle, None).await;
    assert_eq!(body["goal"]["isActive"], true);
    let (_, body) = send(&app, Some(user), "GET", "/goals", None).await;
    assert_eq!(body["goals"][0]["isActive"], true);
    let unknown = format!("/goals/{}/toggle", Uuid::new_v4());
    let (status, _) = send(&app, Some(user), "POST", &unknown, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let delete = format!("/goals/{goal_id}");
    let (status, _) = send(&app, Some(user), "DELETE", &delete, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Some(user), "DELETE", &delete, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn events_lifecycle() {
    let app = app();
    let user = Uuid::new_v4();
    imported(&app, user).await;

    let (status, _) = send(
        &app,
        Some(user),
        "POST",
        "/events",
        Some(json!({ "contactId": "1", "type": "birthday", "date": "02/30" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Some(user),
        "POST",
        "/events",
        Some(json!({ "contactId": "1", "type": "custom", "date": "01/15" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "custom events need a title");

    let (status, body) = send(
        &app,
        Some(user),
        "POST",
        "/events",
        Some(json!({ "contactId": "1", "type": "birthday", "date": "07/04/1960", "reminderDays": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"]["title"], "Mom's Birthday");
    assert_eq!(body["event"]["isRecurring"], true);
    let event_id = body["event"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, Some(user), "GET", "/events/upcoming", None).await;
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    let days_until = events[0]["daysUntil"].as_i64().unwrap();
    assert!((0..=366).contains(&days_until));

    let wished = format!("/events/{event_id}/wished");
    let (status, body) = send(&app, Some(user), "POST", &wished, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["event"]["lastWished"].is_string());

    let delete = format!("/events/{event_id}");
    let (status, _) = send(&app, Some(user), "DELETE", &delete, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = send(&app, Some(user), "GET", "/events/upcoming", None).await;
    assert!(body["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn suggestion_uses_tone_and_staleness() {
    let app = app();
    let user = Uuid::new_v4();
    imported(&app, user).await;

    let (status, body) = send(&app, Some(user), "GET", "/contacts/1/suggestion?tone=warm", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hey Mom, It's been a while! I hope everything is going great.");
    assert_eq!(body["tone"], "warm");

    send(&app, Some(user), "POST", "/contacts/1/interactions", Some(json!({ "type": "text" }))).await;
    let (_, body) = send(&app, Some(user), "GET", "/contacts/1/suggestion?tone=sarcastic", None).await;
    assert_eq!(body["message"], "Hi Mom, Thinking of you. Wanted to reach out.");
    assert_eq!(body["tone"], "neutral");

    let (status, _) = send(&app, Some(user), "GET", "/contacts/404/suggestion", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
