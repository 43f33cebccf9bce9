use std::sync::{Arc, mpsc};
use std::time::Duration;

use redefine::catalog::{
    BackendError, CatalogBackend, CollectionKind, FetchParams, HttpBackend, ItemDetails,
};
use redefine::core::action::{Action, Effect, update};
use redefine::core::catalog_view::CatalogPhase;
use redefine::core::config::ResolvedConfig;
use redefine::core::fetcher::{FetchOutcome, FetchState, RemoteCollectionFetcher};
use redefine::core::state::{App, FormScope};
use redefine::core::submission::{
    InquiryForm, Resolution, SubmissionPipeline, SubmissionState,
};
use redefine::runtime::Runtime;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri(), Duration::from_secs(5)).unwrap()
}

fn courses_json() -> serde_json::Value {
    json!([
        {"_id": "c2", "title": "Data Analytics", "order": 2, "ratingsAverage": 4.5},
        {"_id": "c1", "title": "Product Design", "order": 1, "category": "Design"},
        {"_id": "c3", "title": "Retired Course", "order": 0, "active": false}
    ])
}

fn filled_form() -> InquiryForm {
    InquiryForm {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        phone: String::new(),
        subject: "Query about Product Design".into(),
        message: "Is there a weekend cohort?".into(),
    }
}

/// Feed runtime actions back through the reducer until `done` holds.
async fn pump_until(
    app: &mut App,
    runtime: &mut Runtime,
    rx: &mpsc::Receiver<Action>,
    done: impl Fn(&App) -> bool,
) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !done(app) {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for runtime"
        );
        while let Ok(action) = rx.try_recv() {
            for effect in update(app, action) {
                runtime.execute(effect);
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ============================================================================
// Collection Fetches
// ============================================================================

#[tokio::test]
async fn test_fetch_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(courses_json()))
        .mount(&server)
        .await;

    let items = backend(&server)
        .fetch_collection(CollectionKind::Courses, &FetchParams::default())
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, "c2");
    assert_eq!(items[0].rating, 4.5);
    assert_eq!(items[1].tag.as_deref(), Some("Design"));
    assert_eq!(items[1].rating, 4.8);
}

#[tokio::test]
async fn test_fetch_envelope_and_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/mentors"))
        .and(query_param("limit", "4"))
        .and(query_param("featured", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"_id": "m1", "name": "Priya Raman", "title": "Staff Engineer",
                 "company": "Acme", "featured": true}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = FetchParams::default()
        .with_limit(4)
        .with_filter("featured", "true");
    let items = backend(&server)
        .fetch_collection(CollectionKind::Mentors, &params)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Priya Raman");
    assert!(matches!(
        items[0].details,
        ItemDetails::Mentor { featured: true, .. }
    ));
}

#[tokio::test]
async fn test_fetcher_prepares_loaded_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(courses_json()))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let mut fetcher = RemoteCollectionFetcher::new("courses", FetchParams::default());
    let ticket = fetcher.begin();
    let result = backend
        .fetch_collection(CollectionKind::Courses, &ticket.params)
        .await;

    assert!(matches!(
        fetcher.resolve(ticket.generation, result),
        FetchOutcome::Loaded { len: 2, .. }
    ));
    let ids: Vec<&str> = fetcher.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["c1", "c2"]);
}

#[tokio::test]
async fn test_server_error_becomes_generic_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})),
        )
        .mount(&server)
        .await;

    let backend = backend(&server);
    let mut fetcher = RemoteCollectionFetcher::new("courses", FetchParams::default());
    let ticket = fetcher.begin();
    let result = backend
        .fetch_collection(CollectionKind::Courses, &ticket.params)
        .await;
    assert!(matches!(
        result,
        Err(BackendError::Api { status: 500, .. })
    ));

    assert_eq!(
        fetcher.resolve(ticket.generation, result),
        FetchOutcome::Failed
    );
    assert_eq!(
        fetcher.state(),
        &FetchState::Failed("Failed to load courses".to_string())
    );
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = backend(&server)
        .fetch_collection(CollectionKind::Courses, &FetchParams::default())
        .await;
    assert!(matches!(result, Err(BackendError::Parse(_))));
}

#[tokio::test]
async fn test_slow_superseded_fetch_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .and(query_param("limit", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"_id": "old", "title": "Old"}]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "new", "title": "New"}
        ])))
        .mount(&server)
        .await;

    let backend = Arc::new(backend(&server));
    let mut fetcher =
        RemoteCollectionFetcher::new("courses", FetchParams::default().with_limit(10));
    let slow = fetcher.begin();
    let fast = fetcher.begin_with(FetchParams::default().with_limit(5));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for ticket in [slow, fast] {
        let backend = backend.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = backend
                .fetch_collection(CollectionKind::Courses, &ticket.params)
                .await;
            let _ = tx.send((ticket.generation, result));
        });
    }
    drop(tx);

    let mut outcomes = Vec::new();
    while let Some((generation, result)) = rx.recv().await {
        outcomes.push(fetcher.resolve(generation, result));
    }

    assert!(matches!(outcomes[0], FetchOutcome::Loaded { len: 1, .. }));
    assert_eq!(outcomes[1], FetchOutcome::Stale);
    assert_eq!(fetcher.items()[0].id, "new");
}

// ============================================================================
// Inquiry Submissions
// ============================================================================

#[tokio::test]
async fn test_submit_sends_expected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/queries"))
        .and(body_json(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "subject": "Query about Product Design",
            "message": "Is there a weekend cohort?",
            "course": "c1"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut pipeline = SubmissionPipeline::new(1, filled_form(), Some("c1".into()));
    let payload = pipeline.submit().unwrap();
    let result = backend(&server).submit_inquiry(&payload).await;

    assert_eq!(pipeline.resolve(result), Resolution::Succeeded);
    assert_eq!(pipeline.state(), &SubmissionState::Succeeded);
    assert!(pipeline.form().name.is_empty());
}

#[tokio::test]
async fn test_submit_failure_keeps_fields_and_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/queries"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "Server busy"})),
        )
        .mount(&server)
        .await;

    let mut pipeline = SubmissionPipeline::new(1, filled_form(), None);
    let payload = pipeline.submit().unwrap();
    let result = backend(&server).submit_inquiry(&payload).await;

    assert_eq!(pipeline.resolve(result), Resolution::Failed);
    assert_eq!(
        pipeline.state(),
        &SubmissionState::Failed("Server busy".to_string())
    );
    assert_eq!(pipeline.form().message, "Is there a weekend cohort?");
}

#[tokio::test]
async fn test_submit_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/queries"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let mut pipeline = SubmissionPipeline::new(1, filled_form(), None);
    let payload = pipeline.submit().unwrap();
    let result = backend(&server).submit_inquiry(&payload).await;

    pipeline.resolve(result);
    assert_eq!(
        pipeline.state(),
        &SubmissionState::Failed("Failed to submit query. Please try again.".to_string())
    );
}

// ============================================================================
// Reducer + Runtime against a live backend
// ============================================================================

#[tokio::test]
async fn test_mount_loads_every_section() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(courses_json()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/mentors"))
        .and(query_param("featured", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ResolvedConfig {
        base_url: server.uri(),
        ..ResolvedConfig::default()
    };
    let mut app = App::from_config(&config);
    let (tx, rx) = mpsc::channel();
    let mut runtime = Runtime::new(Arc::new(backend(&server)), tx);

    for effect in update(&mut app, Action::Mount) {
        runtime.execute(effect);
    }
    pump_until(&mut app, &mut runtime, &rx, |app| {
        app.sections
            .iter()
            .all(|view| view.phase() != CatalogPhase::Loading)
    })
    .await;

    assert_eq!(app.sections[0].phase(), CatalogPhase::Populated);
    assert_eq!(app.sections[1].items().len(), 2);
    assert_eq!(app.sections[2].phase(), CatalogPhase::Empty);
    // Courses strip has two items, so its carousel is running.
    assert!(app.sections[0].rotator().is_running());
    assert_eq!(runtime.timer_count(), 1);
}

#[tokio::test]
async fn test_invalid_contact_form_never_posts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/queries"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = App::from_config(&ResolvedConfig {
        base_url: server.uri(),
        ..ResolvedConfig::default()
    });
    let (tx, _rx) = mpsc::channel();
    let mut runtime = Runtime::new(Arc::new(backend(&server)), tx);

    update(&mut app, Action::OpenContact);
    for text in ["Ana", "bad-email", "", "Hello", "Hi"] {
        update(&mut app, Action::FormInput(text.to_string()));
        update(&mut app, Action::FocusNext);
    }
    let effects = update(&mut app, Action::SubmitForm);
    assert!(effects.is_empty());
    for effect in effects {
        runtime.execute(effect);
    }

    let form = app.form(FormScope::Contact).unwrap();
    assert!(!form.pipeline.errors().is_empty());
    assert_eq!(form.pipeline.state(), &SubmissionState::Idle);
}

#[tokio::test]
async fn test_contact_form_round_trip_through_runtime() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/queries"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = App::from_config(&ResolvedConfig {
        base_url: server.uri(),
        ..ResolvedConfig::default()
    });
    let (tx, rx) = mpsc::channel();
    let mut runtime = Runtime::new(Arc::new(backend(&server)), tx);

    update(&mut app, Action::OpenContact);
    for text in ["Ana", "ana@example.com", "", "Hello", "Hi there"] {
        update(&mut app, Action::FormInput(text.to_string()));
        update(&mut app, Action::FocusNext);
    }
    let effects = update(&mut app, Action::SubmitForm);
    assert!(matches!(effects[..], [Effect::SpawnSubmit { .. }]));
    for effect in effects {
        runtime.execute(effect);
    }

    pump_until(&mut app, &mut runtime, &rx, |app| {
        app.form(FormScope::Contact)
            .is_some_and(|f| f.pipeline.state() == &SubmissionState::Succeeded)
    })
    .await;

    assert_eq!(app.status_message, "Query submitted successfully!");
    assert_eq!(runtime.timer_count(), 1);
}
