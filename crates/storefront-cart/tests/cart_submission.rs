//! Integration tests for `CartSubmissionController`.
//!
//! Each test binds a controller to a single surface and points it at a
//! `wiremock` server standing in for the storefront's cart endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_cart::{
    CartError, CartPreview, CartSubmissionController, SectionsPayload, SkipReason,
    StorefrontClient, SubmitOutcome,
};
use storefront_widget::{LoadingSpinner, MemoryHistory, SubmitControl, Surface, SurfaceState};

/// Cart preview double that records every render call.
#[derive(Default)]
struct RecordingPreview {
    rendered: Mutex<Vec<SectionsPayload>>,
}

impl RecordingPreview {
    fn calls(&self) -> Vec<SectionsPayload> {
        self.rendered.lock().unwrap().clone()
    }
}

impl CartPreview for RecordingPreview {
    fn render_contents(&self, payload: &SectionsPayload) {
        self.rendered.lock().unwrap().push(payload.clone());
    }
}

fn form_surface(variant_id: &str) -> Surface {
    let mut state = SurfaceState::new("desktop");
    state.variant_id = Some(variant_id.to_string());
    state.form_fields = vec![("quantity".to_string(), "1".to_string())];
    state.submit = Some(SubmitControl::new("$10.00 - Add to cart"));
    Surface::new(state)
}

fn controller(
    server_uri: &str,
    surface: &Surface,
    preview: Option<Arc<RecordingPreview>>,
) -> CartSubmissionController {
    let client = Arc::new(StorefrontClient::new(server_uri, 5, "storefront-test/0.1").unwrap());
    let history =
        Arc::new(MemoryHistory::parse("https://shop.example.com/products/field-jacket").unwrap());
    let controller = CartSubmissionController::bind(client, surface.clone(), history, "header")
        .expect("surface has a product form");
    match preview {
        Some(preview) => controller.with_preview(preview),
        None => controller,
    }
}

fn assert_idle(surface: &Surface) {
    let submit = surface.snapshot().submit.unwrap();
    assert!(!submit.disabled, "submit control should be re-enabled");
    assert!(!submit.in_progress, "in-progress styling should be removed");
    assert_eq!(submit.spinner, Some(LoadingSpinner { hidden: true }));
}

#[tokio::test]
async fn success_renders_returned_sections_into_preview() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(body_string_contains("id=2"))
        .and(body_string_contains("sections=header"))
        .and(body_string_contains("sections_url=%2Fproducts%2Ffield-jacket"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sections": {"header": "<html>"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let surface = form_surface("2");
    let preview = Arc::new(RecordingPreview::default());
    let controller = controller(&server.uri(), &surface, Some(preview.clone()));

    let outcome = controller.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Added(_)), "got: {outcome:?}");
    let calls = preview.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].sections.get("header"),
        Some(&Some("<html>".to_string()))
    );
    assert_eq!(calls[0].sections.len(), 1);
    assert_idle(&surface);
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn rejection_leaves_preview_untouched_and_reenables_submit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"status": 422, "description": "Sold out"})),
        )
        .mount(&server)
        .await;

    let surface = form_surface("2");
    let preview = Arc::new(RecordingPreview::default());
    let controller = controller(&server.uri(), &surface, Some(preview.clone()));

    let outcome = controller.submit().await;

    match outcome {
        SubmitOutcome::Rejected(rejection) => {
            assert_eq!(rejection.description.as_deref(), Some("Sold out"));
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
    assert!(preview.calls().is_empty());
    assert_idle(&surface);
}

#[tokio::test]
async fn structured_rejection_is_not_a_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(422).set_body_json(
            json!({"status": "bad_request", "message": 400, "description": {"quantity": ["too many"]}}),
        ))
        .mount(&server)
        .await;

    let surface = form_surface("2");
    let preview = Arc::new(RecordingPreview::default());
    let controller = controller(&server.uri(), &surface, Some(preview.clone()));

    let outcome = controller.submit().await;

    match outcome {
        SubmitOutcome::Rejected(rejection) => {
            assert_eq!(rejection.status, json!("bad_request"));
            assert_eq!(rejection.message.as_deref(), Some("400"));
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
    assert!(preview.calls().is_empty());
    assert_idle(&surface);
}

#[tokio::test]
async fn transport_failure_is_reported_and_unlocks() {
    let uri = {
        let server = MockServer::builder().start().await;
        server.uri()
    };

    let surface = form_surface("2");
    let preview = Arc::new(RecordingPreview::default());
    let controller = controller(&uri, &surface, Some(preview.clone()));

    let outcome = controller.submit().await;

    assert!(
        matches!(outcome, SubmitOutcome::Failed(CartError::Http(_))),
        "got: {outcome:?}"
    );
    assert!(preview.calls().is_empty());
    assert_idle(&surface);
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn malformed_response_is_reported_and_unlocks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let surface = form_surface("2");
    let preview = Arc::new(RecordingPreview::default());
    let controller = controller(&server.uri(), &surface, Some(preview.clone()));

    let outcome = controller.submit().await;

    assert!(
        matches!(outcome, SubmitOutcome::Failed(CartError::Deserialize { .. })),
        "got: {outcome:?}"
    );
    assert!(preview.calls().is_empty());
    assert_idle(&surface);
}

#[tokio::test]
async fn double_submit_issues_exactly_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"sections": {"header": "<html>"}}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let surface = form_surface("2");
    let controller = controller(&server.uri(), &surface, None);

    let (first, second) = tokio::join!(controller.submit(), controller.submit());

    assert!(matches!(first, SubmitOutcome::Added(_)), "got: {first:?}");
    assert!(
        matches!(second, SubmitOutcome::Skipped(SkipReason::InFlight)),
        "got: {second:?}"
    );
    assert_idle(&surface);
}

#[tokio::test]
async fn ui_is_locked_while_request_is_in_flight() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"sections": {}}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let surface = form_surface("2");
    let controller = controller(&server.uri(), &surface, None);

    let observe = async {
        tokio::task::yield_now().await;
        (surface.snapshot().submit.unwrap(), controller.is_submitting())
    };
    let (outcome, (during, submitting)) = tokio::join!(controller.submit(), observe);

    assert!(submitting);
    assert!(during.disabled);
    assert!(during.in_progress);
    assert_eq!(during.spinner, Some(LoadingSpinner { hidden: false }));
    assert!(matches!(outcome, SubmitOutcome::Added(_)), "got: {outcome:?}");
    assert_idle(&surface);
}

#[tokio::test]
async fn dropped_submission_still_unlocks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;

    let surface = form_surface("2");
    let controller = controller(&server.uri(), &surface, None);

    let timed_out = tokio::time::timeout(Duration::from_millis(100), controller.submit()).await;

    assert!(timed_out.is_err(), "submission should still be pending");
    assert!(!controller.is_submitting());
    assert_idle(&surface);
}

#[tokio::test]
async fn empty_variant_id_aborts_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let surface = form_surface("");
    surface.update(|s| s.submit.as_mut().unwrap().disabled = true);
    let controller = controller(&server.uri(), &surface, None);

    let outcome = controller.submit().await;

    assert!(
        matches!(outcome, SubmitOutcome::Skipped(SkipReason::MissingVariant)),
        "got: {outcome:?}"
    );
    // The lock was never applied, so the control keeps its disabled state.
    assert!(surface.snapshot().submit.unwrap().disabled);
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn missing_preview_is_degraded_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sections": {"header": null}})))
        .mount(&server)
        .await;

    let surface = form_surface("2");
    let controller = controller(&server.uri(), &surface, None);

    let outcome = controller.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Added(_)), "got: {outcome:?}");
    assert_idle(&surface);
}

#[tokio::test]
async fn surface_without_product_form_does_not_bind() {
    let client = Arc::new(StorefrontClient::new("https://shop.example.com", 5, "storefront-test/0.1").unwrap());
    let history = Arc::new(MemoryHistory::parse("https://shop.example.com/").unwrap());
    let bare = Surface::new(SurfaceState::new("mobile"));

    assert!(CartSubmissionController::bind(client, bare, history, "header").is_none());
}
