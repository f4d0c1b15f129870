//! Route modules for the HTTP server
//!
//! - cards: user page and card actions
//! - transactions: user transactions and statements
//! - admin: admin page, card management and admin tables
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: HTMX fragment and action endpoints
//! - page.rs: Full page rendering

pub mod admin;
pub mod cards;
pub mod transactions;

use crate::error::{ApiError, ApiResult};
use crate::render::{feedback_response, table_fragment, table_oob, TableLayout};
use crate::AppState;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use cardweb_core::{selected_card, Action, Feedback, Notification, RenderOutcome, Session, TableSpec, NO_CARD_SELECTED};
use std::collections::HashMap;

/// Every table drawn by the pages
pub(crate) const LAYOUTS: [&TableLayout; 5] = [
    &cards::CARDS_LAYOUT,
    &transactions::TRANSACTIONS_LAYOUT,
    &admin::ADMIN_CARDS_LAYOUT,
    &admin::EXPIRING_CARDS_LAYOUT,
    &admin::ADMIN_TRANSACTIONS_LAYOUT,
];

pub(crate) fn layout_for(spec: &TableSpec) -> Option<&'static TableLayout> {
    LAYOUTS.into_iter().find(|layout| layout.spec.control == spec.control)
}

/// Zero-based `page` parameter, 0 when absent or malformed
pub(crate) fn page_param(params: &HashMap<String, String>) -> u32 {
    params.get("page").and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// Trimmed, non-empty form or query value
pub(crate) fn field<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params.get(name).map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Card id from a select, or the "select card" notice. Only numeric ids
/// are accepted since the id ends up in an API path.
pub(crate) fn require_card(params: &HashMap<String, String>, name: &str) -> ApiResult<i64> {
    let card_id =
        selected_card(params.get(name).map(String::as_str)).ok_or_else(|| ApiError::bad_request(NO_CARD_SELECTED))?;
    card_id
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid card: {}", card_id)))
}

/// Fetch a page of `layout`'s table and answer with the table fragment.
/// A superseded request answers 204 so HTMX leaves the table alone.
pub(crate) async fn table_response(
    state: &AppState,
    session: &Session,
    layout: &TableLayout,
    page: u32,
    filters: Vec<(String, String)>,
) -> ApiResult<Response> {
    match state.viewer.render_page(session, layout.spec, page, &filters).await? {
        RenderOutcome::Stale => Ok(StatusCode::NO_CONTENT.into_response()),
        RenderOutcome::Rendered(view) => {
            let feedback = Feedback::new().with_notification(Notification::info(view.summary(layout.spec)));
            Ok(feedback_response(
                StatusCode::OK,
                table_fragment(layout, &view, &filters),
                &feedback,
            ))
        }
    }
}

/// Dispatch `action` and answer with its feedback. Nothing is swapped in
/// place; tables the action refreshes come back out of band.
pub(crate) async fn action_response(state: &AppState, session: &Session, action: Action) -> Response {
    let outcome = state
        .dispatcher
        .dispatch(session, &action, |response| action.success_feedback(response))
        .await;

    let mut feedback = outcome.feedback;
    let mut body = String::new();

    if outcome.succeeded {
        if let Some(layout) = action.refreshes().and_then(layout_for) {
            match state.viewer.render_page(session, layout.spec, 0, &[]).await {
                Ok(RenderOutcome::Rendered(view)) => {
                    feedback.push_notification(Notification::info(view.summary(layout.spec)));
                    body = table_oob(layout, &view);
                }
                Ok(RenderOutcome::Stale) => {}
                Err(error) => feedback.push_notification(Notification::from_error(&error)),
            }
        }
    }

    let mut response = feedback_response(StatusCode::OK, body, &feedback);
    if !outcome.succeeded {
        response.headers_mut().insert("HX-Reswap", HeaderValue::from_static("none"));
    }
    response
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process router with a canned backend

    use crate::{create_router, AppState};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use axum::Router;
    use cardweb_config::Config;
    use cardweb_core::{ApiRequest, ApiResponse, ClientResult, Transport};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    type Responder = Box<dyn Fn(&ApiRequest) -> ClientResult<ApiResponse> + Send + Sync>;

    pub struct StubTransport {
        responder: Responder,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl StubTransport {
        pub fn sent(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
            self.requests.lock().unwrap().push(request.clone());
            (self.responder)(&request)
        }
    }

    /// Transport answering every backend call with `responder`
    pub fn stub(
        responder: impl Fn(&ApiRequest) -> ClientResult<ApiResponse> + Send + Sync + 'static,
    ) -> Arc<StubTransport> {
        Arc::new(StubTransport {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Router answering every backend call with `responder`
    pub fn app(
        responder: impl Fn(&ApiRequest) -> ClientResult<ApiResponse> + Send + Sync + 'static,
    ) -> (Router, Arc<StubTransport>) {
        let transport = stub(responder);
        let router = create_router(AppState::new(Config::default(), transport.clone()));
        (router, transport)
    }

    pub async fn send(router: Router, request: Request<Body>) -> (Response<Body>, String) {
        let response = router.oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        (
            Response::from_parts(parts, Body::empty()),
            String::from_utf8_lossy(&bytes).into_owned(),
        )
    }

    pub async fn get(router: Router, uri: &str) -> (Response<Body>, String) {
        send(
            router,
            Request::get(uri).header("cookie", "JSESSIONID=test").body(Body::empty()).unwrap(),
        )
        .await
    }

    pub async fn post_form(router: Router, uri: &str, form: &str) -> (Response<Body>, String) {
        send(
            router,
            Request::post(uri)
                .header("cookie", "JSESSIONID=test")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Parsed `HX-Trigger` header
    pub fn trigger(response: &Response<Body>) -> serde_json::Value {
        response
            .headers()
            .get("HX-Trigger")
            .map(|v| serde_json::from_str(v.to_str().unwrap()).unwrap())
            .unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use cardweb_config::Config;
    use cardweb_core::viewer::{ADMIN_TRANSACTIONS, USER_CARDS};
    use cardweb_core::{ApiResponse, RequestGenerations};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_layout_lookup() {
        assert_eq!(layout_for(&USER_CARDS).unwrap().container_id, "cardsTable");
        assert_eq!(layout_for(&ADMIN_TRANSACTIONS).unwrap().list_url, "/admin/transactions/list");
    }

    #[test]
    fn test_params() {
        let mut params = HashMap::new();
        params.insert("page".to_string(), "x".to_string());
        params.insert("cardId".to_string(), "  ".to_string());
        assert_eq!(page_param(&params), 0);
        assert_eq!(field(&params, "cardId"), None);
        assert_eq!(require_card(&params, "cardId").unwrap_err().to_string(), "Please, select card");

        params.insert("cardId".to_string(), " 12 ".to_string());
        assert_eq!(require_card(&params, "cardId").unwrap(), 12);
        params.insert("cardId".to_string(), "1/..".to_string());
        assert_eq!(require_card(&params, "cardId").unwrap_err().to_string(), "Invalid card: 1/..");
    }

    #[tokio::test]
    async fn test_superseded_table_request_swaps_nothing() {
        let generations = Arc::new(RequestGenerations::new());
        let racing = generations.clone();
        let key = Session::from_cookie_header(Some("JSESSIONID=test")).control_key(USER_CARDS.control);

        // Another click on the same table lands while this page is being fetched.
        let transport = testing::stub(move |_| {
            racing.begin(&key);
            Ok(ApiResponse::json(200, &json!({"content": [], "totalPages": 1, "totalElements": 0, "number": 0})))
        });
        let state = AppState::with_generations(Config::default(), transport.clone(), generations);
        let (response, body) = testing::get(create_router(state), "/cards/list?page=0").await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body.is_empty());
        assert!(response.headers().get("HX-Trigger").is_none());
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = testing::app(|_| unreachable!());
        let (response, body) = testing::get(router, "/api/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body, "OK");
    }
}
