//! Action dispatcher
//!
//! State-changing requests go through [`ActionDispatcher`]. A successful
//! response is turned into feedback by a caller-supplied callback (usually
//! [`Action::success_feedback`]); a failed one into an error notification.
//! Nothing is reloaded: the browser applies the returned patches in place.

use crate::client::{ApiClient, ApiRequest, ApiResponse, Method, Session};
use crate::error::{ClientError, ClientResult, DefaultErrorLogger, ErrorContext, ErrorLogger, DEFAULT_ERROR_MESSAGE};
use crate::feedback::{DomPatch, Feedback, Notification};
use crate::models::{NewCard, TransferRequest};
use crate::viewer::{TableSpec, USER_CARDS};
use serde_json::Value;
use std::sync::Arc;

/// Shown when an action needing a card is submitted without one
pub const NO_CARD_SELECTED: &str = "Please, select card";

/// Element ids patched after actions
pub mod targets {
    pub const BLOCK_STATUS: &str = "blockStatus";
    pub const BLOCK_BUTTON: &str = "blockButton";
    pub const CARD_STATUS: &str = "cardStatus";
    pub const BLOCK_CARD_SELECT: &str = "blockCardSelect";
    pub const ACTIVATE_CARD_SELECT: &str = "activateCardSelect";
    pub const DELETE_CARD_SELECT: &str = "deleteCardSelect";
    pub const AMOUNT_INPUT: &str = "amountInput";
}

/// The trimmed card id of a select value, `None` when nothing is selected
pub fn selected_card(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// A state-changing request the user can trigger
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateCard(NewCard),
    BlockCard { card_id: i64 },
    ActivateCard { card_id: i64 },
    DeleteCard { card_id: i64 },
    RequestBlock { card_id: i64 },
    CheckBalance { card_id: i64 },
    Transfer(TransferRequest),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateCard(_) => "create_card",
            Action::BlockCard { .. } => "block_card",
            Action::ActivateCard { .. } => "activate_card",
            Action::DeleteCard { .. } => "delete_card",
            Action::RequestBlock { .. } => "request_block",
            Action::CheckBalance { .. } => "check_balance",
            Action::Transfer(_) => "transfer",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Action::CheckBalance { .. } => Method::Get,
            Action::DeleteCard { .. } => Method::Delete,
            _ => Method::Post,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Action::CreateCard(_) => "/api/admin/cards".to_string(),
            Action::BlockCard { card_id } => format!("/api/admin/cards/{}/block", card_id),
            Action::ActivateCard { card_id } => format!("/api/admin/cards/{}/activate", card_id),
            Action::DeleteCard { card_id } => format!("/api/admin/cards/{}", card_id),
            Action::RequestBlock { card_id } => format!("/api/user/cards/{}/block-request", card_id),
            Action::CheckBalance { card_id } => format!("/api/user/cards/{}/balance", card_id),
            Action::Transfer(_) => "/api/user/cards/transfer".to_string(),
        }
    }

    /// JSON body, for the actions that carry one
    pub fn body(&self) -> ClientResult<Option<Value>> {
        let body = match self {
            Action::CreateCard(card) => Some(serde_json::to_value(card)),
            Action::Transfer(transfer) => Some(serde_json::to_value(transfer)),
            _ => None,
        };
        body.transpose()
            .map_err(|e| ClientError::transport(format!("cannot encode request: {}", e)))
    }

    /// Message used when a failed response carries none
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Action::CheckBalance { .. } => "Get balance failed",
            Action::Transfer(_) => "Transfer failed",
            _ => DEFAULT_ERROR_MESSAGE,
        }
    }

    /// Table to re-render at page 0 after success
    pub fn refreshes(&self) -> Option<&'static TableSpec> {
        match self {
            Action::CheckBalance { .. } => Some(&USER_CARDS),
            _ => None,
        }
    }

    /// Notification and patches after a successful response
    pub fn success_feedback(&self, response: &ApiResponse) -> Feedback {
        match self {
            Action::CreateCard(_) => Feedback::new().with_notification(Notification::success("Card successfully created")),
            Action::BlockCard { .. } => Feedback::new()
                .with_notification(Notification::success("Card was blocked"))
                .with_patch(DomPatch::set_text(targets::BLOCK_STATUS, "BLOCK"))
                .with_patch(DomPatch::disable(targets::BLOCK_BUTTON)),
            Action::ActivateCard { card_id } => Feedback::new()
                .with_notification(Notification::success("Card was activated"))
                .with_patch(DomPatch::set_text(targets::CARD_STATUS, "ACTIVE"))
                .with_patch(DomPatch::remove_option(targets::BLOCK_CARD_SELECT, card_id.to_string()))
                .with_patch(DomPatch::set_value(targets::ACTIVATE_CARD_SELECT, "")),
            Action::DeleteCard { card_id } => Feedback::new()
                .with_notification(Notification::success("Card was deleted"))
                .with_patch(DomPatch::remove_option(targets::BLOCK_CARD_SELECT, card_id.to_string()))
                .with_patch(DomPatch::remove_option(targets::ACTIVATE_CARD_SELECT, card_id.to_string()))
                .with_patch(DomPatch::remove_option(targets::DELETE_CARD_SELECT, card_id.to_string()))
                .with_patch(DomPatch::set_value(targets::DELETE_CARD_SELECT, "")),
            Action::RequestBlock { .. } => Feedback::new()
                .with_notification(Notification::success("Block request complete"))
                .with_patch(DomPatch::set_text(targets::BLOCK_STATUS, "Request PENDING"))
                .with_patch(DomPatch::disable(targets::BLOCK_BUTTON)),
            Action::CheckBalance { .. } => {
                Feedback::new().with_notification(Notification::info(format!("Card balance: {}", balance_text(response))))
            }
            Action::Transfer(_) => Feedback::new()
                .with_notification(Notification::success("Transfer successful"))
                .with_patch(DomPatch::set_value(targets::AMOUNT_INPUT, "")),
        }
    }
}

/// Balance body as shown to the user: JSON strings unquoted, anything else verbatim
fn balance_text(response: &ApiResponse) -> String {
    match serde_json::from_slice::<Value>(&response.body) {
        Ok(Value::String(s)) => s,
        Ok(value) => value.to_string(),
        Err(_) => String::from_utf8_lossy(&response.body).trim().to_string(),
    }
}

/// What an action produced
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub succeeded: bool,
    pub feedback: Feedback,
}

/// Sends actions to the API and reports their outcome
#[derive(Clone)]
pub struct ActionDispatcher {
    client: ApiClient,
    logger: Arc<dyn ErrorLogger>,
}

impl ActionDispatcher {
    pub fn new(client: ApiClient) -> Self {
        Self::with_logger(client, Arc::new(DefaultErrorLogger))
    }

    pub fn with_logger(client: ApiClient, logger: Arc<dyn ErrorLogger>) -> Self {
        Self { client, logger }
    }

    /// Send one request. Non-success statuses fail with the server's
    /// `message` or `fallback`.
    pub async fn dispatch_action(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> ClientResult<ApiResponse> {
        let request = ApiRequest::new(method, path).with_body(body).with_session(session);
        self.client.execute(request, fallback).await
    }

    /// Run `action`; on success `on_success` decides the feedback
    pub async fn dispatch<F>(&self, session: &Session, action: &Action, on_success: F) -> ActionOutcome
    where
        F: FnOnce(&ApiResponse) -> Feedback,
    {
        let result = match action.body() {
            Ok(body) => {
                self.dispatch_action(session, action.method(), &action.path(), body, action.fallback_message())
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => {
                log::info!("{} {} succeeded", action.method(), action.path());
                ActionOutcome { succeeded: true, feedback: on_success(&response) }
            }
            Err(error) => {
                let context = ErrorContext::new(action.name()).with_data("path", Value::String(action.path()));
                self.logger.log_error(&error, &context);
                ActionOutcome { succeeded: false, feedback: Feedback::from_error(&error) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::StubTransport;
    use crate::feedback::NotificationLevel;
    use crate::models::CardStatus;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLogger {
        errors: Mutex<Vec<String>>,
    }

    impl ErrorLogger for RecordingLogger {
        fn log_error(&self, error: &ClientError, context: &ErrorContext) {
            self.errors.lock().unwrap().push(format!("{}: {}", context.operation, error));
        }

        fn log_warning(&self, _message: &str, _context: &ErrorContext) {}
    }

    fn dispatcher(transport: Arc<StubTransport>) -> ActionDispatcher {
        ActionDispatcher::new(ApiClient::new(transport))
    }

    async fn run(action: Action, response: ClientResult<ApiResponse>) -> (ActionOutcome, Arc<StubTransport>) {
        let transport = StubTransport::new(move |_| response.clone());
        let outcome = dispatcher(transport.clone())
            .dispatch(&Session::anonymous(), &action, |r| action.success_feedback(r))
            .await;
        (outcome, transport)
    }

    #[test]
    fn test_selected_card() {
        assert_eq!(selected_card(Some(" 5 ")), Some("5".to_string()));
        assert_eq!(selected_card(Some("  ")), None);
        assert_eq!(selected_card(None), None);
    }

    #[tokio::test]
    async fn test_request_block_success() {
        let (outcome, transport) = run(Action::RequestBlock { card_id: 5 }, Ok(ApiResponse::new(200, ""))).await;

        assert!(outcome.succeeded);
        assert_eq!(outcome.feedback.notify, vec![Notification::success("Block request complete")]);
        assert_eq!(
            outcome.feedback.patches,
            vec![
                DomPatch::set_text("blockStatus", "Request PENDING"),
                DomPatch::disable("blockButton"),
            ]
        );
        let sent = transport.sent();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].path, "/api/user/cards/5/block-request");
        assert!(sent[0].body.is_none());
    }

    #[tokio::test]
    async fn test_activate_removes_option() {
        let (outcome, _) = run(Action::ActivateCard { card_id: 3 }, Ok(ApiResponse::new(200, ""))).await;
        assert_eq!(
            outcome.feedback.patches,
            vec![
                DomPatch::set_text("cardStatus", "ACTIVE"),
                DomPatch::remove_option("blockCardSelect", "3"),
                DomPatch::set_value("activateCardSelect", ""),
            ]
        );
    }

    #[tokio::test]
    async fn test_block_card_patches() {
        let (outcome, transport) = run(Action::BlockCard { card_id: 8 }, Ok(ApiResponse::new(200, ""))).await;
        assert_eq!(outcome.feedback.notify[0].text, "Card was blocked");
        assert_eq!(outcome.feedback.patches[0], DomPatch::set_text("blockStatus", "BLOCK"));
        assert_eq!(transport.sent()[0].path, "/api/admin/cards/8/block");
    }

    #[tokio::test]
    async fn test_delete_card() {
        let (outcome, transport) = run(Action::DeleteCard { card_id: 4 }, Ok(ApiResponse::new(204, ""))).await;
        assert!(outcome.succeeded);
        assert_eq!(transport.sent()[0].method, Method::Delete);
        assert_eq!(transport.sent()[0].path, "/api/admin/cards/4");
        assert_eq!(outcome.feedback.patches.len(), 4);
        assert_eq!(outcome.feedback.patches[2], DomPatch::remove_option("deleteCardSelect", "4"));
    }

    #[tokio::test]
    async fn test_transfer_failure_uses_server_message() {
        let action = Action::Transfer(TransferRequest {
            from_card_id: 1,
            to_card_id: 2,
            amount: Decimal::new(50, 0),
        });
        let (outcome, transport) = run(action, Ok(ApiResponse::json(400, &json!({"message": "Insufficient funds"})))).await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.feedback.notify, vec![Notification::error("Error: Insufficient funds")]);
        assert!(outcome.feedback.patches.is_empty());
        assert_eq!(transport.sent()[0].body, Some(json!({"fromCardId": 1, "toCardId": 2, "amount": 50})));
    }

    #[tokio::test]
    async fn test_transfer_success_clears_amount() {
        let action = Action::Transfer(TransferRequest {
            from_card_id: 1,
            to_card_id: 2,
            amount: Decimal::new(50, 0),
        });
        let (outcome, _) = run(action, Ok(ApiResponse::new(200, ""))).await;
        assert_eq!(outcome.feedback.notify[0].text, "Transfer successful");
        assert_eq!(outcome.feedback.patches, vec![DomPatch::set_value("amountInput", "")]);
    }

    #[tokio::test]
    async fn test_balance_fallback_message() {
        let (outcome, transport) =
            run(Action::CheckBalance { card_id: 2 }, Ok(ApiResponse::new(500, "oops"))).await;
        assert_eq!(outcome.feedback.notify[0].text, "Error: Get balance failed");
        assert_eq!(transport.sent()[0].method, Method::Get);
    }

    #[tokio::test]
    async fn test_balance_success() {
        let action = Action::CheckBalance { card_id: 2 };
        assert_eq!(action.refreshes(), Some(&USER_CARDS));
        let (outcome, _) = run(action, Ok(ApiResponse::json(200, &json!(250.5)))).await;
        assert_eq!(outcome.feedback.notify[0].text, "Card balance: 250.5");
        assert_eq!(outcome.feedback.notify[0].level, NotificationLevel::Info);
    }

    #[tokio::test]
    async fn test_create_card_body() {
        let action = Action::CreateCard(NewCard {
            user_id: 3,
            card_number: "4000123412341234".to_string(),
            expire_date: NaiveDate::from_ymd_opt(2027, 12, 31).unwrap(),
            card_status: CardStatus::Active,
            balance: Decimal::ZERO,
        });
        let (outcome, transport) = run(action, Ok(ApiResponse::new(201, ""))).await;
        assert_eq!(outcome.feedback.notify[0].text, "Card successfully created");
        let body = transport.sent()[0].body.clone().unwrap();
        assert_eq!(body["cardNumber"], "4000123412341234");
        assert_eq!(body["balance"], 0);
    }

    #[tokio::test]
    async fn test_network_error_is_logged_and_reported() {
        let transport = StubTransport::new(|_| Err(ClientError::transport("connection refused")));
        let logger = Arc::new(RecordingLogger::default());
        let dispatcher = ActionDispatcher::with_logger(ApiClient::new(transport), logger.clone());

        let action = Action::BlockCard { card_id: 1 };
        let outcome = dispatcher
            .dispatch(&Session::anonymous(), &action, |r| action.success_feedback(r))
            .await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.feedback.notify[0].text, "Network error: connection refused");
        assert_eq!(logger.errors.lock().unwrap().len(), 1);
        assert!(logger.errors.lock().unwrap()[0].starts_with("block_card"));
    }

    #[tokio::test]
    async fn test_dispatch_action_forwards_cookie() {
        let transport = StubTransport::new(|_| Ok(ApiResponse::new(200, "")));
        let dispatcher = dispatcher(transport.clone());
        let session = Session::from_cookie_header(Some("JSESSIONID=xyz"));

        dispatcher
            .dispatch_action(&session, Method::Patch, "/api/admin/cards/1/activate", None, DEFAULT_ERROR_MESSAGE)
            .await
            .unwrap();
        assert_eq!(transport.sent()[0].cookie.as_deref(), Some("JSESSIONID=xyz"));
        assert_eq!(transport.sent()[0].method, Method::Patch);
    }
}
