//! Admin endpoints - HTMX fragments and card management
//!
//! Endpoints:
//! - htmx_admin_cards_list: All cards, optionally by status (HTML fragment)
//! - htmx_expiring_cards_list: Cards expiring by a date (HTML fragment)
//! - htmx_admin_transactions_list: Transactions of one user (HTML fragment)
//! - htmx_card_create / block / activate / delete: Card management

use super::{ADMIN_CARDS_LAYOUT, ADMIN_TRANSACTIONS_LAYOUT, EXPIRING_CARDS_LAYOUT};
use crate::error::{ApiError, ApiResult};
use crate::routes::{action_response, field, page_param, require_card, table_response};
use crate::{session_from_headers, AppState};
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use cardweb_core::{Action, CardStatus, NewCard};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// HTMX: All cards - Partial page update
pub async fn htmx_admin_cards_list(
    state: State<AppState>,
    headers: HeaderMap,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let mut filters = Vec::new();
    if let Some(status) = field(&params, "status") {
        let status = CardStatus::from_str(status).map_err(ApiError::bad_request)?;
        filters.push(("status".to_string(), status.to_string()));
    }
    let session = session_from_headers(&headers);
    table_response(&state, &session, &ADMIN_CARDS_LAYOUT, page_param(&params), filters).await
}

/// HTMX: Cards expiring by a date - Partial page update
pub async fn htmx_expiring_cards_list(
    state: State<AppState>,
    headers: HeaderMap,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let date = field(&params, "date").ok_or_else(|| ApiError::bad_request("Please, select date"))?;
    let date = parse_date(date)?;
    let session = session_from_headers(&headers);
    let filters = vec![("date".to_string(), date.to_string())];
    table_response(&state, &session, &EXPIRING_CARDS_LAYOUT, page_param(&params), filters).await
}

/// HTMX: Transactions of one user - Partial page update.
/// Without a user nothing is requested and nothing changes.
pub async fn htmx_admin_transactions_list(
    state: State<AppState>,
    headers: HeaderMap,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let Some(user_id) = field(&params, "userId") else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    let session = session_from_headers(&headers);
    let filters = vec![("userId".to_string(), user_id.to_string())];
    table_response(&state, &session, &ADMIN_TRANSACTIONS_LAYOUT, page_param(&params), filters).await
}

/// HTMX: Create card
pub async fn htmx_card_create(
    state: State<AppState>,
    headers: HeaderMap,
    form: Form<HashMap<String, String>>,
) -> ApiResult<Response> {
    let card = parse_new_card(&form)?;
    let session = session_from_headers(&headers);
    Ok(action_response(&state, &session, Action::CreateCard(card)).await)
}

/// HTMX: Block card
pub async fn htmx_card_block(
    state: State<AppState>,
    headers: HeaderMap,
    form: Form<HashMap<String, String>>,
) -> ApiResult<Response> {
    let card_id = require_card(&form, "cardId")?;
    let session = session_from_headers(&headers);
    Ok(action_response(&state, &session, Action::BlockCard { card_id }).await)
}

/// HTMX: Activate card
pub async fn htmx_card_activate(
    state: State<AppState>,
    headers: HeaderMap,
    form: Form<HashMap<String, String>>,
) -> ApiResult<Response> {
    let card_id = require_card(&form, "cardId")?;
    let session = session_from_headers(&headers);
    Ok(action_response(&state, &session, Action::ActivateCard { card_id }).await)
}

/// HTMX: Delete card
pub async fn htmx_card_delete(
    state: State<AppState>,
    headers: HeaderMap,
    form: Form<HashMap<String, String>>,
) -> ApiResult<Response> {
    let card_id = require_card(&form, "cardId")?;
    let session = session_from_headers(&headers);
    Ok(action_response(&state, &session, Action::DeleteCard { card_id }).await)
}

fn parse_date(value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ApiError::bad_request(format!("Invalid date: {}", value)))
}

fn parse_new_card(form: &HashMap<String, String>) -> ApiResult<NewCard> {
    let user_id = field(form, "userId").ok_or_else(|| ApiError::bad_request("Please, select user"))?;
    let user_id = user_id
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid user: {}", user_id)))?;
    let card_number = field(form, "cardNumber").ok_or_else(|| ApiError::bad_request("Please, enter card number"))?;
    let expire_date = field(form, "expireDate").ok_or_else(|| ApiError::bad_request("Please, select expire date"))?;
    let card_status = field(form, "cardStatus").unwrap_or_default();
    let balance = match field(form, "balance") {
        Some(balance) => {
            Decimal::from_str(balance).map_err(|_| ApiError::bad_request(format!("Invalid balance: {}", balance)))?
        }
        None => Decimal::ZERO,
    };

    Ok(NewCard {
        user_id,
        card_number: card_number.to_string(),
        expire_date: parse_date(expire_date)?,
        card_status: CardStatus::from_str(card_status).map_err(ApiError::bad_request)?,
        balance,
    })
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{app, get, post_form, trigger};
    use axum::http::StatusCode;
    use cardweb_core::{ApiResponse, Method};
    use serde_json::json;

    fn cards() -> serde_json::Value {
        json!({
            "content": [
                {"id": 3, "userId": 7, "maskedNumber": "**** 3333", "expireDate": "2025-12-31", "cardStatus": "BLOCKED", "balance": 0}
            ],
            "totalPages": 1,
            "totalElements": 1,
            "number": 0
        })
    }

    #[tokio::test]
    async fn test_admin_cards_by_status() {
        let (router, transport) = app(|_| Ok(ApiResponse::json(200, &cards())));
        let (_, body) = get(router, "/admin/cards/list?status=blocked").await;

        let sent = transport.sent();
        assert_eq!(sent[0].path, "/api/admin/cards");
        assert_eq!(sent[0].param("status"), Some("BLOCKED"));
        assert!(body.contains("<td class='px-4 py-2 text-sm'>7</td>"));
        assert!(body.contains("id='adminCardsPagination'"));
    }

    #[tokio::test]
    async fn test_admin_cards_unknown_status() {
        let (router, transport) = app(|_| Ok(ApiResponse::json(200, &cards())));
        let (response, _) = get(router, "/admin/cards/list?status=FROZEN").await;

        assert!(transport.sent().is_empty());
        assert_eq!(trigger(&response)["notify"][0]["text"], "Invalid card status: FROZEN");
    }

    #[tokio::test]
    async fn test_expiring_cards_need_date() {
        let (router, transport) = app(|_| Ok(ApiResponse::json(200, &cards())));
        let (response, _) = get(router.clone(), "/admin/cards/expiring/list?date=").await;
        assert!(transport.sent().is_empty());
        assert_eq!(trigger(&response)["notify"][0]["text"], "Please, select date");

        let (_, body) = get(router, "/admin/cards/expiring/list?date=2025-12-31&page=0").await;
        let sent = transport.sent();
        assert_eq!(sent[0].path, "/api/admin/cards/expiring");
        assert_eq!(sent[0].param("date"), Some("2025-12-31"));
        assert!(body.contains("**** 3333"));
    }

    #[tokio::test]
    async fn test_admin_transactions_without_user() {
        let (router, transport) = app(|_| Ok(ApiResponse::json(200, &cards())));
        let (response, body) = get(router, "/admin/transactions/list?userId=&page=0").await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body.is_empty());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_admin_transactions_for_user() {
        let (router, transport) = app(|_| {
            Ok(ApiResponse::json(200, &json!({"content": [], "totalPages": 2, "totalElements": 12, "number": 0})))
        });
        let (response, body) = get(router, "/admin/transactions/list?userId=7&page=0").await;

        let sent = transport.sent();
        assert_eq!(sent[0].path, "/api/admin/transactions");
        assert_eq!(sent[0].param("userId"), Some("7"));
        assert!(body.contains("/admin/transactions/list?userId=7&amp;page=1"));
        assert_eq!(trigger(&response)["notify"][0]["text"], "Loaded 0 transactions");
    }

    #[tokio::test]
    async fn test_create_card() {
        let (router, transport) = app(|_| Ok(ApiResponse::new(201, "")));
        let (response, _) = post_form(
            router,
            "/admin/cards",
            "userId=7&cardNumber=4000123412341234&expireDate=2027-12-31&cardStatus=ACTIVE&balance=100.00",
        )
        .await;

        let sent = transport.sent();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].path, "/api/admin/cards");
        assert_eq!(
            sent[0].body,
            Some(json!({
                "userId": 7,
                "cardNumber": "4000123412341234",
                "expireDate": "2027-12-31",
                "cardStatus": "ACTIVE",
                "balance": 100
            }))
        );
        assert_eq!(trigger(&response)["notify"][0]["text"], "Card successfully created");
    }

    #[tokio::test]
    async fn test_create_card_rejects_bad_date() {
        let (router, transport) = app(|_| Ok(ApiResponse::new(201, "")));
        let (response, _) = post_form(
            router,
            "/admin/cards",
            "userId=7&cardNumber=4000123412341234&expireDate=31.12.2027&cardStatus=ACTIVE",
        )
        .await;

        assert!(transport.sent().is_empty());
        assert_eq!(trigger(&response)["notify"][0]["text"], "Invalid date: 31.12.2027");
    }

    #[tokio::test]
    async fn test_activate_card() {
        let (router, transport) = app(|_| Ok(ApiResponse::new(200, "")));
        let (response, _) = post_form(router, "/admin/cards/activate", "cardId=3").await;

        assert_eq!(transport.sent()[0].path, "/api/admin/cards/3/activate");
        let trigger = trigger(&response);
        assert_eq!(trigger["notify"][0]["text"], "Card was activated");
        assert_eq!(
            trigger["domPatch"],
            json!([
                {"op": "setText", "target": "cardStatus", "text": "ACTIVE"},
                {"op": "removeOption", "target": "blockCardSelect", "value": "3"},
                {"op": "setValue", "target": "activateCardSelect", "value": ""}
            ])
        );
    }

    #[tokio::test]
    async fn test_block_card() {
        let (router, transport) = app(|_| Ok(ApiResponse::new(200, "")));
        let (response, _) = post_form(router, "/admin/cards/block", "cardId=3").await;

        assert_eq!(transport.sent()[0].path, "/api/admin/cards/3/block");
        assert_eq!(trigger(&response)["domPatch"][0], json!({"op": "setText", "target": "blockStatus", "text": "BLOCK"}));
    }

    #[tokio::test]
    async fn test_block_without_card() {
        let (router, transport) = app(|_| Ok(ApiResponse::new(200, "")));
        let (response, _) = post_form(router, "/admin/cards/block", "cardId=%20").await;

        assert!(transport.sent().is_empty());
        assert_eq!(trigger(&response)["notify"][0]["text"], "Please, select card");
    }

    #[tokio::test]
    async fn test_delete_card() {
        let (router, transport) = app(|_| Ok(ApiResponse::new(204, "")));
        let (response, _) = post_form(router, "/admin/cards/delete", "cardId=3").await;

        assert_eq!(transport.sent()[0].method, Method::Delete);
        assert_eq!(transport.sent()[0].path, "/api/admin/cards/3");
        assert_eq!(trigger(&response)["notify"][0]["text"], "Card was deleted");
    }

    #[tokio::test]
    async fn test_server_message_is_shown() {
        let (router, _) = app(|_| Ok(ApiResponse::json(404, &json!({"message": "Card not found"}))));
        let (response, _) = post_form(router, "/admin/cards/block", "cardId=99").await;

        assert_eq!(trigger(&response)["notify"][0]["text"], "Error: Card not found");
        assert_eq!(response.headers()["HX-Reswap"], "none");
    }
}
