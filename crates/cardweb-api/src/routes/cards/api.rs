//! Card endpoints - HTMX fragments and actions
//!
//! Endpoints:
//! - htmx_cards_list: Cards table page (HTML fragment)
//! - htmx_card_balance: Show a card's balance and redraw the table
//! - htmx_card_block_request: Ask for a card to be blocked
//! - htmx_card_transfer: Move money between own cards

use super::CARDS_LAYOUT;
use crate::error::{ApiError, ApiResult};
use crate::routes::{action_response, field, page_param, require_card, table_response};
use crate::{session_from_headers, AppState};
use axum::extract::{Form, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use cardweb_core::{Action, TransferRequest};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// HTMX: Cards table - Partial page update
pub async fn htmx_cards_list(
    state: State<AppState>,
    headers: HeaderMap,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let session = session_from_headers(&headers);
    table_response(&state, &session, &CARDS_LAYOUT, page_param(&params), Vec::new()).await
}

/// HTMX: Card balance
pub async fn htmx_card_balance(
    state: State<AppState>,
    headers: HeaderMap,
    form: Form<HashMap<String, String>>,
) -> ApiResult<Response> {
    let card_id = require_card(&form, "cardId")?;
    let session = session_from_headers(&headers);
    Ok(action_response(&state, &session, Action::CheckBalance { card_id }).await)
}

/// HTMX: Block request for one of the user's cards
pub async fn htmx_card_block_request(
    state: State<AppState>,
    headers: HeaderMap,
    form: Form<HashMap<String, String>>,
) -> ApiResult<Response> {
    let card_id = require_card(&form, "cardId")?;
    let session = session_from_headers(&headers);
    Ok(action_response(&state, &session, Action::RequestBlock { card_id }).await)
}

/// HTMX: Transfer between the user's cards
pub async fn htmx_card_transfer(
    state: State<AppState>,
    headers: HeaderMap,
    form: Form<HashMap<String, String>>,
) -> ApiResult<Response> {
    let transfer = parse_transfer(&form)?;
    let session = session_from_headers(&headers);
    Ok(action_response(&state, &session, Action::Transfer(transfer)).await)
}

fn parse_transfer(form: &HashMap<String, String>) -> ApiResult<TransferRequest> {
    let from_card_id = require_card(form, "fromCardId")?;
    let to_card_id = require_card(form, "toCardId")?;
    let amount = field(form, "amount").ok_or_else(|| ApiError::bad_request("Please, enter amount"))?;
    let amount = Decimal::from_str(amount).map_err(|_| ApiError::bad_request(format!("Invalid amount: {}", amount)))?;

    Ok(TransferRequest { from_card_id, to_card_id, amount })
}
